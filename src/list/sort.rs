//! Sort string resolution against a per-resource whitelist.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }
}

/// Fields every listable resource may be sorted by.
pub const SORTABLE_FIELDS: &[&str] = &["name", "slug", "created_at", "updated_at"];

/// A resolved, whitelisted sort. `field` is always one of the allowed names, so
/// it is safe to splice into SQL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub field: &'static str,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        SortSpec {
            field: "created_at",
            direction: SortDirection::Desc,
        }
    }
}

impl SortSpec {
    /// Resolve `<field>_<asc|desc>`. The split happens at the last underscore so
    /// `created_at_desc` works. Anything unrecognised yields the default
    /// (`created_at DESC`).
    pub fn resolve(raw: Option<&str>, allowed: &[&'static str]) -> Self {
        let Some((field, dir)) = raw.and_then(|s| s.trim().rsplit_once('_')) else {
            return SortSpec::default();
        };
        let Some(direction) = SortDirection::parse(dir) else {
            return SortSpec::default();
        };
        match allowed.iter().copied().find(|f| *f == field) {
            Some(field) => SortSpec { field, direction },
            None => SortSpec::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(raw: &str) -> SortSpec {
        SortSpec::resolve(Some(raw), SORTABLE_FIELDS)
    }

    #[test]
    fn whitelisted_fields() {
        assert_eq!(
            resolve("name_asc"),
            SortSpec {
                field: "name",
                direction: SortDirection::Asc
            }
        );
        assert_eq!(
            resolve("created_at_asc"),
            SortSpec {
                field: "created_at",
                direction: SortDirection::Asc
            }
        );
        assert_eq!(
            resolve("updated_at_DESC"),
            SortSpec {
                field: "updated_at",
                direction: SortDirection::Desc
            }
        );
    }

    #[test]
    fn falls_back_to_default() {
        for raw in ["", "name", "password_asc", "name_sideways", "_asc", "name asc", "id_desc"] {
            assert_eq!(resolve(raw), SortSpec::default(), "{:?}", raw);
        }
        assert_eq!(SortSpec::resolve(None, SORTABLE_FIELDS), SortSpec::default());
    }
}

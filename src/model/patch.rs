//! Three-state field for partial updates: absent, explicit null, or a value.

use serde::{Deserialize, Deserializer};

/// Use with `#[serde(default)]` so a missing field decodes as `Absent`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Patch<T> {
    /// Field not in the request: leave unchanged.
    Absent,
    /// Field sent as `null`: clear it.
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: PartialEq> Patch<T> {
    /// Merge into `target`. Returns true only when the stored value actually changed.
    pub fn apply_to(self, target: &mut Option<T>) -> bool {
        match self {
            Patch::Absent => false,
            Patch::Null => target.take().is_some(),
            Patch::Value(v) => {
                if target.as_ref() == Some(&v) {
                    false
                } else {
                    *target = Some(v);
                    true
                }
            }
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default)]
        note: Patch<String>,
    }

    fn decode(json: &str) -> Patch<String> {
        serde_json::from_str::<Body>(json).unwrap().note
    }

    #[test]
    fn decodes_three_states() {
        assert_eq!(decode("{}"), Patch::Absent);
        assert_eq!(decode(r#"{"note":null}"#), Patch::Null);
        assert_eq!(decode(r#"{"note":"hi"}"#), Patch::Value("hi".into()));
        assert_eq!(decode(r#"{"note":""}"#), Patch::Value(String::new()));
    }

    #[test]
    fn apply_reports_changes() {
        let mut target = Some("a".to_string());
        assert!(!Patch::Absent.apply_to(&mut target));
        assert!(!Patch::Value("a".to_string()).apply_to(&mut target));
        assert!(Patch::Value("b".to_string()).apply_to(&mut target));
        assert_eq!(target.as_deref(), Some("b"));
        assert!(Patch::Null.apply_to(&mut target));
        assert_eq!(target, None);
        assert!(!Patch::<String>::Null.apply_to(&mut target));
    }
}

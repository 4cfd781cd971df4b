//! Builds parameterized COUNT, SELECT, INSERT, UPDATE, DELETE for one table.
//! Identifiers come from static table descriptions only; values are always parameters.

use crate::list::SortSpec;
use crate::sql::params::PgBindValue;

/// Static description of a table: name and the column list selected for a row.
#[derive(Clone, Copy, Debug)]
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

/// One WHERE condition. All conditions are AND-ed.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// Case-insensitive substring match (`ILIKE '%needle%'`, wildcards in needle escaped).
    Contains { column: &'static str, needle: String },
    Equals { column: &'static str, value: PgBindValue },
}

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Escape `\`, `%` and `_` so user input matches literally inside a LIKE pattern.
pub fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }

    fn where_clause(&mut self, predicates: &[Predicate]) -> String {
        let mut parts = Vec::with_capacity(predicates.len());
        for p in predicates {
            match p {
                Predicate::Contains { column, needle } => {
                    let n = self.push_param(PgBindValue::Text(format!("%{}%", escape_like(needle))));
                    parts.push(format!("{} ILIKE ${}", quoted(column), n));
                }
                Predicate::Equals { column, value } => {
                    let n = self.push_param(value.clone());
                    parts.push(format!("{} = ${}", quoted(column), n));
                }
            }
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", parts.join(" AND "))
        }
    }
}

fn column_list(table: &Table) -> String {
    table
        .columns
        .iter()
        .map(|c| quoted(c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT COUNT(*) with the same predicate the page query uses.
pub fn count(table: &Table, predicates: &[Predicate]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = q.where_clause(predicates);
    q.sql = format!("SELECT COUNT(*) FROM {}{}", quoted(table.name), where_clause);
    q
}

/// One page of rows: filtered, sorted by the resolved spec with `id` as tiebreaker.
pub fn select_page(
    table: &Table,
    predicates: &[Predicate],
    sort: SortSpec,
    limit: i64,
    offset: i64,
) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = q.where_clause(predicates);
    let dir = sort.direction.as_sql();
    let limit_ph = q.push_param(PgBindValue::I64(limit));
    let offset_ph = q.push_param(PgBindValue::I64(offset));
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {} {}, \"id\" {} LIMIT ${} OFFSET ${}",
        column_list(table),
        quoted(table.name),
        where_clause,
        quoted(sort.field),
        dir,
        dir,
        limit_ph,
        offset_ph
    );
    q
}

/// SELECT by primary key.
pub fn select_by_id(table: &Table, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I64(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE \"id\" = ${}",
        column_list(table),
        quoted(table.name),
        n
    );
    q
}

/// INSERT the given columns, returning the generated id.
pub fn insert(table: &Table, values: Vec<(&'static str, PgBindValue)>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(values.len());
    let mut placeholders = Vec::with_capacity(values.len());
    for (col, v) in values {
        let n = q.push_param(v);
        cols.push(quoted(col));
        placeholders.push(format!("${}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING \"id\"",
        quoted(table.name),
        cols.join(", "),
        placeholders.join(", ")
    );
    q
}

/// UPDATE every given column by id.
pub fn update(table: &Table, id: i64, values: Vec<(&'static str, PgBindValue)>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(values.len());
    for (col, v) in values {
        let n = q.push_param(v);
        sets.push(format!("{} = ${}", quoted(col), n));
    }
    let id_ph = q.push_param(PgBindValue::I64(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE \"id\" = ${}",
        quoted(table.name),
        sets.join(", "),
        id_ph
    );
    q
}

/// DELETE by id.
pub fn delete(table: &Table, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I64(id));
    q.sql = format!("DELETE FROM {} WHERE \"id\" = ${}", quoted(table.name), n);
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::SortDirection;

    const WIDGETS: Table = Table {
        name: "widgets",
        columns: &["id", "name", "active"],
    };

    fn filters() -> Vec<Predicate> {
        vec![
            Predicate::Contains {
                column: "name",
                needle: "50%_off".into(),
            },
            Predicate::Equals {
                column: "active",
                value: PgBindValue::Bool(true),
            },
        ]
    }

    #[test]
    fn count_shares_predicate() {
        let q = count(&WIDGETS, &filters());
        assert_eq!(
            q.sql,
            "SELECT COUNT(*) FROM \"widgets\" WHERE \"name\" ILIKE $1 AND \"active\" = $2"
        );
        assert_eq!(
            q.params,
            vec![PgBindValue::Text("%50\\%\\_off%".into()), PgBindValue::Bool(true)]
        );
    }

    #[test]
    fn count_without_filters() {
        let q = count(&WIDGETS, &[]);
        assert_eq!(q.sql, "SELECT COUNT(*) FROM \"widgets\"");
        assert!(q.params.is_empty());
    }

    #[test]
    fn page_query() {
        let sort = SortSpec {
            field: "name",
            direction: SortDirection::Asc,
        };
        let q = select_page(&WIDGETS, &filters(), sort, 15, 30);
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"name\", \"active\" FROM \"widgets\" WHERE \"name\" ILIKE $1 AND \"active\" = $2 \
             ORDER BY \"name\" ASC, \"id\" ASC LIMIT $3 OFFSET $4"
        );
        assert_eq!(q.params[2], PgBindValue::I64(15));
        assert_eq!(q.params[3], PgBindValue::I64(30));
    }

    #[test]
    fn page_query_default_sort() {
        let q = select_page(&WIDGETS, &[], SortSpec::default(), 10, 0);
        assert!(q.sql.ends_with("ORDER BY \"created_at\" DESC, \"id\" DESC LIMIT $1 OFFSET $2"));
    }

    #[test]
    fn writes() {
        let q = insert(
            &WIDGETS,
            vec![("name", "Gear".to_string().into()), ("active", true.into())],
        );
        assert_eq!(
            q.sql,
            "INSERT INTO \"widgets\" (\"name\", \"active\") VALUES ($1, $2) RETURNING \"id\""
        );
        let q = update(&WIDGETS, 9, vec![("name", "Cog".to_string().into())]);
        assert_eq!(q.sql, "UPDATE \"widgets\" SET \"name\" = $1 WHERE \"id\" = $2");
        assert_eq!(q.params[1], PgBindValue::I64(9));
        let q = delete(&WIDGETS, 9);
        assert_eq!(q.sql, "DELETE FROM \"widgets\" WHERE \"id\" = $1");
        let q = select_by_id(&WIDGETS, 9);
        assert_eq!(q.sql, "SELECT \"id\", \"name\", \"active\" FROM \"widgets\" WHERE \"id\" = $1");
    }

    #[test]
    fn like_escaping() {
        assert_eq!(escape_like("iron"), "iron");
        assert_eq!(escape_like(r"a\b%c_d"), r"a\\b\%c\_d");
    }
}

//! Typed bind values collected while building a query, turned into `PgArguments` at execution.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgArguments;
use sqlx::Arguments;

#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Bool(bool),
    I64(i64),
    Text(String),
    NullableText(Option<String>),
    Timestamp(DateTime<Utc>),
}

impl PgBindValue {
    fn add_to(&self, args: &mut PgArguments) -> Result<(), sqlx::Error> {
        match self {
            PgBindValue::Bool(b) => args.add(*b),
            PgBindValue::I64(n) => args.add(*n),
            PgBindValue::Text(s) => args.add(s.clone()),
            PgBindValue::NullableText(s) => args.add(s.clone()),
            PgBindValue::Timestamp(t) => args.add(*t),
        }
        .map_err(sqlx::Error::Encode)
    }
}

impl From<bool> for PgBindValue {
    fn from(v: bool) -> Self {
        PgBindValue::Bool(v)
    }
}

impl From<i64> for PgBindValue {
    fn from(v: i64) -> Self {
        PgBindValue::I64(v)
    }
}

impl From<String> for PgBindValue {
    fn from(v: String) -> Self {
        PgBindValue::Text(v)
    }
}

impl From<Option<String>> for PgBindValue {
    fn from(v: Option<String>) -> Self {
        PgBindValue::NullableText(v)
    }
}

impl From<DateTime<Utc>> for PgBindValue {
    fn from(v: DateTime<Utc>) -> Self {
        PgBindValue::Timestamp(v)
    }
}

/// Bind every value in order ($1, $2, ...).
pub fn to_arguments(params: &[PgBindValue]) -> Result<PgArguments, sqlx::Error> {
    let mut args = PgArguments::default();
    for p in params {
        p.add_to(&mut args)?;
    }
    Ok(args)
}

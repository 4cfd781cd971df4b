//! Request validation. Collects every failing field instead of stopping at the first.

use crate::error::{AppError, FieldError};
use crate::model::Patch;
use regex::Regex;
use std::sync::OnceLock;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 255;
/// Width of the `image_url` column.
pub const URL_MAX_CHARS: usize = 2048;

fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^\s/?#@]*@?[^\s/?#:@]+(:\d+)?([/?#]\S*)?$")
            .expect("static url pattern")
    })
}

/// Accumulates field errors for one request body.
#[derive(Debug, Default)]
pub struct RequestValidator {
    errors: Vec<FieldError>,
}

impl RequestValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Required name. Empty counts as missing.
    pub fn name(&mut self, field: &str, value: &str) -> &mut Self {
        let len = value.chars().count();
        if len == 0 {
            self.fail(field, format!("{} is required", field));
        } else if len < NAME_MIN_CHARS {
            self.fail(field, format!("{} must be at least {} characters", field, NAME_MIN_CHARS));
        } else if len > NAME_MAX_CHARS {
            self.fail(field, format!("{} must be at most {} characters", field, NAME_MAX_CHARS));
        }
        self
    }

    /// Name on update: absent keeps the current one, null is rejected.
    pub fn patch_name(&mut self, field: &str, value: &Patch<String>) -> &mut Self {
        match value {
            Patch::Absent => {}
            Patch::Null => {
                self.fail(field, format!("{} cannot be null", field));
            }
            Patch::Value(v) => {
                self.name(field, v);
            }
        }
        self
    }

    pub fn url(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            if v.chars().count() > URL_MAX_CHARS {
                self.fail(field, format!("{} must be at most {} characters", field, URL_MAX_CHARS));
            } else if !url_pattern().is_match(v) {
                self.fail(field, format!("{} must be a valid URL", field));
            }
        }
        self
    }

    pub fn patch_url(&mut self, field: &str, value: &Patch<String>) -> &mut Self {
        self.url(field, value.value().map(String::as_str))
    }

    pub fn fail(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors.push(FieldError::new(field, message));
        self
    }

    pub fn finish(&mut self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(std::mem::take(&mut self.errors)))
        }
    }
}

//! Form sanitization and validation
//!
//! Runs before any genre business logic: the raw form is trimmed and escaped,
//! then checked with `validator`. The business layer only ever sees the
//! tagged result.

use serde::Serialize;
use validator::Validate;

use crate::models::genre::{GenreForm, RawGenreForm};

/// A single field-level error shown next to the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Outcome of the validation stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validated<T> {
    Valid(T),
    /// Sanitized (possibly still invalid) input plus the errors to display
    Invalid { form: T, errors: Vec<FieldError> },
}

/// Escape characters that carry meaning in HTML
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}

/// Trim and escape a posted genre form
pub fn sanitize_genre_form(raw: &RawGenreForm) -> GenreForm {
    GenreForm {
        name: escape(raw.name.trim()),
    }
}

/// Sanitize then validate a posted genre form
pub fn validate_genre_form(raw: &RawGenreForm) -> Validated<GenreForm> {
    let form = sanitize_genre_form(raw);

    match form.validate() {
        Ok(()) => Validated::Valid(form),
        Err(errors) => {
            let mut fields: Vec<FieldError> = errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errs)| {
                    errs.iter().map(move |e| FieldError {
                        field: field.to_string(),
                        message: e
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid value for {}", field)),
                    })
                })
                .collect();
            fields.sort_by(|a, b| a.field.cmp(&b.field));
            Validated::Invalid { form, errors: fields }
        }
    }
}

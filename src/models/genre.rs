//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::book::BookShort;

/// Shortest genre name the catalog keeps
pub const NAME_MIN_LEN: usize = 3;

pub const NAME_REQUIRED: &str = "Genre name required";
pub const NAME_LENGTH: &str = "Genre name must be between 3 and 100 characters";

/// Genre record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: i32,
    /// Sanitized genre name, unique across the catalog
    pub name: String,
}

impl Genre {
    /// Canonical page of a genre
    pub fn url_for(id: i32) -> String {
        format!("/catalog/genre/{}", id)
    }

    pub fn url(&self) -> String {
        Self::url_for(self.id)
    }
}

/// Genre with the books filed under it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenreDetail {
    pub genre: Genre,
    pub books: Vec<BookShort>,
}

/// Raw genre form as posted by the browser
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGenreForm {
    #[serde(default)]
    pub name: String,
}

/// Sanitized genre form, checked by `validator`
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct GenreForm {
    #[validate(
        length(max = 100, message = "Genre name must be between 3 and 100 characters"),
        custom(function = "validate_name_present")
    )]
    pub name: String,
}

/// Required check, then the lower length bound (empty names only get the
/// "required" message)
fn validate_name_present(name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if len == 0 {
        let mut err = ValidationError::new("required");
        err.message = Some(NAME_REQUIRED.into());
        return Err(err);
    }
    if len < NAME_MIN_LEN {
        let mut err = ValidationError::new("length");
        err.message = Some(NAME_LENGTH.into());
        return Err(err);
    }
    Ok(())
}

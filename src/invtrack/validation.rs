//! Validation primitives shared by all entity operations.
//!
//! Rules:
//! - Names must be present and non-empty
//! - Ids must be integers `>= 0`
//! - Counts must be integers `>= 1`
//! - `createdAt <= modifiedAt` on every entity and ref
//!
//! Each check takes the name of the field it guards so the resulting
//! [`ValidationError`] says where the bad value was.

use crate::error::{InvError, ValidationError};
use crate::model::Id;
use chrono::{DateTime, Utc};

/// Checks that a string is supplied and non-empty.
///
/// # Examples
/// ```
/// use invtrack::validation::non_empty_string;
///
/// assert_eq!(non_empty_string(Some("Books"), "name").unwrap(), "Books");
/// assert!(non_empty_string(Some(""), "name").is_err());
/// assert!(non_empty_string(None, "name").is_err());
/// ```
pub fn non_empty_string<'a>(
    value: Option<&'a str>,
    field: &str,
) -> Result<&'a str, ValidationError> {
    match value {
        None => Err(ValidationError::Missing {
            field: field.to_string(),
        }),
        Some("") => Err(ValidationError::EmptyString {
            field: field.to_string(),
        }),
        Some(s) => Ok(s),
    }
}

/// Checks that an id is `>= 0` and converts it to a stored [`Id`].
pub fn valid_id(value: i64, field: &str) -> Result<Id, ValidationError> {
    u64::try_from(value).map_err(|_| ValidationError::InvalidId {
        field: field.to_string(),
        value,
    })
}

/// Checks that a ref count is `>= 1`.
pub fn valid_count(value: i64, field: &str) -> Result<u64, ValidationError> {
    if value < 1 {
        return Err(ValidationError::InvalidCount {
            field: field.to_string(),
            value,
        });
    }
    Ok(value as u64)
}

pub fn valid_timestamps(
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    field: &str,
) -> Result<(), ValidationError> {
    if created_at > modified_at {
        return Err(ValidationError::Timestamps {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Id passed as an operation argument (get/patch/delete).
///
/// A negative id here is a caller bug, not bad entity content, so it is an
/// [`InvError::InvalidArgument`].
pub fn argument_id(id: i64) -> Result<Id, InvError> {
    u64::try_from(id).map_err(|_| InvError::InvalidArgument(format!("id {} was < 0", id)))
}

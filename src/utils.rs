use bson::oid::ObjectId;

use crate::error::AppError;

/// Parses a hex ObjectId taken from a request path. `what` names the resource
/// in the error message ("player", "question", ...).
pub fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid {} ID", what)))
}

/// Trims `value` and rejects it if nothing is left.
pub fn require_non_empty(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

use uuid::Uuid;

use crate::errors::AppError;

/// Parses an id from the path. A malformed id cannot name a row, so it is reported as a miss.
pub fn valid_uuid(id: &str, not_found: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim()).map_err(|_| AppError::NotFound(not_found.to_string()))
}

use super::ApiError;

pub fn parse_id(field: &str, raw: &str) -> Result<i32, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }

    match trimmed.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::validation(format!(
            "Invalid {field}: {trimmed}. ID must be a positive integer"
        ))),
    }
}

/// Empty means "not given"; range checks happen in the review service.
pub fn parse_optional_rating(raw: &str) -> Result<Option<i32>, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<i32>()
        .map(Some)
        .map_err(|_| ApiError::validation(format!("Invalid rating: {trimmed}")))
}

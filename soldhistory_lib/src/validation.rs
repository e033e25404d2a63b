//! Checks for user-supplied search input.

use soldhistory_api::MAX_HISTORY_PAGES;

use crate::error::SalesError;

pub const MAX_SUBURB_LENGTH: usize = 60;

/// State and territory codes the site searches.
pub const VALID_STATES: &[&str] = &["ACT", "NSW", "NT", "QLD", "SA", "TAS", "VIC", "WA"];

/// Validate a state code: case-insensitive, returned upper-case.
pub fn validate_state(input: &str) -> Result<String, SalesError> {
    let upper = input.trim().to_uppercase();
    if VALID_STATES.contains(&upper.as_str()) {
        Ok(upper)
    } else {
        Err(SalesError::InvalidInput(format!(
            "unknown state code '{}'. Valid codes: {}",
            input,
            VALID_STATES.join(", ")
        )))
    }
}

/// Validate a suburb name: trimmed, non-empty, bounded length, no control characters.
///
/// Spelling is not checked; an unknown suburb simply returns no results.
pub fn validate_suburb(input: &str) -> Result<String, SalesError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SalesError::InvalidInput("suburb name cannot be empty".into()));
    }
    if trimmed.chars().count() > MAX_SUBURB_LENGTH {
        return Err(SalesError::InvalidInput(format!(
            "suburb name too long (max {} characters)",
            MAX_SUBURB_LENGTH
        )));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(SalesError::InvalidInput(format!(
            "suburb name '{}' contains control characters",
            trimmed.escape_debug()
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate a page count: 1 to the site's history limit.
pub fn validate_max_pages(pages: u32) -> Result<u32, SalesError> {
    if (1..=MAX_HISTORY_PAGES).contains(&pages) {
        Ok(pages)
    } else {
        Err(SalesError::InvalidInput(format!(
            "max pages must be between 1 and {}, got {}",
            MAX_HISTORY_PAGES, pages
        )))
    }
}

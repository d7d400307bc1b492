//! Helpers shared by the route groups.

use axum::extract::Multipart;
use common::format_validation_errors;
use serde::Deserialize;
use validator::Validate;

use crate::response::ApiError;

pub const DEFAULT_LIMIT: u64 = 100;
pub const MAX_LIMIT: u64 = 500;

/// `skip`/`limit` query parameters. `limit` is clamped to `1..=500`.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct Pagination {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

impl Pagination {
    pub fn skip(&self) -> u64 {
        self.skip.unwrap_or(0)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

/// Runs `validator` rules, mapping failures to a 400 with the joined messages.
pub fn validate_body<T: Validate>(body: &T) -> Result<(), ApiError> {
    body.validate()
        .map_err(|e| ApiError::bad_request(format_validation_errors(&e)))
}

/// Reads the single `file` field of a multipart upload.
pub async fn read_upload(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("Malformed multipart body"))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|_| ApiError::bad_request("Failed to read uploaded file"))?;
            if bytes.is_empty() {
                return Err(ApiError::bad_request("Uploaded file is empty"));
            }
            return Ok(bytes.to_vec());
        }
    }
    Err(ApiError::bad_request("Missing file upload"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(Pagination::default().limit(), 100);
        assert_eq!(Pagination::default().skip(), 0);
        let big = Pagination {
            skip: Some(5),
            limit: Some(10_000),
        };
        assert_eq!(big.limit(), 500);
        assert_eq!(big.skip(), 5);
        let zero = Pagination {
            skip: None,
            limit: Some(0),
        };
        assert_eq!(zero.limit(), 1);
    }
}

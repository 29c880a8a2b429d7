//! Request DTOs for the backend API
//!
//! Defines the structure of incoming HTTP request bodies and the range
//! checks applied before any cache, upstream or storage work.

use serde::Deserialize;

pub const MIN_YEAR: i32 = 2020;
pub const MAX_YEAR: i32 = 2100;
pub const MIN_SYNC_DAYS: u32 = 7;
pub const MAX_SYNC_DAYS: u32 = 365;
pub const DEFAULT_SYNC_DAYS: u32 = 30;

/// Returns an error message if `year` is outside the supported range.
pub fn validate_year(year: i32) -> Option<String> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        None
    } else {
        Some(format!(
            "year must be between {} and {}, got {}",
            MIN_YEAR, MAX_YEAR, year
        ))
    }
}

/// Request body for POST /api/instagram/insights/sync
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncInsightsRequest {
    /// Days of history to sync (default 30)
    #[serde(default)]
    pub days: Option<u32>,
}

impl SyncInsightsRequest {
    /// Parses a raw request body. An empty body means the default window.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
    }

    pub fn days(&self) -> u32 {
        self.days.unwrap_or(DEFAULT_SYNC_DAYS)
    }

    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        let days = self.days();
        if (MIN_SYNC_DAYS..=MAX_SYNC_DAYS).contains(&days) {
            None
        } else {
            Some(format!(
                "days must be between {} and {}, got {}",
                MIN_SYNC_DAYS, MAX_SYNC_DAYS, days
            ))
        }
    }
}

/// Request body for POST /api/wrapped/generate
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateWrappedRequest {
    pub year: i32,
}

impl GenerateWrappedRequest {
    pub fn validate(&self) -> Option<String> {
        validate_year(self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_request_defaults() {
        let req: SyncInsightsRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.days(), 30);
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_sync_request_from_body() {
        assert_eq!(SyncInsightsRequest::from_body(b"").unwrap().days(), 30);
        assert_eq!(SyncInsightsRequest::from_body(b" \n").unwrap().days(), 30);
        assert_eq!(SyncInsightsRequest::from_body(br#"{"days":14}"#).unwrap().days(), 14);

        assert!(SyncInsightsRequest::from_body(br#"{"days":"abc"}"#).is_err());
        assert!(SyncInsightsRequest::from_body(br#"{"days":-5}"#).is_err());
        assert!(SyncInsightsRequest::from_body(br#"{"days":99999999999}"#).is_err());
        assert!(SyncInsightsRequest::from_body(b"not json").is_err());
    }

    #[test]
    fn test_sync_request_range() {
        assert!(SyncInsightsRequest { days: Some(6) }.validate().is_some());
        assert!(SyncInsightsRequest { days: Some(7) }.validate().is_none());
        assert!(SyncInsightsRequest { days: Some(365) }.validate().is_none());
        assert!(SyncInsightsRequest { days: Some(366) }.validate().is_some());
    }

    #[test]
    fn test_validate_year() {
        assert!(validate_year(2019).is_some());
        assert!(validate_year(2020).is_none());
        assert!(validate_year(2100).is_none());
        assert!(validate_year(2101).is_some());
    }

    #[test]
    fn test_generate_request_deserialize() {
        let req: GenerateWrappedRequest = serde_json::from_str(r#"{"year": 2025}"#).unwrap();
        assert_eq!(req.year, 2025);
        assert!(req.validate().is_none());
    }
}

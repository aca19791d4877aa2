//! Health report body.

use serde::{Deserialize, Serialize};

const STATUS_OK: &str = "ok";
const STATUS_ERROR: &str = "error";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` when every check passed, `degraded` otherwise.
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

impl HealthResponse {
    pub fn new(checks: HealthChecks, version: &str) -> Self {
        let status = if checks.all_ok() { "healthy" } else { "degraded" };

        Self {
            status: status.to_string(),
            version: version.to_string(),
            checks,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.checks.all_ok()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    pub store: CheckStatus,
    pub click_queue: CheckStatus,
    pub cache: CheckStatus,
}

impl HealthChecks {
    pub fn all_ok(&self) -> bool {
        [&self.store, &self.click_queue, &self.cache]
            .iter()
            .all(|check| check.is_ok())
    }
}

/// Outcome of one component check.
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckStatus {
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    fn with_status(status: &str, message: impl Into<String>) -> Self {
        Self {
            status: status.to_string(),
            message: Some(message.into()),
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::with_status(STATUS_OK, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_status(STATUS_ERROR, message)
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checks(store: CheckStatus) -> HealthChecks {
        HealthChecks {
            store,
            click_queue: CheckStatus::ok("Free slots: 10"),
            cache: CheckStatus::ok("memory, 0 entries"),
        }
    }

    #[test]
    fn test_all_ok_is_healthy() {
        let response = HealthResponse::new(checks(CheckStatus::ok("Connected")), "1.0.0");
        assert!(response.is_healthy());
        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_single_failure_degrades() {
        let response = HealthResponse::new(checks(CheckStatus::error("down")), "1.0.0");
        assert!(!response.is_healthy());
        assert_eq!(response.status, "degraded");
    }
}

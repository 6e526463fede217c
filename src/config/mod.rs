use std::env;

use crate::utils::validation::MAX_DATASET_SIZE;

/// Runtime configuration for the ingestion pipeline and HTTP surface
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Advisory maximum upload size in bytes (default: 50 MB).
    /// Enforced only by the HTTP body limit layer.
    pub max_upload_size: usize,

    /// Upload phase: percentage points added per tick (default: 10)
    pub upload_step: u8,

    /// Upload phase tick interval in milliseconds (default: 100)
    pub upload_tick_ms: u64,

    /// Delay between upload completion and validation start, modeling the
    /// transport-to-validator handoff (default: 1000ms)
    pub settle_delay_ms: u64,

    /// Validation phase: percentage points added per tick (default: 20)
    pub validation_step: u8,

    /// Validation phase tick interval in milliseconds (default: 200)
    pub validation_tick_ms: u64,

    /// Delay before the pass/fail decision is taken (default: 500ms)
    pub decision_delay_ms: u64,

    /// Validator type: "random", "pass" or "fail" (default: "random")
    pub validator_type: String,

    /// Pass probability for the random validator (default: 0.8)
    pub pass_probability: f64,

    /// Secret for validating bearer tokens from the session provider
    pub jwt_secret: String,

    /// Buffered capacity of the notification channel (default: 64)
    pub notification_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_upload_size: MAX_DATASET_SIZE,
            upload_step: 10,
            upload_tick_ms: 100,
            settle_delay_ms: 1000,
            validation_step: 20,
            validation_tick_ms: 200,
            decision_delay_ms: 500,
            validator_type: "random".to_string(),
            pass_probability: 0.8,
            jwt_secret: "secret".to_string(),
            notification_capacity: 64,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_size),

            upload_step: env::var("UPLOAD_STEP")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.upload_step),

            upload_tick_ms: env::var("UPLOAD_TICK_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.upload_tick_ms),

            settle_delay_ms: env::var("SETTLE_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.settle_delay_ms),

            validation_step: env::var("VALIDATION_STEP")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.validation_step),

            validation_tick_ms: env::var("VALIDATION_TICK_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.validation_tick_ms),

            decision_delay_ms: env::var("DECISION_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.decision_delay_ms),

            validator_type: env::var("VALIDATOR_TYPE").unwrap_or(default.validator_type),

            pass_probability: env::var("PASS_PROBABILITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.pass_probability),

            jwt_secret: env::var("JWT_SECRET").unwrap_or(default.jwt_secret),

            notification_capacity: env::var("NOTIFICATION_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.notification_capacity),
        }
    }

    /// Create config for development (deterministic validator, default cadence)
    pub fn development() -> Self {
        Self {
            validator_type: "pass".to_string(),
            ..Self::default()
        }
    }
}

use rand::Rng;
use std::sync::Arc;

use crate::models::UploadRecord;

/// Outcome of validating a fully uploaded dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Dataset is usable
    Pass,
    /// Dataset is rejected with a human-readable reason
    Fail { reason: String },
}

/// Diagnostic attached by the reference validator on failure
pub const DEFAULT_DIAGNOSTIC: &str = "Invalid data format in column 3";

/// Trait for dataset validation implementations.
///
/// The pipeline only sees this trait; a real schema/parser validator can
/// replace the probabilistic stub without touching the state machine.
#[async_trait::async_trait]
pub trait DatasetValidator: Send + Sync {
    /// Decide whether the uploaded dataset is usable
    async fn validate(&self, record: &UploadRecord) -> Verdict;
}

/// Probabilistic stand-in for a real validator
pub struct RandomValidator {
    pass_probability: f64,
}

impl RandomValidator {
    pub fn new(pass_probability: f64) -> Self {
        Self {
            pass_probability: pass_probability.clamp(0.0, 1.0),
        }
    }
}

#[async_trait::async_trait]
impl DatasetValidator for RandomValidator {
    async fn validate(&self, _record: &UploadRecord) -> Verdict {
        let pass = rand::thread_rng().gen_bool(self.pass_probability);
        if pass {
            Verdict::Pass
        } else {
            Verdict::Fail {
                reason: DEFAULT_DIAGNOSTIC.to_string(),
            }
        }
    }
}

/// Validator that accepts everything, for development and testing
pub struct AlwaysPassValidator;

#[async_trait::async_trait]
impl DatasetValidator for AlwaysPassValidator {
    async fn validate(&self, _record: &UploadRecord) -> Verdict {
        Verdict::Pass
    }
}

/// Validator that rejects everything, for exercising the failure path
pub struct AlwaysFailValidator;

#[async_trait::async_trait]
impl DatasetValidator for AlwaysFailValidator {
    async fn validate(&self, _record: &UploadRecord) -> Verdict {
        Verdict::Fail {
            reason: DEFAULT_DIAGNOSTIC.to_string(),
        }
    }
}

/// Factory function to create the appropriate validator based on config
pub fn create_validator(validator_type: &str, pass_probability: f64) -> Arc<dyn DatasetValidator> {
    match validator_type.to_lowercase().as_str() {
        "random" => Arc::new(RandomValidator::new(pass_probability)),
        "pass" | "noop" | "disabled" => Arc::new(AlwaysPassValidator),
        "fail" => Arc::new(AlwaysFailValidator),
        _ => {
            tracing::warn!(
                "Unknown validator type '{}', using RandomValidator",
                validator_type
            );
            Arc::new(RandomValidator::new(pass_probability))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> UploadRecord {
        UploadRecord::new("data.csv".to_string(), 1000, "text/csv".to_string())
    }

    #[tokio::test]
    async fn test_always_pass_validator() {
        let verdict = AlwaysPassValidator.validate(&record()).await;
        assert_eq!(verdict, Verdict::Pass);
    }

    #[tokio::test]
    async fn test_always_fail_validator() {
        let verdict = AlwaysFailValidator.validate(&record()).await;
        assert_eq!(
            verdict,
            Verdict::Fail {
                reason: DEFAULT_DIAGNOSTIC.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_random_validator_extremes() {
        let always = RandomValidator::new(1.0);
        let never = RandomValidator::new(0.0);
        for _ in 0..20 {
            assert_eq!(always.validate(&record()).await, Verdict::Pass);
            assert!(matches!(
                never.validate(&record()).await,
                Verdict::Fail { .. }
            ));
        }
    }

    #[tokio::test]
    async fn test_create_validator() {
        let validator = create_validator("pass", 0.8);
        assert_eq!(validator.validate(&record()).await, Verdict::Pass);

        let validator = create_validator("fail", 0.8);
        assert!(matches!(
            validator.validate(&record()).await,
            Verdict::Fail { .. }
        ));
    }
}

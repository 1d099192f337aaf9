//! Settings loaded from environment variables.

use std::env;
use std::path::PathBuf;

use physio_clinic_core::AdmissionPolicy;

pub const DEFAULT_DB_PATH: &str = "clinic.sqlite3";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: PathBuf,
    pub log_filter: String,
    pub admission_policy: AdmissionPolicy,
    /// Set when `CLINIC_ADMISSION_POLICY` was present but unrecognised.
    /// Logged by the caller once tracing is up.
    pub policy_error: Option<String>,
}

impl CliConfig {
    /// Load configuration from the environment (and `.env`, if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let (admission_policy, policy_error) =
            parse_policy(env::var("CLINIC_ADMISSION_POLICY").ok().as_deref());

        Self {
            db_path: env::var("CLINIC_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH)),
            log_filter: env::var("CLINIC_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
            admission_policy,
            policy_error,
        }
    }
}

/// Resolve the admission policy, falling back to the default on bad input.
fn parse_policy(raw: Option<&str>) -> (AdmissionPolicy, Option<String>) {
    match raw.map(str::parse::<AdmissionPolicy>) {
        None => (AdmissionPolicy::default(), None),
        Some(Ok(policy)) => (policy, None),
        Some(Err(e)) => (AdmissionPolicy::default(), Some(e)),
    }
}

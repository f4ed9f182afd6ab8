use std::path::PathBuf;

/// Engine configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | SALON_DATA_DIR | ./data | Directory holding `appointments.redb` |
/// | SLOT_GRANULARITY_MINUTES | 15 | Spacing between candidate slot starts |
/// | BEGIN_TOLERANCE_MINUTES | 0 | How early an appointment may be started |
/// | MAX_COMMIT_ATTEMPTS | 3 | Bounded retries when a commit hits contention |
/// | LOG_LEVEL | info | Level used by `init_logger_from_config` |
///
/// # Example
///
/// ```ignore
/// SALON_DATA_DIR=/var/lib/salon SLOT_GRANULARITY_MINUTES=30 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory for the appointment database
    pub data_dir: String,
    /// Candidate slot spacing in minutes
    pub slot_granularity_minutes: u32,
    /// Minutes before the scheduled start at which `begin` is accepted
    pub begin_tolerance_minutes: i64,
    /// Check-then-commit attempts before contention is reported
    pub max_commit_attempts: u32,
    /// Log level: trace | debug | info | warn | error
    pub log_level: String,
}

const DB_FILE_NAME: &str = "appointments.redb";

impl EngineConfig {
    /// Load configuration from the environment
    ///
    /// Unset or unparsable variables fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("SALON_DATA_DIR").unwrap_or_else(|_| "./data".into()),
            slot_granularity_minutes: std::env::var("SLOT_GRANULARITY_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &u32| *v > 0)
                .unwrap_or(15),
            begin_tolerance_minutes: std::env::var("BEGIN_TOLERANCE_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &i64| *v >= 0)
                .unwrap_or(0),
            max_commit_attempts: std::env::var("MAX_COMMIT_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &u32| *v > 0)
                .unwrap_or(3),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        }
    }

    /// Load a `.env` file if present, then read the environment
    pub fn load() -> Self {
        if let Err(e) = dotenv::dotenv() {
            tracing::debug!(error = %e, "No .env file loaded");
        }
        Self::from_env()
    }

    /// Override the data directory, keeping everything else from the environment
    ///
    /// Mostly used by tests.
    pub fn with_data_dir(data_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.data_dir = data_dir.into();
        config
    }

    /// Path of the appointment database file
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(DB_FILE_NAME)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".into(),
            slot_granularity_minutes: 15,
            begin_tolerance_minutes: 0,
            max_commit_attempts: 3,
            log_level: "info".into(),
        }
    }
}

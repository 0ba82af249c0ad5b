use std::path::PathBuf;

/// Cart engine configuration
///
/// # Environment variables
///
/// | Variable | Default | Purpose |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/cart | Database file location |
/// | ENVIRONMENT | development | Runtime environment |
/// | LOG_LEVEL | info | Tracing filter level |
/// | LOG_DIR | (unset) | Daily-rotated log file directory |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the embedded databases
    pub work_dir: String,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Tracing level
    pub log_level: String,
    /// Optional log file directory (daily rotation)
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/cart".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// Override the working directory (used by tests)
    pub fn with_overrides(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    /// Path of the guest-cart redb database
    pub fn local_db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("guest_cart.redb")
    }

    /// Path of the remote-cart SurrealDB database
    pub fn remote_db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("cart.db")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

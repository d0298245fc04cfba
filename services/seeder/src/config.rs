//! services/seeder/src/config.rs
//!
//! Defines the seeder's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use lms_seed_core::{AccountSpec, CourseId, Role, UserId};
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub log_level: Level,
    pub request_timeout: Duration,
    /// Pause between course iterations.
    pub course_pause: Duration,

    // --- Admin account (optional for the user-directory tools) ---
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_name: String,

    // --- Full seed students ---
    pub student_count: usize,
    pub student_password: String,

    // --- Pre-existing test users (create-test-users, seed-content, simulate-progress) ---
    pub test_user_count: usize,
    pub test_user_password: String,
    pub progress_student_count: usize,

    // --- Bulk quizzes ---
    pub bulk_course_ids: Vec<CourseId>,
    pub bulk_user_ids: Vec<UserId>,
    pub quizzes_per_course: usize,

    // --- User directory ---
    pub users_export_path: Option<PathBuf>,
    pub target_user_id: Option<UserId>,
    pub new_role: Option<Role>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Connection Settings ---
        let base_url = std::env::var("LMS_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5000/api".to_string())
            .trim_end_matches('/')
            .to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "LMS_BASE_URL".to_string(),
                format!("'{}' is not an http(s) URL", base_url),
            ));
        }

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let request_timeout = Duration::from_secs(parse_var("REQUEST_TIMEOUT_SECS", 10)?);
        let course_pause = Duration::from_millis(parse_var("COURSE_PAUSE_MS", 200)?);

        // --- Accounts ---
        let admin_email = std::env::var("ADMIN_EMAIL").ok().filter(|v| !v.trim().is_empty());
        let admin_password = std::env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty());
        let admin_name =
            std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Director Académico".to_string());

        let student_count = parse_var("STUDENT_COUNT", 5)?;
        let student_password =
            std::env::var("STUDENT_PASSWORD").unwrap_or_else(|_| "password123".to_string());
        let test_user_count = parse_var("TEST_USER_COUNT", 5)?;
        let test_user_password =
            std::env::var("TEST_USER_PASSWORD").unwrap_or_else(|_| "testtest".to_string());
        let progress_student_count = parse_var("PROGRESS_STUDENT_COUNT", 10)?;

        // --- Bulk Quizzes ---
        let bulk_course_ids = list_var("BULK_COURSE_IDS").into_iter().map(CourseId::from).collect();
        let bulk_user_ids = list_var("BULK_USER_IDS").into_iter().map(UserId::from).collect();
        let quizzes_per_course = parse_var("QUIZZES_PER_COURSE", 5)?;

        // --- User Directory ---
        let users_export_path = std::env::var("USERS_EXPORT_PATH").ok().map(PathBuf::from);
        let target_user_id = std::env::var("TARGET_USER_ID")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| UserId::new(v.trim()));
        let new_role = match std::env::var("NEW_ROLE") {
            Ok(raw) => Some(
                raw.parse::<Role>()
                    .map_err(|e| ConfigError::InvalidValue("NEW_ROLE".to_string(), e.to_string()))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            base_url,
            log_level,
            request_timeout,
            course_pause,
            admin_email,
            admin_password,
            admin_name,
            student_count,
            student_password,
            test_user_count,
            test_user_password,
            progress_student_count,
            bulk_course_ids,
            bulk_user_ids,
            quizzes_per_course,
            users_export_path,
            target_user_id,
            new_role,
        })
    }

    /// The admin account, if both `ADMIN_EMAIL` and `ADMIN_PASSWORD` are set.
    pub fn admin_account(&self) -> Option<AccountSpec> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => {
                Some(AccountSpec::new(self.admin_name.clone(), email.clone(), password.clone()))
            }
            _ => None,
        }
    }

    /// Like `admin_account`, but for the flows that cannot run without one.
    pub fn require_admin(&self) -> Result<AccountSpec, ConfigError> {
        if self.admin_email.is_none() {
            return Err(ConfigError::MissingVar("ADMIN_EMAIL".to_string()));
        }
        self.admin_account()
            .ok_or_else(|| ConfigError::MissingVar("ADMIN_PASSWORD".to_string()))
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("'{}': {}", raw, e))),
        Err(_) => Ok(default),
    }
}

/// Comma separated list; blank entries are dropped.
fn list_var(name: &str) -> Vec<String> {
    std::env::var(name)
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

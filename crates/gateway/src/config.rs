use crate::error::{GatewayError, Result};

/// Process-wide configuration, read from the environment once at startup and
/// immutable afterwards. The gateway and the tool service receive it by
/// reference; nothing reads the environment after this is constructed.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Base URL of the Moodle instance, e.g. `https://moodle.example.edu`.
    pub api_url: String,
    /// Web-service authentication token.
    pub token: String,
    /// The course every tool operates on.
    pub course_id: u64,
}

impl ServerConfig {
    /// Build the configuration from `MOODLE_API_URL`, `MOODLE_API_TOKEN` and
    /// `MOODLE_COURSE_ID`. Fails if any is absent, empty, or malformed.
    pub fn from_env() -> Result<Self> {
        let api_url = require_env("MOODLE_API_URL")?;
        let token = require_env("MOODLE_API_TOKEN")?;
        let course_id = require_env("MOODLE_COURSE_ID")?.parse().map_err(|_| {
            GatewayError::Config("MOODLE_COURSE_ID must be a numeric course id".to_string())
        })?;

        Ok(Self {
            api_url,
            token,
            course_id,
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| GatewayError::Config(format!("{name} is not set")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Env vars are process-wide; tests that touch them serialize on this.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn with_env(vars: &[(&str, Option<&str>)], f: impl FnOnce()) {
        let _guard = ENV_MUTEX.lock().unwrap();
        let saved: Vec<(String, Option<String>)> = vars
            .iter()
            .map(|(name, _)| ((*name).to_string(), std::env::var(name).ok()))
            .collect();
        for (name, value) in vars {
            match value {
                Some(v) => std::env::set_var(name, v),
                None => std::env::remove_var(name),
            }
        }
        f();
        for (name, value) in saved {
            match value {
                Some(v) => std::env::set_var(&name, v),
                None => std::env::remove_var(&name),
            }
        }
    }

    #[test]
    fn from_env_reads_all_three_values() {
        with_env(
            &[
                ("MOODLE_API_URL", Some("https://moodle.example.edu")),
                ("MOODLE_API_TOKEN", Some("sekrit")),
                ("MOODLE_COURSE_ID", Some("42")),
            ],
            || {
                let config = ServerConfig::from_env().unwrap();
                assert_eq!(config.api_url, "https://moodle.example.edu");
                assert_eq!(config.token, "sekrit");
                assert_eq!(config.course_id, 42);
            },
        );
    }

    #[test]
    fn from_env_rejects_missing_url() {
        with_env(
            &[
                ("MOODLE_API_URL", None),
                ("MOODLE_API_TOKEN", Some("sekrit")),
                ("MOODLE_COURSE_ID", Some("42")),
            ],
            || {
                let err = ServerConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("MOODLE_API_URL"));
            },
        );
    }

    #[test]
    fn from_env_rejects_blank_token() {
        with_env(
            &[
                ("MOODLE_API_URL", Some("https://moodle.example.edu")),
                ("MOODLE_API_TOKEN", Some("   ")),
                ("MOODLE_COURSE_ID", Some("42")),
            ],
            || {
                let err = ServerConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("MOODLE_API_TOKEN"));
            },
        );
    }

    #[test]
    fn from_env_rejects_non_numeric_course() {
        with_env(
            &[
                ("MOODLE_API_URL", Some("https://moodle.example.edu")),
                ("MOODLE_API_TOKEN", Some("sekrit")),
                ("MOODLE_COURSE_ID", Some("algebra")),
            ],
            || {
                let err = ServerConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("MOODLE_COURSE_ID"));
            },
        );
    }
}

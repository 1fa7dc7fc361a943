//! Service configuration loaded from the environment
//!
//! Secrets are required: startup fails with a descriptive error when they
//! are unset instead of falling back to a hardcoded default.

use anyhow::Result;

/// Banking service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Secret the SSN column cipher key is derived from
    pub ssn_encryption_key: String,
    /// Secret used to sign session tokens
    pub session_signing_secret: String,
    /// Minutes subtracted from the 7-day session-row expiry
    pub session_expiry_buffer_minutes: i64,
    /// Address the HTTP listener binds to
    pub bind_addr: String,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SSN_ENCRYPTION_KEY`: secret for SSN field encryption (required)
    /// - `SESSION_SIGNING_SECRET`: secret for session token signing (required)
    /// - `SESSION_EXPIRY_BUFFER_MINUTES`: session expiry buffer (default: 0)
    /// - `BIND_ADDR`: listen address (default: "0.0.0.0:3000")
    pub fn from_env() -> Result<Self> {
        let ssn_encryption_key = std::env::var("SSN_ENCRYPTION_KEY")
            .map_err(|_| anyhow::anyhow!("SSN_ENCRYPTION_KEY environment variable not set"))?;

        let session_signing_secret = std::env::var("SESSION_SIGNING_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_SIGNING_SECRET environment variable not set"))?;

        let session_expiry_buffer_minutes = std::env::var("SESSION_EXPIRY_BUFFER_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Ok(AppConfig {
            ssn_encryption_key,
            session_signing_secret,
            session_expiry_buffer_minutes,
            bind_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set_required_vars() {
        unsafe {
            std::env::set_var("SSN_ENCRYPTION_KEY", "test-ssn-secret");
            std::env::set_var("SESSION_SIGNING_SECRET", "test-signing-secret");
        }
    }

    #[test]
    #[serial]
    fn test_config_defaults() {
        set_required_vars();
        unsafe {
            std::env::remove_var("SESSION_EXPIRY_BUFFER_MINUTES");
            std::env::remove_var("BIND_ADDR");
        }

        let config = AppConfig::from_env().expect("Failed to load config");
        assert_eq!(config.session_expiry_buffer_minutes, 0);
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
    }

    #[test]
    #[serial]
    fn test_config_reads_expiry_buffer() {
        set_required_vars();
        unsafe {
            std::env::set_var("SESSION_EXPIRY_BUFFER_MINUTES", "15");
        }

        let config = AppConfig::from_env().expect("Failed to load config");
        assert_eq!(config.session_expiry_buffer_minutes, 15);

        unsafe {
            std::env::remove_var("SESSION_EXPIRY_BUFFER_MINUTES");
        }
    }

    #[test]
    #[serial]
    fn test_config_requires_ssn_secret() {
        set_required_vars();
        unsafe {
            std::env::remove_var("SSN_ENCRYPTION_KEY");
        }

        assert!(AppConfig::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_config_requires_signing_secret() {
        set_required_vars();
        unsafe {
            std::env::remove_var("SESSION_SIGNING_SECRET");
        }

        assert!(AppConfig::from_env().is_err());
    }
}

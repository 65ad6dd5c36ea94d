// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Collects every problem instead of stopping at the first one.

use crate::diagnostic::ConfigError;
use crate::model::AgegapConfig;

/// Largest accepted `game.matchups_per_day`.
pub const MAX_MATCHUPS_PER_DAY: usize = 50;

/// Largest accepted `rate_limit.window_secs` (one day).
pub const MAX_WINDOW_SECS: u64 = 86_400;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &AgegapConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        fail(format!(
            "server.host `{host}` is not a valid IP address or hostname"
        ));
    }

    if config.server.port == 0 {
        fail("server.port must be greater than 0".to_string());
    }

    if config.server.client_ip_header.trim().is_empty() {
        fail("server.client_ip_header must not be empty".to_string());
    }

    if let Some(secret) = &config.game.secret {
        if secret.trim().is_empty() {
            fail("game.secret must not be empty when set".to_string());
        }
    }

    if let Some(salt) = &config.subscription.salt {
        if salt.trim().is_empty() {
            fail("subscription.salt must not be empty when set".to_string());
        }
    }

    let per_day = config.game.matchups_per_day;
    if per_day == 0 || per_day > MAX_MATCHUPS_PER_DAY {
        fail(format!(
            "game.matchups_per_day must be between 1 and {MAX_MATCHUPS_PER_DAY}, got {per_day}"
        ));
    }

    if let Some(path) = &config.game.dataset_path {
        if path.trim().is_empty() {
            fail("game.dataset_path must not be empty when set".to_string());
        }
    }

    if config.rate_limit.limit == 0 {
        fail("rate_limit.limit must be at least 1".to_string());
    }

    let window = config.rate_limit.window_secs;
    if window == 0 || window > MAX_WINDOW_SECS {
        fail(format!(
            "rate_limit.window_secs must be between 1 and {MAX_WINDOW_SECS}, got {window}"
        ));
    }

    if config.storage.enabled && config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&AgegapConfig::default()).is_ok());
    }

    #[test]
    fn zero_port_rejected() {
        let mut config = AgegapConfig::default();
        config.server.port = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("server.port"));
    }

    #[test]
    fn matchup_bounds_enforced() {
        let mut config = AgegapConfig::default();
        config.game.matchups_per_day = 0;
        assert!(validate_config(&config).is_err());
        config.game.matchups_per_day = MAX_MATCHUPS_PER_DAY + 1;
        assert!(validate_config(&config).is_err());
        config.game.matchups_per_day = MAX_MATCHUPS_PER_DAY;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_ignored_when_storage_disabled() {
        let mut config = AgegapConfig::default();
        config.storage.database_path = String::new();
        assert!(validate_config(&config).is_err());
        config.storage.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_subscription_salt_rejected() {
        let mut config = AgegapConfig::default();
        config.subscription.salt = Some(String::new());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("subscription.salt"));
        config.subscription.salt = Some("pepper".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn window_upper_bound_enforced() {
        let mut config = AgegapConfig::default();
        config.rate_limit.window_secs = MAX_WINDOW_SECS;
        assert!(validate_config(&config).is_ok());
        config.rate_limit.window_secs = u64::MAX;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("rate_limit.window_secs"));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = AgegapConfig::default();
        config.server.host = "bad host!".to_string();
        config.rate_limit.limit = 0;
        config.rate_limit.window_secs = 0;
        config.game.secret = Some("  ".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}

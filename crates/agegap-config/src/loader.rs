// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./agegap.toml` > `~/.config/agegap/agegap.toml` > `/etc/agegap/agegap.toml`,
//! with `AGEGAP_` environment variables overriding all files.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::AgegapConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/agegap/agegap.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "agegap.toml";

/// Config sections, longest first so `rate_limit_` wins over any shorter prefix.
const SECTIONS: &[&str] = &["subscription", "rate_limit", "storage", "server", "game"];

/// User config file under the XDG config directory, if one is defined.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("agegap").join(LOCAL_CONFIG_FILE))
}

/// Figment with every layer applied, before extraction.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(AgegapConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Load configuration from the file hierarchy with env var overrides.
pub fn load_config() -> Result<AgegapConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an inline TOML document and defaults only.
pub fn load_config_from_str(toml_content: &str) -> Result<AgegapConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AgegapConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file plus env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AgegapConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AgegapConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// `AGEGAP_RATE_LIMIT_WINDOW_SECS` becomes `rate_limit.window_secs`.
///
/// Only the section prefix is split off; the rest of the name is kept
/// whole because field names contain underscores.
fn env_provider() -> Env {
    Env::prefixed("AGEGAP_").map(|key| section_key(key.as_str()).into())
}

/// Maps a prefix-stripped variable name to a lowercase dotted key.
pub fn section_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section) {
            if let Some(field) = rest.strip_prefix('_') {
                return format!("{section}.{field}");
            }
        }
    }
    key
}

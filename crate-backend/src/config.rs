use std::path::Path;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_rust_log")]
    pub rust_log: String,

    #[serde(default)]
    pub session: ConfigSession,

    #[serde(default)]
    pub events: ConfigEvents,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSession {
    /// identities signed in for longer than this are signed out again
    #[serde(default = "default_session_max_age")]
    pub max_age_secs: u64,

    /// how often the age check runs
    #[serde(default = "default_session_sweep_interval")]
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigEvents {
    /// capacity of the server-wide change event bus
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
}

fn default_rust_log() -> String {
    "info".to_string()
}

fn default_session_max_age() -> u64 {
    60 * 60
}

fn default_session_sweep_interval() -> u64 {
    5 * 60
}

fn default_broadcast_capacity() -> usize {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rust_log: default_rust_log(),
            session: ConfigSession::default(),
            events: ConfigEvents::default(),
        }
    }
}

impl Default for ConfigSession {
    fn default() -> Self {
        Self {
            max_age_secs: default_session_max_age(),
            sweep_interval_secs: default_session_sweep_interval(),
        }
    }
}

impl Default for ConfigEvents {
    fn default() -> Self {
        Self {
            broadcast_capacity: default_broadcast_capacity(),
        }
    }
}

impl Config {
    /// toml file (may be absent) overridden by PERCH_* env vars
    pub fn load(path: &Path) -> Result<Config> {
        Ok(Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("PERCH_").split("__"))
            .extract()?)
    }
}

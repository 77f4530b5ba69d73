// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use crate::model::DataConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SERVER_PORT: u16 = 10151;
pub const DEFAULT_SERVER_TASKS_PERIOD_SECS: u64 = 60 * 5;
pub const DEFAULT_SERVER_TIMEOUT_SECS: u64 = 60 * 30;

pub const SERVER_PORT_FIELD: &str = "server_port";
pub const SERVER_TASKS_PERIOD_FIELD: &str = "server_tasks_period";
pub const SERVER_TIMEOUT_FIELD: &str = "server_timeout";
pub const SOCKET_CONTROL_PORT_FIELD: &str = "socket_control_port";
pub const PULL_MODE_REQUIRED_FIELD: &str = "pull_mode_required";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Every well-known port of a deployment, derived from one base port unless overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicePorts {
    pub server: u16,
    pub listener: u16,
    pub listener_export: u16,
    pub balancer: u16,
    pub balancer_export: u16,
    pub socket_control: u16,
    pub evaluator: u16,
}

impl ServicePorts {
    pub fn from_base(base: u16) -> Self {
        Self {
            server: base,
            listener: base.saturating_add(1),
            listener_export: base.saturating_add(2),
            balancer: base.saturating_add(3),
            balancer_export: base.saturating_add(4),
            socket_control: base.saturating_add(5),
            evaluator: base.saturating_add(7),
        }
    }
}

impl Default for ServicePorts {
    fn default() -> Self {
        Self::from_base(DEFAULT_SERVER_PORT)
    }
}

/// Configuration a server is constructed with. Replaceable through `set_config` only while the
/// server is stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub ports: ServicePorts,
    /// Seconds between periodic server tasks. Zero disables them.
    pub server_tasks_period: u64,
    /// Seconds of socket inactivity before a session is dropped.
    pub server_timeout: u64,
    /// Clients should poll for status instead of registering listeners.
    pub pull_mode_required: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: crate::DEFAULT_HOST.to_string(),
            ports: ServicePorts::default(),
            server_tasks_period: DEFAULT_SERVER_TASKS_PERIOD_SECS,
            server_timeout: DEFAULT_SERVER_TIMEOUT_SECS,
            pull_mode_required: false,
        }
    }
}

impl ServerConfig {
    pub fn with_base_port(base: u16) -> Self {
        Self {
            ports: ServicePorts::from_base(base),
            ..Self::default()
        }
    }

    pub fn tasks_period(&self) -> Option<Duration> {
        (self.server_tasks_period > 0).then(|| Duration::from_secs(self.server_tasks_period))
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.server_timeout > 0).then(|| Duration::from_secs(self.server_timeout))
    }

    /// Export the keys clients may inspect through `get_server_config`.
    pub fn to_data_config(&self) -> DataConfig {
        let mut config = DataConfig::new();
        config.put(SERVER_PORT_FIELD, self.ports.server);
        config.put(SERVER_TASKS_PERIOD_FIELD, self.server_tasks_period);
        config.put(SERVER_TIMEOUT_FIELD, self.server_timeout);
        config.put(SOCKET_CONTROL_PORT_FIELD, self.ports.socket_control);
        config.put(PULL_MODE_REQUIRED_FIELD, self.pull_mode_required);
        config
    }

    /// Overlay any recognised keys from `config` onto a copy of `self`.
    pub fn merged_with(&self, config: &DataConfig) -> Result<Self, ConfigError> {
        let mut merged = self.clone();
        if let Some(port) = parse_key(config, SERVER_PORT_FIELD)? {
            merged.ports.server = port;
        }
        if let Some(period) = parse_key(config, SERVER_TASKS_PERIOD_FIELD)? {
            merged.server_tasks_period = period;
        }
        if let Some(timeout) = parse_key(config, SERVER_TIMEOUT_FIELD)? {
            merged.server_timeout = timeout;
        }
        if let Some(port) = parse_key(config, SOCKET_CONTROL_PORT_FIELD)? {
            merged.ports.socket_control = port;
        }
        if let Some(pull) = parse_key(config, PULL_MODE_REQUIRED_FIELD)? {
            merged.pull_mode_required = pull;
        }
        Ok(merged)
    }
}

fn parse_key<T: FromStr>(config: &DataConfig, key: &str) -> Result<Option<T>, ConfigError> {
    let Some(value) = config.get(key) else {
        return Ok(None);
    };
    value
        .parse::<T>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

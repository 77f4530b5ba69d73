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

pub use config::{
    ConfigError, DEFAULT_SERVER_PORT, DEFAULT_SERVER_TASKS_PERIOD_SECS,
    DEFAULT_SERVER_TIMEOUT_SECS, ServerConfig, ServicePorts,
};
pub use measure::{ActiveMeasure, ActiveRequestGuard, least_busy};
pub use privileges::Privileges;
pub use status::{ServerStatus, ServerStatusEvent};

mod config;
mod measure;
pub mod model;
mod privileges;
mod status;
pub mod tracing;

/// Name under which a server's gateway is registered with a naming registry.
pub const GATEWAY: &str = "gateway";

/// Default host used when building bind and connect URIs.
pub const DEFAULT_HOST: &str = "localhost";

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

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// The lifecycle transition a status event reports.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ServerStatus {
    Started,
    Paused,
    Resumed,
    Stopped,
    SetConfig,
    Exit,
}

/// Immutable notification of a server lifecycle transition, delivered to every registered
/// status listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatusEvent {
    pub status: ServerStatus,
    pub message: String,
    /// Set when the exit was triggered by process shutdown rather than an explicit request.
    pub shutdown_hook: bool,
}

impl ServerStatusEvent {
    pub fn new(status: ServerStatus) -> Self {
        Self {
            status,
            message: String::new(),
            shutdown_hook: false,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_shutdown_hook(mut self, shutdown_hook: bool) -> Self {
        self.shutdown_hook = shutdown_hook;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_names() {
        assert_eq!(ServerStatus::SetConfig.to_string(), "setconfig");
        assert_eq!(ServerStatus::from_str("exit").unwrap(), ServerStatus::Exit);
        let json = serde_json::to_string(&ServerStatus::Resumed).unwrap();
        assert_eq!(json, "\"resumed\"");
    }

    #[test]
    fn test_event_builder() {
        let event = ServerStatusEvent::new(ServerStatus::Exit)
            .with_message("signal")
            .with_shutdown_hook(true);
        assert_eq!(event.status, ServerStatus::Exit);
        assert_eq!(event.message, "signal");
        assert!(event.shutdown_hook);
    }
}

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

//! Mock status listener for testing lifecycle notification without a client

use reco_common::{ServerStatus, ServerStatusEvent};
use rpc_common::{RpcError, ServerStatusListener};
use std::sync::{Arc, Mutex};

/// Captures every status event it is sent, in delivery order
#[derive(Default)]
pub struct RecordingListener {
    pub events: Arc<Mutex<Vec<ServerStatusEvent>>>,
}

impl RecordingListener {
    /// Get captured events
    pub fn events(&self) -> Vec<ServerStatusEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Get just the statuses of captured events
    pub fn statuses(&self) -> Vec<ServerStatus> {
        self.events().into_iter().map(|e| e.status).collect()
    }

}

impl ServerStatusListener for RecordingListener {
    fn server_status_changed(&self, event: &ServerStatusEvent) -> Result<(), RpcError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

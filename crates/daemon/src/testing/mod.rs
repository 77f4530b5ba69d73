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

//! Testing utilities for the daemon

pub mod mock_listener;

pub use mock_listener::RecordingListener;

use crate::accounts::Accounts;
use crate::evaluators::EvaluatorRegistry;
use crate::power_server::PowerServer;
use crate::store::MemoryService;
use reco_common::{Privileges, ServerConfig};
use std::sync::Arc;

/// A stopped server over an empty in-memory store, with periodic tasks disabled and three
/// accounts: `root`/`secret` (admin), `reader`/`pw` (access) and `scorer`/`pw` (evaluate).
pub fn test_server() -> Arc<PowerServer> {
    let accounts = Arc::new(Accounts::with_params(Accounts::minimal_params()));
    accounts.add("root", "secret", Privileges::ADMIN).unwrap();
    accounts.add("reader", "pw", Privileges::ACCESS).unwrap();
    accounts.add("scorer", "pw", Privileges::EVALUATE).unwrap();
    let config = ServerConfig {
        server_tasks_period: 0,
        ..ServerConfig::default()
    };
    let backend = Arc::new(MemoryService::new(
        config.clone(),
        accounts.clone(),
        Arc::new(EvaluatorRegistry::with_names(&["rmse"], "localhost", 10158)),
    ));
    Arc::new(PowerServer::new(config, accounts, backend))
}

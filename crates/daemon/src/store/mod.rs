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

use reco_common::ServerConfig;
use rpc_common::{RpcError, Service};

pub use memory::MemoryService;

mod memory;

/// A `Service` the server can bring up and down with its lifecycle.
pub trait Backend: Service {
    /// Called on start, before the server reports itself started.
    fn open(&self, config: &ServerConfig) -> Result<(), RpcError>;

    fn close(&self);

    /// Configuration replaced while stopped.
    fn reconfigure(&self, config: &ServerConfig);

    /// Periodic maintenance, run on the server task timer while the server is running.
    fn run_tasks(&self);
}

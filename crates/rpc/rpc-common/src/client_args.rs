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

use crate::ConnectInfo;
use clap_derive::Parser;
use std::time::Duration;

/// Common command line arguments for clients
#[derive(Parser, Debug)] // requires `derive` feature
pub struct RpcClientArgs {
    #[arg(
        long,
        value_name = "connect-uri",
        help = "Server URI: hdp://host:port for the socket protocol",
        default_value = "hdp://localhost:10151"
    )]
    pub connect_uri: String,

    #[arg(
        long,
        value_name = "control-address",
        help = "host:port of the server's control socket",
        default_value = "localhost:10156"
    )]
    pub control_address: String,

    #[arg(long, value_name = "account", help = "Account name", default_value = "admin")]
    pub account: String,

    #[arg(
        long,
        value_name = "password",
        help = "Account password",
        env = "RECO_PASSWORD",
        default_value = "admin"
    )]
    pub password: String,

    #[arg(
        long,
        value_name = "timeout-secs",
        help = "Socket timeout in seconds",
        default_value = "30"
    )]
    pub timeout_secs: u64,
}

impl RpcClientArgs {
    pub fn connect_info(&self) -> ConnectInfo {
        let mut info = ConnectInfo::new(&self.connect_uri, &self.account, &self.password);
        info.timeout = Duration::from_secs(self.timeout_secs);
        info
    }
}

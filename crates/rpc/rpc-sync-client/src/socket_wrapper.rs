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

use crate::wire::{open_stream, read_response, write_request};
use rpc_common::request_builders::{mk_authenticated_control_request, mk_quit_request};
use rpc_common::{ControlCommand, Request, Response, RpcError};
use std::io::BufReader;
use std::time::Duration;
use tracing::debug;

/// Single-shot channel: every request opens a socket, sends one line, reads one reply and
/// closes. Used against the control socket, where credentials travel inside each request.
#[derive(Debug, Clone)]
pub struct SocketWrapper {
    addr: String,
    timeout: Duration,
}

impl SocketWrapper {
    pub fn new(addr: &str, timeout: Duration) -> Self {
        Self {
            addr: addr.to_string(),
            timeout,
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn send_once(&self, request: &Request) -> Result<Response, RpcError> {
        let mut stream = open_stream(&self.addr, self.timeout)?;
        write_request(&mut stream, request)?;
        let mut reader = BufReader::new(stream);
        let response = read_response(&mut reader, request.not_json_parsing);
        debug!(addr = %self.addr, action = %request.action(), ok = response.is_ok(), "One-shot request");
        response
    }

    /// Issue a lifecycle command. Returns the server's boolean verdict.
    pub fn control(
        &self,
        command: ControlCommand,
        account: &str,
        password: &str,
    ) -> Result<bool, RpcError> {
        self.send_once(&mk_authenticated_control_request(command, account, password))?
            .into_bool()
    }

    pub fn quit(&self) -> Result<(), RpcError> {
        self.send_once(&mk_quit_request())?.into_result().map(|_| ())
    }
}

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

use crate::Transport;
use crate::wire::{open_stream, read_response, write_request};
use reco_common::Privileges;
use rpc_common::request_builders::{mk_quit_request, mk_validate_account_request};
use rpc_common::{ConnectInfo, Request, RequestBody, Response, RpcError};
use std::io::BufReader;
use std::net::TcpStream;
use std::time::Duration;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// A persistent, authenticated socket session. One request is in flight at a time.
pub struct SocketConnection {
    // Note: this becomes None while a request is in flight, and is replaced with Some() once the
    // reply has been read. It stays None after an I/O failure or close().
    stream: Option<BufReader<TcpStream>>,
    authenticated: bool,
    session_id: Uuid,
}

impl SocketConnection {
    /// Open the socket without authenticating. Every request other than `validate_account` is
    /// refused locally until [`SocketConnection::authenticate`] succeeds.
    pub fn connect(addr: &str, timeout: Duration) -> Result<Self, RpcError> {
        let stream = open_stream(addr, timeout)?;
        let session_id = Uuid::new_v4();
        debug!(addr, %session_id, "Socket connection opened");
        Ok(Self {
            stream: Some(BufReader::new(stream)),
            authenticated: false,
            session_id,
        })
    }

    /// Connect to `info.connect_uri` and authenticate with the access privilege.
    pub fn open(info: &ConnectInfo) -> Result<Self, RpcError> {
        let endpoint = info.endpoint()?;
        let mut connection = Self::connect(&endpoint.socket_addr(), info.timeout)?;
        connection.authenticate(&info.account, &info.password, Privileges::ACCESS)?;
        Ok(connection)
    }

    /// Send `validate_account` as the first exchange. On rejection the connection stays open
    /// but unauthenticated, and nothing else will be transmitted over it.
    pub fn authenticate(
        &mut self,
        account: &str,
        password: &str,
        privileges: Privileges,
    ) -> Result<(), RpcError> {
        let reply = self.call(mk_validate_account_request(account, password, privileges))?;
        if reply.into_bool()? {
            self.authenticated = true;
            debug!(account, session_id = %self.session_id, "Authenticated");
            Ok(())
        } else {
            self.authenticated = false;
            warn!(account, "Authentication rejected");
            Err(RpcError::AuthenticationError(format!(
                "account {account} was not accepted"
            )))
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    fn call(&mut self, request: Request) -> Result<Response, RpcError> {
        let mut reader = self.stream.take().ok_or(RpcError::NotConnected)?;

        if let Err(e) = write_request(reader.get_mut(), &request) {
            error!(action = %request.action(), "Unable to send request: {}", e);
            return Err(e);
        }
        let binary = request.not_json_parsing;
        match read_response(&mut reader, binary) {
            Ok(response) => {
                self.stream = Some(reader);
                Ok(response)
            }
            // A bad JSON line was consumed whole, so the stream is still in sync. A rejected
            // frame may leave its body unread.
            Err(e @ RpcError::CouldNotDecode(_)) if !binary => {
                error!(action = %request.action(), "Unable to decode response: {}", e);
                self.stream = Some(reader);
                Err(e)
            }
            Err(e) => {
                error!(action = %request.action(), "Unable to receive response: {}", e);
                Err(e)
            }
        }
    }
}

impl Transport for SocketConnection {
    fn send(&mut self, request: Request) -> Result<Response, RpcError> {
        if self.stream.is_none() {
            return Err(RpcError::NotConnected);
        }
        if !self.authenticated {
            return Err(RpcError::NotAuthenticated);
        }
        let quitting = matches!(request.body, RequestBody::Quit);
        let response = self.call(request)?;
        if quitting {
            self.stream = None;
            self.authenticated = false;
        }
        Ok(response)
    }

    fn close(&mut self) {
        if self.authenticated && self.stream.is_some() {
            if let Err(e) = self.call(mk_quit_request()) {
                debug!("quit on close failed: {}", e);
            }
        }
        self.authenticated = false;
        self.stream = None;
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }
}

impl Drop for SocketConnection {
    fn drop(&mut self) {
        self.close();
    }
}

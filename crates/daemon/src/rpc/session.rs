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

//! Per-connection protocol state. A session starts unauthenticated; a `validate_account`
//! request binds it to an account and the privileges it asked for. Requests on one session are
//! handled strictly in order.

use crate::power_server::PowerServer;
use crate::rpc::SocketKind;
use reco_common::Privileges;
use rpc_common::codec::{decode_request, encode_frame, encode_response};
use rpc_common::{
    ControlCommand, PEER_ADDRESS_ATTRIBUTE, Request, RequestBody, Response, RpcError,
    RpcMessageError, Server, SessionInfo, dispatch,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Bytes to write back, and whether the connection ends after them.
#[derive(Debug)]
pub struct Reply {
    pub bytes: Vec<u8>,
    pub close: bool,
}

fn encode(response: &Response, binary: bool) -> Result<Vec<u8>, RpcError> {
    if binary {
        return encode_frame(response);
    }
    let mut line = encode_response(response)?;
    line.push('\n');
    Ok(line.into_bytes())
}

impl Reply {
    fn new(response: &Response, binary: bool, close: bool) -> Self {
        let bytes = encode(response, binary)
            .or_else(|e| {
                error!("Unable to encode response: {}", e);
                encode(
                    &Response::Failure(RpcMessageError::InternalError(e.to_string())),
                    binary,
                )
            })
            .unwrap_or_default();
        let close = close || bytes.is_empty();
        Self { bytes, close }
    }
}

pub struct Session {
    id: Uuid,
    kind: SocketKind,
    peer: SocketAddr,
    server: Arc<PowerServer>,
    info: Option<SessionInfo>,
}

impl Session {
    pub fn new(kind: SocketKind, server: Arc<PowerServer>, peer: SocketAddr) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            peer,
            server,
            info: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn info(&self) -> Option<&SessionInfo> {
        self.info.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.info.is_some()
    }

    /// Decode, handle and encode one request line.
    pub fn handle_line(&mut self, line: &str) -> Reply {
        let request = match decode_request(line) {
            Ok(request) => request,
            Err(e) => {
                warn!(session_id = %self.id, "Undecodable request: {}", e);
                let failure = Response::Failure(RpcMessageError::InvalidRequest(e.to_string()));
                return Reply::new(&failure, false, false);
            }
        };
        let (response, close) = self.handle(&request);
        debug!(
            session_id = %self.id,
            action = %request.action(),
            failed = response.is_failure(),
            "Handled request"
        );
        Reply::new(&response, request.not_json_parsing, close)
    }

    /// Handle a decoded request, returning the response and whether to hang up after it.
    pub fn handle(&mut self, request: &Request) -> (Response, bool) {
        if let RequestBody::Quit = request.body {
            return (Response::Empty, true);
        }
        let response = match self.kind {
            SocketKind::Service => self.handle_service(request),
            SocketKind::Control => self.handle_control(request),
        };
        (response, false)
    }

    fn handle_service(&mut self, request: &Request) -> Response {
        if let RequestBody::ValidateAccount {
            account_name,
            account_password,
            account_privileges,
        } = &request.body
        {
            let granted = *account_privileges | Privileges::ACCESS;
            return Response::BooleanResult(self.authenticate(
                account_name,
                account_password,
                granted,
            ));
        }

        let Some(info) = &self.info else {
            return Response::Failure(RpcMessageError::NotAuthenticated);
        };
        match &request.body {
            RequestBody::Control {
                control_command, ..
            } => {
                if info.privileges.is_admin() {
                    self.control(*control_command)
                } else {
                    Response::Failure(RpcMessageError::PermissionDenied)
                }
            }
            RequestBody::GetSessionAttribute { .. } => {
                dispatch(&*self.server.service(), info, request)
            }
            _ => match self.server.is_running() {
                Ok(true) => {
                    let _active = self.server.measure().enter();
                    dispatch(&*self.server.service(), info, request)
                }
                Ok(false) => Response::Failure(RpcMessageError::NotRunning),
                Err(e) => Response::Failure(e.into()),
            },
        }
    }

    fn handle_control(&mut self, request: &Request) -> Response {
        match &request.body {
            RequestBody::ValidateAccount {
                account_name,
                account_password,
                account_privileges,
            } => {
                let granted = *account_privileges | Privileges::ADMIN;
                Response::BooleanResult(self.authenticate(
                    account_name,
                    account_password,
                    granted,
                ))
            }
            RequestBody::Control {
                control_command,
                account_name: Some(account_name),
                account_password: Some(account_password),
            } => {
                if self
                    .server
                    .accounts()
                    .validate(account_name, account_password, Privileges::ADMIN)
                {
                    self.control(*control_command)
                } else {
                    warn!(session_id = %self.id, account = %account_name, "Control command refused");
                    Response::BooleanResult(false)
                }
            }
            RequestBody::Control {
                control_command, ..
            } => match self.info {
                Some(_) => self.control(*control_command),
                None => Response::Failure(RpcMessageError::NotAuthenticated),
            },
            _ => Response::Empty,
        }
    }

    fn authenticate(&mut self, account_name: &str, password: &str, privileges: Privileges) -> bool {
        if !self
            .server
            .accounts()
            .validate(account_name, password, privileges)
        {
            warn!(session_id = %self.id, account = account_name, %privileges, "Authentication failed");
            self.info = None;
            return false;
        }
        let mut info = SessionInfo::new(&self.id.to_string(), account_name, privileges);
        info.set_attribute(PEER_ADDRESS_ATTRIBUTE, self.peer.to_string());
        info!(session_id = %self.id, account = account_name, %privileges, "Session authenticated");
        self.info = Some(info);
        true
    }

    fn control(&self, command: ControlCommand) -> Response {
        match self.server.control(command) {
            Ok(()) => Response::BooleanResult(true),
            Err(e) => {
                warn!(session_id = %self.id, %command, "Control command failed: {}", e);
                Response::Failure(e.into())
            }
        }
    }
}

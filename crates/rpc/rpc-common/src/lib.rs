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
use thiserror::Error;

pub use connect_info::{ConnectInfo, Endpoint, Scheme};
pub use dispatch::{
    ACCOUNT_NAME_ATTRIBUTE, ACCOUNT_PRIVILEGES_ATTRIBUTE, PEER_ADDRESS_ATTRIBUTE,
    SESSION_ID_ATTRIBUTE, SessionInfo, dispatch,
};
pub use naming::{Registry, gateway_uri};
pub use request::{Action, ControlCommand, Request, RequestBody};
pub use response::{Response, ResultKind};
pub use service::{Gateway, ListenerId, Server, ServerStatusListener, Service};

pub mod client_args;
pub mod codec;
mod connect_info;
mod dispatch;
mod naming;
mod request;
pub mod request_builders;
mod response;
mod service;

/// Errors at the transport / encoding layer, as seen by a caller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RpcError {
    #[error("could not connect: {0}")]
    CouldNotConnect(String),
    #[error("could not authenticate: {0}")]
    AuthenticationError(String),
    #[error("session is not authenticated")]
    NotAuthenticated,
    #[error("channel is not connected")]
    NotConnected,
    #[error("could not send RPC request: {0}")]
    CouldNotSend(String),
    #[error("could not receive RPC response: {0}")]
    CouldNotReceive(String),
    #[error("could not decode RPC message: {0}")]
    CouldNotDecode(String),
    #[error("unexpected reply: {0}")]
    UnexpectedReply(String),
    #[error("remote invocation failed: {0}")]
    Remote(String),
    #[error("lifecycle error: {0}")]
    Lifecycle(LifecycleError),
    #[error("request failed: {0}")]
    Failure(RpcMessageError),
}

/// Errors the server reports back inside a response.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum RpcMessageError {
    #[error("Permission denied")]
    PermissionDenied,
    #[error("Session not authenticated")]
    NotAuthenticated,
    #[error("Server is not running")]
    NotRunning,
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
    #[error("Lifecycle error: {0}")]
    Lifecycle(LifecycleError),
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Rejected server lifecycle transitions.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleError {
    #[error("server already started")]
    AlreadyStarted,
    #[error("server not started")]
    NotStarted,
    #[error("server not running")]
    NotRunning,
    #[error("server not paused")]
    NotPaused,
    #[error("configuration cannot change while the server is started")]
    ConfigWhileStarted,
    #[error("server has exited")]
    Exited,
}

impl From<RpcMessageError> for RpcError {
    fn from(value: RpcMessageError) -> Self {
        match value {
            RpcMessageError::Lifecycle(e) => RpcError::Lifecycle(e),
            other => RpcError::Failure(other),
        }
    }
}

impl From<LifecycleError> for RpcError {
    fn from(value: LifecycleError) -> Self {
        RpcError::Lifecycle(value)
    }
}

impl From<RpcError> for RpcMessageError {
    fn from(value: RpcError) -> Self {
        match value {
            RpcError::Failure(e) => e,
            RpcError::Lifecycle(e) => RpcMessageError::Lifecycle(e),
            RpcError::NotAuthenticated => RpcMessageError::NotAuthenticated,
            other => RpcMessageError::InternalError(other.to_string()),
        }
    }
}

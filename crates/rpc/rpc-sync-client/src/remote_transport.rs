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
use reco_common::Privileges;
use rpc_common::{Registry, Request, RequestBody, Response, RpcError, Service, SessionInfo, dispatch};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Binding to a service living in the same process, obtained from a gateway in a [`Registry`].
/// Requests are dispatched directly; nothing is encoded.
pub struct RemoteTransport {
    service: Option<Arc<dyn Service>>,
    session: SessionInfo,
}

impl RemoteTransport {
    /// Look up the gateway bound at `uri` and ask it for a service reference.
    pub fn bind(
        registry: &Registry,
        uri: &str,
        account: &str,
        password: &str,
    ) -> Result<Self, RpcError> {
        let gateway = registry.lookup(uri)?;
        let Some(service) = gateway.get_remote_service(account, password)? else {
            return Err(RpcError::AuthenticationError(format!(
                "gateway at {uri} refused account {account}"
            )));
        };
        let privileges = if service.validate_account(account, password, Privileges::EVALUATE)? {
            Privileges::ACCESS | Privileges::EVALUATE
        } else {
            Privileges::ACCESS
        };
        let session = SessionInfo::new(&Uuid::new_v4().to_string(), account, privileges);
        info!(uri, account, %privileges, "Bound in-process service");
        Ok(Self::from_service(service, session))
    }

    /// Wrap an already-authorised service reference.
    pub fn from_service(service: Arc<dyn Service>, session: SessionInfo) -> Self {
        Self {
            service: Some(service),
            session,
        }
    }

    pub fn session(&self) -> &SessionInfo {
        &self.session
    }
}

impl Transport for RemoteTransport {
    fn send(&mut self, request: Request) -> Result<Response, RpcError> {
        let service = self.service.as_ref().ok_or(RpcError::NotConnected)?;
        let response = dispatch(service.as_ref(), &self.session, &request);
        if matches!(request.body, RequestBody::Quit) {
            self.close();
        }
        Ok(response)
    }

    fn close(&mut self) {
        if self.service.take().is_some() {
            debug!(account = %self.session.account_name, "Released in-process service");
        }
    }

    fn is_open(&self) -> bool {
        self.service.is_some()
    }
}

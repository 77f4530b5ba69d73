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

//! Blocking client side of the protocol. Every channel implements [`Transport`]; pick one
//! explicitly or let [`connect`] choose from the URI scheme in a [`ConnectInfo`].

use rpc_common::{ConnectInfo, Registry, Request, Response, RpcError, Scheme, gateway_uri};
use tracing::info;

pub use remote_transport::RemoteTransport;
pub use service_client::ServiceClient;
pub use socket_connection::SocketConnection;
pub use socket_wrapper::SocketWrapper;
pub use status_follower::StatusFollower;

mod remote_transport;
mod service_client;
mod socket_connection;
mod socket_wrapper;
mod status_follower;
mod wire;

/// One request in, one response out.
pub trait Transport: Send {
    fn send(&mut self, request: Request) -> Result<Response, RpcError>;

    /// Release the channel. Further sends fail with `NotConnected`.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, request: Request) -> Result<Response, RpcError> {
        (**self).send(request)
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }
}

/// Open an authenticated transport to the server named by `info.connect_uri`.
///
/// `hdp://` opens a socket session; `local://` binds to a gateway registered in `registry`.
pub fn connect(info: &ConnectInfo, registry: &Registry) -> Result<Box<dyn Transport>, RpcError> {
    let endpoint = info.endpoint()?;
    info!(%endpoint, account = %info.account, "Connecting");
    match endpoint.scheme {
        Scheme::Socket => Ok(Box::new(SocketConnection::open(info)?)),
        Scheme::Local => {
            let uri = gateway_uri(Scheme::Local, &endpoint.host, endpoint.port);
            Ok(Box::new(RemoteTransport::bind(
                registry,
                &uri,
                &info.account,
                &info.password,
            )?))
        }
    }
}

/// Convenience: [`connect`] wrapped in a [`ServiceClient`].
pub fn connect_service(
    info: &ConnectInfo,
    registry: &Registry,
) -> Result<ServiceClient<Box<dyn Transport>>, RpcError> {
    Ok(ServiceClient::new(connect(info, registry)?))
}

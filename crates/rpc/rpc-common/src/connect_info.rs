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

use crate::RpcError;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use strum::{Display, EnumString};

/// Transport family named by a URI scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Scheme {
    /// Line-oriented socket protocol.
    #[strum(serialize = "hdp")]
    Socket,
    /// In-process binding through a naming registry.
    #[strum(serialize = "local")]
    Local,
}

/// Parsed `scheme://host:port[/path]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    pub path: Option<String>,
}

impl Endpoint {
    pub fn parse(uri: &str) -> Result<Self, RpcError> {
        let bad = |why: &str| RpcError::CouldNotConnect(format!("invalid URI {uri:?}: {why}"));
        let (scheme, rest) = uri.split_once("://").ok_or_else(|| bad("missing scheme"))?;
        let scheme = Scheme::from_str(scheme).map_err(|_| bad("unknown scheme"))?;
        let (authority, path) = match rest.split_once('/') {
            Some((authority, path)) if !path.is_empty() => (authority, Some(path.to_string())),
            Some((authority, _)) => (authority, None),
            None => (rest, None),
        };
        let (host, port) = authority
            .rsplit_once(':')
            .ok_or_else(|| bad("missing port"))?;
        if host.is_empty() {
            return Err(bad("missing host"));
        }
        let port = port.parse::<u16>().map_err(|_| bad("invalid port"))?;
        Ok(Self {
            scheme,
            host: host.to_string(),
            port,
            path,
        })
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)?;
        if let Some(path) = &self.path {
            write!(f, "/{path}")?;
        }
        Ok(())
    }
}

/// Everything a client needs to reach a server and follow its status.
#[derive(Clone)]
pub struct ConnectInfo {
    pub account: String,
    pub password: String,
    pub connect_uri: String,
    /// Where the client exports itself for push notifications, if it does.
    pub bind_uri: Option<String>,
    /// Poll for status changes instead of registering a listener.
    pub pull_mode: bool,
    /// Polling interval in pull mode.
    pub period: Duration,
    /// Connect and read timeout for socket transports.
    pub timeout: Duration,
    /// Address the server should use to reach this client, if not the obvious one.
    pub global_address: Option<String>,
}

impl ConnectInfo {
    pub fn new(connect_uri: &str, account: &str, password: &str) -> Self {
        Self {
            account: account.to_string(),
            password: password.to_string(),
            connect_uri: connect_uri.to_string(),
            bind_uri: None,
            pull_mode: false,
            period: Duration::from_secs(5),
            timeout: Duration::from_secs(30),
            global_address: None,
        }
    }

    pub fn with_pull_mode(mut self, period: Duration) -> Self {
        self.pull_mode = true;
        self.period = period;
        self
    }

    pub fn endpoint(&self) -> Result<Endpoint, RpcError> {
        Endpoint::parse(&self.connect_uri)
    }
}

impl fmt::Debug for ConnectInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectInfo")
            .field("account", &self.account)
            .field("password", &"<redacted>")
            .field("connect_uri", &self.connect_uri)
            .field("bind_uri", &self.bind_uri)
            .field("pull_mode", &self.pull_mode)
            .field("period", &self.period)
            .field("timeout", &self.timeout)
            .field("global_address", &self.global_address)
            .finish()
    }
}

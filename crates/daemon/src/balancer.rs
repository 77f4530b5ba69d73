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

//! Spreads sessions across several servers. Servers are bound through their gateways with admin
//! credentials; each session goes to whichever running server has the fewest requests in flight.

use reco_common::{ActiveMeasure, least_busy};
use rpc_common::{Gateway, Registry, RpcError, Server, Service};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

struct BoundServer {
    uri: String,
    server: Arc<dyn Server>,
    gateway: Arc<dyn Gateway>,
}

#[derive(Default)]
pub struct Balancer {
    bound: RwLock<Vec<BoundServer>>,
}

fn poisoned() -> RpcError {
    RpcError::Remote("balancer lock poisoned".to_string())
}

impl Balancer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the server whose gateway is registered at `uri`. A binding that no longer answers
    /// pings is replaced; a live one is kept. Returns false if the gateway refused the account.
    pub fn bind(
        &self,
        registry: &Registry,
        uri: &str,
        account: &str,
        password: &str,
    ) -> Result<bool, RpcError> {
        let mut bound = self.bound.write().map_err(|_| poisoned())?;
        if let Some(index) = bound.iter().position(|b| b.uri == uri) {
            if bound[index].server.ping().unwrap_or(false) {
                debug!(uri, "Server already bound");
                return Ok(true);
            }
            warn!(uri, "Replacing dead binding");
            bound.remove(index);
        }

        let gateway = registry.lookup(uri)?;
        let Some(server) = gateway.get_remote_server(account, password)? else {
            warn!(uri, account, "Gateway refused balancer binding");
            return Ok(false);
        };
        bound.push(BoundServer {
            uri: uri.to_string(),
            server,
            gateway,
        });
        info!(uri, servers = bound.len(), "Bound server");
        Ok(true)
    }

    /// Bind a server living in this process, skipping the credential check.
    pub fn attach(
        &self,
        uri: &str,
        server: Arc<dyn Server>,
        gateway: Arc<dyn Gateway>,
    ) -> Result<(), RpcError> {
        let mut bound = self.bound.write().map_err(|_| poisoned())?;
        bound.retain(|b| b.uri != uri);
        bound.push(BoundServer {
            uri: uri.to_string(),
            server,
            gateway,
        });
        info!(uri, servers = bound.len(), "Attached server");
        Ok(())
    }

    pub fn unbind(&self, uri: &str) -> bool {
        let Ok(mut bound) = self.bound.write() else {
            return false;
        };
        let before = bound.len();
        bound.retain(|b| b.uri != uri);
        before != bound.len()
    }

    pub fn len(&self) -> usize {
        self.bound.read().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// URI of the running server with the fewest requests in flight. Earlier bindings win ties.
    pub fn idle_server(&self) -> Result<Option<String>, RpcError> {
        Ok(self.pick()?.map(|(uri, _)| uri))
    }

    fn pick(&self) -> Result<Option<(String, Arc<dyn Gateway>)>, RpcError> {
        let bound = self.bound.read().map_err(|_| poisoned())?;
        let candidates: Vec<(&BoundServer, Arc<ActiveMeasure>)> = bound
            .iter()
            .filter(|b| b.server.is_running().unwrap_or(false))
            .filter_map(|b| b.server.active_measure().ok().map(|m| (b, m)))
            .collect();
        let Some(idle) = least_busy(candidates.iter().map(|(_, m)| m.as_ref())) else {
            return Ok(None);
        };
        Ok(candidates
            .iter()
            .find(|(_, m)| std::ptr::eq(m.as_ref(), idle))
            .map(|(b, _)| (b.uri.clone(), b.gateway.clone())))
    }
}

impl Gateway for Balancer {
    fn get_remote_server(
        &self,
        account: &str,
        password: &str,
    ) -> Result<Option<Arc<dyn Server>>, RpcError> {
        match self.pick()? {
            Some((_, gateway)) => gateway.get_remote_server(account, password),
            None => Ok(None),
        }
    }

    fn get_remote_service(
        &self,
        account: &str,
        password: &str,
    ) -> Result<Option<Arc<dyn Service>>, RpcError> {
        let Some((uri, gateway)) = self.pick()? else {
            warn!(account, "No running server to balance onto");
            return Ok(None);
        };
        debug!(%uri, account, "Balancing session");
        gateway.get_remote_service(account, password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_server;
    use rpc_common::{ControlCommand, Scheme, gateway_uri};

    fn bound_pair() -> (Balancer, Registry, Vec<(String, Arc<crate::PowerServer>)>) {
        let registry = Registry::new();
        let balancer = Balancer::new();
        let mut servers = vec![];
        for port in [20000, 20010] {
            let server = test_server();
            server.control(ControlCommand::Start).unwrap();
            let uri = gateway_uri(Scheme::Local, "localhost", port);
            registry.bind(&uri, server.gateway()).unwrap();
            assert!(balancer.bind(&registry, &uri, "root", "secret").unwrap());
            servers.push((uri, server));
        }
        (balancer, registry, servers)
    }

    #[test]
    fn test_bind_needs_admin() {
        let registry = Registry::new();
        let server = test_server();
        let uri = gateway_uri(Scheme::Local, "localhost", 20000);
        registry.bind(&uri, server.gateway()).unwrap();

        let balancer = Balancer::new();
        assert!(!balancer.bind(&registry, &uri, "reader", "pw").unwrap());
        assert!(balancer.is_empty());
        assert!(balancer.bind(&registry, &uri, "root", "secret").unwrap());
        // Binding a live server again does not duplicate it.
        assert!(balancer.bind(&registry, &uri, "root", "secret").unwrap());
        assert_eq!(balancer.len(), 1);
        assert!(balancer.unbind(&uri));
        assert!(balancer.is_empty());
    }

    #[test]
    fn test_attach_replaces_binding() {
        let balancer = Balancer::new();
        let uri = gateway_uri(Scheme::Local, "localhost", 20000);
        for _ in 0..2 {
            let server = test_server();
            server.control(ControlCommand::Start).unwrap();
            balancer
                .attach(&uri, server.clone(), server.gateway())
                .unwrap();
        }
        assert_eq!(balancer.len(), 1);
        assert_eq!(balancer.idle_server().unwrap(), Some(uri));
    }

    #[test]
    fn test_picks_least_busy_running_server() {
        let (balancer, _registry, servers) = bound_pair();
        let (first, second) = (&servers[0], &servers[1]);
        assert_eq!(balancer.idle_server().unwrap(), Some(first.0.clone()));

        let _busy = first.1.measure().enter();
        assert_eq!(balancer.idle_server().unwrap(), Some(second.0.clone()));

        second.1.control(ControlCommand::Pause).unwrap();
        assert_eq!(balancer.idle_server().unwrap(), Some(first.0.clone()));

        first.1.control(ControlCommand::Stop).unwrap();
        assert_eq!(balancer.idle_server().unwrap(), None);
        assert!(balancer.get_remote_service("reader", "pw").unwrap().is_none());
    }

    #[test]
    fn test_sessions_land_on_the_idle_server() {
        let (balancer, _registry, servers) = bound_pair();
        let _busy = servers[0].1.measure().enter();

        let service = balancer.get_remote_service("reader", "pw").unwrap().unwrap();
        let ratings = reco_common::model::RatingVector::user(5).with_rating(1, 2.0);
        assert!(service.insert_rating(&ratings).unwrap());
        assert!(servers[0].1.service().get_user_ids().unwrap().is_none());
        assert_eq!(
            servers[1].1.service().get_user_ids().unwrap().unwrap().rows(),
            &[5]
        );
        assert!(balancer.get_remote_service("reader", "wrong").unwrap().is_none());
    }
}

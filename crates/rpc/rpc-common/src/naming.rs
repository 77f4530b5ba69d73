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

//! Naming registry for in-process bindings. Servers register their gateway under a URI and
//! clients in the same process look it up, the way a remote-object registry would.

use crate::{Gateway, RpcError, Scheme};
use reco_common::GATEWAY;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// URI a gateway is registered under, e.g. `local://localhost:10151/gateway`.
pub fn gateway_uri(scheme: Scheme, host: &str, port: u16) -> String {
    format!("{scheme}://{host}:{port}/{GATEWAY}")
}

#[derive(Default)]
pub struct Registry {
    bindings: RwLock<HashMap<String, Arc<dyn Gateway>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `gateway` under `uri`. Fails if something is already bound there.
    pub fn bind(&self, uri: &str, gateway: Arc<dyn Gateway>) -> Result<(), RpcError> {
        let mut bindings = self
            .bindings
            .write()
            .map_err(|_| RpcError::Remote("naming registry poisoned".to_string()))?;
        if bindings.contains_key(uri) {
            return Err(RpcError::Remote(format!("{uri} is already bound")));
        }
        bindings.insert(uri.to_string(), gateway);
        info!(uri, "Bound gateway");
        Ok(())
    }

    pub fn lookup(&self, uri: &str) -> Result<Arc<dyn Gateway>, RpcError> {
        let bindings = self
            .bindings
            .read()
            .map_err(|_| RpcError::Remote("naming registry poisoned".to_string()))?;
        bindings
            .get(uri)
            .cloned()
            .ok_or_else(|| RpcError::Remote(format!("nothing bound at {uri}")))
    }

    /// Remove the binding at `uri`, returning whether one existed.
    pub fn unbind(&self, uri: &str) -> bool {
        let Ok(mut bindings) = self.bindings.write() else {
            return false;
        };
        let removed = bindings.remove(uri).is_some();
        debug!(uri, removed, "Unbind gateway");
        removed
    }

    pub fn is_bound(&self, uri: &str) -> bool {
        self.bindings
            .read()
            .map(|b| b.contains_key(uri))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Server, Service};

    struct DenyAll;

    impl Gateway for DenyAll {
        fn get_remote_server(
            &self,
            _account: &str,
            _password: &str,
        ) -> Result<Option<Arc<dyn Server>>, RpcError> {
            Ok(None)
        }

        fn get_remote_service(
            &self,
            _account: &str,
            _password: &str,
        ) -> Result<Option<Arc<dyn Service>>, RpcError> {
            Ok(None)
        }
    }

    #[test]
    fn test_bind_lookup_unbind() {
        let registry = Registry::new();
        let uri = gateway_uri(Scheme::Local, "localhost", 10151);
        assert_eq!(uri, "local://localhost:10151/gateway");
        assert!(matches!(registry.lookup(&uri), Err(RpcError::Remote(_))));

        registry.bind(&uri, Arc::new(DenyAll)).unwrap();
        assert!(registry.is_bound(&uri));
        assert!(registry.bind(&uri, Arc::new(DenyAll)).is_err());

        let gateway = registry.lookup(&uri).unwrap();
        assert!(gateway.get_remote_service("a", "b").unwrap().is_none());

        assert!(registry.unbind(&uri));
        assert!(!registry.unbind(&uri));
        assert!(!registry.is_bound(&uri));
    }
}

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

use reco_common::model::EvaluatorRef;
use rpc_common::Scheme;
use std::collections::BTreeMap;
use std::sync::RwLock;
use tracing::debug;

/// Evaluators the server advertises, by name.
#[derive(Default)]
pub struct EvaluatorRegistry {
    evaluators: RwLock<BTreeMap<String, EvaluatorRef>>,
}

impl EvaluatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One evaluator per name, each bound under the evaluator port of `host`.
    pub fn with_names<S: AsRef<str>>(names: &[S], host: &str, port: u16) -> Self {
        let registry = Self::new();
        for name in names {
            let name = name.as_ref();
            registry.register(
                EvaluatorRef::new(name, env!("CARGO_PKG_VERSION"))
                    .bound_at(format!("{}://{host}:{port}/{name}", Scheme::Local)),
            );
        }
        registry
    }

    /// Register or replace. Returns true if an evaluator of that name was replaced.
    pub fn register(&self, evaluator: EvaluatorRef) -> bool {
        let Ok(mut evaluators) = self.evaluators.write() else {
            return false;
        };
        debug!(name = %evaluator.name, "Registered evaluator");
        evaluators
            .insert(evaluator.name.clone(), evaluator)
            .is_some()
    }

    pub fn get(&self, name: &str) -> Option<EvaluatorRef> {
        self.evaluators.read().ok()?.get(name).cloned()
    }

    /// Sorted by name.
    pub fn names(&self) -> Vec<String> {
        self.evaluators
            .read()
            .map(|e| e.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_registry() {
        let registry = EvaluatorRegistry::with_names(&["rmse", "mae"], "localhost", 10158);
        assert_eq!(registry.names(), vec!["mae".to_string(), "rmse".to_string()]);
        let rmse = registry.get("rmse").unwrap();
        assert_eq!(
            rmse.bind_uri.as_deref(),
            Some("local://localhost:10158/rmse")
        );
        assert!(registry.get("ndcg").is_none());
        assert!(registry.register(EvaluatorRef::new("rmse", "2")));
        assert_eq!(registry.get("rmse").unwrap().version, "2");
    }
}

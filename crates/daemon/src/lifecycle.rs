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

//! Server lifecycle state machine.
//!
//! ```text
//!            start            pause
//! Stopped ---------> Started -------> Paused
//!    ^                  |  ^             |
//!    |      stop        |  |   resume    v
//!    +------------------+  +-------- Resumed
//! ```
//!
//! `stop` is accepted from any started state, `exit` from any state but `Exited`, which is
//! terminal. Every accepted transition notifies all registered listeners, synchronously and in
//! registration order, before it returns. State, configuration and the listener list share one
//! lock, so observers never see a transition half-applied.

use reco_common::{ServerConfig, ServerStatus, ServerStatusEvent};
use rpc_common::{LifecycleError, ListenerId, RpcError, ServerStatusListener};
use std::sync::{Arc, Mutex, MutexGuard};
use strum::Display;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum State {
    Stopped,
    Started,
    Paused,
    Resumed,
    Exited,
}

impl State {
    pub fn is_started(self) -> bool {
        matches!(self, State::Started | State::Paused | State::Resumed)
    }

    pub fn is_paused(self) -> bool {
        self == State::Paused
    }

    pub fn is_running(self) -> bool {
        matches!(self, State::Started | State::Resumed)
    }
}

/// Side effects attached to transitions. Called with the lifecycle lock held, so hooks must not
/// call back into the lifecycle.
pub trait LifecycleHooks: Send + Sync {
    /// A failure aborts the start; the server stays stopped and nobody is notified.
    fn on_start(&self, config: &ServerConfig) -> Result<(), RpcError>;
    fn on_pause(&self);
    fn on_resume(&self, config: &ServerConfig);
    fn on_stop(&self);
    fn on_config(&self, _config: &ServerConfig) {}
}

struct Inner {
    state: State,
    config: ServerConfig,
    listeners: Vec<(ListenerId, Arc<dyn ServerStatusListener>)>,
    next_listener_id: u64,
}

impl Inner {
    fn notify(&mut self, event: ServerStatusEvent) {
        debug!(status = %event.status, listeners = self.listeners.len(), "Notifying status listeners");
        self.listeners.retain(|(id, listener)| {
            match listener.server_status_changed(&event) {
                Ok(()) => true,
                Err(e) => {
                    warn!(?id, status = %event.status, "Status listener failed, removing it: {}", e);
                    false
                }
            }
        });
    }
}

pub struct Lifecycle {
    inner: Mutex<Inner>,
    hooks: Arc<dyn LifecycleHooks>,
}

impl Lifecycle {
    pub fn new(config: ServerConfig, hooks: Arc<dyn LifecycleHooks>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: State::Stopped,
                config,
                listeners: vec![],
                next_listener_id: 0,
            }),
            hooks,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, RpcError> {
        self.inner
            .lock()
            .map_err(|_| RpcError::Remote("server state lock poisoned".to_string()))
    }

    fn live(&self) -> Result<MutexGuard<'_, Inner>, RpcError> {
        let inner = self.lock()?;
        if inner.state == State::Exited {
            return Err(LifecycleError::Exited.into());
        }
        Ok(inner)
    }

    pub fn state(&self) -> Result<State, RpcError> {
        Ok(self.lock()?.state)
    }

    pub fn start(&self) -> Result<(), RpcError> {
        let mut inner = self.live()?;
        if inner.state.is_started() {
            return Err(LifecycleError::AlreadyStarted.into());
        }
        self.hooks.on_start(&inner.config)?;
        inner.state = State::Started;
        info!(port = inner.config.ports.server, "Server started");
        inner.notify(ServerStatusEvent::new(ServerStatus::Started));
        Ok(())
    }

    pub fn pause(&self) -> Result<(), RpcError> {
        let mut inner = self.live()?;
        match inner.state {
            State::Stopped => return Err(LifecycleError::NotStarted.into()),
            State::Paused => return Err(LifecycleError::NotRunning.into()),
            _ => {}
        }
        self.hooks.on_pause();
        inner.state = State::Paused;
        info!("Server paused");
        inner.notify(ServerStatusEvent::new(ServerStatus::Paused));
        Ok(())
    }

    pub fn resume(&self) -> Result<(), RpcError> {
        let mut inner = self.live()?;
        if !inner.state.is_paused() {
            return Err(LifecycleError::NotPaused.into());
        }
        self.hooks.on_resume(&inner.config);
        inner.state = State::Resumed;
        info!("Server resumed");
        inner.notify(ServerStatusEvent::new(ServerStatus::Resumed));
        Ok(())
    }

    pub fn stop(&self) -> Result<(), RpcError> {
        let mut inner = self.live()?;
        if !inner.state.is_started() {
            return Err(LifecycleError::NotStarted.into());
        }
        self.stop_locked(&mut inner);
        Ok(())
    }

    fn stop_locked(&self, inner: &mut Inner) {
        self.hooks.on_stop();
        inner.state = State::Stopped;
        info!("Server stopped");
        inner.notify(ServerStatusEvent::new(ServerStatus::Stopped));
    }

    /// Stop if needed, then enter the terminal state. `shutdown_hook` marks an exit forced by
    /// process shutdown rather than requested by a client.
    pub fn exit(&self, shutdown_hook: bool) -> Result<(), RpcError> {
        let mut inner = self.live()?;
        if inner.state.is_started() {
            self.stop_locked(&mut inner);
        }
        inner.state = State::Exited;
        info!(shutdown_hook, "Server exited");
        inner.notify(ServerStatusEvent::new(ServerStatus::Exit).with_shutdown_hook(shutdown_hook));
        inner.listeners.clear();
        Ok(())
    }

    pub fn config(&self) -> Result<ServerConfig, RpcError> {
        Ok(self.lock()?.config.clone())
    }

    /// Replace the configuration. Only allowed while stopped.
    pub fn set_config(&self, config: ServerConfig) -> Result<(), RpcError> {
        let mut inner = self.live()?;
        if inner.state.is_started() {
            return Err(LifecycleError::ConfigWhileStarted.into());
        }
        self.hooks.on_config(&config);
        inner.config = config;
        info!("Server configuration replaced");
        inner.notify(ServerStatusEvent::new(ServerStatus::SetConfig));
        Ok(())
    }

    pub fn add_listener(
        &self,
        listener: Arc<dyn ServerStatusListener>,
    ) -> Result<ListenerId, RpcError> {
        let mut inner = self.live()?;
        let id = ListenerId(inner.next_listener_id);
        inner.next_listener_id += 1;
        inner.listeners.push((id, listener));
        debug!(?id, "Added status listener");
        Ok(id)
    }

    pub fn remove_listener(&self, id: ListenerId) -> Result<bool, RpcError> {
        let mut inner = self.lock()?;
        let before = inner.listeners.len();
        inner.listeners.retain(|(existing, _)| *existing != id);
        Ok(inner.listeners.len() != before)
    }

    pub fn listener_count(&self) -> usize {
        self.lock().map(|inner| inner.listeners.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct RecordingHooks {
        calls: Mutex<Vec<&'static str>>,
        fail_start: AtomicBool,
    }

    impl RecordingHooks {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl LifecycleHooks for RecordingHooks {
        fn on_start(&self, _config: &ServerConfig) -> Result<(), RpcError> {
            if self.fail_start.load(Ordering::SeqCst) {
                return Err(RpcError::Remote("backend unavailable".to_string()));
            }
            self.calls.lock().unwrap().push("start");
            Ok(())
        }
        fn on_pause(&self) {
            self.calls.lock().unwrap().push("pause");
        }
        fn on_resume(&self, _config: &ServerConfig) {
            self.calls.lock().unwrap().push("resume");
        }
        fn on_stop(&self) {
            self.calls.lock().unwrap().push("stop");
        }
        fn on_config(&self, _config: &ServerConfig) {
            self.calls.lock().unwrap().push("config");
        }
    }

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<(&'static str, ServerStatus)>>>,
    }

    impl ServerStatusListener for Recorder {
        fn server_status_changed(&self, event: &ServerStatusEvent) -> Result<(), RpcError> {
            self.log.lock().unwrap().push((self.name, event.status));
            Ok(())
        }
    }

    struct Broken;

    impl ServerStatusListener for Broken {
        fn server_status_changed(&self, _event: &ServerStatusEvent) -> Result<(), RpcError> {
            Err(RpcError::CouldNotSend("gone".to_string()))
        }
    }

    fn lifecycle() -> (Lifecycle, Arc<RecordingHooks>) {
        let hooks = Arc::new(RecordingHooks::default());
        (Lifecycle::new(ServerConfig::default(), hooks.clone()), hooks)
    }

    #[test]
    fn test_full_cycle_notifies_in_registration_order() {
        let (lifecycle, hooks) = lifecycle();
        let log = Arc::new(Mutex::new(vec![]));
        for name in ["first", "second"] {
            lifecycle
                .add_listener(Arc::new(Recorder {
                    name,
                    log: log.clone(),
                }))
                .unwrap();
        }

        lifecycle.start().unwrap();
        lifecycle.pause().unwrap();
        lifecycle.resume().unwrap();
        lifecycle.stop().unwrap();

        let expected: Vec<_> = [
            ServerStatus::Started,
            ServerStatus::Paused,
            ServerStatus::Resumed,
            ServerStatus::Stopped,
        ]
        .into_iter()
        .flat_map(|s| [("first", s), ("second", s)])
        .collect();
        assert_eq!(*log.lock().unwrap(), expected);
        assert_eq!(hooks.calls(), vec!["start", "pause", "resume", "stop"]);
    }

    #[test]
    fn test_illegal_transitions_are_silent() {
        let (lifecycle, hooks) = lifecycle();
        let log = Arc::new(Mutex::new(vec![]));
        lifecycle
            .add_listener(Arc::new(Recorder {
                name: "only",
                log: log.clone(),
            }))
            .unwrap();

        assert_eq!(lifecycle.stop(), Err(LifecycleError::NotStarted.into()));
        assert_eq!(lifecycle.pause(), Err(LifecycleError::NotStarted.into()));
        assert_eq!(lifecycle.resume(), Err(LifecycleError::NotPaused.into()));
        lifecycle.start().unwrap();
        assert_eq!(lifecycle.start(), Err(LifecycleError::AlreadyStarted.into()));
        assert_eq!(lifecycle.resume(), Err(LifecycleError::NotPaused.into()));
        lifecycle.pause().unwrap();
        assert_eq!(lifecycle.pause(), Err(LifecycleError::NotRunning.into()));

        assert_eq!(
            *log.lock().unwrap(),
            vec![("only", ServerStatus::Started), ("only", ServerStatus::Paused)]
        );
        assert_eq!(hooks.calls(), vec!["start", "pause"]);
    }

    #[test]
    fn test_stop_from_paused() {
        let (lifecycle, _) = lifecycle();
        lifecycle.start().unwrap();
        lifecycle.pause().unwrap();
        lifecycle.stop().unwrap();
        assert_eq!(lifecycle.state().unwrap(), State::Stopped);
    }

    #[test]
    fn test_exit_is_terminal() {
        let (lifecycle, hooks) = lifecycle();
        let log = Arc::new(Mutex::new(vec![]));
        lifecycle
            .add_listener(Arc::new(Recorder {
                name: "l",
                log: log.clone(),
            }))
            .unwrap();
        lifecycle.start().unwrap();
        lifecycle.exit(false).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                ("l", ServerStatus::Started),
                ("l", ServerStatus::Stopped),
                ("l", ServerStatus::Exit)
            ]
        );
        assert_eq!(hooks.calls(), vec!["start", "stop"]);
        assert_eq!(lifecycle.listener_count(), 0);

        let exited: Result<(), RpcError> = Err(LifecycleError::Exited.into());
        assert_eq!(lifecycle.start(), exited);
        assert_eq!(lifecycle.stop(), exited);
        assert_eq!(lifecycle.exit(false), exited);
        assert_eq!(lifecycle.set_config(ServerConfig::default()), exited);
        assert_eq!(lifecycle.state().unwrap(), State::Exited);
    }

    #[test]
    fn test_failed_start_stays_stopped() {
        let (lifecycle, hooks) = lifecycle();
        hooks.fail_start.store(true, Ordering::SeqCst);
        let log = Arc::new(Mutex::new(vec![]));
        lifecycle
            .add_listener(Arc::new(Recorder {
                name: "l",
                log: log.clone(),
            }))
            .unwrap();
        assert!(lifecycle.start().is_err());
        assert_eq!(lifecycle.state().unwrap(), State::Stopped);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_set_config_only_while_stopped() {
        let (lifecycle, hooks) = lifecycle();
        let config = ServerConfig::with_base_port(20000);
        lifecycle.set_config(config.clone()).unwrap();
        assert_eq!(lifecycle.config().unwrap(), config);

        lifecycle.start().unwrap();
        assert_eq!(
            lifecycle.set_config(ServerConfig::default()),
            Err(LifecycleError::ConfigWhileStarted.into())
        );
        assert_eq!(lifecycle.config().unwrap(), config);
        assert_eq!(hooks.calls(), vec!["config", "start"]);
    }

    #[test]
    fn test_failing_listener_is_removed() {
        let (lifecycle, _) = lifecycle();
        let log = Arc::new(Mutex::new(vec![]));
        lifecycle.add_listener(Arc::new(Broken)).unwrap();
        lifecycle
            .add_listener(Arc::new(Recorder {
                name: "ok",
                log: log.clone(),
            }))
            .unwrap();

        lifecycle.start().unwrap();
        assert_eq!(lifecycle.listener_count(), 1);
        lifecycle.stop().unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec![("ok", ServerStatus::Started), ("ok", ServerStatus::Stopped)]
        );
    }

    #[test]
    fn test_remove_listener() {
        let (lifecycle, _) = lifecycle();
        let log = Arc::new(Mutex::new(vec![]));
        let id = lifecycle
            .add_listener(Arc::new(Recorder {
                name: "l",
                log: log.clone(),
            }))
            .unwrap();
        assert!(lifecycle.remove_listener(id).unwrap());
        assert!(!lifecycle.remove_listener(id).unwrap());
        lifecycle.start().unwrap();
        assert!(log.lock().unwrap().is_empty());
    }
}

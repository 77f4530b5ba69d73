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

//! The server proper: a lifecycle wired to a backend, the account store, the active request
//! measure and the periodic task timer, plus the gateway clients authenticate through.

use crate::accounts::Accounts;
use crate::lifecycle::{Lifecycle, LifecycleHooks, State};
use crate::running::RunningService;
use crate::store::Backend;
use crate::tasks::PeriodicTasks;
use reco_common::{ActiveMeasure, Privileges, ServerConfig, ServerStatus, ServerStatusEvent};
use rpc_common::{
    ControlCommand, Gateway, LifecycleError, ListenerId, RpcError, Server, ServerStatusListener,
    Service,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

const SERVER_TASKS_THREAD: &str = "reco-server-tasks";

struct PowerHooks {
    backend: Arc<dyn Backend>,
    measure: Arc<ActiveMeasure>,
    tasks: Mutex<PeriodicTasks>,
}

impl PowerHooks {
    fn with_tasks(&self, f: impl FnOnce(&mut PeriodicTasks)) {
        match self.tasks.lock() {
            Ok(mut tasks) => f(&mut tasks),
            Err(_) => error!("Server task timer lock poisoned"),
        }
    }
}

impl LifecycleHooks for PowerHooks {
    fn on_start(&self, config: &ServerConfig) -> Result<(), RpcError> {
        self.backend.open(config)?;
        self.measure.reset();
        self.with_tasks(|tasks| tasks.start(config.tasks_period()));
        Ok(())
    }

    fn on_pause(&self) {
        self.with_tasks(|tasks| tasks.stop());
    }

    fn on_resume(&self, config: &ServerConfig) {
        self.with_tasks(|tasks| tasks.start(config.tasks_period()));
    }

    fn on_stop(&self) {
        self.with_tasks(|tasks| tasks.stop());
        self.backend.close();
        self.measure.reset();
    }

    fn on_config(&self, config: &ServerConfig) {
        self.backend.reconfigure(config);
    }
}

pub struct PowerServer {
    lifecycle: Lifecycle,
    accounts: Arc<Accounts>,
    measure: Arc<ActiveMeasure>,
    backend: Arc<dyn Backend>,
}

impl PowerServer {
    pub fn new(config: ServerConfig, accounts: Arc<Accounts>, backend: Arc<dyn Backend>) -> Self {
        let measure = Arc::new(ActiveMeasure::new());
        let task_backend = backend.clone();
        let hooks = PowerHooks {
            backend: backend.clone(),
            measure: measure.clone(),
            tasks: Mutex::new(PeriodicTasks::new(
                SERVER_TASKS_THREAD,
                Arc::new(move || task_backend.run_tasks()),
            )),
        };
        Self {
            lifecycle: Lifecycle::new(config, Arc::new(hooks)),
            accounts,
            measure,
            backend,
        }
    }

    pub fn state(&self) -> Result<State, RpcError> {
        self.lifecycle.state()
    }

    pub fn accounts(&self) -> &Arc<Accounts> {
        &self.accounts
    }

    pub fn measure(&self) -> &Arc<ActiveMeasure> {
        &self.measure
    }

    /// The bare backend. Running state and the measure are the caller's concern.
    pub fn service(&self) -> Arc<dyn Service> {
        self.backend.clone()
    }

    /// The backend behind the running-state gate, as handed to gateway clients.
    pub fn running_service(self: &Arc<Self>) -> Arc<dyn Service> {
        Arc::new(RunningService::new(self.clone()))
    }

    pub fn listener_count(&self) -> usize {
        self.lifecycle.listener_count()
    }

    pub fn control(&self, command: ControlCommand) -> Result<(), RpcError> {
        info!(%command, "Control command");
        match command {
            ControlCommand::Start => self.start(),
            ControlCommand::Stop => self.stop(),
            ControlCommand::Pause => self.pause(),
            ControlCommand::Resume => self.resume(),
            ControlCommand::Exit => self.exit(),
        }
    }

    /// Exit on process shutdown. Already exited is not an error here.
    pub fn shutdown(&self) {
        match self.lifecycle.exit(true) {
            Ok(()) | Err(RpcError::Lifecycle(LifecycleError::Exited)) => {}
            Err(e) => error!("Shutdown exit failed: {}", e),
        }
    }

    pub fn gateway(self: &Arc<Self>) -> Arc<dyn Gateway> {
        Arc::new(PowerGateway {
            server: self.clone(),
        })
    }
}

impl Server for PowerServer {
    fn start(&self) -> Result<(), RpcError> {
        self.lifecycle.start()
    }

    fn pause(&self) -> Result<(), RpcError> {
        self.lifecycle.pause()
    }

    fn resume(&self) -> Result<(), RpcError> {
        self.lifecycle.resume()
    }

    fn stop(&self) -> Result<(), RpcError> {
        self.lifecycle.stop()
    }

    fn exit(&self) -> Result<(), RpcError> {
        self.lifecycle.exit(false)
    }

    fn is_started(&self) -> Result<bool, RpcError> {
        Ok(self.state()?.is_started())
    }

    fn is_paused(&self) -> Result<bool, RpcError> {
        Ok(self.state()?.is_paused())
    }

    fn is_running(&self) -> Result<bool, RpcError> {
        Ok(self.state()?.is_running())
    }

    fn get_config(&self) -> Result<ServerConfig, RpcError> {
        self.lifecycle.config()
    }

    fn set_config(&self, config: ServerConfig) -> Result<(), RpcError> {
        self.lifecycle.set_config(config)
    }

    fn add_status_listener(
        &self,
        listener: Arc<dyn ServerStatusListener>,
    ) -> Result<ListenerId, RpcError> {
        self.lifecycle.add_listener(listener)
    }

    fn remove_status_listener(&self, id: ListenerId) -> Result<bool, RpcError> {
        self.lifecycle.remove_listener(id)
    }

    fn ping(&self) -> Result<bool, RpcError> {
        Ok(self.state()? != State::Exited)
    }

    fn active_measure(&self) -> Result<Arc<ActiveMeasure>, RpcError> {
        Ok(self.measure.clone())
    }
}

/// Trips the process kill switch once the server exits, however the exit was requested.
pub struct ExitSignal {
    kill_switch: Arc<AtomicBool>,
}

impl ExitSignal {
    pub fn new(kill_switch: Arc<AtomicBool>) -> Self {
        Self { kill_switch }
    }
}

impl ServerStatusListener for ExitSignal {
    fn server_status_changed(&self, event: &ServerStatusEvent) -> Result<(), RpcError> {
        if event.status == ServerStatus::Exit {
            info!(shutdown_hook = event.shutdown_hook, "Server exited, tripping kill switch");
            self.kill_switch.store(true, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// Hands out the server or its service to callers whose account holds the needed privileges.
struct PowerGateway {
    server: Arc<PowerServer>,
}

impl Gateway for PowerGateway {
    fn get_remote_server(
        &self,
        account: &str,
        password: &str,
    ) -> Result<Option<Arc<dyn Server>>, RpcError> {
        if !self
            .server
            .accounts
            .validate(account, password, Privileges::ADMIN)
        {
            warn!(account, "Gateway refused server access");
            return Ok(None);
        }
        Ok(Some(self.server.clone() as Arc<dyn Server>))
    }

    fn get_remote_service(
        &self,
        account: &str,
        password: &str,
    ) -> Result<Option<Arc<dyn Service>>, RpcError> {
        if !self
            .server
            .accounts
            .validate(account, password, Privileges::ACCESS)
        {
            warn!(account, "Gateway refused service access");
            return Ok(None);
        }
        if !self.server.is_running()? {
            warn!(account, "Gateway refused service access, server not running");
            return Ok(None);
        }
        Ok(Some(self.server.running_service()))
    }
}

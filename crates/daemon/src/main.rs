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

use ::tracing::{info, warn};
use argon2::Params;
use clap::Parser;
use eyre::{Report, eyre};
use mimalloc::MiMalloc;
use reco_common::tracing;
use reco_daemon::accounts::Accounts;
use reco_daemon::args::Args;
use reco_daemon::balancer::Balancer;
use reco_daemon::evaluators::EvaluatorRegistry;
use reco_daemon::rpc::{Listeners, SocketKind};
use reco_daemon::store::MemoryService;
use reco_daemon::{ExitSignal, PowerServer};
use rpc_common::{Registry, Scheme, Server, gateway_uri};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const KILL_SWITCH_POLL: Duration = Duration::from_millis(100);
const RUNTIME_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Host for the recommendation server.
///   * Loads accounts and the in-memory store
///   * Binds the in-process gateway
///   * Serves the service and control sockets until told to exit
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let args = Args::parse();
    tracing::init_tracing(args.debug).map_err(|e| eyre!("Unable to configure logging: {}", e))?;

    let config = args.load_config()?;
    if config.accounts.is_empty() {
        warn!("No accounts configured; no client will be able to authenticate");
    }
    let server_config = config.server.clone();
    let host = server_config.host.clone();
    let ports = server_config.ports;

    let accounts = Arc::new(Accounts::from_config(&config.accounts, Params::default())?);
    let evaluators = Arc::new(EvaluatorRegistry::with_names(
        &config.evaluators,
        &host,
        ports.evaluator,
    ));
    let backend = Arc::new(MemoryService::new(
        server_config.clone(),
        accounts.clone(),
        evaluators,
    ));
    let server = Arc::new(PowerServer::new(server_config, accounts, backend));

    let registry = Registry::new();
    let local_gateway = gateway_uri(Scheme::Local, &host, ports.server);
    registry.bind(&local_gateway, server.gateway())?;

    let balancer = Arc::new(Balancer::new());
    balancer.attach(&local_gateway, server.clone(), server.gateway())?;
    let balancer_gateway = gateway_uri(Scheme::Local, &host, ports.balancer);
    registry.bind(&balancer_gateway, balancer)?;

    // Tripped by signals, or by the server exiting on a client's request.
    let kill_switch = Arc::new(AtomicBool::new(false));
    server.add_status_listener(Arc::new(ExitSignal::new(kill_switch.clone())))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("reco-rpc")
        .build()?;
    let mut listeners = Listeners::new(server.clone());
    runtime.block_on(async {
        listeners
            .listen(SocketKind::Service, &format!("{host}:{}", ports.server))
            .await?;
        listeners
            .listen(
                SocketKind::Control,
                &format!("{host}:{}", ports.socket_control),
            )
            .await
    })?;

    if config.auto_start {
        server.start()?;
    } else {
        info!("Auto-start disabled; waiting for a start command on the control socket");
    }

    signal_hook::flag::register(signal_hook::consts::SIGTERM, kill_switch.clone())?;
    signal_hook::flag::register(signal_hook::consts::SIGINT, kill_switch.clone())?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        service_port = ports.server,
        control_port = ports.socket_control,
        gateway = %local_gateway,
        balancer = %balancer_gateway,
        "Daemon started. Listening for requests."
    );

    while !kill_switch.load(Ordering::Relaxed) {
        std::thread::sleep(KILL_SWITCH_POLL);
    }
    warn!("Kill switch activated. Departing...");

    server.shutdown();
    listeners.terminate();
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_GRACE);
    registry.unbind(&balancer_gateway);
    registry.unbind(&local_gateway);

    info!("Done.");
    Ok(())
}

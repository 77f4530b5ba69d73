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

//! The daemon's socket listeners driven end to end by the blocking client.

use pretty_assertions::assert_eq;
use reco_common::model::{RatingVector, RecommendParam};
use reco_common::{Privileges, ServerConfig, ServerStatus, ServerStatusEvent};
use reco_daemon::accounts::Accounts;
use reco_daemon::evaluators::EvaluatorRegistry;
use reco_daemon::lifecycle::State;
use reco_daemon::power_server::PowerServer;
use reco_daemon::rpc::{Listeners, SocketKind};
use reco_daemon::store::MemoryService;
use rpc_common::request_builders::*;
use rpc_common::{
    ConnectInfo, ControlCommand, LifecycleError, PEER_ADDRESS_ATTRIBUTE, Registry, RpcError,
    RpcMessageError, Scheme, Server, ServerStatusListener, Service, gateway_uri,
};
use rpc_sync_client::{
    ServiceClient, SocketConnection, SocketWrapper, StatusFollower, Transport, connect_service,
};
use std::collections::BTreeSet;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

const TIMEOUT: Duration = Duration::from_secs(5);

struct Harness {
    server: Arc<PowerServer>,
    listeners: Listeners,
    service_addr: String,
    control_addr: String,
    // Dropped last, taking the listener tasks with it.
    _runtime: Runtime,
}

impl Harness {
    fn new() -> Self {
        Self::with_workers(2)
    }

    fn with_workers(workers: usize) -> Self {
        let accounts = Arc::new(Accounts::with_params(Accounts::minimal_params()));
        accounts
            .add("root", "secret", Privileges::ADMIN | Privileges::ACCESS)
            .unwrap();
        accounts.add("reader", "pw", Privileges::ACCESS).unwrap();
        accounts
            .add("scorer", "pw", Privileges::ACCESS | Privileges::EVALUATE)
            .unwrap();
        let config = ServerConfig {
            server_tasks_period: 0,
            ..ServerConfig::default()
        };
        let backend = Arc::new(MemoryService::new(
            config.clone(),
            accounts.clone(),
            Arc::new(EvaluatorRegistry::with_names(&["rmse"], "localhost", 10158)),
        ));
        let server = Arc::new(PowerServer::new(config, accounts, backend));

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(workers)
            .enable_all()
            .build()
            .unwrap();
        let mut listeners = Listeners::new(server.clone());
        let (service_addr, control_addr) = runtime.block_on(async {
            let service = listeners
                .listen(SocketKind::Service, "127.0.0.1:0")
                .await
                .unwrap();
            let control = listeners
                .listen(SocketKind::Control, "127.0.0.1:0")
                .await
                .unwrap();
            (service.to_string(), control.to_string())
        });
        Self {
            server,
            listeners,
            service_addr,
            control_addr,
            _runtime: runtime,
        }
    }

    fn started() -> Self {
        let harness = Self::new();
        harness.server.control(ControlCommand::Start).unwrap();
        harness
    }

    fn connect(&self, account: &str, password: &str, privileges: Privileges) -> SocketConnection {
        let mut connection = SocketConnection::connect(&self.service_addr, TIMEOUT).unwrap();
        connection
            .authenticate(account, password, privileges)
            .unwrap();
        connection
    }

    fn control(&self) -> SocketWrapper {
        SocketWrapper::new(&self.control_addr, TIMEOUT)
    }

    fn server(&self) -> Arc<dyn Server> {
        self.server.clone()
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.listeners.terminate();
    }
}

#[test]
fn test_authenticated_session_round_trip() {
    let harness = Harness::started();
    let client = ServiceClient::new(harness.connect("reader", "pw", Privileges::ACCESS));

    let ratings = RatingVector::user(1).with_rating(10, 4.0).with_rating(11, 2.0);
    assert!(client.insert_rating(&ratings).unwrap());

    let stored = client.get_user_rating(1).unwrap().unwrap();
    assert_eq!(stored, ratings);
    let ids = client.get_user_ids().unwrap().unwrap();
    assert_eq!(ids.rows(), &[1]);

    let peer = client.get_session_attribute(PEER_ADDRESS_ATTRIBUTE).unwrap();
    assert!(peer.is_some());

    client.close();
    assert!(!client.is_open());
}

#[test]
fn test_rejected_credentials_leave_session_unauthenticated() {
    let harness = Harness::started();
    let mut connection = SocketConnection::connect(&harness.service_addr, TIMEOUT).unwrap();
    let result = connection.authenticate("reader", "wrong", Privileges::ACCESS);
    assert!(matches!(result, Err(RpcError::AuthenticationError(_))));
    assert!(!connection.is_authenticated());
    assert!(matches!(
        connection.send(mk_get_user_ids_request()),
        Err(RpcError::NotAuthenticated)
    ));

    // The same connection may try again.
    connection
        .authenticate("reader", "pw", Privileges::ACCESS)
        .unwrap();
    assert!(connection.is_authenticated());
}

#[test]
fn test_requests_before_authentication_are_refused_by_the_server() {
    let harness = Harness::started();
    let mut stream = TcpStream::connect(&harness.service_addr).unwrap();
    stream.set_read_timeout(Some(TIMEOUT)).unwrap();
    let mut reader = BufReader::new(stream.try_clone().unwrap());

    let mut exchange = |line: &str| {
        stream.write_all(line.as_bytes()).unwrap();
        stream.write_all(b"\n").unwrap();
        let mut reply = String::new();
        reader.read_line(&mut reply).unwrap();
        rpc_common::codec::decode_response(reply.trim_end()).unwrap()
    };

    let request = rpc_common::codec::encode_request(&mk_get_user_ids_request()).unwrap();
    assert_eq!(
        exchange(&request),
        rpc_common::Response::Failure(RpcMessageError::NotAuthenticated)
    );

    // Garbage gets a failure line and the connection stays usable.
    assert!(matches!(
        exchange("{not json"),
        rpc_common::Response::Failure(RpcMessageError::InvalidRequest(_))
    ));
    let quit = rpc_common::codec::encode_request(&mk_quit_request()).unwrap();
    assert_eq!(exchange(&quit), rpc_common::Response::Empty);
}

#[test]
fn test_service_requests_need_a_running_server() {
    let harness = Harness::new();
    let client = ServiceClient::new(harness.connect("reader", "pw", Privileges::ACCESS));
    assert!(matches!(
        client.get_user_ids(),
        Err(RpcError::Failure(RpcMessageError::NotRunning))
    ));

    harness.server.control(ControlCommand::Start).unwrap();
    assert_eq!(client.get_user_ids().unwrap(), None);

    harness.server.control(ControlCommand::Pause).unwrap();
    assert!(matches!(
        client.get_user_ids(),
        Err(RpcError::Failure(RpcMessageError::NotRunning))
    ));
}

#[test]
fn test_control_over_the_service_socket_needs_admin() {
    let harness = Harness::new();
    let mut reader = harness.connect("reader", "pw", Privileges::ACCESS);
    assert!(matches!(
        reader.send(mk_control_request(ControlCommand::Start)).unwrap().into_bool(),
        Err(RpcError::Failure(RpcMessageError::PermissionDenied))
    ));
    assert_eq!(harness.server.state().unwrap(), State::Stopped);

    let mut root = harness.connect("root", "secret", Privileges::ADMIN);
    let started = root
        .send(mk_control_request(ControlCommand::Start))
        .unwrap()
        .into_bool()
        .unwrap();
    assert!(started);
    assert_eq!(harness.server.state().unwrap(), State::Started);

    assert!(matches!(
        root.send(mk_control_request(ControlCommand::Start)).unwrap().into_bool(),
        Err(RpcError::Lifecycle(LifecycleError::AlreadyStarted))
    ));
}

#[test]
fn test_control_socket_drives_lifecycle_and_listeners() {
    let harness = Harness::new();
    let follower = StatusFollower::push(harness.server()).unwrap();
    let control = harness.control();

    assert!(!control.control(ControlCommand::Start, "root", "wrong").unwrap());
    assert_eq!(harness.server.state().unwrap(), State::Stopped);

    for command in [
        ControlCommand::Start,
        ControlCommand::Pause,
        ControlCommand::Resume,
        ControlCommand::Stop,
    ] {
        assert!(control.control(command, "root", "secret").unwrap());
    }

    let statuses: Vec<ServerStatus> = std::iter::from_fn(|| follower.recv_timeout(TIMEOUT))
        .take(4)
        .map(|e| e.status)
        .collect();
    assert_eq!(
        statuses,
        vec![
            ServerStatus::Started,
            ServerStatus::Paused,
            ServerStatus::Resumed,
            ServerStatus::Stopped
        ]
    );
    assert!(follower.try_recv().is_none());
}

/// Holds up the pause notification until released.
struct StallingListener {
    entered: flume::Sender<()>,
    release: flume::Receiver<()>,
}

impl ServerStatusListener for StallingListener {
    fn server_status_changed(&self, event: &ServerStatusEvent) -> Result<(), RpcError> {
        if event.status == ServerStatus::Paused {
            let _ = self.entered.send(());
            let _ = self.release.recv_timeout(TIMEOUT);
        }
        Ok(())
    }
}

#[test]
fn test_blocked_request_does_not_stall_other_sessions() {
    let harness = Harness::with_workers(1);
    harness.server.control(ControlCommand::Start).unwrap();
    let (entered_tx, entered_rx) = flume::unbounded();
    let (release_tx, release_rx) = flume::unbounded();
    harness
        .server
        .add_status_listener(Arc::new(StallingListener {
            entered: entered_tx,
            release: release_rx,
        }))
        .unwrap();

    let control = harness.control();
    let pausing =
        std::thread::spawn(move || control.control(ControlCommand::Pause, "root", "secret"));
    entered_rx.recv_timeout(TIMEOUT).unwrap();

    // The only worker thread would be stuck in the pause if requests ran on it.
    let mut connection = harness.connect("reader", "pw", Privileges::ACCESS);
    assert!(connection.is_authenticated());

    release_tx.send(()).unwrap();
    assert!(pausing.join().unwrap().unwrap());
    assert_eq!(harness.server.state().unwrap(), State::Paused);
    connection.close();
}

#[test]
fn test_exit_is_terminal() {
    let harness = Harness::started();
    let follower = StatusFollower::push(harness.server()).unwrap();
    let control = harness.control();

    assert!(control.control(ControlCommand::Exit, "root", "secret").unwrap());
    let statuses: Vec<ServerStatus> = std::iter::from_fn(|| follower.recv_timeout(TIMEOUT))
        .take(2)
        .map(|e| e.status)
        .collect();
    assert_eq!(statuses, vec![ServerStatus::Stopped, ServerStatus::Exit]);

    assert!(!harness.server.ping().unwrap());
    assert!(matches!(
        control.control(ControlCommand::Start, "root", "secret"),
        Err(RpcError::Lifecycle(LifecycleError::Exited))
    ));
    assert_eq!(harness.server.listener_count(), 0);
}

#[test]
fn test_pull_follower_sees_polled_transitions() {
    let harness = Harness::new();
    let follower = StatusFollower::pull(harness.server(), Duration::from_millis(20)).unwrap();
    assert!(follower.is_pull());
    assert_eq!(harness.server.listener_count(), 0);

    harness.server.control(ControlCommand::Start).unwrap();
    assert_eq!(
        follower.recv_timeout(TIMEOUT).map(|e| e.status),
        Some(ServerStatus::Started)
    );
    harness.server.control(ControlCommand::Exit).unwrap();
    let rest: Vec<ServerStatus> = std::iter::from_fn(|| follower.recv_timeout(TIMEOUT))
        .map(|e| e.status)
        .collect();
    assert_eq!(rest.last(), Some(&ServerStatus::Exit));
}

#[test]
fn test_gateway_checks_credentials() {
    let harness = Harness::started();
    let registry = Registry::new();
    let uri = gateway_uri(Scheme::Local, "localhost", 10151);
    registry.bind(&uri, harness.server.gateway()).unwrap();
    let gateway = registry.lookup(&uri).unwrap();

    assert!(gateway.get_remote_server("root", "secret").unwrap().is_some());
    assert!(gateway.get_remote_server("root", "wrong").unwrap().is_none());
    assert!(gateway.get_remote_server("reader", "pw").unwrap().is_none());
    assert!(gateway.get_remote_service("reader", "pw").unwrap().is_some());
    assert!(gateway.get_remote_service("nobody", "pw").unwrap().is_none());

    harness.server.control(ControlCommand::Pause).unwrap();
    assert!(gateway.get_remote_service("reader", "pw").unwrap().is_none());
}

#[test]
fn test_local_and_socket_clients_share_one_store() {
    let harness = Harness::started();
    let registry = Registry::new();
    registry
        .bind(
            &gateway_uri(Scheme::Local, "localhost", 10151),
            harness.server.gateway(),
        )
        .unwrap();

    let local = connect_service(
        &ConnectInfo::new("local://localhost:10151", "reader", "pw"),
        &registry,
    )
    .unwrap();
    let remote = connect_service(
        &ConnectInfo::new(&format!("hdp://{}", harness.service_addr), "reader", "pw"),
        &registry,
    )
    .unwrap();

    local
        .insert_rating(&RatingVector::user(1).with_rating(10, 5.0).with_rating(11, 1.0))
        .unwrap();
    remote
        .insert_rating(&RatingVector::user(2).with_rating(10, 3.0))
        .unwrap();
    assert_eq!(remote.get_user_ids().unwrap().unwrap().rows(), &[1, 2]);
    assert_eq!(local.get_user_ids().unwrap().unwrap().rows(), &[1, 2]);

    let unknown = connect_service(
        &ConnectInfo::new("local://localhost:10151", "reader", "wrong"),
        &registry,
    );
    assert!(matches!(unknown, Err(RpcError::AuthenticationError(_))));
}

#[test]
fn test_recommendations_follow_the_rebuilt_model() {
    let harness = Harness::new();
    let service = harness.server.service();
    service
        .insert_rating(&RatingVector::user(1).with_rating(10, 5.0).with_rating(11, 1.0))
        .unwrap();
    service
        .insert_rating(&RatingVector::user(2).with_rating(10, 3.0).with_rating(12, 4.0))
        .unwrap();
    // Starting the server rebuilds the model from what is stored.
    harness.server.control(ControlCommand::Start).unwrap();

    let client = ServiceClient::new(harness.connect("reader", "pw", Privileges::ACCESS));
    let param = RecommendParam::new(RatingVector::user(3).with_rating(10, 4.0));
    let estimated = client
        .estimate(&param, &BTreeSet::from([11, 12]))
        .unwrap()
        .unwrap();
    assert_eq!(estimated.get(11).map(|r| r.value), Some(1.0));
    assert_eq!(estimated.get(12).map(|r| r.value), Some(4.0));

    let recommended = client.recommend_user(1, 0).unwrap().unwrap();
    assert_eq!(recommended.ids().collect::<Vec<_>>(), vec![12]);
}

#[test]
fn test_evaluator_handle_arrives_as_binary_frame() {
    let harness = Harness::started();
    let reader = ServiceClient::new(harness.connect("reader", "pw", Privileges::ACCESS));
    assert!(matches!(
        reader.get_evaluator("rmse"),
        Err(RpcError::Failure(RpcMessageError::PermissionDenied))
    ));

    let scorer = ServiceClient::new(harness.connect("scorer", "pw", Privileges::EVALUATE));
    let evaluator = scorer.get_evaluator("rmse").unwrap().unwrap();
    assert_eq!(evaluator.name, "rmse");
    assert_eq!(scorer.get_evaluator("missing").unwrap(), None);
    assert_eq!(scorer.get_evaluator_names().unwrap(), vec!["rmse".to_string()]);
}

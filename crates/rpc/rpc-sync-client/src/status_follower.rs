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

//! Follows a server's lifecycle, either by registering a listener (push) or by polling its state
//! (pull), and hands the resulting events out over a channel.

use flume::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use reco_common::{ServerStatus, ServerStatusEvent};
use rpc_common::{ConnectInfo, ListenerId, RpcError, Server, ServerStatusListener};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

struct ChannelListener {
    sender: Sender<ServerStatusEvent>,
}

impl ServerStatusListener for ChannelListener {
    fn server_status_changed(&self, event: &ServerStatusEvent) -> Result<(), RpcError> {
        self.sender
            .send(event.clone())
            .map_err(|_| RpcError::CouldNotSend("status follower has gone away".to_string()))
    }
}

enum Mode {
    Push {
        server: Arc<dyn Server>,
        listener_id: ListenerId,
    },
    Pull {
        stop: Option<Sender<()>>,
        poller: Option<JoinHandle<()>>,
    },
}

pub struct StatusFollower {
    events: Receiver<ServerStatusEvent>,
    mode: Mode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PolledState {
    started: bool,
    paused: bool,
}

impl PolledState {
    fn read(server: &dyn Server) -> Result<Self, RpcError> {
        Ok(Self {
            started: server.is_started()?,
            paused: server.is_paused()?,
        })
    }

    /// Events implied by moving from `self` to `next`, in the order the server would have sent them.
    fn transitions(self, next: PolledState) -> Vec<ServerStatus> {
        let mut statuses = vec![];
        match (self.started, next.started) {
            (false, true) => {
                statuses.push(ServerStatus::Started);
                if next.paused {
                    statuses.push(ServerStatus::Paused);
                }
            }
            (true, false) => statuses.push(ServerStatus::Stopped),
            (true, true) => match (self.paused, next.paused) {
                (false, true) => statuses.push(ServerStatus::Paused),
                (true, false) => statuses.push(ServerStatus::Resumed),
                _ => {}
            },
            (false, false) => {}
        }
        statuses
    }
}

impl StatusFollower {
    /// Choose push or pull according to `info.pull_mode`.
    pub fn follow(info: &ConnectInfo, server: Arc<dyn Server>) -> Result<Self, RpcError> {
        if info.pull_mode {
            Self::pull(server, info.period)
        } else {
            Self::push(server)
        }
    }

    /// Register a listener with `server`. Events arrive as the server emits them.
    pub fn push(server: Arc<dyn Server>) -> Result<Self, RpcError> {
        let (sender, events) = flume::unbounded();
        let listener_id = server.add_status_listener(Arc::new(ChannelListener { sender }))?;
        debug!(?listener_id, "Following server status (push)");
        Ok(Self {
            events,
            mode: Mode::Push {
                server,
                listener_id,
            },
        })
    }

    /// Poll `server` every `period` and synthesise events from observed state changes. A ping
    /// that fails or reports the server gone yields a final `Exit` event.
    pub fn pull(server: Arc<dyn Server>, period: Duration) -> Result<Self, RpcError> {
        let initial = PolledState::read(server.as_ref())?;
        let (sender, events) = flume::unbounded();
        let (stop, stop_rx) = flume::bounded::<()>(1);

        let poller = std::thread::Builder::new()
            .name("reco-status-poll".to_string())
            .spawn(move || poll_loop(server, period, initial, sender, stop_rx))
            .map_err(|e| RpcError::CouldNotConnect(format!("unable to spawn poller: {e}")))?;
        debug!(?period, "Following server status (pull)");
        Ok(Self {
            events,
            mode: Mode::Pull {
                stop: Some(stop),
                poller: Some(poller),
            },
        })
    }

    pub fn is_pull(&self) -> bool {
        matches!(self.mode, Mode::Pull { .. })
    }

    /// Wait up to `timeout` for the next event. `None` on timeout or once the source is gone.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ServerStatusEvent> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn try_recv(&self) -> Option<ServerStatusEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

fn poll_loop(
    server: Arc<dyn Server>,
    period: Duration,
    mut state: PolledState,
    sender: Sender<ServerStatusEvent>,
    stop: Receiver<()>,
) {
    loop {
        match stop.recv_timeout(period) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }

        match server.ping() {
            Ok(true) => {}
            Ok(false) | Err(_) => {
                info!("Server no longer answers ping; treating as exited");
                let _ = sender.send(ServerStatusEvent::new(ServerStatus::Exit));
                break;
            }
        }

        let next = match PolledState::read(server.as_ref()) {
            Ok(next) => next,
            Err(e) => {
                warn!("Unable to poll server state: {}", e);
                continue;
            }
        };
        for status in state.transitions(next) {
            if sender.send(ServerStatusEvent::new(status)).is_err() {
                return;
            }
        }
        state = next;
    }
}

impl Drop for StatusFollower {
    fn drop(&mut self) {
        match &mut self.mode {
            Mode::Push {
                server,
                listener_id,
            } => {
                if let Err(e) = server.remove_status_listener(*listener_id) {
                    debug!("Unable to remove status listener: {}", e);
                }
            }
            Mode::Pull { stop, poller } => {
                if let Some(stop) = stop.take() {
                    let _ = stop.send(());
                }
                if let Some(poller) = poller.take() {
                    let _ = poller.join();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(started: bool, paused: bool) -> PolledState {
        PolledState { started, paused }
    }

    #[test]
    fn test_transitions() {
        assert_eq!(
            state(false, false).transitions(state(true, false)),
            vec![ServerStatus::Started]
        );
        assert_eq!(
            state(true, false).transitions(state(true, true)),
            vec![ServerStatus::Paused]
        );
        assert_eq!(
            state(true, true).transitions(state(true, false)),
            vec![ServerStatus::Resumed]
        );
        assert_eq!(
            state(true, true).transitions(state(false, false)),
            vec![ServerStatus::Stopped]
        );
        assert_eq!(
            state(false, false).transitions(state(true, true)),
            vec![ServerStatus::Started, ServerStatus::Paused]
        );
        assert!(state(true, false).transitions(state(true, false)).is_empty());
    }
}

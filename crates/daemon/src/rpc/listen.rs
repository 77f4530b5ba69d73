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

use crate::power_server::PowerServer;
use crate::rpc::{Session, SocketKind};
use futures_util::StreamExt;
use rpc_common::Server;
use rpc_common::codec::MAX_LINE_LENGTH;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::select;
use tokio::sync::watch;
use tokio::time::error::Elapsed;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tracing::{debug, info, warn};

type RequestLines = FramedRead<OwnedReadHalf, LinesCodec>;

/// The server's socket listeners. Dropping this, or calling `terminate`, stops every accept
/// loop and closes every connection they opened.
pub struct Listeners {
    server: Arc<PowerServer>,
    terminate: watch::Sender<bool>,
    bound: HashMap<SocketKind, SocketAddr>,
}

impl Listeners {
    pub fn new(server: Arc<PowerServer>) -> Self {
        let (terminate, _) = watch::channel(false);
        Self {
            server,
            terminate,
            bound: HashMap::new(),
        }
    }

    /// Bind `addr` and start accepting connections on it. Returns the bound address, which
    /// differs from `addr` when port 0 was asked for.
    pub async fn listen(
        &mut self,
        kind: SocketKind,
        addr: &str,
    ) -> Result<SocketAddr, std::io::Error> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!(%kind, %local_addr, "Listening");
        self.bound.insert(kind, local_addr);

        // One task per listener.
        tokio::spawn(accept_loop(
            kind,
            listener,
            self.server.clone(),
            self.terminate.subscribe(),
        ));
        Ok(local_addr)
    }

    pub fn local_addr(&self, kind: SocketKind) -> Option<SocketAddr> {
        self.bound.get(&kind).copied()
    }

    pub fn terminate(&self) {
        info!(listeners = self.bound.len(), "Terminating listeners");
        self.terminate.send_replace(true);
    }
}

async fn accept_loop(
    kind: SocketKind,
    listener: TcpListener,
    server: Arc<PowerServer>,
    mut terminate: watch::Receiver<bool>,
) {
    loop {
        select! {
            _ = terminate.changed() => {
                info!(%kind, "Listener terminated, stopping...");
                break;
            }
            result = listener.accept() => {
                match result {
                    Ok((stream, peer_addr)) => {
                        tokio::spawn(serve_connection(
                            kind,
                            server.clone(),
                            stream,
                            peer_addr,
                            terminate.clone(),
                        ));
                    }
                    Err(e) => {
                        warn!(?e, %kind, "Accept failed, can't handle connection");
                    }
                }
            }
        }
    }
}

async fn next_line(
    lines: &mut RequestLines,
    idle: Option<Duration>,
) -> Result<Option<Result<String, LinesCodecError>>, Elapsed> {
    match idle {
        Some(idle) => tokio::time::timeout(idle, lines.next()).await,
        None => Ok(lines.next().await),
    }
}

async fn serve_connection(
    kind: SocketKind,
    server: Arc<PowerServer>,
    stream: TcpStream,
    peer_addr: SocketAddr,
    mut terminate: watch::Receiver<bool>,
) {
    if let Err(e) = stream.set_nodelay(true) {
        debug!(?peer_addr, "Unable to set TCP_NODELAY: {}", e);
    }
    let idle = server.get_config().ok().and_then(|c| c.timeout());
    let mut session = Session::new(kind, server, peer_addr);
    let session_id = session.id();
    info!(?peer_addr, %session_id, %kind, "Accepted connection");

    let (read, mut write) = stream.into_split();
    let mut lines = FramedRead::new(read, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
    loop {
        let next = select! {
            _ = terminate.changed() => {
                debug!(%session_id, "Listener terminated, closing session");
                break;
            }
            next = next_line(&mut lines, idle) => next,
        };
        let line = match next {
            Ok(Some(Ok(line))) => line,
            Ok(Some(Err(e))) => {
                warn!(%session_id, "Unreadable request: {}", e);
                break;
            }
            Ok(None) => {
                debug!(%session_id, "Peer closed connection");
                break;
            }
            Err(_) => {
                info!(%session_id, ?idle, "Session idle, closing");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        // Store and lifecycle calls block, so they run off the reactor.
        let handled = tokio::task::spawn_blocking(move || {
            let reply = session.handle_line(&line);
            (session, reply)
        })
        .await;
        let (returned, reply) = match handled {
            Ok(handled) => handled,
            Err(e) => {
                warn!(%session_id, "Request handler failed: {}", e);
                return;
            }
        };
        session = returned;
        if let Err(e) = write.write_all(&reply.bytes).await {
            warn!(%session_id, "Unable to write reply: {}", e);
            break;
        }
        if reply.close {
            break;
        }
    }
    let _ = write.shutdown().await;
    info!(?peer_addr, %session_id, authenticated = session.is_authenticated(), "Connection closed");
}

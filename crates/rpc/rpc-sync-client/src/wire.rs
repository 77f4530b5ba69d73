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

//! Blocking line/frame I/O shared by the socket transports.

use rpc_common::codec::{MAX_LINE_LENGTH, decode_response, encode_request, read_frame};
use rpc_common::{Request, Response, RpcError};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::error;

pub(crate) fn open_stream(addr: &str, timeout: Duration) -> Result<TcpStream, RpcError> {
    let mut last_error = None;
    let addrs = addr
        .to_socket_addrs()
        .map_err(|e| RpcError::CouldNotConnect(format!("{addr}: {e}")))?;
    for sock_addr in addrs {
        match TcpStream::connect_timeout(&sock_addr, timeout) {
            Ok(stream) => {
                stream
                    .set_read_timeout(Some(timeout))
                    .and_then(|_| stream.set_write_timeout(Some(timeout)))
                    .and_then(|_| stream.set_nodelay(true))
                    .map_err(|e| RpcError::CouldNotConnect(e.to_string()))?;
                return Ok(stream);
            }
            Err(e) => last_error = Some(e),
        }
    }
    let reason = last_error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "no addresses resolved".to_string());
    error!(addr, %reason, "Unable to connect");
    Err(RpcError::CouldNotConnect(format!("{addr}: {reason}")))
}

pub(crate) fn write_request(stream: &mut TcpStream, request: &Request) -> Result<(), RpcError> {
    let mut line = encode_request(request)?;
    line.push('\n');
    stream
        .write_all(line.as_bytes())
        .and_then(|_| stream.flush())
        .map_err(|e| RpcError::CouldNotSend(e.to_string()))
}

/// Read the reply to a request: a binary frame if the request asked for one, otherwise a line.
pub(crate) fn read_response(
    reader: &mut BufReader<TcpStream>,
    binary: bool,
) -> Result<Response, RpcError> {
    if binary {
        return read_frame(reader);
    }
    let mut line = String::new();
    let read = reader
        .by_ref()
        .take(MAX_LINE_LENGTH as u64 + 1)
        .read_line(&mut line)
        .map_err(|e| RpcError::CouldNotReceive(e.to_string()))?;
    if read == 0 {
        return Err(RpcError::CouldNotReceive(
            "connection closed by peer".to_string(),
        ));
    }
    if line.len() > MAX_LINE_LENGTH {
        return Err(RpcError::CouldNotReceive("response line too long".to_string()));
    }
    decode_response(&line)
}

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

//! Socket transports against a scripted peer on a loopback listener.

use pretty_assertions::assert_eq;
use reco_common::Privileges;
use reco_common::model::{Fetcher, RatingVector};
use rpc_common::codec::{decode_request, encode_frame, encode_response};
use rpc_common::request_builders::*;
use rpc_common::{Action, ControlCommand, Request, RequestBody, Response, RpcError};
use rpc_sync_client::{SocketConnection, SocketWrapper, Transport};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Accepts one connection and answers each request line with `respond`. `None` hangs up.
/// The handle yields every request the peer received.
fn scripted_peer<F>(respond: F) -> (String, JoinHandle<Vec<Request>>)
where
    F: Fn(&Request) -> Option<Response> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let handle = std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut writer = stream.try_clone().unwrap();
        let mut received = vec![];
        for line in BufReader::new(stream).lines() {
            let Ok(line) = line else { break };
            let request = decode_request(&line).unwrap();
            let reply = respond(&request);
            let binary = request.not_json_parsing;
            received.push(request);
            let Some(reply) = reply else { break };
            if binary {
                writer.write_all(&encode_frame(&reply).unwrap()).unwrap();
            } else {
                let mut line = encode_response(&reply).unwrap();
                line.push('\n');
                writer.write_all(line.as_bytes()).unwrap();
            }
        }
        received
    });
    (addr, handle)
}

fn actions(requests: &[Request]) -> Vec<Action> {
    requests.iter().map(Request::action).collect()
}

fn accept_everyone(request: &Request) -> Option<Response> {
    Some(match &request.body {
        RequestBody::ValidateAccount { .. } => Response::BooleanResult(true),
        RequestBody::GetUserRating { userid } => {
            Response::VRating(RatingVector::user(*userid).with_rating(7, 4.0))
        }
        RequestBody::GetUserids => Response::FId(Fetcher::new(vec![1, 2, 3])),
        _ => Response::Empty,
    })
}

#[test]
fn rejected_authentication_transmits_nothing_further() {
    let (addr, peer) = scripted_peer(|request| match request.body {
        RequestBody::ValidateAccount { .. } => Some(Response::BooleanResult(false)),
        _ => Some(Response::Empty),
    });

    let mut connection = SocketConnection::connect(&addr, TIMEOUT).unwrap();
    let result = connection.authenticate("ann", "wrong", Privileges::ACCESS);
    assert!(matches!(result, Err(RpcError::AuthenticationError(_))));
    assert!(connection.is_open());
    assert!(!connection.is_authenticated());

    assert_eq!(
        connection.send(mk_get_user_ids_request()),
        Err(RpcError::NotAuthenticated)
    );
    drop(connection);

    assert_eq!(actions(&peer.join().unwrap()), vec![Action::ValidateAccount]);
}

#[test]
fn authenticated_session_round_trip_and_quit_on_close() {
    let (addr, peer) = scripted_peer(accept_everyone);

    let mut connection = SocketConnection::connect(&addr, TIMEOUT).unwrap();
    connection
        .authenticate("ann", "pw", Privileges::ACCESS)
        .unwrap();

    let rating = connection
        .send(mk_get_user_rating_request(3))
        .unwrap()
        .into_rating_vector()
        .unwrap()
        .unwrap();
    assert_eq!(rating.id, 3);
    assert_eq!(rating.get(7).map(|r| r.value), Some(4.0));

    let ids = connection
        .send(mk_get_user_ids_request())
        .unwrap()
        .into_ids()
        .unwrap()
        .unwrap();
    assert_eq!(ids.into_rows(), vec![1, 2, 3]);

    connection.close();
    assert!(!connection.is_open());
    assert_eq!(
        connection.send(mk_get_user_ids_request()),
        Err(RpcError::NotConnected)
    );

    assert_eq!(
        actions(&peer.join().unwrap()),
        vec![
            Action::ValidateAccount,
            Action::GetUserRating,
            Action::GetUserids,
            Action::Quit
        ]
    );
}

#[test]
fn peer_hangup_closes_the_channel() {
    let (addr, peer) = scripted_peer(|request| match request.body {
        RequestBody::ValidateAccount { .. } => Some(Response::BooleanResult(true)),
        _ => None,
    });

    let mut connection = SocketConnection::connect(&addr, TIMEOUT).unwrap();
    connection
        .authenticate("ann", "pw", Privileges::ACCESS)
        .unwrap();

    let result = connection.send(mk_get_user_rating_request(1));
    assert!(matches!(result, Err(RpcError::CouldNotReceive(_))));
    assert!(!connection.is_open());
    assert_eq!(
        connection.send(mk_get_user_rating_request(1)),
        Err(RpcError::NotConnected)
    );
    drop(connection);
    peer.join().unwrap();
}

#[test]
fn binary_replies_are_read_as_frames() {
    let (addr, peer) = scripted_peer(|request| match &request.body {
        RequestBody::GetEvaluator { evaluator_name } => Some(Response::StringResult(
            format!("evaluator:{evaluator_name}"),
        )),
        _ => accept_everyone(request),
    });

    let mut connection = SocketConnection::connect(&addr, TIMEOUT).unwrap();
    connection
        .authenticate("ann", "pw", Privileges::EVALUATE)
        .unwrap();
    let reply = connection.send(mk_get_evaluator_request("rmse")).unwrap();
    assert_eq!(reply, Response::StringResult("evaluator:rmse".to_string()));
    drop(connection);

    let received = peer.join().unwrap();
    assert!(received[1].not_json_parsing);
}

#[test]
fn oversized_frame_closes_the_channel() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let peer = std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut writer = stream.try_clone().unwrap();
        let mut lines = BufReader::new(stream).lines();
        let Some(Ok(_)) = lines.next() else { return };
        let mut line = encode_response(&Response::BooleanResult(true)).unwrap();
        line.push('\n');
        writer.write_all(line.as_bytes()).unwrap();
        let Some(Ok(_)) = lines.next() else { return };
        let len = u32::try_from(rpc_common::codec::MAX_FRAME_LENGTH + 1).unwrap();
        let _ = writer.write_all(&len.to_be_bytes());
        let _ = writer.write_all(&[0u8; 512]);
        // Hold the socket until the client hangs up.
        for _ in lines {}
    });

    let mut connection = SocketConnection::connect(&addr, TIMEOUT).unwrap();
    connection
        .authenticate("ann", "pw", Privileges::EVALUATE)
        .unwrap();
    let result = connection.send(mk_get_evaluator_request("rmse"));
    assert!(matches!(result, Err(RpcError::CouldNotDecode(_))));
    assert!(!connection.is_open());
    assert_eq!(
        connection.send(mk_get_user_ids_request()),
        Err(RpcError::NotConnected)
    );
    drop(connection);
    peer.join().unwrap();
}

#[test]
fn wrapper_sends_one_control_request_per_connection() {
    let (addr, peer) = scripted_peer(|request| match &request.body {
        RequestBody::Control {
            control_command: ControlCommand::Pause,
            account_name: Some(name),
            account_password: Some(password),
        } if name == "admin" && password == "secret" => Some(Response::BooleanResult(true)),
        _ => Some(Response::BooleanResult(false)),
    });

    let wrapper = SocketWrapper::new(&addr, TIMEOUT);
    assert!(
        wrapper
            .control(ControlCommand::Pause, "admin", "secret")
            .unwrap()
    );

    let received = peer.join().unwrap();
    assert_eq!(actions(&received), vec![Action::Control]);
}

#[test]
fn connecting_to_nothing_fails_cleanly() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let result = SocketConnection::connect(&addr, Duration::from_millis(500));
    assert!(matches!(result, Err(RpcError::CouldNotConnect(_))));
}

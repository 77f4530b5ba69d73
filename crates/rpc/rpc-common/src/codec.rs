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

//! Wire encoding. Requests and ordinary responses are single JSON lines. Responses to requests
//! flagged `not_json_parsing` are binary object frames: a 4-byte big-endian length followed by
//! a bincode body.

use crate::{Request, Response, RpcError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Read;

/// Longest JSON line either side will accept.
pub const MAX_LINE_LENGTH: usize = 8 * 1024 * 1024;

/// Largest binary frame body either side will accept.
pub const MAX_FRAME_LENGTH: usize = 64 * 1024 * 1024;

const BINCODE_CONFIG: bincode::config::Configuration = bincode::config::standard();

/// Encode a request as one JSON line, without the trailing newline.
pub fn encode_request(request: &Request) -> Result<String, RpcError> {
    serde_json::to_string(request).map_err(|e| RpcError::CouldNotSend(e.to_string()))
}

pub fn decode_request(line: &str) -> Result<Request, RpcError> {
    serde_json::from_str(line.trim()).map_err(|e| RpcError::CouldNotDecode(e.to_string()))
}

/// Encode a response as one JSON line, without the trailing newline.
pub fn encode_response(response: &Response) -> Result<String, RpcError> {
    serde_json::to_string(response).map_err(|e| RpcError::CouldNotSend(e.to_string()))
}

pub fn decode_response(line: &str) -> Result<Response, RpcError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(RpcError::CouldNotDecode("empty response line".to_string()));
    }
    serde_json::from_str(line).map_err(|e| RpcError::CouldNotDecode(e.to_string()))
}

/// Encode a value as a length-prefixed binary frame.
pub fn encode_frame<T: Serialize>(value: &T) -> Result<Vec<u8>, RpcError> {
    let body = bincode::serde::encode_to_vec(value, BINCODE_CONFIG)
        .map_err(|e| RpcError::CouldNotSend(e.to_string()))?;
    if body.len() > MAX_FRAME_LENGTH {
        return Err(RpcError::CouldNotSend(format!(
            "frame of {} bytes exceeds limit",
            body.len()
        )));
    }
    let len = u32::try_from(body.len())
        .map_err(|_| RpcError::CouldNotSend("frame too large".to_string()))?;
    let mut frame = Vec::with_capacity(body.len() + 4);
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

pub fn decode_frame_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, RpcError> {
    let (value, _) = bincode::serde::decode_from_slice(body, BINCODE_CONFIG)
        .map_err(|e| RpcError::CouldNotDecode(e.to_string()))?;
    Ok(value)
}

/// Read one length-prefixed frame from a blocking reader.
pub fn read_frame<T: DeserializeOwned, R: Read>(reader: &mut R) -> Result<T, RpcError> {
    let mut len_bytes = [0u8; 4];
    reader
        .read_exact(&mut len_bytes)
        .map_err(|e| RpcError::CouldNotReceive(e.to_string()))?;
    let len = u32::from_be_bytes(len_bytes) as usize;
    if len > MAX_FRAME_LENGTH {
        return Err(RpcError::CouldNotDecode(format!(
            "frame of {len} bytes exceeds limit"
        )));
    }
    let mut body = vec![0u8; len];
    reader
        .read_exact(&mut body)
        .map_err(|e| RpcError::CouldNotReceive(e.to_string()))?;
    decode_frame_body(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request_builders::*;
    use crate::{ControlCommand, RpcMessageError};
    use pretty_assertions::assert_eq;
    use reco_common::Privileges;
    use reco_common::model::{
        AttrValue, EvaluatorRef, ExternalRecord, Fetcher, InternalRecord, Nominal, Profile,
        RatingVector, RecommendParam, Snapshot,
    };
    use std::io::Cursor;

    #[test]
    fn test_recommend_user_wire_shape() {
        let line = encode_request(&mk_recommend_user_request(42, 5)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"action": "recommend_user", "userid": 42, "max_recommend": 5})
        );
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_every_action_round_trips() {
        let profile = Profile::new(3).with_value("age", AttrValue::Integer(31));
        let vector = RatingVector::user(3).with_rating(10, 4.0).with_rating(11, 2.5);
        let internal = InternalRecord::new("user", "userid", 3);
        let external = ExternalRecord::new("user", "login", "ann");
        let param = RecommendParam {
            rating_vector: vector.clone(),
            profile: Some(profile.clone()),
        };
        let requests = vec![
            mk_quit_request(),
            mk_control_request(ControlCommand::Pause),
            mk_authenticated_control_request(ControlCommand::Exit, "admin", "secret"),
            mk_estimate_request(param.clone(), [10, 12].into_iter().collect()),
            mk_recommend_request(param, 10),
            mk_recommend_user_request(3, 10),
            mk_insert_rating_request(vector.clone()),
            mk_update_rating_request(vector.clone()),
            mk_delete_rating_request(vector),
            mk_get_user_ids_request(),
            mk_get_user_rating_request(3),
            mk_get_user_ratings_request(),
            mk_get_user_ratings_sql_request("select * from rating"),
            mk_delete_user_rating_request(3),
            mk_get_user_profile_request(3),
            mk_get_user_profile_by_external_request("ann"),
            mk_get_user_profiles_request(),
            mk_get_user_profiles_sql_request("select * from user"),
            mk_get_user_attribute_list_request(),
            mk_insert_user_profile_request(profile.clone(), Some(external.clone())),
            mk_insert_user_profile_request(profile.clone(), None),
            mk_update_user_profile_request(profile.clone()),
            mk_delete_user_profile_request(3),
            mk_get_user_external_record_request(3),
            mk_get_item_ids_request(),
            mk_get_item_rating_request(10),
            mk_get_item_ratings_request(),
            mk_get_item_ratings_sql_request("select 1"),
            mk_delete_item_rating_request(10),
            mk_get_item_profile_request(10),
            mk_get_item_profile_by_external_request("sku-10"),
            mk_get_item_profiles_request(),
            mk_get_item_profiles_sql_request("select 2"),
            mk_get_item_attribute_list_request(),
            mk_insert_item_profile_request(profile.clone(), None),
            mk_update_item_profile_request(profile.clone()),
            mk_delete_item_profile_request(10),
            mk_get_item_external_record_request(10),
            mk_get_nominal_request("user", "gender"),
            mk_insert_nominal_request("user", "gender", Nominal::new("f", 0)),
            mk_update_nominal_request("user", "gender", Nominal::new("m", 1)),
            mk_delete_nominal_request("user", "gender"),
            mk_get_external_record_request(internal.clone()),
            mk_insert_external_record_request(internal.clone(), external.clone()),
            mk_update_external_record_request(internal.clone(), external),
            mk_delete_external_record_request(internal),
            mk_validate_account_request("admin", "secret", Privileges::ADMIN),
            mk_get_sample_profile_request(profile.clone()),
            mk_get_sample_profiles_sql_request("select 3"),
            mk_get_sample_profile_attribute_list_request(),
            mk_insert_sample_profile_request(profile.clone()),
            mk_update_sample_profile_request(profile.clone()),
            mk_delete_sample_profile_request(profile.clone()),
            mk_get_profile_request("movie", profile.clone()),
            mk_get_profiles_sql_request("select 4"),
            mk_get_profile_attribute_list_request("movie"),
            mk_insert_profile_request("movie", profile.clone()),
            mk_update_profile_request("movie", profile.clone()),
            mk_delete_profile_request("movie", profile),
            mk_get_snapshot_request(),
            mk_get_server_config_request(),
            mk_get_session_attribute_request("account_name"),
            mk_get_evaluator_request("mae"),
            mk_get_evaluator_names_request(),
        ];
        let mut seen = std::collections::BTreeSet::new();
        for request in requests {
            let line = encode_request(&request).unwrap();
            let back = decode_request(&line).unwrap();
            assert_eq!(back, request, "round trip of {line}");
            seen.insert(request.action());
        }
        assert_eq!(seen.len(), 62);
    }

    #[test]
    fn test_builders_are_idempotent() {
        assert_eq!(mk_recommend_user_request(1, 2), mk_recommend_user_request(1, 2));
        assert!(mk_get_evaluator_request("mae").not_json_parsing);
    }

    #[test]
    fn test_malformed_input_is_a_decode_error() {
        assert!(matches!(
            decode_response("{not json"),
            Err(RpcError::CouldNotDecode(_))
        ));
        assert!(matches!(
            decode_response(""),
            Err(RpcError::CouldNotDecode(_))
        ));
        assert_eq!(decode_response("\"empty\"\n").unwrap(), Response::Empty);
    }

    #[test]
    fn test_response_lines_round_trip() {
        let responses = vec![
            Response::Empty,
            Response::BooleanResult(true),
            Response::FId(Fetcher::new(vec![1, 2, 3])),
            Response::Snapshot(Snapshot::default()),
            Response::StringArray(vec!["mae".into(), "rmse".into()]),
            Response::Failure(RpcMessageError::InvalidRequest("nope".into())),
        ];
        for response in responses {
            let line = encode_response(&response).unwrap();
            assert_eq!(decode_response(&line).unwrap(), response);
        }
    }

    #[test]
    fn test_frame_round_trip() {
        let response = Response::Evaluator(EvaluatorRef::new("mae", "1.0").bound_at("local://x"));
        let frame = encode_frame(&response).unwrap();
        let len = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]) as usize;
        assert_eq!(len, frame.len() - 4);
        let back: Response = read_frame(&mut Cursor::new(frame)).unwrap();
        assert_eq!(back, response);
    }

    #[test]
    fn test_truncated_frame_fails() {
        let mut frame = encode_frame(&Response::BooleanResult(true)).unwrap();
        frame.truncate(frame.len() - 1);
        let result: Result<Response, _> = read_frame(&mut Cursor::new(frame));
        assert!(matches!(result, Err(RpcError::CouldNotReceive(_))));
    }
}

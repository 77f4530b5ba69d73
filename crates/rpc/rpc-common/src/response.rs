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

use crate::{RpcError, RpcMessageError};
use reco_common::model::{
    AttributeList, DataConfig, EvaluatorRef, ExternalRecord, Fetcher, NominalList, Profile,
    RatingVector, Snapshot,
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// A reply carries at most one result. `Empty` means "no data", which is distinct from both a
/// decode error and a `Failure`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    Empty,
    AttributeList(AttributeList),
    BooleanResult(bool),
    DataConfig(DataConfig),
    FRating(Fetcher<RatingVector>),
    FProfile(Fetcher<Profile>),
    FId(Fetcher<i32>),
    NominalList(NominalList),
    Profile(Profile),
    Snapshot(Snapshot),
    StringResult(String),
    StringArray(Vec<String>),
    VRating(RatingVector),
    ExternalRecord(ExternalRecord),
    Evaluator(EvaluatorRef),
    Failure(RpcMessageError),
}

/// Kinds of result a response can hold, declared in the order `result_kind` reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ResultKind {
    AttributeList,
    BooleanResult,
    DataConfig,
    FRating,
    FProfile,
    FId,
    NominalList,
    Profile,
    Snapshot,
    StringResult,
    StringArray,
    VRating,
    ExternalRecord,
    Evaluator,
}

macro_rules! extractor {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(self) -> Result<Option<$ty>, RpcError> {
            match self {
                Response::$variant(value) => Ok(Some(value)),
                Response::Empty => Ok(None),
                Response::Failure(e) => Err(e.into()),
                other => Err(other.unexpected(stringify!($variant))),
            }
        }
    };
}

impl Response {
    pub fn failure(error: impl Into<RpcMessageError>) -> Self {
        Response::Failure(error.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Response::Empty)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Response::Failure(_))
    }

    /// The kind of the single result held, or `None` for `Empty` and `Failure`.
    pub fn result_kind(&self) -> Option<ResultKind> {
        Some(match self {
            Response::AttributeList(_) => ResultKind::AttributeList,
            Response::BooleanResult(_) => ResultKind::BooleanResult,
            Response::DataConfig(_) => ResultKind::DataConfig,
            Response::FRating(_) => ResultKind::FRating,
            Response::FProfile(_) => ResultKind::FProfile,
            Response::FId(_) => ResultKind::FId,
            Response::NominalList(_) => ResultKind::NominalList,
            Response::Profile(_) => ResultKind::Profile,
            Response::Snapshot(_) => ResultKind::Snapshot,
            Response::StringResult(_) => ResultKind::StringResult,
            Response::StringArray(_) => ResultKind::StringArray,
            Response::VRating(_) => ResultKind::VRating,
            Response::ExternalRecord(_) => ResultKind::ExternalRecord,
            Response::Evaluator(_) => ResultKind::Evaluator,
            Response::Empty | Response::Failure(_) => return None,
        })
    }

    fn unexpected(&self, wanted: &str) -> RpcError {
        let got = self
            .result_kind()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "nothing".to_string());
        RpcError::UnexpectedReply(format!("expected {wanted}, got {got}"))
    }

    /// Turn a failure into an error and pass anything else through.
    pub fn into_result(self) -> Result<Response, RpcError> {
        match self {
            Response::Failure(e) => Err(e.into()),
            other => Ok(other),
        }
    }

    /// Boolean results treat an empty reply as `false`.
    pub fn into_bool(self) -> Result<bool, RpcError> {
        match self {
            Response::BooleanResult(b) => Ok(b),
            Response::Empty => Ok(false),
            Response::Failure(e) => Err(e.into()),
            other => Err(other.unexpected("BooleanResult")),
        }
    }

    /// String arrays treat an empty reply as an empty array.
    pub fn into_string_array(self) -> Result<Vec<String>, RpcError> {
        match self {
            Response::StringArray(a) => Ok(a),
            Response::Empty => Ok(vec![]),
            Response::Failure(e) => Err(e.into()),
            other => Err(other.unexpected("StringArray")),
        }
    }

    extractor!(into_attribute_list, AttributeList, AttributeList);
    extractor!(into_data_config, DataConfig, DataConfig);
    extractor!(into_rating_vectors, FRating, Fetcher<RatingVector>);
    extractor!(into_profiles, FProfile, Fetcher<Profile>);
    extractor!(into_ids, FId, Fetcher<i32>);
    extractor!(into_nominal_list, NominalList, NominalList);
    extractor!(into_profile, Profile, Profile);
    extractor!(into_snapshot, Snapshot, Snapshot);
    extractor!(into_string, StringResult, String);
    extractor!(into_rating_vector, VRating, RatingVector);
    extractor!(into_external_record, ExternalRecord, ExternalRecord);
    extractor!(into_evaluator, Evaluator, EvaluatorRef);
}

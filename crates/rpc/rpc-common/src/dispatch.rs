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

//! Executes a request against a `Service`, producing the response a transport sends back.
//! Shared by the socket server and the in-process binding so both answer identically.

use crate::{Request, RequestBody, Response, RpcError, RpcMessageError, Service};
use reco_common::Privileges;
use std::collections::BTreeMap;
use tracing::debug;

pub const ACCOUNT_NAME_ATTRIBUTE: &str = "account_name";
pub const ACCOUNT_PRIVILEGES_ATTRIBUTE: &str = "account_privileges";
pub const SESSION_ID_ATTRIBUTE: &str = "session_id";
pub const PEER_ADDRESS_ATTRIBUTE: &str = "peer_address";

/// What the server knows about the authenticated party on the other end of a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub account_name: String,
    pub privileges: Privileges,
    attributes: BTreeMap<String, String>,
}

impl SessionInfo {
    pub fn new(session_id: &str, account_name: &str, privileges: Privileges) -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert(SESSION_ID_ATTRIBUTE.to_string(), session_id.to_string());
        Self {
            account_name: account_name.to_string(),
            privileges,
            attributes,
        }
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        match name {
            ACCOUNT_NAME_ATTRIBUTE => Some(self.account_name.clone()),
            ACCOUNT_PRIVILEGES_ATTRIBUTE => Some(self.privileges.bits().to_string()),
            other => self.attributes.get(other).cloned(),
        }
    }
}

fn failure(e: RpcError) -> Response {
    Response::Failure(e.into())
}

fn reply<T>(result: Result<Option<T>, RpcError>, wrap: impl FnOnce(T) -> Response) -> Response {
    match result {
        Ok(Some(value)) => wrap(value),
        Ok(None) => Response::Empty,
        Err(e) => failure(e),
    }
}

fn reply_bool(result: Result<bool, RpcError>) -> Response {
    match result {
        Ok(b) => Response::BooleanResult(b),
        Err(e) => failure(e),
    }
}

/// Run `request` against `service` on behalf of `session`.
///
/// `quit` yields `Empty`; the caller decides whether to close the channel. `control` is not a
/// service operation and is rejected here; servers handle it before dispatching.
pub fn dispatch(service: &dyn Service, session: &SessionInfo, request: &Request) -> Response {
    let action = request.action();
    if !session.privileges.contains(action.required_privileges()) {
        debug!(%action, account = %session.account_name, "Permission denied");
        return Response::Failure(RpcMessageError::PermissionDenied);
    }

    match &request.body {
        RequestBody::Quit => Response::Empty,
        RequestBody::Control { .. } => Response::Failure(RpcMessageError::InvalidRequest(
            "control commands are not service operations".to_string(),
        )),
        RequestBody::Estimate {
            recommend_param,
            queryids,
        } => reply(service.estimate(recommend_param, queryids), Response::VRating),
        RequestBody::Recommend {
            recommend_param,
            max_recommend,
        } => reply(
            service.recommend(recommend_param, *max_recommend),
            Response::VRating,
        ),
        RequestBody::RecommendUser {
            userid,
            max_recommend,
        } => reply(
            service.recommend_user(*userid, *max_recommend),
            Response::VRating,
        ),
        RequestBody::InsertRating { rating_vector } => {
            reply_bool(service.insert_rating(rating_vector))
        }
        RequestBody::UpdateRating { rating_vector } => {
            reply_bool(service.update_rating(rating_vector))
        }
        RequestBody::DeleteRating { rating_vector } => {
            reply_bool(service.delete_rating(rating_vector))
        }
        RequestBody::GetUserids => reply(service.get_user_ids(), Response::FId),
        RequestBody::GetUserRating { userid } => {
            reply(service.get_user_rating(*userid), Response::VRating)
        }
        RequestBody::GetUserRatings => reply(service.get_user_ratings(), Response::FRating),
        RequestBody::GetUserRatingsSql { sql } => {
            reply(service.get_user_ratings_sql(sql), Response::FRating)
        }
        RequestBody::DeleteUserRating { userid } => {
            reply_bool(service.delete_user_rating(*userid))
        }
        RequestBody::GetUserProfile { userid } => {
            reply(service.get_user_profile(*userid), Response::Profile)
        }
        RequestBody::GetUserProfileByExternal { external_userid } => reply(
            service.get_user_profile_by_external(external_userid),
            Response::Profile,
        ),
        RequestBody::GetUserProfiles => reply(service.get_user_profiles(), Response::FProfile),
        RequestBody::GetUserProfilesSql { sql } => {
            reply(service.get_user_profiles_sql(sql), Response::FProfile)
        }
        RequestBody::GetUserAttributeList => reply(
            service.get_user_attribute_list(),
            Response::AttributeList,
        ),
        RequestBody::InsertUserProfile {
            profile,
            external_record,
        } => reply_bool(service.insert_user_profile(profile, external_record.as_ref())),
        RequestBody::UpdateUserProfile { profile } => {
            reply_bool(service.update_user_profile(profile))
        }
        RequestBody::DeleteUserProfile { userid } => {
            reply_bool(service.delete_user_profile(*userid))
        }
        RequestBody::GetUserExternalRecord { userid } => reply(
            service.get_user_external_record(*userid),
            Response::ExternalRecord,
        ),
        RequestBody::GetItemids => reply(service.get_item_ids(), Response::FId),
        RequestBody::GetItemRating { itemid } => {
            reply(service.get_item_rating(*itemid), Response::VRating)
        }
        RequestBody::GetItemRatings => reply(service.get_item_ratings(), Response::FRating),
        RequestBody::GetItemRatingsSql { sql } => {
            reply(service.get_item_ratings_sql(sql), Response::FRating)
        }
        RequestBody::DeleteItemRating { itemid } => {
            reply_bool(service.delete_item_rating(*itemid))
        }
        RequestBody::GetItemProfile { itemid } => {
            reply(service.get_item_profile(*itemid), Response::Profile)
        }
        RequestBody::GetItemProfileByExternal { external_itemid } => reply(
            service.get_item_profile_by_external(external_itemid),
            Response::Profile,
        ),
        RequestBody::GetItemProfiles => reply(service.get_item_profiles(), Response::FProfile),
        RequestBody::GetItemProfilesSql { sql } => {
            reply(service.get_item_profiles_sql(sql), Response::FProfile)
        }
        RequestBody::GetItemAttributeList => reply(
            service.get_item_attribute_list(),
            Response::AttributeList,
        ),
        RequestBody::InsertItemProfile {
            profile,
            external_record,
        } => reply_bool(service.insert_item_profile(profile, external_record.as_ref())),
        RequestBody::UpdateItemProfile { profile } => {
            reply_bool(service.update_item_profile(profile))
        }
        RequestBody::DeleteItemProfile { itemid } => {
            reply_bool(service.delete_item_profile(*itemid))
        }
        RequestBody::GetItemExternalRecord { itemid } => reply(
            service.get_item_external_record(*itemid),
            Response::ExternalRecord,
        ),
        RequestBody::GetNominal { unit, attribute } => reply(
            service.get_nominal(unit, attribute),
            Response::NominalList,
        ),
        RequestBody::InsertNominal {
            unit,
            attribute,
            nominal,
        } => reply_bool(service.insert_nominal(unit, attribute, nominal)),
        RequestBody::UpdateNominal {
            unit,
            attribute,
            nominal,
        } => reply_bool(service.update_nominal(unit, attribute, nominal)),
        RequestBody::DeleteNominal { unit, attribute } => {
            reply_bool(service.delete_nominal(unit, attribute))
        }
        RequestBody::GetExternalRecord { internal_record } => reply(
            service.get_external_record(internal_record),
            Response::ExternalRecord,
        ),
        RequestBody::InsertExternalRecord {
            internal_record,
            external_record,
        } => reply_bool(service.insert_external_record(internal_record, external_record)),
        RequestBody::UpdateExternalRecord {
            internal_record,
            external_record,
        } => reply_bool(service.update_external_record(internal_record, external_record)),
        RequestBody::DeleteExternalRecord { internal_record } => {
            reply_bool(service.delete_external_record(internal_record))
        }
        RequestBody::ValidateAccount {
            account_name,
            account_password,
            account_privileges,
        } => reply_bool(service.validate_account(
            account_name,
            account_password,
            *account_privileges,
        )),
        RequestBody::GetSampleProfile { condition } => {
            reply(service.get_sample_profile(condition), Response::Profile)
        }
        RequestBody::GetSampleProfilesSql { sql } => {
            reply(service.get_sample_profiles_sql(sql), Response::FProfile)
        }
        RequestBody::GetSampleProfileAttributeList => reply(
            service.get_sample_profile_attribute_list(),
            Response::AttributeList,
        ),
        RequestBody::InsertSampleProfile { profile } => {
            reply_bool(service.insert_sample_profile(profile))
        }
        RequestBody::UpdateSampleProfile { profile } => {
            reply_bool(service.update_sample_profile(profile))
        }
        RequestBody::DeleteSampleProfile { condition } => {
            reply_bool(service.delete_sample_profile(condition))
        }
        RequestBody::GetProfile { unit, condition } => {
            reply(service.get_profile(unit, condition), Response::Profile)
        }
        RequestBody::GetProfilesSql { sql } => {
            reply(service.get_profiles_sql(sql), Response::FProfile)
        }
        RequestBody::GetProfileAttributeList { unit } => reply(
            service.get_profile_attribute_list(unit),
            Response::AttributeList,
        ),
        RequestBody::InsertProfile { unit, profile } => {
            reply_bool(service.insert_profile(unit, profile))
        }
        RequestBody::UpdateProfile { unit, profile } => {
            reply_bool(service.update_profile(unit, profile))
        }
        RequestBody::DeleteProfile { unit, condition } => {
            reply_bool(service.delete_profile(unit, condition))
        }
        RequestBody::GetSnapshot => reply(service.get_snapshot(), Response::Snapshot),
        RequestBody::GetServerConfig => {
            reply(service.get_server_config(), Response::DataConfig)
        }
        RequestBody::GetSessionAttribute { attribute } => match session.attribute(attribute) {
            Some(value) => Response::StringResult(value),
            None => Response::Empty,
        },
        RequestBody::GetEvaluator { evaluator_name } => {
            reply(service.get_evaluator(evaluator_name), Response::Evaluator)
        }
        RequestBody::GetEvaluatorNames => match service.get_evaluator_names() {
            Ok(names) => Response::StringArray(names),
            Err(e) => failure(e),
        },
    }
}

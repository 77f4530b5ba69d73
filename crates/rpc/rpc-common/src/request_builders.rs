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

//! Helper functions for constructing requests. These are pure: no I/O, and calling one twice
//! with the same arguments yields equal requests.

use crate::{ControlCommand, Request, RequestBody};
use reco_common::Privileges;
use reco_common::model::{
    ExternalRecord, InternalRecord, Nominal, Profile, RatingVector, RecommendParam,
};
use std::collections::BTreeSet;

// ============================================================================
// Session and control
// ============================================================================

/// Build a quit request
#[inline]
pub fn mk_quit_request() -> Request {
    RequestBody::Quit.into()
}

/// Build a control request, authenticated by the session it is sent on
#[inline]
pub fn mk_control_request(command: ControlCommand) -> Request {
    RequestBody::Control {
        control_command: command,
        account_name: None,
        account_password: None,
    }
    .into()
}

/// Build a control request carrying its own credentials, for single-shot channels
#[inline]
pub fn mk_authenticated_control_request(
    command: ControlCommand,
    account_name: &str,
    account_password: &str,
) -> Request {
    RequestBody::Control {
        control_command: command,
        account_name: Some(account_name.to_string()),
        account_password: Some(account_password.to_string()),
    }
    .into()
}

/// Build a validate-account request
#[inline]
pub fn mk_validate_account_request(
    account_name: &str,
    account_password: &str,
    privileges: Privileges,
) -> Request {
    RequestBody::ValidateAccount {
        account_name: account_name.to_string(),
        account_password: account_password.to_string(),
        account_privileges: privileges,
    }
    .into()
}

/// Build a get-session-attribute request
#[inline]
pub fn mk_get_session_attribute_request(attribute: &str) -> Request {
    RequestBody::GetSessionAttribute {
        attribute: attribute.to_string(),
    }
    .into()
}

#[inline]
pub fn mk_get_server_config_request() -> Request {
    RequestBody::GetServerConfig.into()
}

#[inline]
pub fn mk_get_snapshot_request() -> Request {
    RequestBody::GetSnapshot.into()
}

// ============================================================================
// Recommendation
// ============================================================================

/// Build an estimate request for the given query ids
#[inline]
pub fn mk_estimate_request(param: RecommendParam, query_ids: BTreeSet<i32>) -> Request {
    RequestBody::Estimate {
        recommend_param: param,
        queryids: query_ids,
    }
    .into()
}

/// Build a recommend request
#[inline]
pub fn mk_recommend_request(param: RecommendParam, max_recommend: i32) -> Request {
    RequestBody::Recommend {
        recommend_param: param,
        max_recommend,
    }
    .into()
}

/// Build a recommend-user request
#[inline]
pub fn mk_recommend_user_request(user_id: i32, max_recommend: i32) -> Request {
    RequestBody::RecommendUser {
        userid: user_id,
        max_recommend,
    }
    .into()
}

// ============================================================================
// Ratings
// ============================================================================

#[inline]
pub fn mk_insert_rating_request(rating_vector: RatingVector) -> Request {
    RequestBody::InsertRating { rating_vector }.into()
}

#[inline]
pub fn mk_update_rating_request(rating_vector: RatingVector) -> Request {
    RequestBody::UpdateRating { rating_vector }.into()
}

#[inline]
pub fn mk_delete_rating_request(rating_vector: RatingVector) -> Request {
    RequestBody::DeleteRating { rating_vector }.into()
}

// ============================================================================
// Users
// ============================================================================

#[inline]
pub fn mk_get_user_ids_request() -> Request {
    RequestBody::GetUserids.into()
}

#[inline]
pub fn mk_get_user_rating_request(user_id: i32) -> Request {
    RequestBody::GetUserRating { userid: user_id }.into()
}

#[inline]
pub fn mk_get_user_ratings_request() -> Request {
    RequestBody::GetUserRatings.into()
}

#[inline]
pub fn mk_get_user_ratings_sql_request(sql: &str) -> Request {
    RequestBody::GetUserRatingsSql {
        sql: sql.to_string(),
    }
    .into()
}

#[inline]
pub fn mk_delete_user_rating_request(user_id: i32) -> Request {
    RequestBody::DeleteUserRating { userid: user_id }.into()
}

#[inline]
pub fn mk_get_user_profile_request(user_id: i32) -> Request {
    RequestBody::GetUserProfile { userid: user_id }.into()
}

#[inline]
pub fn mk_get_user_profile_by_external_request(external_user_id: &str) -> Request {
    RequestBody::GetUserProfileByExternal {
        external_userid: external_user_id.to_string(),
    }
    .into()
}

#[inline]
pub fn mk_get_user_profiles_request() -> Request {
    RequestBody::GetUserProfiles.into()
}

#[inline]
pub fn mk_get_user_profiles_sql_request(sql: &str) -> Request {
    RequestBody::GetUserProfilesSql {
        sql: sql.to_string(),
    }
    .into()
}

#[inline]
pub fn mk_get_user_attribute_list_request() -> Request {
    RequestBody::GetUserAttributeList.into()
}

#[inline]
pub fn mk_insert_user_profile_request(
    profile: Profile,
    external_record: Option<ExternalRecord>,
) -> Request {
    RequestBody::InsertUserProfile {
        profile,
        external_record,
    }
    .into()
}

#[inline]
pub fn mk_update_user_profile_request(profile: Profile) -> Request {
    RequestBody::UpdateUserProfile { profile }.into()
}

#[inline]
pub fn mk_delete_user_profile_request(user_id: i32) -> Request {
    RequestBody::DeleteUserProfile { userid: user_id }.into()
}

#[inline]
pub fn mk_get_user_external_record_request(user_id: i32) -> Request {
    RequestBody::GetUserExternalRecord { userid: user_id }.into()
}

// ============================================================================
// Items
// ============================================================================

#[inline]
pub fn mk_get_item_ids_request() -> Request {
    RequestBody::GetItemids.into()
}

#[inline]
pub fn mk_get_item_rating_request(item_id: i32) -> Request {
    RequestBody::GetItemRating { itemid: item_id }.into()
}

#[inline]
pub fn mk_get_item_ratings_request() -> Request {
    RequestBody::GetItemRatings.into()
}

#[inline]
pub fn mk_get_item_ratings_sql_request(sql: &str) -> Request {
    RequestBody::GetItemRatingsSql {
        sql: sql.to_string(),
    }
    .into()
}

#[inline]
pub fn mk_delete_item_rating_request(item_id: i32) -> Request {
    RequestBody::DeleteItemRating { itemid: item_id }.into()
}

#[inline]
pub fn mk_get_item_profile_request(item_id: i32) -> Request {
    RequestBody::GetItemProfile { itemid: item_id }.into()
}

#[inline]
pub fn mk_get_item_profile_by_external_request(external_item_id: &str) -> Request {
    RequestBody::GetItemProfileByExternal {
        external_itemid: external_item_id.to_string(),
    }
    .into()
}

#[inline]
pub fn mk_get_item_profiles_request() -> Request {
    RequestBody::GetItemProfiles.into()
}

#[inline]
pub fn mk_get_item_profiles_sql_request(sql: &str) -> Request {
    RequestBody::GetItemProfilesSql {
        sql: sql.to_string(),
    }
    .into()
}

#[inline]
pub fn mk_get_item_attribute_list_request() -> Request {
    RequestBody::GetItemAttributeList.into()
}

#[inline]
pub fn mk_insert_item_profile_request(
    profile: Profile,
    external_record: Option<ExternalRecord>,
) -> Request {
    RequestBody::InsertItemProfile {
        profile,
        external_record,
    }
    .into()
}

#[inline]
pub fn mk_update_item_profile_request(profile: Profile) -> Request {
    RequestBody::UpdateItemProfile { profile }.into()
}

#[inline]
pub fn mk_delete_item_profile_request(item_id: i32) -> Request {
    RequestBody::DeleteItemProfile { itemid: item_id }.into()
}

#[inline]
pub fn mk_get_item_external_record_request(item_id: i32) -> Request {
    RequestBody::GetItemExternalRecord { itemid: item_id }.into()
}

// ============================================================================
// Nominals and external records
// ============================================================================

#[inline]
pub fn mk_get_nominal_request(unit: &str, attribute: &str) -> Request {
    RequestBody::GetNominal {
        unit: unit.to_string(),
        attribute: attribute.to_string(),
    }
    .into()
}

#[inline]
pub fn mk_insert_nominal_request(unit: &str, attribute: &str, nominal: Nominal) -> Request {
    RequestBody::InsertNominal {
        unit: unit.to_string(),
        attribute: attribute.to_string(),
        nominal,
    }
    .into()
}

#[inline]
pub fn mk_update_nominal_request(unit: &str, attribute: &str, nominal: Nominal) -> Request {
    RequestBody::UpdateNominal {
        unit: unit.to_string(),
        attribute: attribute.to_string(),
        nominal,
    }
    .into()
}

#[inline]
pub fn mk_delete_nominal_request(unit: &str, attribute: &str) -> Request {
    RequestBody::DeleteNominal {
        unit: unit.to_string(),
        attribute: attribute.to_string(),
    }
    .into()
}

#[inline]
pub fn mk_get_external_record_request(internal_record: InternalRecord) -> Request {
    RequestBody::GetExternalRecord { internal_record }.into()
}

#[inline]
pub fn mk_insert_external_record_request(
    internal_record: InternalRecord,
    external_record: ExternalRecord,
) -> Request {
    RequestBody::InsertExternalRecord {
        internal_record,
        external_record,
    }
    .into()
}

#[inline]
pub fn mk_update_external_record_request(
    internal_record: InternalRecord,
    external_record: ExternalRecord,
) -> Request {
    RequestBody::UpdateExternalRecord {
        internal_record,
        external_record,
    }
    .into()
}

#[inline]
pub fn mk_delete_external_record_request(internal_record: InternalRecord) -> Request {
    RequestBody::DeleteExternalRecord { internal_record }.into()
}

// ============================================================================
// Sample and generic profiles
// ============================================================================

#[inline]
pub fn mk_get_sample_profile_request(condition: Profile) -> Request {
    RequestBody::GetSampleProfile { condition }.into()
}

#[inline]
pub fn mk_get_sample_profiles_sql_request(sql: &str) -> Request {
    RequestBody::GetSampleProfilesSql {
        sql: sql.to_string(),
    }
    .into()
}

#[inline]
pub fn mk_get_sample_profile_attribute_list_request() -> Request {
    RequestBody::GetSampleProfileAttributeList.into()
}

#[inline]
pub fn mk_insert_sample_profile_request(profile: Profile) -> Request {
    RequestBody::InsertSampleProfile { profile }.into()
}

#[inline]
pub fn mk_update_sample_profile_request(profile: Profile) -> Request {
    RequestBody::UpdateSampleProfile { profile }.into()
}

#[inline]
pub fn mk_delete_sample_profile_request(condition: Profile) -> Request {
    RequestBody::DeleteSampleProfile { condition }.into()
}

#[inline]
pub fn mk_get_profile_request(unit: &str, condition: Profile) -> Request {
    RequestBody::GetProfile {
        unit: unit.to_string(),
        condition,
    }
    .into()
}

#[inline]
pub fn mk_get_profiles_sql_request(sql: &str) -> Request {
    RequestBody::GetProfilesSql {
        sql: sql.to_string(),
    }
    .into()
}

#[inline]
pub fn mk_get_profile_attribute_list_request(unit: &str) -> Request {
    RequestBody::GetProfileAttributeList {
        unit: unit.to_string(),
    }
    .into()
}

#[inline]
pub fn mk_insert_profile_request(unit: &str, profile: Profile) -> Request {
    RequestBody::InsertProfile {
        unit: unit.to_string(),
        profile,
    }
    .into()
}

#[inline]
pub fn mk_update_profile_request(unit: &str, profile: Profile) -> Request {
    RequestBody::UpdateProfile {
        unit: unit.to_string(),
        profile,
    }
    .into()
}

#[inline]
pub fn mk_delete_profile_request(unit: &str, condition: Profile) -> Request {
    RequestBody::DeleteProfile {
        unit: unit.to_string(),
        condition,
    }
    .into()
}

// ============================================================================
// Evaluators
// ============================================================================

/// Build a get-evaluator request. The evaluator handle comes back as a binary object frame.
#[inline]
pub fn mk_get_evaluator_request(evaluator_name: &str) -> Request {
    Request::binary(RequestBody::GetEvaluator {
        evaluator_name: evaluator_name.to_string(),
    })
}

#[inline]
pub fn mk_get_evaluator_names_request() -> Request {
    RequestBody::GetEvaluatorNames.into()
}

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

//! The request envelope. On the wire a request is one flat JSON object: an `action` tag plus
//! whichever payload fields that action uses.

use reco_common::Privileges;
use reco_common::model::{
    ExternalRecord, InternalRecord, Nominal, Profile, RatingVector, RecommendParam,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Lifecycle commands accepted on the control channel.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ControlCommand {
    Start,
    Stop,
    Pause,
    Resume,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(flatten)]
    pub body: RequestBody,
    /// Ask for the response as a binary object frame rather than a JSON line.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub not_json_parsing: bool,
}

impl Request {
    pub fn new(body: RequestBody) -> Self {
        Self {
            body,
            not_json_parsing: false,
        }
    }

    pub fn binary(body: RequestBody) -> Self {
        Self {
            body,
            not_json_parsing: true,
        }
    }

    pub fn action(&self) -> Action {
        self.body.action()
    }

    pub fn required_privileges(&self) -> Privileges {
        self.action().required_privileges()
    }
}

impl From<RequestBody> for Request {
    fn from(body: RequestBody) -> Self {
        Request::new(body)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RequestBody {
    Quit,
    Control {
        control_command: ControlCommand,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        account_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        account_password: Option<String>,
    },
    Estimate {
        recommend_param: RecommendParam,
        queryids: BTreeSet<i32>,
    },
    Recommend {
        recommend_param: RecommendParam,
        max_recommend: i32,
    },
    RecommendUser {
        userid: i32,
        max_recommend: i32,
    },
    InsertRating {
        rating_vector: RatingVector,
    },
    UpdateRating {
        rating_vector: RatingVector,
    },
    DeleteRating {
        rating_vector: RatingVector,
    },
    GetUserids,
    GetUserRating {
        userid: i32,
    },
    GetUserRatings,
    GetUserRatingsSql {
        sql: String,
    },
    DeleteUserRating {
        userid: i32,
    },
    GetUserProfile {
        userid: i32,
    },
    GetUserProfileByExternal {
        external_userid: String,
    },
    GetUserProfiles,
    GetUserProfilesSql {
        sql: String,
    },
    GetUserAttributeList,
    InsertUserProfile {
        profile: Profile,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        external_record: Option<ExternalRecord>,
    },
    UpdateUserProfile {
        profile: Profile,
    },
    DeleteUserProfile {
        userid: i32,
    },
    GetUserExternalRecord {
        userid: i32,
    },
    GetItemids,
    GetItemRating {
        itemid: i32,
    },
    GetItemRatings,
    GetItemRatingsSql {
        sql: String,
    },
    DeleteItemRating {
        itemid: i32,
    },
    GetItemProfile {
        itemid: i32,
    },
    GetItemProfileByExternal {
        external_itemid: String,
    },
    GetItemProfiles,
    GetItemProfilesSql {
        sql: String,
    },
    GetItemAttributeList,
    InsertItemProfile {
        profile: Profile,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        external_record: Option<ExternalRecord>,
    },
    UpdateItemProfile {
        profile: Profile,
    },
    DeleteItemProfile {
        itemid: i32,
    },
    GetItemExternalRecord {
        itemid: i32,
    },
    GetNominal {
        unit: String,
        attribute: String,
    },
    InsertNominal {
        unit: String,
        attribute: String,
        nominal: Nominal,
    },
    UpdateNominal {
        unit: String,
        attribute: String,
        nominal: Nominal,
    },
    DeleteNominal {
        unit: String,
        attribute: String,
    },
    GetExternalRecord {
        internal_record: InternalRecord,
    },
    InsertExternalRecord {
        internal_record: InternalRecord,
        external_record: ExternalRecord,
    },
    UpdateExternalRecord {
        internal_record: InternalRecord,
        external_record: ExternalRecord,
    },
    DeleteExternalRecord {
        internal_record: InternalRecord,
    },
    ValidateAccount {
        account_name: String,
        account_password: String,
        account_privileges: Privileges,
    },
    GetSampleProfile {
        condition: Profile,
    },
    GetSampleProfilesSql {
        sql: String,
    },
    GetSampleProfileAttributeList,
    InsertSampleProfile {
        profile: Profile,
    },
    UpdateSampleProfile {
        profile: Profile,
    },
    DeleteSampleProfile {
        condition: Profile,
    },
    GetProfile {
        unit: String,
        condition: Profile,
    },
    GetProfilesSql {
        sql: String,
    },
    GetProfileAttributeList {
        unit: String,
    },
    InsertProfile {
        unit: String,
        profile: Profile,
    },
    UpdateProfile {
        unit: String,
        profile: Profile,
    },
    DeleteProfile {
        unit: String,
        condition: Profile,
    },
    GetSnapshot,
    GetServerConfig,
    GetSessionAttribute {
        attribute: String,
    },
    GetEvaluator {
        evaluator_name: String,
    },
    GetEvaluatorNames,
}

/// The action tag of a request, without its payload.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    Quit,
    Control,
    Estimate,
    Recommend,
    RecommendUser,
    InsertRating,
    UpdateRating,
    DeleteRating,
    GetUserids,
    GetUserRating,
    GetUserRatings,
    GetUserRatingsSql,
    DeleteUserRating,
    GetUserProfile,
    GetUserProfileByExternal,
    GetUserProfiles,
    GetUserProfilesSql,
    GetUserAttributeList,
    InsertUserProfile,
    UpdateUserProfile,
    DeleteUserProfile,
    GetUserExternalRecord,
    GetItemids,
    GetItemRating,
    GetItemRatings,
    GetItemRatingsSql,
    DeleteItemRating,
    GetItemProfile,
    GetItemProfileByExternal,
    GetItemProfiles,
    GetItemProfilesSql,
    GetItemAttributeList,
    InsertItemProfile,
    UpdateItemProfile,
    DeleteItemProfile,
    GetItemExternalRecord,
    GetNominal,
    InsertNominal,
    UpdateNominal,
    DeleteNominal,
    GetExternalRecord,
    InsertExternalRecord,
    UpdateExternalRecord,
    DeleteExternalRecord,
    ValidateAccount,
    GetSampleProfile,
    GetSampleProfilesSql,
    GetSampleProfileAttributeList,
    InsertSampleProfile,
    UpdateSampleProfile,
    DeleteSampleProfile,
    GetProfile,
    GetProfilesSql,
    GetProfileAttributeList,
    InsertProfile,
    UpdateProfile,
    DeleteProfile,
    GetSnapshot,
    GetServerConfig,
    GetSessionAttribute,
    GetEvaluator,
    GetEvaluatorNames,
}

impl Action {
    /// Privileges a session must hold to issue this action.
    pub fn required_privileges(&self) -> Privileges {
        match self {
            Action::Quit | Action::ValidateAccount => Privileges::NONE,
            Action::Control => Privileges::ADMIN,
            Action::GetEvaluator | Action::GetEvaluatorNames => Privileges::EVALUATE,
            _ => Privileges::ACCESS,
        }
    }
}

impl RequestBody {
    pub fn action(&self) -> Action {
        match self {
            RequestBody::Quit => Action::Quit,
            RequestBody::Control { .. } => Action::Control,
            RequestBody::Estimate { .. } => Action::Estimate,
            RequestBody::Recommend { .. } => Action::Recommend,
            RequestBody::RecommendUser { .. } => Action::RecommendUser,
            RequestBody::InsertRating { .. } => Action::InsertRating,
            RequestBody::UpdateRating { .. } => Action::UpdateRating,
            RequestBody::DeleteRating { .. } => Action::DeleteRating,
            RequestBody::GetUserids => Action::GetUserids,
            RequestBody::GetUserRating { .. } => Action::GetUserRating,
            RequestBody::GetUserRatings => Action::GetUserRatings,
            RequestBody::GetUserRatingsSql { .. } => Action::GetUserRatingsSql,
            RequestBody::DeleteUserRating { .. } => Action::DeleteUserRating,
            RequestBody::GetUserProfile { .. } => Action::GetUserProfile,
            RequestBody::GetUserProfileByExternal { .. } => Action::GetUserProfileByExternal,
            RequestBody::GetUserProfiles => Action::GetUserProfiles,
            RequestBody::GetUserProfilesSql { .. } => Action::GetUserProfilesSql,
            RequestBody::GetUserAttributeList => Action::GetUserAttributeList,
            RequestBody::InsertUserProfile { .. } => Action::InsertUserProfile,
            RequestBody::UpdateUserProfile { .. } => Action::UpdateUserProfile,
            RequestBody::DeleteUserProfile { .. } => Action::DeleteUserProfile,
            RequestBody::GetUserExternalRecord { .. } => Action::GetUserExternalRecord,
            RequestBody::GetItemids => Action::GetItemids,
            RequestBody::GetItemRating { .. } => Action::GetItemRating,
            RequestBody::GetItemRatings => Action::GetItemRatings,
            RequestBody::GetItemRatingsSql { .. } => Action::GetItemRatingsSql,
            RequestBody::DeleteItemRating { .. } => Action::DeleteItemRating,
            RequestBody::GetItemProfile { .. } => Action::GetItemProfile,
            RequestBody::GetItemProfileByExternal { .. } => Action::GetItemProfileByExternal,
            RequestBody::GetItemProfiles => Action::GetItemProfiles,
            RequestBody::GetItemProfilesSql { .. } => Action::GetItemProfilesSql,
            RequestBody::GetItemAttributeList => Action::GetItemAttributeList,
            RequestBody::InsertItemProfile { .. } => Action::InsertItemProfile,
            RequestBody::UpdateItemProfile { .. } => Action::UpdateItemProfile,
            RequestBody::DeleteItemProfile { .. } => Action::DeleteItemProfile,
            RequestBody::GetItemExternalRecord { .. } => Action::GetItemExternalRecord,
            RequestBody::GetNominal { .. } => Action::GetNominal,
            RequestBody::InsertNominal { .. } => Action::InsertNominal,
            RequestBody::UpdateNominal { .. } => Action::UpdateNominal,
            RequestBody::DeleteNominal { .. } => Action::DeleteNominal,
            RequestBody::GetExternalRecord { .. } => Action::GetExternalRecord,
            RequestBody::InsertExternalRecord { .. } => Action::InsertExternalRecord,
            RequestBody::UpdateExternalRecord { .. } => Action::UpdateExternalRecord,
            RequestBody::DeleteExternalRecord { .. } => Action::DeleteExternalRecord,
            RequestBody::ValidateAccount { .. } => Action::ValidateAccount,
            RequestBody::GetSampleProfile { .. } => Action::GetSampleProfile,
            RequestBody::GetSampleProfilesSql { .. } => Action::GetSampleProfilesSql,
            RequestBody::GetSampleProfileAttributeList => Action::GetSampleProfileAttributeList,
            RequestBody::InsertSampleProfile { .. } => Action::InsertSampleProfile,
            RequestBody::UpdateSampleProfile { .. } => Action::UpdateSampleProfile,
            RequestBody::DeleteSampleProfile { .. } => Action::DeleteSampleProfile,
            RequestBody::GetProfile { .. } => Action::GetProfile,
            RequestBody::GetProfilesSql { .. } => Action::GetProfilesSql,
            RequestBody::GetProfileAttributeList { .. } => Action::GetProfileAttributeList,
            RequestBody::InsertProfile { .. } => Action::InsertProfile,
            RequestBody::UpdateProfile { .. } => Action::UpdateProfile,
            RequestBody::DeleteProfile { .. } => Action::DeleteProfile,
            RequestBody::GetSnapshot => Action::GetSnapshot,
            RequestBody::GetServerConfig => Action::GetServerConfig,
            RequestBody::GetSessionAttribute { .. } => Action::GetSessionAttribute,
            RequestBody::GetEvaluator { .. } => Action::GetEvaluator,
            RequestBody::GetEvaluatorNames => Action::GetEvaluatorNames,
        }
    }
}

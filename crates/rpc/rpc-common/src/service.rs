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

//! The interfaces the protocol layer connects: the data/recommendation `Service`, the
//! lifecycle-managing `Server`, and the `Gateway` that hands out authenticated references to
//! both.
//!
//! Queries return `Ok(None)` when there is nothing to report; failures are always `Err`.

use crate::RpcError;
use reco_common::model::{
    AttributeList, DataConfig, EvaluatorRef, ExternalRecord, Fetcher, InternalRecord, Nominal,
    NominalList, Profile, RatingVector, RecommendParam, Snapshot,
};
use reco_common::{ActiveMeasure, Privileges, ServerConfig, ServerStatusEvent};
use std::collections::BTreeSet;
use std::sync::Arc;

pub trait Service: Send + Sync {
    fn estimate(
        &self,
        param: &RecommendParam,
        query_ids: &BTreeSet<i32>,
    ) -> Result<Option<RatingVector>, RpcError>;
    fn recommend(
        &self,
        param: &RecommendParam,
        max_recommend: i32,
    ) -> Result<Option<RatingVector>, RpcError>;
    fn recommend_user(
        &self,
        user_id: i32,
        max_recommend: i32,
    ) -> Result<Option<RatingVector>, RpcError>;

    fn insert_rating(&self, rating: &RatingVector) -> Result<bool, RpcError>;
    fn update_rating(&self, rating: &RatingVector) -> Result<bool, RpcError>;
    fn delete_rating(&self, rating: &RatingVector) -> Result<bool, RpcError>;

    fn get_user_ids(&self) -> Result<Option<Fetcher<i32>>, RpcError>;
    fn get_user_rating(&self, user_id: i32) -> Result<Option<RatingVector>, RpcError>;
    fn get_user_ratings(&self) -> Result<Option<Fetcher<RatingVector>>, RpcError>;
    fn get_user_ratings_sql(&self, sql: &str) -> Result<Option<Fetcher<RatingVector>>, RpcError>;
    fn delete_user_rating(&self, user_id: i32) -> Result<bool, RpcError>;
    fn get_user_profile(&self, user_id: i32) -> Result<Option<Profile>, RpcError>;
    fn get_user_profile_by_external(
        &self,
        external_user_id: &str,
    ) -> Result<Option<Profile>, RpcError>;
    fn get_user_profiles(&self) -> Result<Option<Fetcher<Profile>>, RpcError>;
    fn get_user_profiles_sql(&self, sql: &str) -> Result<Option<Fetcher<Profile>>, RpcError>;
    fn get_user_attribute_list(&self) -> Result<Option<AttributeList>, RpcError>;
    fn insert_user_profile(
        &self,
        profile: &Profile,
        external_record: Option<&ExternalRecord>,
    ) -> Result<bool, RpcError>;
    fn update_user_profile(&self, profile: &Profile) -> Result<bool, RpcError>;
    fn delete_user_profile(&self, user_id: i32) -> Result<bool, RpcError>;
    fn get_user_external_record(&self, user_id: i32) -> Result<Option<ExternalRecord>, RpcError>;

    fn get_item_ids(&self) -> Result<Option<Fetcher<i32>>, RpcError>;
    fn get_item_rating(&self, item_id: i32) -> Result<Option<RatingVector>, RpcError>;
    fn get_item_ratings(&self) -> Result<Option<Fetcher<RatingVector>>, RpcError>;
    fn get_item_ratings_sql(&self, sql: &str) -> Result<Option<Fetcher<RatingVector>>, RpcError>;
    fn delete_item_rating(&self, item_id: i32) -> Result<bool, RpcError>;
    fn get_item_profile(&self, item_id: i32) -> Result<Option<Profile>, RpcError>;
    fn get_item_profile_by_external(
        &self,
        external_item_id: &str,
    ) -> Result<Option<Profile>, RpcError>;
    fn get_item_profiles(&self) -> Result<Option<Fetcher<Profile>>, RpcError>;
    fn get_item_profiles_sql(&self, sql: &str) -> Result<Option<Fetcher<Profile>>, RpcError>;
    fn get_item_attribute_list(&self) -> Result<Option<AttributeList>, RpcError>;
    fn insert_item_profile(
        &self,
        profile: &Profile,
        external_record: Option<&ExternalRecord>,
    ) -> Result<bool, RpcError>;
    fn update_item_profile(&self, profile: &Profile) -> Result<bool, RpcError>;
    fn delete_item_profile(&self, item_id: i32) -> Result<bool, RpcError>;
    fn get_item_external_record(&self, item_id: i32) -> Result<Option<ExternalRecord>, RpcError>;

    fn get_nominal(&self, unit: &str, attribute: &str) -> Result<Option<NominalList>, RpcError>;
    fn insert_nominal(
        &self,
        unit: &str,
        attribute: &str,
        nominal: &Nominal,
    ) -> Result<bool, RpcError>;
    fn update_nominal(
        &self,
        unit: &str,
        attribute: &str,
        nominal: &Nominal,
    ) -> Result<bool, RpcError>;
    fn delete_nominal(&self, unit: &str, attribute: &str) -> Result<bool, RpcError>;

    fn get_external_record(
        &self,
        internal_record: &InternalRecord,
    ) -> Result<Option<ExternalRecord>, RpcError>;
    fn insert_external_record(
        &self,
        internal_record: &InternalRecord,
        external_record: &ExternalRecord,
    ) -> Result<bool, RpcError>;
    fn update_external_record(
        &self,
        internal_record: &InternalRecord,
        external_record: &ExternalRecord,
    ) -> Result<bool, RpcError>;
    fn delete_external_record(&self, internal_record: &InternalRecord) -> Result<bool, RpcError>;

    fn validate_account(
        &self,
        account_name: &str,
        account_password: &str,
        privileges: Privileges,
    ) -> Result<bool, RpcError>;

    fn get_sample_profile(&self, condition: &Profile) -> Result<Option<Profile>, RpcError>;
    fn get_sample_profiles_sql(&self, sql: &str) -> Result<Option<Fetcher<Profile>>, RpcError>;
    fn get_sample_profile_attribute_list(&self) -> Result<Option<AttributeList>, RpcError>;
    fn insert_sample_profile(&self, profile: &Profile) -> Result<bool, RpcError>;
    fn update_sample_profile(&self, profile: &Profile) -> Result<bool, RpcError>;
    fn delete_sample_profile(&self, condition: &Profile) -> Result<bool, RpcError>;

    fn get_profile(&self, unit: &str, condition: &Profile) -> Result<Option<Profile>, RpcError>;
    fn get_profiles_sql(&self, sql: &str) -> Result<Option<Fetcher<Profile>>, RpcError>;
    fn get_profile_attribute_list(&self, unit: &str) -> Result<Option<AttributeList>, RpcError>;
    fn insert_profile(&self, unit: &str, profile: &Profile) -> Result<bool, RpcError>;
    fn update_profile(&self, unit: &str, profile: &Profile) -> Result<bool, RpcError>;
    fn delete_profile(&self, unit: &str, condition: &Profile) -> Result<bool, RpcError>;

    fn get_snapshot(&self) -> Result<Option<Snapshot>, RpcError>;
    fn get_server_config(&self) -> Result<Option<DataConfig>, RpcError>;
    fn get_evaluator(&self, evaluator_name: &str) -> Result<Option<EvaluatorRef>, RpcError>;
    fn get_evaluator_names(&self) -> Result<Vec<String>, RpcError>;
}

/// Receives server lifecycle notifications. Called synchronously by the server while it holds
/// its state lock, so implementations must not call back into the server that notified them.
/// Returning an error gets the listener unregistered.
pub trait ServerStatusListener: Send + Sync {
    fn server_status_changed(&self, event: &ServerStatusEvent) -> Result<(), RpcError>;
}

/// Handle returned when registering a status listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

pub trait Server: Send + Sync {
    fn start(&self) -> Result<(), RpcError>;
    fn pause(&self) -> Result<(), RpcError>;
    fn resume(&self) -> Result<(), RpcError>;
    fn stop(&self) -> Result<(), RpcError>;
    fn exit(&self) -> Result<(), RpcError>;

    fn is_started(&self) -> Result<bool, RpcError>;
    fn is_paused(&self) -> Result<bool, RpcError>;
    fn is_running(&self) -> Result<bool, RpcError>;

    fn get_config(&self) -> Result<ServerConfig, RpcError>;
    fn set_config(&self, config: ServerConfig) -> Result<(), RpcError>;

    fn add_status_listener(
        &self,
        listener: Arc<dyn ServerStatusListener>,
    ) -> Result<ListenerId, RpcError>;
    fn remove_status_listener(&self, id: ListenerId) -> Result<bool, RpcError>;

    fn ping(&self) -> Result<bool, RpcError>;

    /// Requests in flight, for balancing sessions across servers.
    fn active_measure(&self) -> Result<Arc<ActiveMeasure>, RpcError>;
}

/// Authenticated front door to a server. Every call re-validates the credentials; denial is
/// `Ok(None)`, never a partially usable reference.
pub trait Gateway: Send + Sync {
    /// Requires the admin privilege.
    fn get_remote_server(
        &self,
        account: &str,
        password: &str,
    ) -> Result<Option<Arc<dyn Server>>, RpcError>;

    /// Requires the access privilege and a running server.
    fn get_remote_service(
        &self,
        account: &str,
        password: &str,
    ) -> Result<Option<Arc<dyn Service>>, RpcError>;
}

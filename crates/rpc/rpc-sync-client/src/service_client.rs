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

use crate::Transport;
use reco_common::Privileges;
use reco_common::model::{
    AttributeList, DataConfig, EvaluatorRef, ExternalRecord, Fetcher, InternalRecord, Nominal,
    NominalList, Profile, RatingVector, RecommendParam, Snapshot,
};
use rpc_common::request_builders::*;
use rpc_common::{Request, Response, RpcError, Service};
use std::collections::BTreeSet;
use std::sync::Mutex;

/// Presents any [`Transport`] as a [`Service`], turning each call into one request.
pub struct ServiceClient<T: Transport> {
    transport: Mutex<T>,
}

impl<T: Transport> ServiceClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Mutex::new(transport),
        }
    }

    pub fn call(&self, request: Request) -> Result<Response, RpcError> {
        let mut transport = self
            .transport
            .lock()
            .map_err(|_| RpcError::CouldNotSend("transport lock poisoned".to_string()))?;
        transport.send(request)
    }

    pub fn get_session_attribute(&self, attribute: &str) -> Result<Option<String>, RpcError> {
        self.call(mk_get_session_attribute_request(attribute))?
            .into_string()
    }

    pub fn is_open(&self) -> bool {
        self.transport.lock().map(|t| t.is_open()).unwrap_or(false)
    }

    /// Say goodbye to the server and release the channel.
    pub fn close(&self) {
        if let Ok(mut transport) = self.transport.lock() {
            transport.close();
        }
    }

    pub fn into_inner(self) -> Result<T, RpcError> {
        self.transport
            .into_inner()
            .map_err(|_| RpcError::CouldNotSend("transport lock poisoned".to_string()))
    }
}

impl<T: Transport> Service for ServiceClient<T> {
    fn estimate(
        &self,
        param: &RecommendParam,
        query_ids: &BTreeSet<i32>,
    ) -> Result<Option<RatingVector>, RpcError> {
        self.call(mk_estimate_request(param.clone(), query_ids.clone()))?
            .into_rating_vector()
    }

    fn recommend(
        &self,
        param: &RecommendParam,
        max_recommend: i32,
    ) -> Result<Option<RatingVector>, RpcError> {
        self.call(mk_recommend_request(param.clone(), max_recommend))?
            .into_rating_vector()
    }

    fn recommend_user(
        &self,
        user_id: i32,
        max_recommend: i32,
    ) -> Result<Option<RatingVector>, RpcError> {
        self.call(mk_recommend_user_request(user_id, max_recommend))?
            .into_rating_vector()
    }

    fn insert_rating(&self, rating: &RatingVector) -> Result<bool, RpcError> {
        self.call(mk_insert_rating_request(rating.clone()))?.into_bool()
    }

    fn update_rating(&self, rating: &RatingVector) -> Result<bool, RpcError> {
        self.call(mk_update_rating_request(rating.clone()))?.into_bool()
    }

    fn delete_rating(&self, rating: &RatingVector) -> Result<bool, RpcError> {
        self.call(mk_delete_rating_request(rating.clone()))?.into_bool()
    }

    fn get_user_ids(&self) -> Result<Option<Fetcher<i32>>, RpcError> {
        self.call(mk_get_user_ids_request())?.into_ids()
    }

    fn get_user_rating(&self, user_id: i32) -> Result<Option<RatingVector>, RpcError> {
        self.call(mk_get_user_rating_request(user_id))?
            .into_rating_vector()
    }

    fn get_user_ratings(&self) -> Result<Option<Fetcher<RatingVector>>, RpcError> {
        self.call(mk_get_user_ratings_request())?.into_rating_vectors()
    }

    fn get_user_ratings_sql(&self, sql: &str) -> Result<Option<Fetcher<RatingVector>>, RpcError> {
        self.call(mk_get_user_ratings_sql_request(sql))?
            .into_rating_vectors()
    }

    fn delete_user_rating(&self, user_id: i32) -> Result<bool, RpcError> {
        self.call(mk_delete_user_rating_request(user_id))?.into_bool()
    }

    fn get_user_profile(&self, user_id: i32) -> Result<Option<Profile>, RpcError> {
        self.call(mk_get_user_profile_request(user_id))?.into_profile()
    }

    fn get_user_profile_by_external(
        &self,
        external_user_id: &str,
    ) -> Result<Option<Profile>, RpcError> {
        self.call(mk_get_user_profile_by_external_request(external_user_id))?
            .into_profile()
    }

    fn get_user_profiles(&self) -> Result<Option<Fetcher<Profile>>, RpcError> {
        self.call(mk_get_user_profiles_request())?.into_profiles()
    }

    fn get_user_profiles_sql(&self, sql: &str) -> Result<Option<Fetcher<Profile>>, RpcError> {
        self.call(mk_get_user_profiles_sql_request(sql))?
            .into_profiles()
    }

    fn get_user_attribute_list(&self) -> Result<Option<AttributeList>, RpcError> {
        self.call(mk_get_user_attribute_list_request())?
            .into_attribute_list()
    }

    fn insert_user_profile(
        &self,
        profile: &Profile,
        external_record: Option<&ExternalRecord>,
    ) -> Result<bool, RpcError> {
        self.call(mk_insert_user_profile_request(
            profile.clone(),
            external_record.cloned(),
        ))?
        .into_bool()
    }

    fn update_user_profile(&self, profile: &Profile) -> Result<bool, RpcError> {
        self.call(mk_update_user_profile_request(profile.clone()))?
            .into_bool()
    }

    fn delete_user_profile(&self, user_id: i32) -> Result<bool, RpcError> {
        self.call(mk_delete_user_profile_request(user_id))?.into_bool()
    }

    fn get_user_external_record(&self, user_id: i32) -> Result<Option<ExternalRecord>, RpcError> {
        self.call(mk_get_user_external_record_request(user_id))?
            .into_external_record()
    }

    fn get_item_ids(&self) -> Result<Option<Fetcher<i32>>, RpcError> {
        self.call(mk_get_item_ids_request())?.into_ids()
    }

    fn get_item_rating(&self, item_id: i32) -> Result<Option<RatingVector>, RpcError> {
        self.call(mk_get_item_rating_request(item_id))?
            .into_rating_vector()
    }

    fn get_item_ratings(&self) -> Result<Option<Fetcher<RatingVector>>, RpcError> {
        self.call(mk_get_item_ratings_request())?.into_rating_vectors()
    }

    fn get_item_ratings_sql(&self, sql: &str) -> Result<Option<Fetcher<RatingVector>>, RpcError> {
        self.call(mk_get_item_ratings_sql_request(sql))?
            .into_rating_vectors()
    }

    fn delete_item_rating(&self, item_id: i32) -> Result<bool, RpcError> {
        self.call(mk_delete_item_rating_request(item_id))?.into_bool()
    }

    fn get_item_profile(&self, item_id: i32) -> Result<Option<Profile>, RpcError> {
        self.call(mk_get_item_profile_request(item_id))?.into_profile()
    }

    fn get_item_profile_by_external(
        &self,
        external_item_id: &str,
    ) -> Result<Option<Profile>, RpcError> {
        self.call(mk_get_item_profile_by_external_request(external_item_id))?
            .into_profile()
    }

    fn get_item_profiles(&self) -> Result<Option<Fetcher<Profile>>, RpcError> {
        self.call(mk_get_item_profiles_request())?.into_profiles()
    }

    fn get_item_profiles_sql(&self, sql: &str) -> Result<Option<Fetcher<Profile>>, RpcError> {
        self.call(mk_get_item_profiles_sql_request(sql))?
            .into_profiles()
    }

    fn get_item_attribute_list(&self) -> Result<Option<AttributeList>, RpcError> {
        self.call(mk_get_item_attribute_list_request())?
            .into_attribute_list()
    }

    fn insert_item_profile(
        &self,
        profile: &Profile,
        external_record: Option<&ExternalRecord>,
    ) -> Result<bool, RpcError> {
        self.call(mk_insert_item_profile_request(
            profile.clone(),
            external_record.cloned(),
        ))?
        .into_bool()
    }

    fn update_item_profile(&self, profile: &Profile) -> Result<bool, RpcError> {
        self.call(mk_update_item_profile_request(profile.clone()))?
            .into_bool()
    }

    fn delete_item_profile(&self, item_id: i32) -> Result<bool, RpcError> {
        self.call(mk_delete_item_profile_request(item_id))?.into_bool()
    }

    fn get_item_external_record(&self, item_id: i32) -> Result<Option<ExternalRecord>, RpcError> {
        self.call(mk_get_item_external_record_request(item_id))?
            .into_external_record()
    }

    fn get_nominal(&self, unit: &str, attribute: &str) -> Result<Option<NominalList>, RpcError> {
        self.call(mk_get_nominal_request(unit, attribute))?
            .into_nominal_list()
    }

    fn insert_nominal(
        &self,
        unit: &str,
        attribute: &str,
        nominal: &Nominal,
    ) -> Result<bool, RpcError> {
        self.call(mk_insert_nominal_request(unit, attribute, nominal.clone()))?
            .into_bool()
    }

    fn update_nominal(
        &self,
        unit: &str,
        attribute: &str,
        nominal: &Nominal,
    ) -> Result<bool, RpcError> {
        self.call(mk_update_nominal_request(unit, attribute, nominal.clone()))?
            .into_bool()
    }

    fn delete_nominal(&self, unit: &str, attribute: &str) -> Result<bool, RpcError> {
        self.call(mk_delete_nominal_request(unit, attribute))?
            .into_bool()
    }

    fn get_external_record(
        &self,
        internal_record: &InternalRecord,
    ) -> Result<Option<ExternalRecord>, RpcError> {
        self.call(mk_get_external_record_request(internal_record.clone()))?
            .into_external_record()
    }

    fn insert_external_record(
        &self,
        internal_record: &InternalRecord,
        external_record: &ExternalRecord,
    ) -> Result<bool, RpcError> {
        self.call(mk_insert_external_record_request(
            internal_record.clone(),
            external_record.clone(),
        ))?
        .into_bool()
    }

    fn update_external_record(
        &self,
        internal_record: &InternalRecord,
        external_record: &ExternalRecord,
    ) -> Result<bool, RpcError> {
        self.call(mk_update_external_record_request(
            internal_record.clone(),
            external_record.clone(),
        ))?
        .into_bool()
    }

    fn delete_external_record(&self, internal_record: &InternalRecord) -> Result<bool, RpcError> {
        self.call(mk_delete_external_record_request(internal_record.clone()))?
            .into_bool()
    }

    /// On a socket connection this goes through the already-authenticated session; use
    /// [`crate::SocketConnection::authenticate`] to establish one.
    fn validate_account(
        &self,
        account_name: &str,
        account_password: &str,
        privileges: Privileges,
    ) -> Result<bool, RpcError> {
        self.call(mk_validate_account_request(
            account_name,
            account_password,
            privileges,
        ))?
        .into_bool()
    }

    fn get_sample_profile(&self, condition: &Profile) -> Result<Option<Profile>, RpcError> {
        self.call(mk_get_sample_profile_request(condition.clone()))?
            .into_profile()
    }

    fn get_sample_profiles_sql(&self, sql: &str) -> Result<Option<Fetcher<Profile>>, RpcError> {
        self.call(mk_get_sample_profiles_sql_request(sql))?
            .into_profiles()
    }

    fn get_sample_profile_attribute_list(&self) -> Result<Option<AttributeList>, RpcError> {
        self.call(mk_get_sample_profile_attribute_list_request())?
            .into_attribute_list()
    }

    fn insert_sample_profile(&self, profile: &Profile) -> Result<bool, RpcError> {
        self.call(mk_insert_sample_profile_request(profile.clone()))?
            .into_bool()
    }

    fn update_sample_profile(&self, profile: &Profile) -> Result<bool, RpcError> {
        self.call(mk_update_sample_profile_request(profile.clone()))?
            .into_bool()
    }

    fn delete_sample_profile(&self, condition: &Profile) -> Result<bool, RpcError> {
        self.call(mk_delete_sample_profile_request(condition.clone()))?
            .into_bool()
    }

    fn get_profile(&self, unit: &str, condition: &Profile) -> Result<Option<Profile>, RpcError> {
        self.call(mk_get_profile_request(unit, condition.clone()))?
            .into_profile()
    }

    fn get_profiles_sql(&self, sql: &str) -> Result<Option<Fetcher<Profile>>, RpcError> {
        self.call(mk_get_profiles_sql_request(sql))?.into_profiles()
    }

    fn get_profile_attribute_list(&self, unit: &str) -> Result<Option<AttributeList>, RpcError> {
        self.call(mk_get_profile_attribute_list_request(unit))?
            .into_attribute_list()
    }

    fn insert_profile(&self, unit: &str, profile: &Profile) -> Result<bool, RpcError> {
        self.call(mk_insert_profile_request(unit, profile.clone()))?
            .into_bool()
    }

    fn update_profile(&self, unit: &str, profile: &Profile) -> Result<bool, RpcError> {
        self.call(mk_update_profile_request(unit, profile.clone()))?
            .into_bool()
    }

    fn delete_profile(&self, unit: &str, condition: &Profile) -> Result<bool, RpcError> {
        self.call(mk_delete_profile_request(unit, condition.clone()))?
            .into_bool()
    }

    fn get_snapshot(&self) -> Result<Option<Snapshot>, RpcError> {
        self.call(mk_get_snapshot_request())?.into_snapshot()
    }

    fn get_server_config(&self) -> Result<Option<DataConfig>, RpcError> {
        self.call(mk_get_server_config_request())?.into_data_config()
    }

    fn get_evaluator(&self, evaluator_name: &str) -> Result<Option<EvaluatorRef>, RpcError> {
        self.call(mk_get_evaluator_request(evaluator_name))?
            .into_evaluator()
    }

    fn get_evaluator_names(&self) -> Result<Vec<String>, RpcError> {
        self.call(mk_get_evaluator_names_request())?
            .into_string_array()
    }
}

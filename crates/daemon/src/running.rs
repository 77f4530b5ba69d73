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

//! The service handed out through the gateway. Every call is refused unless the server is
//! running, and counts against the server's active measure while it runs.

use crate::power_server::PowerServer;
use reco_common::Privileges;
use reco_common::model::{
    AttributeList, DataConfig, EvaluatorRef, ExternalRecord, Fetcher, InternalRecord, Nominal,
    NominalList, Profile, RatingVector, RecommendParam, Snapshot,
};
use rpc_common::{RpcError, RpcMessageError, Server, Service};
use std::collections::BTreeSet;
use std::sync::Arc;

pub struct RunningService {
    server: Arc<PowerServer>,
}

impl RunningService {
    pub fn new(server: Arc<PowerServer>) -> Self {
        Self { server }
    }

    fn run<T>(
        &self,
        call: impl FnOnce(&dyn Service) -> Result<T, RpcError>,
    ) -> Result<T, RpcError> {
        if !self.server.is_running()? {
            return Err(RpcError::Failure(RpcMessageError::NotRunning));
        }
        let _active = self.server.measure().enter();
        call(self.server.service().as_ref())
    }
}

macro_rules! gated {
    ($(fn $name:ident(&self $(, $arg:ident: $ty:ty)*) -> $ret:ty;)*) => {
        $(
            fn $name(&self $(, $arg: $ty)*) -> Result<$ret, RpcError> {
                self.run(|service| service.$name($($arg),*))
            }
        )*
    };
}

impl Service for RunningService {
    gated! {
        fn estimate(&self, param: &RecommendParam, query_ids: &BTreeSet<i32>) -> Option<RatingVector>;
        fn recommend(&self, param: &RecommendParam, max_recommend: i32) -> Option<RatingVector>;
        fn recommend_user(&self, user_id: i32, max_recommend: i32) -> Option<RatingVector>;

        fn insert_rating(&self, rating: &RatingVector) -> bool;
        fn update_rating(&self, rating: &RatingVector) -> bool;
        fn delete_rating(&self, rating: &RatingVector) -> bool;

        fn get_user_ids(&self) -> Option<Fetcher<i32>>;
        fn get_user_rating(&self, user_id: i32) -> Option<RatingVector>;
        fn get_user_ratings(&self) -> Option<Fetcher<RatingVector>>;
        fn get_user_ratings_sql(&self, sql: &str) -> Option<Fetcher<RatingVector>>;
        fn delete_user_rating(&self, user_id: i32) -> bool;
        fn get_user_profile(&self, user_id: i32) -> Option<Profile>;
        fn get_user_profile_by_external(&self, external_user_id: &str) -> Option<Profile>;
        fn get_user_profiles(&self) -> Option<Fetcher<Profile>>;
        fn get_user_profiles_sql(&self, sql: &str) -> Option<Fetcher<Profile>>;
        fn get_user_attribute_list(&self) -> Option<AttributeList>;
        fn insert_user_profile(&self, profile: &Profile, external_record: Option<&ExternalRecord>) -> bool;
        fn update_user_profile(&self, profile: &Profile) -> bool;
        fn delete_user_profile(&self, user_id: i32) -> bool;
        fn get_user_external_record(&self, user_id: i32) -> Option<ExternalRecord>;

        fn get_item_ids(&self) -> Option<Fetcher<i32>>;
        fn get_item_rating(&self, item_id: i32) -> Option<RatingVector>;
        fn get_item_ratings(&self) -> Option<Fetcher<RatingVector>>;
        fn get_item_ratings_sql(&self, sql: &str) -> Option<Fetcher<RatingVector>>;
        fn delete_item_rating(&self, item_id: i32) -> bool;
        fn get_item_profile(&self, item_id: i32) -> Option<Profile>;
        fn get_item_profile_by_external(&self, external_item_id: &str) -> Option<Profile>;
        fn get_item_profiles(&self) -> Option<Fetcher<Profile>>;
        fn get_item_profiles_sql(&self, sql: &str) -> Option<Fetcher<Profile>>;
        fn get_item_attribute_list(&self) -> Option<AttributeList>;
        fn insert_item_profile(&self, profile: &Profile, external_record: Option<&ExternalRecord>) -> bool;
        fn update_item_profile(&self, profile: &Profile) -> bool;
        fn delete_item_profile(&self, item_id: i32) -> bool;
        fn get_item_external_record(&self, item_id: i32) -> Option<ExternalRecord>;

        fn get_nominal(&self, unit: &str, attribute: &str) -> Option<NominalList>;
        fn insert_nominal(&self, unit: &str, attribute: &str, nominal: &Nominal) -> bool;
        fn update_nominal(&self, unit: &str, attribute: &str, nominal: &Nominal) -> bool;
        fn delete_nominal(&self, unit: &str, attribute: &str) -> bool;

        fn get_external_record(&self, internal_record: &InternalRecord) -> Option<ExternalRecord>;
        fn insert_external_record(&self, internal_record: &InternalRecord, external_record: &ExternalRecord) -> bool;
        fn update_external_record(&self, internal_record: &InternalRecord, external_record: &ExternalRecord) -> bool;
        fn delete_external_record(&self, internal_record: &InternalRecord) -> bool;

        fn get_sample_profile(&self, condition: &Profile) -> Option<Profile>;
        fn get_sample_profiles_sql(&self, sql: &str) -> Option<Fetcher<Profile>>;
        fn get_sample_profile_attribute_list(&self) -> Option<AttributeList>;
        fn insert_sample_profile(&self, profile: &Profile) -> bool;
        fn update_sample_profile(&self, profile: &Profile) -> bool;
        fn delete_sample_profile(&self, condition: &Profile) -> bool;

        fn get_profile(&self, unit: &str, condition: &Profile) -> Option<Profile>;
        fn get_profiles_sql(&self, sql: &str) -> Option<Fetcher<Profile>>;
        fn get_profile_attribute_list(&self, unit: &str) -> Option<AttributeList>;
        fn insert_profile(&self, unit: &str, profile: &Profile) -> bool;
        fn update_profile(&self, unit: &str, profile: &Profile) -> bool;
        fn delete_profile(&self, unit: &str, condition: &Profile) -> bool;

        fn get_snapshot(&self) -> Option<Snapshot>;
        fn get_server_config(&self) -> Option<DataConfig>;
        fn get_evaluator(&self, evaluator_name: &str) -> Option<EvaluatorRef>;
        fn get_evaluator_names(&self) -> Vec<String>;
    }

    // Checking an account does not need a running server.
    fn validate_account(
        &self,
        account_name: &str,
        account_password: &str,
        privileges: Privileges,
    ) -> Result<bool, RpcError> {
        self.server
            .service()
            .validate_account(account_name, account_password, privileges)
    }
}

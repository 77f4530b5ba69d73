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

//! In-memory dataset plus a mean-rating baseline recommender.
//!
//! The recommender's model (per-item and global means) is rebuilt when the backend opens and on
//! every periodic task run; writes in between are visible to queries immediately but only reach
//! estimates after the next rebuild.

use crate::accounts::Accounts;
use crate::evaluators::EvaluatorRegistry;
use crate::store::Backend;
use reco_common::model::{
    Attribute, AttributeList, DataConfig, EvaluatorRef, ExternalRecord, Fetcher, InternalRecord, Nominal,
    NominalList, Profile, Rating, RatingVector, RatingVectorKind, RecommendParam, Snapshot, units,
};
use reco_common::{Privileges, ServerConfig};
use rpc_common::{RpcError, RpcMessageError, Service};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error, info};

pub const USER_KEY: &str = "userid";
pub const ITEM_KEY: &str = "itemid";
pub const DEFAULT_KEY: &str = "id";

fn key_name(unit: &str) -> &'static str {
    match unit {
        units::USER => USER_KEY,
        units::ITEM => ITEM_KEY,
        _ => DEFAULT_KEY,
    }
}

fn unsupported_sql() -> RpcError {
    RpcMessageError::Unsupported("SQL queries are not supported by the in-memory store".to_string())
        .into()
}

fn poisoned() -> RpcError {
    RpcMessageError::InternalError("dataset lock poisoned".to_string()).into()
}

#[derive(Default)]
struct Dataset {
    /// Keyed by user; each vector is keyed by item.
    ratings: BTreeMap<i32, RatingVector>,
    profiles: HashMap<String, BTreeMap<i32, Profile>>,
    nominals: BTreeMap<(String, String), NominalList>,
    external: BTreeMap<InternalRecord, ExternalRecord>,
}

impl Dataset {
    fn unit(&self, unit: &str) -> Option<&BTreeMap<i32, Profile>> {
        self.profiles.get(unit)
    }

    fn unit_mut(&mut self, unit: &str) -> &mut BTreeMap<i32, Profile> {
        self.profiles.entry(unit.to_string()).or_default()
    }

    fn profile(&self, unit: &str, id: i32) -> Option<Profile> {
        self.unit(unit)?.get(&id).cloned()
    }

    fn profiles(&self, unit: &str) -> Vec<Profile> {
        self.unit(unit)
            .map(|p| p.values().cloned().collect())
            .unwrap_or_default()
    }

    fn find_profile(&self, unit: &str, condition: &Profile) -> Option<Profile> {
        self.unit(unit)?
            .values()
            .find(|p| p.matches(condition))
            .cloned()
    }

    fn attribute_list(&self, unit: &str) -> Option<AttributeList> {
        let profiles = self.unit(unit)?;
        let key = key_name(unit);
        let mut attributes = vec![];
        for profile in profiles.values() {
            for attribute in profile.attribute_list(key).attributes {
                if !attributes.iter().any(|a: &Attribute| a.name == attribute.name) {
                    attributes.push(attribute);
                }
            }
        }
        (!attributes.is_empty()).then(|| AttributeList::new(attributes))
    }

    fn upsert_profile(&mut self, unit: &str, profile: &Profile) {
        self.unit_mut(unit).insert(profile.id, profile.clone());
    }

    fn update_profile(&mut self, unit: &str, profile: &Profile) -> bool {
        match self.unit_mut(unit).get_mut(&profile.id) {
            Some(existing) => {
                *existing = profile.clone();
                true
            }
            None => false,
        }
    }

    fn delete_profile(&mut self, unit: &str, id: i32) -> bool {
        let removed = self.unit_mut(unit).remove(&id).is_some();
        if removed {
            self.external
                .remove(&InternalRecord::new(unit, key_name(unit), id));
        }
        removed
    }

    fn delete_matching(&mut self, unit: &str, condition: &Profile) -> bool {
        let ids: Vec<i32> = self
            .unit(unit)
            .map(|p| {
                p.values()
                    .filter(|p| p.matches(condition))
                    .map(|p| p.id)
                    .collect()
            })
            .unwrap_or_default();
        ids.into_iter()
            .fold(false, |any, id| self.delete_profile(unit, id) || any)
    }

    fn insert_profile_with_record(
        &mut self,
        unit: &str,
        profile: &Profile,
        external_record: Option<&ExternalRecord>,
    ) {
        self.upsert_profile(unit, profile);
        if let Some(external_record) = external_record {
            self.external.insert(
                InternalRecord::new(unit, key_name(unit), profile.id),
                external_record.clone(),
            );
        }
    }

    fn profile_by_external(&self, unit: &str, external_id: &str) -> Option<Profile> {
        let internal = self
            .external
            .iter()
            .find(|(internal, external)| internal.unit == unit && external.value == external_id)
            .map(|(internal, _)| internal.value)?;
        self.profile(unit, internal)
    }

    fn external_record_of(&self, unit: &str, id: i32) -> Option<ExternalRecord> {
        self.external
            .get(&InternalRecord::new(unit, key_name(unit), id))
            .cloned()
    }

    /// (user, item, rating) triples named by `vector`, whichever way round it is keyed.
    fn rating_pairs(vector: &RatingVector) -> impl Iterator<Item = (i32, i32, Rating)> + '_ {
        vector.ratings.iter().map(move |(other, rating)| match vector.kind {
            RatingVectorKind::User => (vector.id, *other, *rating),
            RatingVectorKind::Item => (*other, vector.id, *rating),
        })
    }

    fn insert_ratings(&mut self, vector: &RatingVector) -> bool {
        let mut changed = false;
        for (user, item, rating) in Self::rating_pairs(vector) {
            self.ratings
                .entry(user)
                .or_insert_with(|| RatingVector::user(user))
                .put(item, rating);
            changed = true;
        }
        changed
    }

    fn update_ratings(&mut self, vector: &RatingVector) -> bool {
        let mut changed = false;
        for (user, item, rating) in Self::rating_pairs(vector) {
            if let Some(existing) = self.ratings.get_mut(&user)
                && existing.is_rated(item)
            {
                existing.put(item, rating);
                changed = true;
            }
        }
        changed
    }

    fn delete_ratings(&mut self, vector: &RatingVector) -> bool {
        let mut changed = false;
        for (user, item, _) in Self::rating_pairs(vector) {
            if let Some(existing) = self.ratings.get_mut(&user) {
                changed |= existing.ratings.remove(&item).is_some();
            }
        }
        self.ratings.retain(|_, v| !v.is_empty());
        changed
    }

    fn item_rating(&self, item: i32) -> Option<RatingVector> {
        let mut vector = RatingVector::item(item);
        for (user, ratings) in &self.ratings {
            if let Some(rating) = ratings.get(item) {
                vector.put(*user, *rating);
            }
        }
        (!vector.is_empty()).then_some(vector)
    }

    fn user_ids(&self) -> Vec<i32> {
        let mut ids: BTreeSet<i32> = self.ratings.keys().copied().collect();
        if let Some(users) = self.unit(units::USER) {
            ids.extend(users.keys());
        }
        ids.into_iter().collect()
    }

    fn item_ids(&self) -> Vec<i32> {
        let mut ids: BTreeSet<i32> = self.ratings.values().flat_map(|v| v.ids()).collect();
        if let Some(items) = self.unit(units::ITEM) {
            ids.extend(items.keys());
        }
        ids.into_iter().collect()
    }
}

/// Per-item and global rating means.
#[derive(Debug, Default)]
struct MeanModel {
    item_means: BTreeMap<i32, f64>,
    global_mean: Option<f64>,
}

impl MeanModel {
    fn learn(dataset: &Dataset) -> Self {
        let mut sums: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
        let (mut total, mut count) = (0.0, 0usize);
        for vector in dataset.ratings.values() {
            for (item, rating) in &vector.ratings {
                let entry = sums.entry(*item).or_insert((0.0, 0));
                entry.0 += rating.value;
                entry.1 += 1;
                total += rating.value;
                count += 1;
            }
        }
        Self {
            item_means: sums
                .into_iter()
                .map(|(item, (sum, n))| (item, sum / n as f64))
                .collect(),
            global_mean: (count > 0).then(|| total / count as f64),
        }
    }

    fn estimate(&self, user: &RatingVector, item: i32) -> Option<f64> {
        self.item_means
            .get(&item)
            .copied()
            .or_else(|| user.mean())
            .or(self.global_mean)
    }
}

pub struct MemoryService {
    accounts: Arc<Accounts>,
    evaluators: Arc<EvaluatorRegistry>,
    config: RwLock<ServerConfig>,
    data: RwLock<Dataset>,
    model: RwLock<MeanModel>,
    open: AtomicBool,
}

impl MemoryService {
    pub fn new(
        config: ServerConfig,
        accounts: Arc<Accounts>,
        evaluators: Arc<EvaluatorRegistry>,
    ) -> Self {
        Self {
            accounts,
            evaluators,
            config: RwLock::new(config),
            data: RwLock::new(Dataset::default()),
            model: RwLock::new(MeanModel::default()),
            open: AtomicBool::new(false),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Dataset>, RpcError> {
        self.data.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Dataset>, RpcError> {
        self.data.write().map_err(|_| poisoned())
    }

    /// Rebuild the recommender model from the current ratings.
    pub fn learn(&self) -> Result<(), RpcError> {
        let model = MeanModel::learn(&*self.read()?);
        debug!(items = model.item_means.len(), "Rebuilt rating model");
        *self.model.write().map_err(|_| poisoned())? = model;
        Ok(())
    }

    fn estimate_all<I: IntoIterator<Item = i32>>(
        &self,
        user: &RatingVector,
        items: I,
    ) -> Result<RatingVector, RpcError> {
        let model = self.model.read().map_err(|_| poisoned())?;
        let mut estimated = RatingVector::user(user.id);
        for item in items {
            if let Some(value) = model.estimate(user, item) {
                estimated.put(item, Rating::new(value));
            }
        }
        Ok(estimated)
    }

    fn recommend_for(
        &self,
        user: &RatingVector,
        max_recommend: i32,
    ) -> Result<Option<RatingVector>, RpcError> {
        let candidates: Vec<i32> = self
            .read()?
            .item_ids()
            .into_iter()
            .filter(|item| !user.is_rated(*item))
            .collect();
        let estimated = self.estimate_all(user, candidates)?;

        let mut ranked: Vec<(i32, Rating)> = estimated.ratings.into_iter().collect();
        ranked.sort_by(|(a_item, a), (b_item, b)| {
            b.value.total_cmp(&a.value).then(a_item.cmp(b_item))
        });
        if max_recommend > 0 {
            ranked.truncate(max_recommend as usize);
        }
        if ranked.is_empty() {
            return Ok(None);
        }
        let mut recommended = RatingVector::user(user.id);
        for (item, rating) in ranked {
            recommended.put(item, rating);
        }
        Ok(Some(recommended))
    }

    fn non_empty<T>(rows: Vec<T>) -> Option<Fetcher<T>> {
        (!rows.is_empty()).then(|| Fetcher::new(rows))
    }
}

impl Backend for MemoryService {
    fn open(&self, config: &ServerConfig) -> Result<(), RpcError> {
        *self.config.write().map_err(|_| poisoned())? = config.clone();
        self.learn()?;
        self.open.store(true, Ordering::SeqCst);
        info!("In-memory store opened");
        Ok(())
    }

    fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
        info!("In-memory store closed");
    }

    fn reconfigure(&self, config: &ServerConfig) {
        if let Ok(mut current) = self.config.write() {
            *current = config.clone();
        }
    }

    fn run_tasks(&self) {
        if let Err(e) = self.learn() {
            error!("Periodic model rebuild failed: {}", e);
        }
    }
}

impl Service for MemoryService {
    fn estimate(
        &self,
        param: &RecommendParam,
        query_ids: &BTreeSet<i32>,
    ) -> Result<Option<RatingVector>, RpcError> {
        let estimated = self.estimate_all(&param.rating_vector, query_ids.iter().copied())?;
        Ok((!estimated.is_empty()).then_some(estimated))
    }

    fn recommend(
        &self,
        param: &RecommendParam,
        max_recommend: i32,
    ) -> Result<Option<RatingVector>, RpcError> {
        self.recommend_for(&param.rating_vector, max_recommend)
    }

    fn recommend_user(
        &self,
        user_id: i32,
        max_recommend: i32,
    ) -> Result<Option<RatingVector>, RpcError> {
        let user = self
            .read()?
            .ratings
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| RatingVector::user(user_id));
        self.recommend_for(&user, max_recommend)
    }

    fn insert_rating(&self, rating: &RatingVector) -> Result<bool, RpcError> {
        Ok(self.write()?.insert_ratings(rating))
    }

    fn update_rating(&self, rating: &RatingVector) -> Result<bool, RpcError> {
        Ok(self.write()?.update_ratings(rating))
    }

    fn delete_rating(&self, rating: &RatingVector) -> Result<bool, RpcError> {
        Ok(self.write()?.delete_ratings(rating))
    }

    fn get_user_ids(&self) -> Result<Option<Fetcher<i32>>, RpcError> {
        Ok(Self::non_empty(self.read()?.user_ids()))
    }

    fn get_user_rating(&self, user_id: i32) -> Result<Option<RatingVector>, RpcError> {
        Ok(self.read()?.ratings.get(&user_id).cloned())
    }

    fn get_user_ratings(&self) -> Result<Option<Fetcher<RatingVector>>, RpcError> {
        Ok(Self::non_empty(
            self.read()?.ratings.values().cloned().collect(),
        ))
    }

    fn get_user_ratings_sql(&self, _sql: &str) -> Result<Option<Fetcher<RatingVector>>, RpcError> {
        Err(unsupported_sql())
    }

    fn delete_user_rating(&self, user_id: i32) -> Result<bool, RpcError> {
        Ok(self.write()?.ratings.remove(&user_id).is_some())
    }

    fn get_user_profile(&self, user_id: i32) -> Result<Option<Profile>, RpcError> {
        Ok(self.read()?.profile(units::USER, user_id))
    }

    fn get_user_profile_by_external(
        &self,
        external_user_id: &str,
    ) -> Result<Option<Profile>, RpcError> {
        Ok(self
            .read()?
            .profile_by_external(units::USER, external_user_id))
    }

    fn get_user_profiles(&self) -> Result<Option<Fetcher<Profile>>, RpcError> {
        Ok(Self::non_empty(self.read()?.profiles(units::USER)))
    }

    fn get_user_profiles_sql(&self, _sql: &str) -> Result<Option<Fetcher<Profile>>, RpcError> {
        Err(unsupported_sql())
    }

    fn get_user_attribute_list(&self) -> Result<Option<AttributeList>, RpcError> {
        Ok(self.read()?.attribute_list(units::USER))
    }

    fn insert_user_profile(
        &self,
        profile: &Profile,
        external_record: Option<&ExternalRecord>,
    ) -> Result<bool, RpcError> {
        self.write()?
            .insert_profile_with_record(units::USER, profile, external_record);
        Ok(true)
    }

    fn update_user_profile(&self, profile: &Profile) -> Result<bool, RpcError> {
        Ok(self.write()?.update_profile(units::USER, profile))
    }

    fn delete_user_profile(&self, user_id: i32) -> Result<bool, RpcError> {
        Ok(self.write()?.delete_profile(units::USER, user_id))
    }

    fn get_user_external_record(&self, user_id: i32) -> Result<Option<ExternalRecord>, RpcError> {
        Ok(self.read()?.external_record_of(units::USER, user_id))
    }

    fn get_item_ids(&self) -> Result<Option<Fetcher<i32>>, RpcError> {
        Ok(Self::non_empty(self.read()?.item_ids()))
    }

    fn get_item_rating(&self, item_id: i32) -> Result<Option<RatingVector>, RpcError> {
        Ok(self.read()?.item_rating(item_id))
    }

    fn get_item_ratings(&self) -> Result<Option<Fetcher<RatingVector>>, RpcError> {
        let data = self.read()?;
        let rows = data
            .item_ids()
            .into_iter()
            .filter_map(|item| data.item_rating(item))
            .collect();
        Ok(Self::non_empty(rows))
    }

    fn get_item_ratings_sql(&self, _sql: &str) -> Result<Option<Fetcher<RatingVector>>, RpcError> {
        Err(unsupported_sql())
    }

    fn delete_item_rating(&self, item_id: i32) -> Result<bool, RpcError> {
        let mut data = self.write()?;
        let Some(vector) = data.item_rating(item_id) else {
            return Ok(false);
        };
        Ok(data.delete_ratings(&vector))
    }

    fn get_item_profile(&self, item_id: i32) -> Result<Option<Profile>, RpcError> {
        Ok(self.read()?.profile(units::ITEM, item_id))
    }

    fn get_item_profile_by_external(
        &self,
        external_item_id: &str,
    ) -> Result<Option<Profile>, RpcError> {
        Ok(self
            .read()?
            .profile_by_external(units::ITEM, external_item_id))
    }

    fn get_item_profiles(&self) -> Result<Option<Fetcher<Profile>>, RpcError> {
        Ok(Self::non_empty(self.read()?.profiles(units::ITEM)))
    }

    fn get_item_profiles_sql(&self, _sql: &str) -> Result<Option<Fetcher<Profile>>, RpcError> {
        Err(unsupported_sql())
    }

    fn get_item_attribute_list(&self) -> Result<Option<AttributeList>, RpcError> {
        Ok(self.read()?.attribute_list(units::ITEM))
    }

    fn insert_item_profile(
        &self,
        profile: &Profile,
        external_record: Option<&ExternalRecord>,
    ) -> Result<bool, RpcError> {
        self.write()?
            .insert_profile_with_record(units::ITEM, profile, external_record);
        Ok(true)
    }

    fn update_item_profile(&self, profile: &Profile) -> Result<bool, RpcError> {
        Ok(self.write()?.update_profile(units::ITEM, profile))
    }

    fn delete_item_profile(&self, item_id: i32) -> Result<bool, RpcError> {
        Ok(self.write()?.delete_profile(units::ITEM, item_id))
    }

    fn get_item_external_record(&self, item_id: i32) -> Result<Option<ExternalRecord>, RpcError> {
        Ok(self.read()?.external_record_of(units::ITEM, item_id))
    }

    fn get_nominal(&self, unit: &str, attribute: &str) -> Result<Option<NominalList>, RpcError> {
        Ok(self
            .read()?
            .nominals
            .get(&(unit.to_string(), attribute.to_string()))
            .cloned())
    }

    fn insert_nominal(
        &self,
        unit: &str,
        attribute: &str,
        nominal: &Nominal,
    ) -> Result<bool, RpcError> {
        self.write()?
            .nominals
            .entry((unit.to_string(), attribute.to_string()))
            .or_insert_with(|| NominalList::new(unit, attribute))
            .upsert(nominal.clone());
        Ok(true)
    }

    fn update_nominal(
        &self,
        unit: &str,
        attribute: &str,
        nominal: &Nominal,
    ) -> Result<bool, RpcError> {
        let mut data = self.write()?;
        let Some(list) = data
            .nominals
            .get_mut(&(unit.to_string(), attribute.to_string()))
        else {
            return Ok(false);
        };
        if list.by_index(nominal.index).is_none() {
            return Ok(false);
        }
        list.upsert(nominal.clone());
        Ok(true)
    }

    fn delete_nominal(&self, unit: &str, attribute: &str) -> Result<bool, RpcError> {
        Ok(self
            .write()?
            .nominals
            .remove(&(unit.to_string(), attribute.to_string()))
            .is_some())
    }

    fn get_external_record(
        &self,
        internal_record: &InternalRecord,
    ) -> Result<Option<ExternalRecord>, RpcError> {
        Ok(self.read()?.external.get(internal_record).cloned())
    }

    fn insert_external_record(
        &self,
        internal_record: &InternalRecord,
        external_record: &ExternalRecord,
    ) -> Result<bool, RpcError> {
        self.write()?
            .external
            .insert(internal_record.clone(), external_record.clone());
        Ok(true)
    }

    fn update_external_record(
        &self,
        internal_record: &InternalRecord,
        external_record: &ExternalRecord,
    ) -> Result<bool, RpcError> {
        let mut data = self.write()?;
        match data.external.get_mut(internal_record) {
            Some(existing) => {
                *existing = external_record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_external_record(&self, internal_record: &InternalRecord) -> Result<bool, RpcError> {
        Ok(self.write()?.external.remove(internal_record).is_some())
    }

    fn validate_account(
        &self,
        account_name: &str,
        account_password: &str,
        privileges: Privileges,
    ) -> Result<bool, RpcError> {
        Ok(self
            .accounts
            .validate(account_name, account_password, privileges))
    }

    fn get_sample_profile(&self, condition: &Profile) -> Result<Option<Profile>, RpcError> {
        Ok(self.read()?.find_profile(units::SAMPLE, condition))
    }

    fn get_sample_profiles_sql(&self, _sql: &str) -> Result<Option<Fetcher<Profile>>, RpcError> {
        Err(unsupported_sql())
    }

    fn get_sample_profile_attribute_list(&self) -> Result<Option<AttributeList>, RpcError> {
        Ok(self.read()?.attribute_list(units::SAMPLE))
    }

    fn insert_sample_profile(&self, profile: &Profile) -> Result<bool, RpcError> {
        self.write()?.upsert_profile(units::SAMPLE, profile);
        Ok(true)
    }

    fn update_sample_profile(&self, profile: &Profile) -> Result<bool, RpcError> {
        Ok(self.write()?.update_profile(units::SAMPLE, profile))
    }

    fn delete_sample_profile(&self, condition: &Profile) -> Result<bool, RpcError> {
        Ok(self.write()?.delete_matching(units::SAMPLE, condition))
    }

    fn get_profile(&self, unit: &str, condition: &Profile) -> Result<Option<Profile>, RpcError> {
        Ok(self.read()?.find_profile(unit, condition))
    }

    fn get_profiles_sql(&self, _sql: &str) -> Result<Option<Fetcher<Profile>>, RpcError> {
        Err(unsupported_sql())
    }

    fn get_profile_attribute_list(&self, unit: &str) -> Result<Option<AttributeList>, RpcError> {
        Ok(self.read()?.attribute_list(unit))
    }

    fn insert_profile(&self, unit: &str, profile: &Profile) -> Result<bool, RpcError> {
        self.write()?.upsert_profile(unit, profile);
        Ok(true)
    }

    fn update_profile(&self, unit: &str, profile: &Profile) -> Result<bool, RpcError> {
        Ok(self.write()?.update_profile(unit, profile))
    }

    fn delete_profile(&self, unit: &str, condition: &Profile) -> Result<bool, RpcError> {
        Ok(self.write()?.delete_matching(unit, condition))
    }

    fn get_snapshot(&self) -> Result<Option<Snapshot>, RpcError> {
        let config = self.get_server_config()?.unwrap_or_default();
        let data = self.read()?;
        Ok(Some(Snapshot {
            config,
            user_ratings: data.ratings.values().cloned().collect(),
            user_profiles: data.profiles(units::USER),
            item_profiles: data.profiles(units::ITEM),
            nominals: data.nominals.values().cloned().collect(),
            external_records: data
                .external
                .iter()
                .map(|(i, e)| (i.clone(), e.clone()))
                .collect(),
        }))
    }

    fn get_server_config(&self) -> Result<Option<DataConfig>, RpcError> {
        let config = self.config.read().map_err(|_| poisoned())?;
        Ok(Some(config.to_data_config()))
    }

    fn get_evaluator(&self, evaluator_name: &str) -> Result<Option<EvaluatorRef>, RpcError> {
        Ok(self.evaluators.get(evaluator_name))
    }

    fn get_evaluator_names(&self) -> Result<Vec<String>, RpcError> {
        Ok(self.evaluators.names())
    }
}

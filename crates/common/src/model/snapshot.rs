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

use crate::model::{DataConfig, ExternalRecord, InternalRecord, NominalList, Profile, RatingVector};
use serde::{Deserialize, Serialize};

/// Point-in-time copy of a dataset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub config: DataConfig,
    pub user_ratings: Vec<RatingVector>,
    pub user_profiles: Vec<Profile>,
    pub item_profiles: Vec<Profile>,
    pub nominals: Vec<NominalList>,
    pub external_records: Vec<(InternalRecord, ExternalRecord)>,
}

impl Snapshot {
    pub fn user_ids(&self) -> Vec<i32> {
        self.user_ratings.iter().map(|v| v.id).collect()
    }

    pub fn item_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self
            .user_ratings
            .iter()
            .flat_map(|v| v.ids())
            .chain(self.item_profiles.iter().map(|p| p.id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

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

use crate::model::Profile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub value: f64,
    /// Milliseconds since the epoch, if known.
    pub rated_at: Option<u64>,
}

impl Rating {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            rated_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingVectorKind {
    User,
    Item,
}

/// Ratings owned by one user (keyed by item) or one item (keyed by user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingVector {
    pub id: i32,
    pub kind: RatingVectorKind,
    // Carried as a list of pairs: JSON object keys are strings, and the request envelope
    // buffers fields before decoding them, which loses the string-to-integer key coercion.
    #[serde(with = "rating_pairs")]
    pub ratings: BTreeMap<i32, Rating>,
}

impl RatingVector {
    pub fn user(id: i32) -> Self {
        Self {
            id,
            kind: RatingVectorKind::User,
            ratings: BTreeMap::new(),
        }
    }

    pub fn item(id: i32) -> Self {
        Self {
            id,
            kind: RatingVectorKind::Item,
            ratings: BTreeMap::new(),
        }
    }

    pub fn with_rating(mut self, other_id: i32, value: f64) -> Self {
        self.ratings.insert(other_id, Rating::new(value));
        self
    }

    pub fn put(&mut self, other_id: i32, rating: Rating) {
        self.ratings.insert(other_id, rating);
    }

    pub fn get(&self, other_id: i32) -> Option<&Rating> {
        self.ratings.get(&other_id)
    }

    pub fn is_rated(&self, other_id: i32) -> bool {
        self.ratings.contains_key(&other_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.ratings.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        let sum: f64 = self.ratings.values().map(|r| r.value).sum();
        Some(sum / self.ratings.len() as f64)
    }
}

mod rating_pairs {
    use super::Rating;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        ratings: &BTreeMap<i32, Rating>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let pairs: Vec<(i32, Rating)> = ratings.iter().map(|(k, v)| (*k, *v)).collect();
        pairs.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<i32, Rating>, D::Error> {
        let pairs = Vec::<(i32, Rating)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

/// Input to `estimate` and `recommend`: the ratings of the target, plus their profile if the
/// algorithm needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendParam {
    pub rating_vector: RatingVector,
    pub profile: Option<Profile>,
}

impl RecommendParam {
    pub fn new(rating_vector: RatingVector) -> Self {
        Self {
            rating_vector,
            profile: None,
        }
    }
}

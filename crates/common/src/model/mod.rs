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

//! Payload types carried by requests and responses. The protocol layer treats them as opaque
//! values: it moves them between client and service without interpreting them.
//!
//! Every type here serializes through both the JSON line protocol and the binary object frame,
//! so none of them use serde attributes that need a self-describing format.

pub use data_config::DataConfig;
pub use evaluator::EvaluatorRef;
pub use fetcher::Fetcher;
pub use nominal::{Nominal, NominalList};
pub use profile::{AttrValue, Attribute, AttributeList, AttributeType, Profile};
pub use rating::{Rating, RatingVector, RatingVectorKind, RecommendParam};
pub use record::{ExternalRecord, InternalRecord};
pub use snapshot::Snapshot;

mod data_config;
mod evaluator;
mod fetcher;
mod nominal;
mod profile;
mod rating;
mod record;
mod snapshot;

/// Well-known storage units.
pub mod units {
    pub const USER: &str = "user";
    pub const ITEM: &str = "item";
    pub const SAMPLE: &str = "sample";
    pub const RATING: &str = "rating";
}

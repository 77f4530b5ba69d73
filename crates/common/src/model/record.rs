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

use serde::{Deserialize, Serialize};

/// Identity of a row in an external system (e.g. a shop's product SKU).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExternalRecord {
    pub unit: String,
    pub attribute: String,
    pub value: String,
}

impl ExternalRecord {
    pub fn new(unit: impl Into<String>, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// Identity of a row inside the recommender's own storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InternalRecord {
    pub unit: String,
    pub attribute: String,
    pub value: i32,
}

impl InternalRecord {
    pub fn new(unit: impl Into<String>, attribute: impl Into<String>, value: i32) -> Self {
        Self {
            unit: unit.into(),
            attribute: attribute.into(),
            value,
        }
    }
}

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

/// One value of a nominal (enumerated) attribute. `parent_index` is -1 for roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nominal {
    pub value: String,
    pub index: i32,
    pub parent_index: i32,
}

impl Nominal {
    pub fn new(value: impl Into<String>, index: i32) -> Self {
        Self {
            value: value.into(),
            index,
            parent_index: -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NominalList {
    pub unit: String,
    pub attribute: String,
    pub nominals: Vec<Nominal>,
}

impl NominalList {
    pub fn new(unit: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            attribute: attribute.into(),
            nominals: vec![],
        }
    }

    pub fn by_index(&self, index: i32) -> Option<&Nominal> {
        self.nominals.iter().find(|n| n.index == index)
    }

    /// Insert or replace the nominal with the same index.
    pub fn upsert(&mut self, nominal: Nominal) {
        match self.nominals.iter_mut().find(|n| n.index == nominal.index) {
            Some(existing) => *existing = nominal,
            None => self.nominals.push(nominal),
        }
    }

    pub fn len(&self) -> usize {
        self.nominals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nominals.is_empty()
    }
}

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
use std::collections::BTreeMap;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttributeType {
    Bit,
    Nominal,
    Integer,
    Real,
    String,
    Time,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeType,
    /// The attribute that identifies a profile within its unit.
    pub key: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, kind: AttributeType) -> Self {
        Self {
            name: name.into(),
            kind,
            key: false,
        }
    }

    pub fn key(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeType::Integer,
            key: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttributeList {
    pub attributes: Vec<Attribute>,
}

impl AttributeList {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self { attributes }
    }

    pub fn find(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn key(&self) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.key)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrValue {
    Bit(bool),
    Nominal(i32),
    Integer(i64),
    Real(f64),
    String(String),
    Time(u64),
    Missing,
}

impl AttrValue {
    pub fn kind(&self) -> Option<AttributeType> {
        Some(match self {
            AttrValue::Bit(_) => AttributeType::Bit,
            AttrValue::Nominal(_) => AttributeType::Nominal,
            AttrValue::Integer(_) => AttributeType::Integer,
            AttrValue::Real(_) => AttributeType::Real,
            AttrValue::String(_) => AttributeType::String,
            AttrValue::Time(_) => AttributeType::Time,
            AttrValue::Missing => return None,
        })
    }
}

/// One row of a unit: an identifier plus named attribute values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
    pub id: i32,
    pub values: BTreeMap<String, AttrValue>,
}

impl Profile {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.values.get(name)
    }

    /// True if every value set in `condition` is present and equal here. The condition's id is
    /// ignored unless it is non-zero.
    pub fn matches(&self, condition: &Profile) -> bool {
        if condition.id != 0 && condition.id != self.id {
            return false;
        }
        condition
            .values
            .iter()
            .all(|(name, value)| self.values.get(name) == Some(value))
    }

    /// Attribute list describing this profile, with `key_name` marked as the key.
    pub fn attribute_list(&self, key_name: &str) -> AttributeList {
        let mut attributes = vec![Attribute::key(key_name)];
        attributes.extend(self.values.iter().filter_map(|(name, value)| {
            value.kind().map(|kind| Attribute::new(name.clone(), kind))
        }));
        AttributeList::new(attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_condition() {
        let profile = Profile::new(4)
            .with_value("genre", AttrValue::String("noir".into()))
            .with_value("year", AttrValue::Integer(1949));
        let by_genre = Profile::new(0).with_value("genre", AttrValue::String("noir".into()));
        let by_id = Profile::new(4);
        let wrong = Profile::new(0).with_value("year", AttrValue::Integer(1950));
        assert!(profile.matches(&by_genre));
        assert!(profile.matches(&by_id));
        assert!(!profile.matches(&wrong));
        assert!(!profile.matches(&Profile::new(5)));
    }

    #[test]
    fn test_attribute_list_from_profile() {
        let profile = Profile::new(1)
            .with_value("age", AttrValue::Integer(30))
            .with_value("unknown", AttrValue::Missing);
        let list = profile.attribute_list("userid");
        assert_eq!(list.len(), 2);
        assert!(list.key().is_some_and(|k| k.name == "userid"));
        assert_eq!(list.find("age").map(|a| a.kind), Some(AttributeType::Integer));
        assert!(list.find("unknown").is_none());
    }
}

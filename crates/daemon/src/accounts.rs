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

//! Accounts known to the server, with argon2 password hashes and a privilege mask each.

use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use rand::Rng;
use reco_common::Privileges;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("account {0} already exists")]
    AlreadyExists(String),
    #[error("account name must not be empty")]
    EmptyName,
    #[error("unable to hash password: {0}")]
    HashFailed(String),
    #[error("account store lock poisoned")]
    Poisoned,
}

/// An account as it appears in the daemon configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub name: String,
    pub password: String,
    pub privileges: Privileges,
}

struct Account {
    password_hash: String,
    privileges: Privileges,
}

pub struct Accounts {
    params: Params,
    accounts: RwLock<HashMap<String, Account>>,
}

impl Default for Accounts {
    fn default() -> Self {
        Self::with_params(Params::default())
    }
}

impl Accounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use explicit argon2 cost parameters for newly hashed passwords.
    pub fn with_params(params: Params) -> Self {
        Self {
            params,
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// The cheapest parameters argon2 accepts. For tests and throwaway servers only.
    pub fn minimal_params() -> Params {
        Params::new(
            Params::MIN_M_COST,
            Params::MIN_T_COST,
            Params::MIN_P_COST,
            None,
        )
        .unwrap_or_default()
    }

    pub fn from_config(accounts: &[AccountConfig], params: Params) -> Result<Self, AccountError> {
        let store = Self::with_params(params);
        for account in accounts {
            store.add(&account.name, &account.password, account.privileges)?;
        }
        Ok(store)
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn add(
        &self,
        name: &str,
        password: &str,
        privileges: Privileges,
    ) -> Result<(), AccountError> {
        if name.is_empty() {
            return Err(AccountError::EmptyName);
        }
        let password_hash = self.hash_password(password)?;
        let mut accounts = self.accounts.write().map_err(|_| AccountError::Poisoned)?;
        if accounts.contains_key(name) {
            return Err(AccountError::AlreadyExists(name.to_string()));
        }
        accounts.insert(
            name.to_string(),
            Account {
                password_hash,
                privileges,
            },
        );
        info!(account = name, %privileges, "Added account");
        Ok(())
    }

    pub fn remove(&self, name: &str) -> bool {
        self.accounts
            .write()
            .map(|mut accounts| accounts.remove(name).is_some())
            .unwrap_or(false)
    }

    pub fn privileges(&self, name: &str) -> Option<Privileges> {
        let accounts = self.accounts.read().ok()?;
        accounts.get(name).map(|a| a.privileges)
    }

    pub fn len(&self) -> usize {
        self.accounts.read().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if the password matches and the account holds every bit of `required`.
    pub fn validate(&self, name: &str, password: &str, required: Privileges) -> bool {
        let Ok(accounts) = self.accounts.read() else {
            return false;
        };
        let Some(account) = accounts.get(name) else {
            debug!(account = name, "Unknown account");
            return false;
        };
        if !account.privileges.contains(required) {
            debug!(account = name, %required, granted = %account.privileges, "Insufficient privileges");
            return false;
        }
        let Ok(parsed) = PasswordHash::new(&account.password_hash) else {
            return false;
        };
        self.hasher()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    fn hash_password(&self, password: &str) -> Result<String, AccountError> {
        let mut salt = [0u8; 16];
        rand::rng().fill(&mut salt);
        let salt =
            SaltString::encode_b64(&salt).map_err(|e| AccountError::HashFailed(e.to_string()))?;
        self.hasher()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AccountError::HashFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn accounts() -> Accounts {
        let accounts = Accounts::with_params(Accounts::minimal_params());
        accounts
            .add("admin", "admin", Privileges::ADMIN | Privileges::EVALUATE)
            .unwrap();
        accounts.add("guest", "guest", Privileges::ACCESS).unwrap();
        accounts
    }

    #[test_case("admin", "admin", Privileges::ADMIN, true; "admin as admin")]
    #[test_case("admin", "admin", Privileges::EVALUATE, true; "admin may evaluate")]
    #[test_case("admin", "nope", Privileges::ACCESS, false; "wrong password")]
    #[test_case("guest", "guest", Privileges::ACCESS, true; "guest access")]
    #[test_case("guest", "guest", Privileges::ADMIN, false; "guest not admin")]
    #[test_case("nobody", "guest", Privileges::ACCESS, false; "unknown account")]
    fn test_validate(name: &str, password: &str, required: Privileges, expected: bool) {
        assert_eq!(accounts().validate(name, password, required), expected);
    }

    #[test]
    fn test_duplicate_and_remove() {
        let accounts = accounts();
        assert_eq!(
            accounts.add("guest", "x", Privileges::ACCESS),
            Err(AccountError::AlreadyExists("guest".to_string()))
        );
        assert_eq!(accounts.len(), 2);
        assert!(accounts.remove("guest"));
        assert!(!accounts.validate("guest", "guest", Privileges::ACCESS));
        assert_eq!(accounts.privileges("admin"), Some(Privileges::ADMIN | Privileges::EVALUATE));
    }

    #[test]
    fn test_hashes_are_salted() {
        let accounts = Accounts::with_params(Accounts::minimal_params());
        let a = accounts.hash_password("same").unwrap();
        let b = accounts.hash_password("same").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
    }
}

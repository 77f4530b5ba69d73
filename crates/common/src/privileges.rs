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
use std::fmt::{Display, Formatter};
use std::ops::BitOr;

/// Bitmask of capabilities granted to an account.
///
/// A requirement is satisfied when every bit it names is present in the granted mask, so
/// `ADMIN` (0b011) implies `ACCESS` (0b001), and `EVALUATE` (0b101) implies `ACCESS` as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Privileges(pub u32);

impl Privileges {
    pub const NONE: Privileges = Privileges(0);
    pub const ACCESS: Privileges = Privileges(0b001);
    pub const ADMIN: Privileges = Privileges(0b011);
    pub const EVALUATE: Privileges = Privileges(0b101);

    #[must_use]
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// True if `required` is a bitwise subset of `self`.
    #[must_use]
    pub fn contains(&self, required: Privileges) -> bool {
        self.0 & required.0 == required.0
    }

    pub fn is_admin(&self) -> bool {
        self.contains(Self::ADMIN)
    }
}

impl BitOr for Privileges {
    type Output = Privileges;

    fn bitor(self, rhs: Self) -> Self::Output {
        Privileges(self.0 | rhs.0)
    }
}

impl Display for Privileges {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#05b}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Privileges::ADMIN, Privileges::ACCESS, true; "admin implies access")]
    #[test_case(Privileges::ACCESS, Privileges::ADMIN, false; "access does not imply admin")]
    #[test_case(Privileges::EVALUATE, Privileges::ACCESS, true; "evaluate implies access")]
    #[test_case(Privileges::EVALUATE, Privileges::ADMIN, false; "evaluate does not imply admin")]
    #[test_case(Privileges::ADMIN | Privileges::EVALUATE, Privileges::EVALUATE, true; "union")]
    #[test_case(Privileges::NONE, Privileges::ACCESS, false; "none")]
    fn test_contains(granted: Privileges, required: Privileges, expected: bool) {
        assert_eq!(granted.contains(required), expected);
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        let json = serde_json::to_string(&Privileges::ADMIN).unwrap();
        assert_eq!(json, "3");
        let back: Privileges = serde_json::from_str("5").unwrap();
        assert_eq!(back, Privileges::EVALUATE);
    }
}

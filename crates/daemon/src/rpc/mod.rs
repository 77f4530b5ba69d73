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

//! Socket front end for the server
//!
//! Two listeners share one connection loop:
//! - the service socket, where clients authenticate and issue data operations
//! - the control socket, which only accepts lifecycle commands from admin accounts

use strum::Display;

mod listen;
mod session;

pub use listen::Listeners;
pub use session::{Reply, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SocketKind {
    Service,
    Control,
}

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

/// A fully materialized cursor over query results. Only the rows travel over the wire; the
/// cursor position is local to whoever holds the fetcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fetcher<T> {
    rows: Vec<T>,
    #[serde(skip)]
    position: usize,
}

impl<T> Fetcher<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self { rows, position: 0 }
    }

    /// Advance the cursor, returning the row under it.
    pub fn next_row(&mut self) -> Option<&T> {
        let row = self.rows.get(self.position)?;
        self.position += 1;
        Some(row)
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<T> {
        self.rows
    }
}

impl<T> Default for Fetcher<T> {
    fn default() -> Self {
        Self::new(vec![])
    }
}

impl<T> FromIterator<T> for Fetcher<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for Fetcher<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor() {
        let mut fetcher: Fetcher<i32> = [3, 1, 2].into_iter().collect();
        assert_eq!(fetcher.count(), 3);
        assert_eq!(fetcher.next_row(), Some(&3));
        assert_eq!(fetcher.next_row(), Some(&1));
        assert_eq!(fetcher.next_row(), Some(&2));
        assert_eq!(fetcher.next_row(), None);
        fetcher.reset();
        assert_eq!(fetcher.next_row(), Some(&3));
    }

    #[test]
    fn test_position_not_serialized() {
        let mut fetcher = Fetcher::new(vec![1, 2]);
        fetcher.next_row();
        let json = serde_json::to_string(&fetcher).unwrap();
        assert_eq!(json, r#"{"rows":[1,2]}"#);
        let mut back: Fetcher<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.next_row(), Some(&1));
    }
}

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

//! Counter of requests currently being served, used to pick the least busy server.

use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

/// Atomic count of in-flight requests.
///
/// Comparisons look at a snapshot of the counter, so ordering between two measures is only as
/// fresh as the moment it was taken.
#[derive(Default)]
pub struct ActiveMeasure {
    active: AtomicUsize,
}

impl fmt::Debug for ActiveMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveMeasure")
            .field("active", &self.count())
            .finish()
    }
}

impl ActiveMeasure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly accepted request, returning the updated count.
    #[inline]
    pub fn inc(&self) -> usize {
        self.active.fetch_add(1, AtomicOrdering::SeqCst) + 1
    }

    /// Record a completed request, returning the updated count. Never goes below zero.
    #[inline]
    pub fn dec(&self) -> usize {
        let previous = self
            .active
            .fetch_update(AtomicOrdering::SeqCst, AtomicOrdering::SeqCst, |v| {
                Some(v.saturating_sub(1))
            })
            .unwrap_or(0);
        previous.saturating_sub(1)
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.active.load(AtomicOrdering::SeqCst)
    }

    pub fn reset(&self) {
        self.active.store(0, AtomicOrdering::SeqCst);
    }

    /// Increment now and decrement when the returned guard drops, whichever way the request ends.
    pub fn enter(&self) -> ActiveRequestGuard<'_> {
        self.inc();
        ActiveRequestGuard { measure: self }
    }
}

impl PartialEq for ActiveMeasure {
    fn eq(&self, other: &Self) -> bool {
        self.count() == other.count()
    }
}

impl Eq for ActiveMeasure {}

impl PartialOrd for ActiveMeasure {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ActiveMeasure {
    fn cmp(&self, other: &Self) -> Ordering {
        self.count().cmp(&other.count())
    }
}

/// Scope guard returned by [`ActiveMeasure::enter`].
#[must_use]
pub struct ActiveRequestGuard<'a> {
    measure: &'a ActiveMeasure,
}

impl Drop for ActiveRequestGuard<'_> {
    fn drop(&mut self) {
        self.measure.dec();
    }
}

/// Pick the measure with the fewest in-flight requests.
pub fn least_busy<'a, I>(measures: I) -> Option<&'a ActiveMeasure>
where
    I: IntoIterator<Item = &'a ActiveMeasure>,
{
    measures.into_iter().min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_concurrent_inc_dec_returns_to_zero() {
        let measure = Arc::new(ActiveMeasure::new());
        let mut handles = vec![];
        for _ in 0..8 {
            let measure = measure.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..1000 {
                    measure.inc();
                    measure.dec();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(measure.count(), 0);
    }

    #[test]
    fn test_guard_decrements_on_unwind() {
        let measure = ActiveMeasure::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = measure.enter();
            assert_eq!(measure.count(), 1);
            panic!("request failed");
        }));
        assert!(result.is_err());
        assert_eq!(measure.count(), 0);
    }

    #[test]
    fn test_dec_saturates() {
        let measure = ActiveMeasure::new();
        assert_eq!(measure.dec(), 0);
        assert_eq!(measure.count(), 0);
    }

    #[test]
    fn test_ordering_and_least_busy() {
        let a = ActiveMeasure::new();
        let b = ActiveMeasure::new();
        let c = ActiveMeasure::new();
        a.inc();
        a.inc();
        b.inc();
        c.inc();
        c.inc();
        c.inc();
        assert!(b < a);
        assert!(a < c);
        let least = least_busy([&a, &b, &c]).unwrap();
        assert_eq!(least.count(), 1);
        assert!(std::ptr::eq(least, &b));
        assert!(least_busy(std::iter::empty()).is_none());
    }
}

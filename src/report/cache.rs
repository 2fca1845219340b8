//! A memo of computed monthly stats, invalidated whenever a user's data
//! changes.
//!
//! The cache is an explicit value handed around via `AppState`, not a
//! process-wide global, so tests can create and inspect one in isolation.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::{database_id::UserId, month::YearMonth};

use super::MonthlyStats;

/// Caches [MonthlyStats] per user and month.
///
/// Cloning is cheap; clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct StatsCache {
    entries: Arc<Mutex<HashMap<(UserId, YearMonth), MonthlyStats>>>,
}

impl StatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached stats for `(user_id, month)`, if any write has not
    /// invalidated them since they were stored.
    ///
    /// # Panics
    /// Panics if the lock is already held by the same thread.
    pub fn get(&self, user_id: UserId, month: YearMonth) -> Option<MonthlyStats> {
        self.entries.lock().unwrap().get(&(user_id, month)).copied()
    }

    /// Store freshly computed stats for `(user_id, month)`.
    ///
    /// # Panics
    /// Panics if the lock is already held by the same thread.
    pub fn insert(&self, user_id: UserId, month: YearMonth, stats: MonthlyStats) {
        self.entries.lock().unwrap().insert((user_id, month), stats);
    }

    /// Drop every cached month for `user_id`. Called from every write path;
    /// a write anywhere in the ledger can move any month's numbers.
    ///
    /// # Panics
    /// Panics if the lock is already held by the same thread.
    pub fn invalidate_user(&self, user_id: UserId) {
        self.entries
            .lock()
            .unwrap()
            .retain(|(entry_user_id, _), _| *entry_user_id != user_id);
    }
}

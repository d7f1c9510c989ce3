//! Frontend Models
//!
//! Task documents as stored, plus the id scheme used when creating them.

use std::cell::Cell;

use chrono::{DateTime, SecondsFormat, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Task document (matches the stored JSON)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Creation timestamp, doubles as the primary key
    #[serde(rename = "_id")]
    pub id: String,
    /// Store-assigned revision, absent until first written
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl Todo {
    pub fn new(id: String, title: String) -> Self {
        Self {
            id,
            rev: None,
            title,
            completed: false,
        }
    }
}

/// Count of tasks not yet completed
pub fn remaining_count(todos: &[Todo]) -> usize {
    todos.iter().filter(|todo| !todo.completed).count()
}

/// Issues ids of the form `2026-10-18T09:30:00.123Z`
///
/// Ids never repeat and always sort after the previous one, even when the
/// clock has not moved on.
#[derive(Debug, Default)]
pub struct TodoIdGenerator {
    last: Cell<Option<DateTime<Utc>>>,
}

impl TodoIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note an id already in the store so later ids sort after it
    ///
    /// Ids that are not timestamps are ignored.
    pub fn observe(&self, id: &str) {
        let Ok(seen) = DateTime::parse_from_rfc3339(id) else { return };
        let seen = seen.with_timezone(&Utc);
        if self.last.get().map_or(true, |last| seen > last) {
            self.last.set(Some(seen));
        }
    }

    pub fn next_id(&self) -> String {
        self.next_at(Utc::now())
    }

    pub fn next_at(&self, now: DateTime<Utc>) -> String {
        let now = now.trunc_subsecs(3);
        let at = match self.last.get() {
            Some(last) if now <= last => last + TimeDelta::milliseconds(1),
            _ => now,
        };
        self.last.set(Some(at));
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

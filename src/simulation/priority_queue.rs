//! Congestion priority queue for signalized junctions

use std::fmt;

use ordered_float::OrderedFloat;

use super::error::{SimError, SimResult};
use super::types::JunctionId;

#[derive(Debug, Clone, Copy, PartialEq)]
struct QueueEntry {
    junction: JunctionId,
    priority: OrderedFloat<f32>,
}

/// Junctions ordered by descending priority.
///
/// An entry at or above the current maximum is served ahead of everything
/// already queued, so ties at the top go to the most recent insert. Ties
/// further down keep their arrival order. Entries are kept in ascending order so the highest sits at the tail and
/// `remove_highest` is a plain `pop`.
#[derive(Debug, Clone, Default)]
pub struct PriorityQueue {
    entries: Vec<QueueEntry>,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn insert(&mut self, junction: JunctionId, priority: f32) {
        let priority = OrderedFloat(priority);
        let entry = QueueEntry { junction, priority };

        // A new maximum (or a tie with it) goes straight to the service front
        let at_front = self
            .entries
            .last()
            .map_or(true, |highest| priority >= highest.priority);
        if at_front {
            self.entries.push(entry);
            return;
        }

        // Below the maximum, equal priorities are served first in, first out
        let position = self.entries.partition_point(|entry| entry.priority < priority);
        self.entries.insert(position, entry);
    }

    pub fn remove_highest(&mut self) -> SimResult<JunctionId> {
        self.entries
            .pop()
            .map(|entry| entry.junction)
            .ok_or(SimError::EmptyQueue)
    }

    /// Upsert: drops the front-most entry for `junction` if there is one,
    /// then inserts it again with `new_priority`.
    pub fn reprioritize(&mut self, junction: JunctionId, new_priority: f32) {
        if let Some(position) = self
            .entries
            .iter()
            .rposition(|entry| entry.junction == junction)
        {
            self.entries.remove(position);
        }
        self.insert(junction, new_priority);
    }

    pub fn priority_of(&self, junction: JunctionId) -> Option<f32> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.junction == junction)
            .map(|entry| entry.priority.into_inner())
    }

    /// Entries in service order, highest priority first
    pub fn iter(&self) -> impl Iterator<Item = (JunctionId, f32)> + '_ {
        self.entries
            .iter()
            .rev()
            .map(|entry| (entry.junction, entry.priority.into_inner()))
    }
}

impl fmt::Display for PriorityQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "Queue is empty");
        }
        writeln!(f, "Priority Queue ({} entries):", self.len())?;
        for (position, (junction, priority)) in self.iter().enumerate() {
            writeln!(
                f,
                "  {}. Junction {}: priority {:.2}",
                position + 1,
                junction,
                priority
            )?;
        }
        Ok(())
    }
}

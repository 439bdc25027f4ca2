//! Delay-bucket vehicle queue
//!
//! Every road segment owns one queue. Vehicles entering the segment are put
//! into the bucket matching the segment's current delay; each cycle all
//! buckets move one step closer to zero and the vehicles that were at zero
//! are handed back to the segment so they can attempt their next hop.
//!
//! Buckets are keyed by the absolute tick at which they become due, so
//! advancing the queue is a single map removal regardless of how many
//! distinct delays are in flight.

use std::collections::{BTreeMap, BTreeSet};

use super::types::{AgentId, Delay};

/// Vehicles waiting on one segment, bucketed by remaining delay
#[derive(Debug, Clone, Default)]
pub struct VehicleQueue {
    /// Waiting vehicles keyed by the tick at which they reach the head
    waiting: BTreeMap<u64, BTreeSet<AgentId>>,
    /// Vehicles that no longer move
    parked: BTreeSet<AgentId>,
    /// Number of completed `advance` calls
    tick: u64,
}

impl VehicleQueue {
    /// Creates an empty queue at tick 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `vehicle` into the bucket for `delay`.
    ///
    /// The vehicle must not already be waiting in this queue.
    pub fn enqueue(&mut self, vehicle: AgentId, delay: Delay) {
        debug_assert!(
            self.remaining_delay(vehicle).is_none(),
            "vehicle {vehicle} is already queued"
        );
        self.waiting
            .entry(self.tick + u64::from(delay))
            .or_default()
            .insert(vehicle);
    }

    /// Let one cycle pass.
    ///
    /// Returns the vehicles that were at delay zero, ordered by id. They are
    /// no longer part of the queue.
    pub fn advance(&mut self) -> Vec<AgentId> {
        let ready = self
            .waiting
            .remove(&self.tick)
            .map(|bucket| bucket.into_iter().collect())
            .unwrap_or_default();
        self.tick += 1;
        ready
    }

    /// Remove `vehicle` from the waiting buckets (if present) and park it.
    pub fn park(&mut self, vehicle: AgentId) {
        let due = self
            .waiting
            .iter_mut()
            .find_map(|(due, bucket)| bucket.remove(&vehicle).then_some(*due));
        if let Some(due) = due {
            if self.waiting.get(&due).is_some_and(BTreeSet::is_empty) {
                self.waiting.remove(&due);
            }
        }
        self.parked.insert(vehicle);
    }

    /// Number of waiting vehicles. Parked vehicles are not counted.
    pub fn len(&self) -> usize {
        self.waiting.values().map(BTreeSet::len).sum()
    }

    /// True if no vehicle is waiting
    pub fn is_empty(&self) -> bool {
        self.waiting.values().all(BTreeSet::is_empty)
    }

    /// Cycles left before `vehicle` reaches the head, if it is waiting here
    pub fn remaining_delay(&self, vehicle: AgentId) -> Option<Delay> {
        self.waiting
            .iter()
            .find(|(_, bucket)| bucket.contains(&vehicle))
            .map(|(due, _)| Delay::try_from(due - self.tick).unwrap_or(Delay::MAX))
    }

    /// Whether `vehicle` was parked on this queue
    pub fn is_parked(&self, vehicle: AgentId) -> bool {
        self.parked.contains(&vehicle)
    }

    /// Number of parked vehicles
    pub fn parked_len(&self) -> usize {
        self.parked.len()
    }
}

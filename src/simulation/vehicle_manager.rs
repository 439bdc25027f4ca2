//! Staggered vehicle entry
//!
//! Vehicles can be scheduled to start at a later cycle. The simulator asks
//! the manager for the vehicles due at the start of every cycle.

use std::collections::BTreeMap;

use super::error::ConfigError;
use super::types::AgentId;
use super::vehicle::Vehicle;

/// Vehicles waiting for their start cycle
#[derive(Debug, Default)]
pub struct VehicleManager {
    /// Vehicles waiting to start, keyed by start cycle
    starting: BTreeMap<u64, Vec<Vehicle>>,
    /// Last cycle handed to `release`
    released_through: u64,
}

impl VehicleManager {
    /// Creates a manager with nothing scheduled
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `vehicle` to enter the map at `start_cycle`.
    ///
    /// Cycles are numbered from 1, and a cycle that has already been
    /// released cannot be scheduled anymore.
    pub fn schedule(&mut self, vehicle: Vehicle, start_cycle: u64) -> Result<(), ConfigError> {
        let reason = if start_cycle == 0 {
            Some("cycles start at 1")
        } else if start_cycle <= self.released_through {
            Some("cycle has already passed")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(ConfigError::InvalidSchedule {
                vehicle: vehicle.id(),
                cycle: start_cycle,
                reason,
            });
        }

        self.starting.entry(start_cycle).or_default().push(vehicle);
        Ok(())
    }

    /// Removes and returns the vehicles due at `cycle`, in scheduling order
    pub fn release(&mut self, cycle: u64) -> Vec<Vehicle> {
        self.released_through = self.released_through.max(cycle);
        self.starting.remove(&cycle).unwrap_or_default()
    }

    /// Whether a vehicle with this id is waiting to start
    pub fn is_scheduled(&self, id: AgentId) -> bool {
        self.starting
            .values()
            .flatten()
            .any(|vehicle| vehicle.id() == id)
    }

    /// Number of vehicles still waiting to start
    pub fn pending(&self) -> usize {
        self.starting.values().map(Vec::len).sum()
    }

    /// True once every scheduled vehicle has been released
    pub fn is_finished(&self) -> bool {
        self.starting.is_empty()
    }
}

//! Road segments, the nodes of the simulation map
//!
//! A segment owns its vehicle queue and its outgoing edges. Moves between two
//! segments need both of them and are therefore handled by
//! [`RoadMap::move_to`](super::map::RoadMap::move_to).

use std::collections::BTreeSet;

use log::{debug, warn};

use super::delay::DelayFunction;
use super::queue::VehicleQueue;
use super::types::{AgentId, Delay, SegmentId, CLOSED_DELAY};
use super::vehicle::Vehicle;

/// A road: one node of the map
#[derive(Debug, Clone)]
pub struct RoadSegment {
    id: SegmentId,
    /// Free-flow delay
    base_delay: Delay,
    /// Number of vehicles the segment holds before congestion sets in
    capacity: u32,
    delay_function: DelayFunction,
    closed: bool,
    /// Segments this one has a directed edge towards
    neighbors: BTreeSet<SegmentId>,
    queue: VehicleQueue,
}

impl RoadSegment {
    /// Creates an open segment without edges or vehicles
    pub fn new(
        id: SegmentId,
        delay_function: DelayFunction,
        base_delay: Delay,
        capacity: u32,
    ) -> Self {
        Self {
            id,
            base_delay,
            capacity,
            delay_function,
            closed: false,
            neighbors: BTreeSet::new(),
            queue: VehicleQueue::new(),
        }
    }

    /// Unique identifier of this segment
    pub fn id(&self) -> SegmentId {
        self.id
    }

    /// Adds a directed edge towards `target`. Adding an existing edge is a no-op.
    ///
    /// This does not check that `target` exists; use
    /// [`RoadMap::add_edge`](super::map::RoadMap::add_edge) for that.
    pub fn add_edge(&mut self, target: SegmentId) {
        self.neighbors.insert(target);
    }

    /// Removes the edge towards `target`, if any
    pub fn remove_edge(&mut self, target: SegmentId) {
        self.neighbors.remove(&target);
    }

    /// Snapshot of the outgoing neighbors, ordered by id
    pub fn neighbors(&self) -> Vec<SegmentId> {
        self.neighbors.iter().copied().collect()
    }

    /// Whether there is an edge towards `target`
    pub fn is_neighbor(&self, target: SegmentId) -> bool {
        self.neighbors.contains(&target)
    }

    /// Static free-flow delay
    pub fn delay(&self) -> Delay {
        self.base_delay
    }

    /// Congestion-dependent delay, or [`CLOSED_DELAY`] while the segment is closed
    pub fn current_delay(&self) -> Delay {
        if self.closed {
            return CLOSED_DELAY;
        }
        let occupancy = u32::try_from(self.queue.len()).unwrap_or(u32::MAX);
        self.delay_function
            .delay(self.base_delay, self.capacity, occupancy)
    }

    /// Vehicles the segment holds before congestion sets in
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Changes the capacity; affects vehicles entering from now on
    pub fn set_capacity(&mut self, capacity: u32) {
        self.capacity = capacity;
    }

    /// Function turning occupancy into delay
    pub fn delay_function(&self) -> DelayFunction {
        self.delay_function
    }

    /// Replaces the delay function; affects vehicles entering from now on
    pub fn set_delay_function(&mut self, delay_function: DelayFunction) {
        self.delay_function = delay_function;
    }

    /// Whether entering vehicles are turned away
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// A closed segment rejects entering vehicles; vehicles already on it
    /// keep driving and leave normally.
    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    /// Number of vehicles waiting on this segment (parked ones excluded)
    pub fn vehicle_count(&self) -> usize {
        self.queue.len()
    }

    /// Read-only view of the waiting and parked vehicles
    pub fn queue(&self) -> &VehicleQueue {
        &self.queue
    }

    /// Puts `vehicle` on this segment, or parks it if the segment is closed.
    pub fn enter_node(&mut self, vehicle: &mut Vehicle) {
        if self.closed {
            warn!("INVALID: segment {} is closed to vehicle {}", self.id, vehicle.id());
            self.park(vehicle);
            return;
        }
        let delay = self.current_delay();
        debug!("ENTER: vehicle {} at {} (delay {})", vehicle.id(), self.id, delay);
        self.queue.enqueue(vehicle.id(), delay);
        vehicle.set_current_position(self.id);
    }

    /// Stops `vehicle` on this segment for good.
    ///
    /// The vehicle's position is forced to its destination so that it counts
    /// as finished; see [`Vehicle::is_finished`].
    pub fn park(&mut self, vehicle: &mut Vehicle) {
        self.queue.park(vehicle.id());
        vehicle.mark_parked(self.id);
    }

    /// Lets one cycle pass on this segment's queue and returns the vehicles
    /// that may now attempt their next hop.
    pub(crate) fn advance_queue(&mut self) -> Vec<AgentId> {
        self.queue.advance()
    }
}

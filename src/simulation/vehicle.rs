//! Vehicles and their movement logic

use log::{debug, info, warn};

use super::map::RoadMap;
use super::routing::RoutingAlgorithm;
use super::types::{AgentId, SegmentId, TripOutcome, VehicleState};

/// A vehicle in the traffic simulation
#[derive(Debug)]
pub struct Vehicle {
    id: AgentId,
    start: SegmentId,
    destination: SegmentId,
    current: SegmentId,
    /// Vehicles with a higher priority leave a segment first
    priority: u32,
    routing: Option<Box<dyn RoutingAlgorithm>>,
    outcome: Option<TripOutcome>,
}

impl Vehicle {
    /// Creates a vehicle without a routing algorithm
    pub fn new(id: AgentId, start: SegmentId, destination: SegmentId) -> Self {
        Self {
            id,
            start,
            destination,
            current: start,
            priority: 0,
            routing: None,
            outcome: None,
        }
    }

    /// Creates a vehicle bound to `routing`
    pub fn with_routing(
        id: AgentId,
        start: SegmentId,
        destination: SegmentId,
        routing: Box<dyn RoutingAlgorithm>,
    ) -> Self {
        let mut vehicle = Self::new(id, start, destination);
        vehicle.set_routing_algorithm(routing);
        vehicle
    }

    /// Sets the priority; higher values leave segments first
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Binds `routing` to this vehicle's trip
    pub fn set_routing_algorithm(&mut self, mut routing: Box<dyn RoutingAlgorithm>) {
        routing.set_start_road(self.start);
        routing.set_end_road(self.destination);
        routing.set_vehicle_id(self.id);
        self.routing = Some(routing);
    }

    /// The bound routing algorithm, if any
    pub fn routing_algorithm(&self) -> Option<&dyn RoutingAlgorithm> {
        self.routing.as_deref()
    }

    /// Unique identifier of this vehicle
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Segment the trip starts on
    pub fn start(&self) -> SegmentId {
        self.start
    }

    /// Segment the trip ends on
    pub fn destination(&self) -> SegmentId {
        self.destination
    }

    /// Segment the vehicle is on
    pub fn current_position(&self) -> SegmentId {
        self.current
    }

    /// Priority when leaving a segment together with other vehicles
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// How the trip ended, once it has
    pub fn outcome(&self) -> Option<TripOutcome> {
        self.outcome
    }

    /// Lifecycle state derived from position and routing
    pub fn state(&self) -> VehicleState {
        if self.is_finished() {
            VehicleState::Finished
        } else if self.routing.is_none() {
            VehicleState::Unrouted
        } else {
            VehicleState::EnRoute
        }
    }

    /// True once the vehicle is at its destination.
    ///
    /// Parked vehicles are moved to their destination as well, so this is
    /// also true for trips that ended early. Use [`Vehicle::outcome`] to tell
    /// the two apart.
    pub fn is_finished(&self) -> bool {
        self.current == self.destination
    }

    pub(crate) fn set_current_position(&mut self, segment: SegmentId) {
        self.current = segment;
        if self.is_finished() && self.outcome.is_none() {
            self.outcome = Some(TripOutcome::Arrived);
            info!("STOP: vehicle {} arrived at {}", self.id, segment);
        }
    }

    /// Records that the vehicle stopped for good on `at`.
    ///
    /// Only entering the destination counts as arriving; a vehicle turned
    /// away from its closed destination is parked there.
    pub(crate) fn mark_parked(&mut self, at: SegmentId) {
        if self.outcome.is_none() {
            self.outcome = Some(TripOutcome::Parked { at });
            info!("STOP: vehicle {} parked at {}", self.id, at);
        }
        self.current = self.destination;
    }

    /// Asks the routing algorithm for the next hop and hands the vehicle to
    /// it. Parks the vehicle when there is nowhere left to go.
    pub fn move_next(&mut self, map: &mut RoadMap) {
        if self.is_finished() {
            return;
        }

        let next = match self.routing.as_mut() {
            Some(routing) => routing.next_node(map),
            None => {
                warn!("vehicle {} has no routing algorithm", self.id);
                None
            }
        };

        match next {
            Some(next) => {
                debug!("MOVE: vehicle {} at {} to {}", self.id, self.current, next);
                map.move_to(self.current, next, self);
            }
            None => match map.segment_mut(self.current) {
                Some(segment) => segment.park(self),
                None => self.mark_parked(self.current),
            },
        }
    }
}

//! Core types for the traffic simulation

use std::fmt;

/// Number of cycles a vehicle has to wait on a segment
pub type Delay = u32;

/// Current delay reported by a closed segment
pub const CLOSED_DELAY: Delay = Delay::MAX;

/// A wrapper type for road segment IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentId(pub u32);

/// A wrapper type for agent IDs (vehicles and non-road agents share this space)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgentId(pub u32);

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a vehicle's trip ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripOutcome {
    /// The vehicle entered its destination segment
    Arrived,
    /// The vehicle was parked before reaching its destination
    /// (no route left, illegal move, or closed road)
    Parked { at: SegmentId },
}

/// Lifecycle of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleState {
    /// No routing algorithm bound yet
    Unrouted,
    /// Bound to a routing algorithm and not yet at its destination
    EnRoute,
    /// At its destination, or given up
    Finished,
}

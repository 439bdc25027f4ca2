//! Discrete-time traffic simulation on a node-weighted road map
//!
//! Road segments are the nodes of a directed graph. Each segment delays the
//! vehicles on it depending on how congested it is, and vehicles pick their
//! next segment with a routing algorithm that may look at live congestion.

mod agent;
mod delay;
mod error;
mod map;
mod queue;
mod road_closure;
mod routing;
mod scenario;
mod segment;
mod stats;
mod types;
mod vehicle;
mod vehicle_manager;
mod world;

pub use agent::{Agent, AgentRoster};
pub use delay::DelayFunction;
pub use error::{ConfigError, SimError};
pub use map::RoadMap;
pub use queue::VehicleQueue;
pub use road_closure::{RoadClosureAgent, RoadClosureParams};
pub use routing::{LookaheadShortestPath, RoutingAlgorithm};
pub use scenario::GridScenario;
pub use segment::RoadSegment;
pub use stats::SimulationStats;
pub use types::{AgentId, Delay, SegmentId, TripOutcome, VehicleState, CLOSED_DELAY};
pub use vehicle::Vehicle;
pub use vehicle_manager::VehicleManager;
pub use world::Simulator;

//! Built-in demo scenario: a square grid of two-way roads

use super::agent::Agent;
use super::delay::DelayFunction;
use super::error::ConfigError;
use super::map::RoadMap;
use super::road_closure::{RoadClosureAgent, RoadClosureParams};
use super::routing::{LookaheadShortestPath, RoutingAlgorithm};
use super::segment::RoadSegment;
use super::types::{AgentId, SegmentId};
use super::vehicle::Vehicle;
use super::world::Simulator;

/// Settings for a `size` x `size` grid with crossing traffic.
///
/// Everything is derived from the settings alone, so the same settings
/// always produce the same scenario.
#[derive(Debug, Clone)]
pub struct GridScenario {
    pub size: u32,
    pub vehicles: u32,
    pub lookahead: u32,
    /// Replanning interval; defaults to `lookahead`
    pub recompute: Option<u32>,
    pub delay_function: DelayFunction,
    pub capacity: u32,
    /// Road closures, if any
    pub closures: Option<RoadClosureParams>,
    pub seed: u64,
    /// Cycles between two consecutive vehicle releases
    pub stagger: u64,
}

impl Default for GridScenario {
    fn default() -> Self {
        Self {
            size: 5,
            vehicles: 20,
            lookahead: 2,
            recompute: None,
            delay_function: DelayFunction::Linear,
            capacity: 1,
            closures: None,
            seed: 0,
            stagger: 1,
        }
    }
}

impl GridScenario {
    fn segment_id(&self, row: u32, col: u32) -> SegmentId {
        SegmentId(row * self.size + col)
    }

    /// Number of segments in the grid
    fn cells(&self) -> Result<u32, ConfigError> {
        if self.size < 2 {
            return Err(ConfigError::InvalidParameter(format!(
                "grid size must be at least 2, got {}",
                self.size
            )));
        }
        self.size.checked_mul(self.size).ok_or_else(|| {
            ConfigError::InvalidParameter(format!("grid size {} is too large", self.size))
        })
    }

    /// Builds the road grid. Segment `row * size + col` is the cell at
    /// `(row, col)`.
    pub fn build_map(&self) -> Result<RoadMap, ConfigError> {
        self.cells()?;

        let mut map = RoadMap::new();
        for row in 0..self.size {
            for col in 0..self.size {
                // Vary free-flow delays so the shortest path is not just any
                // Manhattan path
                let base_delay = 1 + (row + 2 * col) % 3;
                map.add_road_segment(RoadSegment::new(
                    self.segment_id(row, col),
                    self.delay_function,
                    base_delay,
                    self.capacity,
                ))?;
            }
        }

        for row in 0..self.size {
            for col in 0..self.size {
                let here = self.segment_id(row, col);
                if col + 1 < self.size {
                    let right = self.segment_id(row, col + 1);
                    map.add_edge(here, right)?;
                    map.add_edge(right, here)?;
                }
                if row + 1 < self.size {
                    let below = self.segment_id(row + 1, col);
                    map.add_edge(here, below)?;
                    map.add_edge(below, here)?;
                }
            }
        }
        Ok(map)
    }

    fn routing(&self) -> Result<Box<dyn RoutingAlgorithm>, ConfigError> {
        let routing = match self.recompute {
            Some(recompute) => LookaheadShortestPath::with_recompute(self.lookahead, recompute)?,
            None => LookaheadShortestPath::new(self.lookahead),
        };
        Ok(Box::new(routing))
    }

    /// Start and destination of the `i`-th vehicle
    fn trip(i: u32, cells: u32) -> (SegmentId, SegmentId) {
        // The remainder is below `cells`, so it fits back into a u32
        let start = ((u64::from(i) * 7) % u64::from(cells)) as u32;
        let mut destination = cells - 1 - start;
        if destination == start {
            destination = (start + 1) % cells;
        }
        (SegmentId(start), SegmentId(destination))
    }

    /// Cycle at which the `i`-th vehicle is released
    fn start_cycle(&self, i: u32) -> Result<u64, ConfigError> {
        u64::from(i)
            .checked_mul(self.stagger)
            .and_then(|offset| offset.checked_add(1))
            .ok_or_else(|| {
                ConfigError::InvalidParameter(format!(
                    "stagger {} is too large for {} vehicles",
                    self.stagger, self.vehicles
                ))
            })
    }

    /// Builds a simulator with the closure agent, if any, and every vehicle
    /// scheduled for release
    pub fn build(&self) -> Result<Simulator, ConfigError> {
        let cells = self.cells()?;
        let map = self.build_map()?;

        let mut agents = Vec::new();
        if let Some(params) = self.closures {
            let closure_agent =
                RoadClosureAgent::new_with_seed(AgentId(self.vehicles), params, self.seed);
            agents.push(Agent::from(closure_agent));
        }
        let mut simulator = Simulator::new(map, agents)?;

        for i in 0..self.vehicles {
            let (start, destination) = Self::trip(i, cells);
            // Every tenth vehicle is an emergency vehicle
            let priority = u32::from(i % 10 == 0);
            let vehicle = Vehicle::with_routing(AgentId(i), start, destination, self.routing()?)
                .with_priority(priority);
            simulator.schedule_vehicle(vehicle, self.start_cycle(i)?)?;
        }
        Ok(simulator)
    }
}

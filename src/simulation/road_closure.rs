//! Randomly closing and reopening roads

use std::collections::HashMap;
use std::str::FromStr;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::ConfigError;
use super::map::RoadMap;
use super::types::{AgentId, SegmentId};

/// Parameters of a [`RoadClosureAgent`], written as `probability:duration`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadClosureParams {
    /// Chance per cycle that an open segment gets closed
    pub probability: f64,
    /// Cycles a closed segment stays closed after the cycle it was closed in
    pub duration: u32,
}

impl FromStr for RoadClosureParams {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            ConfigError::InvalidParameter(format!(
                "road closure parameters must be 'probability:duration', got '{s}'"
            ))
        };

        let (probability, duration) = s.trim().split_once(':').ok_or_else(invalid)?;
        let probability: f64 = probability.trim().parse().map_err(|_| invalid())?;
        let duration: u32 = duration.trim().parse().map_err(|_| invalid())?;
        if !probability.is_finite() || probability < 0.0 {
            return Err(invalid());
        }
        Ok(Self {
            probability,
            duration,
        })
    }
}

/// Closes open segments at random and reopens them after a fixed number of
/// cycles.
#[derive(Debug)]
pub struct RoadClosureAgent {
    id: AgentId,
    params: RoadClosureParams,
    rng: StdRng,
    /// Cycles each currently closed segment has been closed for
    closed: HashMap<SegmentId, u32>,
}

impl RoadClosureAgent {
    /// Create an agent seeded from the thread RNG
    pub fn new(id: AgentId, params: RoadClosureParams) -> Self {
        Self::new_internal(id, params, StdRng::from_rng(&mut rand::rng()))
    }

    /// Create an agent with a seeded RNG for reproducible simulations
    pub fn new_with_seed(id: AgentId, params: RoadClosureParams, seed: u64) -> Self {
        Self::new_internal(id, params, StdRng::seed_from_u64(seed))
    }

    fn new_internal(id: AgentId, params: RoadClosureParams, rng: StdRng) -> Self {
        debug!(
            "road closure agent {}: probability {}, duration {}",
            id, params.probability, params.duration
        );
        Self {
            id,
            params,
            rng,
            closed: HashMap::new(),
        }
    }

    /// Unique identifier of this agent
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Closure probability and duration
    pub fn params(&self) -> RoadClosureParams {
        self.params
    }

    /// Reopens segments whose closure has run out and closes open ones at
    /// random, visiting segments in map order
    pub fn take_simulation_step(&mut self, _cycle: u64, map: &mut RoadMap) {
        for segment in map.segments_mut() {
            let id = segment.id();
            if segment.is_closed() {
                let closed_for = self.closed.get(&id).copied().unwrap_or(0);
                if closed_for < self.params.duration {
                    self.closed.insert(id, closed_for + 1);
                } else {
                    segment.set_closed(false);
                    self.closed.remove(&id);
                    info!("OPEN: segment {}", id);
                }
            } else if self.rng.random::<f64>() < self.params.probability {
                segment.set_closed(true);
                self.closed.insert(id, 0);
                info!("CLOSE: segment {}", id);
            }
        }
    }
}

//! The simulator that ties everything together
//!
//! One cycle runs three phases in a fixed order: the vehicle manager
//! releases the vehicles due this cycle, every non-road agent acts once, and
//! every road segment runs its movement protocol once. Later phases (and
//! later segments within phase three) see the changes made by earlier ones.

use log::{info, warn};

use super::agent::{Agent, AgentRoster};
use super::error::{ConfigError, SimError};
use super::map::RoadMap;
use super::stats::SimulationStats;
use super::types::{AgentId, TripOutcome};
use super::vehicle::Vehicle;
use super::vehicle_manager::VehicleManager;

/// Owns the map and all agents and runs the simulation cycles
#[derive(Debug)]
pub struct Simulator {
    map: RoadMap,
    roster: AgentRoster,
    manager: VehicleManager,
    /// Last executed cycle, 0 before the first step
    cycle: u64,
}

impl Simulator {
    /// Creates a simulator over `map`.
    ///
    /// Vehicles among `agents` are placed on their start segment right away.
    pub fn new(map: RoadMap, agents: Vec<Agent>) -> Result<Self, ConfigError> {
        map.validate()?;
        let mut simulator = Self {
            map,
            roster: AgentRoster::new(),
            manager: VehicleManager::new(),
            cycle: 0,
        };
        for agent in agents {
            match agent {
                Agent::Vehicle(vehicle) => simulator.add_vehicle(vehicle)?,
                other => simulator.roster.push(other)?,
            }
        }
        Ok(simulator)
    }

    fn check_vehicle(&self, vehicle: &Vehicle) -> Result<(), ConfigError> {
        for segment in [vehicle.start(), vehicle.destination()] {
            if !self.map.contains(segment) {
                return Err(ConfigError::UnknownSegment(segment));
            }
        }
        if self.roster.contains(vehicle.id()) || self.manager.is_scheduled(vehicle.id()) {
            return Err(ConfigError::DuplicateAgent(vehicle.id()));
        }
        if !self.map.is_reachable(vehicle.start(), vehicle.destination())
            && vehicle.start() != vehicle.destination()
        {
            warn!(
                "vehicle {}: destination {} is unreachable from {}",
                vehicle.id(),
                vehicle.destination(),
                vehicle.start()
            );
        }
        Ok(())
    }

    /// Adds `vehicle` and puts it on its start segment
    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> Result<(), ConfigError> {
        self.check_vehicle(&vehicle)?;
        let id = vehicle.id();
        let start = vehicle.start();
        self.roster.push(vehicle)?;

        if let (Some(vehicle), Some(segment)) =
            (self.roster.vehicle_mut(id), self.map.segment_mut(start))
        {
            segment.enter_node(vehicle);
        }
        Ok(())
    }

    /// Adds `vehicle` at the beginning of `start_cycle`
    pub fn schedule_vehicle(&mut self, vehicle: Vehicle, start_cycle: u64) -> Result<(), ConfigError> {
        self.check_vehicle(&vehicle)?;
        self.manager.schedule(vehicle, start_cycle)
    }

    /// Runs a single cycle
    pub fn take_simulation_step(&mut self) {
        self.cycle += 1;
        let cycle = self.cycle;
        info!("SIMULATION: cycle {}", cycle);

        for vehicle in self.manager.release(cycle) {
            info!("RELEASE: vehicle {} at {}", vehicle.id(), vehicle.start());
            if let Err(e) = self.add_vehicle(vehicle) {
                warn!("could not release vehicle: {}", e);
            }
        }

        self.roster.take_simulation_step(cycle, &mut self.map);

        for index in 0..self.map.len() {
            let segment = self.map.segments()[index].id();
            self.map.take_segment_step(segment, cycle, &mut self.roster);
        }
    }

    /// Runs until every agent is finished and no vehicle is waiting to start.
    ///
    /// There is no built-in bound; see [`Simulator::run_for`].
    pub fn run(&mut self) {
        while !self.is_finished() {
            self.take_simulation_step();
        }
    }

    /// Like [`Simulator::run`], but gives up after `max_cycles` cycles.
    ///
    /// Returns the number of the last executed cycle.
    pub fn run_for(&mut self, max_cycles: u64) -> Result<u64, SimError> {
        let mut executed = 0;
        while !self.is_finished() {
            if executed == max_cycles {
                return Err(SimError::CycleBudgetExhausted(max_cycles));
            }
            self.take_simulation_step();
            executed += 1;
        }
        Ok(self.cycle)
    }

    /// True once every agent is finished and nothing is left to release
    pub fn is_finished(&self) -> bool {
        self.manager.is_finished() && self.roster.all_finished()
    }

    /// All agents in insertion order
    pub fn agents(&self) -> &[Agent] {
        self.roster.agents()
    }

    /// Looks up an agent by id
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.roster.get(id)
    }

    /// Looks up a vehicle by id
    pub fn vehicle(&self, id: AgentId) -> Option<&Vehicle> {
        self.roster.vehicle(id)
    }

    /// The road map
    pub fn map(&self) -> &RoadMap {
        &self.map
    }

    /// Mutable access to the road map, e.g. to close roads by hand
    pub fn map_mut(&mut self) -> &mut RoadMap {
        &mut self.map
    }

    /// Last executed cycle, 0 before the first step
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Statistics of the run so far
    pub fn stats(&self) -> SimulationStats {
        let mut stats = SimulationStats {
            cycles: self.cycle,
            pending: self.manager.pending(),
            closed_segments: self.map.segments().iter().filter(|s| s.is_closed()).count(),
            ..SimulationStats::default()
        };
        for vehicle in self.roster.vehicles() {
            stats.vehicles += 1;
            match vehicle.outcome() {
                Some(TripOutcome::Arrived) => stats.arrived += 1,
                Some(TripOutcome::Parked { .. }) => stats.parked += 1,
                None => stats.en_route += 1,
            }
        }
        stats
    }
}

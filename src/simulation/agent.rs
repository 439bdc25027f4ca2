//! Agents taking part in a simulation and the roster that holds them

use std::collections::HashMap;

use super::error::ConfigError;
use super::map::RoadMap;
use super::road_closure::RoadClosureAgent;
use super::types::AgentId;
use super::vehicle::Vehicle;

/// Anything that takes part in a simulation cycle
#[derive(Debug)]
pub enum Agent {
    Vehicle(Vehicle),
    RoadClosure(RoadClosureAgent),
}

impl Agent {
    /// Unique identifier shared by vehicles and other agents
    pub fn id(&self) -> AgentId {
        match self {
            Agent::Vehicle(vehicle) => vehicle.id(),
            Agent::RoadClosure(agent) => agent.id(),
        }
    }

    /// Vehicles finish at their destination; other agents never hold up
    /// the end of a run
    pub fn is_finished(&self) -> bool {
        match self {
            Agent::Vehicle(vehicle) => vehicle.is_finished(),
            Agent::RoadClosure(_) => true,
        }
    }

    /// Per-cycle action. Vehicles do nothing here; they are moved by the
    /// segment they are on.
    pub fn take_simulation_step(&mut self, cycle: u64, map: &mut RoadMap) {
        match self {
            Agent::Vehicle(_) => {}
            Agent::RoadClosure(agent) => agent.take_simulation_step(cycle, map),
        }
    }

    /// The vehicle, if this agent is one
    pub fn as_vehicle(&self) -> Option<&Vehicle> {
        match self {
            Agent::Vehicle(vehicle) => Some(vehicle),
            _ => None,
        }
    }

    /// Mutable access to the vehicle, if this agent is one
    pub fn as_vehicle_mut(&mut self) -> Option<&mut Vehicle> {
        match self {
            Agent::Vehicle(vehicle) => Some(vehicle),
            _ => None,
        }
    }
}

impl From<Vehicle> for Agent {
    fn from(vehicle: Vehicle) -> Self {
        Agent::Vehicle(vehicle)
    }
}

impl From<RoadClosureAgent> for Agent {
    fn from(agent: RoadClosureAgent) -> Self {
        Agent::RoadClosure(agent)
    }
}

/// All agents of a simulation, in the order they were added
#[derive(Debug, Default)]
pub struct AgentRoster {
    agents: Vec<Agent>,
    /// Maps agent IDs to their position in `agents`
    index: HashMap<AgentId, usize>,
}

impl AgentRoster {
    /// Creates an empty roster
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an agent; its id must not be taken yet
    pub fn push(&mut self, agent: impl Into<Agent>) -> Result<(), ConfigError> {
        let agent = agent.into();
        let id = agent.id();
        if self.index.contains_key(&id) {
            return Err(ConfigError::DuplicateAgent(id));
        }
        self.index.insert(id, self.agents.len());
        self.agents.push(agent);
        Ok(())
    }

    /// Whether an agent with this id exists
    pub fn contains(&self, id: AgentId) -> bool {
        self.index.contains_key(&id)
    }

    /// Looks up an agent by id
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.index.get(&id).map(|&i| &self.agents[i])
    }

    /// Looks up a vehicle by id
    pub fn vehicle(&self, id: AgentId) -> Option<&Vehicle> {
        self.get(id).and_then(Agent::as_vehicle)
    }

    /// Mutable lookup of a vehicle by id
    pub fn vehicle_mut(&mut self, id: AgentId) -> Option<&mut Vehicle> {
        let i = *self.index.get(&id)?;
        self.agents[i].as_vehicle_mut()
    }

    /// All agents in insertion order
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// All vehicles in insertion order
    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.agents.iter().filter_map(Agent::as_vehicle)
    }

    /// Number of agents
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// True if the roster has no agents
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Whether every agent is finished
    pub fn all_finished(&self) -> bool {
        self.agents.iter().all(Agent::is_finished)
    }

    /// Runs every agent's per-cycle action in insertion order
    pub fn take_simulation_step(&mut self, cycle: u64, map: &mut RoadMap) {
        for agent in &mut self.agents {
            agent.take_simulation_step(cycle, map);
        }
    }
}

//! The road map: an arena of road segments addressed by id
//!
//! Segments are kept in insertion order. That order is the iteration order of
//! every simulation cycle, so it has to stay stable for runs to be
//! reproducible.

use std::cmp::Reverse;
use std::collections::HashMap;

use log::{debug, warn};
use petgraph::algo::{dijkstra, has_path_connecting};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::agent::AgentRoster;
use super::error::ConfigError;
use super::segment::RoadSegment;
use super::types::{Delay, SegmentId};
use super::vehicle::Vehicle;

/// Directed graph of road segments
#[derive(Debug, Clone, Default)]
pub struct RoadMap {
    segments: Vec<RoadSegment>,
    /// Maps segment IDs to their position in `segments`
    index: HashMap<SegmentId, usize>,
}

impl RoadMap {
    /// Creates an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from already wired segments and validates it
    pub fn from_segments(
        segments: impl IntoIterator<Item = RoadSegment>,
    ) -> Result<Self, ConfigError> {
        let mut map = Self::new();
        for segment in segments {
            map.add_road_segment(segment)?;
        }
        map.validate()?;
        Ok(map)
    }

    /// Adds a segment; its id must not be taken yet
    pub fn add_road_segment(&mut self, segment: RoadSegment) -> Result<(), ConfigError> {
        let id = segment.id();
        if self.index.contains_key(&id) {
            return Err(ConfigError::DuplicateSegment(id));
        }
        self.index.insert(id, self.segments.len());
        self.segments.push(segment);
        Ok(())
    }

    /// Adds a directed edge between two existing segments
    pub fn add_edge(&mut self, from: SegmentId, to: SegmentId) -> Result<(), ConfigError> {
        if !self.contains(to) {
            return Err(ConfigError::UnknownSegment(to));
        }
        self.segment_mut(from)
            .ok_or(ConfigError::UnknownSegment(from))?
            .add_edge(to);
        Ok(())
    }

    /// Removes the edge `from -> to`, if any
    pub fn remove_edge(&mut self, from: SegmentId, to: SegmentId) {
        if let Some(segment) = self.segment_mut(from) {
            segment.remove_edge(to);
        }
    }

    /// Checks that every edge points at a segment of this map
    pub fn validate(&self) -> Result<(), ConfigError> {
        for segment in &self.segments {
            if let Some(to) = segment.neighbors().into_iter().find(|to| !self.contains(*to)) {
                return Err(ConfigError::DanglingEdge {
                    from: segment.id(),
                    to,
                });
            }
        }
        Ok(())
    }

    /// Looks up a segment by id
    pub fn segment(&self, id: SegmentId) -> Option<&RoadSegment> {
        self.index.get(&id).map(|&i| &self.segments[i])
    }

    /// Mutable lookup of a segment by id
    pub fn segment_mut(&mut self, id: SegmentId) -> Option<&mut RoadSegment> {
        self.index.get(&id).map(|&i| &mut self.segments[i])
    }

    /// All segments in insertion order
    pub fn segments(&self) -> &[RoadSegment] {
        &self.segments
    }

    /// All segments in insertion order, mutably
    pub fn segments_mut(&mut self) -> impl Iterator<Item = &mut RoadSegment> {
        self.segments.iter_mut()
    }

    /// Position of a segment in insertion order
    pub fn index_of(&self, id: SegmentId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Whether a segment with this id exists
    pub fn contains(&self, id: SegmentId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True if the map has no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Moves `vehicle` from `from` onto `to`.
    ///
    /// The move is only legal if `to` is an outgoing neighbor of `from`.
    /// Illegal moves park the vehicle on `from`.
    pub fn move_to(&mut self, from: SegmentId, to: SegmentId, vehicle: &mut Vehicle) {
        let legal = self.contains(to) && self.segment(from).is_some_and(|s| s.is_neighbor(to));
        if legal {
            if let Some(target) = self.segment_mut(to) {
                target.enter_node(vehicle);
            }
            return;
        }

        warn!(
            "INVALID: move of vehicle {} from {} to {}",
            vehicle.id(),
            from,
            to
        );
        match self.segment_mut(from) {
            Some(source) => source.park(vehicle),
            None => vehicle.mark_parked(from),
        }
    }

    /// Runs the movement protocol of one segment.
    ///
    /// The segment's queue advances by one cycle and every vehicle that
    /// reaches the head asks its routing algorithm for the next hop.
    /// Vehicles move in descending priority, ties broken by id.
    pub fn take_segment_step(&mut self, segment: SegmentId, cycle: u64, roster: &mut AgentRoster) {
        let Some(index) = self.index_of(segment) else {
            return;
        };

        let mut ready = self.segments[index].advance_queue();
        if ready.is_empty() {
            return;
        }
        ready.sort_by_key(|id| (Reverse(roster.vehicle(*id).map_or(0, Vehicle::priority)), *id));
        debug!(
            "cycle {}: {} vehicle(s) ready to leave segment {}",
            cycle,
            ready.len(),
            segment
        );

        for id in ready {
            match roster.vehicle_mut(id) {
                Some(vehicle) => vehicle.move_next(self),
                None => warn!("segment {} released unknown vehicle {}", segment, id),
            }
        }
    }

    /// Exports the map as a petgraph graph.
    ///
    /// Node `i` is the `i`-th segment in insertion order, and every edge is
    /// weighted with the static delay of its target.
    pub fn to_graph(&self) -> DiGraph<SegmentId, Delay> {
        let mut graph = DiGraph::with_capacity(self.segments.len(), 0);
        for segment in &self.segments {
            graph.add_node(segment.id());
        }
        for (from, segment) in self.segments.iter().enumerate() {
            for to in segment.neighbors() {
                if let Some(to) = self.index_of(to) {
                    graph.add_edge(
                        NodeIndex::new(from),
                        NodeIndex::new(to),
                        self.segments[to].delay(),
                    );
                }
            }
        }
        graph
    }

    /// Whether `to` can be reached from `from` along directed edges
    pub fn is_reachable(&self, from: SegmentId, to: SegmentId) -> bool {
        match (self.index_of(from), self.index_of(to)) {
            (Some(from), Some(to)) => has_path_connecting(
                &self.to_graph(),
                NodeIndex::new(from),
                NodeIndex::new(to),
                None,
            ),
            _ => false,
        }
    }

    /// Free-flow cost of the cheapest path, counting the delay of every
    /// segment after `from` up to and including `to`
    pub fn static_path_cost(&self, from: SegmentId, to: SegmentId) -> Option<u64> {
        let from = NodeIndex::new(self.index_of(from)?);
        let to = NodeIndex::new(self.index_of(to)?);
        let costs = dijkstra(&self.to_graph(), from, Some(to), |edge| {
            u64::from(*edge.weight())
        });
        costs.get(&to).copied()
    }
}

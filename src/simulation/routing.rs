//! Routing algorithms
//!
//! A routing algorithm is owned by exactly one vehicle and decides, one hop
//! at a time, where that vehicle goes next. The map is passed in on every
//! call instead of being stored.

use std::collections::VecDeque;
use std::fmt;

use log::debug;

use super::error::ConfigError;
use super::map::RoadMap;
use super::types::{AgentId, SegmentId};

pub trait RoutingAlgorithm: fmt::Debug {
    fn set_start_road(&mut self, start: SegmentId);

    fn set_end_road(&mut self, end: SegmentId);

    fn set_vehicle_id(&mut self, id: AgentId);

    /// Path from `source` to `target`, excluding `source` and ending with
    /// `target`. `None` if there is no such path.
    fn get_path(&self, map: &RoadMap, source: SegmentId, target: SegmentId)
        -> Option<Vec<SegmentId>>;

    /// The next segment the vehicle should move to, or `None` once the
    /// algorithm has nothing left to offer.
    fn next_node(&mut self, map: &RoadMap) -> Option<SegmentId>;
}

/// Dijkstra on segment delays that only trusts live congestion data within
/// `lookahead` hops of the search origin.
///
/// Beyond the horizon the static free-flow delay is used. The cached path is
/// replanned every `recompute` hops from the segment the vehicle is about to
/// enter. A lookahead of 0 ignores congestion entirely and, unless an explicit
/// interval is given, never replans.
#[derive(Debug, Clone)]
pub struct LookaheadShortestPath {
    lookahead: u32,
    /// 0 disables replanning
    recompute: u32,
    source: Option<SegmentId>,
    target: Option<SegmentId>,
    vehicle: Option<AgentId>,
    path: Option<VecDeque<SegmentId>>,
    steps: u32,
    finished: bool,
    replans: u64,
}

impl Default for LookaheadShortestPath {
    fn default() -> Self {
        Self::new(0)
    }
}

impl LookaheadShortestPath {
    /// Looks `lookahead` hops ahead and replans every `lookahead` hops
    pub fn new(lookahead: u32) -> Self {
        Self {
            lookahead,
            recompute: lookahead,
            source: None,
            target: None,
            vehicle: None,
            path: None,
            steps: 0,
            finished: false,
            replans: 0,
        }
    }

    /// Looks `lookahead` hops ahead and replans every `recompute` hops.
    /// `recompute` must be at least 1.
    pub fn with_recompute(lookahead: u32, recompute: u32) -> Result<Self, ConfigError> {
        if recompute == 0 {
            return Err(ConfigError::InvalidRecompute(recompute));
        }
        Ok(Self {
            recompute,
            ..Self::new(lookahead)
        })
    }

    /// Replans after every single hop
    pub fn always_recompute(lookahead: u32) -> Self {
        Self {
            recompute: 1,
            ..Self::new(lookahead)
        }
    }

    /// Hops within which live congestion is used
    pub fn lookahead(&self) -> u32 {
        self.lookahead
    }

    /// Hops between two replans; 0 never replans
    pub fn recompute(&self) -> u32 {
        self.recompute
    }

    /// Remaining cached path, if one has been planned
    pub fn cached_path(&self) -> Option<Vec<SegmentId>> {
        self.path.as_ref().map(|path| path.iter().copied().collect())
    }

    /// Number of times the cached path was replaced at a recompute point
    pub fn replans(&self) -> u64 {
        self.replans
    }

    /// True once no further hop will be offered
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn plan_from(&mut self, map: &RoadMap, start: SegmentId) -> Option<VecDeque<SegmentId>> {
        let path = self
            .target
            .and_then(|target| self.get_path(map, start, target))
            .map(VecDeque::from);
        if path.is_none() {
            self.finished = true;
        }
        path
    }

    fn path_log_message(&self) -> String {
        format!(
            "vehicle {} from {} to {} path {:?}",
            self.vehicle.map_or_else(|| "?".to_string(), |id| id.to_string()),
            self.source.map_or_else(|| "?".to_string(), |id| id.to_string()),
            self.target.map_or_else(|| "?".to_string(), |id| id.to_string()),
            self.path
                .as_ref()
                .map(|path| path.iter().map(|s| s.0).collect::<Vec<_>>())
                .unwrap_or_default()
        )
    }

    fn dijkstra(&self, map: &RoadMap, source: usize, target: usize) -> Option<Vec<usize>> {
        let segments = map.segments();
        let mut dist = vec![u64::MAX; segments.len()];
        let mut previous: Vec<Option<usize>> = vec![None; segments.len()];
        let mut visited = vec![false; segments.len()];
        dist[source] = 0;

        // Ties go to the segment inserted first
        while let Some(current) = (0..segments.len())
            .filter(|&i| !visited[i])
            .min_by_key(|&i| dist[i])
        {
            if dist[current] == u64::MAX {
                break;
            }
            visited[current] = true;

            let depth = current_depth(&previous, source, current);
            let live = u32::try_from(depth).is_ok_and(|depth| depth <= self.lookahead);

            for neighbor in segments[current].neighbors() {
                let Some(next) = map.index_of(neighbor) else {
                    continue;
                };
                let cost = if live {
                    segments[next].current_delay()
                } else {
                    segments[next].delay()
                };
                let candidate = dist[current].saturating_add(u64::from(cost));
                if candidate < dist[next] {
                    dist[next] = candidate;
                    previous[next] = Some(current);
                }
            }
        }

        reconstruct_path(&previous, source, target)
    }
}

/// Walks predecessor links back from `target`. Returns `None` when `target`
/// was never reached or the chain does not lead back to `source`.
fn reconstruct_path(previous: &[Option<usize>], source: usize, target: usize) -> Option<Vec<usize>> {
    previous[target]?;
    let mut path = VecDeque::new();
    let mut current = target;
    while current != source {
        if path.len() >= previous.len() {
            return None;
        }
        path.push_front(current);
        current = previous[current]?;
    }
    Some(path.into())
}

/// Hop count of the search path ending in `current`, plus one
fn current_depth(previous: &[Option<usize>], source: usize, current: usize) -> usize {
    reconstruct_path(previous, source, current).map_or(1, |path| path.len() + 1)
}

impl RoutingAlgorithm for LookaheadShortestPath {
    fn set_start_road(&mut self, start: SegmentId) {
        self.source = Some(start);
    }

    fn set_end_road(&mut self, end: SegmentId) {
        self.target = Some(end);
    }

    fn set_vehicle_id(&mut self, id: AgentId) {
        self.vehicle = Some(id);
    }

    fn get_path(
        &self,
        map: &RoadMap,
        source: SegmentId,
        target: SegmentId,
    ) -> Option<Vec<SegmentId>> {
        let source = map.index_of(source)?;
        let target = map.index_of(target)?;
        let path = self.dijkstra(map, source, target)?;
        Some(path.into_iter().map(|i| map.segments()[i].id()).collect())
    }

    fn next_node(&mut self, map: &RoadMap) -> Option<SegmentId> {
        if self.finished {
            return None;
        }
        if self.path.is_none() {
            let Some(source) = self.source else {
                self.finished = true;
                return None;
            };
            self.path = self.plan_from(map, source);
            debug!("PATH: {}", self.path_log_message());
        }

        let next = match self.path.as_mut().and_then(VecDeque::pop_front) {
            Some(next) => next,
            None => {
                self.finished = true;
                return None;
            }
        };

        if self.recompute == 0 {
            return Some(next);
        }
        self.steps += 1;
        if self.steps == self.recompute {
            self.path = self.plan_from(map, next);
            self.steps = 0;
            self.replans += 1;
            debug!("UPDATE: {}", self.path_log_message());
        }
        Some(next)
    }
}

//! Road segment, map and vehicle movement tests

use congestion_sim::simulation::{
    AgentId, AgentRoster, ConfigError, DelayFunction, RoadMap, RoadSegment, RoutingAlgorithm,
    SegmentId, TripOutcome, Vehicle, VehicleState, CLOSED_DELAY,
};

/// Routing algorithm that always proposes the same segment
#[derive(Debug)]
struct FixedNext(Option<SegmentId>);

impl RoutingAlgorithm for FixedNext {
    fn set_start_road(&mut self, _start: SegmentId) {}

    fn set_end_road(&mut self, _end: SegmentId) {}

    fn set_vehicle_id(&mut self, _id: AgentId) {}

    fn get_path(
        &self,
        _map: &RoadMap,
        _source: SegmentId,
        _target: SegmentId,
    ) -> Option<Vec<SegmentId>> {
        None
    }

    fn next_node(&mut self, _map: &RoadMap) -> Option<SegmentId> {
        self.0
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Two segments with delay 1 and capacity 0, and an edge 0 -> 1
fn two_segment_map() -> RoadMap {
    let mut map = RoadMap::new();
    map.add_road_segment(RoadSegment::new(SegmentId(0), DelayFunction::Linear, 1, 0))
        .unwrap();
    map.add_road_segment(RoadSegment::new(SegmentId(1), DelayFunction::Linear, 1, 0))
        .unwrap();
    map.add_edge(SegmentId(0), SegmentId(1)).unwrap();
    map
}

/// Puts a vehicle proposing `next` on segment 0, heading for segment 9
fn place_vehicle(map: &mut RoadMap, roster: &mut AgentRoster, next: SegmentId) -> AgentId {
    let id = AgentId(1);
    let vehicle = Vehicle::with_routing(id, SegmentId(0), SegmentId(9), Box::new(FixedNext(Some(next))));
    roster.push(vehicle).unwrap();
    map.segment_mut(SegmentId(0))
        .unwrap()
        .enter_node(roster.vehicle_mut(id).unwrap());
    id
}

#[test]
fn test_node_delay() {
    let mut segment = RoadSegment::new(SegmentId(0), DelayFunction::Linear, 1, 0);
    for i in 0..3 {
        let mut vehicle = Vehicle::new(AgentId(i), SegmentId(0), SegmentId(5));
        segment.enter_node(&mut vehicle);
        assert_eq!(vehicle.current_position(), SegmentId(0));
    }

    // More vehicles than capacity
    assert_eq!(segment.delay(), 1);
    assert_eq!(segment.current_delay(), 4);

    // Exactly at capacity
    segment.set_capacity(3);
    assert_eq!(segment.delay(), 1);
    assert_eq!(segment.current_delay(), 1);

    // One above capacity
    let mut vehicle = Vehicle::new(AgentId(3), SegmentId(0), SegmentId(5));
    segment.enter_node(&mut vehicle);
    assert_eq!(segment.delay(), 1);
    assert_eq!(segment.current_delay(), 2);
}

#[test]
fn test_entering_vehicle_waits_for_current_delay() {
    let mut segment = RoadSegment::new(SegmentId(0), DelayFunction::Linear, 2, 0);
    let mut first = Vehicle::new(AgentId(1), SegmentId(0), SegmentId(5));
    let mut second = Vehicle::new(AgentId(2), SegmentId(0), SegmentId(5));
    segment.enter_node(&mut first);
    segment.enter_node(&mut second);

    assert_eq!(segment.queue().remaining_delay(AgentId(1)), Some(2));
    assert_eq!(segment.queue().remaining_delay(AgentId(2)), Some(3));
    assert_eq!(segment.vehicle_count(), 2);
}

#[test]
fn test_closed_segment_rejects_vehicle() {
    init_logger();
    let mut segment = RoadSegment::new(SegmentId(4), DelayFunction::Linear, 1, 0);
    segment.set_closed(true);
    assert_eq!(segment.current_delay(), CLOSED_DELAY);

    let mut vehicle = Vehicle::new(AgentId(1), SegmentId(0), SegmentId(7));
    segment.enter_node(&mut vehicle);

    assert!(vehicle.is_finished());
    assert_eq!(vehicle.state(), VehicleState::Finished);
    assert_eq!(vehicle.outcome(), Some(TripOutcome::Parked { at: SegmentId(4) }));
    assert_eq!(segment.vehicle_count(), 0);
    assert!(segment.queue().is_parked(AgentId(1)));

    // Vehicles already on a closed segment stay until they leave
    segment.set_closed(false);
    assert_eq!(segment.current_delay(), 1);
}

#[test]
fn test_invalid_routing_prevented() {
    init_logger();
    let mut map = two_segment_map();
    let mut roster = AgentRoster::new();
    let id = place_vehicle(&mut map, &mut roster, SegmentId(2));

    // The vehicle is still waiting
    assert_eq!(map.segment(SegmentId(0)).unwrap().current_delay(), 2);
    map.take_segment_step(SegmentId(0), 1, &mut roster);
    map.take_segment_step(SegmentId(0), 2, &mut roster);

    // The vehicle has been removed
    assert_eq!(map.segment(SegmentId(0)).unwrap().current_delay(), 1);
    let vehicle = roster.vehicle(id).unwrap();
    assert!(vehicle.is_finished());
    assert_eq!(vehicle.outcome(), Some(TripOutcome::Parked { at: SegmentId(0) }));
}

#[test]
fn test_valid_routing_confirmed() {
    let mut map = two_segment_map();
    let mut roster = AgentRoster::new();
    let id = place_vehicle(&mut map, &mut roster, SegmentId(1));

    assert_eq!(map.segment(SegmentId(0)).unwrap().current_delay(), 2);
    assert_eq!(map.segment(SegmentId(1)).unwrap().current_delay(), 1);
    map.take_segment_step(SegmentId(0), 1, &mut roster);
    map.take_segment_step(SegmentId(0), 2, &mut roster);

    assert_eq!(map.segment(SegmentId(0)).unwrap().current_delay(), 1);
    assert_eq!(map.segment(SegmentId(1)).unwrap().current_delay(), 2);
    let vehicle = roster.vehicle(id).unwrap();
    assert_eq!(vehicle.current_position(), SegmentId(1));
    assert_eq!(vehicle.state(), VehicleState::EnRoute);
    assert_eq!(vehicle.outcome(), None);
}

#[test]
fn test_illegal_move_finishes_after_one_move() {
    let mut map = two_segment_map();
    let mut roster = AgentRoster::new();
    let id = place_vehicle(&mut map, &mut roster, SegmentId(42));

    let vehicle = roster.vehicle_mut(id).unwrap();
    assert!(!vehicle.is_finished());
    vehicle.move_next(&mut map);
    assert!(vehicle.is_finished());
    assert_eq!(vehicle.current_position(), vehicle.destination());
    assert_eq!(map.segment(SegmentId(0)).unwrap().vehicle_count(), 0);
}

#[test]
fn test_vehicle_without_next_node_parks() {
    let mut map = two_segment_map();
    let mut vehicle = Vehicle::with_routing(
        AgentId(3),
        SegmentId(0),
        SegmentId(1),
        Box::new(FixedNext(None)),
    );
    map.segment_mut(SegmentId(0)).unwrap().enter_node(&mut vehicle);

    vehicle.move_next(&mut map);
    assert!(vehicle.is_finished());
    assert_eq!(vehicle.outcome(), Some(TripOutcome::Parked { at: SegmentId(0) }));
    assert!(map.segment(SegmentId(0)).unwrap().queue().is_parked(AgentId(3)));
}

#[test]
fn test_unrouted_vehicle_parks_on_move() {
    let mut map = two_segment_map();
    let mut vehicle = Vehicle::new(AgentId(3), SegmentId(0), SegmentId(1));
    assert_eq!(vehicle.state(), VehicleState::Unrouted);
    map.segment_mut(SegmentId(0)).unwrap().enter_node(&mut vehicle);

    vehicle.move_next(&mut map);
    assert_eq!(vehicle.state(), VehicleState::Finished);
    assert_eq!(vehicle.outcome(), Some(TripOutcome::Parked { at: SegmentId(0) }));
}

#[test]
fn test_arriving_vehicle_is_finished() {
    let mut map = two_segment_map();
    let mut vehicle = Vehicle::with_routing(
        AgentId(3),
        SegmentId(0),
        SegmentId(1),
        Box::new(FixedNext(Some(SegmentId(1)))),
    );
    map.segment_mut(SegmentId(0)).unwrap().enter_node(&mut vehicle);

    vehicle.move_next(&mut map);
    assert!(vehicle.is_finished());
    assert_eq!(vehicle.outcome(), Some(TripOutcome::Arrived));
    // Finished vehicles ignore further moves
    vehicle.move_next(&mut map);
    assert_eq!(vehicle.current_position(), SegmentId(1));
}

#[test]
fn test_priority_vehicles_leave_first() {
    let mut map = RoadMap::new();
    map.add_road_segment(RoadSegment::new(SegmentId(0), DelayFunction::Linear, 1, 10))
        .unwrap();
    map.add_road_segment(RoadSegment::new(SegmentId(1), DelayFunction::Linear, 1, 0))
        .unwrap();
    map.add_road_segment(RoadSegment::new(SegmentId(2), DelayFunction::Linear, 1, 0))
        .unwrap();
    map.add_edge(SegmentId(0), SegmentId(1)).unwrap();
    map.add_edge(SegmentId(1), SegmentId(2)).unwrap();

    let mut roster = AgentRoster::new();
    let regular = Vehicle::with_routing(
        AgentId(1),
        SegmentId(0),
        SegmentId(2),
        Box::new(FixedNext(Some(SegmentId(1)))),
    );
    let emergency = Vehicle::with_routing(
        AgentId(2),
        SegmentId(0),
        SegmentId(2),
        Box::new(FixedNext(Some(SegmentId(1)))),
    )
    .with_priority(5);
    roster.push(regular).unwrap();
    roster.push(emergency).unwrap();
    for id in [AgentId(1), AgentId(2)] {
        map.segment_mut(SegmentId(0))
            .unwrap()
            .enter_node(roster.vehicle_mut(id).unwrap());
    }

    for cycle in 1..=2 {
        for segment in [SegmentId(0), SegmentId(1), SegmentId(2)] {
            map.take_segment_step(segment, cycle, &mut roster);
        }
    }

    // The emergency vehicle entered segment 1 first and got the shorter delay
    let queue = map.segment(SegmentId(1)).unwrap().queue();
    let emergency_delay = queue.remaining_delay(AgentId(2)).unwrap();
    let regular_delay = queue.remaining_delay(AgentId(1)).unwrap();
    assert!(emergency_delay < regular_delay);
}

#[test]
fn test_neighbors_are_a_snapshot_with_set_semantics() {
    let mut segment = RoadSegment::new(SegmentId(0), DelayFunction::Linear, 1, 0);
    segment.add_edge(SegmentId(3));
    segment.add_edge(SegmentId(1));
    segment.add_edge(SegmentId(3));
    segment.add_edge(SegmentId(0));

    let neighbors = segment.neighbors();
    assert_eq!(neighbors, vec![SegmentId(0), SegmentId(1), SegmentId(3)]);

    segment.remove_edge(SegmentId(3));
    assert_eq!(neighbors.len(), 3);
    assert_eq!(segment.neighbors(), vec![SegmentId(0), SegmentId(1)]);
    assert!(!segment.is_neighbor(SegmentId(3)));
}

#[test]
fn test_map_configuration_errors() {
    let mut map = two_segment_map();
    assert_eq!(
        map.add_road_segment(RoadSegment::new(SegmentId(1), DelayFunction::Linear, 1, 0)),
        Err(ConfigError::DuplicateSegment(SegmentId(1)))
    );
    assert_eq!(
        map.add_edge(SegmentId(0), SegmentId(8)),
        Err(ConfigError::UnknownSegment(SegmentId(8)))
    );
    assert_eq!(
        map.add_edge(SegmentId(8), SegmentId(0)),
        Err(ConfigError::UnknownSegment(SegmentId(8)))
    );

    let mut dangling = RoadSegment::new(SegmentId(5), DelayFunction::Linear, 1, 0);
    dangling.add_edge(SegmentId(6));
    assert_eq!(
        RoadMap::from_segments([dangling]).map(|_| ()),
        Err(ConfigError::DanglingEdge {
            from: SegmentId(5),
            to: SegmentId(6)
        })
    );
}

#[test]
fn test_map_keeps_insertion_order() {
    let mut map = RoadMap::new();
    for id in [7, 3, 9, 1] {
        map.add_road_segment(RoadSegment::new(SegmentId(id), DelayFunction::Linear, 1, 0))
            .unwrap();
    }
    let ids: Vec<SegmentId> = map.segments().iter().map(RoadSegment::id).collect();
    assert_eq!(ids, vec![SegmentId(7), SegmentId(3), SegmentId(9), SegmentId(1)]);
    assert_eq!(map.index_of(SegmentId(9)), Some(2));
}

#[test]
fn test_remove_edge_makes_move_illegal() {
    let mut map = two_segment_map();
    map.remove_edge(SegmentId(0), SegmentId(1));
    assert!(!map.is_reachable(SegmentId(0), SegmentId(1)));

    let mut vehicle = Vehicle::new(AgentId(1), SegmentId(0), SegmentId(1));
    map.segment_mut(SegmentId(0)).unwrap().enter_node(&mut vehicle);
    map.move_to(SegmentId(0), SegmentId(1), &mut vehicle);

    assert_eq!(vehicle.outcome(), Some(TripOutcome::Parked { at: SegmentId(0) }));
    assert_eq!(map.segment(SegmentId(1)).unwrap().vehicle_count(), 0);
}

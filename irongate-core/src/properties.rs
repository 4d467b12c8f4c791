//! Property tests for cycle detection, action semantics and simulation

use proptest::prelude::*;
use std::vec::Vec;

use crate::graph::{Edge, EdgeId, Graph, Node, NodeId};
use crate::motion::{apply_action, ActionCategory, ActionProfile, Pose};
use crate::safety::{detect_cycle, Verdict};
use crate::scheduler::{simulate, PlaybackClock, SimulationConfig};

fn node_id(i: usize) -> NodeId {
    NodeId::new(&format!("n{}", i)).unwrap()
}

fn category() -> impl Strategy<Value = ActionCategory> {
    prop_oneof![
        Just(ActionCategory::Move),
        Just(ActionCategory::Turn),
        Just(ActionCategory::Wait),
        Just(ActionCategory::Grip),
        Just(ActionCategory::Other),
    ]
}

fn build(actions: &[(ActionCategory, f64)], edges: &[(usize, usize)]) -> Graph {
    let order: Vec<usize> = (0..actions.len()).collect();
    build_ordered(actions, edges, &order)
}

/// Insert node `order[k]` k-th; ids stay tied to the action index
fn build_ordered(actions: &[(ActionCategory, f64)], edges: &[(usize, usize)], order: &[usize]) -> Graph {
    let mut graph = Graph::new();
    for &i in order {
        let (category, value) = actions[i];
        graph.add_node(Node::new(node_id(i), category, value)).unwrap();
    }
    for (i, &(from, to)) in edges.iter().enumerate() {
        graph
            .add_edge(Edge::new(EdgeId::numbered(i as u32), node_id(from), node_id(to)))
            .unwrap();
    }
    graph
}

/// Non-negative actions and forward-only edges (always acyclic)
fn dag() -> impl Strategy<Value = (Vec<(ActionCategory, f64)>, Vec<(usize, usize)>)> {
    (2usize..12).prop_flat_map(|n| {
        let actions = prop::collection::vec((category(), 0.0f64..500.0), n);
        let edges = prop::collection::vec((0..n, 0..n), 0..24).prop_map(|pairs| {
            pairs
                .into_iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| (a.min(b), a.max(b)))
                .collect::<Vec<_>>()
        });
        (actions, edges)
    })
}

/// A DAG together with a node insertion order
fn shuffled_dag() -> impl Strategy<Value = (Vec<(ActionCategory, f64)>, Vec<(usize, usize)>, Vec<usize>)> {
    dag().prop_flat_map(|(actions, edges)| {
        let order = Just((0..actions.len()).collect::<Vec<_>>()).prop_shuffle();
        (Just(actions), Just(edges), order)
    })
}

proptest! {
    #[test]
    fn prop_no_edges_is_never_a_cycle(actions in prop::collection::vec((category(), -100.0f64..100.0), 0..20)) {
        let report = detect_cycle(&build(&actions, &[]));
        prop_assert_eq!(report.verdict, Verdict::Empty);
        prop_assert!(report.cycle_path.is_empty());
    }

    #[test]
    fn prop_dag_verdict_ignores_insertion_order((actions, edges, order) in shuffled_dag(), seed in any::<u64>()) {
        let forward = detect_cycle(&build(&actions, &edges));

        let mut shuffled = edges.clone();
        if !shuffled.is_empty() {
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            shuffled.reverse();
        }
        let reordered = detect_cycle(&build_ordered(&actions, &shuffled, &order));

        let expected = if edges.is_empty() { Verdict::Empty } else { Verdict::Safe };
        prop_assert_eq!(forward.verdict, expected);
        prop_assert_eq!(reordered.verdict, expected);
        prop_assert!(reordered.cycle_path.is_empty());
    }

    #[test]
    fn prop_simulation_visits_every_node_in_any_order((actions, edges, order) in shuffled_dag()) {
        let graph = build_ordered(&actions, &edges, &order);
        let timeline = simulate(&graph, &SimulationConfig::default());
        prop_assert_eq!(timeline.len(), actions.len());
        for i in 0..actions.len() {
            prop_assert_eq!(timeline.movements().iter().filter(|m| m.node_id == node_id(i)).count(), 1);
        }
    }

    #[test]
    fn prop_self_loop_is_found((actions, edges) in dag(), pick in any::<usize>()) {
        let target = pick % actions.len();
        let mut edges = edges;
        edges.push((target, target));
        let report = detect_cycle(&build(&actions, &edges));
        prop_assert!(report.has_cycle());
        prop_assert_eq!(report.cycle_path.len(), 1);
        prop_assert_eq!(&report.cycle_path[0], &node_id(target));
    }

    #[test]
    fn prop_back_edge_closes_a_real_cycle((actions, edges) in dag()) {
        prop_assume!(!edges.is_empty());
        let (from, to) = edges[0];
        let mut edges = edges;
        edges.push((to, from));

        let graph = build(&actions, &edges);
        let report = detect_cycle(&graph);
        prop_assert!(report.has_cycle());

        let path = &report.cycle_path;
        for i in 0..path.len() {
            let next = &path[(i + 1) % path.len()];
            prop_assert!(graph.outgoing_edges(&path[i]).any(|e| e.to == *next));
        }
    }

    #[test]
    fn prop_simulation_is_deterministic((actions, edges) in dag()) {
        let graph = build(&actions, &edges);
        let config = SimulationConfig::default();
        prop_assert_eq!(simulate(&graph, &config), simulate(&graph, &config));
    }

    #[test]
    fn prop_timeline_is_contiguous((actions, edges) in dag()) {
        let timeline = simulate(&build(&actions, &edges), &SimulationConfig::default());
        let mut expected_start = 0.0;
        let mut expected_pose = Pose::HOME;
        for movement in timeline.movements() {
            prop_assert_eq!(movement.start_s, expected_start);
            prop_assert_eq!(movement.end_s, movement.start_s + movement.duration_s);
            prop_assert!(movement.duration_s >= 0.0);
            prop_assert_eq!(movement.from_pose, expected_pose);
            expected_start = movement.end_s;
            expected_pose = movement.to_pose;
        }
    }

    #[test]
    fn prop_every_node_of_a_dag_runs_once((actions, edges) in dag()) {
        let timeline = simulate(&build(&actions, &edges), &SimulationConfig::default());
        prop_assert_eq!(timeline.len(), actions.len());
    }

    #[test]
    fn prop_playback_boundaries((actions, edges) in dag(), before in 0.001f64..100.0, after in 0.001f64..100.0) {
        let timeline = simulate(&build(&actions, &edges), &SimulationConfig::default());
        let first = &timeline.movements()[0];
        let last = &timeline.movements()[timeline.len() - 1];
        let total = timeline.total_duration();

        prop_assert_eq!(timeline.pose_at(-before), first.from_pose);
        prop_assert_eq!(timeline.pose_at(total + after), last.to_pose);
    }

    #[test]
    fn prop_playback_terminates((actions, edges) in dag(), speed in 5.0f64..50.0) {
        let timeline = simulate(&build(&actions, &edges), &SimulationConfig::default());
        let mut clock = PlaybackClock::default();
        prop_assert!(clock.set_speed(speed));
        prop_assert!(clock.start(&timeline));

        let mut previous = 0.0;
        let mut last = None;
        for _ in 0..1_000_000 {
            match clock.tick(&timeline) {
                Some(frame) => {
                    prop_assert!(frame.time_s >= previous);
                    previous = frame.time_s;
                    last = Some(frame);
                }
                None => break,
            }
        }
        let last = last.unwrap();
        prop_assert!(last.finished);
        prop_assert_eq!(last.time_s, timeline.total_duration());
    }

    #[test]
    fn prop_duration_laws(value in -1000.0f64..1000.0) {
        let profile = ActionProfile::default();
        prop_assert_eq!(profile.duration(ActionCategory::Move, value), libm::fabs(value) / 200.0);
        prop_assert_eq!(profile.duration(ActionCategory::Turn, value), libm::fabs(value) / 90.0);
        prop_assert_eq!(profile.duration(ActionCategory::Wait, value), value);
        prop_assert_eq!(profile.duration(ActionCategory::Grip, value), 0.5);
        prop_assert_eq!(profile.duration(ActionCategory::Other, value), 1.0);
        prop_assert_eq!(
            profile.duration(ActionCategory::Move, value),
            profile.duration(ActionCategory::Move, -value)
        );
    }

    #[test]
    fn prop_turns_add(a in -720.0f64..720.0, b in -720.0f64..720.0) {
        let start = Pose::new(5.0, -5.0, 30.0);
        let once = apply_action(&start, ActionCategory::Turn, a);
        let twice = apply_action(&once, ActionCategory::Turn, b);
        prop_assert_eq!(twice.x, start.x);
        prop_assert_eq!(twice.y, start.y);
        prop_assert!(libm::fabs(twice.angle - (start.angle + a + b)) < 1e-9);
    }

    #[test]
    fn prop_move_keeps_distance(distance in -500.0f64..500.0, angle in -360.0f64..360.0) {
        let start = Pose::new(0.0, 0.0, angle);
        let end = apply_action(&start, ActionCategory::Move, distance);
        let travelled = libm::sqrt(end.x * end.x + end.y * end.y);
        prop_assert!(libm::fabs(travelled - libm::fabs(distance)) < 1e-6);
        prop_assert_eq!(end.angle, angle);
    }
}

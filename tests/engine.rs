//! End-to-end behavior of the layout engine through `GraphViewState`.

#![allow(unused_crate_dependencies)]

use study_graph::components::study_graph::interaction::hit_test;
use study_graph::components::study_graph::{
	GraphData, GraphEvent, GraphLink, GraphNode, GraphViewState, LayoutMode, ViewConfig,
};

const VIEWPORT: (f64, f64) = (800.0, 600.0);
const DT: f64 = 1.0 / 60.0;

fn state_with(data: &GraphData) -> GraphViewState {
	let mut state = GraphViewState::new(ViewConfig::default(), VIEWPORT.0, VIEWPORT.1);
	state.set_data(data);
	state
}

fn leaves(count: usize) -> GraphData {
	GraphData {
		nodes: (0..count)
			.map(|i| GraphNode::leaf(format!("n{i}"), format!("Node {i}"), (i % 101) as f64))
			.collect(),
		links: Vec::new(),
	}
}

fn tree(groups: usize, per_group: usize) -> GraphData {
	let mut data = GraphData::default();
	for g in 0..groups {
		let gid = format!("g{g}");
		data.nodes.push(GraphNode::group(gid.clone(), gid.clone()));
		for l in 0..per_group {
			let lid = format!("g{g}l{l}");
			data.nodes.push(GraphNode::leaf(lid.clone(), lid.clone(), ((g * 31 + l * 17) % 101) as f64));
			data.links.push(GraphLink::new(gid.clone(), lid));
		}
	}
	data
}

fn ticks_to_settle(state: &mut GraphViewState, limit: usize) -> Option<usize> {
	(1..=limit).find(|_| {
		state.step(DT);
		state.simulation().is_settled()
	})
}

fn distance_from_center(state: &GraphViewState, id: &str) -> f64 {
	let (x, y) = state.position(id).unwrap();
	let (dx, dy) = (x - VIEWPORT.0 / 2.0, y - VIEWPORT.1 / 2.0);
	(dx * dx + dy * dy).sqrt()
}

#[test]
fn unlinked_nodes_settle_within_bound() {
	let mut state = state_with(&leaves(100));
	let ticks = ticks_to_settle(&mut state, 600);
	assert!(ticks.is_some(), "energy still {}", state.simulation().energy());

	// Settled means no further integration.
	let before = state.position("n7").unwrap();
	state.step(DT);
	assert_eq!(state.position("n7").unwrap(), before);
}

#[test]
fn fifty_node_tree_settles_in_a_few_seconds() {
	let mut state = state_with(&tree(5, 9));
	assert_eq!(state.nodes().len(), 50);
	assert!(ticks_to_settle(&mut state, 6 * 60).is_some());
}

#[test]
fn orbit_places_weaker_nodes_farther_out() {
	let data = GraphData {
		nodes: vec![
			GraphNode::group("topic", "Topic"),
			GraphNode::leaf("weak", "Weak", 0.0),
			GraphNode::leaf("strong", "Strong", 100.0),
		],
		links: vec![GraphLink::new("topic", "weak"), GraphLink::new("topic", "strong")],
	};
	let mut state = state_with(&data);
	state.set_mode(LayoutMode::Orbit);
	for _ in 0..400 {
		state.step(DT);
	}
	assert!(distance_from_center(&state, "weak") > distance_from_center(&state, "strong"));
}

#[test]
fn hit_test_center_and_beyond_margin() {
	let mut state = state_with(&leaves(1));
	state.wheel(130.0, 70.0, -1.0);
	state.wheel(500.0, 420.0, -1.0);
	let transform = *state.camera().transform();
	let margin = state.config().interaction.hit_margin;
	let (wx, wy) = state.position("n0").unwrap();

	let (sx, sy) = transform.world_to_screen(wx, wy);
	assert_eq!(hit_test(state.store(), state.nodes(), &transform, sx, sy, margin), Some(0));

	let reach = state.nodes()[0].radius + margin / transform.k;
	let (fx, fy) = transform.world_to_screen(wx, wy + reach + 0.01);
	assert_eq!(hit_test(state.store(), state.nodes(), &transform, fx, fy, margin), None);
}

#[test]
fn wheel_zoom_keeps_point_under_cursor() {
	let mut state = state_with(&leaves(3));
	for &(sx, sy, delta) in &[(120.0, 80.0, -1.0), (700.0, 550.0, 1.0), (400.0, 300.0, -3.0)] {
		let before = state.camera().transform().screen_to_world(sx, sy);
		state.wheel(sx, sy, delta);
		let after = state.camera().transform().screen_to_world(sx, sy);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}
}

#[test]
fn zoom_stays_within_bounds() {
	let mut state = state_with(&leaves(3));
	for _ in 0..200 {
		state.wheel(10.0, 10.0, -1.0);
	}
	assert_eq!(state.camera().transform().k, state.config().camera.k_max);
	for _ in 0..400 {
		state.zoom_out();
		state.step(DT);
	}
	assert!(state.camera().transform().k >= state.config().camera.k_min);
}

#[test]
fn focus_path_orders_by_weight() {
	let data = GraphData {
		nodes: vec![
			GraphNode::group("unit", "Unit"),
			GraphNode::group("part", "Part"),
			GraphNode::leaf("a", "A", 80.0),
			GraphNode::leaf("b", "B", 20.0),
			GraphNode::leaf("c", "C", 50.0),
			GraphNode::leaf("outside", "Outside", 10.0),
		],
		links: vec![
			GraphLink::new("unit", "a"),
			GraphLink::new("unit", "part"),
			GraphLink::new("part", "b"),
			GraphLink::new("unit", "c"),
		],
	};
	let mut state = state_with(&data);
	state.set_mode(LayoutMode::FocusPath("unit".into()));
	let path = state.active_focus().unwrap();
	let weights: Vec<f64> = path.order().iter().map(|&i| state.weight(i)).collect();
	assert_eq!(weights, vec![20.0, 50.0, 80.0]);
	assert_eq!(path.links().len(), 2);

	// Context nodes stay where they are while the path moves into its grid.
	let outside = state.position("outside").unwrap();
	for _ in 0..120 {
		state.step(DT);
	}
	assert_eq!(state.position("outside").unwrap(), outside);
	assert!(state.is_context_node(state.store().index_of("outside").unwrap()));
}

#[test]
fn removed_node_returns_with_fresh_state() {
	let mut data = leaves(4);
	let mut state = state_with(&data);
	for _ in 0..5 {
		state.step(DT);
	}
	assert!(state.store().by_id("n3").unwrap().speed_sq() > 0.0);

	let removed = data.nodes.pop().unwrap();
	state.set_data(&data);
	assert!(state.store().by_id("n3").is_none());
	assert_eq!(state.store().len(), 3);

	data.nodes.push(removed);
	state.set_data(&data);
	assert_eq!(state.store().by_id("n3").unwrap().speed_sq(), 0.0);
}

#[test]
fn rebuild_preserves_surviving_positions() {
	let mut data = tree(2, 3);
	let mut state = state_with(&data);
	for _ in 0..30 {
		state.step(DT);
	}
	let kept = state.position("g1l2").unwrap();
	data.nodes.retain(|n| n.id != "g0l0");
	data.links.retain(|l| l.target != "g0l0");
	data.nodes.push(GraphNode::leaf("g1l3", "new", 40.0));
	data.links.push(GraphLink::new("g1", "g1l3"));
	state.set_data(&data);
	assert_eq!(state.position("g1l2").unwrap(), kept);
	assert!(state.position("g0l0").is_none());
}

#[test]
fn release_leaves_node_at_pointer() {
	let mut state = state_with(&leaves(1));
	let (wx, wy) = state.position("n0").unwrap();
	let (sx, sy) = state.camera().transform().world_to_screen(wx, wy);

	state.pointer_down(sx, sy);
	state.pointer_move(sx + 40.0, sy + 10.0);
	state.pointer_move(100.0, 120.0);
	let event = state.pointer_up(100.0, 120.0);
	assert!(event.is_none());

	let expected = state.camera().transform().screen_to_world(100.0, 120.0);
	assert_eq!(state.position("n0").unwrap(), expected);
}

#[test]
fn click_without_travel_reports_node() {
	let mut state = state_with(&leaves(1));
	let (wx, wy) = state.position("n0").unwrap();
	let (sx, sy) = state.camera().transform().world_to_screen(wx, wy);

	state.pointer_down(sx, sy);
	match state.pointer_up(sx + 1.0, sy) {
		Some(GraphEvent::NodeClick(Some(node))) => assert_eq!(node.id, "n0"),
		other => panic!("expected node click, got {other:?}"),
	}

	state.pointer_down(5.0, 5.0);
	assert!(matches!(state.pointer_up(5.0, 5.0), Some(GraphEvent::NodeClick(None))));
}

#[test]
fn invalid_links_are_dropped() {
	let data = GraphData {
		nodes: vec![
			GraphNode::group("a", "A"),
			GraphNode::group("b", "B"),
			GraphNode::leaf("c", "C", 10.0),
		],
		links: vec![
			GraphLink::new("a", "b"),
			GraphLink::new("b", "c"),
			// Second parent.
			GraphLink::new("a", "c"),
			// Cycle.
			GraphLink::new("c", "a"),
			GraphLink::new("ghost", "a"),
		],
	};
	let state = state_with(&data);
	assert_eq!(state.hierarchy().links().len(), 2);
	assert_eq!(state.hierarchy().dropped(), 3);
}

#[test]
fn empty_graph_is_inert() {
	let mut state = state_with(&GraphData::default());
	for _ in 0..10 {
		assert!(!state.step(DT).moved);
	}
	state.reset_view();
	state.set_mode(LayoutMode::Orbit);
	state.step(DT);
	assert!(state.pointer_move(400.0, 300.0).is_none());
}

#[test]
fn mode_switch_does_not_snap() {
	let mut state = state_with(&tree(3, 4));
	for _ in 0..20 {
		state.step(DT);
	}
	let before: Vec<(f64, f64)> = state.store().states().iter().map(|s| (s.x, s.y)).collect();
	state.set_mode(LayoutMode::Orbit);
	let after: Vec<(f64, f64)> = state.store().states().iter().map(|s| (s.x, s.y)).collect();
	assert_eq!(before, after);

	// One seek step moves only a fraction of the way.
	state.step(DT);
	let fraction = state.config().simulation.seek_fraction;
	let max_step = state
		.store()
		.states()
		.iter()
		.zip(&before)
		.map(|(s, &(x, y))| ((s.x - x).powi(2) + (s.y - y).powi(2)).sqrt())
		.fold(0.0, f64::max);
	assert!(max_step < VIEWPORT.0 * fraction);
}

#[test]
fn orbit_entry_refits_once_motion_calms() {
	let mut state = state_with(&tree(2, 3));
	state.set_mode(LayoutMode::Orbit);
	let refits = (0..600).filter(|_| state.step(DT).refit).count();
	assert_eq!(refits, 1);
	assert!(!state.simulation().centering_pending());
}

#[test]
fn reparenting_wakes_settled_layout() {
	let mut data = GraphData {
		nodes: vec![
			GraphNode::group("a", "A"),
			GraphNode::group("b", "B"),
			GraphNode::leaf("c", "C", 30.0),
		],
		links: vec![GraphLink::new("a", "c")],
	};
	let mut state = state_with(&data);
	assert!(ticks_to_settle(&mut state, 600).is_some());
	let before = state.position("c").unwrap();

	data.links = vec![GraphLink::new("b", "c")];
	state.set_data(&data);
	assert!(!state.simulation().is_settled());
	for _ in 0..60 {
		state.step(DT);
	}
	assert_ne!(state.position("c").unwrap(), before);
}

#[test]
fn unchanged_data_leaves_layout_settled() {
	let data = tree(2, 3);
	let mut state = state_with(&data);
	assert!(ticks_to_settle(&mut state, 600).is_some());
	state.set_data(&data);
	assert!(state.simulation().is_settled());
}

#[test]
fn horizontal_wheel_keeps_zoom() {
	let mut state = state_with(&leaves(3));
	let before = *state.camera().transform();
	state.wheel(400.0, 300.0, 0.0);
	assert_eq!(*state.camera().transform(), before);
}

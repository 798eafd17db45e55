//! study-graph: interactive knowledge map for an exam-question study tracker.
//!
//! This crate provides a WASM canvas component that lays out study groups and
//! questions as a forest, with force, weight-orbit and focus-path layouts,
//! pan/zoom/drag interaction and hover details.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::study_graph::{
	GraphControls, GraphData, GraphError, GraphLink, GraphNode, LayoutMode, NodeCategory,
	StudyGraphCanvas, Theme, ViewConfig,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("study-graph: logging initialized");
}

/// Text of the `<script id=...>` element, if present.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Parse graph data in the `{ nodes: [...], links: [...] }` shape.
pub fn parse_graph_data(json: &str) -> Result<GraphData, GraphError> {
	serde_json::from_str(json).map_err(GraphError::DataParse)
}

/// Load graph data from a script element with id="graph-data".
fn load_graph_data() -> Option<GraphData> {
	let json_text = script_text("graph-data")?;
	match parse_graph_data(&json_text) {
		Ok(data) => {
			info!(
				"study-graph: loaded {} nodes, {} links",
				data.nodes.len(),
				data.links.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("study-graph: {}", e);
			None
		}
	}
}

/// Load view configuration from a script element with id="graph-config".
/// Missing or invalid configuration falls back to defaults.
fn load_view_config() -> ViewConfig {
	let Some(json_text) = script_text("graph-config") else {
		return ViewConfig::default();
	};
	ViewConfig::from_json(&json_text).unwrap_or_else(|e| {
		warn!("study-graph: {}, using default configuration", e);
		ViewConfig::default()
	})
}

/// Small built-in hierarchy shown when the page supplies no data.
pub fn sample_data() -> GraphData {
	const SUBJECTS: [(&str, &str, [&str; 2]); 3] = [
		("Biology", "#a3be8c", ["Cells", "Genetics"]),
		("Chemistry", "#ebcb8b", ["Bonding", "Kinetics"]),
		("Physics", "#88c0d0", ["Mechanics", "Waves"]),
	];
	const QUESTIONS_PER_TOPIC: usize = 4;

	let mut data = GraphData::default();
	let mut serial = 0usize;
	for (s, (subject, color, topics)) in SUBJECTS.iter().enumerate() {
		let subject_id = format!("s{s}");
		data.nodes.push(GraphNode {
			radius: 14.0,
			color: (*color).to_string(),
			..GraphNode::group(subject_id.clone(), *subject)
		});
		for (t, topic) in topics.iter().enumerate() {
			let topic_id = format!("s{s}t{t}");
			data.nodes.push(GraphNode {
				color: (*color).to_string(),
				..GraphNode::group(topic_id.clone(), *topic)
			});
			data.links.push(GraphLink::new(subject_id.clone(), topic_id.clone()));
			for q in 0..QUESTIONS_PER_TOPIC {
				serial += 1;
				let weight = ((serial * 37 + 11) % 101) as f64;
				let question_id = format!("s{s}t{t}q{q}");
				data.nodes.push(GraphNode {
					color: (*color).to_string(),
					..GraphNode::leaf(question_id.clone(), format!("{topic} question {}", q + 1), weight)
				});
				data.links.push(GraphLink::new(topic_id.clone(), question_id));
			}
		}
	}
	data
}

/// Main application component.
/// Loads graph data and configuration from the DOM and renders the map with
/// layout and zoom controls.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_else(|| {
		info!("study-graph: no graph data on page, showing sample");
		sample_data()
	});
	let graph_signal = Signal::derive(move || graph_data.clone());
	let config = load_view_config();

	let mode = RwSignal::new(LayoutMode::Force);
	let selected = RwSignal::new(None::<GraphNode>);
	let hovered = RwSignal::new(None::<GraphNode>);
	let controls = GraphControls::new();

	let focus_target = move || {
		selected
			.get()
			.filter(GraphNode::is_group)
			.map(|node| node.id)
	};

	let (zoom_in, zoom_out, reset) = (controls.clone(), controls.clone(), controls.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Study Map" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<StudyGraphCanvas
				data=graph_signal
				mode=mode
				config=config
				on_node_click={move |node: Option<GraphNode>| selected.set(node)}
				on_node_hover={move |node: Option<GraphNode>| hovered.set(node)}
				controls=controls
				fullscreen=true
			/>
			<div class="graph-overlay">
				<h1>"Study Map"</h1>
				<p class="subtitle">
					"Drag nodes to reposition. Scroll to zoom. Drag background to pan. Click a group to focus it."
				</p>
				<div class="graph-modes">
					<button
						class:active=move || mode.get() == LayoutMode::Force
						on:click=move |_| mode.set(LayoutMode::Force)
					>
						"Force"
					</button>
					<button
						class:active=move || mode.get() == LayoutMode::Orbit
						on:click=move |_| mode.set(LayoutMode::Orbit)
					>
						"Orbit"
					</button>
					<button
						class:active=move || matches!(mode.get(), LayoutMode::FocusPath(_))
						disabled=move || focus_target().is_none()
						on:click=move |_| {
							if let Some(id) = focus_target() {
								mode.set(LayoutMode::FocusPath(id));
							}
						}
					>
						"Focus"
					</button>
				</div>
				<div class="graph-zoom">
					<button on:click=move |_| zoom_in.zoom_in()>"+"</button>
					<button on:click=move |_| zoom_out.zoom_out()>"−"</button>
					<button on:click=move |_| reset.reset_view()>"Fit"</button>
				</div>
			</div>
			<Show when=move || hovered.get().is_some()>
				<div class="graph-info">
					{move || {
						hovered
							.get()
							.map(|node| {
								let weight = node
									.weight
									.map(|w| format!("Weight {w:.0}"))
									.unwrap_or_else(|| "No weight recorded".to_string());
								view! {
									<h2>{node.label}</h2>
									<p>{weight}</p>
								}
							})
					}}
				</div>
			</Show>
		</div>
	}
}

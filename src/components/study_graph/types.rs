//! Graph data structures supplied by the host's graph-model builder.

use serde::Deserialize;

/// Hierarchy role of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
	/// Category or subcategory; has children.
	Group,
	/// Terminal study item carrying its own weight.
	Leaf,
}

fn default_radius() -> f64 {
	8.0
}

fn default_color() -> String {
	"#5e81ac".to_string()
}

/// A node in the study hierarchy.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
	/// Unique identifier, stable across model rebuilds.
	pub id: String,
	/// Group or leaf.
	pub category: NodeCategory,
	/// Visual radius in world units.
	#[serde(default = "default_radius")]
	pub radius: f64,
	/// CSS fill color (e.g. "#1976d2").
	#[serde(default = "default_color")]
	pub color: String,
	/// Optional CSS border ring color.
	#[serde(default)]
	pub border_color: Option<String>,
	/// Proficiency weight in `0..=100`. Groups without a weight get the mean of
	/// their descendant leaves.
	#[serde(default)]
	pub weight: Option<f64>,
	/// Display label shown in tooltips.
	#[serde(default)]
	pub label: String,
	/// Opaque host data handed back through callbacks.
	#[serde(default)]
	pub payload: serde_json::Value,
}

impl GraphNode {
	/// Convenience constructor for a group node.
	pub fn group(id: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			category: NodeCategory::Group,
			radius: 12.0,
			color: default_color(),
			border_color: None,
			weight: None,
			label: label.into(),
			payload: serde_json::Value::Null,
		}
	}

	/// Convenience constructor for a leaf node with the given weight.
	pub fn leaf(id: impl Into<String>, label: impl Into<String>, weight: f64) -> Self {
		Self {
			id: id.into(),
			category: NodeCategory::Leaf,
			radius: default_radius(),
			color: default_color(),
			border_color: None,
			weight: Some(weight),
			label: label.into(),
			payload: serde_json::Value::Null,
		}
	}

	/// Whether this node is a group.
	pub fn is_group(&self) -> bool {
		self.category == NodeCategory::Group
	}
}

/// A parent → child edge.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphLink {
	/// Parent node ID.
	pub source: String,
	/// Child node ID.
	pub target: String,
}

impl GraphLink {
	/// Link `source` as the parent of `target`.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
		}
	}
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	/// Every node of the forest.
	pub nodes: Vec<GraphNode>,
	/// Parent to child links.
	pub links: Vec<GraphLink>,
}

/// Active layout behavior. Exactly one is in effect at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", content = "target", rename_all = "camelCase")]
pub enum LayoutMode {
	/// Pairwise repulsion, link springs and a weak center pull.
	#[default]
	Force,
	/// Deterministic weight-driven rings, one angular sector per root group.
	Orbit,
	/// Leaves under the given group laid out in ascending-weight order.
	FocusPath(String),
}

impl LayoutMode {
	/// Focus target group id, if in focus-path mode.
	pub fn focus_target(&self) -> Option<&str> {
		match self {
			LayoutMode::FocusPath(id) => Some(id),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_graph_data_with_defaults() {
		let json = r##"{
			"nodes": [
				{ "id": "anatomy", "category": "group", "label": "Anatomy" },
				{ "id": "q1", "category": "leaf", "weight": 42, "color": "#ff0000" }
			],
			"links": [ { "source": "anatomy", "target": "q1" } ]
		}"##;
		let data: GraphData = serde_json::from_str(json).unwrap();
		assert_eq!(data.nodes.len(), 2);
		assert!(data.nodes[0].is_group());
		assert_eq!(data.nodes[0].weight, None);
		assert_eq!(data.nodes[1].weight, Some(42.0));
		assert_eq!(data.nodes[1].radius, 8.0);
		assert_eq!(data.links[0].target, "q1");
	}

	#[test]
	fn parses_layout_modes() {
		let force: LayoutMode = serde_json::from_str(r#"{"mode":"force"}"#).unwrap();
		assert_eq!(force, LayoutMode::Force);
		let focus: LayoutMode =
			serde_json::from_str(r#"{"mode":"focusPath","target":"anatomy"}"#).unwrap();
		assert_eq!(focus.focus_target(), Some("anatomy"));
	}
}

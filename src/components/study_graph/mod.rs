//! Study-progress graph visualization component.
//!
//! Renders a forest of study groups and question leaves on an HTML canvas:
//! - Force layout, weight-based orbit layout and serpentine focus paths
//! - Pan, wheel and animated zoom, node dragging
//! - Smoothed hover highlighting with a tooltip
//! - Click and hover callbacks for the host UI
//!
//! The engine ([`GraphViewState`] and everything below it) is plain Rust with
//! no DOM access; only [`StudyGraphCanvas`] and the renderer touch the browser.
//!
//! # Example
//!
//! ```ignore
//! use study_graph::{GraphData, GraphLink, GraphNode, LayoutMode, StudyGraphCanvas};
//!
//! let data = GraphData {
//!     nodes: vec![
//!         GraphNode::group("bio", "Biology"),
//!         GraphNode::leaf("q1", "Cell membranes", 72.0),
//!     ],
//!     links: vec![GraphLink::new("bio", "q1")],
//! };
//!
//! view! {
//!     <StudyGraphCanvas
//!         data=Signal::derive(move || data.clone())
//!         mode=Signal::derive(|| LayoutMode::Orbit)
//!         fullscreen=true
//!     />
//! }
//! ```

pub mod camera;
mod component;
pub mod config;
pub mod error;
pub mod focus;
pub mod hierarchy;
pub mod highlight;
pub mod interaction;
pub mod render;
pub mod scale;
pub mod simulation;
pub mod state;
pub mod store;
pub mod theme;
pub mod types;

pub use component::{GraphControls, StudyGraphCanvas, ViewCommand};
pub use config::{CameraConfig, HoverPolicy, InteractionConfig, SimulationConfig, ViewConfig};
pub use error::GraphError;
pub use state::{GraphEvent, GraphViewState};
pub use theme::Theme;
pub use types::{GraphData, GraphLink, GraphNode, LayoutMode, NodeCategory};

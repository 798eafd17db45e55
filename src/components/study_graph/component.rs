//! Leptos component wrapping the study graph canvas.
//!
//! The component owns one [`GraphViewState`], feeds it mouse and wheel
//! events, and drives it from a `requestAnimationFrame` loop that steps the
//! engine and renders each frame. Host callbacks run after the state borrow
//! is released so they may freely touch other signals.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::ViewConfig;
use super::error::GraphError;
use super::render;
use super::scale::ScaleConfig;
use super::state::{GraphEvent, GraphViewState};
use super::theme::Theme;
use super::types::{GraphData, GraphNode, LayoutMode};

/// Longest frame step fed to the engine, in seconds.
const MAX_FRAME_DT: f64 = 0.1;

/// Camera commands a host can queue from outside the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewCommand {
	/// Animated zoom in about the viewport centre.
	ZoomIn,
	/// Animated zoom out about the viewport centre.
	ZoomOut,
	/// Fit the whole graph, or the focus path when one is active.
	ResetView,
}

/// Handle for driving the camera from host UI such as toolbar buttons.
/// Commands are applied on the next animation frame.
#[derive(Clone, Default)]
pub struct GraphControls {
	queue: Rc<RefCell<Vec<ViewCommand>>>,
}

impl GraphControls {
	/// Handle with an empty queue.
	pub fn new() -> Self {
		Self::default()
	}

	/// Queue [`ViewCommand::ZoomIn`].
	pub fn zoom_in(&self) {
		self.queue.borrow_mut().push(ViewCommand::ZoomIn);
	}

	/// Queue [`ViewCommand::ZoomOut`].
	pub fn zoom_out(&self) {
		self.queue.borrow_mut().push(ViewCommand::ZoomOut);
	}

	/// Queue [`ViewCommand::ResetView`].
	pub fn reset_view(&self) {
		self.queue.borrow_mut().push(ViewCommand::ResetView);
	}

	fn drain(&self) -> Vec<ViewCommand> {
		std::mem::take(&mut *self.queue.borrow_mut())
	}
}

/// Engine state plus visual configuration.
struct GraphContext {
	state: GraphViewState,
	scale: ScaleConfig,
	theme: Theme,
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, GraphError> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|ctx| ctx.dyn_into().ok())
		.ok_or(GraphError::ContextUnavailable)
}

fn canvas_element(canvas_ref: NodeRef<leptos::html::Canvas>) -> Result<HtmlCanvasElement, GraphError> {
	canvas_ref
		.get()
		.map(Into::into)
		.ok_or(GraphError::MissingCanvas)
}

/// Pointer position relative to the canvas.
fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas = canvas_element(canvas_ref).ok()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn emit(
	event: Option<GraphEvent>,
	on_node_click: Option<Callback<Option<GraphNode>>>,
	on_node_hover: Option<Callback<Option<GraphNode>>>,
) {
	match event {
		Some(GraphEvent::NodeClick(node)) => {
			if let Some(cb) = on_node_click {
				cb.run(node);
			}
		}
		Some(GraphEvent::NodeHover(node)) => {
			if let Some(cb) = on_node_hover {
				cb.run(node);
			}
		}
		None => {}
	}
}

/// Renders an interactive study-progress graph on a canvas element.
///
/// `data` and `mode` are reactive: a new node set is merged into the running
/// layout, keeping positions for ids that survive, and a mode change animates
/// from the current positions. The component sizes itself to its parent by
/// default; `fullscreen = true` fills the window and follows its size.
/// Explicit `width`/`height` override automatic sizing.
#[component]
pub fn StudyGraphCanvas(
	/// Nodes and links to lay out.
	#[prop(into)]
	data: Signal<GraphData>,
	/// Active layout mode.
	#[prop(into, default = Signal::stored(LayoutMode::Force))]
	mode: Signal<LayoutMode>,
	/// Engine tuning.
	#[prop(optional)]
	config: ViewConfig,
	/// Visual theme.
	#[prop(optional)]
	theme: Theme,
	/// Called with the clicked node, or `None` for a background click.
	#[prop(optional, into)]
	on_node_click: Option<Callback<Option<GraphNode>>>,
	/// Called when the hovered node changes, after the hover policy.
	#[prop(optional, into)]
	on_node_hover: Option<Callback<Option<GraphNode>>>,
	/// Handle for zoom and reset commands from host UI.
	#[prop(optional)]
	controls: Option<GraphControls>,
	/// Fill the window and follow its size.
	#[prop(default = false)]
	fullscreen: bool,
	/// Fixed canvas width in pixels.
	#[prop(default = None)]
	width: Option<f64>,
	/// Fixed canvas height in pixels.
	#[prop(default = None)]
	height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let stopped = Arc::new(AtomicBool::new(false));
	let controls = controls.unwrap_or_default();
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	let stop_flag = stopped.clone();
	on_cleanup(move || stop_flag.store(true, Ordering::Relaxed));

	let init_stopped = stopped.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("study-graph: no window");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx = match context_2d(&canvas) {
			Ok(ctx) => ctx,
			Err(err) => {
				warn!("study-graph: {err}");
				return;
			}
		};

		let mut state = GraphViewState::new(config.clone(), w, h);
		state.set_data(&data.get_untracked());
		state.set_mode(mode.get_untracked());
		*context_init.borrow_mut() = Some(GraphContext {
			state,
			scale: ScaleConfig::default(),
			theme: theme.clone(),
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner, resize_anim) =
			(context_init.clone(), animate_init.clone(), resize_cb_init.clone());
		let (stopped_anim, controls_anim) = (init_stopped.clone(), controls.clone());
		let mut last_frame: Option<f64> = None;
		*animate_init.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			let Some(window) = web_sys::window() else {
				return;
			};
			if stopped_anim.load(Ordering::Relaxed) {
				if let Some(ref cb) = *resize_anim.borrow() {
					let _ = window
						.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
				// Drops this closure's handle to itself so the loop is freed.
				animate_inner.borrow_mut().take();
				return;
			}

			let dt = match last_frame {
				Some(prev) => ((timestamp - prev) / 1000.0).clamp(0.0, MAX_FRAME_DT),
				None => 1.0 / 60.0,
			};
			last_frame = Some(timestamp);

			if let Some(ref mut c) = *context_anim.borrow_mut() {
				for command in controls_anim.drain() {
					match command {
						ViewCommand::ZoomIn => c.state.zoom_in(),
						ViewCommand::ZoomOut => c.state.zoom_out(),
						ViewCommand::ResetView => c.state.reset_view(),
					}
				}
				c.state.step(dt);
				render::render(&c.state, &ctx, &c.scale, &c.theme);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_data = context.clone();
	Effect::new(move |_| {
		let data = data.get();
		let mode = mode.get();
		if let Some(ref mut c) = *context_data.borrow_mut() {
			c.state.set_data(&data);
			c.state.set_mode(mode);
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let event = context_md
			.borrow_mut()
			.as_mut()
			.and_then(|c| c.state.pointer_down(x, y));
		emit(event, on_node_click, on_node_hover);
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let event = context_mm
			.borrow_mut()
			.as_mut()
			.and_then(|c| c.state.pointer_move(x, y));
		emit(event, on_node_click, on_node_hover);
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let event = context_mu
			.borrow_mut()
			.as_mut()
			.and_then(|c| c.state.pointer_up(x, y));
		emit(event, on_node_click, on_node_hover);
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let event = context_ml
			.borrow_mut()
			.as_mut()
			.and_then(|c| c.state.pointer_leave());
		emit(event, on_node_click, on_node_hover);
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			c.state.wheel(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="study-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn controls_queue_commands_in_order() {
		let controls = GraphControls::new();
		let shared = controls.clone();
		shared.zoom_in();
		shared.zoom_in();
		controls.reset_view();
		controls.zoom_out();
		assert_eq!(
			controls.drain(),
			vec![
				ViewCommand::ZoomIn,
				ViewCommand::ZoomIn,
				ViewCommand::ResetView,
				ViewCommand::ZoomOut
			]
		);
		assert!(shared.drain().is_empty());
	}
}

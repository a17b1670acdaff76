use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use leptos::callback::{Callable, Callback, UnsyncCallback};
use leptos::prelude::*;
use log::error;
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent};

use super::interaction::{Gesture, Target};
use super::render::{CollapserShape, LinkShape, Marker, NodeShape, Scene};
use super::state::{Outcome, SankeyState};
use super::types::{GraphData, SelectedArtifact};
use crate::config::SankeyConfig;

type Shared = Rc<RefCell<Option<SankeyState>>>;

fn now() -> f64 {
	js_sys::Date::now()
}

/// The `data-hit` target under the event, if any.
fn hit(ev: &MouseEvent) -> Option<Target> {
	let element: Element = ev.target()?.dyn_into().ok()?;
	element
		.closest("[data-hit]")
		.ok()??
		.get_attribute("data-hit")?
		.parse()
		.ok()
}

/// Redraw and arm the click debounce timer as the outcome asks.
fn flush(shared: &Shared, scene: RwSignal<Scene>, outcome: Outcome) {
	if outcome.redraw {
		if let Some(s) = shared.borrow().as_ref() {
			scene.set(s.scene());
		}
	}
	if let Some((token, delay_ms)) = outcome.schedule_click {
		let shared = shared.clone();
		set_timeout(
			move || {
				let outcome = match shared.borrow_mut().as_mut() {
					Some(s) => s.on_click_timer(token, now()),
					None => return,
				};
				flush(&shared, scene, outcome);
			},
			Duration::from_millis(delay_ms.max(0.0) as u64),
		);
	}
}

fn marker_view(marker: Marker, color: String) -> impl IntoView {
	view! {
		<marker
			id=marker.id()
			viewBox="0 0 6 10"
			refX="1"
			refY="5"
			markerUnits="strokeWidth"
			markerWidth="1"
			markerHeight="1"
			orient="auto"
		>
			<path d="M 0 0 L 1 0 L 6 5 L 1 10 L 0 10 z" fill=color />
		</marker>
	}
}

fn link_view(link: &LinkShape, transition_ms: f64) -> impl IntoView + use<> {
	view! {
		<path
			class="link"
			data-hit=Target::Link(link.index).to_string()
			d=link.path.clone()
			fill="none"
			stroke=link.stroke.clone()
			stroke-width=link.stroke_width.to_string()
			opacity=link.opacity.to_string()
			marker-end=format!("url(#{})", link.marker.id())
			style=format!("transition: opacity {transition_ms}ms, stroke {transition_ms}ms;")
		/>
	}
}

fn node_view(node: &NodeShape, transition_ms: f64) -> impl IntoView + use<> {
	let label = node.label.clone().map(|label| {
		view! {
			<text
				x=label.x.to_string()
				y=label.y.to_string()
				dy=".35em"
				text-anchor=label.anchor
				style="pointer-events: none; user-select: none;"
			>
				{label.text}
			</text>
		}
	});
	view! {
		<g
			class="node"
			data-hit=Target::Node(node.index).to_string()
			opacity=node.opacity.to_string()
			style=format!(
				"transform: translate({}px, {}px); transition: transform {transition_ms}ms, opacity {transition_ms}ms; cursor: move;",
				node.x,
				node.y,
			)
		>
			<rect
				width=node.width.to_string()
				height=node.height.to_string()
				fill=node.fill.clone()
				fill-opacity=node.fill_opacity.to_string()
				stroke=node.stroke.clone()
			/>
			{label}
		</g>
	}
}

fn collapser_view(collapser: &CollapserShape) -> impl IntoView + use<> {
	view! {
		<circle
			class="collapser"
			data-hit=Target::Collapser(collapser.index).to_string()
			cx=collapser.cx.to_string()
			cy=collapser.cy.to_string()
			r=collapser.r.to_string()
			fill=collapser.fill.clone()
			opacity=collapser.opacity.to_string()
			style="cursor: pointer;"
		/>
	}
}

/// SVG relationship diagram over `data`, rebuilt whenever the signal changes.
#[component]
pub fn RelationshipSankey(
	/// Records to draw.
	#[prop(into)]
	data: Signal<GraphData>,
	/// Settings; defaults when omitted.
	#[prop(optional)]
	config: SankeyConfig,
	/// Called with the new selection, or `None` once it is cleared.
	#[prop(optional, into)]
	on_select: Option<Callback<Option<SelectedArtifact>>>,
) -> impl IntoView {
	let listener = on_select.map(|callback| {
		UnsyncCallback::new(move |selected: Option<SelectedArtifact>| callback.run(selected))
	});
	sankey_view(data, config, listener)
}

/// The diagram itself; script hosts call this directly since their listener
/// wraps a JS function and cannot be a [`Callback`].
pub(crate) fn sankey_view(
	data: Signal<GraphData>,
	config: SankeyConfig,
	on_select: Option<UnsyncCallback<Option<SelectedArtifact>>>,
) -> impl IntoView {
	let svg_ref = NodeRef::<leptos::svg::Svg>::new();
	let shared: Shared = Rc::new(RefCell::new(None));
	let scene = RwSignal::new(Scene::default());
	let failure = RwSignal::new(None::<String>);
	let pointer_at = RwSignal::new((0.0_f64, 0.0_f64));

	let shared_init = shared.clone();
	Effect::new(move |_| {
		let data = data.get();
		match SankeyState::new(&data, config.clone(), now()) {
			Ok(built) => {
				let built = built.with_listener(on_select.clone());
				scene.set(built.scene());
				failure.set(None);
				*shared_init.borrow_mut() = Some(built);
			}
			Err(err) => {
				error!("cannot draw relationships: {err}");
				*shared_init.borrow_mut() = None;
				scene.set(Scene::default());
				failure.set(Some(err.to_string()));
			}
		}
	});

	// Pointer position relative to the top-left of the drawing.
	let local = move |ev: &MouseEvent| -> Option<(f64, f64)> {
		let rect = svg_ref.get()?.get_bounding_client_rect();
		Some((
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};

	let shared_md = shared.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let (Some(Target::Node(node)), Some(pointer)) = (hit(&ev), local(&ev)) else {
			return;
		};
		ev.prevent_default();
		if let Some(ref mut s) = *shared_md.borrow_mut() {
			s.on_pointer_down(node, pointer, now());
		}
	};

	let shared_mm = shared.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(pointer) = local(&ev) else {
			return;
		};
		pointer_at.set(pointer);
		let outcome = {
			let mut guard = shared_mm.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let t = now();
			let moved = s.on_pointer_move(pointer, t);
			// Hover stays frozen while a node is being dragged.
			if matches!(s.controller.gesture(), Gesture::Dragging { .. }) {
				moved
			} else {
				moved.merge(s.on_hover(hit(&ev), t))
			}
		};
		flush(&shared_mm, scene, outcome);
	};

	let shared_mu = shared.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *shared_mu.borrow_mut() {
			s.on_pointer_up();
		}
	};

	let shared_ml = shared.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let outcome = match shared_ml.borrow_mut().as_mut() {
			Some(s) => s.on_pointer_leave(now()),
			None => return,
		};
		flush(&shared_ml, scene, outcome);
	};

	let shared_ck = shared.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(Target::Node(node)) = hit(&ev) else {
			return;
		};
		let outcome = match shared_ck.borrow_mut().as_mut() {
			Some(s) => s.on_click(node, now()),
			None => return,
		};
		flush(&shared_ck, scene, outcome);
	};

	let shared_dc = shared;
	let on_dblclick = move |ev: MouseEvent| {
		let Some(Target::Collapser(node)) = hit(&ev) else {
			return;
		};
		let outcome = match shared_dc.borrow_mut().as_mut() {
			Some(s) => s.on_collapser_double_click(node, now()),
			None => return,
		};
		flush(&shared_dc, scene, outcome);
	};

	let tooltip_style = move || {
		let (x, y) = pointer_at.get();
		let shown = scene.with(|s| s.tooltip.is_some());
		format!(
			"position: absolute; left: {}px; top: {}px; white-space: pre-line; pointer-events: none; opacity: {};",
			x + 12.0,
			y - 28.0,
			if shown { 1 } else { 0 },
		)
	};

	view! {
		<div class="relationship-sankey" style="position: relative;">
			{move || failure.get().map(|msg| view! { <p class="sankey-error">{msg}</p> })}
			<svg
				node_ref=svg_ref
				class="sankey"
				width=move || scene.with(|s| s.outer_width.to_string())
				height=move || scene.with(|s| s.outer_height.to_string())
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:click=on_click
				on:dblclick=on_dblclick
				style="display: block;"
			>
				<defs>
					{move || {
						scene
							.with(|s| {
								s.markers
									.iter()
									.map(|(marker, color)| marker_view(*marker, color.clone()))
									.collect_view()
							})
					}}
				</defs>
				<g transform=move || {
					scene.with(|s| format!("translate({},{})", s.margin.left, s.margin.top))
				}>
					<g class="links">
						{move || {
							scene
								.with(|s| {
									s.links
										.iter()
										.map(|link| link_view(link, s.transition_ms))
										.collect_view()
								})
						}}
					</g>
					<g class="nodes">
						{move || {
							scene
								.with(|s| {
									s.nodes
										.iter()
										.map(|node| node_view(node, s.transition_ms))
										.collect_view()
								})
						}}
					</g>
					<g class="collapsers">
						{move || {
							scene.with(|s| s.collapsers.iter().map(collapser_view).collect_view())
						}}
					</g>
				</g>
			</svg>
			<div class="sankey-tooltip" style=tooltip_style>
				{move || scene.with(|s| s.tooltip.clone()).unwrap_or_default()}
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::sankey::model::SankeyModel;
	use crate::components::sankey::render::{Highlight, project};
	use crate::pages::sample::wsdl_sample;

	#[test]
	fn shape_views_own_their_data() {
		let config = SankeyConfig::default();
		let mut model = SankeyModel::build(&wsdl_sample(), &config).unwrap();
		model.expand("sample-wsdl").unwrap();
		model.layout(4);

		// Views are built from a borrowed scene that is gone before they are used.
		let (links, nodes, collapsers) = {
			let scene = project(&model, Highlight::None, &config);
			(
				scene.links.iter().map(|l| link_view(l, scene.transition_ms)).collect::<Vec<_>>(),
				scene.nodes.iter().map(|n| node_view(n, scene.transition_ms)).collect::<Vec<_>>(),
				scene.collapsers.iter().map(collapser_view).collect::<Vec<_>>(),
			)
		};
		assert_eq!(nodes.len(), 23);
		assert!(!links.is_empty());
		assert_eq!(collapsers.len(), 1);
	}
}

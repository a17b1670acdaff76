//! JavaScript entry points for pages that are not Leptos apps themselves.
//!
//! ```js
//! const graph = new RelationshipGraph();
//! graph.addNode("WsdlDocument", "w1", null, "sample.wsdl");
//! graph.addNode("XsdDocument", "x1", null, "sample.xsd");
//! graph.addLink("w1", "x1", 1, "importedXsds");
//! graph.onSelect(artifact => console.log(artifact?.name));
//! const view = graph.mount("chart");
//! // later
//! view.unmount();
//! ```

use std::any::Any;

use leptos::callback::UnsyncCallback;
use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::components::responsive::{RegionSet, ResponsiveLayout};
use crate::components::sankey::{GraphData, LinkRecord, NodeRecord, SelectedArtifact, sankey_view};
use crate::config::SankeyConfig;

/// Collects graph data from script, then mounts a view of it.
#[wasm_bindgen]
#[derive(Default)]
pub struct RelationshipGraph {
	data: GraphData,
	config: SankeyConfig,
	listener: Option<UnsyncCallback<Option<SelectedArtifact>>>,
}

#[wasm_bindgen]
impl RelationshipGraph {
	/// An empty graph; also sets up console logging.
	#[wasm_bindgen(constructor)]
	pub fn new() -> Self {
		crate::init_logging();
		Self::default()
	}

	/// Start from a `{ nodes: [...], links: [...] }` document.
	#[wasm_bindgen(js_name = fromJson)]
	pub fn from_json(json: &str) -> Result<RelationshipGraph, JsError> {
		let data: GraphData = serde_json::from_str(json)?;
		info!("parsed {} nodes, {} links", data.nodes.len(), data.links.len());
		Ok(Self {
			data,
			..Self::default()
		})
	}

	/// Append a node; `parent` is `null` for roots.
	#[wasm_bindgen(js_name = addNode)]
	pub fn add_node(&mut self, kind: String, id: String, parent: Option<String>, name: String) {
		self.data.nodes.push(NodeRecord {
			kind,
			id,
			parent,
			name,
		});
	}

	/// Append a link between two node ids.
	#[wasm_bindgen(js_name = addLink)]
	pub fn add_link(&mut self, source: String, target: String, value: f64, label: String) {
		self.data.links.push(LinkRecord {
			source,
			target,
			value,
			label,
		});
	}

	/// Override rendering settings with a partial JSON object.
	#[wasm_bindgen(js_name = setConfig)]
	pub fn set_config(&mut self, json: &str) -> Result<(), JsError> {
		self.config = SankeyConfig::from_json(json)?;
		Ok(())
	}

	/// `callback` receives `{ id, name }` on selection and `null` when it is cleared.
	#[wasm_bindgen(js_name = onSelect)]
	pub fn on_select(&mut self, callback: js_sys::Function) {
		self.listener = Some(UnsyncCallback::new(move |selected: Option<SelectedArtifact>| {
			let arg = selected.map_or(JsValue::NULL, artifact_object);
			if let Err(err) = callback.call1(&JsValue::NULL, &arg) {
				warn!("selection callback failed: {err:?}");
			}
		}));
	}

	/// Draw into the element with the given id.
	pub fn mount(&self, container_id: &str) -> Result<RelationshipView, JsValue> {
		let container: HtmlElement = web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.get_element_by_id(container_id))
			.ok_or_else(|| JsValue::from_str(&format!("no element with id `{container_id}`")))?
			.dyn_into()?;

		let (data, config, listener) = (self.data.clone(), self.config.clone(), self.listener.clone());
		info!(
			"mounting {} nodes and {} links into #{container_id}",
			data.nodes.len(),
			data.links.len()
		);
		let handle =
			leptos::mount::mount_to(container, move || sankey_view(Signal::stored(data), config, listener));
		Ok(RelationshipView {
			handle: Some(Box::new(handle)),
		})
	}
}

fn artifact_object(artifact: SelectedArtifact) -> JsValue {
	let object = js_sys::Object::new();
	let _ = js_sys::Reflect::set(&object, &"id".into(), &artifact.id.into());
	let _ = js_sys::Reflect::set(&object, &"name".into(), &artifact.name.into());
	object.into()
}

/// A mounted view; unmounting (or dropping) removes it from the page.
#[wasm_bindgen]
pub struct RelationshipView {
	handle: Option<Box<dyn Any>>,
}

#[wasm_bindgen]
impl RelationshipView {
	/// Remove the view; later calls do nothing.
	pub fn unmount(&mut self) {
		self.handle.take();
	}
}

/// Handle returned by [`install_responsive_layout`].
#[wasm_bindgen]
pub struct ResponsiveHandle {
	layout: Option<ResponsiveLayout>,
}

#[wasm_bindgen]
impl ResponsiveHandle {
	/// Stop following the viewport.
	pub fn uninstall(&mut self) {
		self.layout.take();
	}
}

/// Show `desktopSelector` and hide `mobileSelector` on wide viewports, the
/// reverse on narrow ones.
#[wasm_bindgen(js_name = installResponsiveLayout)]
pub fn install_responsive_layout(
	desktop_selector: &str,
	mobile_selector: &str,
) -> Result<ResponsiveHandle, JsValue> {
	let layout = ResponsiveLayout::install(RegionSet::new(desktop_selector, mobile_selector))?;
	Ok(ResponsiveHandle {
		layout: Some(layout),
	})
}

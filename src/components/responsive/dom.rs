use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Window};

use super::toggle::{LayoutToggle, RegionSet, RegionToggle};

/// Regions of a live document, hidden by toggling a CSS class.
pub struct DomRegions {
	document: Document,
	hidden_class: String,
}

impl DomRegions {
	pub fn new(document: Document, hidden_class: impl Into<String>) -> Self {
		Self {
			document,
			hidden_class: hidden_class.into(),
		}
	}

	fn each(&self, selector: &str, apply: impl Fn(&Element) -> Result<(), JsValue>) {
		let list = match self.document.query_selector_all(selector) {
			Ok(list) => list,
			Err(err) => {
				warn!("bad region selector `{selector}`: {err:?}");
				return;
			}
		};
		for i in 0..list.length() {
			let Some(element) = list.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
				continue;
			};
			let _ = apply(&element);
		}
	}
}

impl RegionToggle for DomRegions {
	fn show(&mut self, selector: &str) {
		self.each(selector, |el| el.class_list().remove_1(&self.hidden_class));
	}

	fn hide(&mut self, selector: &str) {
		self.each(selector, |el| el.class_list().add_1(&self.hidden_class));
	}
}

fn inner_width(window: &Window) -> f64 {
	window
		.inner_width()
		.ok()
		.and_then(|w| w.as_f64())
		.unwrap_or(f64::NAN)
}

/// Keeps the page's regions in step with the viewport until dropped.
pub struct ResponsiveLayout {
	window: Window,
	on_resize: Closure<dyn FnMut()>,
}

impl ResponsiveLayout {
	/// Apply the current width right away, then again on every `resize`.
	pub fn install(regions: RegionSet) -> Result<Self, JsValue> {
		let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
		let document = window
			.document()
			.ok_or_else(|| JsValue::from_str("no document"))?;
		let mut page = DomRegions::new(document, regions.hidden_class.clone());
		let mut toggle = LayoutToggle::new();
		toggle.evaluate(inner_width(&window), &regions, &mut page);

		let resized = window.clone();
		let on_resize: Closure<dyn FnMut()> = Closure::new(move || {
			toggle.evaluate(inner_width(&resized), &regions, &mut page);
		});
		window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
		Ok(Self { window, on_resize })
	}
}

impl Drop for ResponsiveLayout {
	fn drop(&mut self) {
		let _ = self
			.window
			.remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
	}
}

use log::debug;
use serde::Deserialize;

use super::viewport::{Mode, classify};

/// Page regions that only make sense at one viewport size.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegionSet {
	/// Selectors shown at desktop widths and hidden below the breakpoint.
	pub desktop_only: Vec<String>,
	/// Selectors shown only below the breakpoint.
	pub mobile_only: Vec<String>,
	/// Class added to hide a region and removed to show it.
	pub hidden_class: String,
}

impl Default for RegionSet {
	fn default() -> Self {
		Self {
			desktop_only: vec![".desktop-only".into()],
			mobile_only: vec![".mobile-only".into()],
			hidden_class: "hidden".into(),
		}
	}
}

impl RegionSet {
	/// One selector per side, hidden with the default class.
	pub fn new(desktop_only: &str, mobile_only: &str) -> Self {
		Self {
			desktop_only: vec![desktop_only.into()],
			mobile_only: vec![mobile_only.into()],
			..Self::default()
		}
	}
}

/// Shows and hides every element matching a selector.
pub trait RegionToggle {
	fn show(&mut self, selector: &str);
	fn hide(&mut self, selector: &str);
}

/// Remembers the last applied mode so only real transitions touch the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutToggle {
	current: Option<Mode>,
}

impl LayoutToggle {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the mode that was applied, or `None` when nothing changed.
	pub fn evaluate(
		&mut self,
		width: f64,
		regions: &RegionSet,
		toggle: &mut impl RegionToggle,
	) -> Option<Mode> {
		let mode = classify(width);
		if self.current == Some(mode) {
			return None;
		}
		let (shown, hidden) = match mode {
			Mode::Desktop => (&regions.desktop_only, &regions.mobile_only),
			Mode::Mobile => (&regions.mobile_only, &regions.desktop_only),
		};
		for selector in shown {
			toggle.show(selector);
		}
		for selector in hidden {
			toggle.hide(selector);
		}
		debug!("layout switched to {mode:?} at width {width}");
		self.current = Some(mode);
		Some(mode)
	}
}

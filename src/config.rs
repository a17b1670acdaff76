//! Tuning constants for the relationship view.
//!
//! Everything has a default; hosts may override any subset through
//! [`SankeyConfig::from_json`].

use serde::Deserialize;

use crate::error::Result;

/// Space around the inner drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct Margin {
	/// Above; includes the collapser row.
	pub top: f64,
	/// Right.
	pub right: f64,
	/// Below.
	pub bottom: f64,
	/// Left.
	pub left: f64,
}

/// Opacity tiers for the highlight states.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Opacity {
	/// Nodes with nothing highlighted.
	pub node_default: f64,
	/// Nodes unrelated to the highlight.
	pub node_faded: f64,
	/// The highlighted node and its neighbors.
	pub node_highlight: f64,
	/// Links with nothing highlighted.
	pub link_default: f64,
	/// Links unrelated to the highlight.
	pub link_faded: f64,
	/// Links touching the highlight.
	pub link_highlight: f64,
}

impl Default for Opacity {
	fn default() -> Self {
		Self {
			node_default: 0.9,
			node_faded: 0.1,
			node_highlight: 0.8,
			link_default: 0.6,
			link_faded: 0.05,
			link_highlight: 0.9,
		}
	}
}

/// Rendering and interaction settings for one view.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SankeyConfig {
	/// Outer drawing width including margins.
	pub outer_width: f64,
	/// Outer drawing height including margins.
	pub outer_height: f64,
	/// Margin on every side of the drawing.
	pub outer_margin: f64,
	/// Bar width.
	pub node_width: f64,
	/// Vertical gap between nodes of a column.
	pub node_spacing: f64,
	/// Gap between links stacked on one side of a node.
	pub link_spacing: f64,
	/// Floor for bars with little flow.
	pub min_node_height: f64,
	/// Fraction of a link's thickness reserved for its arrowhead.
	pub arrowhead_scale: f64,
	/// Horizontal pull of link control points, 0 to 1.
	pub curvature: f64,
	/// Relaxation passes per layout.
	pub layout_iterations: usize,
	/// Length of position and opacity transitions.
	pub transition_ms: f64,
	/// Window in which a second click turns into a double click.
	pub debounce_ms: f64,
	/// Pointer travel (px, per axis) before a press becomes a drag.
	pub drag_tolerance: f64,
	/// Gap between a collapser and the top of the drawing.
	pub collapser_spacing: f64,
	/// Opacity tiers.
	pub opacity: Opacity,
	/// Type groups that take the first palette slots, in order.
	pub type_domain: Vec<String>,
	/// Node fill per palette slot.
	pub type_colors: Vec<String>,
	/// Fill for highlighted nodes per palette slot.
	pub type_highlight_colors: Vec<String>,
	/// Stroke for links away from the highlight.
	pub link_color: String,
	/// Stroke for links into the highlighted node.
	pub inflow_color: String,
	/// Stroke for links out of the highlighted node.
	pub outflow_color: String,
	/// Prefix the selected id is appended to for the details link.
	pub details_url_prefix: String,
}

impl Default for SankeyConfig {
	fn default() -> Self {
		Self {
			outer_width: 1200.0,
			outer_height: 600.0,
			outer_margin: 10.0,
			node_width: 36.0,
			node_spacing: 10.0,
			link_spacing: 4.0,
			min_node_height: 4.0,
			arrowhead_scale: 0.5,
			curvature: 0.45,
			layout_iterations: 32,
			transition_ms: 400.0,
			debounce_ms: 200.0,
			drag_tolerance: 1.0,
			collapser_spacing: 2.0,
			opacity: Opacity::default(),
			type_domain: ["Asset", "Expense", "Revenue", "Equity", "Liability"]
				.map(String::from)
				.to_vec(),
			type_colors: [
				"#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e", "#e6ab02", "#a6761d",
			]
			.map(String::from)
			.to_vec(),
			type_highlight_colors: [
				"#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494",
			]
			.map(String::from)
			.to_vec(),
			link_color: "#b3b3b3".into(),
			inflow_color: "#2E86D1".into(),
			outflow_color: "#D63028".into(),
			details_url_prefix: "/artificer-ui/index.html#details;uuid=".into(),
		}
	}
}

impl SankeyConfig {
	/// Parse a (possibly partial) JSON object over the defaults.
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	/// Collapser circles are as wide as a bar.
	pub fn collapser_radius(&self) -> f64 {
		self.node_width / 2.0
	}

	/// Margins leave room above the diagram for the row of collapsers.
	pub fn margin(&self) -> Margin {
		Margin {
			top: 2.0 * (self.collapser_radius() + self.outer_margin),
			right: self.outer_margin,
			bottom: self.outer_margin,
			left: self.outer_margin,
		}
	}

	/// Inner drawing extent the layout works in.
	pub fn size(&self) -> (f64, f64) {
		let m = self.margin();
		(
			self.outer_width - m.left - m.right,
			self.outer_height - m.top - m.bottom,
		)
	}

	/// Interaction lock after a structural change; some changes chain two transitions.
	pub fn cooldown_ms(&self) -> f64 {
		2.0 * self.transition_ms
	}
}

impl Default for Margin {
	fn default() -> Self {
		SankeyConfig::default().margin()
	}
}

use super::color::{darker, pick};
use super::model::{SankeyModel, SankeyNode, VisibleLink};
use super::types::CollapseState;
use crate::config::{Margin, SankeyConfig};

/// What is currently emphasized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Highlight {
	#[default]
	None,
	/// A selected or hovered node: its links light up, unconnected nodes fade.
	Node(usize),
	/// A hovered link (index into the model's visible links).
	Link(usize),
	/// A hovered collapser: the expanded node's descendants light up.
	Collapser(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
	Plain,
	Outflow,
	Inflow,
}

impl Marker {
	pub const ALL: [Marker; 3] = [Marker::Plain, Marker::Outflow, Marker::Inflow];

	pub fn id(self) -> &'static str {
		match self {
			Self::Plain => "arrowHead",
			Self::Outflow => "arrowHeadOutflow",
			Self::Inflow => "arrowHeadInflow",
		}
	}

	pub fn color(self, config: &SankeyConfig) -> &str {
		match self {
			Self::Plain => &config.link_color,
			Self::Outflow => &config.outflow_color,
			Self::Inflow => &config.inflow_color,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Label {
	pub text: String,
	pub x: f64,
	pub y: f64,
	pub anchor: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeShape {
	pub index: usize,
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
	pub fill: String,
	pub stroke: String,
	pub fill_opacity: f64,
	pub opacity: f64,
	pub label: Option<Label>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkShape {
	pub index: usize,
	pub path: String,
	pub stroke: String,
	pub stroke_width: f64,
	pub opacity: f64,
	pub marker: Marker,
	pub direction: i8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CollapserShape {
	pub index: usize,
	pub cx: f64,
	pub cy: f64,
	pub r: f64,
	pub fill: String,
	pub opacity: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	pub outer_width: f64,
	pub outer_height: f64,
	pub margin: Margin,
	pub transition_ms: f64,
	/// Thickest first so thin links stay on top.
	pub links: Vec<LinkShape>,
	pub nodes: Vec<NodeShape>,
	pub collapsers: Vec<CollapserShape>,
	pub markers: Vec<(Marker, String)>,
	pub tooltip: Option<String>,
}

/// Project the model's drawn subset into shapes. Reads only.
pub fn project(model: &SankeyModel, highlight: Highlight, config: &SankeyConfig) -> Scene {
	let mut links: Vec<LinkShape> = model
		.visible_links()
		.iter()
		.enumerate()
		.map(|(k, link)| link_shape(model, k, link, highlight, config))
		.collect();
	links.sort_by(|a, b| b.stroke_width.total_cmp(&a.stroke_width));

	let (width, _) = model.size();
	let nodes = model
		.nodes()
		.iter()
		.enumerate()
		.filter(|(_, n)| n.state == CollapseState::Collapsed)
		.map(|(i, node)| node_shape(model, i, node, highlight, width, config))
		.collect();

	let r = config.collapser_radius();
	let collapsers = model
		.nodes()
		.iter()
		.enumerate()
		.filter(|(_, n)| n.state == CollapseState::Expanded)
		.enumerate()
		.map(|(slot, (i, node))| {
			let hovered = highlight == Highlight::Collapser(i);
			CollapserShape {
				index: i,
				cx: r + slot as f64 * 2.0 * (r + config.collapser_spacing),
				cy: -r - config.outer_margin,
				r,
				fill: if hovered {
					pick(&config.type_highlight_colors, node.group).to_owned()
				} else {
					pick(&config.type_colors, node.group).to_owned()
				},
				opacity: if hovered {
					config.opacity.node_highlight
				} else {
					config.opacity.node_default
				},
			}
		})
		.collect();

	Scene {
		outer_width: config.outer_width,
		outer_height: config.outer_height,
		margin: config.margin(),
		transition_ms: config.transition_ms,
		links,
		nodes,
		collapsers,
		markers: Marker::ALL
			.iter()
			.map(|&m| (m, m.color(config).to_owned()))
			.collect(),
		tooltip: tooltip(model, highlight),
	}
}

fn link_shape(
	model: &SankeyModel,
	k: usize,
	link: &VisibleLink,
	highlight: Highlight,
	config: &SankeyConfig,
) -> LinkShape {
	let opacity = &config.opacity;
	let (stroke, marker, alpha) = match highlight {
		Highlight::Node(g) if link.source == g => {
			(&config.outflow_color, Marker::Outflow, opacity.link_default)
		}
		Highlight::Node(g) if link.target == g => {
			(&config.inflow_color, Marker::Inflow, opacity.link_default)
		}
		Highlight::Node(_) => (&config.link_color, Marker::Plain, opacity.link_faded),
		Highlight::Link(h) if h == k => {
			(&config.link_color, Marker::Plain, opacity.link_highlight)
		}
		_ => (&config.link_color, Marker::Plain, opacity.link_default),
	};
	LinkShape {
		index: k,
		path: link_path(model, link, config),
		stroke: stroke.clone(),
		stroke_width: link.thickness.max(1.0),
		opacity: alpha,
		marker,
		direction: link.direction,
	}
}

/// Cubic Bézier between the facing node edges, shortened so the arrowhead
/// lands on the target.
pub fn link_path(model: &SankeyModel, link: &VisibleLink, config: &SankeyConfig) -> String {
	let (source, target) = (model.node(link.source), model.node(link.target));
	let arrow = link.thickness.max(1.0) * config.arrowhead_scale;
	let (x0, x1) = if link.direction > 0 {
		(source.x + source.width, target.x - arrow)
	} else {
		(source.x, target.x + target.width + arrow)
	};
	let y0 = source.y + link.sy + link.thickness / 2.0;
	let y1 = target.y + link.ty + link.thickness / 2.0;
	let x2 = x0 + (x1 - x0) * config.curvature;
	let x3 = x0 + (x1 - x0) * (1.0 - config.curvature);
	format!("M{x0:.2},{y0:.2}C{x2:.2},{y0:.2} {x3:.2},{y1:.2} {x1:.2},{y1:.2}")
}

fn node_shape(
	model: &SankeyModel,
	i: usize,
	node: &SankeyNode,
	highlight: Highlight,
	width: f64,
	config: &SankeyConfig,
) -> NodeShape {
	let opacity = &config.opacity;
	let mut fill = pick(&config.type_colors, node.group).to_owned();
	let mut fill_opacity = opacity.node_default;
	let mut alpha = opacity.node_default;

	match highlight {
		Highlight::Node(g) if g == i => {
			fill = if node.net_flow > 0.0 {
				config.inflow_color.clone()
			} else {
				config.outflow_color.clone()
			};
			fill_opacity = opacity.link_default;
		}
		Highlight::Node(g) if !model.connected(i, g) => alpha = opacity.node_faded,
		Highlight::Collapser(c) if node.ancestors.contains(&c) => {
			fill = pick(&config.type_highlight_colors, model.node(c).group).to_owned();
			alpha = opacity.node_highlight;
		}
		_ => {}
	}

	let label = (node.value != 0.0).then(|| {
		let (x, anchor) = if node.x < width / 2.0 {
			(6.0 + node.width, "start")
		} else {
			(-6.0, "end")
		};
		Label {
			text: node.name.clone(),
			x,
			y: node.height / 2.0,
			anchor,
		}
	});

	NodeShape {
		index: i,
		x: node.x,
		y: node.y,
		width: node.width,
		height: node.height,
		stroke: darker(&fill, 0.1),
		fill,
		fill_opacity,
		opacity: alpha,
		label,
	}
}

fn tooltip(model: &SankeyModel, highlight: Highlight) -> Option<String> {
	match highlight {
		Highlight::Link(k) => {
			let link = model.visible_links().get(k)?;
			let (source, target) = (&model.node(link.source).name, &model.node(link.target).name);
			Some(if link.direction > 0 {
				format!("{source} → {target}\nrelationship: {}", link.label())
			} else {
				format!("{target} ← {source}\nrelationship: {}", link.label())
			})
		}
		Highlight::Collapser(c) => Some(format!("{}\n(Double click to collapse)", model.node(c).name)),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::sankey::types::{GraphData, LinkRecord, NodeRecord};

	fn model() -> SankeyModel {
		let data = GraphData {
			nodes: vec![
				NodeRecord::new("Binding", "b", None, "SampleBinding"),
				NodeRecord::new("PortType", "t", None, "SamplePortType"),
				NodeRecord::new("Operation", "o", None, "find"),
				NodeRecord::new("Message", "m", None, "findRequest"),
			],
			links: vec![
				LinkRecord::new("b", "t", 1.0, "portType"),
				LinkRecord::new("t", "o", 1.0, "operation"),
				LinkRecord::new("b", "o", 1.0, "bindingOperation"),
			],
		};
		let mut m = SankeyModel::build(&data, &SankeyConfig::default()).unwrap();
		m.layout(32);
		m
	}

	fn node<'a>(scene: &'a Scene, index: usize) -> &'a NodeShape {
		scene.nodes.iter().find(|n| n.index == index).unwrap()
	}

	#[test]
	fn plain_scene_uses_default_tiers() {
		let config = SankeyConfig::default();
		let scene = project(&model(), Highlight::None, &config);
		assert_eq!(scene.nodes.len(), 4);
		assert_eq!(scene.links.len(), 3);
		assert!(scene.links.iter().all(|l| l.opacity == 0.6 && l.marker == Marker::Plain));
		assert!(scene.nodes.iter().all(|n| n.opacity == 0.9 && n.fill_opacity == 0.9));
		assert_eq!(scene.tooltip, None);
		assert_eq!(scene.markers.len(), 3);
	}

	#[test]
	fn links_are_drawn_thickest_first() {
		let scene = project(&model(), Highlight::None, &SankeyConfig::default());
		let widths: Vec<f64> = scene.links.iter().map(|l| l.stroke_width).collect();
		let mut sorted = widths.clone();
		sorted.sort_by(|a, b| b.total_cmp(a));
		assert_eq!(widths, sorted);
	}

	#[test]
	fn node_highlight_colors_flow_and_fades_the_rest() {
		let config = SankeyConfig::default();
		let m = model();
		let t = m.index_of("t").unwrap();
		let scene = project(&m, Highlight::Node(t), &config);

		for link in &scene.links {
			let vl = &m.visible_links()[link.index];
			if vl.source == t {
				assert_eq!((link.marker, link.stroke.as_str()), (Marker::Outflow, "#D63028"));
			} else if vl.target == t {
				assert_eq!((link.marker, link.stroke.as_str()), (Marker::Inflow, "#2E86D1"));
			} else {
				assert_eq!(link.opacity, 0.05);
			}
		}
		// Net flow of `t` is zero: outflow color.
		assert_eq!(node(&scene, t).fill, "#D63028");
		assert_eq!(node(&scene, t).fill_opacity, 0.6);
		assert_eq!(node(&scene, m.index_of("m").unwrap()).opacity, 0.1);
		assert_eq!(node(&scene, m.index_of("o").unwrap()).opacity, 0.9);
	}

	#[test]
	fn net_inflow_uses_inflow_color() {
		let m = model();
		let o = m.index_of("o").unwrap();
		let scene = project(&m, Highlight::Node(o), &SankeyConfig::default());
		assert_eq!(node(&scene, o).fill, "#2E86D1");
	}

	#[test]
	fn colors_cycle_past_the_palette() {
		let config = SankeyConfig::default();
		let m = model();
		let scene = project(&m, Highlight::None, &config);
		// Seeded domain has 5 groups, so these land on slots 5, 6, 7 and 8.
		assert_eq!(node(&scene, 0).fill, "#e6ab02");
		assert_eq!(node(&scene, 1).fill, "#a6761d");
		assert_eq!(node(&scene, 2).fill, "#1b9e77");
		assert_eq!(node(&scene, 3).fill, "#d95f02");
		assert_eq!(node(&scene, 2).stroke, darker("#1b9e77", 0.1));
	}

	#[test]
	fn link_tooltip_reads_in_flow_direction() {
		let mut m = model();
		let b = m.index_of("b").unwrap();
		let k = m
			.visible_links()
			.iter()
			.position(|l| l.label() == "portType")
			.unwrap();
		let text = tooltip(&m, Highlight::Link(k)).unwrap();
		assert_eq!(text, "SampleBinding → SamplePortType\nrelationship: portType");

		m.move_node(b, 1.0e6, 0.0).unwrap();
		let text = tooltip(&m, Highlight::Link(k)).unwrap();
		assert_eq!(text, "SamplePortType ← SampleBinding\nrelationship: portType");
	}

	#[test]
	fn labels_face_into_the_diagram() {
		let m = model();
		let scene = project(&m, Highlight::None, &SankeyConfig::default());
		let left = node(&scene, m.index_of("b").unwrap()).label.clone().unwrap();
		assert_eq!((left.x, left.anchor), (42.0, "start"));
		let right = node(&scene, m.index_of("o").unwrap()).label.clone().unwrap();
		assert_eq!((right.x, right.anchor), (-6.0, "end"));
		assert!(node(&scene, m.index_of("m").unwrap()).label.is_none());
	}

	#[test]
	fn collapsers_line_up_above_the_diagram() {
		let data = GraphData {
			nodes: vec![
				NodeRecord::new("WsdlDocument", "w", None, "sample.wsdl"),
				NodeRecord::new("Part", "p", Some("w"), "parameters"),
				NodeRecord::new("XsdDocument", "x", None, "sample.xsd"),
				NodeRecord::new("ElementDeclaration", "e", Some("x"), "extInput"),
			],
			links: vec![LinkRecord::new("p", "e", 1.0, "element")],
		};
		let config = SankeyConfig::default();
		let mut m = SankeyModel::build(&data, &config).unwrap();
		m.expand("w").unwrap();
		m.expand("x").unwrap();
		m.layout(8);

		let scene = project(&m, Highlight::Collapser(2), &config);
		let centers: Vec<(f64, f64)> = scene.collapsers.iter().map(|c| (c.cx, c.cy)).collect();
		assert_eq!(centers, vec![(18.0, -28.0), (58.0, -28.0)]);
		assert_eq!(scene.collapsers[1].opacity, 0.8);
		assert_eq!(scene.tooltip.as_deref(), Some("sample.xsd\n(Double click to collapse)"));
		let child = node(&scene, 3);
		assert_eq!(child.opacity, 0.8);
		assert_eq!(child.fill, pick(&config.type_highlight_colors, m.node(2).group));
		assert_eq!(node(&scene, 1).opacity, 0.9);
	}

	#[test]
	fn path_ends_short_of_the_target_by_the_arrowhead() {
		let m = model();
		let config = SankeyConfig::default();
		let link = &m.visible_links()[0];
		let path = link_path(&m, link, &config);
		let target = m.node(link.target);
		let end_x = target.x - link.thickness.max(1.0) * 0.5;
		assert!(path.starts_with(&format!("M{:.2},", m.node(link.source).x + 36.0)));
		assert!(path.contains(&format!(" {end_x:.2},")));
	}
}

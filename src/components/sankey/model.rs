//! Collapsible node forest with aggregated flow links.

use std::collections::HashMap;

use log::debug;

use super::color::{TypePalette, type_group};
use super::layout::{FlowLayout, LayoutEdge, LayoutGraph, LayoutNode, LayoutStrategy, link_offsets};
use super::types::{CollapseState, GraphData};
use crate::config::SankeyConfig;
use crate::error::{GraphError, Result, ValidationError, ValidationIssue};

/// A node with its hierarchy links, collapse state and placement.
#[derive(Clone, Debug)]
pub struct SankeyNode {
	/// Record id.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Artifact type.
	pub kind: String,
	/// Palette slot of the leading type token.
	pub group: usize,
	/// Containing node.
	pub parent: Option<usize>,
	/// Directly contained nodes.
	pub children: Vec<usize>,
	/// Nearest first.
	pub ancestors: Vec<usize>,
	/// Whether the node is drawn, hidden or shown through its children.
	pub state: CollapseState,
	/// Left edge in drawing coordinates.
	pub x: f64,
	/// Top edge in drawing coordinates.
	pub y: f64,
	/// Bar width.
	pub width: f64,
	/// Bar height, proportional to `value`.
	pub height: f64,
	/// Larger of visible inflow and outflow.
	pub value: f64,
	/// Incoming minus outgoing over visible links.
	pub net_flow: f64,
	/// Layer assigned by the last layout.
	pub column: usize,
}

/// An input link resolved to node indices.
#[derive(Clone, Debug, PartialEq)]
pub struct SankeyLink {
	/// Source node.
	pub source: usize,
	/// Target node.
	pub target: usize,
	/// Flow weight.
	pub value: f64,
	/// Relationship name.
	pub label: String,
}

/// One or more links drawn between the same pair of visible nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleLink {
	/// Drawn source node.
	pub source: usize,
	/// Drawn target node.
	pub target: usize,
	/// Sum of the member links.
	pub value: f64,
	/// Distinct member labels, first seen first.
	pub labels: Vec<String>,
	/// Indices into [`SankeyModel::links`].
	pub members: Vec<usize>,
	/// `1` when the target sits at or right of the source, `-1` otherwise.
	pub direction: i8,
	/// Stroke width in pixels.
	pub thickness: f64,
	/// Offset from the top of the source node.
	pub sy: f64,
	/// Offset from the top of the target node.
	pub ty: f64,
}

impl VisibleLink {
	/// Labels joined for display.
	pub fn label(&self) -> String {
		self.labels.join(", ")
	}

	/// Whether either end is `node`.
	pub fn touches(&self, node: usize) -> bool {
		self.source == node || self.target == node
	}
}

/// Anything that can name a node: its string id or its dense index.
pub trait NodeKey {
	/// Index of the node in `model`, if it exists.
	fn resolve(&self, model: &SankeyModel) -> Option<usize>;
	/// How the key reads in error messages.
	fn describe(&self) -> String;
}

impl NodeKey for &str {
	fn resolve(&self, model: &SankeyModel) -> Option<usize> {
		model.index.get(*self).copied()
	}

	fn describe(&self) -> String {
		(*self).to_owned()
	}
}

impl NodeKey for usize {
	fn resolve(&self, model: &SankeyModel) -> Option<usize> {
		(*self < model.nodes.len()).then_some(*self)
	}

	fn describe(&self) -> String {
		format!("#{self}")
	}
}

/// Validated node forest plus the links currently drawn between its visible nodes.
pub struct SankeyModel {
	nodes: Vec<SankeyNode>,
	links: Vec<SankeyLink>,
	index: HashMap<String, usize>,
	visible_links: Vec<VisibleLink>,
	width: f64,
	height: f64,
	ky: f64,
	link_spacing: f64,
	strategy: Box<dyn LayoutStrategy>,
}

impl SankeyModel {
	/// Validate the records and construct the model. Nothing is built unless
	/// every record checks out.
	pub fn build(data: &GraphData, config: &SankeyConfig) -> Result<Self> {
		let index = validate(data)?;

		let mut palette = TypePalette::new(&config.type_domain);
		let mut nodes: Vec<SankeyNode> = data
			.nodes
			.iter()
			.map(|record| {
				let parent = record.parent.as_ref().map(|p| index[p]);
				SankeyNode {
					id: record.id.clone(),
					name: record.name.clone(),
					kind: record.kind.clone(),
					group: palette.slot(type_group(&record.kind)),
					parent,
					children: Vec::new(),
					ancestors: Vec::new(),
					state: if parent.is_some() {
						CollapseState::Contained
					} else {
						CollapseState::Collapsed
					},
					x: 0.0,
					y: 0.0,
					width: config.node_width,
					height: config.min_node_height,
					value: 0.0,
					net_flow: 0.0,
					column: 0,
				}
			})
			.collect();

		for i in 0..nodes.len() {
			if let Some(p) = nodes[i].parent {
				nodes[p].children.push(i);
			}
			let mut cursor = nodes[i].parent;
			while let Some(a) = cursor {
				nodes[i].ancestors.push(a);
				cursor = nodes[a].parent;
			}
		}

		let links = data
			.links
			.iter()
			.map(|record| SankeyLink {
				source: index[&record.source],
				target: index[&record.target],
				value: record.value,
				label: record.label.clone(),
			})
			.collect();

		let (width, height) = config.size();
		let mut model = Self {
			nodes,
			links,
			index,
			visible_links: Vec::new(),
			width,
			height,
			ky: 0.0,
			link_spacing: config.link_spacing,
			strategy: Box::new(FlowLayout {
				node_spacing: config.node_spacing,
				min_node_height: config.min_node_height,
			}),
		};
		model.refresh_visible_links();
		debug!(
			"built relationship model: {} nodes, {} links, {} type groups",
			model.nodes.len(),
			model.links.len(),
			palette.len()
		);
		Ok(model)
	}

	/// Replace the default [`FlowLayout`].
	pub fn with_strategy(mut self, strategy: Box<dyn LayoutStrategy>) -> Self {
		self.strategy = strategy;
		self
	}

	/// Drawing extent as `(width, height)`.
	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	/// All nodes in input order.
	pub fn nodes(&self) -> &[SankeyNode] {
		&self.nodes
	}

	/// Node by index; panics when out of range.
	pub fn node(&self, idx: usize) -> &SankeyNode {
		&self.nodes[idx]
	}

	/// All input links.
	pub fn links(&self) -> &[SankeyLink] {
		&self.links
	}

	/// Index for a record id.
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	fn require(&self, key: impl NodeKey) -> Result<usize> {
		key.resolve(self)
			.ok_or_else(|| GraphError::NodeNotFound(key.describe()))
	}

	/// Drawn nodes: every collapsed node, in input order.
	pub fn visible_nodes(&self) -> impl Iterator<Item = &SankeyNode> + '_ {
		self.nodes
			.iter()
			.filter(|n| n.state == CollapseState::Collapsed)
	}

	/// Nodes shown as collapser controls.
	pub fn expanded_nodes(&self) -> impl Iterator<Item = &SankeyNode> + '_ {
		self.nodes
			.iter()
			.filter(|n| n.state == CollapseState::Expanded)
	}

	/// Links between drawn nodes, aggregated per ordered pair.
	pub fn visible_links(&self) -> &[VisibleLink] {
		&self.visible_links
	}

	/// Whether a visible link joins the two nodes, in either direction.
	pub fn connected(&self, a: impl NodeKey, b: impl NodeKey) -> bool {
		let (Some(a), Some(b)) = (a.resolve(self), b.resolve(self)) else {
			return false;
		};
		self.visible_links
			.iter()
			.any(|l| (l.source == a && l.target == b) || (l.source == b && l.target == a))
	}

	/// The drawn node standing in for `key`: itself when collapsed, its nearest
	/// collapsed ancestor when contained, nothing when expanded.
	pub fn representative(&self, key: impl NodeKey) -> Result<Option<usize>> {
		let idx = self.require(key)?;
		Ok(self.representative_of(idx))
	}

	fn representative_of(&self, idx: usize) -> Option<usize> {
		let node = &self.nodes[idx];
		match node.state {
			CollapseState::Collapsed => Some(idx),
			CollapseState::Expanded => None,
			CollapseState::Contained => node
				.ancestors
				.iter()
				.copied()
				.find(|&a| self.nodes[a].state == CollapseState::Collapsed),
		}
	}

	/// Show the children of a collapsed node. `Ok(false)` when there is nothing to do.
	pub fn expand(&mut self, key: impl NodeKey) -> Result<bool> {
		let idx = self.require(key)?;
		let node = &self.nodes[idx];
		if node.children.is_empty() || node.state != CollapseState::Collapsed {
			return Ok(false);
		}

		let (x, y) = (node.x, node.y);
		self.nodes[idx].state = CollapseState::Expanded;
		for child in self.nodes[idx].children.clone() {
			let node = &mut self.nodes[child];
			node.state = CollapseState::Collapsed;
			node.x = x;
			node.y = y;
			self.contain_descendants(child);
		}
		self.refresh_visible_links();
		debug!("expanded `{}`", self.nodes[idx].id);
		Ok(true)
	}

	/// Fold an expanded node back into one bar. `Ok(false)` when it is not expanded.
	pub fn collapse(&mut self, key: impl NodeKey) -> Result<bool> {
		let idx = self.require(key)?;
		if self.nodes[idx].state != CollapseState::Expanded {
			return Ok(false);
		}
		self.nodes[idx].state = CollapseState::Collapsed;
		self.contain_descendants(idx);
		self.refresh_visible_links();
		debug!("collapsed `{}`", self.nodes[idx].id);
		Ok(true)
	}

	/// Expand a collapsed node or collapse an expanded one.
	pub fn toggle(&mut self, key: impl NodeKey) -> Result<bool> {
		let idx = self.require(key)?;
		match self.nodes[idx].state {
			CollapseState::Collapsed => self.expand(idx),
			CollapseState::Expanded => self.collapse(idx),
			CollapseState::Contained => Ok(false),
		}
	}

	fn contain_descendants(&mut self, idx: usize) {
		let mut stack = self.nodes[idx].children.clone();
		while let Some(child) = stack.pop() {
			self.nodes[child].state = CollapseState::Contained;
			stack.extend_from_slice(&self.nodes[child].children);
		}
	}

	fn refresh_visible_links(&mut self) {
		let mut slots: HashMap<(usize, usize), usize> = HashMap::new();
		let mut visible: Vec<VisibleLink> = Vec::new();

		for (i, link) in self.links.iter().enumerate() {
			let (Some(source), Some(target)) = (
				self.representative_of(link.source),
				self.representative_of(link.target),
			) else {
				continue;
			};
			if source == target {
				continue;
			}
			let slot = *slots.entry((source, target)).or_insert_with(|| {
				visible.push(VisibleLink {
					source,
					target,
					value: 0.0,
					labels: Vec::new(),
					members: Vec::new(),
					direction: 1,
					thickness: 0.0,
					sy: 0.0,
					ty: 0.0,
				});
				visible.len() - 1
			});
			let entry = &mut visible[slot];
			entry.value += link.value;
			entry.members.push(i);
			if !entry.labels.contains(&link.label) {
				entry.labels.push(link.label.clone());
			}
		}

		for node in &mut self.nodes {
			node.net_flow = 0.0;
		}
		for link in &visible {
			self.nodes[link.target].net_flow += link.value;
			self.nodes[link.source].net_flow -= link.value;
		}
		self.visible_links = visible;
		self.relayout();
	}

	fn layout_graph(&self) -> (Vec<usize>, LayoutGraph) {
		let drawn: Vec<usize> = (0..self.nodes.len())
			.filter(|&i| self.nodes[i].state == CollapseState::Collapsed)
			.collect();
		let mut slot = vec![usize::MAX; self.nodes.len()];
		for (k, &i) in drawn.iter().enumerate() {
			slot[i] = k;
		}

		let graph = LayoutGraph {
			width: self.width,
			height: self.height,
			nodes: drawn
				.iter()
				.map(|&i| {
					let n = &self.nodes[i];
					LayoutNode {
						value: n.value,
						width: n.width,
						height: n.height,
						x: n.x,
						y: n.y,
						column: n.column,
						lanes: 0,
					}
				})
				.collect(),
			edges: self
				.visible_links
				.iter()
				.map(|l| LayoutEdge {
					source: slot[l.source],
					target: slot[l.target],
					value: l.value,
				})
				.collect(),
			ky: self.ky,
			link_spacing: self.link_spacing,
		};
		(drawn, graph)
	}

	/// Position the drawn nodes with the layout strategy, then route links.
	pub fn layout(&mut self, iterations: usize) {
		let (drawn, mut graph) = self.layout_graph();
		self.strategy.arrange(&mut graph, iterations);
		for (k, &i) in drawn.iter().enumerate() {
			let placed = &graph.nodes[k];
			let node = &mut self.nodes[i];
			node.x = placed.x;
			node.y = placed.y;
			node.height = placed.height;
			node.value = placed.value;
			node.column = placed.column;
		}
		self.ky = graph.ky;
		self.route_links(&graph);
	}

	/// Recompute link offsets and direction from the current node positions.
	pub fn relayout(&mut self) {
		let (_, graph) = self.layout_graph();
		self.route_links(&graph);
	}

	fn route_links(&mut self, graph: &LayoutGraph) {
		let offsets = link_offsets(graph);
		for (link, (sy, ty, thickness)) in self.visible_links.iter_mut().zip(offsets) {
			link.sy = sy;
			link.ty = ty;
			link.thickness = thickness;
			link.direction = if self.nodes[link.target].x >= self.nodes[link.source].x {
				1
			} else {
				-1
			};
		}
	}

	/// Move a node, clamped so it stays fully inside the drawing extent.
	pub fn move_node(&mut self, key: impl NodeKey, x: f64, y: f64) -> Result<(f64, f64)> {
		let idx = self.require(key)?;
		let node = &mut self.nodes[idx];
		node.x = x.clamp(0.0, (self.width - node.width).max(0.0));
		node.y = y.clamp(0.0, (self.height - node.height).max(0.0));
		let placed = (node.x, node.y);
		self.relayout();
		Ok(placed)
	}
}

fn validate(data: &GraphData) -> Result<HashMap<String, usize>, ValidationError> {
	let mut issues = Vec::new();
	let mut index = HashMap::with_capacity(data.nodes.len());
	for (i, node) in data.nodes.iter().enumerate() {
		if index.insert(node.id.clone(), i).is_some() {
			issues.push(ValidationIssue::DuplicateNode(node.id.clone()));
		}
	}

	let parent_of = |i: usize| -> Option<usize> {
		data.nodes[i]
			.parent
			.as_ref()
			.and_then(|p| index.get(p).copied())
	};
	for (i, node) in data.nodes.iter().enumerate() {
		if let Some(parent) = &node.parent {
			if !index.contains_key(parent) {
				issues.push(ValidationIssue::UnknownParent {
					node: node.id.clone(),
					parent: parent.clone(),
				});
				continue;
			}
		}
		let mut cursor = parent_of(i);
		for _ in 0..data.nodes.len() {
			match cursor {
				Some(a) if a == i => {
					issues.push(ValidationIssue::ParentCycle(node.id.clone()));
					break;
				}
				Some(a) => cursor = parent_of(a),
				None => break,
			}
		}
	}

	for (i, link) in data.links.iter().enumerate() {
		for id in [&link.source, &link.target] {
			if !index.contains_key(id) {
				issues.push(ValidationIssue::UnknownEndpoint {
					link: i,
					id: id.clone(),
				});
			}
		}
		if link.source == link.target {
			issues.push(ValidationIssue::SelfLoop {
				link: i,
				id: link.source.clone(),
			});
		}
		if !link.value.is_finite() || link.value < 0.0 {
			issues.push(ValidationIssue::InvalidValue {
				link: i,
				value: link.value,
			});
		}
	}

	if issues.is_empty() {
		Ok(index)
	} else {
		Err(ValidationError { issues })
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use pretty_assertions::assert_eq;
	use proptest::prelude::*;

	use super::*;
	use crate::components::sankey::types::{LinkRecord, NodeRecord};

	fn model(nodes: &[(&str, Option<&str>)], links: &[(&str, &str)]) -> SankeyModel {
		let data = GraphData {
			nodes: nodes
				.iter()
				.map(|&(id, parent)| NodeRecord::new("Part", id, parent, id))
				.collect(),
			links: links
				.iter()
				.map(|&(s, t)| LinkRecord::new(s, t, 1.0, "ref"))
				.collect(),
		};
		SankeyModel::build(&data, &SankeyConfig::default()).unwrap()
	}

	fn visible(model: &SankeyModel) -> BTreeSet<String> {
		model.visible_nodes().map(|n| n.id.clone()).collect()
	}

	fn ids(list: &[&str]) -> BTreeSet<String> {
		list.iter().map(|s| s.to_string()).collect()
	}

	fn state(model: &SankeyModel, id: &str) -> CollapseState {
		model.node(model.index_of(id).unwrap()).state
	}

	#[test]
	fn build_shows_only_collapsed_roots() {
		let m = model(
			&[("A", None), ("B", Some("A")), ("C", Some("B")), ("D", None)],
			&[("C", "D")],
		);
		assert_eq!(visible(&m), ids(&["A", "D"]));
		assert!(m.visible_nodes().all(|n| n.state == CollapseState::Collapsed));
		assert_eq!(state(&m, "B"), CollapseState::Contained);
		assert_eq!(state(&m, "C"), CollapseState::Contained);
	}

	#[test]
	fn expanding_a_root_reveals_its_children() {
		let mut m = model(&[("A", None), ("B", Some("A")), ("C", Some("A"))], &[]);
		assert_eq!(visible(&m), ids(&["A"]));

		assert!(m.expand("A").unwrap());
		assert_eq!(visible(&m), ids(&["B", "C"]));
		assert_eq!(state(&m, "A"), CollapseState::Expanded);
		assert_eq!(state(&m, "B"), CollapseState::Collapsed);
		assert_eq!(state(&m, "C"), CollapseState::Collapsed);
		assert_eq!(
			m.expanded_nodes().map(|n| n.id.as_str()).collect::<Vec<_>>(),
			vec!["A"]
		);
	}

	#[test]
	fn expand_keeps_grandchildren_contained() {
		let mut m = model(&[("A", None), ("B", Some("A")), ("C", Some("B"))], &[]);
		m.expand("A").unwrap();
		assert_eq!(state(&m, "B"), CollapseState::Collapsed);
		assert_eq!(state(&m, "C"), CollapseState::Contained);
	}

	#[test]
	fn expand_then_collapse_restores_visible_set() {
		let mut m = model(
			&[("A", None), ("B", Some("A")), ("C", Some("B")), ("D", None)],
			&[("C", "D")],
		);
		let before = visible(&m);
		let links_before = m.visible_links().to_vec();
		m.expand("A").unwrap();
		m.expand("B").unwrap();
		assert_eq!(visible(&m), ids(&["C", "D"]));
		assert!(m.collapse("A").unwrap());
		assert_eq!(visible(&m), before);
		assert_eq!(state(&m, "B"), CollapseState::Contained);
		assert_eq!(m.visible_links().len(), links_before.len());
	}

	#[test]
	fn leaf_and_repeated_operations_are_noops() {
		let mut m = model(&[("A", None), ("B", Some("A"))], &[]);
		assert!(!m.collapse("A").unwrap());
		assert!(!m.expand("B").unwrap(), "contained node cannot expand");
		m.expand("A").unwrap();
		assert!(!m.expand("A").unwrap());
		assert!(!m.expand("B").unwrap(), "leaf has nothing to expand");
		assert!(!m.collapse("B").unwrap());
	}

	#[test]
	fn unknown_ids_are_reported_without_mutation() {
		let mut m = model(&[("A", None), ("B", Some("A"))], &[]);
		let err = m.expand("nope").unwrap_err();
		assert!(matches!(err, GraphError::NodeNotFound(ref id) if id == "nope"));
		assert!(m.collapse(99usize).is_err());
		assert!(m.move_node("nope", 1.0, 1.0).is_err());
		assert_eq!(visible(&m), ids(&["A"]));
	}

	#[test]
	fn links_redirect_to_collapsed_ancestors_and_aggregate() {
		let mut m = model(
			&[
				("W", None),
				("P", Some("W")),
				("M", Some("W")),
				("X", None),
				("E", Some("X")),
			],
			&[("P", "E"), ("M", "E"), ("W", "X")],
		);
		let links = m.visible_links();
		assert_eq!(links.len(), 1);
		assert_eq!(links[0].value, 3.0);
		assert_eq!(links[0].members, vec![0, 1, 2]);
		assert_eq!(links[0].label(), "ref");
		assert!(m.connected("W", "X"));
		assert!(m.connected("X", "W"));

		m.expand("W").unwrap();
		let pairs: Vec<(String, String)> = m
			.visible_links()
			.iter()
			.map(|l| (m.node(l.source).id.clone(), m.node(l.target).id.clone()))
			.collect();
		assert_eq!(
			pairs,
			vec![
				("P".to_string(), "X".to_string()),
				("M".to_string(), "X".to_string())
			]
		);
		assert!(m.connected("P", "X"));
		assert!(!m.connected("W", "X"), "expanded endpoint has no drawn link");
	}

	#[test]
	fn links_inside_one_collapsed_subtree_are_hidden() {
		let mut m = model(&[("A", None), ("B", Some("A")), ("C", Some("A"))], &[("B", "C")]);
		assert!(m.visible_links().is_empty());
		m.expand("A").unwrap();
		assert_eq!(m.visible_links().len(), 1);
	}

	#[test]
	fn net_flow_is_incoming_minus_outgoing() {
		let m = model(
			&[("A", None), ("B", None), ("C", None)],
			&[("A", "B"), ("C", "B"), ("B", "A")],
		);
		let flow = |id: &str| m.node(m.index_of(id).unwrap()).net_flow;
		assert_eq!(flow("B"), 1.0);
		assert_eq!(flow("A"), 0.0);
		assert_eq!(flow("C"), -1.0);
	}

	#[test]
	fn validation_collects_every_issue() {
		let data = GraphData {
			nodes: vec![
				NodeRecord::new("Part", "A", None, "a"),
				NodeRecord::new("Part", "A", None, "dup"),
				NodeRecord::new("Part", "B", Some("missing"), "b"),
				NodeRecord::new("Part", "C", Some("D"), "c"),
				NodeRecord::new("Part", "D", Some("C"), "d"),
			],
			links: vec![
				LinkRecord::new("A", "ghost", 1.0, "x"),
				LinkRecord::new("A", "A", 1.0, "self"),
				LinkRecord::new("A", "B", f64::NAN, "nan"),
			],
		};
		let Err(GraphError::Validation(err)) = SankeyModel::build(&data, &SankeyConfig::default())
		else {
			panic!("expected validation error");
		};
		assert_eq!(err.unresolved_ids(), vec!["ghost"]);
		assert!(err.issues.contains(&ValidationIssue::DuplicateNode("A".into())));
		assert!(err.issues.contains(&ValidationIssue::UnknownParent {
			node: "B".into(),
			parent: "missing".into()
		}));
		assert!(err.issues.contains(&ValidationIssue::ParentCycle("C".into())));
		assert!(err.issues.contains(&ValidationIssue::ParentCycle("D".into())));
		assert!(err.issues.contains(&ValidationIssue::SelfLoop {
			link: 1,
			id: "A".into()
		}));
		assert!(
			err.issues
				.iter()
				.any(|i| matches!(i, ValidationIssue::InvalidValue { link: 2, .. }))
		);
	}

	#[test]
	fn type_groups_follow_seeded_domain() {
		let data = GraphData {
			nodes: vec![
				NodeRecord::new("Revenue stream", "r", None, "r"),
				NodeRecord::new("Part", "p", None, "p"),
				NodeRecord::new("Message", "m", None, "m"),
				NodeRecord::new("Part extra", "q", None, "q"),
			],
			links: vec![],
		};
		let m = SankeyModel::build(&data, &SankeyConfig::default()).unwrap();
		let groups: Vec<usize> = m.nodes().iter().map(|n| n.group).collect();
		assert_eq!(groups, vec![2, 5, 6, 5]);
	}

	#[test]
	fn layout_places_drawn_nodes_and_routes_links() {
		let mut m = model(&[("A", None), ("B", None), ("C", None)], &[("A", "B"), ("B", "C")]);
		m.layout(32);
		let (w, h) = m.size();
		for node in m.visible_nodes() {
			assert!(node.x >= 0.0 && node.x + node.width <= w + 1e-9);
			assert!(node.y >= 0.0 && node.y + node.height <= h + 1e-9);
		}
		let a = m.node(m.index_of("A").unwrap());
		let c = m.node(m.index_of("C").unwrap());
		assert!(a.x < c.x);
		assert!(m.visible_links().iter().all(|l| l.direction == 1 && l.thickness > 0.0));
	}

	#[test]
	fn move_node_clamps_to_extent() {
		let mut m = model(&[("A", None), ("B", None)], &[("A", "B")]);
		m.layout(4);
		let (w, h) = m.size();
		let height = m.node(0).height;
		assert_eq!(m.move_node("A", -50.0, 1.0e6).unwrap(), (0.0, h - height));
		assert_eq!(m.move_node("B", 1.0e6, -3.0).unwrap(), (w - 36.0, 0.0));
		assert_eq!(m.move_node("B", 0.0, 0.0).unwrap(), (0.0, 0.0));
		assert_eq!(m.visible_links()[0].direction, 1);
		m.move_node("A", 500.0, 0.0).unwrap();
		assert_eq!(m.visible_links()[0].direction, -1);
	}

	#[test]
	fn configured_link_spacing_separates_outgoing_links() {
		let data = GraphData {
			nodes: ["A", "B", "C"].map(|id| NodeRecord::new("Part", id, None, id)).to_vec(),
			links: vec![LinkRecord::new("A", "B", 1.0, "x"), LinkRecord::new("A", "C", 1.0, "y")],
		};
		let offsets = |link_spacing: f64| {
			let config = SankeyConfig {
				link_spacing,
				..SankeyConfig::default()
			};
			let mut m = SankeyModel::build(&data, &config).unwrap();
			m.layout(32);
			let mut starts: Vec<f64> = m.visible_links().iter().map(|l| l.sy).collect();
			starts.sort_by(f64::total_cmp);
			(starts, m.visible_links()[0].thickness)
		};
		let (flush, thickness) = offsets(0.0);
		assert_eq!(flush, vec![0.0, thickness]);
		let (spaced, thickness) = offsets(50.0);
		assert_eq!(spaced, vec![0.0, thickness + 50.0]);
	}

	/// Places drawn nodes on a diagonal, last one leftmost.
	struct Diagonal;

	impl LayoutStrategy for Diagonal {
		fn arrange(&self, graph: &mut LayoutGraph, _iterations: usize) {
			let n = graph.nodes.len();
			for (k, node) in graph.nodes.iter_mut().enumerate() {
				node.x = (n - 1 - k) as f64 * 100.0;
				node.y = k as f64 * 50.0;
				node.height = 20.0;
				node.column = k;
			}
			graph.ky = 3.0;
		}
	}

	#[test]
	fn custom_strategy_positions_are_written_back() {
		let mut m = model(&[("A", None), ("B", None), ("C", Some("B"))], &[("A", "B"), ("A", "C")])
			.with_strategy(Box::new(Diagonal));
		m.layout(32);
		let placed: Vec<_> = m.visible_nodes().map(|n| (n.id.as_str(), n.x, n.y, n.height)).collect();
		assert_eq!(placed, vec![("A", 100.0, 0.0, 20.0), ("B", 0.0, 50.0, 20.0)]);

		// Both links fold into A -> B, routed from the strategy's scale and positions.
		let link = &m.visible_links()[0];
		assert_eq!(m.visible_links().len(), 1);
		assert_eq!(link.thickness, 6.0);
		assert_eq!(link.direction, -1);

		m.expand("B").unwrap();
		m.layout(32);
		let c = m.node(m.index_of("C").unwrap());
		assert_eq!((c.x, c.y), (0.0, 50.0));
		assert!(m.visible_links().iter().all(|l| l.thickness == 3.0));
	}

	#[test]
	fn representative_follows_collapse_state() {
		let mut m = model(&[("A", None), ("B", Some("A")), ("C", Some("B"))], &[]);
		assert_eq!(m.representative("C").unwrap(), Some(0));
		m.expand("A").unwrap();
		assert_eq!(m.representative("C").unwrap(), Some(1));
		assert_eq!(m.representative("A").unwrap(), None);
	}

	fn forest() -> impl Strategy<Value = (Vec<Option<usize>>, Vec<(usize, usize)>, Vec<usize>)> {
		(2usize..16).prop_flat_map(|n| {
			let parents = (0..n)
				.map(|i| {
					if i == 0 {
						Just(None).boxed()
					} else {
						proptest::option::of(0..i).boxed()
					}
				})
				.collect::<Vec<_>>();
			let links = proptest::collection::vec((0..n, 0..n), 0..24);
			let toggles = proptest::collection::vec(0..n, 0..24);
			(parents, links, toggles)
		})
	}

	proptest! {
		#[test]
		fn visible_links_only_reference_visible_nodes((parents, links, toggles) in forest()) {
			let data = GraphData {
				nodes: parents
					.iter()
					.enumerate()
					.map(|(i, p)| {
						let parent = p.map(|p| p.to_string());
						NodeRecord::new("Part", &i.to_string(), parent.as_deref(), "n")
					})
					.collect(),
				links: links
					.iter()
					.filter(|(s, t)| s != t)
					.map(|(s, t)| LinkRecord::new(&s.to_string(), &t.to_string(), 1.0, "l"))
					.collect(),
			};
			let mut m = SankeyModel::build(&data, &SankeyConfig::default()).unwrap();
			for idx in toggles {
				m.toggle(idx).unwrap();
				m.layout(2);

				let shown: BTreeSet<usize> = (0..m.nodes().len())
					.filter(|&i| m.node(i).state == CollapseState::Collapsed)
					.collect();
				for link in m.visible_links() {
					prop_assert!(shown.contains(&link.source));
					prop_assert!(shown.contains(&link.target));
				}
				for node in m.nodes() {
					match node.state {
						CollapseState::Contained => {
							prop_assert!(
								node.ancestors
									.iter()
									.any(|&a| m.node(a).state == CollapseState::Collapsed)
							);
						}
						_ => {
							prop_assert!(
								node.ancestors
									.iter()
									.all(|&a| m.node(a).state == CollapseState::Expanded)
							);
						}
					}
				}
			}
		}
	}
}

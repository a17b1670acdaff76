//! Layered flow layout.
//!
//! The model hands a detached [`LayoutGraph`] to a [`LayoutStrategy`] and
//! copies the resulting positions back, so strategies never see collapse
//! state or interaction flags.

use std::collections::VecDeque;

/// A drawn node as the strategy sees it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutNode {
	/// Flow through the node; set by the strategy.
	pub value: f64,
	/// Bar width, fixed.
	pub width: f64,
	/// Bar height.
	pub height: f64,
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
	/// Layer index.
	pub column: usize,
	/// Links on the busier side of the node.
	pub lanes: usize,
}

impl LayoutNode {
	/// Vertical middle of the bar.
	pub fn center(&self) -> f64 {
		self.y + self.height / 2.0
	}
}

/// A visible link between two slots of [`LayoutGraph::nodes`].
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutEdge {
	/// Source slot.
	pub source: usize,
	/// Target slot.
	pub target: usize,
	/// Flow weight.
	pub value: f64,
}

/// Drawn nodes and visible links, detached from the model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutGraph {
	/// Drawing width.
	pub width: f64,
	/// Drawing height.
	pub height: f64,
	/// Drawn nodes.
	pub nodes: Vec<LayoutNode>,
	/// Visible links.
	pub edges: Vec<LayoutEdge>,
	/// Vertical scale chosen by the strategy; link thickness is `value * ky`.
	pub ky: f64,
	/// Gap between links stacked on the same side of a node.
	pub link_spacing: f64,
}

impl LayoutGraph {
	/// Room a node needs beyond its flow for the gaps between its links.
	pub fn link_gaps(&self, node: usize) -> f64 {
		self.nodes[node].lanes.saturating_sub(1) as f64 * self.link_spacing
	}
}

/// Places the nodes of a [`LayoutGraph`] and picks its vertical scale.
pub trait LayoutStrategy {
	/// Write `x`, `y`, `height` and `ky`; `iterations` bounds any relaxation.
	fn arrange(&self, graph: &mut LayoutGraph, iterations: usize);
}

/// Sankey-style layout: columns by longest path, heights by flow, iterative vertical relaxation.
#[derive(Clone, Debug)]
pub struct FlowLayout {
	/// Vertical gap between nodes of a column.
	pub node_spacing: f64,
	/// Floor for bars with little flow.
	pub min_node_height: f64,
}

impl Default for FlowLayout {
	fn default() -> Self {
		Self {
			node_spacing: 10.0,
			min_node_height: 4.0,
		}
	}
}

impl LayoutStrategy for FlowLayout {
	fn arrange(&self, graph: &mut LayoutGraph, iterations: usize) {
		if graph.nodes.is_empty() {
			return;
		}
		compute_values(graph);
		let columns = assign_columns(graph);
		place_columns(graph, columns.len());
		self.scale_heights(graph, &columns);
		self.stack(graph, &columns);

		let mut alpha = 1.0;
		for _ in 0..iterations {
			relax_right_to_left(graph, &columns, alpha);
			self.resolve_collisions(graph, &columns);
			relax_left_to_right(graph, &columns, alpha);
			self.resolve_collisions(graph, &columns);
			alpha *= 0.99;
		}
	}
}

impl FlowLayout {
	fn scale_heights(&self, graph: &mut LayoutGraph, columns: &[Vec<usize>]) {
		let ky = columns
			.iter()
			.filter_map(|column| {
				let total: f64 = column.iter().map(|&i| graph.nodes[i].value).sum();
				let gaps: f64 = column.iter().map(|&i| graph.link_gaps(i)).sum();
				(total > 0.0).then(|| {
					let free = graph.height - (column.len() as f64 - 1.0) * self.node_spacing - gaps;
					free.max(0.0) / total
				})
			})
			.fold(f64::INFINITY, f64::min);
		graph.ky = if ky.is_finite() { ky } else { 0.0 };

		for i in 0..graph.nodes.len() {
			let height = graph.nodes[i].value * graph.ky + graph.link_gaps(i);
			graph.nodes[i].height = height.max(self.min_node_height);
		}
	}

	fn stack(&self, graph: &mut LayoutGraph, columns: &[Vec<usize>]) {
		for column in columns {
			let mut y = 0.0;
			for &i in column {
				graph.nodes[i].y = y;
				y += graph.nodes[i].height + self.node_spacing;
			}
		}
		self.resolve_collisions(graph, columns);
	}

	fn resolve_collisions(&self, graph: &mut LayoutGraph, columns: &[Vec<usize>]) {
		let nodes = &mut graph.nodes;
		for column in columns {
			let mut order = column.clone();
			order.sort_by(|&a, &b| nodes[a].y.total_cmp(&nodes[b].y).then(a.cmp(&b)));

			// Push overlapping nodes down.
			let mut y0 = 0.0;
			for &i in &order {
				let dy = y0 - nodes[i].y;
				if dy > 0.0 {
					nodes[i].y += dy;
				}
				y0 = nodes[i].y + nodes[i].height + self.node_spacing;
			}

			// If the bottommost node overflows, push back up.
			let Some(&last) = order.last() else {
				continue;
			};
			let overflow = y0 - self.node_spacing - graph.height;
			if overflow > 0.0 {
				nodes[last].y -= overflow;
				let mut y0 = nodes[last].y;
				for &i in order.iter().rev().skip(1) {
					let dy = nodes[i].y + nodes[i].height + self.node_spacing - y0;
					if dy > 0.0 {
						nodes[i].y -= dy;
					}
					y0 = nodes[i].y;
				}
			}

			for &i in &order {
				let max_y = (graph.height - nodes[i].height).max(0.0);
				nodes[i].y = nodes[i].y.clamp(0.0, max_y);
			}
		}
	}
}

fn compute_values(graph: &mut LayoutGraph) {
	let n = graph.nodes.len();
	let (mut inflow, mut outflow) = (vec![0.0; n], vec![0.0; n]);
	let (mut incoming, mut outgoing) = (vec![0usize; n], vec![0usize; n]);
	for edge in &graph.edges {
		outflow[edge.source] += edge.value;
		inflow[edge.target] += edge.value;
		outgoing[edge.source] += 1;
		incoming[edge.target] += 1;
	}
	for (i, node) in graph.nodes.iter_mut().enumerate() {
		node.value = inflow[i].max(outflow[i]);
		node.lanes = incoming[i].max(outgoing[i]);
	}
}

/// Longest-path columns in Kahn order. Nodes stuck on a cycle are released in
/// input order so every node ends up in some column.
fn assign_columns(graph: &mut LayoutGraph) -> Vec<Vec<usize>> {
	let n = graph.nodes.len();
	let mut indegree = vec![0usize; n];
	let mut outgoing = vec![Vec::new(); n];
	for edge in &graph.edges {
		indegree[edge.target] += 1;
		outgoing[edge.source].push(edge.target);
	}

	let mut column = vec![0usize; n];
	let mut done = vec![false; n];
	let mut ready: VecDeque<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
	let mut next_release = 0;

	for _ in 0..n {
		let i = match ready.pop_front() {
			Some(i) => i,
			None => {
				while done[next_release] {
					next_release += 1;
				}
				next_release
			}
		};
		done[i] = true;
		for &t in &outgoing[i] {
			if done[t] {
				continue;
			}
			column[t] = column[t].max(column[i] + 1);
			indegree[t] -= 1;
			if indegree[t] == 0 {
				ready.push_back(t);
			}
		}
	}

	let count = column.iter().max().map_or(0, |&c| c + 1);
	let mut columns = vec![Vec::new(); count];
	for (i, &c) in column.iter().enumerate() {
		graph.nodes[i].column = c;
		columns[c].push(i);
	}
	columns
}

fn place_columns(graph: &mut LayoutGraph, count: usize) {
	let steps = count.saturating_sub(1).max(1) as f64;
	for node in &mut graph.nodes {
		let kx = (graph.width - node.width).max(0.0) / steps;
		node.x = node.column as f64 * kx;
	}
}

fn weighted_center(
	graph: &LayoutGraph,
	node: usize,
	neighbor: impl Fn(&LayoutEdge) -> Option<usize>,
) -> Option<f64> {
	let (mut sum, mut weight) = (0.0, 0.0);
	for edge in &graph.edges {
		if let Some(other) = neighbor(edge) {
			if other != node {
				sum += graph.nodes[other].center() * edge.value;
				weight += edge.value;
			}
		}
	}
	(weight > 0.0).then(|| sum / weight)
}

fn relax_right_to_left(graph: &mut LayoutGraph, columns: &[Vec<usize>], alpha: f64) {
	for column in columns.iter().rev() {
		for &i in column {
			let center = weighted_center(graph, i, |e| (e.source == i).then_some(e.target));
			if let Some(center) = center {
				let node = &mut graph.nodes[i];
				node.y += (center - node.center()) * alpha;
			}
		}
	}
}

fn relax_left_to_right(graph: &mut LayoutGraph, columns: &[Vec<usize>], alpha: f64) {
	for column in columns {
		for &i in column {
			let center = weighted_center(graph, i, |e| (e.target == i).then_some(e.source));
			if let Some(center) = center {
				let node = &mut graph.nodes[i];
				node.y += (center - node.center()) * alpha;
			}
		}
	}
}

/// Per-edge `(source offset, target offset, thickness)`.
///
/// Outgoing links stack at the source in target order; incoming links stack
/// at the target in source order, `link_spacing` apart.
pub fn link_offsets(graph: &LayoutGraph) -> Vec<(f64, f64, f64)> {
	let n = graph.nodes.len();
	let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); n];
	let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); n];
	for (e, edge) in graph.edges.iter().enumerate() {
		outgoing[edge.source].push(e);
		incoming[edge.target].push(e);
	}

	let thickness: Vec<f64> = graph.edges.iter().map(|e| e.value * graph.ky).collect();
	let mut offsets = vec![(0.0, 0.0, 0.0); graph.edges.len()];
	for (e, t) in thickness.iter().enumerate() {
		offsets[e].2 = *t;
	}

	let center = |i: usize| graph.nodes[i].center();
	for list in &mut outgoing {
		list.sort_by(|&a, &b| {
			center(graph.edges[a].target)
				.total_cmp(&center(graph.edges[b].target))
				.then(a.cmp(&b))
		});
		let mut sy = 0.0;
		for &e in list.iter() {
			offsets[e].0 = sy;
			sy += thickness[e] + graph.link_spacing;
		}
	}
	for list in &mut incoming {
		list.sort_by(|&a, &b| {
			center(graph.edges[a].source)
				.total_cmp(&center(graph.edges[b].source))
				.then(a.cmp(&b))
		});
		let mut ty = 0.0;
		for &e in list.iter() {
			offsets[e].1 = ty;
			ty += thickness[e] + graph.link_spacing;
		}
	}
	offsets
}

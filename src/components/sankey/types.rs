use serde::Deserialize;

/// A node record as supplied by the host page.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NodeRecord {
	/// Artifact type, e.g. `WsdlDocument`; `type` in JSON.
	#[serde(rename = "type")]
	pub kind: String,
	/// Unique id.
	pub id: String,
	/// Id of the containing node, if any.
	#[serde(default)]
	pub parent: Option<String>,
	/// Display name.
	pub name: String,
}

impl NodeRecord {
	/// Convenience constructor for literal records.
	pub fn new(kind: &str, id: &str, parent: Option<&str>, name: &str) -> Self {
		Self {
			kind: kind.into(),
			id: id.into(),
			parent: parent.map(Into::into),
			name: name.into(),
		}
	}
}

/// A directed relationship between two node ids.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LinkRecord {
	/// Id of the node the link leaves.
	pub source: String,
	/// Id of the node the link points at.
	pub target: String,
	/// Flow weight; defaults to one.
	#[serde(default = "default_value")]
	pub value: f64,
	/// Relationship name shown in the tooltip.
	#[serde(default)]
	pub label: String,
}

fn default_value() -> f64 {
	1.0
}

impl LinkRecord {
	/// Convenience constructor for literal records.
	pub fn new(source: &str, target: &str, value: f64, label: &str) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			value,
			label: label.into(),
		}
	}
}

/// Everything needed to build a view.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
	/// Nodes, parents before or after children.
	pub nodes: Vec<NodeRecord>,
	/// Links between any two node ids.
	pub links: Vec<LinkRecord>,
}

/// Where a node stands in the collapse hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollapseState {
	/// Hidden because some ancestor is collapsed.
	Contained,
	/// Drawn; children hidden.
	Collapsed,
	/// Represented by its children and a collapser control.
	Expanded,
}

/// The node the host is told about when the selection changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedArtifact {
	/// Id of the selected node.
	pub id: String,
	/// Its display name.
	pub name: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn records_deserialize_from_host_json() {
		let data: GraphData = serde_json::from_str(
			r#"{
				"nodes": [
					{"type": "WsdlDocument", "id": "w", "parent": null, "name": "sample.wsdl"},
					{"type": "Part", "id": "p", "parent": "w", "name": "parameters"}
				],
				"links": [{"source": "p", "target": "w", "label": "part"}]
			}"#,
		)
		.unwrap();
		assert_eq!(data.nodes[0], NodeRecord::new("WsdlDocument", "w", None, "sample.wsdl"));
		assert_eq!(data.nodes[1].parent.as_deref(), Some("w"));
		assert_eq!(data.links[0], LinkRecord::new("p", "w", 1.0, "part"));
	}
}

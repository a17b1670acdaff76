//! Error types for graph construction and interaction.

/// A single integrity problem found while building a graph.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationIssue {
	/// Two records share an id.
	#[error("duplicate node id `{0}`")]
	DuplicateNode(String),
	/// A parent id matches no record.
	#[error("node `{node}` names unknown parent `{parent}`")]
	UnknownParent {
		/// The child record.
		node: String,
		/// The missing parent id.
		parent: String,
	},
	/// Following parents leads back to the node.
	#[error("node `{0}` is its own ancestor")]
	ParentCycle(String),
	/// A link end matches no record.
	#[error("link #{link} references unknown node `{id}`")]
	UnknownEndpoint {
		/// Position of the link record.
		link: usize,
		/// The unresolved id.
		id: String,
	},
	/// A link starts and ends on one node.
	#[error("link #{link} loops on node `{id}`")]
	SelfLoop {
		/// Position of the link record.
		link: usize,
		/// The node on both ends.
		id: String,
	},
	/// A negative or non-finite weight.
	#[error("link #{link} has unusable value {value}")]
	InvalidValue {
		/// Position of the link record.
		link: usize,
		/// The rejected weight.
		value: f64,
	},
}

/// Every issue found in one pass over the input records.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{} problem(s) in graph data{}", .issues.len(), joined(.issues))]
pub struct ValidationError {
	/// In record order.
	pub issues: Vec<ValidationIssue>,
}

fn joined(issues: &[ValidationIssue]) -> String {
	issues.iter().map(|issue| format!("; {issue}")).collect()
}

impl ValidationError {
	/// Ids referenced by links that resolve to no node.
	pub fn unresolved_ids(&self) -> Vec<&str> {
		self.issues
			.iter()
			.filter_map(|issue| match issue {
				ValidationIssue::UnknownEndpoint { id, .. } => Some(id.as_str()),
				_ => None,
			})
			.collect()
	}
}

/// Errors raised while building or changing a graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
	/// The input records do not form a valid graph.
	#[error("invalid graph data: {0}")]
	Validation(#[from] ValidationError),
	/// An operation named a node that does not exist.
	#[error("node `{0}` not found")]
	NodeNotFound(String),
	/// Configuration or graph JSON failed to parse.
	#[error("invalid configuration: {0}")]
	Config(#[from] serde_json::Error),
}

/// Shorthand used across the crate.
pub type Result<T, E = GraphError> = std::result::Result<T, E>;

//! Collapsible Sankey view of artifact relationships.

pub mod color;
mod component;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod render;
pub mod state;
mod types;

pub use component::RelationshipSankey;
pub(crate) use component::sankey_view;
pub use layout::{FlowLayout, LayoutEdge, LayoutGraph, LayoutNode, LayoutStrategy};
pub use model::{NodeKey, SankeyLink, SankeyModel, SankeyNode, VisibleLink};
pub use types::{CollapseState, GraphData, LinkRecord, NodeRecord, SelectedArtifact};

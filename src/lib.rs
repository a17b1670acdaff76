//! Leptos client-side relationship explorer: a collapsible Sankey view of
//! artifact relationships plus responsive page regions.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod components;
mod config;
mod error;
pub mod host;
mod pages;

pub use components::responsive::{RegionSet, ResponsiveShell};
pub use components::sankey::{
	CollapseState, FlowLayout, GraphData, LayoutEdge, LayoutGraph, LayoutNode, LayoutStrategy,
	LinkRecord, NodeKey, NodeRecord, RelationshipSankey, SankeyLink, SankeyModel, SankeyNode,
	SelectedArtifact, VisibleLink,
};
pub use config::{Margin, Opacity, SankeyConfig};
pub use error::{GraphError, ValidationError, ValidationIssue};

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the relationship page and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Artifact relationships" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}

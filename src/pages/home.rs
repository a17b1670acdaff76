use leptos::prelude::*;

use super::sample::wsdl_sample;
use crate::components::responsive::{RegionSet, ResponsiveShell};
use crate::components::sankey::{RelationshipSankey, SelectedArtifact};
use crate::config::SankeyConfig;

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = Signal::derive(wsdl_sample);
	let selected = RwSignal::new(None::<SelectedArtifact>);
	let config = SankeyConfig::default();
	let details_prefix = config.details_url_prefix.clone();

	let on_select = Callback::new(move |artifact: Option<SelectedArtifact>| selected.set(artifact));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<ResponsiveShell regions=RegionSet::new("#artifact-sidebar", "#artifact-menu")>
				<nav id="artifact-menu" class="mobile-only">
					<a href="/">"Relationships"</a>
				</nav>
				<div class="artifact-page">
					<aside id="artifact-sidebar" class="desktop-only">
						<h2>"sample.wsdl"</h2>
						<p>"WSDL document importing sample.xsd."</p>
					</aside>
					<main>
						<h1>"Relationships"</h1>
						<p class="subtitle">
							"Double-click a node to expand it, double-click its circle above the chart to collapse it. Click to select, drag to move."
						</p>
						<RelationshipSankey data=graph_data config=config on_select=on_select />
						{move || {
							selected
								.get()
								.map(|artifact| {
									let href = format!("{details_prefix}{}", artifact.id);
									view! {
										<p class="selected-artifact">
											"Selected artifact "<strong>{artifact.name}</strong>" "
											<a href=href>"(details view)"</a>
										</p>
									}
								})
						}}
					</main>
				</div>
			</ResponsiveShell>
		</ErrorBoundary>
	}
}

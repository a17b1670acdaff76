//! Desktop/mobile region switching driven by the viewport width.

mod dom;
pub mod toggle;
pub mod viewport;

use leptos::prelude::*;
use log::error;

pub use dom::ResponsiveLayout;
pub use toggle::RegionSet;

/// Wraps a page whose regions follow the viewport for as long as it is mounted.
#[component]
pub fn ResponsiveShell(
	/// Regions to switch; the `.desktop-only`/`.mobile-only` classes when omitted.
	#[prop(optional)]
	regions: RegionSet,
	/// Page content.
	children: Children,
) -> impl IntoView {
	let layout = StoredValue::new_local(None::<ResponsiveLayout>);

	Effect::new(move |_| match ResponsiveLayout::install(regions.clone()) {
		Ok(installed) => layout.set_value(Some(installed)),
		Err(err) => error!("responsive layout unavailable: {err:?}"),
	});

	view! { <div class="responsive-shell">{children()}</div> }
}

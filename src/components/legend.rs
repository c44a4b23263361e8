use leptos::prelude::*;

use crate::analysis::metrics::{LegendKind, legend_items};
use crate::controller::Controller;

#[component]
pub fn Legend(ctl: Controller) -> impl IntoView {
	let (form, theme) = (ctl.form, ctl.theme);

	view! {
		<div class="legend">
			{move || {
				let mode = form.with(|f| f.mode);
				legend_items(mode, theme.get().palette())
					.into_iter()
					.map(|item| {
						let class = match item.kind {
							LegendKind::Node => "legend-swatch legend-node",
							LegendKind::Line => "legend-swatch legend-line",
						};
						view! {
							<div class="legend-item">
								<span class=class style:background-color=item.color></span>
								<span class="legend-label">{item.label}</span>
							</div>
						}
					})
					.collect_view()
			}}
		</div>
	}
}

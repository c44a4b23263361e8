use leptos::prelude::*;

use crate::components::controls::ControlPanel;
use crate::components::force_graph::ForceGraphCanvas;
use crate::components::legend::Legend;
use crate::components::results::ResultsPanel;
use crate::config::AppConfig;
use crate::controller::Controller;

/// Control panel, graph canvas and results side by side.
#[component]
pub fn Home() -> impl IntoView {
	let ctl = Controller::new(AppConfig::load());
	ctl.load_dataset();

	let graph_data = Signal::derive(move || ctl.graph.get());
	let focus = Signal::derive(move || ctl.focus.get());
	let on_node_click = Callback::new(move |id: String| ctl.node_clicked(id));
	let theme = ctl.theme;

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
			<div class="app-layout" data-theme=move || theme.get().name()>
				<section class="card control-card">
					<header class="card-header">
						<h2>"Influence Analysis"</h2>
						<button
							type="button"
							class="theme-toggle"
							title="Toggle theme"
							on:click=move |_| ctl.set_theme(theme.get_untracked().toggled())
						>
							{move || if theme.get().is_dark() { "☀️" } else { "🌙" }}
						</button>
					</header>
					<ControlPanel ctl=ctl />
				</section>
				<section class="card graph-card">
					<ForceGraphCanvas
						data=graph_data
						styler=ctl.styler()
						focus=focus
						aggregate=ctl.aggregate()
						on_node_click=on_node_click
					/>
					<div class="graph-overlay">
						<Legend ctl=ctl />
						<p class="subtitle">"Drag nodes to reposition. Scroll to zoom. Drag background to pan."</p>
					</div>
				</section>
				<section class="card results-card">
					<h2>"Results"</h2>
					<ResultsPanel ctl=ctl />
				</section>
			</div>
		</ErrorBoundary>
	}
}

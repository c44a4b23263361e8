use leptos::prelude::*;

use super::charts::{LineChart, PieChart};
use crate::analysis::metrics::{CommunitySummary, MaximizationSummary, MinimizationSummary, format_count};
use crate::analysis::ResultPanel;
use crate::controller::{Controller, LogKind};

#[component]
fn KeyMetric(icon: &'static str, label: &'static str, value: String) -> impl IntoView {
	view! {
		<div class="key-metric-item">
			<span class="metric-icon">{icon}</span>
			<div class="metric-text">
				<span class="metric-label">{label}</span>
				<span class="metric-value">{value}</span>
			</div>
		</div>
	}
}

#[component]
fn NodeChips(ctl: Controller, ids: Vec<String>, #[prop(optional)] empty: &'static str) -> impl IntoView {
	if ids.is_empty() && !empty.is_empty() {
		return view! { <p class="info-text">{empty}</p> }.into_any();
	}
	view! {
		<div class="node-chip-list">
			{ids
				.into_iter()
				.map(|id| {
					let target = id.clone();
					view! {
						<div class="node-chip" on:click=move |_| ctl.focus_node(target.clone())>
							{id}
						</div>
					}
				})
				.collect_view()}
		</div>
	}
	.into_any()
}

fn maximization(ctl: Controller, s: MaximizationSummary) -> impl IntoView {
	let palette = ctl.theme.get().palette();
	let dark = Signal::derive(move || ctl.theme.get().is_dark());
	let seeds_title = match s.timeline {
		Some(_) => "🌱 Seed Nodes".to_string(),
		None => format!("🌱 Interactive Seeds ({})", s.seeds.len()),
	};
	let timeline = match s.timeline.clone() {
		Some(series) if !series.is_empty() => view! {
			<LineChart
				title="📉 Propagation Timeline"
				y_label="Total Influenced Nodes"
				series=series
				color=palette.heat.hot
				dark=dark
			/>
		}
		.into_any(),
		Some(_) => view! { <p class="info-text center">"Could not generate timeline chart."</p> }.into_any(),
		None => view! { <p class="info-text center">"Timeline chart is not available in interactive mode."</p> }
			.into_any(),
	};

	view! {
		<h4 class="result-section-title">"⭐ Key Metrics"</h4>
		<div class="key-metrics-container">
			<KeyMetric
				icon="🎯"
				label="Total Influenced Nodes"
				value=format!("{} ({:.1}%)", format_count(s.influenced()), s.ratio())
			/>
		</div>
		<div class="result-section">
			<h4>{seeds_title}</h4>
			<NodeChips ctl=ctl ids=s.seeds.clone() />
		</div>
		<PieChart title="📊 Influence Distribution" slices=s.slices(palette) dark=dark />
		{timeline}
	}
}

fn minimization(ctl: Controller, s: MinimizationSummary) -> impl IntoView {
	let palette = ctl.theme.get().palette();
	let dark = Signal::derive(move || ctl.theme.get().is_dark());
	let interactive = s.timeline.is_none();
	let blocking_title = if interactive {
		format!("🛡️ Interactive Blocking Nodes ({})", s.blocking.len())
	} else {
		"🛡️ Blocking Nodes".to_string()
	};
	let timeline = match s.timeline.clone() {
		Some(series) if !series.is_empty() => view! {
			<LineChart
				title="📉 Saved Nodes Timeline"
				y_label="Total Nodes Saved"
				series=series
				color=palette.recovered
				dark=dark
			/>
		}
		.into_any(),
		Some(_) => view! { <p class="info-text center">"Could not generate timeline chart."</p> }.into_any(),
		None => view! { <p class="info-text center">"Timeline chart is not available in interactive mode."</p> }
			.into_any(),
	};

	view! {
		<h4 class="result-section-title">"⭐ Key Metrics"</h4>
		<div class="key-metrics-container">
			<KeyMetric
				icon="🛡️"
				label="Nodes Saved from Influence"
				value=format!("{} ({:.1}%)", format_count(s.saved()), s.ratio())
			/>
		</div>
		<div class="result-section">
			<h4>{blocking_title}</h4>
			<NodeChips
				ctl=ctl
				ids=s.blocking.clone()
				empty=if interactive { "None selected. Click nodes to block." } else { "" }
			/>
		</div>
		<PieChart title="📊 Blocking Effectiveness" slices=s.slices(palette) dark=dark />
		{timeline}
	}
}

fn community(ctl: Controller, s: CommunitySummary) -> impl IntoView {
	let palette = ctl.theme.get().palette();
	let dark = Signal::derive(move || ctl.theme.get().is_dark());
	let seeds = (!s.seeds.is_empty()).then(|| {
		view! {
			<div class="result-section">
				<h4>{format!("🌱 Seed Nodes ({})", s.seeds.len())}</h4>
				<NodeChips ctl=ctl ids=s.seeds.clone() />
			</div>
		}
	});
	let composition = if s.found() {
		view! { <PieChart title="📊 Community Composition Analysis" slices=s.slices(palette) dark=dark /> }
			.into_any()
	} else {
		view! { <p class="info-text">{s.empty_message().to_string()}</p> }.into_any()
	};

	view! {
		<h4 class="result-section-title">{format!("⭐ Key Metrics ({})", s.algorithm)}</h4>
		<p class="info-text">{s.params.clone()}</p>
		<div class="key-metrics-container">
			<KeyMetric icon="👥" label="Community Nodes" value=format_count(s.node_count) />
			<KeyMetric icon="📈" label="Graph Percentage" value=format!("{:.1}%", s.graph_ratio()) />
			<KeyMetric
				icon="📊"
				label="Average Influence Probability"
				value=format!("{:.2}%", s.average_probability * 100.0)
			/>
		</div>
		{seeds}
		{composition}
	}
}

#[component]
pub fn ResultsPanel(ctl: Controller) -> impl IntoView {
	let (results, log, path) = (ctl.results, ctl.log, ctl.critical_path);

	let body = move || match results.get() {
		ResultPanel::Idle => view! { <p class="info-text">"Select parameters and run an analysis."</p> }.into_any(),
		ResultPanel::Message(text) => view! { <p class="info-text">{text}</p> }.into_any(),
		ResultPanel::Failed { title, message } => view! {
			<p class="error">
				<b>{title}": "</b>
				{message}
			</p>
		}
		.into_any(),
		ResultPanel::Maximization(s) => maximization(ctl, s).into_any(),
		ResultPanel::Minimization(s) => minimization(ctl, s).into_any(),
		ResultPanel::Community(s) => community(ctl, s).into_any(),
	};

	let log_line = move || {
		log.get().map(|line| {
			let class = match line.kind {
				LogKind::Info => "log-info",
				LogKind::Error => "log-error",
			};
			view! { <p class=class>{line.text}</p> }
		})
	};

	let critical_path = move || {
		let nodes = path.get();
		(!nodes.is_empty()).then(|| {
			let last = nodes.len() - 1;
			view! {
				<h4 class="result-section-title">"🔗 Critical Chain Path"</h4>
				<div class="path-node-list">
					{nodes
						.into_iter()
						.enumerate()
						.map(|(i, id)| {
							let id = id.to_string();
							let target = id.clone();
							view! {
								<div class="path-node-item" on:click=move |_| ctl.focus_node(target.clone())>
									{id}
								</div>
								{(i < last).then(|| view! { <span class="path-separator">"→"</span> })}
							}
						})
						.collect_view()}
				</div>
			}
		})
	};

	view! {
		<div class="results-panel">
			{body}
			<div class="log-messages">{log_line}</div>
			<div class="critical-path-results">{critical_path}</div>
		</div>
	}
}

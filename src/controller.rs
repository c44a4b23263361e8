//! Wires form events, node clicks and action buttons to backend calls,
//! store updates and the scene.

use std::sync::Arc;
use std::time::Duration;

use leptos::leptos_dom::helpers::{TimeoutHandle, set_timeout_with_handle};
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info, warn};

use crate::analysis::state::node_ids;
use crate::analysis::{
	AnalysisForm, AnalysisState, AnimationKind, CommunitySummary, MaximizationSummary, MinimizationSummary,
	MinimizationView, ResultPanel, SceneStyler,
};
use crate::api::{AnalysisMode, ApiClient, NodeId, SimulationStep};
use crate::components::force_graph::{FocusRequest, GraphData, GraphStyler};
use crate::config::{AppConfig, Theme};
use crate::error::{AppError, AppResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationButton {
	#[default]
	Idle,
	Loading,
	Loaded,
}

/// Post-analysis actions offered in the control panel.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ActionsPanel {
	#[default]
	Hidden,
	Maximization {
		animation: AnimationButton,
		analyzing_path: bool,
	},
	Minimization {
		view: MinimizationView,
		animation: AnimationButton,
	},
	Community {
		aggregated: bool,
	},
}

impl ActionsPanel {
	fn set_animation(&mut self, state: AnimationButton) {
		match self {
			ActionsPanel::Maximization { animation, .. } | ActionsPanel::Minimization { animation, .. } => {
				*animation = state
			}
			_ => {}
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogKind {
	Info,
	Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogLine {
	pub kind: LogKind,
	pub text: String,
}

impl LogLine {
	fn info(text: impl Into<String>) -> Self {
		Self {
			kind: LogKind::Info,
			text: text.into(),
		}
	}

	fn error(text: impl Into<String>) -> Self {
		Self {
			kind: LogKind::Error,
			text: text.into(),
		}
	}
}

fn prefers_dark() -> bool {
	web_sys::window()
		.and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
		.is_some_and(|mq| mq.matches())
}

fn cancel(slot: StoredValue<Option<TimeoutHandle>>) {
	let handle = slot.get_value();
	slot.set_value(None);
	if let Some(handle) = handle {
		handle.clear();
	}
}

fn schedule(slot: StoredValue<Option<TimeoutHandle>>, ms: u64, f: impl FnOnce() + 'static) {
	cancel(slot);
	match set_timeout_with_handle(f, Duration::from_millis(ms)) {
		Ok(handle) => slot.set_value(Some(handle)),
		Err(e) => warn!("failed to schedule timer: {:?}", e),
	}
}

/// Every signal of the page plus the operations that drive them.
#[derive(Clone, Copy)]
pub struct Controller {
	config: StoredValue<AppConfig>,
	client: StoredValue<ApiClient, LocalStorage>,
	pub analysis: RwSignal<AnalysisState>,
	pub form: RwSignal<AnalysisForm>,
	pub theme: RwSignal<Theme>,
	pub graph: RwSignal<GraphData>,
	pub results: RwSignal<ResultPanel>,
	pub log: RwSignal<Option<LogLine>>,
	pub busy: RwSignal<bool>,
	pub actions: RwSignal<ActionsPanel>,
	pub critical_path: RwSignal<Vec<NodeId>>,
	pub focus: RwSignal<Option<FocusRequest>>,
	focus_nonce: StoredValue<u64>,
	debounce: StoredValue<Option<TimeoutHandle>>,
	playback_timer: StoredValue<Option<TimeoutHandle>>,
	flash_timer: StoredValue<Option<TimeoutHandle>>,
}

impl Controller {
	pub fn new(config: AppConfig) -> Self {
		let theme = if prefers_dark() { Theme::Dark } else { Theme::Light };
		let client = ApiClient::new(config.api_base_url.clone());
		let form = AnalysisForm::new(config.default_dataset());
		info!("API base URL: {}", config.api_base_url);
		Self {
			config: StoredValue::new(config),
			client: StoredValue::new_local(client),
			analysis: RwSignal::new(AnalysisState::default()),
			form: RwSignal::new(form),
			theme: RwSignal::new(theme),
			graph: RwSignal::new(GraphData::default()),
			results: RwSignal::new(ResultPanel::Idle),
			log: RwSignal::new(None),
			busy: RwSignal::new(false),
			actions: RwSignal::new(ActionsPanel::Hidden),
			critical_path: RwSignal::new(Vec::new()),
			focus: RwSignal::new(None),
			focus_nonce: StoredValue::new(0),
			debounce: StoredValue::new(None),
			playback_timer: StoredValue::new(None),
			flash_timer: StoredValue::new(None),
		}
	}

	pub fn datasets(&self) -> Vec<String> {
		self.config.with_value(|c| c.datasets.clone())
	}

	fn client(&self) -> ApiClient {
		self.client.get_value()
	}

	fn total_nodes(&self) -> usize {
		self.graph.with_untracked(|g| g.nodes.len())
	}

	/// Applies `f` to the store, failing when the page has been torn down.
	fn with_store<U>(&self, f: impl FnOnce(&mut AnalysisState) -> U) -> AppResult<U> {
		self.analysis.try_update(f).ok_or(AppError::Disposed)
	}

	pub fn styler(&self) -> Signal<Arc<dyn GraphStyler>> {
		let (analysis, theme) = (self.analysis, self.theme);
		Signal::derive(move || {
			let palette = theme.get().palette();
			analysis.with(|s| Arc::new(SceneStyler::new(s, palette)) as Arc<dyn GraphStyler>)
		})
	}

	pub fn focus_node(&self, id: impl Into<String>) {
		let nonce = self.focus_nonce.get_value() + 1;
		self.focus_nonce.set_value(nonce);
		self.focus.set(Some(FocusRequest {
			node_id: id.into(),
			nonce,
		}));
	}

	pub fn set_theme(&self, theme: Theme) {
		info!("theme: {}", theme.name());
		self.theme.set(theme);
	}

	pub fn load_dataset(&self) {
		let ctl = *self;
		let dataset = self.form.with_untracked(|f| f.dataset_id.clone());
		let url = self.config.with_value(|c| c.dataset_url(&dataset, js_sys::Date::now()));
		info!("loading dataset {} from {}", dataset, url);
		spawn_local(async move {
			match ctl.client().dataset(&url).await {
				Ok(data) => {
					info!("dataset {}: {} nodes, {} links", dataset, data.nodes.len(), data.links.len());
					ctl.graph.set(data);
				}
				Err(e) => {
					error!("dataset load failed: {}", e);
					ctl.results.set(ResultPanel::Failed {
						title: "Dataset Load Failed",
						message: e.to_string(),
					});
				}
			}
		});
	}

	fn clear_session(&self) {
		self.pause();
		cancel(self.debounce);
		cancel(self.flash_timer);
		self.actions.set(ActionsPanel::Hidden);
		self.critical_path.set(Vec::new());
		self.log.set(None);
	}

	pub fn change_dataset(&self, dataset: String) {
		self.clear_session();
		self.form.update(|f| f.dataset_id = dataset);
		self.analysis.update(|s| {
			s.reset_for_new_analysis();
			s.set_interactive(false);
		});
		self.results
			.set(ResultPanel::Message("Dataset changed. Please re-run analysis...".into()));
		self.load_dataset();
	}

	pub fn set_mode(&self, mode: AnalysisMode) {
		self.clear_session();
		self.form.update(|f| f.mode = mode);
		self.analysis.update(|s| {
			if s.interactive.enabled {
				s.set_interactive(false);
			}
			s.set_mode(mode);
		});
	}

	pub fn submit(&self) {
		if self.busy.get_untracked() || self.analysis.with_untracked(|s| s.interactive.enabled) {
			return;
		}
		let mode = self.form.with_untracked(|f| f.mode);
		info!("running {}", mode.label());
		self.busy.set(true);
		self.results
			.set(ResultPanel::Message("Calculating, please wait...".into()));
		self.clear_session();
		self.analysis.update(|s| {
			s.set_mode(mode);
			s.reset_for_new_analysis();
		});

		let ctl = *self;
		spawn_local(async move {
			let outcome = match mode {
				AnalysisMode::CommunitySearch => ctl.run_community().await,
				_ => ctl.run_influence(mode).await,
			};
			if let Err(e) = outcome {
				error!("analysis failed: {}", e);
				ctl.results.set(ResultPanel::Failed {
					title: "Analysis Failed",
					message: e.to_string(),
				});
			}
			ctl.busy.set(false);
		});
	}

	async fn run_influence(&self, mode: AnalysisMode) -> AppResult<()> {
		let client = self.client();
		let request = self.form.with_untracked(|f| f.influence_request(mode));

		if mode == AnalysisMode::Minimization {
			let response = client.run_minimization(&request).await?;
			let (original, blocked) = self.with_store(|s| s.apply_minimization(&response))??;
			let final_state = client.final_state(&blocked).await?;
			self.with_store(|s| s.load_final_states(&final_state.final_states))?;
			let steps = client.blocking_animation(&original, &blocked).await?.simulation_steps;

			let summary = MinimizationSummary::from_result(&response, &steps, self.total_nodes());
			info!("minimization saved {} nodes", summary.saved());
			self.results.set(ResultPanel::Minimization(summary));
			self.actions.set(ActionsPanel::Minimization {
				view: MinimizationView::After,
				animation: AnimationButton::Idle,
			});
			return Ok(());
		}

		let response = client.run_maximization(&request).await?;
		let result_id = self.with_store(|s| s.apply_maximization(&response))??;
		let final_state = client.final_state(&result_id).await?;
		self.with_store(|s| s.load_final_states(&final_state.final_states))?;
		let steps = client.animation_steps(&result_id).await?.simulation_steps;

		let summary = self
			.analysis
			.with_untracked(|s| MaximizationSummary::from_result(s, &response, &steps, self.total_nodes()));
		info!("maximization influenced {} nodes", summary.influenced());
		self.results.set(ResultPanel::Maximization(summary));
		self.actions.set(ActionsPanel::Maximization {
			animation: AnimationButton::Idle,
			analyzing_path: false,
		});
		Ok(())
	}

	async fn run_community(&self) -> AppResult<()> {
		let (request, algorithm, params) = self.form.with_untracked(|f| {
			(f.community_request(), f.community_algorithm, f.community_params_label())
		});
		let response = self.client().community_search(algorithm, &request).await?;
		self.with_store(|s| s.apply_community(&response))?;

		let summary = self.analysis.with_untracked(|s| {
			CommunitySummary::from_result(s, &response, algorithm.label(), params, self.total_nodes())
		});
		info!("{} community: {} nodes", algorithm.label(), summary.node_count);
		if summary.found() {
			self.actions.set(ActionsPanel::Community { aggregated: false });
		}
		self.results.set(ResultPanel::Community(summary));
		Ok(())
	}

	pub fn set_interactive(&self, enabled: bool) {
		self.clear_session();
		self.analysis.update(|s| s.set_interactive(enabled));
		if !enabled {
			self.results
				.set(ResultPanel::Message("Interactive mode disabled.".into()));
			return;
		}

		if self.form.with_untracked(|f| f.mode) != AnalysisMode::Minimization {
			self.results.set(ResultPanel::Message(
				"Click nodes in the graph to select seed nodes...".into(),
			));
			return;
		}

		self.results.set(ResultPanel::Message(
			"Finding key influential nodes for simulation...".into(),
		));
		let ctl = *self;
		spawn_local(async move {
			if let Err(e) = ctl.init_interactive_minimization().await {
				warn!("interactive minimization setup failed: {}", e);
				ctl.analysis.update(|s| s.set_interactive(false));
				ctl.results.set(ResultPanel::Failed {
					title: "Initialization Failed",
					message: e.to_string(),
				});
			}
		});
	}

	/// Probes a maximization run for the seeds to block against and records
	/// its final state as the baseline.
	async fn init_interactive_minimization(&self) -> AppResult<()> {
		let client = self.client();
		let request = self
			.form
			.with_untracked(|f| f.influence_request(AnalysisMode::Maximization));
		let response = client.run_maximization(&request).await?;
		let seeds: Vec<String> = response.seed_nodes.iter().map(|n| n.id().to_string()).collect();
		let states = match &response.result_id {
			Some(id) => client.final_state(id).await?.final_states,
			None => Vec::new(),
		};
		let no_seeds = seeds.is_empty();
		self.with_store(|s| s.set_baseline(seeds, &states))?;
		if no_seeds {
			return Err(AppError::NoInfluentialNodes);
		}
		self.run_interactive_calculation().await;
		Ok(())
	}

	async fn run_interactive_calculation(&self) {
		let Some((mode, seeds, blocking)) = self.analysis.with_untracked(|s| {
			s.interactive.enabled.then(|| match s.mode {
				AnalysisMode::Minimization => (
					s.mode,
					node_ids(&s.interactive.static_seeds),
					node_ids(&s.interactive.blocking),
				),
				_ => (s.mode, node_ids(&s.interactive.seeds), Vec::new()),
			})
		}) else {
			return;
		};

		if mode == AnalysisMode::Maximization && seeds.is_empty() {
			self.analysis.update(|s| s.clear_interactive_result());
			self.results.set(ResultPanel::Message(
				"Click nodes in the graph to select seed nodes.".into(),
			));
			return;
		}

		self.results
			.set(ResultPanel::Message("Calculating in real-time...".into()));
		let request = self.form.with_untracked(|f| f.calculate_request(seeds, blocking));
		match self.client().calculate_from_nodes(&request).await {
			Ok(response) => {
				self.analysis
					.update(|s| s.apply_interactive_result(&response.final_states));
				let total = self.total_nodes();
				let panel = self.analysis.with_untracked(|s| match mode {
					AnalysisMode::Minimization => ResultPanel::Minimization(MinimizationSummary::interactive(s, total)),
					_ => ResultPanel::Maximization(MaximizationSummary::interactive(s, total)),
				});
				self.results.set(panel);
			}
			Err(e) => {
				error!("interactive calculation failed: {}", e);
				self.results.set(ResultPanel::Failed {
					title: "Calculation Failed",
					message: e.to_string(),
				});
			}
		}
	}

	pub fn node_clicked(&self, id: String) {
		let toggled = self.analysis.try_update(|s| s.toggle_interactive_node(id)).unwrap_or(false);
		if !toggled {
			return;
		}
		let ctl = *self;
		let delay = self.config.with_value(|c| c.debounce_ms);
		schedule(self.debounce, delay, move || {
			ctl.debounce.set_value(None);
			spawn_local(async move { ctl.run_interactive_calculation().await });
		});
	}

	pub fn start_animation(&self, kind: AnimationKind) {
		self.pause();
		self.log.set(None);
		self.actions.update(|a| a.set_animation(AnimationButton::Loading));
		self.analysis.update(|s| s.begin_animation(kind));

		let ctl = *self;
		spawn_local(async move {
			match ctl.fetch_animation(kind).await {
				Ok(()) => {
					info!("animation loaded");
					ctl.actions.update(|a| a.set_animation(AnimationButton::Loaded));
				}
				Err(e) => {
					error!("animation load failed: {}", e);
					ctl.log
						.set(Some(LogLine::error(format!("Failed to fetch animation data: {}", e))));
					ctl.actions.update(|a| a.set_animation(AnimationButton::Idle));
				}
			}
		});
	}

	async fn fetch_animation(&self, kind: AnimationKind) -> AppResult<()> {
		let client = self.client();
		let ids = self.analysis.with_untracked(|s| s.result_ids.clone());
		let steps: Vec<SimulationStep> = match kind {
			AnimationKind::Propagation => {
				let id = ids
					.maximization
					.ok_or_else(|| AppError::invalid_response("no maximization result to animate"))?;
				client.animation_steps(&id).await?.simulation_steps
			}
			AnimationKind::Blocking => {
				let (Some(original), Some(blocked)) = (ids.minimization_original, ids.minimization_blocked) else {
					return Err(AppError::invalid_response("no minimization result to animate"));
				};
				client.blocking_animation(&original, &blocked).await?.simulation_steps
			}
		};
		self.with_store(|s| s.load_animation(steps))??;
		self.schedule_flash_clear();
		Ok(())
	}

	fn schedule_flash_clear(&self) {
		let ctl = *self;
		let delay = self.config.with_value(|c| c.flash_ms);
		schedule(self.flash_timer, delay, move || {
			ctl.flash_timer.set_value(None);
			ctl.analysis.update(|s| s.clear_flash());
		});
	}

	pub fn show_step(&self, index: usize) {
		let shown = self.analysis.try_update(|s| s.show_step(index)).unwrap_or(false);
		if shown {
			self.schedule_flash_clear();
		}
	}

	fn schedule_tick(&self) {
		let ctl = *self;
		let delay = self.config.with_value(|c| c.playback_interval_ms);
		schedule(self.playback_timer, delay, move || {
			ctl.playback_timer.set_value(None);
			match ctl.analysis.try_update(|s| s.playback.advance()).flatten() {
				Some(next) => {
					ctl.show_step(next);
					ctl.schedule_tick();
				}
				None => {
					let kind = ctl.analysis.with_untracked(|s| s.playback.kind());
					info!("{:?} playback finished", kind);
				}
			}
		});
	}

	pub fn play(&self) {
		if let Some(first) = self.analysis.try_update(|s| s.playback.play()).flatten() {
			self.show_step(first);
			self.schedule_tick();
		}
	}

	pub fn pause(&self) {
		cancel(self.playback_timer);
		self.analysis.update(|s| {
			s.playback.pause();
		});
	}

	pub fn toggle_playback(&self) {
		if self.analysis.with_untracked(|s| s.playback.is_playing()) {
			self.pause();
		} else {
			self.play();
		}
	}

	pub fn step_forward(&self) {
		cancel(self.playback_timer);
		if let Some(next) = self.analysis.try_update(|s| s.playback.step_forward()).flatten() {
			self.show_step(next);
		}
	}

	pub fn find_critical_path(&self) {
		let Some(result_id) = self.analysis.with_untracked(|s| s.result_ids.maximization.clone()) else {
			return;
		};
		self.set_path_busy(true);
		self.analysis.update(|s| s.clear_critical_path());
		self.critical_path.set(Vec::new());
		self.log
			.set(Some(LogLine::info("Identifying critical propagation chain...")));

		let ctl = *self;
		spawn_local(async move {
			match ctl.client().critical_paths(&result_id).await {
				Ok(response) => {
					ctl.log.set(Some(LogLine::info(response.message.clone())));
					if let Some(path) = response.critical_paths.first() {
						info!("critical chain of {} nodes", path.nodes.len());
						ctl.analysis.update(|s| s.set_critical_path(&path.nodes));
						ctl.critical_path.set(path.nodes.clone());
					}
				}
				Err(e) => {
					error!("critical path analysis failed: {}", e);
					ctl.log
						.set(Some(LogLine::error(format!("Analysis failed: {}", e))));
				}
			}
			ctl.set_path_busy(false);
		});
	}

	fn set_path_busy(&self, busy: bool) {
		self.actions.update(|a| {
			if let ActionsPanel::Maximization { analyzing_path, .. } = a {
				*analyzing_path = busy;
			}
		});
	}

	pub fn show_minimization_view(&self, view: MinimizationView) {
		self.pause();
		self.log.set(None);
		self.actions.update(|a| {
			if let ActionsPanel::Minimization { view: current, .. } = a {
				*current = view;
			}
		});
		let Some(result_id) = self.analysis.try_update(|s| s.show_minimization_view(view)).flatten() else {
			return;
		};

		let ctl = *self;
		spawn_local(async move {
			match ctl.client().final_state(&result_id).await {
				Ok(response) => ctl.analysis.update(|s| s.load_final_states(&response.final_states)),
				Err(e) => {
					error!("final state fetch failed: {}", e);
					ctl.log
						.set(Some(LogLine::error(format!("Failed to get final state: {}", e))));
				}
			}
		});
	}

	pub fn toggle_aggregation(&self, aggregated: bool) {
		self.analysis.update(|s| s.set_community_aggregated(aggregated));
		self.actions.set(ActionsPanel::Community { aggregated });
	}

	pub fn aggregate(&self) -> Signal<std::collections::HashSet<String>> {
		let analysis = self.analysis;
		Signal::derive(move || {
			analysis.with(|s| {
				if s.community.active && s.community.aggregated {
					s.community.nodes.clone()
				} else {
					Default::default()
				}
			})
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn animation_state_only_touches_animated_panels() {
		let mut panel = ActionsPanel::Maximization {
			animation: AnimationButton::Idle,
			analyzing_path: false,
		};
		panel.set_animation(AnimationButton::Loaded);
		assert_eq!(
			panel,
			ActionsPanel::Maximization {
				animation: AnimationButton::Loaded,
				analyzing_path: false
			}
		);

		let mut community = ActionsPanel::Community { aggregated: true };
		community.set_animation(AnimationButton::Loading);
		assert_eq!(community, ActionsPanel::Community { aggregated: true });
	}
}

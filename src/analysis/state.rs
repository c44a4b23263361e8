//! Central store for the last analysis result and the interactive session.

use std::collections::{HashMap, HashSet};

use crate::api::{
	AnalysisMode, CommunityResponse, MaximizationResponse, MinimizationResponse, NodeId, NodeState,
	NodeStatus, RankedNode, SimulationStep,
};
use crate::error::{AppError, AppResult};

use super::colors::{HeatMap, heat_levels};
use super::edges::{EdgeKey, edge_set, path_edges};
use super::timeline::{AnimationKind, Playback};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeActivation {
	pub probability: f64,
	pub status: NodeStatus,
}

impl NodeActivation {
	pub fn new(probability: f64, status: NodeStatus) -> Self {
		Self { probability, status }
	}

	pub fn is_active(&self) -> bool {
		self.status == NodeStatus::Active
	}
}

pub type ProbabilityMap = HashMap<String, NodeActivation>;

pub fn probability_map(states: &[NodeState]) -> ProbabilityMap {
	states
		.iter()
		.map(|ns| (ns.id.to_string(), NodeActivation::new(ns.probability, ns.state)))
		.collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultIds {
	pub maximization: Option<String>,
	pub minimization_original: Option<String>,
	pub minimization_blocked: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MinimizationView {
	Before,
	#[default]
	After,
}

#[derive(Clone, Debug, Default)]
pub struct InteractiveSession {
	pub enabled: bool,
	/// Selection order is kept for display.
	pub seeds: Vec<String>,
	pub blocking: Vec<String>,
	/// Seeds the interactive minimization blocks against.
	pub static_seeds: Vec<String>,
	pub baseline_count: usize,
	pub baseline_active: HashSet<String>,
	pub saved: HashSet<String>,
}

#[derive(Clone, Debug, Default)]
pub struct CommunityView {
	pub active: bool,
	pub nodes: HashSet<String>,
	pub heat: HeatMap,
	pub aggregated: bool,
}

#[derive(Clone, Debug, Default)]
pub struct StepFlash {
	pub activated: HashSet<String>,
	pub recovered: HashSet<String>,
}

#[derive(Clone, Debug, Default)]
pub struct AnalysisState {
	pub mode: AnalysisMode,
	pub probabilities: ProbabilityMap,
	pub heat: HeatMap,
	pub result_ids: ResultIds,
	pub interactive: InteractiveSession,
	pub special_nodes: HashSet<String>,
	pub propagation_links: HashSet<EdgeKey>,
	pub critical_links: HashSet<EdgeKey>,
	pub cut_off_links: HashSet<EdgeKey>,
	/// Cut-off links of the last minimization, restored by the "after" view.
	minimization_cut_offs: HashSet<EdgeKey>,
	pub community: CommunityView,
	pub flash: StepFlash,
	pub recovered: HashSet<String>,
	pub playback: Playback,
}

fn ids(nodes: &[RankedNode]) -> Vec<String> {
	nodes.iter().map(|n| n.id().to_string()).collect()
}

fn toggle(list: &mut Vec<String>, id: String) {
	if let Some(pos) = list.iter().position(|x| *x == id) {
		list.remove(pos);
	} else {
		list.push(id);
	}
}

/// Parses string ids back into backend ids, skipping anything non-numeric.
pub fn node_ids(ids: &[String]) -> Vec<NodeId> {
	ids.iter().filter_map(|id| id.parse().ok()).collect()
}

impl AnalysisState {
	pub fn reset_for_new_analysis(&mut self) {
		self.probabilities.clear();
		self.heat.clear();
		self.result_ids = ResultIds::default();
		self.interactive.baseline_count = 0;
		self.interactive.baseline_active.clear();
		self.interactive.saved.clear();
		self.playback.reset();
		self.flash = StepFlash::default();
		self.recovered.clear();
		self.special_nodes.clear();
		self.propagation_links.clear();
		self.critical_links.clear();
		self.cut_off_links.clear();
		self.minimization_cut_offs.clear();
		self.community = CommunityView::default();
	}

	pub fn set_mode(&mut self, mode: AnalysisMode) {
		self.mode = mode;
	}

	pub fn active_count(&self) -> usize {
		self.probabilities.values().filter(|a| a.is_active()).count()
	}

	pub fn is_active(&self, id: &str) -> bool {
		self.probabilities.get(id).is_some_and(NodeActivation::is_active)
	}

	fn recompute_heat(&mut self) {
		self.heat = heat_levels(&self.probabilities, None);
	}

	pub fn load_final_states(&mut self, states: &[NodeState]) {
		self.probabilities = probability_map(states);
		self.recompute_heat();
	}

	pub fn apply_maximization(&mut self, response: &MaximizationResponse) -> AppResult<String> {
		let result_id = response
			.result_id
			.clone()
			.ok_or_else(|| AppError::invalid_response("maximization result has no result_id"))?;
		self.result_ids.maximization = Some(result_id.clone());
		self.special_nodes = ids(&response.seed_nodes).into_iter().collect();
		self.propagation_links = edge_set(&response.main_propagation_paths);
		Ok(result_id)
	}

	pub fn apply_minimization(&mut self, response: &MinimizationResponse) -> AppResult<(String, String)> {
		let (Some(original), Some(blocked)) = (
			response.original_result_id.clone(),
			response.blocked_result_id.clone(),
		) else {
			return Err(AppError::invalid_response("minimization result is missing result ids"));
		};
		self.result_ids.minimization_original = Some(original.clone());
		self.result_ids.minimization_blocked = Some(blocked.clone());
		self.interactive.static_seeds = ids(&response.seed_nodes);
		self.interactive.blocking = ids(&response.blocking_nodes);
		self.minimization_cut_offs = edge_set(&response.cut_off_paths);
		self.cut_off_links = self.minimization_cut_offs.clone();
		self.special_nodes = self.interactive.blocking.iter().cloned().collect();
		Ok((original, blocked))
	}

	pub fn apply_community(&mut self, response: &CommunityResponse) {
		self.probabilities = probability_map(&response.final_states);
		match response.found_community() {
			Some(community) => {
				let nodes: HashSet<String> = community.node_ids.iter().map(|id| id.to_string()).collect();
				self.community.heat = heat_levels(&self.probabilities, Some(&nodes));
				self.community.nodes = nodes;
				self.community.active = true;
				self.special_nodes = response.seed_nodes.iter().map(|id| id.to_string()).collect();
			}
			None => {
				self.community = CommunityView::default();
				self.special_nodes.clear();
			}
		}
	}

	fn seed_special_nodes(&mut self) {
		for id in &self.special_nodes {
			self.probabilities
				.insert(id.clone(), NodeActivation::new(1.0, NodeStatus::Active));
		}
	}

	pub fn begin_animation(&mut self, kind: AnimationKind) {
		self.playback.prepare(kind);
		self.probabilities.clear();
		self.heat.clear();
		self.recovered.clear();
		self.seed_special_nodes();
		self.recompute_heat();
	}

	pub fn load_animation(&mut self, steps: Vec<SimulationStep>) -> AppResult<()> {
		if steps.is_empty() {
			return Err(AppError::NoAnimationSteps);
		}
		self.playback.load(steps);
		self.show_step(0);
		Ok(())
	}

	pub fn show_step(&mut self, index: usize) -> bool {
		let Some(step) = self.playback.step(index).cloned() else {
			return false;
		};
		self.playback.seek(index);
		self.probabilities.clear();
		self.seed_special_nodes();
		for ns in &step.node_states {
			self.probabilities
				.insert(ns.id.to_string(), NodeActivation::new(ns.probability, ns.state));
		}
		self.recompute_heat();

		self.flash.activated = step.newly_activated_nodes.iter().map(|id| id.to_string()).collect();
		self.flash.recovered = step.newly_recovered_nodes.iter().map(|id| id.to_string()).collect();
		self.recovered.extend(self.flash.recovered.iter().cloned());
		true
	}

	pub fn clear_flash(&mut self) {
		self.flash = StepFlash::default();
	}

	pub fn set_interactive(&mut self, enabled: bool) {
		let static_seeds = std::mem::take(&mut self.interactive.static_seeds);
		self.interactive = InteractiveSession {
			enabled,
			static_seeds,
			..InteractiveSession::default()
		};
		self.probabilities.clear();
		self.heat.clear();
		self.special_nodes.clear();
	}

	pub fn toggle_interactive_node(&mut self, id: String) -> bool {
		if !self.interactive.enabled {
			return false;
		}
		let selection = match self.mode {
			AnalysisMode::Minimization => &mut self.interactive.blocking,
			_ => &mut self.interactive.seeds,
		};
		toggle(selection, id);
		self.special_nodes = selection.iter().cloned().collect();
		true
	}

	pub fn set_baseline(&mut self, static_seeds: Vec<String>, states: &[NodeState]) {
		self.interactive.static_seeds = static_seeds;
		self.interactive.baseline_active = states
			.iter()
			.filter(|ns| ns.state == NodeStatus::Active)
			.map(|ns| ns.id.to_string())
			.collect();
		self.interactive.baseline_count = self.interactive.baseline_active.len();
	}

	pub fn clear_interactive_result(&mut self) {
		self.probabilities.clear();
		self.heat.clear();
		self.interactive.saved.clear();
	}

	pub fn apply_interactive_result(&mut self, states: &[NodeState]) {
		self.load_final_states(states);
		if self.mode == AnalysisMode::Minimization {
			let saved = self
				.interactive
				.baseline_active
				.iter()
				.filter(|id| !self.is_active(id))
				.cloned()
				.collect();
			self.interactive.saved = saved;
		}
	}

	pub fn set_critical_path(&mut self, nodes: &[NodeId]) {
		self.critical_links = path_edges(nodes);
	}

	pub fn clear_critical_path(&mut self) {
		self.critical_links.clear();
	}

	/// Switches the minimization scene between the unblocked and blocked
	/// results; returns the result id whose final state should be shown.
	pub fn show_minimization_view(&mut self, view: MinimizationView) -> Option<String> {
		self.recovered.clear();
		match view {
			MinimizationView::Before => {
				self.special_nodes = self.interactive.static_seeds.iter().cloned().collect();
				self.cut_off_links.clear();
				self.result_ids.minimization_original.clone()
			}
			MinimizationView::After => {
				self.special_nodes = self.interactive.blocking.iter().cloned().collect();
				self.cut_off_links = self.minimization_cut_offs.clone();
				self.result_ids.minimization_blocked.clone()
			}
		}
	}

	pub fn set_community_aggregated(&mut self, aggregated: bool) {
		self.community.aggregated = aggregated;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::analysis::colors::HeatLevel;
	use crate::api::{CommunityInfo, InfluenceCount, PathEdge};

	fn ns(id: NodeId, p: f64, active: bool) -> NodeState {
		NodeState {
			id,
			probability: p,
			state: if active { NodeStatus::Active } else { NodeStatus::Inactive },
		}
	}

	fn maximization() -> MaximizationResponse {
		MaximizationResponse {
			result_id: Some("max-1".into()),
			seed_nodes: vec![RankedNode::Ranked { id: 1, priority: 0.5 }],
			final_influence: InfluenceCount { count: 10, ratio: 0.01 },
			message: String::new(),
			main_propagation_paths: vec![PathEdge { source: 7, target: 1 }],
		}
	}

	#[test]
	fn maximization_marks_seeds_and_paths() {
		let mut state = AnalysisState::default();
		assert_eq!(state.apply_maximization(&maximization()).unwrap(), "max-1");
		assert!(state.special_nodes.contains("1"));
		assert!(state.propagation_links.contains(&EdgeKey::new("1", "7")));
	}

	#[test]
	fn maximization_without_id_is_invalid() {
		let mut state = AnalysisState::default();
		let response = MaximizationResponse {
			result_id: None,
			..maximization()
		};
		assert!(matches!(
			state.apply_maximization(&response),
			Err(AppError::InvalidResponse { .. })
		));
	}

	#[test]
	fn reset_keeps_mode_and_selection() {
		let mut state = AnalysisState::default();
		state.set_mode(AnalysisMode::Minimization);
		state.set_interactive(true);
		state.toggle_interactive_node("4".into());
		state.apply_maximization(&maximization()).unwrap();
		state.load_final_states(&[ns(1, 1.0, true)]);
		state.reset_for_new_analysis();
		assert_eq!(state.mode, AnalysisMode::Minimization);
		assert_eq!(state.interactive.blocking, ["4"]);
		assert!(state.probabilities.is_empty() && state.special_nodes.is_empty());
		assert!(state.propagation_links.is_empty());
		assert_eq!(state.result_ids, ResultIds::default());
	}

	#[test]
	fn minimization_views_swap_highlights() {
		let mut state = AnalysisState::default();
		state.set_mode(AnalysisMode::Minimization);
		let response = MinimizationResponse {
			original_result_id: Some("orig".into()),
			blocked_result_id: Some("blk".into()),
			seed_nodes: vec![RankedNode::Bare(3)],
			blocking_nodes: vec![RankedNode::Ranked { id: 8, priority: 1.0 }],
			cut_off_paths: vec![PathEdge { source: 8, target: 2 }],
			..Default::default()
		};
		state.apply_minimization(&response).unwrap();
		assert!(state.special_nodes.contains("8"));

		assert_eq!(state.show_minimization_view(MinimizationView::Before).as_deref(), Some("orig"));
		assert!(state.special_nodes.contains("3") && state.cut_off_links.is_empty());

		assert_eq!(state.show_minimization_view(MinimizationView::After).as_deref(), Some("blk"));
		assert!(state.special_nodes.contains("8"));
		assert!(state.cut_off_links.contains(&EdgeKey::new("2", "8")));
	}

	#[test]
	fn animation_steps_seed_specials_and_flash() {
		let mut state = AnalysisState::default();
		state.apply_maximization(&maximization()).unwrap();
		state.begin_animation(AnimationKind::Propagation);
		assert!(state.is_active("1"));

		let steps = vec![
			SimulationStep::default(),
			SimulationStep {
				step: 1,
				newly_activated_nodes: vec![2],
				newly_recovered_nodes: vec![5],
				node_states: vec![ns(2, 0.7, true), ns(5, 0.1, false)],
			},
		];
		state.load_animation(steps).unwrap();
		assert_eq!(state.playback.current(), 0);
		assert_eq!(state.active_count(), 1);

		assert!(state.show_step(1));
		assert!(state.is_active("2") && state.is_active("1"));
		assert!(state.flash.activated.contains("2"));
		assert!(state.recovered.contains("5"));
		state.clear_flash();
		assert!(state.flash.activated.is_empty());
		assert!(state.recovered.contains("5"));
		assert!(!state.show_step(9));
	}

	#[test]
	fn empty_animation_is_an_error() {
		let mut state = AnalysisState::default();
		assert!(matches!(state.load_animation(Vec::new()), Err(AppError::NoAnimationSteps)));
	}

	#[test]
	fn clicks_toggle_selection_per_mode() {
		let mut state = AnalysisState::default();
		assert!(!state.toggle_interactive_node("1".into()));
		state.set_interactive(true);
		state.toggle_interactive_node("1".into());
		state.toggle_interactive_node("2".into());
		state.toggle_interactive_node("1".into());
		assert_eq!(state.interactive.seeds, ["2"]);
		assert_eq!(state.special_nodes.len(), 1);

		state.set_mode(AnalysisMode::Minimization);
		state.toggle_interactive_node("9".into());
		assert_eq!(state.interactive.blocking, ["9"]);
		assert!(state.special_nodes.contains("9") && !state.special_nodes.contains("2"));
	}

	#[test]
	fn saved_nodes_are_baseline_nodes_no_longer_active() {
		let mut state = AnalysisState::default();
		state.set_mode(AnalysisMode::Minimization);
		state.set_interactive(true);
		state.set_baseline(vec!["1".into()], &[ns(1, 1.0, true), ns(2, 0.6, true), ns(3, 0.5, true)]);
		assert_eq!(state.interactive.baseline_count, 3);

		state.apply_interactive_result(&[ns(1, 1.0, true), ns(2, 0.1, false)]);
		let mut saved: Vec<_> = state.interactive.saved.iter().cloned().collect();
		saved.sort();
		assert_eq!(saved, ["2", "3"]);
	}

	#[test]
	fn community_heat_covers_members_only() {
		let mut state = AnalysisState::default();
		state.set_mode(AnalysisMode::CommunitySearch);
		let response = CommunityResponse {
			community: Some(CommunityInfo {
				node_ids: vec![1, 2, 3],
				average_influence_prob: 0.4,
				node_count: 3,
			}),
			final_states: vec![ns(1, 0.9, true), ns(2, 0.2, false), ns(4, 0.8, true)],
			seed_nodes: vec![1],
			..Default::default()
		};
		state.apply_community(&response);
		assert!(state.community.active);
		assert_eq!(state.community.heat.len(), 3);
		assert_eq!(state.community.heat["3"], HeatLevel::Cold);
		assert_eq!(state.community.heat["1"], HeatLevel::Hot);
		assert!(state.special_nodes.contains("1"));

		state.apply_community(&CommunityResponse::default());
		assert!(!state.community.active && state.special_nodes.is_empty());
	}

	#[test]
	fn critical_path_links_follow_path() {
		let mut state = AnalysisState::default();
		state.set_critical_path(&[5, 3, 9]);
		assert!(state.critical_links.contains(&EdgeKey::new("3", "5")));
		assert!(state.critical_links.contains(&EdgeKey::new("9", "3")));
		state.clear_critical_path();
		assert!(state.critical_links.is_empty());
	}

	#[test]
	fn toggling_interactive_drops_previous_session() {
		let mut state = AnalysisState::default();
		state.set_mode(AnalysisMode::Minimization);
		state.set_interactive(true);
		state.toggle_interactive_node("4".into());
		state.set_baseline(vec!["1".into()], &[ns(1, 1.0, true), ns(2, 0.6, true)]);
		state.apply_interactive_result(&[ns(1, 1.0, true)]);
		assert!(!state.probabilities.is_empty() && !state.interactive.saved.is_empty());

		state.set_interactive(false);
		assert!(!state.interactive.enabled);
		assert!(state.probabilities.is_empty() && state.heat.is_empty());
		assert!(state.special_nodes.is_empty());
		assert!(state.interactive.blocking.is_empty());
		assert_eq!(state.interactive.baseline_count, 0);
		assert!(state.interactive.baseline_active.is_empty());
		assert!(state.interactive.saved.is_empty());
	}

	#[test]
	fn new_animation_clears_previous_step() {
		let mut state = AnalysisState::default();
		state.apply_maximization(&maximization()).unwrap();
		let steps = vec![
			SimulationStep::default(),
			SimulationStep {
				step: 1,
				newly_activated_nodes: vec![2],
				newly_recovered_nodes: vec![5],
				node_states: vec![ns(2, 0.7, true), ns(5, 0.1, false)],
			},
		];
		state.load_animation(steps).unwrap();
		state.show_step(1);
		assert_eq!(state.playback.play(), Some(0));
		assert!(state.is_active("2") && state.recovered.contains("5"));

		state.begin_animation(AnimationKind::Blocking);
		assert!(!state.playback.is_playing());
		assert_eq!(state.playback.kind(), Some(AnimationKind::Blocking));
		assert!(state.recovered.is_empty());
		assert!(!state.probabilities.contains_key("2") && !state.heat.contains_key("2"));
		assert_eq!(state.active_count(), 1);
		assert!(state.is_active("1"));
	}

	#[test]
	fn minimization_without_blocked_id_is_invalid() {
		let mut state = AnalysisState::default();
		let response = MinimizationResponse {
			original_result_id: Some("orig".into()),
			blocked_result_id: None,
			blocking_nodes: vec![RankedNode::Bare(8)],
			..Default::default()
		};
		assert!(matches!(
			state.apply_minimization(&response),
			Err(AppError::InvalidResponse { .. })
		));
		assert_eq!(state.result_ids, ResultIds::default());
		assert!(state.special_nodes.is_empty());
	}
}

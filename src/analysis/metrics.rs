//! Figures shown in the results panel: key metrics, pie segments, timelines
//! and the legend.

use crate::api::{AnalysisMode, CommunityResponse, MaximizationResponse, MinimizationResponse, SimulationStep};
use crate::config::Palette;

use super::colors::heat_counts;
use super::state::AnalysisState;

#[derive(Clone, Debug, PartialEq)]
pub struct PieSlice {
	pub label: &'static str,
	pub value: u64,
	pub color: &'static str,
}

/// `(step index, value)` pairs for the timeline chart.
pub type Series = Vec<(usize, u64)>;

#[derive(Clone, Debug, PartialEq)]
pub struct MaximizationSummary {
	pub seeds: Vec<String>,
	pub high: u64,
	pub mid: u64,
	pub low: u64,
	pub total_nodes: u64,
	/// `None` in interactive mode, which has no timeline.
	pub timeline: Option<Series>,
}

impl MaximizationSummary {
	pub fn from_result(state: &AnalysisState, response: &MaximizationResponse, steps: &[SimulationStep], total_nodes: usize) -> Self {
		let (high, mid, low) = heat_counts(state.heat.values());
		let seeds: Vec<String> = response.seed_nodes.iter().map(|n| n.id().to_string()).collect();
		Self {
			timeline: Some(propagation_series(steps, state.special_nodes.len())),
			seeds,
			high,
			mid,
			low,
			total_nodes: total_nodes as u64,
		}
	}

	pub fn interactive(state: &AnalysisState, total_nodes: usize) -> Self {
		let (high, mid, low) = heat_counts(state.heat.values());
		Self {
			seeds: state.interactive.seeds.clone(),
			high,
			mid,
			low,
			total_nodes: total_nodes as u64,
			timeline: None,
		}
	}

	pub fn seed_count(&self) -> u64 {
		self.seeds.len() as u64
	}

	pub fn influenced(&self) -> u64 {
		self.high + self.mid + self.low + self.seed_count()
	}

	pub fn ratio(&self) -> f64 {
		percent(self.influenced(), self.total_nodes)
	}

	pub fn slices(&self, palette: &Palette) -> Vec<PieSlice> {
		let rest = if self.timeline.is_some() { "Uninfluenced" } else { "Unaffected" };
		vec![
			slice("High Influenced", self.high, palette.heat.hot),
			slice("Medium Influenced", self.mid, palette.heat.mid),
			slice("Low Influenced", self.low, palette.heat.cold),
			slice("Seed Nodes", self.seed_count(), palette.seed_node),
			slice(rest, self.total_nodes.saturating_sub(self.influenced()), palette.inactive),
		]
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct MinimizationSummary {
	pub blocking: Vec<String>,
	/// Influenced count without blocking (baseline in interactive mode).
	pub before: u64,
	pub still_influenced: u64,
	pub total_nodes: u64,
	pub timeline: Option<Series>,
}

impl MinimizationSummary {
	pub fn from_result(response: &MinimizationResponse, steps: &[SimulationStep], total_nodes: usize) -> Self {
		Self {
			blocking: response.blocking_nodes.iter().map(|n| n.id().to_string()).collect(),
			before: response.influence_before.count,
			still_influenced: response.influence_after.count,
			total_nodes: total_nodes as u64,
			timeline: Some(saved_series(steps)),
		}
	}

	pub fn interactive(state: &AnalysisState, total_nodes: usize) -> Self {
		Self {
			blocking: state.interactive.blocking.clone(),
			before: state.interactive.baseline_count as u64,
			still_influenced: state.active_count() as u64,
			total_nodes: total_nodes as u64,
			timeline: None,
		}
	}

	pub fn saved(&self) -> u64 {
		self.before.saturating_sub(self.still_influenced)
	}

	pub fn ratio(&self) -> f64 {
		percent(self.saved(), self.before)
	}

	pub fn slices(&self, palette: &Palette) -> Vec<PieSlice> {
		vec![
			slice("Saved Nodes", self.saved(), palette.recovered),
			slice("Still Influenced", self.still_influenced, palette.heat.hot),
			slice("Uninfluenced", self.total_nodes.saturating_sub(self.before), palette.inactive),
		]
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct CommunitySummary {
	pub algorithm: &'static str,
	pub params: String,
	pub node_count: u64,
	pub total_nodes: u64,
	pub average_probability: f64,
	pub seeds: Vec<String>,
	pub high: u64,
	pub mid: u64,
	pub low: u64,
	pub message: String,
}

impl CommunitySummary {
	pub fn from_result(
		state: &AnalysisState,
		response: &CommunityResponse,
		algorithm: &'static str,
		params: String,
		total_nodes: usize,
	) -> Self {
		let community = response.found_community();
		let (high, mid, low) = heat_counts(state.community.heat.values());
		Self {
			algorithm,
			params,
			node_count: community.map_or(0, |c| c.node_count),
			total_nodes: total_nodes as u64,
			average_probability: community.map_or(0.0, |c| c.average_influence_prob),
			seeds: response.seed_nodes.iter().map(|id| id.to_string()).collect(),
			high,
			mid,
			low,
			message: response.message.clone(),
		}
	}

	pub fn found(&self) -> bool {
		self.node_count > 0
	}

	pub fn graph_ratio(&self) -> f64 {
		percent(self.node_count, self.total_nodes)
	}

	pub fn empty_message(&self) -> &str {
		if self.message.is_empty() {
			"No community found."
		} else {
			&self.message
		}
	}

	pub fn slices(&self, palette: &Palette) -> Vec<PieSlice> {
		if !self.found() {
			return Vec::new();
		}
		vec![
			slice("High-Influenced", self.high, palette.community.hot),
			slice("Mid-Influenced", self.mid, palette.community.mid),
			slice("Low-Influenced", self.low, palette.community.cold),
			slice("Outside Community", self.total_nodes.saturating_sub(self.node_count), palette.inactive),
		]
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ResultPanel {
	#[default]
	Idle,
	Message(String),
	Failed {
		title: &'static str,
		message: String,
	},
	Maximization(MaximizationSummary),
	Minimization(MinimizationSummary),
	Community(CommunitySummary),
}

fn slice(label: &'static str, value: u64, color: &'static str) -> PieSlice {
	PieSlice { label, value, color }
}

fn percent(part: u64, whole: u64) -> f64 {
	if whole == 0 {
		return 0.0;
	}
	part as f64 / whole as f64 * 100.0
}

/// Influenced nodes per step: active states in the snapshot plus the seeds.
pub fn propagation_series(steps: &[SimulationStep], seed_count: usize) -> Series {
	steps
		.iter()
		.enumerate()
		.map(|(i, step)| (i, (step.active_count() + seed_count) as u64))
		.collect()
}

pub fn saved_series(steps: &[SimulationStep]) -> Series {
	steps
		.iter()
		.scan(0u64, |total, step| {
			*total += step.newly_recovered_nodes.len() as u64;
			Some(*total)
		})
		.enumerate()
		.collect()
}

pub fn format_count(n: u64) -> String {
	let digits = n.to_string();
	let mut out = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, c) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			out.push(',');
		}
		out.push(c);
	}
	out
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegendKind {
	Node,
	Line,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegendItem {
	pub label: &'static str,
	pub color: &'static str,
	pub kind: LegendKind,
}

pub fn legend_items(mode: AnalysisMode, palette: &Palette) -> Vec<LegendItem> {
	let node = |label, color| LegendItem {
		label,
		color,
		kind: LegendKind::Node,
	};
	let line = |label, color| LegendItem {
		label,
		color,
		kind: LegendKind::Line,
	};
	match mode {
		AnalysisMode::Maximization => vec![
			node("High Influenced Node", palette.heat.hot),
			node("Medium Influenced Node", palette.heat.mid),
			node("Low Influenced Node", palette.heat.cold),
			node("Seed Node", palette.seed_node),
			line("Main Propagation Path", palette.propagation),
			line("Critical Chain", palette.critical_path),
		],
		AnalysisMode::Minimization => vec![
			node("High Influenced Node", palette.heat.hot),
			node("Medium Influenced Node", palette.heat.mid),
			node("Low Influenced Node", palette.heat.cold),
			node("Blocking Node", palette.blocking_node),
			node("Recovered Node", palette.recovered),
			line("Cut-off Path", palette.cut_off),
		],
		AnalysisMode::CommunitySearch => vec![
			node("High Influenced Node", palette.community.hot),
			node("Medium Influenced Node", palette.community.mid),
			node("Low Influenced Node", palette.community.cold),
			node("Seed Node", palette.seed_node),
			node("Inactive Node", palette.inactive),
		],
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::analysis::colors::HeatLevel;
	use crate::api::{CommunityInfo, InfluenceCount, NodeState, NodeStatus, RankedNode};
	use crate::config::LIGHT;

	fn step(active: usize, recovered: usize) -> SimulationStep {
		SimulationStep {
			node_states: (0..active as u64)
				.map(|id| NodeState {
					id,
					state: NodeStatus::Active,
					probability: 0.5,
				})
				.collect(),
			newly_recovered_nodes: (0..recovered as u64).collect(),
			..Default::default()
		}
	}

	#[test]
	fn maximization_result_renders_five_segments() {
		let mut state = AnalysisState::default();
		state.heat.insert("1".into(), HeatLevel::Hot);
		state.heat.insert("2".into(), HeatLevel::Cold);
		state.heat.insert("3".into(), HeatLevel::Cold);
		state.special_nodes.insert("9".into());
		let response = MaximizationResponse {
			result_id: Some("r".into()),
			seed_nodes: vec![RankedNode::Ranked { id: 9, priority: 1.0 }],
			..Default::default()
		};
		let summary = MaximizationSummary::from_result(&state, &response, &[step(0, 0), step(3, 0)], 100);
		assert_eq!(summary.influenced(), 4);
		assert_eq!(format!("{:.1}", summary.ratio()), "4.0");

		let slices = summary.slices(&LIGHT);
		assert_eq!(slices.len(), 5);
		assert_eq!(slices.iter().map(|s| s.value).collect::<Vec<_>>(), [1, 0, 2, 1, 96]);
		assert_eq!(slices[4].label, "Uninfluenced");
		assert_eq!(summary.timeline, Some(vec![(0, 1), (1, 4)]));
	}

	#[test]
	fn interactive_maximization_uses_selection() {
		let mut state = AnalysisState::default();
		state.interactive.seeds = vec!["4".into(), "2".into()];
		let summary = MaximizationSummary::interactive(&state, 10);
		assert_eq!(summary.influenced(), 2);
		assert_eq!(summary.slices(&LIGHT)[4].label, "Unaffected");
		assert!(summary.timeline.is_none());
	}

	#[test]
	fn minimization_counts_saved_nodes() {
		let response = MinimizationResponse {
			influence_before: InfluenceCount { count: 200, ratio: 0.2 },
			influence_after: InfluenceCount { count: 150, ratio: 0.15 },
			blocking_nodes: vec![RankedNode::Bare(3)],
			..Default::default()
		};
		let summary = MinimizationSummary::from_result(&response, &[step(0, 2), step(0, 0), step(0, 5)], 1000);
		assert_eq!(summary.saved(), 50);
		assert_eq!(format!("{:.1}", summary.ratio()), "25.0");
		let slices = summary.slices(&LIGHT);
		assert_eq!(slices.iter().map(|s| s.value).collect::<Vec<_>>(), [50, 150, 800]);
		assert_eq!(summary.timeline, Some(vec![(0, 2), (1, 2), (2, 7)]));
	}

	#[test]
	fn interactive_minimization_never_goes_negative() {
		let mut state = AnalysisState::default();
		state.interactive.baseline_count = 0;
		state
			.probabilities
			.insert("1".into(), crate::analysis::state::NodeActivation::new(1.0, NodeStatus::Active));
		let summary = MinimizationSummary::interactive(&state, 10);
		assert_eq!(summary.saved(), 0);
		assert_eq!(summary.ratio(), 0.0);
	}

	#[test]
	fn community_without_members_has_no_chart() {
		let state = AnalysisState::default();
		let response = CommunityResponse {
			community: Some(CommunityInfo::default()),
			..Default::default()
		};
		let summary = CommunitySummary::from_result(&state, &response, "k-core", "k=3".into(), 50);
		assert!(!summary.found());
		assert!(summary.slices(&LIGHT).is_empty());
		assert_eq!(summary.empty_message(), "No community found.");
	}

	#[test]
	fn community_pie_has_four_segments() {
		let mut state = AnalysisState::default();
		state.community.heat.insert("1".into(), HeatLevel::Hot);
		state.community.heat.insert("2".into(), HeatLevel::Mid);
		let response = CommunityResponse {
			community: Some(CommunityInfo {
				node_ids: vec![1, 2],
				average_influence_prob: 0.1234,
				node_count: 2,
			}),
			seed_nodes: vec![1],
			..Default::default()
		};
		let summary = CommunitySummary::from_result(&state, &response, "k-core", "k=3".into(), 8);
		let values: Vec<u64> = summary.slices(&LIGHT).iter().map(|s| s.value).collect();
		assert_eq!(values, [1, 1, 0, 6]);
		assert_eq!(format!("{:.1}", summary.graph_ratio()), "25.0");
	}

	#[test]
	fn counts_get_thousands_separators() {
		assert_eq!(format_count(0), "0");
		assert_eq!(format_count(999), "999");
		assert_eq!(format_count(1000), "1,000");
		assert_eq!(format_count(1234567), "1,234,567");
	}

	#[test]
	fn legend_matches_mode() {
		let items = legend_items(AnalysisMode::Minimization, &LIGHT);
		assert!(items.iter().any(|i| i.label == "Blocking Node"));
		assert_eq!(items.iter().filter(|i| i.kind == LegendKind::Line).count(), 1);
		assert_eq!(legend_items(AnalysisMode::CommunitySearch, &LIGHT).len(), 5);
	}
}

//! Request and response bodies of the influence analysis backend.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

pub type NodeId = u64;

#[derive(
	Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnalysisMode {
	#[default]
	Maximization,
	Minimization,
	CommunitySearch,
}

impl AnalysisMode {
	pub fn label(self) -> &'static str {
		match self {
			AnalysisMode::Maximization => "Influence Maximization",
			AnalysisMode::Minimization => "Influence Minimization",
			AnalysisMode::CommunitySearch => "Community Search",
		}
	}

	pub fn run_label(self) -> &'static str {
		match self {
			AnalysisMode::Maximization => "Run Influence Maximization",
			AnalysisMode::Minimization => "Run Influence Minimization",
			AnalysisMode::CommunitySearch => "Community Search",
		}
	}

	pub fn supports_interactive(self) -> bool {
		self != AnalysisMode::CommunitySearch
	}
}

#[derive(
	Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumIter, EnumString,
)]
pub enum PropagationModel {
	#[default]
	IC,
	LT,
}

#[derive(
	Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumIter, EnumString,
)]
pub enum ProbabilityModel {
	#[default]
	WC,
	TR,
	CO,
}

#[derive(
	Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum SeedGenerationMode {
	Imm,
	#[default]
	Random,
}

#[derive(
	Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CommunityAlgorithm {
	#[default]
	KlCore,
	KCore,
	KTruss,
}

impl CommunityAlgorithm {
	pub fn label(self) -> &'static str {
		match self {
			CommunityAlgorithm::KlCore => "(k, l)-core",
			CommunityAlgorithm::KCore => "k-core",
			CommunityAlgorithm::KTruss => "k-truss",
		}
	}

	pub fn uses_l_param(self) -> bool {
		self == CommunityAlgorithm::KlCore
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InfluenceParams {
	pub propagation_model: PropagationModel,
	pub budget: u32,
	pub probability_model: ProbabilityModel,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub neg_num: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub seed_generation_mode: Option<SeedGenerationMode>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub seed_nodes: Option<Vec<NodeId>>,
}

/// Body of `POST /api/influence/run`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InfluenceRequest {
	pub dataset_id: String,
	pub mode: AnalysisMode,
	pub params: InfluenceParams,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CalculateRequest {
	pub dataset_id: String,
	pub propagation_model: PropagationModel,
	pub probability_model: ProbabilityModel,
	pub seed_nodes: Vec<NodeId>,
	pub blocking_nodes: Vec<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommunityRequest {
	pub dataset_id: String,
	pub propagation_model: PropagationModel,
	pub probability_model: ProbabilityModel,
	pub seed_budget: u32,
	pub seed_generation_mode: SeedGenerationMode,
	pub seed_nodes: Vec<NodeId>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub k_core: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub l_core: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub k_truss: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BlockingAnimationRequest {
	pub original_result_id: String,
	pub blocked_result_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CriticalPathRequest {
	#[serde(rename = "type")]
	pub kind: String,
}

impl Default for CriticalPathRequest {
	fn default() -> Self {
		Self {
			kind: "deepest".into(),
		}
	}
}

/// A seed or blocking node. Maximization and blocking lists carry a
/// priority, minimization seed lists are bare ids.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RankedNode {
	Ranked {
		id: NodeId,
		#[serde(default)]
		priority: f64,
	},
	Bare(NodeId),
}

impl RankedNode {
	pub fn id(&self) -> NodeId {
		match self {
			RankedNode::Ranked { id, .. } | RankedNode::Bare(id) => *id,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct InfluenceCount {
	pub count: u64,
	#[serde(default)]
	pub ratio: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct PathEdge {
	pub source: NodeId,
	pub target: NodeId,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct MaximizationResponse {
	pub result_id: Option<String>,
	#[serde(default)]
	pub seed_nodes: Vec<RankedNode>,
	#[serde(default)]
	pub final_influence: InfluenceCount,
	#[serde(default)]
	pub message: String,
	#[serde(default)]
	pub main_propagation_paths: Vec<PathEdge>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct MinimizationResponse {
	pub original_result_id: Option<String>,
	pub blocked_result_id: Option<String>,
	#[serde(default)]
	pub seed_nodes: Vec<RankedNode>,
	#[serde(default)]
	pub blocking_nodes: Vec<RankedNode>,
	#[serde(default)]
	pub influence_before: InfluenceCount,
	#[serde(default)]
	pub influence_after: InfluenceCount,
	#[serde(default)]
	pub reduction_ratio: f64,
	#[serde(default)]
	pub cut_off_paths: Vec<PathEdge>,
	#[serde(default)]
	pub message: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
	Active,
	#[default]
	Inactive,
	#[serde(other)]
	Unknown,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NodeState {
	pub id: NodeId,
	pub state: NodeStatus,
	pub probability: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct FinalStateResponse {
	#[serde(default)]
	pub result_id: String,
	#[serde(default)]
	pub total_influence: f64,
	#[serde(default)]
	pub final_states: Vec<NodeState>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SimulationStep {
	#[serde(default)]
	pub step: u32,
	#[serde(default)]
	pub newly_activated_nodes: Vec<NodeId>,
	#[serde(default)]
	pub newly_recovered_nodes: Vec<NodeId>,
	#[serde(default)]
	pub node_states: Vec<NodeState>,
}

impl SimulationStep {
	pub fn active_count(&self) -> usize {
		self.node_states
			.iter()
			.filter(|ns| ns.state == NodeStatus::Active)
			.count()
	}
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AnimationResponse {
	#[serde(default)]
	pub result_id: String,
	#[serde(default)]
	pub total_steps: u32,
	#[serde(default)]
	pub simulation_steps: Vec<SimulationStep>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CommunityInfo {
	#[serde(default)]
	pub node_ids: Vec<NodeId>,
	#[serde(default)]
	pub average_influence_prob: f64,
	#[serde(default)]
	pub node_count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CommunityResponse {
	#[serde(default)]
	pub result_id: String,
	pub community: Option<CommunityInfo>,
	#[serde(default)]
	pub message: String,
	#[serde(default)]
	pub final_states: Vec<NodeState>,
	#[serde(default)]
	pub seed_nodes: Vec<NodeId>,
}

impl CommunityResponse {
	pub fn found_community(&self) -> Option<&CommunityInfo> {
		self.community.as_ref().filter(|c| c.node_count > 0)
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CriticalPath {
	pub nodes: Vec<NodeId>,
	#[serde(default)]
	pub score: f64,
	#[serde(rename = "type", default)]
	pub kind: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CriticalPathResponse {
	#[serde(default)]
	pub result_id: String,
	#[serde(default)]
	pub critical_paths: Vec<CriticalPath>,
	#[serde(default)]
	pub message: String,
}

#[cfg(test)]
mod tests {
	use std::str::FromStr;

	use serde_json::json;

	use super::*;

	#[test]
	fn minimization_accepts_bare_and_ranked_nodes() {
		let body = json!({
			"original_result_id": "a",
			"blocked_result_id": "b",
			"seed_nodes": [3, 9],
			"blocking_nodes": [{"id": 5, "priority": 0.8}],
			"influence_before": {"count": 120, "ratio": 0.12},
			"influence_after": {"count": 80, "ratio": 0.08},
			"reduction_ratio": 0.33,
			"cut_off_paths": [{"source": 5, "target": 2}],
			"message": "ok"
		});
		let resp: MinimizationResponse = serde_json::from_value(body).unwrap();
		assert_eq!(resp.seed_nodes.iter().map(RankedNode::id).collect::<Vec<_>>(), [3, 9]);
		assert_eq!(resp.blocking_nodes[0].id(), 5);
		assert_eq!(resp.influence_before.count - resp.influence_after.count, 40);
	}

	#[test]
	fn unknown_node_status_does_not_fail_decoding() {
		let step: SimulationStep = serde_json::from_value(json!({
			"step": 2,
			"node_states": [
				{"id": 1, "state": "active", "probability": 0.9},
				{"id": 2, "state": "blocked", "probability": 0.0}
			]
		}))
		.unwrap();
		assert_eq!(step.node_states[1].state, NodeStatus::Unknown);
		assert_eq!(step.active_count(), 1);
		assert!(step.newly_recovered_nodes.is_empty());
	}

	#[test]
	fn empty_community_is_not_found() {
		let resp: CommunityResponse = serde_json::from_value(json!({
			"community": {"node_ids": [], "average_influence_prob": 0.0, "node_count": 0},
			"message": "No (k,l)-core found"
		}))
		.unwrap();
		assert!(resp.found_community().is_none());
	}

	#[test]
	fn form_values_round_trip_through_strum() {
		assert_eq!(AnalysisMode::from_str("community_search").unwrap(), AnalysisMode::CommunitySearch);
		assert_eq!(SeedGenerationMode::Imm.as_ref(), "IMM");
		assert_eq!(CommunityAlgorithm::KTruss.to_string(), "k_truss");
		assert_eq!(ProbabilityModel::from_str("TR").unwrap(), ProbabilityModel::TR);
	}

	#[test]
	fn critical_path_request_defaults_to_deepest() {
		let body = serde_json::to_value(CriticalPathRequest::default()).unwrap();
		assert_eq!(body, json!({"type": "deepest"}));
	}
}

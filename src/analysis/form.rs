use crate::api::{
	AnalysisMode, CalculateRequest, CommunityAlgorithm, CommunityRequest, InfluenceParams, InfluenceRequest,
	NodeId, ProbabilityModel, PropagationModel, SeedGenerationMode,
};

#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisForm {
	pub dataset_id: String,
	pub mode: AnalysisMode,
	pub propagation_model: PropagationModel,
	pub probability_model: ProbabilityModel,
	pub budget: u32,
	pub neg_num: u32,
	pub min_seed_mode: SeedGenerationMode,
	pub seed_nodes: String,
	pub community_algorithm: CommunityAlgorithm,
	pub k_param: u32,
	pub l_param: u32,
	pub cs_seed_mode: SeedGenerationMode,
	pub cs_seed_nodes: String,
}

impl AnalysisForm {
	pub fn new(dataset_id: impl Into<String>) -> Self {
		Self {
			dataset_id: dataset_id.into(),
			mode: AnalysisMode::Maximization,
			propagation_model: PropagationModel::IC,
			probability_model: ProbabilityModel::WC,
			budget: 10,
			neg_num: 10,
			min_seed_mode: SeedGenerationMode::Random,
			seed_nodes: String::new(),
			community_algorithm: CommunityAlgorithm::KlCore,
			k_param: 3,
			l_param: 2,
			cs_seed_mode: SeedGenerationMode::Random,
			cs_seed_nodes: String::new(),
		}
	}

	pub fn budget_label(&self) -> &'static str {
		match self.mode {
			AnalysisMode::Minimization => "Blocking Budget (B)",
			_ => "Seed Budget (K)",
		}
	}

	fn base_params(&self) -> InfluenceParams {
		InfluenceParams {
			propagation_model: self.propagation_model,
			budget: self.budget,
			probability_model: self.probability_model,
			neg_num: None,
			seed_generation_mode: None,
			seed_nodes: None,
		}
	}

	/// Body for `/api/influence/run` in the given mode.
	pub fn influence_request(&self, mode: AnalysisMode) -> InfluenceRequest {
		let mut params = self.base_params();
		if mode == AnalysisMode::Minimization {
			params.neg_num = Some(self.neg_num);
			params.seed_generation_mode = Some(self.min_seed_mode);
			if !self.seed_nodes.trim().is_empty() {
				params.seed_nodes = Some(parse_node_list(&self.seed_nodes));
			}
		}
		InfluenceRequest {
			dataset_id: self.dataset_id.clone(),
			mode,
			params,
		}
	}

	pub fn community_request(&self) -> CommunityRequest {
		let mut request = CommunityRequest {
			dataset_id: self.dataset_id.clone(),
			propagation_model: self.propagation_model,
			probability_model: self.probability_model,
			seed_budget: self.budget,
			seed_generation_mode: self.cs_seed_mode,
			seed_nodes: parse_node_list(&self.cs_seed_nodes),
			k_core: None,
			l_core: None,
			k_truss: None,
		};
		match self.community_algorithm {
			CommunityAlgorithm::KlCore => {
				request.k_core = Some(self.k_param);
				request.l_core = Some(self.l_param);
			}
			CommunityAlgorithm::KCore => request.k_core = Some(self.k_param),
			CommunityAlgorithm::KTruss => request.k_truss = Some(self.k_param),
		}
		request
	}

	pub fn calculate_request(&self, seed_nodes: Vec<NodeId>, blocking_nodes: Vec<NodeId>) -> CalculateRequest {
		CalculateRequest {
			dataset_id: self.dataset_id.clone(),
			propagation_model: self.propagation_model,
			probability_model: self.probability_model,
			seed_nodes,
			blocking_nodes,
		}
	}

	pub fn community_params_label(&self) -> String {
		match self.community_algorithm {
			CommunityAlgorithm::KlCore => format!("k={}, l={}", self.k_param, self.l_param),
			CommunityAlgorithm::KCore => format!("k={}", self.k_param),
			CommunityAlgorithm::KTruss => format!("k={}", self.k_param),
		}
	}
}

/// Comma separated node ids; entries that are not integers are dropped.
pub fn parse_node_list(raw: &str) -> Vec<NodeId> {
	raw.split(',')
		.filter_map(|s| s.trim().parse().ok())
		.collect()
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn node_lists_skip_garbage() {
		assert_eq!(parse_node_list(" 4, 17 ,x, ,9"), [4, 17, 9]);
		assert!(parse_node_list("").is_empty());
	}

	#[test]
	fn maximization_body_has_core_params_only() {
		let form = AnalysisForm::new("facebook");
		let body = serde_json::to_value(form.influence_request(AnalysisMode::Maximization)).unwrap();
		assert_eq!(
			body,
			json!({
				"dataset_id": "facebook",
				"mode": "maximization",
				"params": {"propagation_model": "IC", "budget": 10, "probability_model": "WC"}
			})
		);
	}

	#[test]
	fn minimization_body_adds_blocking_params() {
		let mut form = AnalysisForm::new("facebook");
		form.min_seed_mode = SeedGenerationMode::Imm;
		let body = serde_json::to_value(form.influence_request(AnalysisMode::Minimization)).unwrap();
		assert_eq!(body["params"]["neg_num"], 10);
		assert_eq!(body["params"]["seed_generation_mode"], "IMM");
		assert!(body["params"].get("seed_nodes").is_none());

		form.seed_nodes = "1, 2".into();
		let body = serde_json::to_value(form.influence_request(AnalysisMode::Minimization)).unwrap();
		assert_eq!(body["params"]["seed_nodes"], json!([1, 2]));
	}

	#[test]
	fn community_body_follows_algorithm() {
		let mut form = AnalysisForm::new("facebook");
		let body = serde_json::to_value(form.community_request()).unwrap();
		assert_eq!(body["k_core"], 3);
		assert_eq!(body["l_core"], 2);
		assert_eq!(body["seed_nodes"], json!([]));
		assert_eq!(body["seed_generation_mode"], "RANDOM");

		form.community_algorithm = CommunityAlgorithm::KTruss;
		form.k_param = 4;
		let body = serde_json::to_value(form.community_request()).unwrap();
		assert_eq!(body["k_truss"], 4);
		assert!(body.get("k_core").is_none() && body.get("l_core").is_none());
	}

	#[test]
	fn budget_label_tracks_mode() {
		let mut form = AnalysisForm::new("facebook");
		assert_eq!(form.budget_label(), "Seed Budget (K)");
		form.mode = AnalysisMode::Minimization;
		assert_eq!(form.budget_label(), "Blocking Budget (B)");
	}
}

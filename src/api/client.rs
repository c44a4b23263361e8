use log::debug;
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::*;
use crate::components::force_graph::GraphData;
use crate::error::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
	Run,
	CalculateFromNodes,
	FinalState(String),
	Steps(String),
	BlockingAnimation,
	Community(CommunityAlgorithm),
	CriticalPaths(String),
}

impl Endpoint {
	pub fn path(&self) -> String {
		match self {
			Endpoint::Run => "/api/influence/run".into(),
			Endpoint::CalculateFromNodes => "/api/influence/calculate-from-nodes".into(),
			Endpoint::FinalState(id) => format!("/api/influence/final-state/{}", id),
			Endpoint::Steps(id) => format!("/api/influence/step/{}", id),
			Endpoint::BlockingAnimation => "/api/influence/blocking-animation".into(),
			Endpoint::Community(CommunityAlgorithm::KlCore) => "/api/influence/analysis/kl-core".into(),
			Endpoint::Community(CommunityAlgorithm::KCore) => "/api/influence/analysis/k-core".into(),
			Endpoint::Community(CommunityAlgorithm::KTruss) => "/api/influence/analysis/k-truss".into(),
			Endpoint::CriticalPaths(id) => format!("/api/influence/analysis/critical-paths/{}", id),
		}
	}
}

#[derive(Clone, Debug)]
pub struct ApiClient {
	http: Client,
	base_url: String,
}

impl ApiClient {
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			http: Client::new(),
			base_url: base_url.into().trim_end_matches('/').to_string(),
		}
	}

	pub fn url(&self, endpoint: &Endpoint) -> String {
		format!("{}{}", self.base_url, endpoint.path())
	}

	async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint) -> AppResult<T> {
		let url = self.url(&endpoint);
		debug!("GET {}", url);
		let response = self.http.get(&url).send().await?;
		decode(response).await
	}

	async fn post<B: Serialize, T: DeserializeOwned>(&self, endpoint: Endpoint, body: &B) -> AppResult<T> {
		let url = self.url(&endpoint);
		debug!("POST {}", url);
		let response = self.http.post(&url).json(body).send().await?;
		decode(response).await
	}

	pub async fn run_maximization(&self, request: &InfluenceRequest) -> AppResult<MaximizationResponse> {
		self.post(Endpoint::Run, request).await
	}

	pub async fn run_minimization(&self, request: &InfluenceRequest) -> AppResult<MinimizationResponse> {
		self.post(Endpoint::Run, request).await
	}

	pub async fn calculate_from_nodes(&self, request: &CalculateRequest) -> AppResult<FinalStateResponse> {
		self.post(Endpoint::CalculateFromNodes, request).await
	}

	pub async fn final_state(&self, result_id: &str) -> AppResult<FinalStateResponse> {
		self.get(Endpoint::FinalState(result_id.to_string())).await
	}

	pub async fn animation_steps(&self, result_id: &str) -> AppResult<AnimationResponse> {
		self.get(Endpoint::Steps(result_id.to_string())).await
	}

	pub async fn blocking_animation(&self, original_result_id: &str, blocked_result_id: &str) -> AppResult<AnimationResponse> {
		let body = BlockingAnimationRequest {
			original_result_id: original_result_id.to_string(),
			blocked_result_id: blocked_result_id.to_string(),
		};
		self.post(Endpoint::BlockingAnimation, &body).await
	}

	pub async fn community_search(&self, algorithm: CommunityAlgorithm, request: &CommunityRequest) -> AppResult<CommunityResponse> {
		self.post(Endpoint::Community(algorithm), request).await
	}

	pub async fn critical_paths(&self, result_id: &str) -> AppResult<CriticalPathResponse> {
		self.post(
			Endpoint::CriticalPaths(result_id.to_string()),
			&CriticalPathRequest::default(),
		)
		.await
	}

	pub async fn dataset(&self, url: &str) -> AppResult<GraphData> {
		debug!("GET {}", url);
		let response = self.http.get(absolute_url(url)).send().await?;
		decode(response).await
	}
}

async fn decode<T: DeserializeOwned>(response: Response) -> AppResult<T> {
	let status = response.status();
	let body = response.text().await?;
	if !status.is_success() {
		return Err(AppError::Api {
			status: status.as_u16(),
			body,
		});
	}
	Ok(serde_json::from_str(&body)?)
}

/// reqwest needs absolute URLs; relative dataset paths resolve against the page.
fn absolute_url(url: &str) -> String {
	if url.contains("://") {
		return url.to_string();
	}
	web_sys::window()
		.and_then(|w| w.location().href().ok())
		.and_then(|base| web_sys::Url::new_with_base(url, &base).ok())
		.map(|u| u.href())
		.unwrap_or_else(|| url.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn community_endpoints_follow_algorithm() {
		assert_eq!(
			Endpoint::Community(CommunityAlgorithm::KlCore).path(),
			"/api/influence/analysis/kl-core"
		);
		assert_eq!(
			Endpoint::Community(CommunityAlgorithm::KTruss).path(),
			"/api/influence/analysis/k-truss"
		);
	}

	#[test]
	fn urls_join_without_double_slash() {
		let client = ApiClient::new("http://localhost:5000/");
		assert_eq!(
			client.url(&Endpoint::FinalState("r-42".into())),
			"http://localhost:5000/api/influence/final-state/r-42"
		);
		assert_eq!(
			client.url(&Endpoint::CriticalPaths("r-42".into())),
			"http://localhost:5000/api/influence/analysis/critical-paths/r-42"
		);
	}

	#[test]
	fn absolute_urls_pass_through() {
		assert_eq!(absolute_url("http://cdn/graph.json"), "http://cdn/graph.json");
	}
}

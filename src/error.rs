use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
	#[error("HTTP error: {0}")]
	Http(#[from] reqwest::Error),

	#[error("API Error ({status}): {body}")]
	Api { status: u16, body: String },

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("Configuration error: {0}")]
	Config(#[from] toml::de::Error),

	#[error("Invalid API response format: {message}")]
	InvalidResponse { message: String },

	#[error("No animation steps available.")]
	NoAnimationSteps,

	#[error("Could not find any influential nodes to target.")]
	NoInfluentialNodes,

	#[error("The view was closed before the result arrived.")]
	Disposed,
}

impl AppError {
	pub fn invalid_response(message: impl Into<String>) -> Self {
		Self::InvalidResponse {
			message: message.into(),
		}
	}
}

pub type AppResult<T> = Result<T, AppError>;

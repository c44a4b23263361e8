//! Application configuration and theme palettes.

use log::warn;
use serde::Deserialize;

use crate::error::AppResult;

const EMBEDDED_CONFIG: &str = include_str!("../influence.toml");

/// Runtime settings, read from the embedded `influence.toml`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
	pub api_base_url: String,
	/// `{dataset}` is replaced with the selected dataset id.
	pub dataset_url_template: String,
	pub datasets: Vec<String>,
	pub cache_bust: bool,
	pub debounce_ms: u64,
	pub playback_interval_ms: u64,
	pub flash_ms: u64,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base_url: "http://127.0.0.1:5000".into(),
			dataset_url_template: "../../{dataset}_subset_1000.json".into(),
			datasets: vec!["facebook".into()],
			cache_bust: true,
			debounce_ms: 500,
			playback_interval_ms: 800,
			flash_ms: 600,
		}
	}
}

impl AppConfig {
	pub fn from_toml_str(raw: &str) -> AppResult<Self> {
		Ok(toml::from_str(raw)?)
	}

	/// Embedded config with the build-time `INFLUENCE_API_BASE_URL` override applied.
	pub fn load() -> Self {
		let mut config = Self::from_toml_str(EMBEDDED_CONFIG).unwrap_or_else(|e| {
			warn!("Falling back to default config: {}", e);
			Self::default()
		});
		if let Some(url) = option_env!("INFLUENCE_API_BASE_URL") {
			config.api_base_url = url.to_string();
		}
		config
	}

	pub fn default_dataset(&self) -> String {
		self.datasets.first().cloned().unwrap_or_default()
	}

	pub fn dataset_url(&self, dataset: &str, now_ms: f64) -> String {
		let url = self.dataset_url_template.replace("{dataset}", dataset);
		if self.cache_bust {
			format!("{}?t={}", url, now_ms as u64)
		} else {
			url
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
	#[default]
	Light,
	Dark,
}

impl Theme {
	pub fn palette(self) -> &'static Palette {
		match self {
			Theme::Light => &LIGHT,
			Theme::Dark => &DARK,
		}
	}

	pub fn is_dark(self) -> bool {
		self == Theme::Dark
	}

	pub fn name(self) -> &'static str {
		match self {
			Theme::Light => "light",
			Theme::Dark => "dark",
		}
	}

	pub fn toggled(self) -> Self {
		match self {
			Theme::Light => Theme::Dark,
			Theme::Dark => Theme::Light,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeatPalette {
	pub hot: &'static str,
	pub mid: &'static str,
	pub cold: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
	pub background: &'static str,
	pub text: &'static str,
	pub default: &'static str,
	pub inactive: &'static str,
	pub heat: HeatPalette,
	pub community: HeatPalette,
	pub seed_node: &'static str,
	pub blocking_node: &'static str,
	pub recovered: &'static str,
	pub propagation: &'static str,
	pub critical_path: &'static str,
	pub cut_off: &'static str,
	pub activated_link: &'static str,
	pub inactivated_link: &'static str,
	pub particle: &'static str,
}

pub const LIGHT: Palette = Palette {
	background: "#f7f8fa",
	text: "#444444",
	default: "#9aa5b1",
	inactive: "#d5dae0",
	heat: HeatPalette {
		hot: "#e4572e",
		mid: "#f3a712",
		cold: "#29a4d9",
	},
	community: HeatPalette {
		hot: "#7b2cbf",
		mid: "#c77dff",
		cold: "#e0aaff",
	},
	seed_node: "#d62828",
	blocking_node: "#1d3557",
	recovered: "#2a9d8f",
	propagation: "#f77f00",
	critical_path: "#ff006e",
	cut_off: "#6c757d",
	activated_link: "#f4a261",
	inactivated_link: "#cfd6de",
	particle: "#e76f51",
};

pub const DARK: Palette = Palette {
	background: "#1a1a2e",
	text: "#eeeeee",
	default: "#5c6b7a",
	inactive: "#2f3747",
	heat: HeatPalette {
		hot: "#ff6b6b",
		mid: "#feca57",
		cold: "#48dbfb",
	},
	community: HeatPalette {
		hot: "#b5179e",
		mid: "#7209b7",
		cold: "#4cc9f0",
	},
	seed_node: "#ff4757",
	blocking_node: "#70a1ff",
	recovered: "#2ed573",
	propagation: "#ffa502",
	critical_path: "#ff3f9e",
	cut_off: "#a4b0be",
	activated_link: "rgba(255, 165, 2, 0.7)",
	inactivated_link: "rgba(100, 180, 255, 0.25)",
	particle: "#ffdd59",
};

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn embedded_config_parses() {
		let config = AppConfig::from_toml_str(EMBEDDED_CONFIG).unwrap();
		assert!(!config.datasets.is_empty());
		assert_eq!(config.debounce_ms, 500);
	}

	#[test]
	fn missing_keys_fall_back_to_defaults() {
		let config = AppConfig::from_toml_str("api_base_url = \"http://backend:8080\"").unwrap();
		assert_eq!(config.api_base_url, "http://backend:8080");
		assert_eq!(config.playback_interval_ms, 800);
		assert_eq!(config.flash_ms, 600);
	}

	#[test]
	fn malformed_config_is_an_error() {
		assert!(AppConfig::from_toml_str("debounce_ms = \"soon\"").is_err());
	}

	#[test]
	fn dataset_url_appends_cache_buster() {
		let config = AppConfig::default();
		assert_eq!(
			config.dataset_url("twitter", 1700000000123.0),
			"../../twitter_subset_1000.json?t=1700000000123"
		);
		let plain = AppConfig {
			cache_bust: false,
			..AppConfig::default()
		};
		assert_eq!(plain.dataset_url("twitter", 1.0), "../../twitter_subset_1000.json");
	}
}

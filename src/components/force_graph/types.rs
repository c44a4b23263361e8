use serde::{Deserialize, Deserializer};

/// Dataset ids may be numbers or strings; both become strings.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum RawId {
		Int(i64),
		Float(f64),
		Text(String),
	}
	Ok(match RawId::deserialize(deserializer)? {
		RawId::Int(i) => i.to_string(),
		RawId::Float(f) => f.to_string(),
		RawId::Text(s) => s,
	})
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphNode {
	#[serde(deserialize_with = "id_string")]
	pub id: String,
	#[serde(default)]
	pub label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphLink {
	#[serde(deserialize_with = "id_string")]
	pub source: String,
	#[serde(deserialize_with = "id_string")]
	pub target: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub links: Vec<GraphLink>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	pub color: String,
	/// Volume units; the drawn radius grows with the cube root.
	pub size: f64,
}

impl Default for NodeStyle {
	fn default() -> Self {
		Self {
			color: "#9aa5b1".into(),
			size: 2.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkStyle {
	pub color: String,
	pub width: f64,
	/// Directional particles flowing source → target.
	pub particles: u32,
}

impl Default for LinkStyle {
	fn default() -> Self {
		Self {
			color: "rgba(100, 180, 255, 0.6)".into(),
			width: 1.0,
			particles: 0,
		}
	}
}

/// Asks the canvas to center on a node; a new nonce repeats the request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FocusRequest {
	pub node_id: String,
	pub nonce: u64,
}

pub trait GraphStyler: Send + Sync {
	fn background(&self) -> String;
	fn particle_color(&self) -> String;
	fn node_style(&self, id: &str) -> NodeStyle;
	fn link_style(&self, source: &str, target: &str) -> LinkStyle;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dataset_ids_accept_numbers_and_strings() {
		let data: GraphData = serde_json::from_str(
			r#"{"nodes":[{"id":0},{"id":"b","label":"Bee"}],"links":[{"source":0,"target":"b"}]}"#,
		)
		.unwrap();
		assert_eq!(data.nodes[0].id, "0");
		assert_eq!(data.nodes[1].label.as_deref(), Some("Bee"));
		assert_eq!(data.links[0].source, "0");
		assert_eq!(data.links[0].target, "b");
	}
}

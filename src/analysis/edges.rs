use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use crate::api::{NodeId, PathEdge};

/// Direction-independent edge id, `lo-hi`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(String);

impl EdgeKey {
	pub fn new(a: &str, b: &str) -> Self {
		let (lo, hi) = match compare_ids(a, b) {
			Ordering::Greater => (b, a),
			_ => (a, b),
		};
		Self(format!("{}-{}", lo, hi))
	}

	pub fn from_ids(a: NodeId, b: NodeId) -> Self {
		Self(format!("{}-{}", a.min(b), a.max(b)))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for EdgeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

fn compare_ids(a: &str, b: &str) -> Ordering {
	match (a.parse::<i64>(), b.parse::<i64>()) {
		(Ok(x), Ok(y)) => x.cmp(&y),
		_ => a.cmp(b),
	}
}

pub fn edge_set(edges: &[PathEdge]) -> HashSet<EdgeKey> {
	edges
		.iter()
		.map(|e| EdgeKey::from_ids(e.source, e.target))
		.collect()
}

pub fn path_edges(nodes: &[NodeId]) -> HashSet<EdgeKey> {
	nodes
		.windows(2)
		.map(|pair| EdgeKey::from_ids(pair[0], pair[1]))
		.collect()
}

use std::collections::{HashMap, HashSet};

use crate::config::HeatPalette;

use super::state::ProbabilityMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeatLevel {
	Cold,
	Mid,
	Hot,
}

impl HeatLevel {
	pub fn color(self, palette: &HeatPalette) -> &'static str {
		match self {
			HeatLevel::Cold => palette.cold,
			HeatLevel::Mid => palette.mid,
			HeatLevel::Hot => palette.hot,
		}
	}
}

pub type HeatMap = HashMap<String, HeatLevel>;

/// Below this many nodes buckets are split by rank in thirds.
const PERCENTILE_MIN_NODES: usize = 10;

/// Buckets every active node, or exactly `targets` when given (regardless of
/// status, unknown ids count as probability 0).
pub fn heat_levels(probabilities: &ProbabilityMap, targets: Option<&HashSet<String>>) -> HeatMap {
	let mut nodes: Vec<(&str, f64)> = match targets {
		Some(ids) => ids
			.iter()
			.map(|id| {
				let p = probabilities.get(id).map_or(0.0, |a| a.probability);
				(id.as_str(), p)
			})
			.collect(),
		None => probabilities
			.iter()
			.filter(|(_, a)| a.is_active())
			.map(|(id, a)| (id.as_str(), a.probability))
			.collect(),
	};
	if nodes.is_empty() {
		return HeatMap::new();
	}
	nodes.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));

	let n = nodes.len();
	if n < PERCENTILE_MIN_NODES {
		let (one_third, two_thirds) = (n / 3, n * 2 / 3);
		return nodes
			.into_iter()
			.enumerate()
			.map(|(i, (id, _))| {
				let level = if i < one_third {
					HeatLevel::Cold
				} else if i < two_thirds {
					HeatLevel::Mid
				} else {
					HeatLevel::Hot
				};
				(id.to_string(), level)
			})
			.collect();
	}

	let cold = nodes[n / 10].1;
	let mid = nodes[n / 2].1;
	nodes
		.into_iter()
		.map(|(id, p)| {
			let level = if p <= cold {
				HeatLevel::Cold
			} else if p <= mid {
				HeatLevel::Mid
			} else {
				HeatLevel::Hot
			};
			(id.to_string(), level)
		})
		.collect()
}

pub fn heat_counts<'a>(levels: impl IntoIterator<Item = &'a HeatLevel>) -> (u64, u64, u64) {
	levels
		.into_iter()
		.fold((0, 0, 0), |(h, m, c), level| match level {
			HeatLevel::Hot => (h + 1, m, c),
			HeatLevel::Mid => (h, m + 1, c),
			HeatLevel::Cold => (h, m, c + 1),
		})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::analysis::state::NodeActivation;
	use crate::api::NodeStatus;

	fn map(entries: &[(&str, f64, NodeStatus)]) -> ProbabilityMap {
		entries
			.iter()
			.map(|(id, p, s)| (id.to_string(), NodeActivation::new(*p, *s)))
			.collect()
	}

	#[test]
	fn small_sets_split_by_rank() {
		let probs = map(&[
			("a", 0.9, NodeStatus::Active),
			("b", 0.1, NodeStatus::Active),
			("c", 0.5, NodeStatus::Active),
			("d", 0.2, NodeStatus::Inactive),
		]);
		let heat = heat_levels(&probs, None);
		assert_eq!(heat.len(), 3);
		assert_eq!(heat["b"], HeatLevel::Cold);
		assert_eq!(heat["c"], HeatLevel::Mid);
		assert_eq!(heat["a"], HeatLevel::Hot);
	}

	#[test]
	fn two_nodes_have_no_cold_bucket() {
		let probs = map(&[("a", 0.3, NodeStatus::Active), ("b", 0.6, NodeStatus::Active)]);
		let heat = heat_levels(&probs, None);
		assert_eq!(heat["a"], HeatLevel::Mid);
		assert_eq!(heat["b"], HeatLevel::Hot);
	}

	#[test]
	fn large_sets_use_percentile_thresholds() {
		let entries: Vec<(String, f64)> = (0..20).map(|i| (format!("n{}", i), i as f64 / 20.0)).collect();
		let probs: ProbabilityMap = entries
			.iter()
			.map(|(id, p)| (id.clone(), NodeActivation::new(*p, NodeStatus::Active)))
			.collect();
		let heat = heat_levels(&probs, None);
		// p10 = index 2 (0.10), p50 = index 10 (0.50)
		assert_eq!(heat["n0"], HeatLevel::Cold);
		assert_eq!(heat["n2"], HeatLevel::Cold);
		assert_eq!(heat["n3"], HeatLevel::Mid);
		assert_eq!(heat["n10"], HeatLevel::Mid);
		assert_eq!(heat["n11"], HeatLevel::Hot);
		assert_eq!(heat_counts(heat.values()), (9, 8, 3));
	}

	#[test]
	fn targets_include_inactive_and_missing_nodes() {
		let probs = map(&[("a", 0.8, NodeStatus::Inactive), ("b", 0.4, NodeStatus::Active)]);
		let targets: HashSet<String> = ["a", "b", "zz"].iter().map(|s| s.to_string()).collect();
		let heat = heat_levels(&probs, Some(&targets));
		assert_eq!(heat.len(), 3);
		assert_eq!(heat["zz"], HeatLevel::Cold);
		assert_eq!(heat["b"], HeatLevel::Mid);
		assert_eq!(heat["a"], HeatLevel::Hot);
	}

	#[test]
	fn nothing_active_means_no_colors() {
		let probs = map(&[("a", 0.8, NodeStatus::Inactive)]);
		assert!(heat_levels(&probs, None).is_empty());
	}
}

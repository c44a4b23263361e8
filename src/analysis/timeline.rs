use crate::api::SimulationStep;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationKind {
	Propagation,
	Blocking,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimelineMarker {
	pub index: usize,
	pub completed: bool,
	pub label: Option<&'static str>,
}

/// Step sequence and cursor for the animation timeline. Timers live in the
/// controller; this only decides which step comes next.
#[derive(Clone, Debug, Default)]
pub struct Playback {
	steps: Vec<SimulationStep>,
	current: usize,
	playing: bool,
	kind: Option<AnimationKind>,
}

impl Playback {
	pub fn reset(&mut self) {
		*self = Self::default();
	}

	pub fn prepare(&mut self, kind: AnimationKind) {
		self.pause();
		self.kind = Some(kind);
	}

	pub fn load(&mut self, steps: Vec<SimulationStep>) {
		self.steps = steps;
		self.current = 0;
		self.playing = false;
	}

	pub fn kind(&self) -> Option<AnimationKind> {
		self.kind
	}

	pub fn len(&self) -> usize {
		self.steps.len()
	}

	pub fn is_empty(&self) -> bool {
		self.steps.is_empty()
	}

	pub fn current(&self) -> usize {
		self.current
	}

	pub fn is_playing(&self) -> bool {
		self.playing
	}

	pub fn step(&self, index: usize) -> Option<&SimulationStep> {
		self.steps.get(index)
	}

	pub fn seek(&mut self, index: usize) -> bool {
		if index >= self.steps.len() {
			return false;
		}
		self.current = index;
		true
	}

	/// Starts playing and returns the first step to show. Restarts from the
	/// beginning when the cursor sits on the last step.
	pub fn play(&mut self) -> Option<usize> {
		if self.playing || self.steps.is_empty() {
			return None;
		}
		self.playing = true;
		if self.current + 1 >= self.steps.len() {
			Some(0)
		} else {
			Some(self.current + 1)
		}
	}

	/// Next step of a running playback, or `None` once the end is reached
	/// (which also stops playing).
	pub fn advance(&mut self) -> Option<usize> {
		if !self.playing {
			return None;
		}
		let next = self.current + 1;
		if next >= self.steps.len() {
			self.playing = false;
			return None;
		}
		Some(next)
	}

	pub fn pause(&mut self) -> bool {
		std::mem::replace(&mut self.playing, false)
	}

	pub fn step_forward(&mut self) -> Option<usize> {
		if self.steps.is_empty() {
			return None;
		}
		self.pause();
		let next = (self.current + 1).min(self.steps.len() - 1);
		(next != self.current).then_some(next)
	}

	pub fn progress(&self) -> f64 {
		if self.steps.len() <= 1 {
			return 0.0;
		}
		self.current as f64 / (self.steps.len() - 1) as f64
	}

	/// Track markers; empty for sequences too short to scrub.
	pub fn markers(&self) -> Vec<TimelineMarker> {
		let total = self.steps.len();
		if total <= 1 {
			return Vec::new();
		}
		(0..total)
			.map(|index| TimelineMarker {
				index,
				completed: index <= self.current,
				label: match index {
					0 => Some("Start"),
					i if i == total - 1 => Some("End"),
					_ => None,
				},
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn playback(n: usize) -> Playback {
		let mut p = Playback::default();
		p.prepare(AnimationKind::Propagation);
		p.load((0..n).map(|i| SimulationStep { step: i as u32, ..Default::default() }).collect());
		p
	}

	#[test]
	fn play_runs_to_the_end_then_stops() {
		let mut p = playback(3);
		assert_eq!(p.play(), Some(1));
		assert!(p.seek(1));
		assert_eq!(p.advance(), Some(2));
		assert!(p.seek(2));
		assert_eq!(p.advance(), None);
		assert!(!p.is_playing());
	}

	#[test]
	fn play_at_end_restarts_from_first_step() {
		let mut p = playback(3);
		p.seek(2);
		assert_eq!(p.play(), Some(0));
	}

	#[test]
	fn play_is_ignored_while_playing() {
		let mut p = playback(3);
		assert!(p.play().is_some());
		assert_eq!(p.play(), None);
		assert!(p.pause());
		assert!(!p.pause());
	}

	#[test]
	fn step_forward_pauses_and_clamps() {
		let mut p = playback(2);
		p.play();
		assert_eq!(p.step_forward(), Some(1));
		assert!(!p.is_playing());
		p.seek(1);
		assert_eq!(p.step_forward(), None);
	}

	#[test]
	fn markers_only_for_scrubbable_sequences() {
		assert!(playback(1).markers().is_empty());
		let mut p = playback(4);
		p.seek(2);
		let markers = p.markers();
		assert_eq!(markers.len(), 4);
		assert_eq!(markers[0].label, Some("Start"));
		assert_eq!(markers[3].label, Some("End"));
		assert!(markers[2].completed && !markers[3].completed);
		assert!((p.progress() - 2.0 / 3.0).abs() < 1e-9);
	}

	#[test]
	fn seek_out_of_range_is_ignored() {
		let mut p = playback(2);
		assert!(!p.seek(5));
		assert_eq!(p.current(), 0);
	}
}

//! Cooperative position animation.
//!
//! The runtime holds an explicit list of in-flight tracks. The host drives it
//! by calling [`AnimationRuntime::step`] once per frame with the frame
//! timestamp; it never schedules anything itself. Each track starts its
//! clock on the first frame it sees, so a retargeted track restarts from
//! where it currently is instead of jumping.

use serde::Deserialize;

use super::types::{ItemId, Point};

/// Easing curves for position transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
	/// Constant speed.
	#[default]
	#[serde(alias = "easeLinear")]
	Linear,
	/// Quadratic, accelerating.
	EaseInQuad,
	/// Quadratic, decelerating.
	EaseOutQuad,
	/// Quadratic, accelerating then decelerating.
	#[serde(alias = "easeQuad")]
	EaseInOutQuad,
	/// Cubic, accelerating.
	EaseInCubic,
	/// Cubic, decelerating.
	EaseOutCubic,
	/// Cubic, accelerating then decelerating.
	#[serde(alias = "easeCubic")]
	EaseInOutCubic,
}

impl Easing {
	/// Map linear progress `t` in `[0, 1]` onto the curve.
	pub fn apply(self, t: f64) -> f64 {
		let t = t.clamp(0.0, 1.0);
		match self {
			Easing::Linear => t,
			Easing::EaseInQuad => t * t,
			Easing::EaseOutQuad => t * (2.0 - t),
			Easing::EaseInOutQuad => {
				if t < 0.5 {
					2.0 * t * t
				} else {
					-1.0 + (4.0 - 2.0 * t) * t
				}
			}
			Easing::EaseInCubic => t * t * t,
			Easing::EaseOutCubic => {
				let u = t - 1.0;
				u * u * u + 1.0
			}
			Easing::EaseInOutCubic => {
				if t < 0.5 {
					4.0 * t * t * t
				} else {
					let u = 2.0 * t - 2.0;
					0.5 * u * u * u + 1.0
				}
			}
		}
	}
}

/// What a per-frame callback sees for one item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSample<'a> {
	/// Item being moved.
	pub id: &'a str,
	/// Eased progress in `[0, 1]`.
	pub ratio: f64,
	/// Where the track started.
	pub from: Point,
	/// Where the track ends.
	pub to: Point,
	/// The interpolated position the runtime would use.
	pub current: Point,
}

/// Optional per-frame override: return a position to use instead of the
/// interpolated one.
pub type FrameCallback = Box<dyn FnMut(&FrameSample<'_>) -> Option<Point>>;

#[derive(Clone, Debug, PartialEq)]
struct Track {
	id: ItemId,
	from: Point,
	to: Point,
	current: Point,
	started_at: Option<f64>,
}

/// Result of advancing the runtime by one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct FrameStep {
	/// New position for every in-flight item.
	pub positions: Vec<(ItemId, Point)>,
	/// The last track completed on this frame.
	pub finished: bool,
}

/// In-flight position animations.
pub(crate) struct AnimationRuntime {
	tracks: Vec<Track>,
	duration: f64,
	easing: Easing,
	on_frame: Option<FrameCallback>,
}

impl std::fmt::Debug for AnimationRuntime {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AnimationRuntime")
			.field("tracks", &self.tracks)
			.field("duration", &self.duration)
			.field("easing", &self.easing)
			.field("on_frame", &self.on_frame.is_some())
			.finish()
	}
}

impl AnimationRuntime {
	/// `duration` in milliseconds.
	pub fn new(duration: f64, easing: Easing) -> Self {
		Self {
			tracks: Vec::new(),
			duration,
			easing,
			on_frame: None,
		}
	}

	pub fn set_on_frame(&mut self, callback: Option<FrameCallback>) {
		self.on_frame = callback;
	}

	pub fn is_animating(&self) -> bool {
		!self.tracks.is_empty()
	}

	/// Whether `id` has an in-flight track.
	pub fn is_tracking(&self, id: &str) -> bool {
		self.tracks.iter().any(|t| t.id == id)
	}

	/// Send an in-flight track somewhere else, restarting from its current
	/// position. Returns `false` if `id` is not animating.
	pub fn retarget(&mut self, id: &str, to: Point) -> bool {
		let Some(track) = self.tracks.iter_mut().find(|t| t.id == id) else {
			return false;
		};
		track.from = track.current;
		track.to = to;
		track.started_at = None;
		true
	}

	/// Animate one item towards `to`. An in-flight track is retargeted from
	/// where it currently is; otherwise a new track starts at `from`.
	pub fn animate_to(&mut self, id: &str, from: Point, to: Point) {
		if self.retarget(id, to) {
			return;
		}
		self.tracks.push(Track {
			id: id.to_string(),
			from,
			to,
			current: from,
			started_at: None,
		});
	}

	/// Forget one item's track (the item went away).
	pub fn drop_item(&mut self, id: &str) {
		self.tracks.retain(|t| t.id != id);
	}

	/// Cancel everything. Returns each item's last interpolated position.
	pub fn stop(&mut self) -> Vec<(ItemId, Point)> {
		self.tracks.drain(..).map(|t| (t.id, t.current)).collect()
	}

	/// Advance every track to `now` (milliseconds, host clock).
	pub fn step(&mut self, now: f64) -> Option<FrameStep> {
		if self.tracks.is_empty() {
			return None;
		}
		let (duration, easing) = (self.duration, self.easing);
		let mut positions = Vec::with_capacity(self.tracks.len());
		for track in &mut self.tracks {
			let started = *track.started_at.get_or_insert(now);
			let progress = if duration <= 0.0 {
				1.0
			} else {
				((now - started) / duration).clamp(0.0, 1.0)
			};
			let ratio = easing.apply(progress);
			let mut current = track.from.lerp(track.to, ratio);
			if let Some(on_frame) = self.on_frame.as_mut() {
				let sample = FrameSample {
					id: &track.id,
					ratio,
					from: track.from,
					to: track.to,
					current,
				};
				if let Some(p) = on_frame(&sample) {
					current = p;
				}
			}
			if progress >= 1.0 {
				// land exactly on target unless a callback chose otherwise
				track.started_at = None;
				track.from = track.to;
			}
			track.current = current;
			positions.push((track.id.clone(), current));
		}
		self.tracks.retain(|t| t.from != t.to || t.started_at.is_some());
		Some(FrameStep {
			positions,
			finished: self.tracks.is_empty(),
		})
	}
}

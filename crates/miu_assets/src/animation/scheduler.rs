//! Per-consumer frame scheduling.
//!
//! An [`AnimationInstance`] owns nothing but its cursor: the frames belong to
//! the shared [`DecodedAnimation`]. The host drives it by calling
//! [`AnimationInstance::tick`] once per presented frame.
//!
//! ```text
//!            play            pause
//!   Idle ----------> Playing -------> Paused
//!    ^                |  ^   <-------
//!    |  stop          |  |   resume
//!    +----------------+  | play
//!                     v  |
//!                   Finished   (last frame reached, not looping)
//! ```

use std::{
	ops::Range,
	sync::Arc,
	time::{Duration, Instant},
};

use log::warn;

use super::{DecodedAnimation, Surface};

/// Playback state of an [`AnimationInstance`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PlaybackState {
	/// Created or stopped, showing frame 0
	#[default]
	Idle,
	/// Advancing on ticks
	Playing,
	/// Holding the current frame
	Paused,
	/// Holding the last frame after a non-looping run
	Finished,
}

/// Options for [`AnimationInstance::new`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationOptions {
	/// Wrap to the first frame after the last one
	pub looping: bool,
	/// Play only the frames of this facing
	pub direction: Option<u32>,
	/// Override the interval declared by the file
	pub interval: Option<Duration>,
}

impl AnimationOptions {
	/// Looping playback of every frame.
	pub fn looping() -> Self {
		Self {
			looping: true,
			..Self::default()
		}
	}

	/// Restricts playback to one facing.
	pub fn with_direction(mut self, direction: u32) -> Self {
		self.direction = Some(direction);
		self
	}

	/// Overrides the frame interval.
	pub fn with_interval(mut self, interval: Duration) -> Self {
		self.interval = Some(interval);
		self
	}
}

/// Playback cursor over a shared animation.
#[derive(Debug, Clone)]
pub struct AnimationInstance {
	animation: Arc<DecodedAnimation>,
	frames: Range<usize>,
	looping: bool,
	interval: Duration,
	index: usize,
	last_advance: Option<Instant>,
	state: PlaybackState,
}

impl AnimationInstance {
	/// Creates an idle instance positioned on the first frame.
	///
	/// `default_interval` applies when neither the options nor the file
	/// provide a positive interval.
	pub fn new(animation: Arc<DecodedAnimation>, options: AnimationOptions, default_interval: Duration) -> Self {
		let total = animation.frames().len();
		let frames = match options.direction {
			Some(direction) if direction < animation.directions() => {
				let per = animation.frames_per_direction() as usize;
				let start = direction as usize * per;
				start..start + per
			}
			Some(direction) => {
				warn!(
					"{} has {} directions, ignoring direction {direction}",
					animation.path(),
					animation.directions()
				);
				0..total
			}
			None => 0..total,
		};
		let interval = options
			.interval
			.filter(|interval| !interval.is_zero())
			.unwrap_or_else(|| animation.interval_or(default_interval));

		Self {
			animation,
			frames,
			looping: options.looping,
			interval,
			index: 0,
			last_advance: None,
			state: PlaybackState::Idle,
		}
	}

	/// Starts playback from the first frame.
	///
	/// Resumes when paused and does nothing while already playing.
	pub fn play(&mut self, now: Instant) {
		match self.state {
			PlaybackState::Idle | PlaybackState::Finished => {
				self.index = 0;
				self.last_advance = Some(now);
				self.state = PlaybackState::Playing;
			}
			PlaybackState::Paused => self.resume(now),
			PlaybackState::Playing => {}
		}
	}

	/// Holds the current frame.
	pub fn pause(&mut self) {
		if self.state == PlaybackState::Playing {
			self.state = PlaybackState::Paused;
		}
	}

	/// Continues a paused run from the same frame, measuring the next interval from `now`.
	pub fn resume(&mut self, now: Instant) {
		if self.state == PlaybackState::Paused {
			self.last_advance = Some(now);
			self.state = PlaybackState::Playing;
		}
	}

	/// Returns to frame 0 in the idle state.
	pub fn stop(&mut self) {
		self.index = 0;
		self.last_advance = None;
		self.state = PlaybackState::Idle;
	}

	/// Advances by at most one frame if an interval has elapsed since the last advance.
	///
	/// Elapsed time beyond one interval is dropped, not caught up on. Returns
	/// `true` if the displayed frame changed.
	pub fn tick(&mut self, now: Instant) -> bool {
		if self.state != PlaybackState::Playing {
			return false;
		}
		let Some(last) = self.last_advance else {
			return false;
		};
		if now.saturating_duration_since(last) < self.interval {
			return false;
		}

		self.last_advance = Some(now);
		let previous = self.index;
		self.index += 1;
		if self.index >= self.frames.len() {
			if self.looping {
				self.index = 0;
			} else {
				self.index = self.frames.len().saturating_sub(1);
				self.state = PlaybackState::Finished;
			}
		}
		self.index != previous
	}

	/// Absolute index of the displayed frame within the animation.
	pub fn current_frame(&self) -> usize {
		self.frames.start + self.index
	}

	/// Position of the displayed frame within the played range.
	pub fn position(&self) -> usize {
		self.index
	}

	/// RGBA surface of the displayed frame.
	pub fn current_surface(&self) -> Option<Surface> {
		self.animation.surface(self.current_frame())
	}

	/// Current playback state.
	pub fn state(&self) -> PlaybackState {
		self.state
	}

	/// Returns `true` if playback wraps after the last frame.
	pub fn is_looping(&self) -> bool {
		self.looping
	}

	/// Changes the loop flag; takes effect at the next wrap.
	pub fn set_looping(&mut self, looping: bool) {
		self.looping = looping;
	}

	/// Effective frame interval.
	pub fn interval(&self) -> Duration {
		self.interval
	}

	/// Number of frames in the played range.
	pub fn frame_count(&self) -> usize {
		self.frames.len()
	}

	/// The shared animation being played.
	pub fn animation(&self) -> &Arc<DecodedAnimation> {
		&self.animation
	}
}

use std::{sync::Arc, time::Duration};

use miu_types::file::XnbAudioContainer;

/// Lifecycle state of a [`PlaybackBuffer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BufferState {
	/// Not started, or rewound
	#[default]
	Stopped,
	/// Producing samples
	Playing,
	/// Holding the cursor
	Paused,
}

/// One playback of a shared sound effect.
///
/// Holds its own cursor and state; the samples stay in the shared container,
/// so any number of buffers can play the same sound at once.
#[derive(Debug, Clone)]
pub struct PlaybackBuffer {
	container: Arc<XnbAudioContainer>,
	cursor: usize,
	state: BufferState,
	looping: bool,
}

impl PlaybackBuffer {
	fn new(container: Arc<XnbAudioContainer>) -> Self {
		Self {
			container,
			cursor: 0,
			state: BufferState::Stopped,
			looping: false,
		}
	}

	/// Starts or resumes playback.
	pub fn play(&mut self) {
		self.state = BufferState::Playing;
	}

	/// Holds the current position.
	pub fn pause(&mut self) {
		if self.state == BufferState::Playing {
			self.state = BufferState::Paused;
		}
	}

	/// Stops and rewinds to the start.
	pub fn stop(&mut self) {
		self.state = BufferState::Stopped;
		self.cursor = 0;
	}

	/// Moves the cursor; positions past the end are clamped.
	pub fn seek(&mut self, position: Duration) {
		let frame = position.as_nanos() * u128::from(self.sample_rate()) / 1_000_000_000;
		let frame = usize::try_from(frame).unwrap_or(usize::MAX);
		self.cursor = frame.saturating_mul(self.channel_count()).min(self.total_samples());
	}

	/// Current position.
	pub fn position(&self) -> Duration {
		let rate = self.sample_rate();
		if rate == 0 {
			return Duration::ZERO;
		}
		let frame = (self.cursor / self.channel_count()) as u64;
		Duration::from_nanos(frame * 1_000_000_000 / u64::from(rate))
	}

	/// Current lifecycle state.
	pub fn state(&self) -> BufferState {
		self.state
	}

	/// Restarts from the container's loop region when the end is reached.
	pub fn set_looping(&mut self, looping: bool) {
		self.looping = looping;
	}

	/// Returns `true` if playback wraps at the end.
	pub fn is_looping(&self) -> bool {
		self.looping
	}

	/// Frames per second of the produced samples.
	pub fn sample_rate(&self) -> u32 {
		self.container.format().sample_rate
	}

	/// Interleaved channel count.
	pub fn channels(&self) -> u16 {
		self.container.format().channel_count
	}

	/// Total play length.
	pub fn duration(&self) -> Duration {
		self.container.duration()
	}

	/// The shared sound effect.
	pub fn container(&self) -> &Arc<XnbAudioContainer> {
		&self.container
	}

	fn channel_count(&self) -> usize {
		usize::from(self.channels().max(1))
	}

	fn total_samples(&self) -> usize {
		self.container.samples().len()
	}

	/// Sample index playback wraps to, honoring the declared loop start.
	fn loop_start_sample(&self) -> usize {
		let (start, length) = self.container.loop_region();
		if start <= 0 || length <= 0 {
			return 0;
		}
		let at = (start as usize).saturating_mul(self.channel_count());
		if at >= self.total_samples() { 0 } else { at }
	}

	/// Fills `out` with interleaved samples in `-1.0..=1.0` while playing.
	///
	/// Returns the number of samples written. Reaching the end stops and
	/// rewinds the buffer unless it is looping.
	pub fn read(&mut self, out: &mut [f32]) -> usize {
		let total = self.total_samples();
		if total == 0 {
			self.stop();
			return 0;
		}

		let mut written = 0;
		while written < out.len() && self.state == BufferState::Playing {
			let available = &self.container.samples()[self.cursor..];
			let count = available.len().min(out.len() - written);
			for (dst, &sample) in out[written..written + count].iter_mut().zip(available) {
				*dst = f32::from(sample) / 32768.0;
			}
			written += count;
			self.cursor += count;

			if self.cursor >= total {
				if self.looping {
					self.cursor = self.loop_start_sample();
				} else {
					self.stop();
				}
			}
		}
		written
	}
}

impl Iterator for PlaybackBuffer {
	type Item = f32;

	fn next(&mut self) -> Option<f32> {
		let mut sample = [0.0f32];
		(self.read(&mut sample) == 1).then_some(sample[0])
	}
}

#[cfg(feature = "rodio")]
impl rodio::Source for PlaybackBuffer {
	fn current_frame_len(&self) -> Option<usize> {
		None
	}

	fn channels(&self) -> u16 {
		PlaybackBuffer::channels(self)
	}

	fn sample_rate(&self) -> u32 {
		PlaybackBuffer::sample_rate(self)
	}

	fn total_duration(&self) -> Option<Duration> {
		(!self.looping).then(|| self.duration())
	}
}

/// Turns shared sound effects into independent playback buffers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioBufferBridge;

impl AudioBufferBridge {
	/// Creates a stopped buffer over `container`.
	pub fn to_playable(container: &Arc<XnbAudioContainer>) -> PlaybackBuffer {
		PlaybackBuffer::new(Arc::clone(container))
	}
}

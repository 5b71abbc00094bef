use std::{
	fmt::Display,
	io::{Cursor, Seek, Write},
	time::Duration,
};

use serde::Serialize;

use super::reader::ByteReader;
use crate::file::{DecodeError, FileType};

/// `WAVEFORMATEX` format tags understood by the decoder
pub mod format_tag {
	/// Integer PCM
	pub const PCM: u16 = 0x0001;
	/// Microsoft ADPCM
	pub const MS_ADPCM: u16 = 0x0002;
	/// 32-bit IEEE float
	pub const IEEE_FLOAT: u16 = 0x0003;
	/// IMA / DVI ADPCM
	pub const IMA_ADPCM: u16 = 0x0011;
}

/// Layout of the decoded sample buffer.
///
/// Samples handed out by [`XnbAudioContainer`] are always signed 16-bit and
/// interleaved, so `bits_per_sample` is 16 regardless of the source encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PcmFormat {
	/// Frames per second
	pub sample_rate: u32,
	/// Interleaved channel count
	pub channel_count: u16,
	/// Bits per decoded sample
	pub bits_per_sample: u16,
}

impl PcmFormat {
	/// 16-bit PCM with the given rate and channel count.
	pub fn pcm16(sample_rate: u32, channel_count: u16) -> Self {
		Self {
			sample_rate,
			channel_count,
			bits_per_sample: 16,
		}
	}
}

/// Encoding the samples had inside the XNB file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SampleEncoding {
	/// Integer PCM with the given width (8 or 16)
	Pcm {
		/// Bits per source sample
		bits: u16,
	},
	/// 32-bit IEEE float
	IeeeFloat,
	/// Microsoft ADPCM
	MsAdpcm,
	/// IMA ADPCM
	ImaAdpcm,
}

impl Display for SampleEncoding {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SampleEncoding::Pcm {
				bits,
			} => write!(f, "PCM {bits}-bit"),
			SampleEncoding::IeeeFloat => write!(f, "IEEE float"),
			SampleEncoding::MsAdpcm => write!(f, "MS ADPCM"),
			SampleEncoding::ImaAdpcm => write!(f, "IMA ADPCM"),
		}
	}
}

/// Raw `WAVEFORMATEX` structure as stored in a SoundEffect body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WaveFormat {
	/// Format tag, see [`format_tag`]
	pub format_tag: u16,
	/// Channel count
	pub channels: u16,
	/// Frames per second
	pub sample_rate: u32,
	/// Average data rate
	pub avg_bytes_per_sec: u32,
	/// Size of one block (ADPCM) or one frame (PCM)
	pub block_align: u16,
	/// Bits per source sample
	pub bits_per_sample: u16,
	/// Bytes following `cb_size`
	pub extra: Vec<u8>,
}

impl WaveFormat {
	/// Size of the fixed part, without `cb_size`
	pub const BASE_SIZE: usize = 16;

	/// Plain 16-bit PCM format.
	pub fn pcm16(sample_rate: u32, channels: u16) -> Self {
		let block_align = channels * 2;
		Self {
			format_tag: format_tag::PCM,
			channels,
			sample_rate,
			avg_bytes_per_sec: sample_rate * u32::from(block_align),
			block_align,
			bits_per_sample: 16,
			extra: Vec::new(),
		}
	}

	/// Parses a `WAVEFORMATEX` of `size` bytes.
	pub(crate) fn read(reader: &mut ByteReader<'_>, size: usize) -> Result<Self, DecodeError> {
		if size < Self::BASE_SIZE {
			return Err(DecodeError::invalid_header(
				FileType::Xnb,
				"format_size",
				format!("{size} bytes is too small for WAVEFORMATEX"),
			));
		}
		let bytes = reader.take(size)?;
		let mut fmt = ByteReader::new(bytes);

		let format_tag = fmt.read_u16()?;
		let channels = fmt.read_u16()?;
		let sample_rate = fmt.read_u32()?;
		let avg_bytes_per_sec = fmt.read_u32()?;
		let block_align = fmt.read_u16()?;
		let bits_per_sample = fmt.read_u16()?;

		// cb_size is optional for plain PCM; clamp it to what is actually there
		let extra = if size >= Self::BASE_SIZE + 2 {
			let cb_size = fmt.read_u16()? as usize;
			let available = size - Self::BASE_SIZE - 2;
			fmt.take(cb_size.min(available))?.to_vec()
		} else {
			Vec::new()
		};

		Ok(Self {
			format_tag,
			channels,
			sample_rate,
			avg_bytes_per_sec,
			block_align,
			bits_per_sample,
			extra,
		})
	}

	/// Serializes the structure including `cb_size`.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut out = Vec::with_capacity(Self::BASE_SIZE + 2 + self.extra.len());
		out.extend_from_slice(&self.format_tag.to_le_bytes());
		out.extend_from_slice(&self.channels.to_le_bytes());
		out.extend_from_slice(&self.sample_rate.to_le_bytes());
		out.extend_from_slice(&self.avg_bytes_per_sec.to_le_bytes());
		out.extend_from_slice(&self.block_align.to_le_bytes());
		out.extend_from_slice(&self.bits_per_sample.to_le_bytes());
		out.extend_from_slice(&(self.extra.len() as u16).to_le_bytes());
		out.extend_from_slice(&self.extra);
		out
	}
}

/// Decoded XNB SoundEffect.
///
/// Immutable once parsed; playback state lives in whatever consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XnbAudioContainer {
	pub(crate) format: PcmFormat,
	pub(crate) encoding: SampleEncoding,
	pub(crate) samples: Vec<i16>,
	pub(crate) loop_start: i32,
	pub(crate) loop_length: i32,
	pub(crate) duration_ms: i32,
	pub(crate) target_platform: u8,
	pub(crate) version: u8,
}

impl XnbAudioContainer {
	/// Layout of [`XnbAudioContainer::samples`].
	pub fn format(&self) -> PcmFormat {
		self.format
	}

	/// Encoding the samples were stored with.
	pub fn source_encoding(&self) -> SampleEncoding {
		self.encoding
	}

	/// Interleaved signed 16-bit samples.
	pub fn samples(&self) -> &[i16] {
		&self.samples
	}

	/// Number of sample frames (samples per channel).
	pub fn frame_count(&self) -> usize {
		self.samples.len() / usize::from(self.format.channel_count.max(1))
	}

	/// Play length computed from the decoded samples.
	pub fn duration(&self) -> Duration {
		if self.format.sample_rate == 0 {
			return Duration::ZERO;
		}
		Duration::from_nanos(self.frame_count() as u64 * 1_000_000_000 / u64::from(self.format.sample_rate))
	}

	/// Duration declared in the file, in milliseconds.
	pub fn declared_duration_ms(&self) -> i32 {
		self.duration_ms
	}

	/// Loop region in sample frames as `(start, length)`.
	pub fn loop_region(&self) -> (i32, i32) {
		(self.loop_start, self.loop_length)
	}

	/// Target platform byte (`w`, `m`, `x`, ...).
	pub fn target_platform(&self) -> char {
		char::from(self.target_platform)
	}

	/// XNB format version (3, 4 or 5).
	pub fn format_version(&self) -> u8 {
		self.version
	}

	/// Writes the samples as a 16-bit PCM WAV file.
	pub fn write_wav<W: Write + Seek>(&self, writer: &mut W) -> Result<(), hound::Error> {
		let spec = hound::WavSpec {
			channels: self.format.channel_count,
			sample_rate: self.format.sample_rate,
			bits_per_sample: 16,
			sample_format: hound::SampleFormat::Int,
		};

		let mut wav_writer = hound::WavWriter::new(writer, spec)?;

		for &sample in &self.samples {
			wav_writer.write_sample(sample)?;
		}

		wav_writer.finalize()?;

		Ok(())
	}

	/// Returns the WAV file produced by [`XnbAudioContainer::write_wav`].
	pub fn to_wav_bytes(&self) -> Result<Vec<u8>, hound::Error> {
		let mut cursor = Cursor::new(Vec::new());
		self.write_wav(&mut cursor)?;
		Ok(cursor.into_inner())
	}
}

impl Display for XnbAudioContainer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"XNB v{} [{}] {} Hz, {} ch, {} ({} frames, {:.2}s)",
			self.version,
			self.target_platform(),
			self.format.sample_rate,
			self.format.channel_count,
			self.encoding,
			self.frame_count(),
			self.duration().as_secs_f64()
		)
	}
}

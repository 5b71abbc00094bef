//! Writer for XNB SoundEffect files.

use super::{
	WaveFormat, constants,
	reader::{write_7bit, write_string},
};
use crate::file::{DecodeError, FileType};

/// Builds an XNB SoundEffect file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XnbBuilder {
	format: WaveFormat,
	data: Vec<u8>,
	platform: u8,
	version: u8,
	hidef: bool,
	lz4: bool,
	reader_name: String,
	loop_start: i32,
	loop_length: i32,
	duration_ms: Option<i32>,
}

impl XnbBuilder {
	/// Starts a file holding interleaved 16-bit PCM samples.
	pub fn pcm16(sample_rate: u32, channels: u16, samples: &[i16]) -> Self {
		let data = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
		Self::raw(WaveFormat::pcm16(sample_rate, channels), data)
	}

	/// Starts a file with an arbitrary format and pre-encoded sample data.
	pub fn raw(format: WaveFormat, data: Vec<u8>) -> Self {
		Self {
			format,
			data,
			platform: b'w',
			version: 5,
			hidef: false,
			lz4: false,
			reader_name: constants::SOUND_EFFECT_READER.to_string(),
			loop_start: 0,
			loop_length: 0,
			duration_ms: None,
		}
	}

	/// Sets the target platform byte.
	pub fn platform(mut self, platform: u8) -> Self {
		self.platform = platform;
		self
	}

	/// Sets the format version.
	pub fn version(mut self, version: u8) -> Self {
		self.version = version;
		self
	}

	/// Marks the file as built for the HiDef profile.
	pub fn hidef(mut self, hidef: bool) -> Self {
		self.hidef = hidef;
		self
	}

	/// Compresses the payload with LZ4.
	pub fn lz4(mut self, lz4: bool) -> Self {
		self.lz4 = lz4;
		self
	}

	/// Overrides the content reader type name.
	pub fn reader_name(mut self, name: &str) -> Self {
		self.reader_name = name.to_string();
		self
	}

	/// Sets the loop region in sample frames.
	pub fn loop_region(mut self, start: i32, length: i32) -> Self {
		self.loop_start = start;
		self.loop_length = length;
		self
	}

	/// Sets the declared duration; computed from the data when not set.
	pub fn duration_ms(mut self, duration_ms: i32) -> Self {
		self.duration_ms = Some(duration_ms);
		self
	}

	fn computed_duration_ms(&self) -> i32 {
		let rate = u64::from(self.format.avg_bytes_per_sec);
		if rate == 0 {
			return 0;
		}
		(self.data.len() as u64 * 1000 / rate).min(i32::MAX as u64) as i32
	}

	/// Serializes the file.
	///
	/// # Errors
	///
	/// Returns an error if the version is not one XNB defines.
	pub fn build(&self) -> Result<Vec<u8>, DecodeError> {
		if !constants::VERSIONS.contains(&self.version) {
			return Err(DecodeError::UnsupportedVersion {
				file_type: FileType::Xnb,
				version: self.version,
			});
		}

		let format = self.format.to_bytes();
		let mut body = Vec::with_capacity(64 + format.len() + self.data.len());
		write_7bit(&mut body, 1);
		write_string(&mut body, &self.reader_name);
		body.extend_from_slice(&0i32.to_le_bytes());
		write_7bit(&mut body, 0);
		write_7bit(&mut body, 1);

		body.extend_from_slice(&(format.len() as u32).to_le_bytes());
		body.extend_from_slice(&format);
		body.extend_from_slice(&(self.data.len() as u32).to_le_bytes());
		body.extend_from_slice(&self.data);
		body.extend_from_slice(&self.loop_start.to_le_bytes());
		body.extend_from_slice(&self.loop_length.to_le_bytes());
		body.extend_from_slice(&self.duration_ms.unwrap_or_else(|| self.computed_duration_ms()).to_le_bytes());

		let mut flags = 0u8;
		if self.hidef {
			flags |= constants::FLAG_HIDEF;
		}

		let body_len = body.len();
		let (header_size, payload) = if self.lz4 {
			flags |= constants::FLAG_LZ4;
			(constants::COMPRESSED_HEADER_SIZE, lz4_flex::block::compress(&body))
		} else {
			(constants::HEADER_SIZE, body)
		};

		let mut out = Vec::with_capacity(header_size + payload.len());
		out.extend_from_slice(constants::SIGNATURE);
		out.push(self.platform);
		out.push(self.version);
		out.push(flags);
		out.extend_from_slice(&((header_size + payload.len()) as u32).to_le_bytes());
		if self.lz4 {
			out.extend_from_slice(&(body_len as u32).to_le_bytes());
		}
		out.extend_from_slice(&payload);

		Ok(out)
	}
}

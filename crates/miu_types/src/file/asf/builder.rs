//! Writer for `.ASF` files.
//!
//! Used by tooling to re-pack edited frames and by tests to produce fixtures.

use super::{FrameRecord, constants, rle};
use crate::file::{DecodeError, FileType};

/// Builds an ASF file from Indexed8Alpha8 frames.
///
/// # Examples
///
/// ```
/// use miu_types::file::asf::{AsfBuilder, AsfDecode, PureDecoder};
///
/// let data = AsfBuilder::new(2, 1)
///     .interval(120)
///     .palette(&[[255, 255, 255, 255]])
///     .frame(vec![0, 255, 0, 0])
///     .build()
///     .unwrap();
///
/// let asset = PureDecoder.decode(&data).unwrap();
/// assert_eq!(asset.frame_count(), 1);
/// assert_eq!(asset.frame(0).unwrap().pixel(0, 0), Some((0, 255)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsfBuilder {
	width: u32,
	height: u32,
	directions: u32,
	interval: i32,
	left: i32,
	bottom: i32,
	palette: Vec<[u8; 4]>,
	frames: Vec<Vec<u8>>,
}

impl AsfBuilder {
	/// Starts a new file with the given frame size, one direction and the default interval.
	pub fn new(width: u32, height: u32) -> Self {
		Self {
			width,
			height,
			directions: 1,
			interval: constants::DEFAULT_INTERVAL_MS as i32,
			left: 0,
			bottom: 0,
			palette: Vec::new(),
			frames: Vec::new(),
		}
	}

	/// Sets the number of facings.
	pub fn directions(mut self, directions: u32) -> Self {
		self.directions = directions;
		self
	}

	/// Sets the declared interval; zero or negative values are written as-is.
	pub fn interval(mut self, interval: i32) -> Self {
		self.interval = interval;
		self
	}

	/// Sets the draw anchor.
	pub fn anchor(mut self, left: i32, bottom: i32) -> Self {
		self.left = left;
		self.bottom = bottom;
		self
	}

	/// Sets the RGBA palette. The alpha channel is not stored.
	pub fn palette(mut self, colors: &[[u8; 4]]) -> Self {
		self.palette = colors.to_vec();
		self
	}

	/// Appends a frame of Indexed8Alpha8 pixels.
	pub fn frame(mut self, pixels: Vec<u8>) -> Self {
		self.frames.push(pixels);
		self
	}

	/// Appends an already decoded frame.
	pub fn frame_record(self, frame: &FrameRecord) -> Self {
		self.frame(frame.pixels().to_vec())
	}

	/// Serializes the file.
	///
	/// # Errors
	///
	/// Returns an error if a frame does not match the frame size, the palette
	/// holds more than 256 colors, or the frames cannot be split evenly into
	/// the configured directions.
	pub fn build(&self) -> Result<Vec<u8>, DecodeError> {
		if self.palette.len() > constants::MAX_COLORS {
			return Err(DecodeError::invalid_header(
				FileType::Asf,
				"color_count",
				format!("{} colors exceed {}", self.palette.len(), constants::MAX_COLORS),
			));
		}
		let directions = self.directions.max(1) as usize;
		if self.frames.is_empty() || self.frames.len() % directions != 0 {
			return Err(DecodeError::frame_table(
				FileType::Asf,
				format!("{} frames cannot be split into {directions} directions", self.frames.len()),
			));
		}

		let frame_bytes = self.width as usize * self.height as usize * FrameRecord::BYTES_PER_PIXEL;
		let mut payloads = Vec::with_capacity(self.frames.len());
		for (index, pixels) in self.frames.iter().enumerate() {
			if pixels.len() != frame_bytes {
				return Err(DecodeError::frame_table(
					FileType::Asf,
					format!("frame {index} has {} bytes, expected {frame_bytes}", pixels.len()),
				));
			}
			payloads.push(rle::encode(pixels));
		}

		let table_offset =
			constants::HEADER_SIZE + self.palette.len() * constants::PALETTE_ENTRY_SIZE;
		let data_offset = table_offset + self.frames.len() * constants::FRAME_ENTRY_SIZE;
		let mut out = Vec::with_capacity(data_offset + payloads.iter().map(Vec::len).sum::<usize>());

		// Header
		out.extend_from_slice(constants::SIGNATURE);
		out.resize(constants::SIGNATURE_BLOCK_SIZE, 0);
		for value in [
			self.width as i32,
			self.height as i32,
			self.frames.len() as i32,
			directions as i32,
			self.palette.len() as i32,
			self.interval,
			self.left,
			self.bottom,
		] {
			out.extend_from_slice(&value.to_le_bytes());
		}
		out.extend_from_slice(&[0u8; constants::RESERVED_SIZE]);

		// Palette, stored BGRA
		for [r, g, b, _] in &self.palette {
			out.extend_from_slice(&[*b, *g, *r, 0]);
		}

		// Frame table
		let mut offset = data_offset;
		for payload in &payloads {
			out.extend_from_slice(&(offset as i32).to_le_bytes());
			out.extend_from_slice(&(payload.len() as i32).to_le_bytes());
			offset += payload.len();
		}

		for payload in &payloads {
			out.extend_from_slice(payload);
		}

		Ok(out)
	}
}

//! `.ASF` file format support for `miu2d-rs` project.
//!
//! ASF files hold the sprite-sheet animations used for characters, effects and
//! UI ornaments. A file stores one or more *directions* (facings), each with the
//! same number of frames, multiplexed into a single frame sequence. Frames are
//! palette-indexed with a per-pixel alpha and run-length encoded.
//!
//! # File Structure
//!
//! ```text
//! Offset  Size         Field          Description
//! ------  -----------  -------------  ------------------------------------------
//! 0x00    16           signature      "ASF 1.0" followed by padding
//! 0x10    4            width          Frame width in pixels (i32, little-endian)
//! 0x14    4            height         Frame height in pixels
//! 0x18    4            frame_count    Total frames across all directions
//! 0x1C    4            directions     Number of facings (<= 0 is read as 1)
//! 0x20    4            color_count    Palette entries that follow (0-256)
//! 0x24    4            interval       Milliseconds between frames (<= 0: default)
//! 0x28    4            left           Draw anchor, X
//! 0x2C    4            bottom         Draw anchor, Y
//! 0x30    16           reserved
//! 0x40    4*colors     palette        BGRA entries, alpha byte ignored
//! ...     8*frames     frame table    Absolute offset (i32) + length (i32) per frame
//! ...                  frame data     RLE payloads
//! ```
//!
//! # Frame Encoding
//!
//! A frame payload is a sequence of runs, each starting with two bytes:
//! `count` and `alpha`. An alpha of zero means `count` transparent pixels; any
//! other alpha is followed by `count` palette indices sharing that alpha.
//! Decoding stops at the end of the payload or once `width * height` pixels
//! have been produced.
//!
//! Decoded frames are kept in *Indexed8Alpha8* layout (`[index, alpha]` per
//! pixel) and expanded to RGBA only when a renderer asks for it.
//!
//! # Decoders
//!
//! Two interchangeable implementations of [`AsfDecode`] exist:
//! - [`PureDecoder`]: decodes frames sequentially on the calling thread
//! - [`AcceleratedDecoder`]: expands frames in parallel on the thread pool
//!   owned by an [`AcceleratedRuntime`]
//!
//! Both share the same header parser and the same frame kernel, so the output
//! is bit-identical.
//!
//! # Examples
//!
//! ```no_run
//! use miu_types::file::asf::{AsfDecode, PureDecoder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("asf/effect/fire.asf")?;
//! let asset = PureDecoder.decode(&data)?;
//!
//! println!("{} directions x {} frames", asset.directions(), asset.frames_per_direction());
//! for (index, frame) in asset.direction_frames(0).iter().enumerate() {
//!     println!("frame {index}: {} opaque pixels", frame.opaque_pixel_count());
//! }
//! # Ok(())
//! # }
//! ```

use std::{fmt::Display, time::Duration};

use serde::Serialize;

use crate::file::{DecodeError, FileType};

mod accel;
mod builder;
mod rle;

pub use accel::{AcceleratedDecoder, AcceleratedRuntime};
pub use builder::AsfBuilder;

/// ASF file constants.
pub mod constants {
	/// Signature at the start of every ASF file
	pub const SIGNATURE: &[u8; 7] = b"ASF 1.0";

	/// Size of the signature block (signature + padding)
	pub const SIGNATURE_BLOCK_SIZE: usize = 16;

	/// Size of the fixed header, signature block included
	pub const HEADER_SIZE: usize = 64;

	/// Size of the reserved block at the end of the header
	pub const RESERVED_SIZE: usize = 16;

	/// Size of one palette entry (BGRA)
	pub const PALETTE_ENTRY_SIZE: usize = 4;

	/// Maximum number of palette entries
	pub const MAX_COLORS: usize = 256;

	/// Size of one frame table entry (offset + length)
	pub const FRAME_ENTRY_SIZE: usize = 8;

	/// Upper bound on the decoded pixel data of one file, all frames together
	pub const MAX_DECODED_SIZE: u64 = 512 << 20;

	/// Largest accepted frame width or height
	pub const MAX_DIMENSION: u32 = 4096;

	/// Frame interval used when the file declares none
	pub const DEFAULT_INTERVAL_MS: u64 = 100;
}

/// Decodes raw ASF bytes into an [`AsfAsset`].
///
/// Implementations must be observably equivalent: identical input yields
/// identical metadata and pixel data regardless of the implementation used.
pub trait AsfDecode: Send + Sync {
	/// Short name of the implementation, for logging.
	fn name(&self) -> &'static str;

	/// Decodes a complete ASF file.
	///
	/// # Errors
	///
	/// Returns a [`DecodeError`] when the signature does not match or the
	/// header and frame table are inconsistent with the data.
	fn decode(&self, data: &[u8]) -> Result<AsfAsset, DecodeError>;
}

/// Sequential ASF decoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PureDecoder;

impl AsfDecode for PureDecoder {
	fn name(&self) -> &'static str {
		"pure"
	}

	fn decode(&self, data: &[u8]) -> Result<AsfAsset, DecodeError> {
		let layout = Layout::parse(data)?;
		let frames = layout.spans.iter().map(|span| layout.decode_frame(data, *span)).collect();
		Ok(layout.into_asset(frames))
	}
}

/// Fixed ASF header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AsfHeader {
	/// Frame width in pixels
	pub width: u32,
	/// Frame height in pixels
	pub height: u32,
	/// Total number of frames
	pub frame_count: u32,
	/// Number of facings, at least 1
	pub directions: u32,
	/// Frames in each facing
	pub frames_per_direction: u32,
	/// Number of palette entries stored in the file
	pub color_count: u32,
	/// Interval as declared by the file, may be zero or negative
	pub declared_interval: i32,
	/// Draw anchor, X
	pub left: i32,
	/// Draw anchor, Y
	pub bottom: i32,
}

impl AsfHeader {
	/// Size of the header in bytes
	pub const SIZE: usize = constants::HEADER_SIZE;

	/// Parses and validates the fixed header without touching frame data.
	///
	/// # Errors
	///
	/// Returns an error if the data is too short, the signature does not
	/// match, or a field is out of range.
	pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
		if data.len() < constants::HEADER_SIZE {
			return Err(DecodeError::insufficient_data(
				FileType::Asf,
				constants::HEADER_SIZE,
				data.len(),
			));
		}

		let signature = &data[..constants::SIGNATURE.len()];
		if signature != constants::SIGNATURE {
			return Err(DecodeError::InvalidMagic {
				file_type: FileType::Asf,
				expected: constants::SIGNATURE.to_vec(),
				actual: signature.to_vec(),
			});
		}

		let field = |index: usize| read_i32(data, constants::SIGNATURE_BLOCK_SIZE + index * 4);
		let width = positive_dimension(field(0), "width")?;
		let height = positive_dimension(field(1), "height")?;

		let frame_count = field(2);
		if frame_count < 1 {
			return Err(DecodeError::frame_table(
				FileType::Asf,
				format!("frame count {frame_count} must be at least 1"),
			));
		}
		let frame_count = frame_count as u32;

		// Legacy files occasionally leave the direction count empty
		let directions = field(3).max(1) as u32;
		if frame_count % directions != 0 {
			return Err(DecodeError::frame_table(
				FileType::Asf,
				format!("{frame_count} frames cannot be split into {directions} directions"),
			));
		}

		let decoded_size = u64::from(frame_count)
			* u64::from(width)
			* u64::from(height)
			* FrameRecord::BYTES_PER_PIXEL as u64;
		if decoded_size > constants::MAX_DECODED_SIZE {
			return Err(DecodeError::invalid_header(
				FileType::Asf,
				"frame_count",
				format!(
					"{frame_count} frames of {width}x{height} decode to {decoded_size} bytes, limit is {}",
					constants::MAX_DECODED_SIZE
				),
			));
		}

		let color_count = field(4);
		if !(0..=constants::MAX_COLORS as i32).contains(&color_count) {
			return Err(DecodeError::invalid_header(
				FileType::Asf,
				"color_count",
				format!("{color_count} is outside 0..={}", constants::MAX_COLORS),
			));
		}

		Ok(Self {
			width,
			height,
			frame_count,
			directions,
			frames_per_direction: frame_count / directions,
			color_count: color_count as u32,
			declared_interval: field(5),
			left: field(6),
			bottom: field(7),
		})
	}

	/// Byte offset of the frame table.
	pub fn frame_table_offset(&self) -> usize {
		constants::HEADER_SIZE + self.color_count as usize * constants::PALETTE_ENTRY_SIZE
	}

	/// Byte offset where frame payloads may begin.
	pub fn data_offset(&self) -> usize {
		self.frame_table_offset() + self.frame_count as usize * constants::FRAME_ENTRY_SIZE
	}
}

impl Display for AsfHeader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"AsfHeader:\n\
			- Size: {}x{}\n\
			- Frames: {} ({} directions x {})\n\
			- Colors: {}\n\
			- Interval: {} ms\n\
			- Anchor: ({}, {})",
			self.width,
			self.height,
			self.frame_count,
			self.directions,
			self.frames_per_direction,
			self.color_count,
			self.declared_interval,
			self.left,
			self.bottom
		)
	}
}

/// 256-entry RGBA palette.
///
/// Entries beyond the file's color count stay transparent black.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
	colors: [[u8; 4]; constants::MAX_COLORS],
	count: usize,
}

impl Palette {
	/// Creates a palette from RGBA colors. Extra colors past 256 are ignored.
	pub fn from_rgba(colors: &[[u8; 4]]) -> Self {
		let mut palette = Self::default();
		for (slot, color) in palette.colors.iter_mut().zip(colors) {
			*slot = *color;
		}
		palette.count = colors.len().min(constants::MAX_COLORS);
		palette
	}

	/// Reads `count` BGRA entries starting at `offset`.
	fn from_bgra(data: &[u8], offset: usize, count: usize) -> Self {
		let mut palette = Self::default();
		for (i, slot) in palette.colors.iter_mut().take(count).enumerate() {
			let at = offset + i * constants::PALETTE_ENTRY_SIZE;
			*slot = [data[at + 2], data[at + 1], data[at], 255];
		}
		palette.count = count;
		palette
	}

	/// Number of colors stored in the file.
	pub fn len(&self) -> usize {
		self.count
	}

	/// Returns `true` if the file stored no colors.
	pub fn is_empty(&self) -> bool {
		self.count == 0
	}

	/// Returns the RGBA color at `index`.
	pub fn color(&self, index: u8) -> [u8; 4] {
		self.colors[index as usize]
	}

	/// Returns the stored colors.
	pub fn colors(&self) -> &[[u8; 4]] {
		&self.colors[..self.count]
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self {
			colors: [[0, 0, 0, 0]; constants::MAX_COLORS],
			count: 0,
		}
	}
}

/// A single decoded frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameRecord {
	width: u32,
	height: u32,
	/// `[palette_index, alpha]` per pixel, row-major
	pixels: Vec<u8>,
}

impl FrameRecord {
	/// Bytes per pixel in the decoded layout.
	pub const BYTES_PER_PIXEL: usize = 2;

	/// Creates a frame from Indexed8Alpha8 pixels.
	///
	/// Returns `None` if the buffer length does not match the dimensions.
	pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
		let expected = width as usize * height as usize * Self::BYTES_PER_PIXEL;
		(pixels.len() == expected).then_some(Self {
			width,
			height,
			pixels,
		})
	}

	/// Returns the frame width.
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Returns the frame height.
	pub fn height(&self) -> u32 {
		self.height
	}

	/// Returns the raw Indexed8Alpha8 pixel buffer.
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}

	/// Returns `(palette_index, alpha)` at the given position.
	pub fn pixel(&self, x: u32, y: u32) -> Option<(u8, u8)> {
		if x >= self.width || y >= self.height {
			return None;
		}
		let at = (y as usize * self.width as usize + x as usize) * Self::BYTES_PER_PIXEL;
		Some((self.pixels[at], self.pixels[at + 1]))
	}

	/// Counts pixels with a non-zero alpha.
	pub fn opaque_pixel_count(&self) -> usize {
		self.pixels.chunks_exact(Self::BYTES_PER_PIXEL).filter(|p| p[1] != 0).count()
	}

	/// Expands the frame to RGBA8 using `palette`.
	///
	/// Transparent pixels become `[0, 0, 0, 0]`; opaque ones take the palette
	/// color with the pixel's own alpha.
	pub fn to_rgba(&self, palette: &Palette) -> Vec<u8> {
		let mut rgba = Vec::with_capacity(self.pixels.len() * 2);
		for pixel in self.pixels.chunks_exact(Self::BYTES_PER_PIXEL) {
			let (index, alpha) = (pixel[0], pixel[1]);
			if alpha == 0 {
				rgba.extend_from_slice(&[0, 0, 0, 0]);
			} else {
				let [r, g, b, _] = palette.color(index);
				rgba.extend_from_slice(&[r, g, b, alpha]);
			}
		}
		rgba
	}
}

/// A fully decoded, immutable ASF animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsfAsset {
	header: AsfHeader,
	palette: Palette,
	frames: Vec<FrameRecord>,
}

impl AsfAsset {
	/// Returns the parsed header.
	pub fn header(&self) -> &AsfHeader {
		&self.header
	}

	/// Frame width in pixels.
	pub fn width(&self) -> u32 {
		self.header.width
	}

	/// Frame height in pixels.
	pub fn height(&self) -> u32 {
		self.header.height
	}

	/// Total number of frames across all directions.
	pub fn frame_count(&self) -> u32 {
		self.header.frame_count
	}

	/// Number of facings.
	pub fn directions(&self) -> u32 {
		self.header.directions
	}

	/// Frames in each facing.
	pub fn frames_per_direction(&self) -> u32 {
		self.header.frames_per_direction
	}

	/// Interval as declared by the file.
	pub fn declared_interval(&self) -> i32 {
		self.header.declared_interval
	}

	/// Effective frame interval, substituting 100 ms for a missing value.
	pub fn interval(&self) -> Duration {
		self.interval_or(Duration::from_millis(constants::DEFAULT_INTERVAL_MS))
	}

	/// Effective frame interval, substituting `default` for a missing value.
	pub fn interval_or(&self, default: Duration) -> Duration {
		match self.header.declared_interval {
			ms if ms > 0 => Duration::from_millis(ms as u64),
			_ => default,
		}
	}

	/// Draw anchor `(left, bottom)`.
	pub fn anchor(&self) -> (i32, i32) {
		(self.header.left, self.header.bottom)
	}

	/// Returns the palette.
	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	/// Returns all frames in file order.
	pub fn frames(&self) -> &[FrameRecord] {
		&self.frames
	}

	/// Returns a frame by absolute index.
	pub fn frame(&self, index: usize) -> Option<&FrameRecord> {
		self.frames.get(index)
	}

	/// Returns the frames of one facing. Out-of-range directions yield an empty slice.
	pub fn direction_frames(&self, direction: u32) -> &[FrameRecord] {
		if direction >= self.header.directions {
			return &[];
		}
		let per = self.header.frames_per_direction as usize;
		let start = direction as usize * per;
		&self.frames[start..start + per]
	}

	/// Expands frame `index` to RGBA8 bytes.
	pub fn frame_rgba(&self, index: usize) -> Option<Vec<u8>> {
		self.frames.get(index).map(|frame| frame.to_rgba(&self.palette))
	}
}

impl Display for AsfAsset {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"ASF: {}x{}, {} frames, {} directions, {:?} interval",
			self.width(),
			self.height(),
			self.frame_count(),
			self.directions(),
			self.interval()
		)
	}
}

/// Location of one frame payload inside the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameSpan {
	pub offset: usize,
	pub length: usize,
}

/// Header, palette and frame table: everything but the pixels.
#[derive(Debug, Clone)]
pub(crate) struct Layout {
	pub header: AsfHeader,
	pub palette: Palette,
	pub spans: Vec<FrameSpan>,
}

impl Layout {
	pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
		let header = AsfHeader::from_bytes(data)?;

		let data_offset = header.data_offset();
		if data.len() < data_offset {
			return Err(DecodeError::insufficient_data(FileType::Asf, data_offset, data.len()));
		}

		let palette =
			Palette::from_bgra(data, constants::HEADER_SIZE, header.color_count as usize);

		let table_offset = header.frame_table_offset();
		let mut spans = Vec::with_capacity(header.frame_count as usize);
		for index in 0..header.frame_count as usize {
			let at = table_offset + index * constants::FRAME_ENTRY_SIZE;
			let offset = read_i32(data, at);
			let length = read_i32(data, at + 4);
			if offset < 0 || length < 0 {
				return Err(DecodeError::frame_table(
					FileType::Asf,
					format!("frame {index} has negative offset {offset} or length {length}"),
				));
			}

			let (offset, length) = (offset as usize, length as usize);
			if offset + length > data.len() {
				return Err(DecodeError::frame_table(
					FileType::Asf,
					format!(
						"frame {index} spans {offset}..{} but the file is {} bytes",
						offset + length,
						data.len()
					),
				));
			}
			spans.push(FrameSpan {
				offset,
				length,
			});
		}

		Ok(Self {
			header,
			palette,
			spans,
		})
	}

	pub fn decode_frame(&self, data: &[u8], span: FrameSpan) -> FrameRecord {
		let payload = &data[span.offset..span.offset + span.length];
		let pixels = rle::decode(payload, self.header.width as usize * self.header.height as usize);
		FrameRecord {
			width: self.header.width,
			height: self.header.height,
			pixels,
		}
	}

	pub fn into_asset(self, frames: Vec<FrameRecord>) -> AsfAsset {
		AsfAsset {
			header: self.header,
			palette: self.palette,
			frames,
		}
	}
}

fn positive_dimension(value: i32, field: &'static str) -> Result<u32, DecodeError> {
	if value < 1 || value as u32 > constants::MAX_DIMENSION {
		return Err(DecodeError::invalid_header(
			FileType::Asf,
			field,
			format!("{value} is outside 1..={}", constants::MAX_DIMENSION),
		));
	}
	Ok(value as u32)
}

/// Reads a little-endian i32. Callers validate the bounds beforehand.
#[inline]
fn read_i32(data: &[u8], offset: usize) -> i32 {
	i32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

//! Benchmark helper utilities for miu2d-rs
//!
//! Generates synthetic ASF sprite sheets and XNB sound effects shaped like the
//! game's assets, so the suite runs without shipping any game data.

use miu_types::file::{
	asf::AsfBuilder,
	xnb::{WaveFormat, XnbBuilder, format_tag},
};

/// Generates an ASF file with `frames * directions` frames of `width x height`.
///
/// Pixels mix transparent runs with opaque spans of varying length so the RLE
/// decoder sees both run kinds, like a character sprite over an empty canvas.
pub fn generate_test_asf_data(width: u32, height: u32, frames: u32, directions: u32) -> Vec<u8> {
	let palette: Vec<[u8; 4]> = (0..=255u8).map(|i| [i, i.wrapping_mul(3), i.wrapping_mul(7), 255]).collect();

	let mut builder = AsfBuilder::new(width, height).directions(directions).interval(80).palette(&palette);
	for index in 0..frames * directions {
		builder = builder.frame(generate_frame_pixels(width, height, index));
	}

	builder.build().unwrap_or_default()
}

/// Indexed8Alpha8 pixels for one synthetic frame
fn generate_frame_pixels(width: u32, height: u32, seed: u32) -> Vec<u8> {
	let mut pixels = Vec::with_capacity(width as usize * height as usize * 2);
	let cx = width / 2;
	for y in 0..height {
		// Opaque body grows and shrinks with the frame index
		let half = (y + seed) % (width / 2).max(1);
		for x in 0..width {
			if x.abs_diff(cx) <= half {
				pixels.push(((x * 7 + y * 3 + seed) % 256) as u8);
				pixels.push(if x.abs_diff(cx) == half { 128 } else { 255 });
			} else {
				pixels.extend_from_slice(&[0, 0]);
			}
		}
	}
	pixels
}

/// Generates a 16-bit PCM XNB sound effect holding a sawtooth.
pub fn generate_test_xnb_pcm(sample_rate: u32, channels: u16, frames: usize) -> Vec<u8> {
	let samples: Vec<i16> = (0..frames * usize::from(channels))
		.map(|i| (((i * 37) % 65536) as i32 - 32768) as i16)
		.collect();

	XnbBuilder::pcm16(sample_rate, channels, &samples).build().unwrap_or_default()
}

/// Generates an MS ADPCM XNB sound effect with `blocks` mono blocks.
pub fn generate_test_xnb_ms_adpcm(sample_rate: u32, blocks: usize) -> Vec<u8> {
	const BLOCK_ALIGN: usize = 512;

	let mut data = Vec::with_capacity(blocks * BLOCK_ALIGN);
	for block in 0..blocks {
		// predictor, delta, sample1, sample2
		data.push((block % 7) as u8);
		data.extend_from_slice(&16i16.to_le_bytes());
		data.extend_from_slice(&0i16.to_le_bytes());
		data.extend_from_slice(&0i16.to_le_bytes());
		data.extend((0..BLOCK_ALIGN - 7).map(|i| ((i * 13 + block) % 256) as u8));
	}

	let format = WaveFormat {
		format_tag: format_tag::MS_ADPCM,
		channels: 1,
		sample_rate,
		avg_bytes_per_sec: sample_rate / 2,
		block_align: BLOCK_ALIGN as u16,
		bits_per_sample: 4,
		extra: Vec::new(),
	};

	XnbBuilder::raw(format, data).build().unwrap_or_default()
}

/// Common benchmark sizes for testing
pub mod sizes {
	/// Small UI ornament
	pub const SMALL: (u32, u32) = (32, 32);

	/// Typical character sprite
	pub const MEDIUM: (u32, u32) = (128, 128);

	/// Full-screen effect
	pub const LARGE: (u32, u32) = (512, 384);

	/// Facings used by character sheets
	pub const DIRECTIONS: u32 = 8;

	/// Frames per facing for a walk cycle
	pub const FRAMES_PER_DIRECTION: u32 = 8;
}

#[cfg(test)]
mod tests {
	use super::*;
	use miu_types::file::{
		asf::{AsfDecode, PureDecoder},
		xnb,
	};

	#[test]
	fn test_generated_asf_decodes() {
		let (width, height) = sizes::SMALL;
		let data = generate_test_asf_data(width, height, 4, 2);
		let asset = PureDecoder.decode(&data).unwrap();
		assert_eq!(asset.frame_count(), 8);
		assert_eq!(asset.directions(), 2);
		assert!(asset.frames().iter().all(|f| f.opaque_pixel_count() > 0));
	}

	#[test]
	fn test_generated_xnb_parses() {
		let pcm = xnb::parse(&generate_test_xnb_pcm(22050, 2, 1000)).unwrap();
		assert_eq!(pcm.frame_count(), 1000);

		let adpcm = xnb::parse(&generate_test_xnb_ms_adpcm(22050, 4)).unwrap();
		// (512 - 7) * 2 + 2 samples per mono block
		assert_eq!(adpcm.frame_count(), 4 * 1012);
	}
}

//! `.XNB` SoundEffect support.
//!
//! XNB is the XNA / MonoGame content container. Only the SoundEffect payload
//! is understood here: a `WAVEFORMATEX` header followed by the sample data
//! and loop metadata.
//!
//! # File Format Structure
//!
//! ```text
//! +-------------------------------+
//! | "XNB"            (3 bytes)    |
//! | Target platform  (1 byte)     |
//! | Format version   (1 byte)     |  3, 4 or 5
//! | Flags            (1 byte)     |  0x01 HiDef, 0x40 LZ4, 0x80 LZX
//! | File size        (u32)        |
//! | [Decompressed size (u32)]     |  present when compressed
//! +-------------------------------+
//! | Reader count     (7-bit int)  |
//! | Readers          (string+i32) |
//! | Shared count     (7-bit int)  |
//! | Type id          (7-bit int)  |  1-based index into readers
//! +-------------------------------+
//! | Format size      (u32)        |
//! | WAVEFORMATEX                  |
//! | Data size        (u32)        |
//! | Data                          |
//! | Loop start       (i32)        |
//! | Loop length      (i32)        |
//! | Duration ms      (i32)        |
//! +-------------------------------+
//! ```
//!
//! # Example
//!
//! ```
//! use miu_types::file::xnb::{self, XnbBuilder};
//!
//! let data = XnbBuilder::pcm16(22050, 1, &[0, 512, -512]).build().unwrap();
//! let audio = xnb::parse(&data).unwrap();
//! assert_eq!(audio.format().sample_rate, 22050);
//! assert_eq!(audio.samples(), &[0, 512, -512]);
//! ```

mod adpcm;
mod builder;
mod reader;
mod types;

use std::borrow::Cow;

use log::debug;

use crate::file::{DecodeError, FileType};

pub use adpcm::{MS_DEFAULT_COEFFICIENTS, decode_ima_adpcm, decode_ms_adpcm};
pub use builder::XnbBuilder;
pub use types::{PcmFormat, SampleEncoding, WaveFormat, XnbAudioContainer, format_tag};

use reader::ByteReader;

/// Constants for XNB parsing
pub mod constants {
	/// File signature
	pub const SIGNATURE: &[u8; 3] = b"XNB";

	/// Size of the uncompressed header
	pub const HEADER_SIZE: usize = 10;

	/// Size of the header when the payload is compressed
	pub const COMPRESSED_HEADER_SIZE: usize = 14;

	/// Supported format versions
	pub const VERSIONS: [u8; 3] = [3, 4, 5];

	/// HiDef profile flag
	pub const FLAG_HIDEF: u8 = 0x01;

	/// LZ4 compression flag (MonoGame)
	pub const FLAG_LZ4: u8 = 0x40;

	/// LZX compression flag (XNA)
	pub const FLAG_LZX: u8 = 0x80;

	/// Upper bound accepted for the declared decompressed size
	pub const MAX_DECOMPRESSED_SIZE: usize = 256 * 1024 * 1024;

	/// Reader type that produces SoundEffect content
	pub const SOUND_EFFECT_READER: &str = "Microsoft.Xna.Framework.Content.SoundEffectReader";
}

/// Fixed XNB header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
	platform: u8,
	version: u8,
	flags: u8,
	file_size: u32,
}

impl Header {
	fn read(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
		let magic = reader.take(3)?;
		if magic != constants::SIGNATURE {
			return Err(DecodeError::InvalidMagic {
				file_type: FileType::Xnb,
				expected: constants::SIGNATURE.to_vec(),
				actual: magic.to_vec(),
			});
		}

		let platform = reader.read_u8()?;
		let version = reader.read_u8()?;
		if !constants::VERSIONS.contains(&version) {
			return Err(DecodeError::UnsupportedVersion {
				file_type: FileType::Xnb,
				version,
			});
		}

		Ok(Self {
			platform,
			version,
			flags: reader.read_u8()?,
			file_size: reader.read_u32()?,
		})
	}
}

/// Parses an XNB SoundEffect into interleaved 16-bit samples.
///
/// Never panics: truncated, oversized or unsupported input is reported as a
/// [`DecodeError`].
///
/// # Errors
///
/// Returns an error if the header is invalid, the payload is LZX compressed,
/// the primary reader is not the SoundEffect reader, or the sample encoding is
/// not one of PCM 8/16, IEEE float 32, MS ADPCM or IMA ADPCM.
pub fn parse(data: &[u8]) -> Result<XnbAudioContainer, DecodeError> {
	let mut reader = ByteReader::new(data);
	let header = Header::read(&mut reader)?;

	let file_size = header.file_size as usize;
	if file_size > data.len() {
		return Err(DecodeError::insufficient_data(FileType::Xnb, file_size, data.len()));
	}
	if file_size != data.len() {
		return Err(DecodeError::invalid_header(
			FileType::Xnb,
			"file_size",
			format!("header declares {file_size} bytes, buffer holds {}", data.len()),
		));
	}

	let payload = decompress(&header, &mut reader, data)?;
	let mut body = ByteReader::new(&payload);
	read_sound_effect(&header, &mut body)
}

fn decompress<'a>(
	header: &Header,
	reader: &mut ByteReader<'a>,
	data: &'a [u8],
) -> Result<Cow<'a, [u8]>, DecodeError> {
	if header.flags & constants::FLAG_LZX != 0 {
		return Err(DecodeError::UnsupportedCompression {
			file_type: FileType::Xnb,
			compression: "LZX",
		});
	}
	if header.flags & constants::FLAG_LZ4 == 0 {
		return Ok(Cow::Borrowed(&data[reader.position()..]));
	}

	let size = reader.read_u32()? as usize;
	if size > constants::MAX_DECOMPRESSED_SIZE {
		return Err(DecodeError::invalid_header(
			FileType::Xnb,
			"decompressed_size",
			format!("{size} bytes exceeds {}", constants::MAX_DECOMPRESSED_SIZE),
		));
	}

	let expanded = lz4_flex::block::decompress(&data[reader.position()..], size).map_err(|e| {
		DecodeError::Decompression {
			file_type: FileType::Xnb,
			message: e.to_string(),
		}
	})?;
	debug!("LZ4 payload expanded to {} bytes", expanded.len());
	Ok(Cow::Owned(expanded))
}

fn read_sound_effect(header: &Header, body: &mut ByteReader<'_>) -> Result<XnbAudioContainer, DecodeError> {
	let reader_count = body.read_7bit()? as usize;
	let mut readers = Vec::with_capacity(reader_count.min(16));
	for _ in 0..reader_count {
		let name = body.read_string()?;
		let _version = body.read_i32()?;
		readers.push(name);
	}

	let _shared = body.read_7bit()?;
	let type_id = body.read_7bit()? as usize;
	if type_id == 0 {
		return Err(DecodeError::invalid_header(FileType::Xnb, "type_id", "primary asset is null"));
	}
	let reader_name = readers.get(type_id - 1).ok_or_else(|| {
		DecodeError::invalid_header(
			FileType::Xnb,
			"type_id",
			format!("type id {type_id} exceeds {reader_count} readers"),
		)
	})?;
	let type_name = reader_name.split(',').next().unwrap_or_default().trim();
	if type_name != constants::SOUND_EFFECT_READER {
		return Err(DecodeError::UnsupportedReader {
			file_type: FileType::Xnb,
			reader: reader_name.clone(),
		});
	}

	let format_size = body.read_u32()? as usize;
	let format = WaveFormat::read(body, format_size)?;
	let data_size = body.read_u32()? as usize;
	let data = body.take(data_size)?;
	let loop_start = body.read_i32()?;
	let loop_length = body.read_i32()?;
	let duration_ms = body.read_i32()?;

	let (encoding, samples) = decode_samples(&format, data)?;
	debug!(
		"XNB SoundEffect: {} Hz, {} ch, {encoding}, {} samples",
		format.sample_rate,
		format.channels,
		samples.len()
	);

	Ok(XnbAudioContainer {
		format: PcmFormat::pcm16(format.sample_rate, format.channels),
		encoding,
		samples,
		loop_start,
		loop_length,
		duration_ms,
		target_platform: header.platform,
		version: header.version,
	})
}

fn decode_samples(format: &WaveFormat, data: &[u8]) -> Result<(SampleEncoding, Vec<i16>), DecodeError> {
	let unsupported = || DecodeError::UnsupportedEncoding {
		file_type: FileType::Xnb,
		format_tag: format.format_tag,
		bits_per_sample: format.bits_per_sample,
	};

	if format.channels == 0 || format.sample_rate == 0 {
		return Err(DecodeError::invalid_header(
			FileType::Xnb,
			"wave_format",
			format!("{} Hz with {} channels", format.sample_rate, format.channels),
		));
	}

	let channels = usize::from(format.channels);
	let block_align = usize::from(format.block_align);

	match (format.format_tag, format.bits_per_sample) {
		(format_tag::PCM, 8) => Ok((
			SampleEncoding::Pcm {
				bits: 8,
			},
			data.iter().map(|&b| (i16::from(b) - 128) << 8).collect(),
		)),
		(format_tag::PCM, 16) => Ok((
			SampleEncoding::Pcm {
				bits: 16,
			},
			data.chunks_exact(2).map(|c| i16::from_le_bytes([c[0], c[1]])).collect(),
		)),
		(format_tag::IEEE_FLOAT, 32) => Ok((
			SampleEncoding::IeeeFloat,
			data.chunks_exact(4)
				.map(|c| {
					let value = f32::from_le_bytes([c[0], c[1], c[2], c[3]]);
					(value.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16
				})
				.collect(),
		)),
		(format_tag::MS_ADPCM, _) if channels <= 2 => {
			let coefficients = adpcm::ms_coefficients(&format.extra);
			let samples = decode_ms_adpcm(data, channels, block_align, &coefficients);
			if samples.is_empty() && !data.is_empty() {
				return Err(unsupported());
			}
			Ok((SampleEncoding::MsAdpcm, samples))
		}
		(format_tag::IMA_ADPCM, _) if channels <= 2 => {
			let samples = decode_ima_adpcm(data, channels, block_align);
			if samples.is_empty() && !data.is_empty() {
				return Err(unsupported());
			}
			Ok((SampleEncoding::ImaAdpcm, samples))
		}
		_ => Err(unsupported()),
	}
}

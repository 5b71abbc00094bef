//! Bounds-checked little-endian reader over an in-memory XNB payload.

use crate::file::{DecodeError, FileType};

/// Cursor over a byte slice. Every read either succeeds or reports how many
/// bytes were missing; nothing here can panic on short input.
#[derive(Debug, Clone)]
pub(crate) struct ByteReader<'a> {
	data: &'a [u8],
	pos: usize,
}

impl<'a> ByteReader<'a> {
	pub fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			pos: 0,
		}
	}

	pub fn position(&self) -> usize {
		self.pos
	}

	pub fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
		let end = self.pos.checked_add(len).filter(|end| *end <= self.data.len()).ok_or_else(
			|| {
				DecodeError::insufficient_data(
					FileType::Xnb,
					self.pos.saturating_add(len),
					self.data.len(),
				)
			},
		)?;
		let bytes = &self.data[self.pos..end];
		self.pos = end;
		Ok(bytes)
	}

	pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
		Ok(self.take(1)?[0])
	}

	pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
		let b = self.take(2)?;
		Ok(u16::from_le_bytes([b[0], b[1]]))
	}

	pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
		let b = self.take(4)?;
		Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
	}

	pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
		let b = self.take(4)?;
		Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
	}

	/// .NET `BinaryReader.Read7BitEncodedInt`.
	pub fn read_7bit(&mut self) -> Result<u32, DecodeError> {
		let mut value = 0u32;
		for shift in (0..35).step_by(7) {
			let byte = self.read_u8()?;
			value |= u32::from(byte & 0x7F) << shift;
			if byte & 0x80 == 0 {
				return Ok(value);
			}
		}
		Err(DecodeError::invalid_header(FileType::Xnb, "7bit_int", "encoded integer is longer than 5 bytes"))
	}

	/// .NET `BinaryReader.ReadString`: 7-bit length prefix + UTF-8.
	pub fn read_string(&mut self) -> Result<String, DecodeError> {
		let len = self.read_7bit()? as usize;
		let bytes = self.take(len)?;
		String::from_utf8(bytes.to_vec())
			.map_err(|e| DecodeError::invalid_header(FileType::Xnb, "string", e.to_string()))
	}
}

/// Appends `value` as a .NET 7-bit encoded integer.
pub(crate) fn write_7bit(out: &mut Vec<u8>, mut value: u32) {
	while value >= 0x80 {
		out.push((value as u8) | 0x80);
		value >>= 7;
	}
	out.push(value as u8);
}

/// Appends a .NET length-prefixed string.
pub(crate) fn write_string(out: &mut Vec<u8>, value: &str) {
	write_7bit(out, value.len() as u32);
	out.extend_from_slice(value.as_bytes());
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_7bit_values() {
		for value in [0u32, 1, 127, 128, 300, 16_384, u32::MAX] {
			let mut out = Vec::new();
			write_7bit(&mut out, value);
			assert_eq!(ByteReader::new(&out).read_7bit().unwrap(), value);
		}
		let mut out = Vec::new();
		write_7bit(&mut out, 300);
		assert_eq!(out, vec![0xAC, 0x02]);
	}

	#[test]
	fn test_7bit_too_long() {
		let data = [0xFF; 6];
		assert!(matches!(
			ByteReader::new(&data).read_7bit(),
			Err(DecodeError::InvalidHeader { .. })
		));
	}

	#[test]
	fn test_short_reads() {
		let mut reader = ByteReader::new(&[1, 2, 3]);
		assert_eq!(reader.read_u16().unwrap(), 0x0201);
		assert_eq!(
			reader.read_u32(),
			Err(DecodeError::insufficient_data(FileType::Xnb, 6, 3))
		);
		// failed reads do not advance
		assert_eq!(reader.position(), 2);
		assert_eq!(reader.read_u8().unwrap(), 3);
	}

	#[test]
	fn test_string() {
		let mut out = Vec::new();
		write_string(&mut out, "SoundEffectReader");
		assert_eq!(ByteReader::new(&out).read_string().unwrap(), "SoundEffectReader");
		assert!(ByteReader::new(&[5, b'a']).read_string().is_err());
	}
}

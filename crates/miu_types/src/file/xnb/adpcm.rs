//! ADPCM decoders for `WAVEFORMATEX` payloads.
//!
//! XNA stores compressed sound effects as Microsoft ADPCM (format tag 0x0002);
//! MonoGame builds may also emit IMA ADPCM (format tag 0x0011). Both are
//! block based: every `block_align` bytes restart the predictor state, so a
//! damaged block only affects itself.

/// Microsoft ADPCM adaptation table
const MS_ADAPTATION_TABLE: [i32; 16] =
	[230, 230, 230, 230, 307, 409, 512, 614, 768, 614, 512, 409, 307, 230, 230, 230];

/// Largest step size; keeps the adaptation product inside `i32`
const MS_MAX_DELTA: i32 = i32::MAX / 768;

/// Microsoft ADPCM predictor coefficients used when the format carries none
pub const MS_DEFAULT_COEFFICIENTS: [(i16, i16); 7] =
	[(256, 0), (512, -256), (0, 0), (192, 64), (240, 0), (460, -208), (392, -232)];

/// IMA ADPCM index adjustment table
const IMA_INDEX_TABLE: [i8; 16] = [-1, -1, -1, -1, 2, 4, 6, 8, -1, -1, -1, -1, 2, 4, 6, 8];

/// IMA ADPCM step table
const IMA_STEP_TABLE: [i32; 89] = [
	7, 8, 9, 10, 11, 12, 13, 14, 16, 17, 19, 21, 23, 25, 28, 31, 34, 37, 41, 45, 50, 55, 60, 66,
	73, 80, 88, 97, 107, 118, 130, 143, 157, 173, 190, 209, 230, 253, 279, 307, 337, 371, 408,
	449, 494, 544, 598, 658, 724, 796, 876, 963, 1060, 1166, 1282, 1411, 1552, 1707, 1878, 2066,
	2272, 2499, 2749, 3024, 3327, 3660, 4026, 4428, 4871, 5358, 5894, 6484, 7132, 7845, 8630,
	9493, 10442, 11487, 12635, 13899, 15289, 16818, 18500, 20350, 22385, 24623, 27086, 29794,
	32767,
];

/// Per-channel Microsoft ADPCM predictor state
#[derive(Debug, Clone, Copy, Default)]
struct MsChannel {
	coef1: i32,
	coef2: i32,
	delta: i32,
	sample1: i32,
	sample2: i32,
}

impl MsChannel {
	fn expand(&mut self, nibble: u8) -> i16 {
		let signed = if nibble & 0x08 != 0 {
			i32::from(nibble) - 16
		} else {
			i32::from(nibble)
		};

		// Header fields and custom coefficients are untrusted, so widen before summing
		let predicted = (i64::from(self.sample1) * i64::from(self.coef1)
			+ i64::from(self.sample2) * i64::from(self.coef2))
			>> 8;
		let sample = (predicted + i64::from(signed) * i64::from(self.delta)).clamp(-32768, 32767) as i32;

		self.sample2 = self.sample1;
		self.sample1 = sample;
		self.delta = ((MS_ADAPTATION_TABLE[nibble as usize] * self.delta) >> 8).clamp(16, MS_MAX_DELTA);

		sample as i16
	}
}

/// Decodes Microsoft ADPCM blocks to interleaved 16-bit PCM.
///
/// # Arguments
/// * `data` - The compressed payload
/// * `channels` - Number of interleaved channels, 1 or 2 (anything else yields no samples)
/// * `block_align` - Size of one block in bytes
/// * `coefficients` - Predictor coefficient pairs, usually [`MS_DEFAULT_COEFFICIENTS`]
///
/// A trailing partial block is decoded as far as it goes; blocks too short
/// to hold their header are skipped.
pub fn decode_ms_adpcm(
	data: &[u8],
	channels: usize,
	block_align: usize,
	coefficients: &[(i16, i16)],
) -> Vec<i16> {
	let header_size = 7 * channels;
	if !(1..=2).contains(&channels) || block_align <= header_size || coefficients.is_empty() {
		return Vec::new();
	}

	let samples_per_block = (block_align - header_size) * 2 / channels + 2;
	let mut pcm = Vec::with_capacity(data.len().div_ceil(block_align) * samples_per_block * channels);
	let mut states = vec![MsChannel::default(); channels];

	for block in data.chunks(block_align) {
		if block.len() < header_size {
			break;
		}

		for (ch, state) in states.iter_mut().enumerate() {
			let predictor = (block[ch] as usize).min(coefficients.len() - 1);
			let (coef1, coef2) = coefficients[predictor];
			let word = |field: usize| {
				let at = channels + field * 2 * channels + ch * 2;
				i32::from(i16::from_le_bytes([block[at], block[at + 1]]))
			};
			*state = MsChannel {
				coef1: i32::from(coef1),
				coef2: i32::from(coef2),
				delta: word(0),
				sample1: word(1),
				sample2: word(2),
			};
		}

		// The header carries the first two samples, oldest first
		pcm.extend(states.iter().map(|s| s.sample2 as i16));
		pcm.extend(states.iter().map(|s| s.sample1 as i16));

		let mut channel = 0;
		for &byte in &block[header_size..] {
			for nibble in [byte >> 4, byte & 0x0F] {
				pcm.push(states[channel].expand(nibble));
				channel = (channel + 1) % channels;
			}
		}
	}

	pcm
}

/// Per-channel IMA ADPCM predictor state
#[derive(Debug, Clone, Copy, Default)]
struct ImaChannel {
	predictor: i32,
	step_index: usize,
}

impl ImaChannel {
	fn expand(&mut self, code: u8) -> i16 {
		let step = IMA_STEP_TABLE[self.step_index];
		let mut diff = step >> 3;

		if code & 1 != 0 {
			diff += step >> 2;
		}
		if code & 2 != 0 {
			diff += step >> 1;
		}
		if code & 4 != 0 {
			diff += step;
		}
		if code & 8 != 0 {
			diff = -diff;
		}

		self.predictor = (self.predictor + diff).clamp(-32768, 32767);
		self.step_index =
			(self.step_index as i32 + i32::from(IMA_INDEX_TABLE[code as usize])).clamp(0, 88) as usize;

		self.predictor as i16
	}
}

/// Decodes IMA ADPCM blocks to interleaved 16-bit PCM.
///
/// Each block starts with a 4-byte header per channel (predictor, step index,
/// reserved byte). Sample data follows in 4-byte groups per channel, low
/// nibble first.
pub fn decode_ima_adpcm(data: &[u8], channels: usize, block_align: usize) -> Vec<i16> {
	let header_size = 4 * channels;
	if !(1..=2).contains(&channels) || block_align <= header_size {
		return Vec::new();
	}

	let mut pcm = Vec::with_capacity(data.len() * 2);
	let mut states = vec![ImaChannel::default(); channels];

	for block in data.chunks(block_align) {
		if block.len() < header_size {
			break;
		}

		for (ch, state) in states.iter_mut().enumerate() {
			let at = ch * 4;
			*state = ImaChannel {
				predictor: i32::from(i16::from_le_bytes([block[at], block[at + 1]])),
				step_index: (block[at + 2] as usize).min(88),
			};
		}
		pcm.extend(states.iter().map(|s| s.predictor as i16));

		// 8 samples per channel per group
		let group = 4 * channels;
		for chunk in block[header_size..].chunks_exact(group) {
			let mut decoded = [[0i16; 8]; 2];
			for (ch, state) in states.iter_mut().enumerate().take(2) {
				for (i, &byte) in chunk[ch * 4..ch * 4 + 4].iter().enumerate() {
					decoded[ch][i * 2] = state.expand(byte & 0x0F);
					decoded[ch][i * 2 + 1] = state.expand(byte >> 4);
				}
			}
			for i in 0..8 {
				pcm.extend(decoded.iter().take(channels).map(|samples| samples[i]));
			}
		}
	}

	pcm
}

/// Parses the MS ADPCM coefficient table from the `WAVEFORMATEX` extra bytes.
///
/// Layout: samples per block (u16), coefficient count (u16), then the pairs.
/// Falls back to the standard table when the extra bytes are absent or short.
pub fn ms_coefficients(extra: &[u8]) -> Vec<(i16, i16)> {
	if extra.len() >= 4 {
		let count = u16::from_le_bytes([extra[2], extra[3]]) as usize;
		let pairs: Vec<(i16, i16)> = extra[4..]
			.chunks_exact(4)
			.take(count)
			.map(|c| (i16::from_le_bytes([c[0], c[1]]), i16::from_le_bytes([c[2], c[3]])))
			.collect();
		if count > 0 && pairs.len() == count {
			return pairs;
		}
	}
	MS_DEFAULT_COEFFICIENTS.to_vec()
}

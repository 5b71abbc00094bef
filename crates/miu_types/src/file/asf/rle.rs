//! Run-length coding of ASF frame payloads.
//!
//! Shared by every decoder implementation so their output cannot drift apart.

/// Longest run a single `count` byte can describe
const MAX_RUN: usize = u8::MAX as usize;

/// Expands one RLE payload into `pixel_count` Indexed8Alpha8 pixels.
///
/// Pixels not covered by the payload stay transparent. A run that promises
/// more indices than the payload holds ends the frame early.
pub(crate) fn decode(payload: &[u8], pixel_count: usize) -> Vec<u8> {
	let mut pixels = vec![0u8; pixel_count * 2];
	let mut pos = 0usize;
	let mut written = 0usize;

	while pos + 1 < payload.len() && written < pixel_count {
		let count = payload[pos] as usize;
		let alpha = payload[pos + 1];
		pos += 2;

		if alpha == 0 {
			// buffer is zero-initialized
			written = (written + count).min(pixel_count);
			continue;
		}

		let run = count.min(pixel_count - written).min(payload.len() - pos);
		for (i, &index) in payload[pos..pos + run].iter().enumerate() {
			let at = (written + i) * 2;
			pixels[at] = index;
			pixels[at + 1] = alpha;
		}
		pos += run;
		written += run;
		if run < count {
			break;
		}
	}

	pixels
}

/// Encodes Indexed8Alpha8 pixels into an RLE payload.
///
/// Consecutive pixels sharing an alpha value form one run of at most 255 pixels.
pub(crate) fn encode(pixels: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(pixels.len());
	let pixel_count = pixels.len() / 2;
	let mut start = 0usize;

	while start < pixel_count {
		let alpha = pixels[start * 2 + 1];
		let mut end = start + 1;
		while end < pixel_count && end - start < MAX_RUN && pixels[end * 2 + 1] == alpha {
			end += 1;
		}

		out.push((end - start) as u8);
		out.push(alpha);
		if alpha != 0 {
			out.extend((start..end).map(|i| pixels[i * 2]));
		}
		start = end;
	}

	out
}

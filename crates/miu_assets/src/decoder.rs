use std::sync::Arc;

use log::{info, warn};
use miu_types::file::{AcceleratedRuntime, AsfDecode, PureDecoder};

/// Picks the ASF decoder for an asset manager.
///
/// With `prefer_accelerated` set, the accelerated runtime is bootstrapped and
/// its decoder returned; if that fails the pure decoder is used instead.
/// The choice is made once, so decodes are never mixed.
pub fn select_decoder(runtime: &AcceleratedRuntime, prefer_accelerated: bool) -> Arc<dyn AsfDecode> {
	if !prefer_accelerated {
		info!("using pure ASF decoder");
		return Arc::new(PureDecoder);
	}

	match runtime.decoder() {
		Ok(decoder) => {
			info!("using accelerated ASF decoder ({} threads)", decoder.threads());
			Arc::new(decoder)
		}
		Err(e) => {
			warn!("{e}, falling back to pure ASF decoder");
			Arc::new(PureDecoder)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_selection() {
		let runtime = AcceleratedRuntime::new(1);
		assert_eq!(select_decoder(&runtime, false).name(), "pure");
		assert!(!runtime.is_ready());

		assert_eq!(select_decoder(&runtime, true).name(), "accelerated");
		assert!(runtime.is_ready());
	}
}

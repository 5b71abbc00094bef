#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `miu2d-rs` is the asset decode and playback core of the Miu2D game client.
//!
//! It decodes the legacy `.ASF` sprite sheets and `.XNB` sound effects,
//! shares decoded assets between every consumer, and hands out lightweight
//! playback cursors for animations and sounds.
//!
pub use miu_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use miu_dylib;

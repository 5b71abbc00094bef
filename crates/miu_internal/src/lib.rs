//! This module is separated into its own crate to enable simple dynamic linking for `miu2d-rs`, and should not be used directly.

/// `use miu2d_rs::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export the member crates for convenience
pub use miu_assets;
pub use miu_types;
pub use miu_vfs;

// Re-export commonly used types at crate root
pub use miu_assets::{AssetConfig, AssetError, AssetManager};
pub use miu_types::file::{AsfAsset, DecodeError, XnbAudioContainer};

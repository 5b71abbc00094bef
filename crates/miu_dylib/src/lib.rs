//! Forces dynamic linking of `miu2d-rs` to speed up incremental builds.
//!
//! Enabled through the `dynamic_linking` feature of the root crate; not meant
//! to be depended on directly.

#![allow(clippy::single_component_path_imports)]

#[allow(unused_imports)]
use miu_internal;

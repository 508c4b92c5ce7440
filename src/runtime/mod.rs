//! Runtime root path resolution for on-disk support assets.

pub mod root;

pub use root::{resolve, runtime_root};

//! Configuration types
//!
//! Board-specific settings for a matrix controller. With the `serde`
//! feature a configuration can be stored as postcard binary data.

pub mod device;

pub use device::*;

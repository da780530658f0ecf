//! LED matrix controllers

pub mod ht16k33;

pub use ht16k33::Ht16k33;

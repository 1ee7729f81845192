#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

mod tier;

pub use tier::{MemoryTier, MemoryTierBuilder};

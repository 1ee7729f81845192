#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

mod backend;
mod error;

pub use backend::{RedisTier, RedisTierBuilder};
pub use error::Error;

#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Advisory service correlation
//!
//! Batches the collected inventory into a single advisory query and pairs
//! the response back onto the originating packages in one pass. The result
//! travels as [`CorrelatedPackage`] values; the index-aligned lists the
//! wire protocol uses never cross this crate's boundary.

mod client;
mod wire;

pub use client::{AdvisoryClient, AdvisoryClientConfig};

pub use vigil_types::CorrelatedPackage;

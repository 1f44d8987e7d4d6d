#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_features)]
#![warn(unused_crate_dependencies)]

//! Data types for API and profile storage.

pub mod common;
pub mod profile;

pub use common::*;
pub use profile::*;

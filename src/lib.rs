//! A minimal persistent scene-description stage modelled on [OpenUSD](https://github.com/PixarAnimationStudios/OpenUSD), in pure Rust.
//!
//! A [`usd::Stage`] owns a hierarchy of typed prims addressed by [`sdf::Path`]s.
//! Prims carry typed attributes whose authored values ("opinions") fully replace
//! the schema defaults registered in a [`usd::SchemaRegistry`].

pub mod base;
pub mod sdf;
pub mod usd;

pub mod usd_geom;
pub mod usd_lux;

pub mod usda;

mod error;
mod peg;

#[doc(hidden)]
pub use base::*;
pub use error::{Error, Result};

pub(crate) use base::tf::declare_public_tokens;

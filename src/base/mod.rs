//! Foundation types shared by the scene description layers.

pub mod gf;
pub mod tf;
pub mod vt;

//! Geometry schemas: untyped groups, transforms and the cube primitive.

mod schemas;
mod xform_common_api;
mod xform_op;

pub use schemas::*;
pub use xform_common_api::XformCommonApi;
pub use xform_op::*;

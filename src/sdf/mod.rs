//! Scene Description Foundations

mod file_format;
mod path;
mod path_parser;
mod value_type_name;

pub use file_format::*;
pub use path::*;
pub use value_type_name::*;

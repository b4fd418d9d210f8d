use crate::{sdf, tf};
use std::path::PathBuf;

/// Errors reported by stage, prim and attribute operations.
///
/// Lookups that may legitimately find nothing (`prim_at_path`, `child`) return
/// `Option` instead of an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid path `{path}`: {reason}")]
	InvalidPath { path: String, reason: String },

	#[error("prim <{path}> is a `{existing}`, cannot define it as `{requested}`")]
	SchemaConflict {
		path: sdf::Path,
		existing: tf::Token,
		requested: tf::Token,
	},

	#[error("unknown schema type `{0}`")]
	UnknownSchema(tf::Token),

	#[error("prim <{parent}> already has a child named `{name}`")]
	DuplicateChild { parent: sdf::Path, name: tf::Token },

	#[error("prim <{prim}> has no attribute `{name}`")]
	UnknownAttribute { prim: sdf::Path, name: tf::Token },

	#[error("attribute `{name}` is `{expected}`, got a `{found}` value")]
	TypeMismatch {
		name: tf::Token,
		expected: String,
		found: &'static str,
	},

	#[error("prim <{0}> does not exist")]
	ExpiredPrim(sdf::Path),

	#[error("a stage already exists at {0}")]
	AlreadyExists(PathBuf),

	#[error("no stage exists at {0}")]
	NotFound(PathBuf),

	#[error("stage is closed")]
	ClosedStage,

	#[error("failed to parse {location}: {message}")]
	Parse { location: String, message: String },

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
	pub(crate) fn invalid_path(path: impl ToString, reason: impl ToString) -> Self {
		Error::InvalidPath {
			path: path.to_string(),
			reason: reason.to_string(),
		}
	}
}

use crate::{Result, usd};
use std::path::Path;

/// Storage backend that a [`usd::Stage`] persists its prim tree through.
///
/// The location handed to [`FileFormat::create`] doubles as the handle for later
/// [`FileFormat::save`] calls. Implementations report storage failures as [`crate::Error::Io`]
/// and malformed documents as [`crate::Error::Parse`].
pub trait FileFormat: Send + Sync {
	/// Return true if a document exists at `location`.
	fn exists(&self, location: &Path) -> Result<bool>;

	/// Create an empty document at `location`.
	fn create(&self, location: &Path) -> Result<()>;

	/// Read the document at `location` back into a prim tree.
	fn open(&self, location: &Path) -> Result<usd::PrimTree>;

	/// Replace the document at `location` with `tree`.
	///
	/// A failed save leaves `tree` untouched; what remains in storage is up to the implementation.
	fn save(&self, location: &Path, tree: &usd::PrimTree) -> Result<()>;
}

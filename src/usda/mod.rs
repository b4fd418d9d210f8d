//! USDA text persistence.

mod parser;
mod writer;

pub use parser::parse;
pub use writer::{format_value, write};

use crate::{Result, sdf, usd::PrimTree};
use std::{
	collections::HashMap,
	fs,
	io::Write as _,
	path::{Path, PathBuf},
	sync::{Arc, Mutex, PoisonError},
};

/// Stores stages as `.usda` text files on the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct UsdaFormat;

impl sdf::FileFormat for UsdaFormat {
	fn exists(&self, location: &Path) -> Result<bool> {
		Ok(location.try_exists()?)
	}

	fn create(&self, location: &Path) -> Result<()> {
		if let Some(parent) = location.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent)?;
		}
		let mut file = fs::OpenOptions::new()
			.write(true)
			.create_new(true)
			.open(location)?;
		file.write_all(write(&PrimTree::new()).as_bytes())?;
		tracing::debug!(location = %location.display(), "created usda file");
		Ok(())
	}

	fn open(&self, location: &Path) -> Result<PrimTree> {
		let text = fs::read_to_string(location)?;
		tracing::debug!(location = %location.display(), bytes = text.len(), "read usda file");
		parse(&text, &location.display().to_string())
	}

	fn save(&self, location: &Path, tree: &PrimTree) -> Result<()> {
		let text = write(tree);

		// Write next to the target and rename over it so a failed write never truncates it.
		let file_name = location.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
		let temp = location.with_file_name(format!(".{}.tmp", file_name));
		fs::write(&temp, &text)?;
		if let Err(err) = fs::rename(&temp, location) {
			let _ = fs::remove_file(&temp);
			return Err(err.into());
		}

		tracing::debug!(location = %location.display(), bytes = text.len(), "wrote usda file");
		Ok(())
	}
}

/// Keeps documents in memory, keyed by location. Clones share the same documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryFormat {
	documents: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl MemoryFormat {
	pub fn new() -> Self {
		Self::default()
	}

	/// The USDA text last stored at `location`.
	pub fn document(&self, location: impl AsRef<Path>) -> Option<String> {
		self.documents
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.get(location.as_ref())
			.cloned()
	}

	/// Store `text` at `location`, replacing whatever was there.
	pub fn insert(&self, location: impl Into<PathBuf>, text: impl Into<String>) {
		self.documents
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.insert(location.into(), text.into());
	}
}

impl sdf::FileFormat for MemoryFormat {
	fn exists(&self, location: &Path) -> Result<bool> {
		Ok(self.document(location).is_some())
	}

	fn create(&self, location: &Path) -> Result<()> {
		self.insert(location, write(&PrimTree::new()));
		Ok(())
	}

	fn open(&self, location: &Path) -> Result<PrimTree> {
		let text = self.document(location).ok_or_else(|| {
			std::io::Error::new(
				std::io::ErrorKind::NotFound,
				format!("no document at {}", location.display()),
			)
		})?;
		parse(&text, &location.display().to_string())
	}

	fn save(&self, location: &Path, tree: &PrimTree) -> Result<()> {
		self.insert(location, write(tree));
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{Error, sdf::FileFormat, usd::PrimSpec};

	fn sample() -> PrimTree {
		let mut tree = PrimTree::new();
		let root = sdf::Path::absolute_root_path();
		tree.add_child(&root, PrimSpec::new("Geometry", "Scope")).unwrap();
		tree.add_child(&sdf::Path::parse("/Geometry").unwrap(), PrimSpec::new("Box", "Cube"))
			.unwrap();
		tree
	}

	#[test]
	fn filesystem_round_trip() {
		let dir = tempfile::tempdir().unwrap();
		let location = dir.path().join("nested").join("scene.usda");

		assert!(!UsdaFormat.exists(&location).unwrap());
		UsdaFormat.create(&location).unwrap();
		assert!(UsdaFormat.exists(&location).unwrap());
		assert_eq!(UsdaFormat.open(&location).unwrap(), PrimTree::new());
		assert!(matches!(UsdaFormat.create(&location), Err(Error::Io(_))));

		UsdaFormat.save(&location, &sample()).unwrap();
		assert_eq!(UsdaFormat.open(&location).unwrap(), sample());
		assert_eq!(fs::read_to_string(&location).unwrap(), write(&sample()));
		assert!(!dir.path().join("nested").join(".scene.usda.tmp").exists());
	}

	#[test]
	fn open_reports_malformed_files() {
		let dir = tempfile::tempdir().unwrap();
		let location = dir.path().join("broken.usda");
		fs::write(&location, "#usda 1.0\ndef \"A\" {\n").unwrap();

		match UsdaFormat.open(&location) {
			Err(Error::Parse { location: name, .. }) => assert!(name.ends_with("broken.usda")),
			other => panic!("unexpected result: {:?}", other),
		}
		assert!(matches!(UsdaFormat.open(&dir.path().join("missing.usda")), Err(Error::Io(_))));
	}

	#[test]
	fn memory_documents_are_shared() {
		let format = MemoryFormat::new();
		let location = Path::new("scene.usda");
		assert!(!format.exists(location).unwrap());

		format.create(location).unwrap();
		format.clone().save(location, &sample()).unwrap();
		assert_eq!(format.document(location), Some(write(&sample())));
		assert_eq!(format.open(location).unwrap(), sample());
		assert!(matches!(format.open(Path::new("other.usda")), Err(Error::Io(_))));
	}
}

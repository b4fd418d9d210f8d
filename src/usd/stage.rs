use super::{Prim, PrimRange, PrimTree, SchemaRegistry};
use crate::{Error, Result, sdf, tf, usda};
use std::cell::{Cell, Ref, RefCell};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where a [`Stage`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
	/// Freshly created through [`Stage::create_new`].
	Created,
	/// Loaded through [`Stage::open`].
	Opened,
	/// Edited since it was created, opened or last saved.
	Mutated,
	Saved,
	/// Terminal. Every further call fails with [`Error::ClosedStage`].
	Closed,
}

/// The pieces a [`Stage`] is built from.
#[derive(Clone)]
pub struct StageConfig {
	pub format: Arc<dyn sdf::FileFormat>,
	pub registry: Arc<SchemaRegistry>,
}

impl Default for StageConfig {
	/// USDA files on disk, with the builtin schemas.
	fn default() -> Self {
		StageConfig {
			format: Arc::new(usda::UsdaFormat),
			registry: Arc::new(SchemaRegistry::with_builtins()),
		}
	}
}

impl StageConfig {
	pub fn with_format(mut self, format: impl sdf::FileFormat + 'static) -> Self {
		self.format = Arc::new(format);
		self
	}

	pub fn with_registry(mut self, registry: SchemaRegistry) -> Self {
		self.registry = Arc::new(registry);
		self
	}
}

/// The root document: a tree of prims bound to a storage location.
///
/// Handles returned by a stage borrow it, and edits go through `&self`.
/// The stage is not thread-safe; share it between threads behind your own lock.
pub struct Stage {
	location: PathBuf,
	format: Arc<dyn sdf::FileFormat>,
	registry: Arc<SchemaRegistry>,
	tree: RefCell<PrimTree>,
	state: Cell<StageState>,
}

/// Creating and loading stages.
impl Stage {
	/// Create a new, empty stage at `location`, failing if a document already exists there.
	pub fn create_new(location: impl AsRef<Path>) -> Result<Self> {
		Self::create_new_with(location, &StageConfig::default())
	}

	pub fn create_new_with(location: impl AsRef<Path>, config: &StageConfig) -> Result<Self> {
		let location = location.as_ref();
		if config.format.exists(location)? {
			return Err(Error::AlreadyExists(location.to_path_buf()));
		}
		config.format.create(location)?;

		tracing::info!(location = %location.display(), "created stage");
		Ok(Self::new(location, config, PrimTree::new(), StageState::Created))
	}

	/// Load the stage stored at `location`.
	pub fn open(location: impl AsRef<Path>) -> Result<Self> {
		Self::open_with(location, &StageConfig::default())
	}

	/// Load the stage stored at `location`.
	///
	/// Every loaded prim is defined again through the registry, so attributes without an
	/// authored value resolve to the registry's current defaults.
	pub fn open_with(location: impl AsRef<Path>, config: &StageConfig) -> Result<Self> {
		let location = location.as_ref();
		if !config.format.exists(location)? {
			return Err(Error::NotFound(location.to_path_buf()));
		}

		let loaded = config.format.open(location)?;
		let tree = populate(&config.registry, &loaded)?;

		tracing::info!(
			location = %location.display(),
			prims = tree.traverse().count(),
			"opened stage"
		);
		Ok(Self::new(location, config, tree, StageState::Opened))
	}

	fn new(location: &Path, config: &StageConfig, tree: PrimTree, state: StageState) -> Self {
		Stage {
			location: location.to_path_buf(),
			format: config.format.clone(),
			registry: config.registry.clone(),
			tree: RefCell::new(tree),
			state: Cell::new(state),
		}
	}
}

/// Prims.
impl Stage {
	/// Define a prim of `type_name` at `path`, creating untyped ancestors as needed.
	///
	/// Defining an existing prim with its own type is a no-op. An empty `type_name` defines
	/// an untyped container, or leaves an existing prim as it is.
	pub fn define(&self, path: &sdf::Path, type_name: impl Into<tf::Token>) -> Result<Prim<'_>> {
		let type_name = type_name.into();
		let created = self.edit(|tree| self.registry.define(tree, path, &type_name))?;

		for created_path in &created {
			tracing::debug!(path = %created_path, "created prim");
		}
		tracing::debug!(%path, %type_name, "defined prim");

		Ok(Prim::new(self, path.clone()))
	}

	/// Return the prim at the absolute `path`, or `None` if there is none.
	pub fn prim_at_path(&self, path: &sdf::Path) -> Result<Option<Prim<'_>>> {
		let exists = self.read(|tree| tree.has_prim(path))?;
		Ok(exists.then(|| Prim::new(self, path.clone())))
	}

	/// The nameless prim every root prim hangs off.
	pub fn pseudo_root(&self) -> Result<Prim<'_>> {
		self.check_open()?;
		Ok(Prim::new(self, sdf::Path::absolute_root_path()))
	}

	/// Depth-first, pre-order walk over every prim on the stage.
	///
	/// Each call starts a fresh walk. The pseudo-root is not included.
	pub fn traverse(&self) -> Result<PrimRange<'_>> {
		let root = self.pseudo_root()?;
		let mut range = root.traverse();
		range.next();
		Ok(range)
	}

	/// Remove the prim at `path` and everything below it. Returns false if there was nothing to remove.
	pub fn remove_prim(&self, path: &sdf::Path) -> Result<bool> {
		self.check_open()?;
		let removed = self.tree.borrow_mut().remove(path).is_some();
		if removed {
			self.state.set(StageState::Mutated);
			tracing::debug!(%path, "removed prim");
		}
		Ok(removed)
	}
}

/// Persistence.
impl Stage {
	/// Write the stage back to its location.
	///
	/// Saving a stage without unsaved edits does nothing. When the backend fails, the stage
	/// keeps its edits and stays dirty.
	pub fn save(&self) -> Result<()> {
		self.check_open()?;
		if !self.is_dirty() {
			tracing::debug!(location = %self.location.display(), "nothing to save");
			return Ok(());
		}

		self.format.save(&self.location, &self.tree.borrow())?;
		self.state.set(StageState::Saved);

		tracing::info!(location = %self.location.display(), "saved stage");
		Ok(())
	}

	/// Render the current prim tree as USDA text.
	pub fn export_to_string(&self) -> Result<String> {
		self.read(usda::write)
	}

	/// Close the stage. Unsaved edits are discarded.
	pub fn close(&mut self) -> Result<()> {
		self.check_open()?;
		if self.is_dirty() {
			tracing::warn!(location = %self.location.display(), "closing stage with unsaved edits");
		}
		self.state.set(StageState::Closed);
		self.tree.replace(PrimTree::new());

		tracing::info!(location = %self.location.display(), "closed stage");
		Ok(())
	}

	pub fn state(&self) -> StageState {
		self.state.get()
	}

	/// Returns true if the stage has edits that have not been saved.
	pub fn is_dirty(&self) -> bool {
		self.state.get() == StageState::Mutated
	}

	pub fn location(&self) -> &Path {
		&self.location
	}

	pub fn registry(&self) -> &SchemaRegistry {
		&self.registry
	}
}

/// Access for handles.
impl Stage {
	fn check_open(&self) -> Result<()> {
		match self.state.get() {
			StageState::Closed => Err(Error::ClosedStage),
			_ => Ok(()),
		}
	}

	/// Borrow the tree. Handles borrow the stage, so it cannot be closed underneath them.
	pub(crate) fn tree(&self) -> Ref<'_, PrimTree> {
		self.tree.borrow()
	}

	pub(crate) fn read<R>(&self, f: impl FnOnce(&PrimTree) -> R) -> Result<R> {
		self.check_open()?;
		Ok(f(&self.tree.borrow()))
	}

	/// Run `f` against the tree, marking the stage dirty only if it succeeds.
	pub(crate) fn edit<R>(&self, f: impl FnOnce(&mut PrimTree) -> Result<R>) -> Result<R> {
		self.check_open()?;
		let result = f(&mut self.tree.borrow_mut())?;
		self.state.set(StageState::Mutated);
		Ok(result)
	}
}

/// Rebuild a loaded tree through `registry`, carrying over authored values and custom attributes.
fn populate(registry: &SchemaRegistry, loaded: &PrimTree) -> Result<PrimTree> {
	let mut tree = PrimTree::new();

	for (path, loaded_prim) in loaded.traverse() {
		registry.define(&mut tree, &path, loaded_prim.type_name())?;
		let Some(prim) = tree.prim_at_path_mut(&path) else {
			continue;
		};
		let store = prim.attributes_mut();

		for attr in loaded_prim.attributes() {
			let name = attr.name().as_str();
			if !store.contains(name) {
				if !attr.is_custom() {
					tracing::warn!(
						%path,
						attribute = name,
						type_name = %loaded_prim.type_name(),
						"attribute is not part of the schema, keeping it as custom"
					);
				}
				store.add_custom(attr.name().clone(), attr.type_name())?;
			}

			let Some(target) = store.get_mut(name) else {
				continue;
			};
			if target.type_name() != attr.type_name() {
				tracing::warn!(
					%path,
					attribute = name,
					expected = %target.type_name(),
					found = %attr.type_name(),
					"dropping attribute value of the wrong type"
				);
				continue;
			}
			if let Some(value) = attr.authored_value() {
				target.set(value.clone())?;
			}
		}
	}

	Ok(tree)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::usda::MemoryFormat;

	fn p(s: &str) -> sdf::Path {
		sdf::Path::parse(s).unwrap()
	}

	fn memory_stage(format: &MemoryFormat) -> Stage {
		let config = StageConfig::default().with_format(format.clone());
		Stage::create_new_with("scene.usda", &config).unwrap()
	}

	#[test]
	fn state_machine() {
		let format = MemoryFormat::new();
		let mut stage = memory_stage(&format);
		assert_eq!(stage.state(), StageState::Created);
		assert!(!stage.is_dirty());

		stage.define(&p("/A"), "Scope").unwrap();
		assert_eq!(stage.state(), StageState::Mutated);

		stage.save().unwrap();
		assert_eq!(stage.state(), StageState::Saved);
		stage.save().unwrap();
		assert_eq!(stage.state(), StageState::Saved);

		stage.close().unwrap();
		assert_eq!(stage.state(), StageState::Closed);
		assert!(matches!(stage.close(), Err(Error::ClosedStage)));
	}

	#[test]
	fn failed_define_keeps_state() {
		let format = MemoryFormat::new();
		let stage = memory_stage(&format);
		stage.define(&p("/A"), "Cube").unwrap();
		stage.save().unwrap();

		assert!(stage.define(&p("/A"), "Scope").is_err());
		assert_eq!(stage.state(), StageState::Saved);
	}

	#[test]
	fn open_restores_defaults() {
		let format = MemoryFormat::new();
		let stage = memory_stage(&format);
		stage.define(&p("/Box"), "Cube").unwrap();
		stage.save().unwrap();

		let config = StageConfig::default().with_format(format);
		let reopened = Stage::open_with("scene.usda", &config).unwrap();
		assert_eq!(reopened.state(), StageState::Opened);

		let cube = reopened.prim_at_path(&p("/Box")).unwrap().unwrap();
		let size = cube.attribute("size").unwrap();
		assert!(!size.is_authored());
		assert_eq!(size.get::<f64>().unwrap(), 1.0);
	}

	#[test]
	fn remove_prim_marks_dirty() {
		let format = MemoryFormat::new();
		let stage = memory_stage(&format);
		stage.define(&p("/A/B"), "Scope").unwrap();
		stage.save().unwrap();

		assert!(!stage.remove_prim(&p("/Missing")).unwrap());
		assert!(!stage.is_dirty());
		assert!(stage.remove_prim(&p("/A")).unwrap());
		assert!(stage.is_dirty());
		assert!(stage.prim_at_path(&p("/A/B")).unwrap().is_none());
	}
}

use super::{Attribute, PrimSpec};
use crate::{Error, Result, sdf, tf, usd};

/// [`usd::Prim`] is the sole persistent scenegraph object on a [`usd::Stage`].
///
/// It is a lightweight view made of the stage and a path. The prim it points at may be
/// removed while the handle lives, after which [`Prim::is_valid`] returns false.
#[derive(Clone)]
pub struct Prim<'a> {
	stage: &'a usd::Stage,
	path: sdf::Path,
}

impl<'a> Prim<'a> {
	pub(crate) fn new(stage: &'a usd::Stage, path: sdf::Path) -> Self {
		Prim { stage, path }
	}

	pub fn stage(&self) -> &'a usd::Stage {
		self.stage
	}

	pub fn path(&self) -> &sdf::Path {
		&self.path
	}

	pub fn name(&self) -> tf::Token {
		self.path.name_token()
	}

	pub fn is_pseudo_root(&self) -> bool {
		self.path.is_absolute_root()
	}

	/// Returns true while a prim exists at this handle's path.
	pub fn is_valid(&self) -> bool {
		self.stage.tree().has_prim(&self.path)
	}

	/// The schema type of this prim, empty for untyped prims or when the prim is gone.
	pub fn type_name(&self) -> tf::Token {
		self.with_spec(|spec| spec.type_name().clone())
			.unwrap_or_default()
	}

	pub fn parent(&self) -> Option<Prim<'a>> {
		if self.is_pseudo_root() {
			return None;
		}
		Some(Prim::new(self.stage, self.path.parent_path()))
	}

	pub(crate) fn with_spec<R>(&self, f: impl FnOnce(&PrimSpec) -> R) -> Result<R> {
		let tree = self.stage.tree();
		let spec = tree
			.prim_at_path(&self.path)
			.ok_or_else(|| Error::ExpiredPrim(self.path.clone()))?;
		Ok(f(spec))
	}

	pub(crate) fn with_spec_mut<R>(&self, f: impl FnOnce(&mut PrimSpec) -> Result<R>) -> Result<R> {
		self.stage.edit(|tree| {
			let spec = tree
				.prim_at_path_mut(&self.path)
				.ok_or_else(|| Error::ExpiredPrim(self.path.clone()))?;
			f(spec)
		})
	}
}

/// Hierarchy
impl<'a> Prim<'a> {
	/// Return the direct child called `name`.
	///
	/// Only immediate children are considered. A deeper descendant with the same name is not found.
	pub fn child(&self, name: impl AsRef<str>) -> Option<Prim<'a>> {
		let name = name.as_ref();
		let found = self
			.with_spec(|spec| spec.child(name).map(|child| child.name().clone()))
			.ok()
			.flatten()?;
		Some(Prim::new(self.stage, self.path.child_path(&found)))
	}

	pub fn children(&self) -> ChildrenIter<'a> {
		ChildrenIter::new(self.stage, &self.path)
	}

	/// Depth-first, pre-order walk starting at this prim.
	pub fn traverse(&self) -> PrimRange<'a> {
		PrimRange {
			stage: self.stage,
			stack: vec![self.path.clone()],
		}
	}
}

/// Attributes
impl<'a> Prim<'a> {
	/// Return the attribute called `name`, declared either by the schema or on this prim alone.
	pub fn attribute(&self, name: impl AsRef<str>) -> Result<Attribute<'a>> {
		let name = name.as_ref();
		let (name, type_name, custom) = self
			.with_spec(|spec| {
				spec.attributes()
					.get(name)
					.map(|attr| (attr.name().clone(), attr.type_name(), attr.is_custom()))
			})?
			.ok_or_else(|| Error::UnknownAttribute {
				prim: self.path.clone(),
				name: tf::Token::new(name),
			})?;

		Ok(Attribute::new(self.clone(), name, type_name, custom))
	}

	pub fn has_attribute(&self, name: impl AsRef<str>) -> bool {
		self.with_spec(|spec| spec.attributes().contains(name.as_ref()))
			.unwrap_or(false)
	}

	/// Schema attribute names in declaration order, followed by custom ones in creation order.
	pub fn attribute_names(&self) -> Vec<tf::Token> {
		self.with_spec(|spec| spec.attributes().names())
			.unwrap_or_default()
	}

	/// The attribute names this prim's type declares.
	pub fn schema_attribute_names(&self) -> Vec<tf::Token> {
		self.stage
			.registry()
			.find(self.type_name().as_str())
			.map(|definition| definition.attribute_names())
			.unwrap_or_default()
	}

	/// Add an attribute to this prim outside of its schema.
	///
	/// An existing attribute of the same type is returned as is.
	pub fn create_attribute(
		&self,
		name: impl Into<tf::Token>,
		type_name: sdf::ValueTypeName,
	) -> Result<Attribute<'a>> {
		let name = name.into();
		if !sdf::is_valid_property_name(name.as_str()) {
			return Err(Error::invalid_path(
				format!("{}.{}", self.path, name),
				"not a valid attribute name",
			));
		}

		if let Ok(existing) = self.attribute(&name) {
			if existing.type_name() != type_name {
				return Err(Error::TypeMismatch {
					name,
					expected: existing.type_name().to_string(),
					found: type_name.as_str(),
				});
			}
			return Ok(existing);
		}

		self.with_spec_mut(|spec| {
			spec.attributes_mut().add_custom(name.clone(), type_name)?;
			Ok(())
		})?;
		tracing::debug!(prim = %self.path, attribute = %name, %type_name, "created attribute");

		Ok(Attribute::new(self.clone(), name, type_name, true))
	}
}

impl std::fmt::Debug for Prim<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.debug_tuple("Prim").field(&self.path).finish()
	}
}

/// Iterator over the direct children of a prim, in insertion order.
///
/// The child names are captured when the iterator is created.
pub struct ChildrenIter<'a> {
	stage: &'a usd::Stage,
	base_path: sdf::Path,
	prim_children: Vec<tf::Token>,
	index: usize,
}

impl<'a> ChildrenIter<'a> {
	fn new(stage: &'a usd::Stage, path: &sdf::Path) -> Self {
		let prim_children = stage
			.tree()
			.prim_at_path(path)
			.map(|spec| spec.children().iter().map(|c| c.name().clone()).collect())
			.unwrap_or_default();

		ChildrenIter {
			stage,
			base_path: path.clone(),
			prim_children,
			index: 0,
		}
	}
}

impl<'a> Iterator for ChildrenIter<'a> {
	type Item = Prim<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		let name = self.prim_children.get(self.index)?;
		self.index += 1;
		Some(Prim::new(self.stage, self.base_path.child_path(name)))
	}
}

/// Lazy depth-first, pre-order walk over prims. Siblings come in insertion order.
///
/// The tree is looked up again at every step, so prims removed mid-walk are skipped.
pub struct PrimRange<'a> {
	stage: &'a usd::Stage,
	stack: Vec<sdf::Path>,
}

impl<'a> Iterator for PrimRange<'a> {
	type Item = Prim<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			let path = self.stack.pop()?;
			let tree = self.stage.tree();
			let Some(spec) = tree.prim_at_path(&path) else {
				continue;
			};

			for child in spec.children().iter().rev() {
				self.stack.push(path.child_path(child.name()));
			}
			return Some(Prim::new(self.stage, path));
		}
	}
}

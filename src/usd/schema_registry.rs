use super::{AttributeSpec, PrimSpec, PrimTree};
use crate::{Error, Result, sdf, tf, vt};
use std::collections::HashMap;
use std::sync::Arc;

/// An attribute a schema declares, with the value it falls back to when unauthored.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDefinition {
	pub name: tf::Token,
	pub type_name: sdf::ValueTypeName,
	pub default: vt::Value,
}

/// The attribute set of one prim type, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimDefinition {
	attributes: Vec<AttributeDefinition>,
}

impl PrimDefinition {
	pub fn new() -> Self {
		Self::default()
	}

	/// Declare every attribute of `base`, in its order.
	pub fn inherit(self, base: &PrimDefinition) -> Self {
		base.attributes.iter().fold(self, |def, attr| {
			def.attribute(attr.name.clone(), attr.type_name, attr.default.clone())
		})
	}

	/// Declare an attribute. Redeclaring a name replaces its type and default in place.
	pub fn attribute(
		mut self,
		name: impl Into<tf::Token>,
		type_name: sdf::ValueTypeName,
		default: impl Into<vt::Value>,
	) -> Self {
		let definition = AttributeDefinition {
			name: name.into(),
			type_name,
			default: default.into(),
		};

		match self.attributes.iter_mut().find(|a| a.name == definition.name) {
			Some(existing) => *existing = definition,
			None => self.attributes.push(definition),
		}
		self
	}

	pub fn attributes(&self) -> &[AttributeDefinition] {
		&self.attributes
	}

	pub fn attribute_names(&self) -> Vec<tf::Token> {
		self.attributes.iter().map(|a| a.name.clone()).collect()
	}

	pub fn find(&self, name: &str) -> Option<&AttributeDefinition> {
		self.attributes.iter().find(|a| a.name == name)
	}

	fn validate(&self) -> Result<()> {
		for attr in &self.attributes {
			if !sdf::is_valid_property_name(attr.name.as_str()) {
				return Err(Error::invalid_path(
					format!(".{}", attr.name),
					"not a valid attribute name",
				));
			}
			if !attr.type_name.accepts(&attr.default) {
				return Err(Error::TypeMismatch {
					name: attr.name.clone(),
					expected: attr.type_name.to_string(),
					found: attr.default.type_name(),
				});
			}
		}
		Ok(())
	}

	fn instantiate(&self) -> Vec<AttributeSpec> {
		self.attributes
			.iter()
			.map(|a| AttributeSpec::new(a.name.clone(), a.type_name, a.default.clone()))
			.collect()
	}
}

/// Maps prim type names to their [`PrimDefinition`].
///
/// The empty type name always resolves to an untyped definition without attributes.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
	schemas: HashMap<tf::Token, Arc<PrimDefinition>>,
}

impl SchemaRegistry {
	/// An empty registry that only knows untyped prims.
	pub fn new() -> Self {
		Self::default()
	}

	/// A registry holding the geometry and lighting schemas shipped with this crate.
	pub fn with_builtins() -> Self {
		let mut registry = Self::new();
		crate::usd_geom::register_schemas(&mut registry);
		crate::usd_lux::register_schemas(&mut registry);
		registry
	}

	/// Add or replace the schema for `type_name`.
	pub fn register(
		&mut self,
		type_name: impl Into<tf::Token>,
		definition: PrimDefinition,
	) -> Result<()> {
		let type_name = type_name.into();
		if type_name.is_empty() || !sdf::is_valid_identifier(type_name.as_str()) {
			return Err(Error::UnknownSchema(type_name));
		}
		definition.validate()?;
		self.insert(type_name, definition);
		Ok(())
	}

	pub(crate) fn insert(&mut self, type_name: tf::Token, definition: PrimDefinition) {
		tracing::debug!(%type_name, attributes = definition.attributes.len(), "registered schema");
		self.schemas.insert(type_name, Arc::new(definition));
	}

	pub fn find(&self, type_name: &str) -> Option<Arc<PrimDefinition>> {
		if type_name.is_empty() {
			return Some(Arc::new(PrimDefinition::new()));
		}
		self.schemas.get(type_name).cloned()
	}

	pub fn is_registered(&self, type_name: &str) -> bool {
		type_name.is_empty() || self.schemas.contains_key(type_name)
	}

	/// Every registered type name, sorted.
	pub fn type_names(&self) -> Vec<tf::Token> {
		let mut names: Vec<_> = self.schemas.keys().cloned().collect();
		names.sort();
		names
	}

	/// Define a prim of `type_name` at `path` in `tree`, returning the paths it created.
	///
	/// Missing ancestors are created as untyped prims. An existing prim is left alone when its
	/// type matches or `type_name` is empty. An existing untyped prim takes on `type_name`.
	/// Any other existing type is a [`Error::SchemaConflict`]. Nothing is modified on error.
	pub fn define(
		&self,
		tree: &mut PrimTree,
		path: &sdf::Path,
		type_name: &tf::Token,
	) -> Result<Vec<sdf::Path>> {
		if !path.is_absolute() || path.is_absolute_root() {
			return Err(Error::invalid_path(path, "can only define prims at absolute prim paths"));
		}

		let definition = self
			.find(type_name.as_str())
			.ok_or_else(|| Error::UnknownSchema(type_name.clone()))?;

		if let Some(existing) = tree.prim_at_path_mut(path) {
			if existing.type_name() == type_name || type_name.is_empty() {
				return Ok(Vec::new());
			}

			if !existing.type_name().is_empty() {
				return Err(Error::SchemaConflict {
					path: path.clone(),
					existing: existing.type_name().clone(),
					requested: type_name.clone(),
				});
			}

			let schema = definition.instantiate();
			existing.attributes().check_schema(&schema)?;
			existing.attributes_mut().apply_schema(schema);
			existing.set_type_name(type_name.clone());
			tracing::debug!(%path, %type_name, "promoted untyped prim");
			return Ok(Vec::new());
		}

		let mut created = Vec::new();
		let mut ancestors: Vec<sdf::Path> = path.ancestors_range().skip(1).collect();
		ancestors.reverse();
		for ancestor in ancestors {
			if !tree.has_prim(&ancestor) {
				tree.add_child(&ancestor.parent_path(), PrimSpec::new(ancestor.name_token(), ""))?;
				created.push(ancestor);
			}
		}

		let mut leaf = PrimSpec::new(path.name_token(), type_name.clone());
		leaf.attributes_mut().apply_schema(definition.instantiate());
		tree.add_child(&path.parent_path(), leaf)?;
		created.push(path.clone());

		Ok(created)
	}
}

use super::{AttributeSpec, Prim};
use crate::{
	Error, Result, sdf, tf,
	vt::{self, ValueType},
};

/// Scenegraph object for authoring and retrieving a typed value on a [`Prim`].
///
/// Reads return the authored opinion when there is one and the schema default otherwise.
/// Writes replace the opinion outright; no history is kept.
#[derive(Clone)]
pub struct Attribute<'a> {
	prim: Prim<'a>,
	name: tf::Token,
	type_name: sdf::ValueTypeName,
	custom: bool,
}

impl<'a> Attribute<'a> {
	pub(crate) fn new(
		prim: Prim<'a>,
		name: tf::Token,
		type_name: sdf::ValueTypeName,
		custom: bool,
	) -> Self {
		Attribute {
			prim,
			name,
			type_name,
			custom,
		}
	}

	pub fn prim(&self) -> &Prim<'a> {
		&self.prim
	}

	pub fn name(&self) -> &tf::Token {
		&self.name
	}

	pub fn type_name(&self) -> sdf::ValueTypeName {
		self.type_name
	}

	/// Returns true if the attribute was added to its prim outside of the schema.
	pub fn is_custom(&self) -> bool {
		self.custom
	}

	fn with_spec<R>(&self, f: impl FnOnce(&AttributeSpec) -> R) -> Result<R> {
		self.prim
			.with_spec(|prim| prim.attributes().get(self.name.as_str()).map(f))?
			.ok_or_else(|| self.unknown())
	}

	fn unknown(&self) -> Error {
		Error::UnknownAttribute {
			prim: self.prim.path().clone(),
			name: self.name.clone(),
		}
	}
}

/// Reading
impl<'a> Attribute<'a> {
	pub fn get_value(&self) -> Result<vt::Value> {
		self.with_spec(|spec| spec.value().clone())
	}

	/// Return the value as a `T`, failing with [`Error::TypeMismatch`] if it holds something else.
	pub fn get<T: ValueType>(&self) -> Result<T> {
		let value = self.get_value()?;
		value.get::<T>().ok_or_else(|| Error::TypeMismatch {
			name: self.name.clone(),
			expected: self.type_name.to_string(),
			found: std::any::type_name::<T>(),
		})
	}

	pub fn try_get<T: ValueType>(&self) -> Option<T> {
		self.get_value().ok()?.get::<T>()
	}

	/// Returns true if a value has been set, as opposed to falling back to the schema default.
	pub fn is_authored(&self) -> bool {
		self.with_spec(|spec| spec.is_authored()).unwrap_or(false)
	}
}

/// Authoring
impl<'a> Attribute<'a> {
	/// Author `value`, replacing any earlier one. The value must match the declared type.
	pub fn set(&self, value: impl Into<vt::Value>) -> Result<()> {
		let value = value.into();
		self.prim.with_spec_mut(|prim| {
			prim.attributes_mut()
				.get_mut(self.name.as_str())
				.ok_or_else(|| self.unknown())?
				.set(value)
		})?;

		tracing::debug!(prim = %self.prim.path(), attribute = %self.name, "set attribute");
		Ok(())
	}

	/// Drop the authored value so the attribute falls back to its default again.
	pub fn clear(&self) -> Result<()> {
		self.prim.with_spec_mut(|prim| {
			prim.attributes_mut()
				.get_mut(self.name.as_str())
				.ok_or_else(|| self.unknown())?
				.clear();
			Ok(())
		})?;

		tracing::debug!(prim = %self.prim.path(), attribute = %self.name, "cleared attribute");
		Ok(())
	}
}

impl std::fmt::Debug for Attribute<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.debug_struct("Attribute")
			.field("prim", self.prim.path())
			.field("name", &self.name)
			.field("type_name", &self.type_name)
			.finish()
	}
}

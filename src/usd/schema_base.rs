use crate::usd;

/// The base class for all schema types.
///
/// Schema objects hold a [`usd::Prim`] internally and provide a
/// layer of specific named API atop the underlying scene graph.
#[derive(Clone, Debug)]
pub struct SchemaBase<'a>(usd::Prim<'a>);

impl<'a> SchemaBase<'a> {
	pub(crate) fn new(prim: usd::Prim<'a>) -> Self {
		SchemaBase(prim)
	}

	pub fn prim(&self) -> &usd::Prim<'a> {
		&self.0
	}

	pub fn into_prim(self) -> usd::Prim<'a> {
		self.0
	}
}

impl<'a> std::ops::Deref for SchemaBase<'a> {
	type Target = usd::Prim<'a>;
	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Declares a typed schema wrapper around [`usd::SchemaBase`] for the prim type `$type_name`.
macro_rules! declare_schema {
	($(#[$meta:meta])* $name:ident, $type_name:literal) => {
		$(#[$meta])*
		#[derive(Clone, Debug)]
		pub struct $name<'a>($crate::usd::SchemaBase<'a>);

		impl<'a> $name<'a> {
			/// The prim type this schema wraps.
			pub const TYPE_NAME: &'static str = $type_name;

			/// Define a prim of this type at `path`, creating untyped ancestors as needed.
			pub fn define(
				stage: &'a $crate::usd::Stage,
				path: &$crate::sdf::Path,
			) -> $crate::Result<Self> {
				let prim = stage.define(path, Self::TYPE_NAME)?;
				Ok(Self($crate::usd::SchemaBase::new(prim)))
			}

			/// Wrap `prim`, or return `None` if it has another type.
			pub fn new(prim: $crate::usd::Prim<'a>) -> Option<Self> {
				(prim.type_name() == Self::TYPE_NAME)
					.then(|| Self($crate::usd::SchemaBase::new(prim)))
			}

			/// Return the prim at `path` if it exists and has this type.
			pub fn get(
				stage: &'a $crate::usd::Stage,
				path: &$crate::sdf::Path,
			) -> $crate::Result<Option<Self>> {
				Ok(stage.prim_at_path(path)?.and_then(Self::new))
			}

			pub fn into_prim(self) -> $crate::usd::Prim<'a> {
				self.0.into_prim()
			}
		}

		impl<'a> std::ops::Deref for $name<'a> {
			type Target = $crate::usd::SchemaBase<'a>;
			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
	};
}

pub(crate) use declare_schema;

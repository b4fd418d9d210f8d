use crate::{
	declare_public_tokens, gf,
	sdf::ValueTypeName,
	tf,
	usd::{self, PrimDefinition, SchemaRegistry, declare_schema},
};

declare_public_tokens!(Tokens, TOKENS, [
	default: "default",
	double_sided: "doubleSided",
	extent: "extent",
	inherited: "inherited",
	orientation: "orientation",
	primvars_display_color: "primvars:displayColor",
	primvars_display_opacity: "primvars:displayOpacity",
	purpose: "purpose",
	right_handed: "rightHanded",
	size: "size",
	visibility: "visibility",
	xform_op_order: "xformOpOrder",
]);

/// Attributes shared by everything that can be rendered or hidden.
pub fn imageable_definition() -> PrimDefinition {
	PrimDefinition::new()
		.attribute(&TOKENS.visibility, ValueTypeName::Token, TOKENS.inherited.clone())
		.attribute(&TOKENS.purpose, ValueTypeName::Token, TOKENS.default.clone())
}

/// [`imageable_definition`] plus an ordered stack of transform operations.
pub fn xformable_definition() -> PrimDefinition {
	imageable_definition().attribute(
		&TOKENS.xform_op_order,
		ValueTypeName::TokenArray,
		Vec::<tf::Token>::new(),
	)
}

fn boundable_definition() -> PrimDefinition {
	xformable_definition().attribute(&TOKENS.extent, ValueTypeName::Float3Array, Vec::<gf::Vec3f>::new())
}

fn gprim_definition() -> PrimDefinition {
	boundable_definition()
		.attribute(&TOKENS.double_sided, ValueTypeName::Bool, false)
		.attribute(&TOKENS.orientation, ValueTypeName::Token, TOKENS.right_handed.clone())
		.attribute(
			&TOKENS.primvars_display_color,
			ValueTypeName::Color3fArray,
			Vec::<gf::Vec3f>::new(),
		)
		.attribute(&TOKENS.primvars_display_opacity, ValueTypeName::FloatArray, Vec::<f32>::new())
}

fn cube_definition() -> PrimDefinition {
	gprim_definition()
		.attribute(
			&TOKENS.extent,
			ValueTypeName::Float3Array,
			vec![gf::Vec3f::new(-1.0, -1.0, -1.0), gf::Vec3f::new(1.0, 1.0, 1.0)],
		)
		.attribute(&TOKENS.size, ValueTypeName::Double, 1.0f64)
}

pub(crate) fn register_schemas(registry: &mut SchemaRegistry) {
	registry.insert(tf::Token::new(Scope::TYPE_NAME), imageable_definition());
	registry.insert(tf::Token::new(Xform::TYPE_NAME), xformable_definition());
	registry.insert(tf::Token::new(Cube::TYPE_NAME), cube_definition());
}

declare_schema!(
	/// A grouping prim that carries no transform.
	Scope,
	"Scope"
);

impl<'a> Scope<'a> {
	pub fn visibility_attr(&self) -> crate::Result<usd::Attribute<'a>> {
		self.prim().attribute(&TOKENS.visibility)
	}

	pub fn purpose_attr(&self) -> crate::Result<usd::Attribute<'a>> {
		self.prim().attribute(&TOKENS.purpose)
	}
}

declare_schema!(
	/// A transformable grouping prim.
	Xform,
	"Xform"
);

impl<'a> Xform<'a> {
	pub fn visibility_attr(&self) -> crate::Result<usd::Attribute<'a>> {
		self.prim().attribute(&TOKENS.visibility)
	}

	/// Encodes the sequence of transformation operations in the order in which they should be
	/// pushed onto a transform stack while visiting a scene graph.
	pub fn xform_op_order_attr(&self) -> crate::Result<usd::Attribute<'a>> {
		self.prim().attribute(&TOKENS.xform_op_order)
	}
}

declare_schema!(
	/// Defines a primitive rectilinear cube centered at the origin.
	///
	/// The fallback values for cube, sphere, cone and cylinder are set so that they all pack
	/// into the same volume/bounds.
	Cube,
	"Cube"
);

impl<'a> Cube<'a> {
	/// Indicates the length of each edge of the cube.
	pub fn size_attr(&self) -> crate::Result<usd::Attribute<'a>> {
		self.prim().attribute(&TOKENS.size)
	}

	/// Extent is re-defined on Cube only to provide a fallback value.
	pub fn extent_attr(&self) -> crate::Result<usd::Attribute<'a>> {
		self.prim().attribute(&TOKENS.extent)
	}

	/// It is useful to have an "official" colorSet that can be used as a display or modeling
	/// color, even in the absence of any specified shader for a gprim.
	pub fn display_color_attr(&self) -> crate::Result<usd::Attribute<'a>> {
		self.prim().attribute(&TOKENS.primvars_display_color)
	}

	pub fn display_opacity_attr(&self) -> crate::Result<usd::Attribute<'a>> {
		self.prim().attribute(&TOKENS.primvars_display_opacity)
	}

	pub fn double_sided_attr(&self) -> crate::Result<usd::Attribute<'a>> {
		self.prim().attribute(&TOKENS.double_sided)
	}

	pub fn orientation_attr(&self) -> crate::Result<usd::Attribute<'a>> {
		self.prim().attribute(&TOKENS.orientation)
	}

	pub fn xform_op_order_attr(&self) -> crate::Result<usd::Attribute<'a>> {
		self.prim().attribute(&TOKENS.xform_op_order)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{sdf, vt};

	#[test]
	fn builtin_definitions_are_valid() {
		let registry = SchemaRegistry::with_builtins();
		let mut checked = SchemaRegistry::new();
		for type_name in registry.type_names() {
			let definition = registry.find(type_name.as_str()).unwrap();
			checked.register(type_name, (*definition).clone()).unwrap();
		}
	}

	#[test]
	fn cube_overrides_extent_in_place() {
		let cube = cube_definition();
		let names: Vec<_> = cube.attribute_names().iter().map(|n| n.to_string()).collect();
		assert_eq!(
			names,
			vec![
				"visibility",
				"purpose",
				"xformOpOrder",
				"extent",
				"doubleSided",
				"orientation",
				"primvars:displayColor",
				"primvars:displayOpacity",
				"size"
			]
		);
		assert_eq!(
			cube.find("extent").unwrap().default,
			vt::Value::new(vec![gf::Vec3f::new(-1.0, -1.0, -1.0), gf::Vec3f::new(1.0, 1.0, 1.0)])
		);
	}

	#[test]
	fn typed_wrappers_check_the_type() {
		let format = crate::usda::MemoryFormat::new();
		let config = usd::StageConfig::default().with_format(format);
		let stage = usd::Stage::create_new_with("geom.usda", &config).unwrap();

		let path = sdf::Path::parse("/Box").unwrap();
		let cube = Cube::define(&stage, &path).unwrap();
		assert_eq!(cube.size_attr().unwrap().get::<f64>().unwrap(), 1.0);
		assert_eq!(cube.path(), &path);

		assert!(Cube::get(&stage, &path).unwrap().is_some());
		assert!(Xform::get(&stage, &path).unwrap().is_none());
		assert!(Scope::define(&stage, &path).is_err());

		let prim = cube.into_prim();
		assert_eq!(prim.path(), &path);
		assert!(Cube::new(prim).is_some());
	}
}

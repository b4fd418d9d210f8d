//! Lighting schemas.

use crate::{
	declare_public_tokens, gf,
	sdf::ValueTypeName,
	tf,
	usd::{self, PrimDefinition, SchemaRegistry, declare_schema},
	usd_geom,
};

declare_public_tokens!(Tokens, TOKENS, [
	automatic: "automatic",
	guide_radius: "guideRadius",
	inputs_angle: "inputs:angle",
	inputs_color: "inputs:color",
	inputs_color_temperature: "inputs:colorTemperature",
	inputs_diffuse: "inputs:diffuse",
	inputs_enable_color_temperature: "inputs:enableColorTemperature",
	inputs_exposure: "inputs:exposure",
	inputs_intensity: "inputs:intensity",
	inputs_normalize: "inputs:normalize",
	inputs_specular: "inputs:specular",
	inputs_texture_file: "inputs:texture:file",
	inputs_texture_format: "inputs:texture:format",
]);

/// Inputs every light shares, on top of being transformable.
fn light_definition() -> PrimDefinition {
	usd_geom::xformable_definition()
		.attribute(&TOKENS.inputs_color, ValueTypeName::Color3f, gf::Vec3f::new(1.0, 1.0, 1.0))
		.attribute(&TOKENS.inputs_color_temperature, ValueTypeName::Float, 6500.0f32)
		.attribute(&TOKENS.inputs_diffuse, ValueTypeName::Float, 1.0f32)
		.attribute(&TOKENS.inputs_enable_color_temperature, ValueTypeName::Bool, false)
		.attribute(&TOKENS.inputs_exposure, ValueTypeName::Float, 0.0f32)
		.attribute(&TOKENS.inputs_intensity, ValueTypeName::Float, 1.0f32)
		.attribute(&TOKENS.inputs_normalize, ValueTypeName::Bool, false)
		.attribute(&TOKENS.inputs_specular, ValueTypeName::Float, 1.0f32)
}

fn dome_light_definition() -> PrimDefinition {
	light_definition()
		.attribute(&TOKENS.guide_radius, ValueTypeName::Float, 100000.0f32)
		.attribute(&TOKENS.inputs_texture_file, ValueTypeName::String, String::new())
		.attribute(&TOKENS.inputs_texture_format, ValueTypeName::Token, TOKENS.automatic.clone())
}

fn distant_light_definition() -> PrimDefinition {
	light_definition()
		.attribute(&TOKENS.inputs_angle, ValueTypeName::Float, 0.53f32)
		.attribute(&TOKENS.inputs_intensity, ValueTypeName::Float, 50000.0f32)
}

pub(crate) fn register_schemas(registry: &mut SchemaRegistry) {
	registry.insert(tf::Token::new(DomeLight::TYPE_NAME), dome_light_definition());
	registry.insert(tf::Token::new(DistantLight::TYPE_NAME), distant_light_definition());
}

declare_schema!(
	/// Light emitted inward from a distant external environment, such as a sky or IBL light
	/// probe.
	DomeLight,
	"DomeLight"
);

impl<'a> DomeLight<'a> {
	pub fn intensity_attr(&self) -> crate::Result<usd::Attribute<'a>> {
		self.prim().attribute(&TOKENS.inputs_intensity)
	}

	pub fn color_attr(&self) -> crate::Result<usd::Attribute<'a>> {
		self.prim().attribute(&TOKENS.inputs_color)
	}

	pub fn exposure_attr(&self) -> crate::Result<usd::Attribute<'a>> {
		self.prim().attribute(&TOKENS.inputs_exposure)
	}

	/// A color texture to use on the dome, such as an HDR (high dynamic range) texture intended
	/// for IBL (image based lighting).
	pub fn texture_file_attr(&self) -> crate::Result<usd::Attribute<'a>> {
		self.prim().attribute(&TOKENS.inputs_texture_file)
	}

	pub fn texture_format_attr(&self) -> crate::Result<usd::Attribute<'a>> {
		self.prim().attribute(&TOKENS.inputs_texture_format)
	}

	/// The radius of guide geometry to use to visualize the dome light.
	pub fn guide_radius_attr(&self) -> crate::Result<usd::Attribute<'a>> {
		self.prim().attribute(&TOKENS.guide_radius)
	}
}

declare_schema!(
	/// Light emitted from a distant source along the -Z axis. Also known as a directional light.
	DistantLight,
	"DistantLight"
);

impl<'a> DistantLight<'a> {
	pub fn intensity_attr(&self) -> crate::Result<usd::Attribute<'a>> {
		self.prim().attribute(&TOKENS.inputs_intensity)
	}

	pub fn color_attr(&self) -> crate::Result<usd::Attribute<'a>> {
		self.prim().attribute(&TOKENS.inputs_color)
	}

	/// Angular size of the light in degrees.
	pub fn angle_attr(&self) -> crate::Result<usd::Attribute<'a>> {
		self.prim().attribute(&TOKENS.inputs_angle)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{sdf, usda::MemoryFormat};

	#[test]
	fn distant_light_overrides_intensity() {
		let config = usd::StageConfig::default().with_format(MemoryFormat::new());
		let stage = usd::Stage::create_new_with("lights.usda", &config).unwrap();

		let sun = DistantLight::define(&stage, &sdf::Path::parse("/Lights/Sun").unwrap()).unwrap();
		assert_eq!(sun.intensity_attr().unwrap().get::<f32>().unwrap(), 50000.0);
		assert_eq!(sun.angle_attr().unwrap().get::<f32>().unwrap(), 0.53);

		let dome = DomeLight::define(&stage, &sdf::Path::parse("/Lights/Dome").unwrap()).unwrap();
		assert_eq!(dome.intensity_attr().unwrap().get::<f32>().unwrap(), 1.0);
		assert_eq!(
			dome.texture_format_attr().unwrap().get::<tf::Token>().unwrap(),
			TOKENS.automatic
		);
		assert!(sun.has_attribute("xformOpOrder"));
	}
}

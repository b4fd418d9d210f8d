use super::TOKENS;
use crate::{Result, gf, tf, usd, vt};
use glam::{DMat4, DQuat, DVec3, dvec3};
use half::f16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XformOpType {
	// Scalar
	TranslateX,
	TranslateY,
	TranslateZ,
	// Vec3
	Translate,

	// Scalar
	ScaleX,
	ScaleY,
	ScaleZ,
	// Vec3
	Scale,

	// Scalar, degrees
	RotateX,
	RotateY,
	RotateZ,

	// Vec3, degrees
	RotateXYZ,
	RotateXZY,
	RotateYXZ,
	RotateYZX,
	RotateZXY,
	RotateZYX,
}

impl XformOpType {
	pub fn as_str(&self) -> &'static str {
		use XformOpType::*;
		match self {
			TranslateX => "translateX",
			TranslateY => "translateY",
			TranslateZ => "translateZ",
			Translate => "translate",
			ScaleX => "scaleX",
			ScaleY => "scaleY",
			ScaleZ => "scaleZ",
			Scale => "scale",
			RotateX => "rotateX",
			RotateY => "rotateY",
			RotateZ => "rotateZ",
			RotateXYZ => "rotateXYZ",
			RotateXZY => "rotateXZY",
			RotateYXZ => "rotateYXZ",
			RotateYZX => "rotateYZX",
			RotateZXY => "rotateZXY",
			RotateZYX => "rotateZYX",
		}
	}

	/// The attribute holding this op's value, e.g. `xformOp:translate`.
	pub fn attribute_name(&self) -> tf::Token {
		tf::Token::new(format!("xformOp:{}", self.as_str()))
	}

	/// Parse the op type out of an attribute name such as `xformOp:rotateXYZ` or
	/// `xformOp:translate:pivot`.
	pub fn from_attribute_name(name: &str) -> Option<Self> {
		let op = name.strip_prefix("xformOp:")?.split(':').next()?;
		Self::try_from(op).ok()
	}

	pub fn is_translate(&self) -> bool {
		use XformOpType::*;
		matches!(self, TranslateX | TranslateY | TranslateZ | Translate)
	}

	pub fn is_scale(&self) -> bool {
		use XformOpType::*;
		matches!(self, ScaleX | ScaleY | ScaleZ | Scale)
	}

	pub fn is_rotate(&self) -> bool {
		!self.is_translate() && !self.is_scale()
	}
}

impl TryFrom<&str> for XformOpType {
	type Error = ();
	fn try_from(s: &str) -> std::result::Result<Self, Self::Error> {
		Ok(match s {
			"translateX" => XformOpType::TranslateX,
			"translateY" => XformOpType::TranslateY,
			"translateZ" => XformOpType::TranslateZ,
			"translate" => XformOpType::Translate,
			"scaleX" => XformOpType::ScaleX,
			"scaleY" => XformOpType::ScaleY,
			"scaleZ" => XformOpType::ScaleZ,
			"scale" => XformOpType::Scale,
			"rotateX" => XformOpType::RotateX,
			"rotateY" => XformOpType::RotateY,
			"rotateZ" => XformOpType::RotateZ,
			"rotateXYZ" => XformOpType::RotateXYZ,
			"rotateXZY" => XformOpType::RotateXZY,
			"rotateYXZ" => XformOpType::RotateYXZ,
			"rotateYZX" => XformOpType::RotateYZX,
			"rotateZXY" => XformOpType::RotateZXY,
			"rotateZYX" => XformOpType::RotateZYX,
			_ => return Err(()),
		})
	}
}

/// Evaluates the transformation operations authored on a prim,
/// as listed in its `xformOpOrder`.
pub struct XformOp;

impl XformOp {
	fn op_transform(op_type: XformOpType, value: &vt::Value) -> Option<DMat4> {
		use XformOpType::*;

		let get_scalar = || -> Option<f64> {
			value
				.get::<f64>()
				.or_else(|| value.get::<f32>().map(|v| v.into()))
				.or_else(|| value.get::<f16>().map(|v| v.into()))
		};

		let get_vec3 = || -> Option<DVec3> {
			value
				.get::<gf::Vec3d>()
				.or_else(|| value.get::<gf::Vec3f>().map(|v| v.into()))
				.map(|v| DVec3::new(v.x, v.y, v.z))
		};

		Some(match op_type {
			TranslateX => DMat4::from_translation(dvec3(get_scalar()?, 0.0, 0.0)),
			TranslateY => DMat4::from_translation(dvec3(0.0, get_scalar()?, 0.0)),
			TranslateZ => DMat4::from_translation(dvec3(0.0, 0.0, get_scalar()?)),
			Translate => DMat4::from_translation(get_vec3()?),

			ScaleX => DMat4::from_scale(dvec3(get_scalar()?, 1.0, 1.0)),
			ScaleY => DMat4::from_scale(dvec3(1.0, get_scalar()?, 1.0)),
			ScaleZ => DMat4::from_scale(dvec3(1.0, 1.0, get_scalar()?)),
			Scale => DMat4::from_scale(get_vec3()?),

			RotateX => DMat4::from_rotation_x(get_scalar()?.to_radians()),
			RotateY => DMat4::from_rotation_y(get_scalar()?.to_radians()),
			RotateZ => DMat4::from_rotation_z(get_scalar()?.to_radians()),

			RotateXYZ | RotateXZY | RotateYXZ | RotateYZX | RotateZXY | RotateZYX => {
				let angles = get_vec3()?;

				let rot_x = DQuat::from_axis_angle(DVec3::X, angles.x.to_radians());
				let rot_y = DQuat::from_axis_angle(DVec3::Y, angles.y.to_radians());
				let rot_z = DQuat::from_axis_angle(DVec3::Z, angles.z.to_radians());

				// The first named axis is applied first.
				let rot = match op_type {
					RotateXYZ => rot_z * rot_y * rot_x,
					RotateXZY => rot_y * rot_z * rot_x,
					RotateYXZ => rot_z * rot_x * rot_y,
					RotateYZX => rot_x * rot_z * rot_y,
					RotateZXY => rot_y * rot_x * rot_z,
					_ => rot_x * rot_y * rot_z,
				};

				DMat4::from_quat(rot)
			}
		})
	}

	/// Compose the ops in `xformOpOrder` into a single local transform.
	///
	/// Returns `None` for prims that are not transformable. Ops this crate cannot evaluate
	/// are skipped with a warning.
	pub fn local_transform(prim: &usd::Prim) -> Result<Option<gf::Transform3d>> {
		if !prim.has_attribute(&TOKENS.xform_op_order) {
			return Ok(None);
		}

		let op_order = prim
			.attribute(&TOKENS.xform_op_order)?
			.get::<vt::Array<tf::Token>>()?;

		let mut matrix = DMat4::IDENTITY;
		for op in &op_order {
			let Some(op_type) = XformOpType::from_attribute_name(op.as_str()) else {
				tracing::warn!(prim = %prim.path(), op = %op, "skipping unsupported xform op");
				continue;
			};

			let value = prim.attribute(op)?.get_value()?;
			match Self::op_transform(op_type, &value) {
				Some(op_matrix) => matrix *= op_matrix,
				None => tracing::warn!(
					prim = %prim.path(),
					op = %op,
					found = value.type_name(),
					"skipping xform op with unexpected value type"
				),
			}
		}

		let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
		Ok(Some(gf::Transform3d {
			translation: gf::Vec3d::new(translation.x, translation.y, translation.z),
			rotation: gf::Quatd {
				i: rotation.x,
				j: rotation.y,
				k: rotation.z,
				w: rotation.w,
			},
			scale: gf::Vec3d::new(scale.x, scale.y, scale.z),
		}))
	}
}

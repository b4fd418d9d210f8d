use super::{TOKENS, XformOpType};
use crate::{Result, gf, sdf::ValueTypeName, tf, usd, vt};

/// Authors the common translate, rotate and scale ops on a transformable prim.
///
/// Ops are kept in `xformOpOrder` as translate, then rotate, then scale. Any other op already
/// in the order stays after them.
pub struct XformCommonApi<'a> {
	prim: usd::Prim<'a>,
}

impl<'a> XformCommonApi<'a> {
	pub fn new(prim: usd::Prim<'a>) -> Self {
		Self { prim }
	}

	pub fn prim(&self) -> &usd::Prim<'a> {
		&self.prim
	}

	pub fn set_translate(&self, translation: impl Into<gf::Vec3d>) -> Result<()> {
		self.set_op(
			XformOpType::Translate,
			ValueTypeName::Double3,
			vt::Value::new(translation.into()),
		)
	}

	/// Set the rotation as XYZ Euler angles, in degrees.
	pub fn set_rotate(&self, degrees: impl Into<gf::Vec3f>) -> Result<()> {
		self.set_op(
			XformOpType::RotateXYZ,
			ValueTypeName::Float3,
			vt::Value::new(degrees.into()),
		)
	}

	pub fn set_scale(&self, scale: impl Into<gf::Vec3f>) -> Result<()> {
		self.set_op(XformOpType::Scale, ValueTypeName::Float3, vt::Value::new(scale.into()))
	}

	pub fn translate(&self) -> Option<gf::Vec3d> {
		self.op_value(XformOpType::Translate)
	}

	pub fn rotate(&self) -> Option<gf::Vec3f> {
		self.op_value(XformOpType::RotateXYZ)
	}

	pub fn scale(&self) -> Option<gf::Vec3f> {
		self.op_value(XformOpType::Scale)
	}

	fn op_value<T: vt::ValueType>(&self, op_type: XformOpType) -> Option<T> {
		self.prim.attribute(op_type.attribute_name()).ok()?.try_get()
	}

	fn set_op(&self, op_type: XformOpType, type_name: ValueTypeName, value: vt::Value) -> Result<()> {
		// Fails on prims that are not transformable, before anything is authored.
		let order_attr = self.prim.attribute(&TOKENS.xform_op_order)?;
		let op_name = op_type.attribute_name();

		self.prim
			.create_attribute(op_name.clone(), type_name)?
			.set(value)?;

		let mut order = order_attr.get::<vt::Array<tf::Token>>()?;
		if !order.contains(&op_name) {
			order.push(op_name);
			order.sort_by_key(|op| common_rank(op));
			order_attr.set(order)?;
		}
		Ok(())
	}
}

fn common_rank(op: &tf::Token) -> usize {
	match XformOpType::from_attribute_name(op.as_str()) {
		Some(op_type) if op_type.is_translate() => 0,
		Some(op_type) if op_type.is_rotate() => 1,
		Some(op_type) if op_type.is_scale() => 2,
		_ => 3,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::usd_geom::{Cube, Scope, XformOp};
	use crate::{Error, sdf, usda::MemoryFormat};

	fn stage() -> usd::Stage {
		let config = usd::StageConfig::default().with_format(MemoryFormat::new());
		usd::Stage::create_new_with("xform.usda", &config).unwrap()
	}

	#[test]
	fn ops_keep_common_order() {
		let stage = stage();
		let cube = Cube::define(&stage, &sdf::Path::parse("/Box").unwrap()).unwrap();
		let api = XformCommonApi::new(cube.prim().clone());

		api.set_scale(gf::Vec3f::new(2.0, 2.0, 2.0)).unwrap();
		api.set_translate(gf::Vec3d::new(4.0, 5.0, 4.0)).unwrap();
		api.set_translate(gf::Vec3d::new(1.0, 2.0, 3.0)).unwrap();

		let order = cube
			.xform_op_order_attr()
			.unwrap()
			.get::<vt::Array<tf::Token>>()
			.unwrap();
		assert_eq!(
			order,
			vec![tf::Token::new("xformOp:translate"), tf::Token::new("xformOp:scale")]
		);
		assert_eq!(api.translate(), Some(gf::Vec3d::new(1.0, 2.0, 3.0)));
		assert_eq!(api.rotate(), None);

		let transform = XformOp::local_transform(cube.prim()).unwrap().unwrap();
		assert!((transform.translation.x - 1.0).abs() < 1e-9);
		assert!((transform.translation.z - 3.0).abs() < 1e-9);
		assert!((transform.scale.y - 2.0).abs() < 1e-9);
	}

	#[test]
	fn requires_a_transformable_prim() {
		let stage = stage();
		let path = sdf::Path::parse("/Group").unwrap();
		let scope = Scope::define(&stage, &path).unwrap();
		let api = XformCommonApi::new(scope.prim().clone());

		assert!(matches!(
			api.set_translate(gf::Vec3d::new(1.0, 0.0, 0.0)),
			Err(Error::UnknownAttribute { .. })
		));
		assert!(!scope.has_attribute("xformOp:translate"));
		assert_eq!(XformOp::local_transform(scope.prim()).unwrap(), None);
	}
}

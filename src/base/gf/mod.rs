//! Graphics Foundations

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3<T> {
	pub x: T,
	pub y: T,
	pub z: T,
}

impl<T> Vec3<T> {
	pub fn new(x: T, y: T, z: T) -> Self {
		Self { x, y, z }
	}
}

pub type Vec3f = Vec3<f32>;
pub type Vec3d = Vec3<f64>;

impl From<Vec3f> for Vec3d {
	fn from(v: Vec3f) -> Self {
		Self {
			x: v.x.into(),
			y: v.y.into(),
			z: v.z.into(),
		}
	}
}

impl From<(f64, f64, f64)> for Vec3d {
	fn from((x, y, z): (f64, f64, f64)) -> Self {
		Self { x, y, z }
	}
}

impl From<(f32, f32, f32)> for Vec3f {
	fn from((x, y, z): (f32, f32, f32)) -> Self {
		Self { x, y, z }
	}
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Quat<T> {
	pub i: T,
	pub j: T,
	pub k: T,
	pub w: T,
}

pub type Quatd = Quat<f64>;

/// A decomposed affine transform.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform3d {
	pub translation: Vec3d,
	pub rotation: Quatd,
	pub scale: Vec3d,
}

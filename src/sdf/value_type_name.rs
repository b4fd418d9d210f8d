use crate::{gf, tf, vt};
use half::f16;

/// The declared type of an attribute, spelled the way USDA spells it.
///
/// Role types such as `color3f` and `point3f` share the `float3` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueTypeName {
	Bool,
	Int,
	Half,
	Float,
	Double,
	String,
	Token,
	Float3,
	Double3,
	Color3f,
	Point3f,
	Vector3f,
	Normal3f,

	IntArray,
	FloatArray,
	DoubleArray,
	StringArray,
	TokenArray,
	Float3Array,
	Color3fArray,
	Point3fArray,
	Vector3fArray,
	Normal3fArray,
}

const ALL: [ValueTypeName; 23] = [
	ValueTypeName::Bool,
	ValueTypeName::Int,
	ValueTypeName::Half,
	ValueTypeName::Float,
	ValueTypeName::Double,
	ValueTypeName::String,
	ValueTypeName::Token,
	ValueTypeName::Float3,
	ValueTypeName::Double3,
	ValueTypeName::Color3f,
	ValueTypeName::Point3f,
	ValueTypeName::Vector3f,
	ValueTypeName::Normal3f,
	ValueTypeName::IntArray,
	ValueTypeName::FloatArray,
	ValueTypeName::DoubleArray,
	ValueTypeName::StringArray,
	ValueTypeName::TokenArray,
	ValueTypeName::Float3Array,
	ValueTypeName::Color3fArray,
	ValueTypeName::Point3fArray,
	ValueTypeName::Vector3fArray,
	ValueTypeName::Normal3fArray,
];

impl ValueTypeName {
	pub fn as_str(&self) -> &'static str {
		use ValueTypeName::*;
		match self {
			Bool => "bool",
			Int => "int",
			Half => "half",
			Float => "float",
			Double => "double",
			String => "string",
			Token => "token",
			Float3 => "float3",
			Double3 => "double3",
			Color3f => "color3f",
			Point3f => "point3f",
			Vector3f => "vector3f",
			Normal3f => "normal3f",
			IntArray => "int[]",
			FloatArray => "float[]",
			DoubleArray => "double[]",
			StringArray => "string[]",
			TokenArray => "token[]",
			Float3Array => "float3[]",
			Color3fArray => "color3f[]",
			Point3fArray => "point3f[]",
			Vector3fArray => "vector3f[]",
			Normal3fArray => "normal3f[]",
		}
	}

	/// Looks up a type by its USDA spelling, e.g. `color3f[]`.
	pub fn find(name: &str) -> Option<Self> {
		ALL.iter().copied().find(|ty| ty.as_str() == name)
	}

	pub fn is_array(&self) -> bool {
		self.as_str().ends_with("[]")
	}

	/// The scalar element type of an array type, or the type itself.
	pub fn scalar_type(&self) -> Self {
		use ValueTypeName::*;
		match self {
			IntArray => Int,
			FloatArray => Float,
			DoubleArray => Double,
			StringArray => String,
			TokenArray => Token,
			Float3Array => Float3,
			Color3fArray => Color3f,
			Point3fArray => Point3f,
			Vector3fArray => Vector3f,
			Normal3fArray => Normal3f,
			scalar => *scalar,
		}
	}

	/// Returns true if `value` holds the payload this type is stored as.
	pub fn accepts(&self, value: &vt::Value) -> bool {
		use ValueTypeName::*;
		match self {
			Bool => value.is::<bool>(),
			Int => value.is::<i32>(),
			Half => value.is::<f16>(),
			Float => value.is::<f32>(),
			Double => value.is::<f64>(),
			String => value.is::<std::string::String>(),
			Token => value.is::<tf::Token>(),
			Float3 | Color3f | Point3f | Vector3f | Normal3f => value.is::<gf::Vec3f>(),
			Double3 => value.is::<gf::Vec3d>(),
			IntArray => value.is::<vt::Array<i32>>(),
			FloatArray => value.is::<vt::Array<f32>>(),
			DoubleArray => value.is::<vt::Array<f64>>(),
			StringArray => value.is::<vt::Array<std::string::String>>(),
			TokenArray => value.is::<vt::Array<tf::Token>>(),
			Float3Array | Color3fArray | Point3fArray | Vector3fArray | Normal3fArray => {
				value.is::<vt::Array<gf::Vec3f>>()
			}
		}
	}

	/// The value an attribute of this type holds when nothing else is known.
	pub fn fallback(&self) -> vt::Value {
		use ValueTypeName::*;
		match self {
			Bool => vt::Value::new(false),
			Int => vt::Value::new(0i32),
			Half => vt::Value::new(f16::ZERO),
			Float => vt::Value::new(0.0f32),
			Double => vt::Value::new(0.0f64),
			String => vt::Value::new(std::string::String::new()),
			Token => vt::Value::new(tf::Token::empty()),
			Float3 | Color3f | Point3f | Vector3f | Normal3f => vt::Value::new(gf::Vec3f::default()),
			Double3 => vt::Value::new(gf::Vec3d::default()),
			IntArray => vt::Value::new(vt::Array::<i32>::new()),
			FloatArray => vt::Value::new(vt::Array::<f32>::new()),
			DoubleArray => vt::Value::new(vt::Array::<f64>::new()),
			StringArray => vt::Value::new(vt::Array::<std::string::String>::new()),
			TokenArray => vt::Value::new(vt::Array::<tf::Token>::new()),
			Float3Array | Color3fArray | Point3fArray | Vector3fArray | Normal3fArray => {
				vt::Value::new(vt::Array::<gf::Vec3f>::new())
			}
		}
	}
}

impl std::fmt::Display for ValueTypeName {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn names_round_trip() {
		for ty in ALL {
			assert_eq!(ValueTypeName::find(ty.as_str()), Some(ty));
		}
		assert_eq!(ValueTypeName::find("matrix4d"), None);
	}

	#[test]
	fn roles_share_payload() {
		let red = vt::Value::new(vec![gf::Vec3f::new(1.0, 0.0, 0.0)]);
		assert!(ValueTypeName::Color3fArray.accepts(&red));
		assert!(ValueTypeName::Point3fArray.accepts(&red));
		assert!(!ValueTypeName::Color3f.accepts(&red));
		assert!(!ValueTypeName::DoubleArray.accepts(&red));
	}

	#[test]
	fn fallback_is_accepted() {
		for ty in ALL {
			assert!(ty.accepts(&ty.fallback()), "{ty} rejects its own fallback");
		}
	}

	#[test]
	fn array_scalars() {
		assert!(ValueTypeName::Color3fArray.is_array());
		assert_eq!(ValueTypeName::Color3fArray.scalar_type(), ValueTypeName::Color3f);
		assert_eq!(ValueTypeName::Double.scalar_type(), ValueTypeName::Double);
		assert!(!ValueTypeName::Double.is_array());
	}
}

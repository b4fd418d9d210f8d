use crate::{gf, tf};
use half::f16;

pub type Array<T> = Vec<T>;

/// A type-erased container for any attribute value the stage can hold.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
	store: ValueStore,
}

impl Value {
	pub fn new<T: ValueType>(value: T) -> Self {
		Value {
			store: value.store(),
		}
	}

	pub fn empty() -> Self {
		Value {
			store: ValueStore::Empty,
		}
	}

	pub fn is_empty(&self) -> bool {
		matches!(self.store, ValueStore::Empty)
	}

	/// Returns true if the value currently holds a `T`.
	pub fn is<T: ValueType>(&self) -> bool {
		T::holds(&self.store)
	}

	pub fn get<T: ValueType>(&self) -> Option<T> {
		T::load(&self.store)
	}

	pub fn store(&self) -> &ValueStore {
		&self.store
	}

	/// Name of the held payload, used in diagnostics.
	pub fn type_name(&self) -> &'static str {
		self.store.type_name()
	}
}

impl Default for Value {
	fn default() -> Self {
		Value::empty()
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueStore {
	Empty,

	Bool(bool),

	Int(i32),
	IntArray(Array<i32>),

	Half(f16),
	Float(f32),
	FloatArray(Array<f32>),
	Double(f64),
	DoubleArray(Array<f64>),

	Vec3f(gf::Vec3f),
	Vec3fArray(Array<gf::Vec3f>),
	Vec3d(gf::Vec3d),

	Token(tf::Token),
	TokenArray(Array<tf::Token>),

	String(String),
	StringArray(Array<String>),
}

impl ValueStore {
	pub fn type_name(&self) -> &'static str {
		match self {
			ValueStore::Empty => "empty",
			ValueStore::Bool(_) => "bool",
			ValueStore::Int(_) => "int",
			ValueStore::IntArray(_) => "int[]",
			ValueStore::Half(_) => "half",
			ValueStore::Float(_) => "float",
			ValueStore::FloatArray(_) => "float[]",
			ValueStore::Double(_) => "double",
			ValueStore::DoubleArray(_) => "double[]",
			ValueStore::Vec3f(_) => "float3",
			ValueStore::Vec3fArray(_) => "float3[]",
			ValueStore::Vec3d(_) => "double3",
			ValueStore::Token(_) => "token",
			ValueStore::TokenArray(_) => "token[]",
			ValueStore::String(_) => "string",
			ValueStore::StringArray(_) => "string[]",
		}
	}
}

pub trait ValueType {
	fn load(store: &ValueStore) -> Option<Self>
	where
		Self: Sized;
	fn store(self) -> ValueStore;
	fn holds(store: &ValueStore) -> bool;
}

macro_rules! impl_value_type_clone {
	($type:ty, $store:ident) => {
		impl ValueType for $type {
			fn load(store: &ValueStore) -> Option<Self> {
				match store {
					ValueStore::$store(v) => Some(v.clone()),
					_ => None,
				}
			}

			fn store(self) -> ValueStore {
				ValueStore::$store(self)
			}

			fn holds(store: &ValueStore) -> bool {
				matches!(store, ValueStore::$store(_))
			}
		}

		impl From<$type> for Value {
			fn from(value: $type) -> Self {
				Value {
					store: ValueStore::$store(value),
				}
			}
		}
	};
}

macro_rules! impl_value_type_deref {
	($type:ty, $store:ident) => {
		impl ValueType for $type {
			fn load(store: &ValueStore) -> Option<Self> {
				match store {
					ValueStore::$store(v) => Some(*v),
					_ => None,
				}
			}

			fn store(self) -> ValueStore {
				ValueStore::$store(self)
			}

			fn holds(store: &ValueStore) -> bool {
				matches!(store, ValueStore::$store(_))
			}
		}

		impl From<$type> for Value {
			fn from(value: $type) -> Self {
				Value {
					store: ValueStore::$store(value),
				}
			}
		}
	};
}

impl_value_type_deref!(bool, Bool);

impl_value_type_deref!(i32, Int);
impl_value_type_clone!(Array<i32>, IntArray);

impl_value_type_deref!(f16, Half);
impl_value_type_deref!(f32, Float);
impl_value_type_clone!(Array<f32>, FloatArray);
impl_value_type_deref!(f64, Double);
impl_value_type_clone!(Array<f64>, DoubleArray);

impl_value_type_deref!(gf::Vec3f, Vec3f);
impl_value_type_clone!(Array<gf::Vec3f>, Vec3fArray);
impl_value_type_deref!(gf::Vec3d, Vec3d);

impl_value_type_clone!(tf::Token, Token);
impl_value_type_clone!(Array<tf::Token>, TokenArray);

impl_value_type_clone!(String, String);
impl_value_type_clone!(Array<String>, StringArray);

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::new(value.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn get_matches_stored_type_only() {
		let value = Value::new(2.0f64);
		assert_eq!(value.get::<f64>(), Some(2.0));
		assert_eq!(value.get::<f32>(), None);
		assert!(value.is::<f64>());
		assert!(!value.is::<i32>());
		assert_eq!(value.type_name(), "double");
	}

	#[test]
	fn empty_value() {
		let value = Value::default();
		assert!(value.is_empty());
		assert_eq!(value.get::<bool>(), None);
	}

	#[test]
	fn array_values_compare_by_content() {
		let a = Value::new(vec![gf::Vec3f::new(1.0, 0.0, 0.0)]);
		let b: Value = vec![gf::Vec3f::new(1.0, 0.0, 0.0)].into();
		assert_eq!(a, b);
		assert_ne!(a, Value::new(Array::<gf::Vec3f>::new()));
	}
}

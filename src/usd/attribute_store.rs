use crate::{Error, Result, sdf, tf, vt};

/// A single attribute on a prim: its declared type, schema fallback and authored opinion.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSpec {
	name: tf::Token,
	type_name: sdf::ValueTypeName,
	default: vt::Value,
	opinion: Option<vt::Value>,
	custom: bool,
}

impl AttributeSpec {
	/// An attribute declared by a schema, holding `default` until an opinion is authored.
	pub fn new(name: tf::Token, type_name: sdf::ValueTypeName, default: vt::Value) -> Self {
		AttributeSpec {
			name,
			type_name,
			default,
			opinion: None,
			custom: false,
		}
	}

	/// An attribute added to a single prim outside of its schema.
	pub fn new_custom(name: tf::Token, type_name: sdf::ValueTypeName) -> Self {
		AttributeSpec {
			default: type_name.fallback(),
			custom: true,
			..Self::new(name, type_name, vt::Value::empty())
		}
	}

	pub fn name(&self) -> &tf::Token {
		&self.name
	}

	pub fn type_name(&self) -> sdf::ValueTypeName {
		self.type_name
	}

	pub fn is_custom(&self) -> bool {
		self.custom
	}

	pub fn is_authored(&self) -> bool {
		self.opinion.is_some()
	}

	/// The authored opinion if there is one, otherwise the fallback.
	pub fn value(&self) -> &vt::Value {
		self.opinion.as_ref().unwrap_or(&self.default)
	}

	pub fn default_value(&self) -> &vt::Value {
		&self.default
	}

	pub fn authored_value(&self) -> Option<&vt::Value> {
		self.opinion.as_ref()
	}

	/// Author `value` as this attribute's opinion, replacing any previous one.
	pub fn set(&mut self, value: vt::Value) -> Result<()> {
		self.check_type(&value)?;
		self.opinion = Some(value);
		Ok(())
	}

	/// Drop the authored opinion, reverting to the fallback.
	pub fn clear(&mut self) {
		self.opinion = None;
	}

	pub(crate) fn check_type(&self, value: &vt::Value) -> Result<()> {
		if self.type_name.accepts(value) {
			Ok(())
		} else {
			Err(Error::TypeMismatch {
				name: self.name.clone(),
				expected: self.type_name.to_string(),
				found: value.type_name(),
			})
		}
	}
}

/// Ordered attributes of one prim: schema attributes first, then custom ones in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeStore {
	specs: Vec<AttributeSpec>,
}

impl AttributeStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.specs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.specs.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, AttributeSpec> {
		self.specs.iter()
	}

	pub fn get(&self, name: &str) -> Option<&AttributeSpec> {
		self.specs.iter().find(|spec| spec.name == name)
	}

	pub fn get_mut(&mut self, name: &str) -> Option<&mut AttributeSpec> {
		self.specs.iter_mut().find(|spec| spec.name == name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	pub fn names(&self) -> Vec<tf::Token> {
		self.specs.iter().map(|spec| spec.name.clone()).collect()
	}

	/// Add a custom attribute, or return the existing one if it already has `type_name`.
	pub fn add_custom(
		&mut self,
		name: tf::Token,
		type_name: sdf::ValueTypeName,
	) -> Result<&mut AttributeSpec> {
		match self.specs.iter().position(|spec| spec.name == name) {
			Some(index) => {
				let existing = &mut self.specs[index];
				if existing.type_name != type_name {
					return Err(Error::TypeMismatch {
						name,
						expected: existing.type_name.to_string(),
						found: type_name.as_str(),
					});
				}
				Ok(existing)
			}
			None => {
				self.specs.push(AttributeSpec::new_custom(name, type_name));
				let last = self.specs.len() - 1;
				Ok(&mut self.specs[last])
			}
		}
	}

	/// Append `spec` as read from a document. A taken name hands `spec` back.
	pub(crate) fn insert(&mut self, spec: AttributeSpec) -> std::result::Result<(), AttributeSpec> {
		if self.contains(spec.name.as_str()) {
			return Err(spec);
		}
		self.specs.push(spec);
		Ok(())
	}

	/// Check that `schema` can be laid over the attributes already present.
	pub(crate) fn check_schema(&self, schema: &[AttributeSpec]) -> Result<()> {
		for spec in schema {
			if let Some(existing) = self.get(spec.name.as_str())
				&& existing.type_name != spec.type_name
			{
				return Err(Error::TypeMismatch {
					name: spec.name.clone(),
					expected: spec.type_name.to_string(),
					found: existing.type_name.as_str(),
				});
			}
		}
		Ok(())
	}

	/// Put `schema` in front of the current attributes.
	///
	/// Existing attributes of the same name hand their opinion over to the schema attribute.
	/// Call [`Self::check_schema`] first; mismatched types are dropped here.
	pub(crate) fn apply_schema(&mut self, schema: Vec<AttributeSpec>) {
		let mut previous = std::mem::take(&mut self.specs);
		for mut spec in schema {
			if let Some(index) = previous.iter().position(|p| p.name == spec.name) {
				let old = previous.remove(index);
				if let Some(opinion) = old.opinion
					&& spec.type_name.accepts(&opinion)
				{
					spec.opinion = Some(opinion);
				}
			}
			self.specs.push(spec);
		}
		self.specs.extend(previous);
	}
}

impl<'a> IntoIterator for &'a AttributeStore {
	type Item = &'a AttributeSpec;
	type IntoIter = std::slice::Iter<'a, AttributeSpec>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::gf;

	fn size() -> AttributeSpec {
		AttributeSpec::new(
			tf::Token::new("size"),
			sdf::ValueTypeName::Double,
			vt::Value::new(1.0f64),
		)
	}

	#[test]
	fn last_opinion_wins() {
		let mut spec = size();
		assert!(!spec.is_authored());
		assert_eq!(spec.value(), &vt::Value::new(1.0f64));

		spec.set(vt::Value::new(2.0f64)).unwrap();
		spec.set(vt::Value::new(4.0f64)).unwrap();
		assert!(spec.is_authored());
		assert_eq!(spec.value(), &vt::Value::new(4.0f64));
		assert_eq!(spec.default_value(), &vt::Value::new(1.0f64));

		spec.clear();
		assert!(!spec.is_authored());
		assert_eq!(spec.value(), &vt::Value::new(1.0f64));
	}

	#[test]
	fn set_rejects_wrong_type() {
		let mut spec = size();
		let err = spec.set(vt::Value::new(2.0f32)).unwrap_err();
		assert!(matches!(err, Error::TypeMismatch { found: "float", .. }));
		assert!(!spec.is_authored());
	}

	#[test]
	fn schema_attributes_come_before_custom_ones() {
		let mut store = AttributeStore::new();
		store
			.add_custom(tf::Token::new("userNote"), sdf::ValueTypeName::String)
			.unwrap();
		store.apply_schema(vec![
			size(),
			AttributeSpec::new(
				tf::Token::new("primvars:displayColor"),
				sdf::ValueTypeName::Color3fArray,
				vt::Value::new(Vec::<gf::Vec3f>::new()),
			),
		]);

		assert_eq!(
			store.names(),
			vec![
				tf::Token::new("size"),
				tf::Token::new("primvars:displayColor"),
				tf::Token::new("userNote")
			]
		);
		assert!(store.get("userNote").unwrap().is_custom());
		assert!(!store.get("size").unwrap().is_custom());
	}

	#[test]
	fn schema_adopts_matching_opinion() {
		let mut store = AttributeStore::new();
		store
			.add_custom(tf::Token::new("size"), sdf::ValueTypeName::Double)
			.unwrap()
			.set(vt::Value::new(3.0f64))
			.unwrap();

		store.check_schema(&[size()]).unwrap();
		store.apply_schema(vec![size()]);

		assert_eq!(store.len(), 1);
		assert_eq!(store.get("size").unwrap().value(), &vt::Value::new(3.0f64));
	}

	#[test]
	fn add_custom_is_idempotent_per_type() {
		let mut store = AttributeStore::new();
		let name = tf::Token::new("weight");
		store.add_custom(name.clone(), sdf::ValueTypeName::Float).unwrap();
		store.add_custom(name.clone(), sdf::ValueTypeName::Float).unwrap();
		assert_eq!(store.len(), 1);
		assert!(store.add_custom(name, sdf::ValueTypeName::Double).is_err());
		assert!(store.check_schema(&[size()]).is_ok());
	}
}

use crate::usd::{AttributeSpec, PrimSpec, PrimTree};
use crate::vt::{self, ValueStore};
use std::fmt::Display;

const INDENT: &str = "    ";

/// Render `tree` as a USDA document.
///
/// Only authored values and custom attribute declarations are written; everything else
/// comes back from the schema registry on load. Output is deterministic, so writing an
/// unchanged tree twice gives identical text.
pub fn write(tree: &PrimTree) -> String {
	let mut out = String::from("#usda 1.0\n");
	for prim in tree.pseudo_root().children() {
		out.push('\n');
		write_prim(&mut out, prim, 0);
	}
	out
}

fn write_prim(out: &mut String, prim: &PrimSpec, depth: usize) {
	let indent = INDENT.repeat(depth);

	out.push_str(&indent);
	out.push_str("def ");
	if !prim.type_name().is_empty() {
		out.push_str(prim.type_name().as_str());
		out.push(' ');
	}
	out.push_str(&quote(prim.name().as_str()));
	out.push('\n');
	out.push_str(&indent);
	out.push_str("{\n");

	let attributes: Vec<_> = prim
		.attributes()
		.iter()
		.filter(|attr| attr.is_custom() || attr.is_authored())
		.collect();

	for attr in &attributes {
		write_attribute(out, attr, depth + 1);
	}

	for (index, child) in prim.children().iter().enumerate() {
		if index > 0 || !attributes.is_empty() {
			out.push('\n');
		}
		write_prim(out, child, depth + 1);
	}

	out.push_str(&indent);
	out.push_str("}\n");
}

fn write_attribute(out: &mut String, attr: &AttributeSpec, depth: usize) {
	out.push_str(&INDENT.repeat(depth));
	if attr.is_custom() {
		out.push_str("custom ");
	}
	out.push_str(attr.type_name().as_str());
	out.push(' ');
	out.push_str(attr.name().as_str());
	if let Some(value) = attr.authored_value() {
		out.push_str(" = ");
		out.push_str(&format_value(value));
	}
	out.push('\n');
}

/// Format `value` as a USDA literal.
pub fn format_value(value: &vt::Value) -> String {
	match value.store() {
		ValueStore::Empty => "None".to_string(),
		ValueStore::Bool(v) => (if *v { "1" } else { "0" }).to_string(),
		ValueStore::Int(v) => v.to_string(),
		ValueStore::IntArray(v) => array(v, |v| v.to_string()),
		ValueStore::Half(v) => real(*v),
		ValueStore::Float(v) => real(*v),
		ValueStore::FloatArray(v) => array(v, |v| real(*v)),
		ValueStore::Double(v) => real(*v),
		ValueStore::DoubleArray(v) => array(v, |v| real(*v)),
		ValueStore::Vec3f(v) => tuple(v.x, v.y, v.z),
		ValueStore::Vec3fArray(v) => array(v, |v| tuple(v.x, v.y, v.z)),
		ValueStore::Vec3d(v) => tuple(v.x, v.y, v.z),
		ValueStore::Token(v) => quote(v.as_str()),
		ValueStore::TokenArray(v) => array(v, |v| quote(v.as_str())),
		ValueStore::String(v) => quote(v),
		ValueStore::StringArray(v) => array(v, |v| quote(v)),
	}
}

fn real<T: Display + Copy + Into<f64>>(value: T) -> String {
	let wide: f64 = value.into();
	if wide.is_nan() {
		"nan".to_string()
	} else if wide.is_infinite() {
		(if wide > 0.0 { "inf" } else { "-inf" }).to_string()
	} else {
		value.to_string()
	}
}

fn tuple<T: Display + Copy + Into<f64>>(x: T, y: T, z: T) -> String {
	format!("({}, {}, {})", real(x), real(y), real(z))
}

fn array<T>(items: &[T], format: impl Fn(&T) -> String) -> String {
	let items: Vec<String> = items.iter().map(format).collect();
	format!("[{}]", items.join(", "))
}

fn quote(text: &str) -> String {
	let mut quoted = String::with_capacity(text.len() + 2);
	quoted.push('"');
	for c in text.chars() {
		match c {
			'"' => quoted.push_str("\\\""),
			'\\' => quoted.push_str("\\\\"),
			'\n' => quoted.push_str("\\n"),
			'\t' => quoted.push_str("\\t"),
			'\r' => quoted.push_str("\\r"),
			c => quoted.push(c),
		}
	}
	quoted.push('"');
	quoted
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{gf, sdf, tf};

	#[test]
	fn values() {
		assert_eq!(format_value(&vt::Value::new(true)), "1");
		assert_eq!(format_value(&vt::Value::new(2.0f64)), "2");
		assert_eq!(format_value(&vt::Value::new(0.53f32)), "0.53");
		assert_eq!(format_value(&vt::Value::new(f64::NEG_INFINITY)), "-inf");
		assert_eq!(format_value(&vt::Value::new(f32::NAN)), "nan");
		assert_eq!(
			format_value(&vt::Value::new(vec![gf::Vec3f::new(1.0, 0.0, 0.5)])),
			"[(1, 0, 0.5)]"
		);
		assert_eq!(format_value(&vt::Value::new(Vec::<f32>::new())), "[]");
		assert_eq!(
			format_value(&vt::Value::new(tf::Token::new("xformOp:translate"))),
			"\"xformOp:translate\""
		);
		assert_eq!(format_value(&vt::Value::from("say \"hi\"\n")), "\"say \\\"hi\\\"\\n\"");
	}

	#[test]
	fn document_layout() {
		let mut tree = PrimTree::new();
		let root = sdf::Path::absolute_root_path();
		let geometry = tree.add_child(&root, PrimSpec::new("Geometry", "")).unwrap();

		let mut cube = PrimSpec::new("Box", "Cube");
		cube.attributes_mut()
			.apply_schema(vec![AttributeSpec::new(
				tf::Token::new("size"),
				sdf::ValueTypeName::Double,
				vt::Value::new(1.0f64),
			)]);
		cube.attributes_mut()
			.get_mut("size")
			.unwrap()
			.set(vt::Value::new(2.0f64))
			.unwrap();
		cube.attributes_mut()
			.add_custom(tf::Token::new("note"), sdf::ValueTypeName::String)
			.unwrap();

		geometry.push_child(cube).unwrap();
		geometry.push_child(PrimSpec::new("Empty", "Xform")).unwrap();

		assert_eq!(
			write(&tree),
			concat!(
				"#usda 1.0\n",
				"\n",
				"def \"Geometry\"\n",
				"{\n",
				"    def Cube \"Box\"\n",
				"    {\n",
				"        double size = 2\n",
				"        custom string note\n",
				"    }\n",
				"\n",
				"    def Xform \"Empty\"\n",
				"    {\n",
				"    }\n",
				"}\n",
			)
		);
	}

	#[test]
	fn empty_tree() {
		assert_eq!(write(&PrimTree::new()), "#usda 1.0\n");
	}
}

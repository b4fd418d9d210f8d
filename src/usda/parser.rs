use crate::peg::{
	Error, Input, PResult, delimited, eoi, if_must, list_collect, must, one, one_or_more, opt, sor,
	tag, terminated, until, zero_or_more,
};
use crate::usd::{AttributeSpec, PrimSpec, PrimTree};
use crate::{gf, sdf, tf, vt};
use half::f16;

struct Context {
	/// Prims being parsed, innermost last. The bottom entry is the pseudo-root.
	stack: Vec<PrimSpec>,
}

type In<'a> = Input<'a, Context>;

// Whitespace and comments

fn utf8<C>(i: &mut Input<'_, C>) -> PResult<()> {
	match i.current_char() {
		Some(_) => {
			i.advance();
			Ok(())
		}
		None => Err(Error::from_msg("Unexpected end of input")),
	}
}

fn eol<C>(i: &mut Input<'_, C>) -> PResult<()> {
	match i.current_char() {
		Some('\n') => {
			i.advance();
			Ok(())
		}
		None => Ok(()),
		_ => Err(Error::from_msg("Expected end of line")),
	}
}

fn space<C>(i: &mut Input<'_, C>) -> PResult<()> {
	match i.current_char() {
		Some(c) if c.is_whitespace() => {
			i.advance();
			Ok(())
		}
		_ => Err(Error::from_msg("Expected whitespace")),
	}
}

fn python_style_comment<C>(i: &mut Input<'_, C>) -> PResult<()> {
	one(i, '#')?;
	until(i, eol, utf8).map(|_| ())
}

fn cpp_style_single_line_comment<C>(i: &mut Input<'_, C>) -> PResult<()> {
	tag(i, "//")?;
	until(i, eol, utf8).map(|_| ())
}

fn cpp_style_multi_line_comment<C>(i: &mut Input<'_, C>) -> PResult<()> {
	if_must(
		i,
		|i| tag(i, "/*").map(|_| ()),
		|i| until(i, |i| tag(i, "*/").map(|_| ()), utf8).map(|_| ()),
	)
}

fn comment<C>(i: &mut Input<'_, C>) -> PResult<()> {
	sor!(
		i,
		python_style_comment,
		cpp_style_single_line_comment,
		cpp_style_multi_line_comment
	)
}

/// Skips any run of whitespace and comments.
fn ws<C>(i: &mut Input<'_, C>) -> PResult<()> {
	zero_or_more(i, |i| sor!(i, space, comment))
}

/// At least one whitespace character, then any padding.
fn separator<C>(i: &mut Input<'_, C>) -> PResult<()> {
	space(i)?;
	ws(i)
}

fn symbol<C>(i: &mut Input<'_, C>, c: char) -> PResult<()> {
	terminated(i, |i| one(i, c), ws)
}

// Lexemes

fn identifier<'a, C>(i: &mut Input<'a, C>, namespaced: bool) -> PResult<&'a str> {
	let start_pos = i.pos;
	match i.current_char() {
		Some(c) if c.is_alphabetic() || c == '_' => i.advance(),
		_ => return Err(Error::from_msg("Expected identifier")),
	}
	zero_or_more(i, |i| match i.current_char() {
		Some(c) if c.is_alphanumeric() || c == '_' || (namespaced && c == ':') => {
			i.advance();
			Ok(())
		}
		_ => Err(Error::from_msg("No match")),
	})?;
	Ok(i.slice(start_pos..i.pos))
}

fn string_literal<C>(i: &mut Input<'_, C>) -> PResult<String> {
	let quote = match i.current_char() {
		Some(c @ ('"' | '\'')) => c,
		_ => return Err(Error::from_msg("Expected string")),
	};
	i.advance();

	let mut value = String::new();
	loop {
		match i.current_char() {
			None | Some('\n') => return Err(Error::from_msg("Unterminated string").fatal()),
			Some(c) if c == quote => {
				i.advance();
				return Ok(value);
			}
			Some('\\') => {
				i.advance();
				let escaped = i
					.current_char()
					.ok_or_else(|| Error::from_msg("Unterminated string").fatal())?;
				i.advance();
				value.push(match escaped {
					'n' => '\n',
					't' => '\t',
					'r' => '\r',
					other => other,
				});
			}
			Some(c) => {
				value.push(c);
				i.advance();
			}
		}
	}
}

/// A numeric literal, including `inf`, `-inf` and `nan`. Parsing is left to the caller.
fn number<'a, C>(i: &mut Input<'a, C>) -> PResult<&'a str> {
	let start_pos = i.pos;
	one_or_more(i, |i| match i.current_char() {
		Some(c) if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '+' => {
			i.advance();
			Ok(())
		}
		_ => Err(Error::from_msg("Expected number")),
	})?;
	Ok(i.slice(start_pos..i.pos))
}

fn parse_number<C, T: std::str::FromStr>(i: &mut Input<'_, C>, what: &str) -> PResult<T> {
	let text = number(i)?;
	text.parse::<T>()
		.map_err(|_| Error::from_msg(&format!("`{}` is not a valid {}", text, what)))
}

/// Skips a balanced `( ... )` block such as prim or attribute metadata.
fn metadata<C>(i: &mut Input<'_, C>) -> PResult<()> {
	one(i, '(')?;
	let mut level = 1;
	while level > 0 {
		match i.current_char() {
			None => return Err(Error::from_msg("Unterminated metadata").fatal()),
			Some('"' | '\'') => {
				string_literal(i)?;
			}
			Some(c) => {
				match c {
					'(' => level += 1,
					')' => level -= 1,
					_ => {}
				}
				i.advance();
			}
		}
	}
	ws(i)
}

// Values

fn scalar_value<C>(i: &mut Input<'_, C>, type_name: sdf::ValueTypeName) -> PResult<vt::Value> {
	use sdf::ValueTypeName::*;
	Ok(match type_name {
		Bool => match number(i)? {
			"1" | "true" => vt::Value::new(true),
			"0" | "false" => vt::Value::new(false),
			other => return Err(Error::from_msg(&format!("`{}` is not a valid bool", other))),
		},
		Int => vt::Value::new(parse_number::<_, i32>(i, "int")?),
		Half => vt::Value::new(f16::from_f32(parse_number::<_, f32>(i, "half")?)),
		Float => vt::Value::new(parse_number::<_, f32>(i, "float")?),
		Double => vt::Value::new(parse_number::<_, f64>(i, "double")?),
		String => vt::Value::new(string_literal(i)?),
		Token => vt::Value::new(tf::Token::new(string_literal(i)?)),
		Float3 | Color3f | Point3f | Vector3f | Normal3f => {
			let [x, y, z] = tuple3(i, |i| parse_number::<_, f32>(i, "float"))?;
			vt::Value::new(gf::Vec3f::new(x, y, z))
		}
		Double3 => {
			let [x, y, z] = tuple3(i, |i| parse_number::<_, f64>(i, "double"))?;
			vt::Value::new(gf::Vec3d::new(x, y, z))
		}
		array => {
			return Err(Error::from_msg(&format!("`{}` is not a scalar type", array)));
		}
	})
}

fn tuple3<'a, C, T, P>(i: &mut Input<'a, C>, mut element: P) -> PResult<[T; 3]>
where
	P: FnMut(&mut Input<'a, C>) -> PResult<T>,
{
	symbol(i, '(')?;
	let x = terminated(i, &mut element, ws)?;
	symbol(i, ',')?;
	let y = terminated(i, &mut element, ws)?;
	symbol(i, ',')?;
	let z = terminated(i, &mut element, ws)?;
	one(i, ')')?;
	Ok([x, y, z])
}

fn collect<T: vt::ValueType>(items: Vec<vt::Value>) -> vt::Value
where
	vt::Array<T>: vt::ValueType,
{
	vt::Value::new(items.iter().filter_map(|v| v.get::<T>()).collect::<vt::Array<T>>())
}

fn array_value<C>(i: &mut Input<'_, C>, type_name: sdf::ValueTypeName) -> PResult<vt::Value> {
	use sdf::ValueTypeName::*;
	let scalar = type_name.scalar_type();

	let items = delimited(
		i,
		|i| symbol(i, '['),
		|i| {
			opt(i, |i| {
				list_collect(
					i,
					|i| terminated(i, |i| scalar_value(i, scalar), ws),
					|i| symbol(i, ','),
				)
			})
		},
		|i| one(i, ']'),
	)?
	.unwrap_or_default();

	Ok(match type_name {
		IntArray => collect::<i32>(items),
		FloatArray => collect::<f32>(items),
		DoubleArray => collect::<f64>(items),
		StringArray => collect::<std::string::String>(items),
		TokenArray => collect::<tf::Token>(items),
		_ => collect::<gf::Vec3f>(items),
	})
}

fn typed_value<C>(i: &mut Input<'_, C>, type_name: sdf::ValueTypeName) -> PResult<vt::Value> {
	if type_name.is_array() {
		array_value(i, type_name)
	} else {
		scalar_value(i, type_name)
	}
}

// Specs

fn keyword<C>(i: &mut Input<'_, C>, word: &'static str) -> PResult<()> {
	tag(i, word)?;
	separator(i)
}

fn attribute_spec(i: &mut In<'_>) -> PResult<()> {
	let custom = opt(i, |i| keyword(i, "custom"))?.is_some();
	opt(i, |i| sor!(i, |i| keyword(i, "uniform"), |i| keyword(i, "config")))?;

	let type_start = i.pos;
	identifier(i, false)?;
	opt(i, |i| tag(i, "[]"))?;
	let type_str = i.slice(type_start..i.pos);

	must(i, |i| {
		let type_name = sdf::ValueTypeName::find(type_str).ok_or_else(|| {
			Error::from_msg(&format!("Unknown attribute type `{}`", type_str))
		})?;
		separator(i)?;

		let name = identifier(i, true)?;
		if !sdf::is_valid_property_name(name) {
			return Err(Error::from_msg(&format!("Invalid attribute name `{}`", name)));
		}
		ws(i)?;

		let value = opt(i, |i| {
			if_must(
				i,
				|i| symbol(i, '='),
				|i| terminated(i, |i| typed_value(i, type_name), ws),
			)
		})?;
		opt(i, metadata)?;

		let mut spec = if custom {
			AttributeSpec::new_custom(tf::Token::new(name), type_name)
		} else {
			AttributeSpec::new(tf::Token::new(name), type_name, type_name.fallback())
		};
		if let Some(value) = value {
			spec.set(value).map_err(|e| Error::from_msg(&e.to_string()))?;
		}

		tracing::trace!(name, %type_name, "parsed attribute");

		let prim = i
			.ctx
			.stack
			.last_mut()
			.ok_or_else(|| Error::from_msg("Attribute outside of a prim"))?;
		prim.attributes_mut()
			.insert(spec)
			.map_err(|spec| Error::from_msg(&format!("Duplicate attribute `{}`", spec.name())))
	})
}

fn prim_spec(i: &mut In<'_>) -> PResult<()> {
	keyword(i, "def")?;

	must(i, |i| {
		let type_name = opt(i, |i| terminated(i, |i| identifier(i, false), separator))?
			.unwrap_or_default();

		let name = string_literal(i).map_err(|_| Error::from_msg("Expected prim name"))?;
		if !sdf::is_valid_identifier(&name) {
			return Err(Error::from_msg(&format!("Invalid prim name `{}`", name)));
		}
		ws(i)?;
		opt(i, metadata)?;

		tracing::trace!(name = %name, type_name, "parsed prim");
		i.ctx.stack.push(PrimSpec::new(name, type_name));

		symbol(i, '{')?;
		zero_or_more(i, |i| {
			sor!(i, prim_spec, attribute_spec)?;
			ws(i)
		})?;
		one(i, '}')?;

		let prim = i.ctx.stack.pop();
		let parent = i.ctx.stack.last_mut();
		match (prim, parent) {
			(Some(prim), Some(parent)) => parent
				.push_child(prim)
				.map(|_| ())
				.map_err(|prim| Error::from_msg(&format!("Duplicate prim `{}`", prim.name()))),
			_ => Err(Error::from_msg("Unbalanced prim")),
		}
	})
}

fn layer_header<C>(i: &mut Input<'_, C>) -> PResult<()> {
	must(i, |i| {
		tag(i, "#usda ").map_err(|_| Error::from_msg("Expected `#usda` header"))?;
		until(i, eol, utf8).map(|_| ())
	})
}

fn layer(i: &mut In<'_>) -> PResult<()> {
	layer_header(i)?;
	ws(i)?;
	opt(i, metadata)?;
	zero_or_more(i, |i| {
		prim_spec(i)?;
		ws(i)
	})?;
	eoi(i)
}

/// Parse a USDA document into a prim tree. `identifier` names the document in errors.
pub fn parse(text: &str, identifier: &str) -> crate::Result<PrimTree> {
	let mut ctx = Context {
		stack: vec![PrimSpec::default()],
	};
	let mut input = Input::new(text, &mut ctx);

	if let Err(error) = layer(&mut input) {
		return Err(crate::Error::Parse {
			location: identifier.to_string(),
			message: input.format_error(&error.message),
		});
	}

	let pseudo_root = ctx.stack.pop().unwrap_or_default();
	Ok(PrimTree::from_pseudo_root(pseudo_root))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn run<'a, T, P>(text: &'a str, ctx: &'a mut (), parser: P) -> PResult<T>
	where
		P: FnOnce(&mut Input<'a, ()>) -> PResult<T>,
	{
		let mut input = Input::new(text, ctx);
		parser(&mut input)
	}

	fn value(text: &str, type_name: sdf::ValueTypeName) -> PResult<vt::Value> {
		let mut ctx = ();
		run(text, &mut ctx, |i| typed_value(i, type_name))
	}

	fn p(s: &str) -> sdf::Path {
		sdf::Path::parse(s).unwrap()
	}

	#[test]
	fn string_literals() {
		let mut ctx = ();
		assert_eq!(run(r#""a \"b\"\n""#, &mut ctx, string_literal).unwrap(), "a \"b\"\n");
		assert_eq!(run("'single'", &mut ctx, string_literal).unwrap(), "single");
		assert!(run("\"open", &mut ctx, string_literal).is_err());
	}

	#[test]
	fn scalar_values() {
		use sdf::ValueTypeName::*;

		assert_eq!(value("2", Double).unwrap(), vt::Value::new(2.0f64));
		assert_eq!(value("-1.5e2", Float).unwrap(), vt::Value::new(-150.0f32));
		assert_eq!(value("1", Bool).unwrap(), vt::Value::new(true));
		assert_eq!(value("-inf", Double).unwrap(), vt::Value::new(f64::NEG_INFINITY));
		assert_eq!(
			value("( 1, 0.5 ,-2 )", Color3f).unwrap(),
			vt::Value::new(gf::Vec3f::new(1.0, 0.5, -2.0))
		);
		assert!(value("abc", Double).is_err());
		assert!(value("2", Token).is_err());
	}

	#[test]
	fn array_values() {
		use sdf::ValueTypeName::*;

		assert_eq!(
			value("[]", Color3fArray).unwrap(),
			vt::Value::new(Vec::<gf::Vec3f>::new())
		);
		assert_eq!(
			value("[(1, 0, 0), (0, 1, 0)]", Color3fArray).unwrap(),
			vt::Value::new(vec![gf::Vec3f::new(1.0, 0.0, 0.0), gf::Vec3f::new(0.0, 1.0, 0.0)])
		);
		assert_eq!(
			value("[\"xformOp:translate\"]", TokenArray).unwrap(),
			vt::Value::new(vec![tf::Token::new("xformOp:translate")])
		);
		assert_eq!(value("[1, 2, 3]", IntArray).unwrap(), vt::Value::new(vec![1, 2, 3]));
	}

	#[test]
	fn full_document() {
		let text = r#"#usda 1.0
(
    defaultPrim = "Geometry"
    doc = """comment (with parens)"""
)

// A scene
def "Geometry"
{
    def Xform "GroupTransform" (
        kind = "group"
    )
    {
        uniform token[] xformOpOrder = ["xformOp:translate"]
        custom double3 xformOp:translate = (4, 5, 4)

        def Cube "Box"
        {
            double size = 2 /* edge length */
            color3f[] primvars:displayColor = [(1, 0, 0)]
            custom string note
        }
    }
}

def Scope "Lights"
{
}
"#;
		let tree = parse(text, "scene.usda").unwrap();
		let paths: Vec<_> = tree.traverse().map(|(path, _)| path.to_string()).collect();
		assert_eq!(
			paths,
			vec!["/Geometry", "/Geometry/GroupTransform", "/Geometry/GroupTransform/Box", "/Lights"]
		);

		let group = tree.prim_at_path(&p("/Geometry/GroupTransform")).unwrap();
		assert_eq!(group.type_name(), "Xform");
		let translate = group.attributes().get("xformOp:translate").unwrap();
		assert!(translate.is_custom());
		assert_eq!(
			translate.authored_value(),
			Some(&vt::Value::new(gf::Vec3d::new(4.0, 5.0, 4.0)))
		);

		let cube = tree.prim_at_path(&p("/Geometry/GroupTransform/Box")).unwrap();
		assert_eq!(
			cube.attributes().get("size").unwrap().authored_value(),
			Some(&vt::Value::new(2.0f64))
		);
		let note = cube.attributes().get("note").unwrap();
		assert!(note.is_custom() && !note.is_authored());
		assert!(tree.prim_at_path(&p("/Geometry")).unwrap().type_name().is_empty());
	}

	#[test]
	fn errors_carry_position() {
		let err = parse("#usda 1.0\ndef Cube \"Box\"\n{\n    double size = big\n}\n", "bad.usda")
			.unwrap_err();
		match err {
			crate::Error::Parse { location, message } => {
				assert_eq!(location, "bad.usda");
				assert!(message.starts_with("line 4"), "{message}");
			}
			other => panic!("expected a parse error, got {other:?}"),
		}

		assert!(parse("def \"A\" {}", "no-header").is_err());
		assert!(parse("#usda 1.0\ndef \"A\" {}\ndef \"A\" {}\n", "dup").is_err());
		assert!(parse("#usda 1.0\ndef \"A\" {\n    matrix4d m\n}\n", "type").is_err());
		assert!(parse("#usda 1.0\ndef \"A/B\" {}\n", "name").is_err());
		assert!(parse("#usda 1.0\ndef \"A\" {\n", "open").is_err());
	}

	#[test]
	fn empty_document() {
		let tree = parse("#usda 1.0\n", "empty.usda").unwrap();
		assert_eq!(tree.traverse().count(), 0);
	}
}

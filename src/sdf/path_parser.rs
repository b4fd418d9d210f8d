use crate::peg::{Error, Input, PResult, eoi, must, one, opt, sor, zero_or_more};
use crate::{sdf, tf};

struct Context {
	absolute: bool,
	elements: Vec<tf::Token>,
}

type In<'a> = Input<'a, Context>;

fn alpha_num<C>(i: &mut Input<'_, C>) -> PResult<()> {
	match i.current_char() {
		Some(c) if c.is_alphanumeric() || c == '_' => {
			i.advance();
			Ok(())
		}
		_ => Err(Error::from_msg("Expected prim name")),
	}
}

fn identifier_start<C>(i: &mut Input<'_, C>) -> PResult<()> {
	match i.current_char() {
		Some(c) if c.is_alphabetic() || c == '_' => {
			i.advance();
			Ok(())
		}
		_ => Err(Error::from_msg("Expected prim name")),
	}
}

fn identifier<'a, C>(i: &mut Input<'a, C>) -> PResult<&'a str> {
	let start_pos = i.pos;
	identifier_start(i)?;
	zero_or_more(i, alpha_num)?;
	Ok(i.slice(start_pos..i.pos))
}

fn absolute_root(i: &mut In<'_>) -> PResult<()> {
	one(i, '/')?;
	i.ctx.absolute = true;
	Ok(())
}

fn reflexive_relative(i: &mut In<'_>) -> PResult<()> {
	one(i, '.')
}

fn prim_name(i: &mut In<'_>) -> PResult<()> {
	let name = identifier(i)?;
	tracing::trace!(name, "path element");
	i.ctx.elements.push(tf::Token::new(name));
	Ok(())
}

fn prim_elts(i: &mut In<'_>) -> PResult<()> {
	prim_name(i)?;
	zero_or_more(i, |i| {
		one(i, '/')?;
		// A separator must always be followed by a name.
		must(i, prim_name)
	})
}

fn path(i: &mut In<'_>) -> PResult<()> {
	let absolute = |i: &mut In<'_>| -> PResult<()> {
		absolute_root(i)?;
		opt(i, prim_elts)?;
		Ok(())
	};

	sor!(i, absolute, prim_elts, reflexive_relative)
}

pub fn parse_path(input: &str) -> crate::Result<sdf::Path> {
	if input.is_empty() {
		return Err(crate::Error::invalid_path(input, "path is empty"));
	}

	let mut ctx = Context {
		absolute: false,
		elements: Vec::new(),
	};

	let mut state = Input::new(input, &mut ctx);
	let result = path(&mut state).and_then(|_| eoi(&mut state));
	if let Err(error) = result {
		return Err(crate::Error::invalid_path(
			input,
			state.format_error(&error.message),
		));
	}

	Ok(sdf::Path::from_parts(ctx.absolute, ctx.elements))
}

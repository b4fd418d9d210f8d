//! A tiny PEG combinator toolkit shared by the path and USDA parsers.

use std::ops::Range;

pub struct Input<'a, C> {
	pub input: &'a str,
	pub pos: usize,
	pub ctx: &'a mut C,
}

impl<'a, C> Input<'a, C> {
	pub fn new(input: &'a str, ctx: &'a mut C) -> Self {
		Input { input, pos: 0, ctx }
	}

	pub fn current_char(&self) -> Option<char> {
		self.input[self.pos..].chars().next()
	}

	pub fn advance(&mut self) {
		if let Some(c) = self.current_char() {
			self.pos += c.len_utf8();
		}
	}

	pub fn slice(&self, range: Range<usize>) -> &'a str {
		&self.input[range.start..range.end]
	}

	/// Renders `error` with the line and column of the current position and a caret under it.
	pub fn format_error(&self, error: &str) -> String {
		let position = self.pos.min(self.input.len());
		let line_start = self.input[..position].rfind('\n').map_or(0, |p| p + 1);
		let line_end = self.input[position..]
			.find('\n')
			.map_or(self.input.len(), |p| position + p);

		let line = self.input[..position].matches('\n').count() + 1;
		let column = self.input[line_start..position].chars().count() + 1;

		format!(
			"line {}, column {}: {}\n{}\n{}^",
			line,
			column,
			error,
			&self.input[line_start..line_end],
			" ".repeat(column - 1)
		)
	}
}

#[derive(Debug, Clone)]
pub struct Error {
	global: bool,
	pub message: String,
}

impl Error {
	pub fn from_msg(msg: &str) -> Self {
		Error {
			global: false,
			message: msg.to_string(),
		}
	}

	pub fn fatal(mut self) -> Self {
		self.global = true;
		self
	}

	/// Fatal errors are not recovered by an ordered choice.
	pub fn is_fatal(&self) -> bool {
		self.global
	}
}

pub type PResult<T> = std::result::Result<T, Error>;

pub fn one<C>(i: &mut Input<'_, C>, expected: char) -> PResult<()> {
	match i.current_char() {
		Some(c) if c == expected => {
			i.advance();
			Ok(())
		}
		_ => Err(Error::from_msg(&format!("Expected '{}'", expected))),
	}
}

/// Recognizes a specific string tag, backtracking on mismatch.
pub fn tag<'a, C>(i: &mut Input<'a, C>, expected_tag: &'static str) -> PResult<&'a str> {
	let start_pos = i.pos;
	for expected_char in expected_tag.chars() {
		match i.current_char() {
			Some(c) if c == expected_char => i.advance(),
			_ => {
				i.pos = start_pos;
				return Err(Error::from_msg(&format!("Expected '{}'", expected_tag)));
			}
		}
	}
	Ok(i.slice(start_pos..i.pos))
}

/// Makes a parser optional, restoring the position when it fails.
pub fn opt<'a, T, P, C>(i: &mut Input<'a, C>, parser: P) -> PResult<Option<T>>
where
	P: FnOnce(&mut Input<'a, C>) -> PResult<T>,
{
	let start_pos = i.pos;
	match parser(i) {
		Ok(result) => Ok(Some(result)),
		Err(e) if e.global => Err(e),
		Err(_) => {
			i.pos = start_pos;
			Ok(None)
		}
	}
}

/// Turns any failure of `parser` into a fatal error that stops backtracking.
pub fn must<'a, T, P, C>(i: &mut Input<'a, C>, parser: P) -> PResult<T>
where
	P: FnOnce(&mut Input<'a, C>) -> PResult<T>,
{
	parser(i).map_err(Error::fatal)
}

pub fn zero_or_more<'a, P, C>(i: &mut Input<'a, C>, mut parser: P) -> PResult<()>
where
	P: FnMut(&mut Input<'a, C>) -> PResult<()>,
{
	loop {
		let start_pos = i.pos;
		match parser(i) {
			Ok(_) if i.pos == start_pos => return Ok(()),
			Ok(_) => {}
			Err(e) if e.global => return Err(e),
			Err(_) => {
				i.pos = start_pos;
				return Ok(());
			}
		}
	}
}

pub fn one_or_more<'a, P, C>(i: &mut Input<'a, C>, mut parser: P) -> PResult<()>
where
	P: FnMut(&mut Input<'a, C>) -> PResult<()>,
{
	parser(i)?;
	zero_or_more(i, parser)
}

pub fn terminated<'a, T, P, S, C>(i: &mut Input<'a, C>, parser: P, terminator: S) -> PResult<T>
where
	P: FnOnce(&mut Input<'a, C>) -> PResult<T>,
	S: FnOnce(&mut Input<'a, C>) -> PResult<()>,
{
	let result = parser(i)?;
	terminator(i)?;
	Ok(result)
}

pub fn delimited<'a, T, O, P, CL, C>(
	i: &mut Input<'a, C>,
	opener: O,
	parser: P,
	closer: CL,
) -> PResult<T>
where
	O: FnOnce(&mut Input<'a, C>) -> PResult<()>,
	P: FnOnce(&mut Input<'a, C>) -> PResult<T>,
	CL: FnOnce(&mut Input<'a, C>) -> PResult<()>,
{
	opener(i)?;
	let result = parser(i)?;
	closer(i)?;
	Ok(result)
}

/// Once `first` matches, `second` is required: its failure becomes fatal.
pub fn if_must<'a, F, S, C, T>(i: &mut Input<'a, C>, first: F, second: S) -> PResult<T>
where
	F: FnOnce(&mut Input<'a, C>) -> PResult<()>,
	S: FnOnce(&mut Input<'a, C>) -> PResult<T>,
{
	first(i)?;
	must(i, second)
}

/// Matches a non-empty list of P separated by S and returns the results in a Vec.
pub fn list_collect<'a, T, P, S, C>(
	i: &mut Input<'a, C>,
	mut parser: P,
	mut separator: S,
) -> PResult<Vec<T>>
where
	P: FnMut(&mut Input<'a, C>) -> PResult<T>,
	S: FnMut(&mut Input<'a, C>) -> PResult<()>,
{
	let mut results = vec![parser(i)?];
	zero_or_more(i, |i| {
		separator(i)?;
		results.push(parser(i)?);
		Ok(())
	})?;
	Ok(results)
}

/// Parses content until `delimiter` matches, returning the content and consuming the delimiter.
pub fn until<'a, D, E, C>(i: &mut Input<'a, C>, mut delimiter: D, mut element: E) -> PResult<&'a str>
where
	D: FnMut(&mut Input<'a, C>) -> PResult<()>,
	E: FnMut(&mut Input<'a, C>) -> PResult<()>,
{
	let start_pos = i.pos;

	loop {
		let delimiter_start = i.pos;
		if delimiter(i).is_ok() {
			return Ok(i.slice(start_pos..delimiter_start));
		}
		i.pos = delimiter_start;

		if i.current_char().is_none() {
			return Err(Error::from_msg("Unterminated sequence"));
		}

		match element(i) {
			Ok(_) if i.pos == delimiter_start => {
				return Err(Error::from_msg("Zero-width match in until parser"));
			}
			Ok(_) => {}
			Err(e) if e.global => return Err(e),
			Err(_) => i.advance(),
		}
	}
}

/// Succeeds when all input has been consumed.
pub fn eoi<C>(i: &mut Input<'_, C>) -> PResult<()> {
	if i.current_char().is_none() {
		Ok(())
	} else {
		Err(Error::from_msg("Expected end of input"))
	}
}

/// Ordered choice: tries each parser in turn from the same position.
macro_rules! sor {
	($input:expr, $parser:expr $(,)?) => {
		$parser($input)
	};

	($input:expr, $first:expr, $($rest:expr),+ $(,)?) => {{
		let start_pos = $input.pos;
		match $first($input) {
			Ok(result) => Ok(result),
			Err(e) if e.is_fatal() => Err(e),
			Err(_) => {
				$input.pos = start_pos;
				sor!($input, $($rest),+)
			}
		}
	}};
}

pub(crate) use sor;

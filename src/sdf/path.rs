use crate::{Error, Result, tf};

/// A path value used to locate prims on a stage.
///
/// A path is an ordered list of prim names, either anchored at the absolute root (`/A/B`)
/// or relative to some other path (`A/B`). Equality is structural.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Path {
	absolute: bool,
	elements: Vec<tf::Token>,
}

impl Path {
	/// The absolute path representing the top of the namespace hierarchy.
	pub const fn absolute_root_path() -> Self {
		Self {
			absolute: true,
			elements: Vec::new(),
		}
	}

	/// Parses `text` into a path, failing on empty input, empty segments or invalid names.
	pub fn parse(text: &str) -> Result<Self> {
		super::path_parser::parse_path(text)
	}

	pub(super) fn from_parts(absolute: bool, elements: Vec<tf::Token>) -> Self {
		Self { absolute, elements }
	}
}

/// Querying paths.
impl Path {
	/// Returns true if this path is the [`Self::absolute_root_path`].
	pub fn is_absolute_root(&self) -> bool {
		self.absolute && self.elements.is_empty()
	}

	pub fn is_absolute(&self) -> bool {
		self.absolute
	}

	/// The prim names making up this path, outermost first.
	pub fn elements(&self) -> &[tf::Token] {
		&self.elements
	}

	pub fn element_count(&self) -> usize {
		self.elements.len()
	}

	/// Return the path that identifies this path's namespace parent.
	///
	/// The parent of the absolute root is the absolute root itself.
	pub fn parent_path(&self) -> Self {
		let mut elements = self.elements.clone();
		elements.pop();
		Self {
			absolute: self.absolute,
			elements,
		}
	}

	/// Return an iterator over the ancestors of this path.
	///
	/// Ordered from longest to shortest, starting with the path itself and ending
	/// with a single element path, not including the root.
	pub fn ancestors_range(&self) -> PathAncestorsRange {
		PathAncestorsRange { path: self.clone() }
	}

	/// Returns the name of the prim identified by the path, or an empty token for a root.
	pub fn name_token(&self) -> tf::Token {
		self.elements.last().cloned().unwrap_or_default()
	}

	pub fn name(&self) -> String {
		self.name_token().to_string()
	}
}

/// Creating new paths by modifying existing paths.
impl Path {
	/// Creates a path by appending an element for `child_name` to this path.
	pub fn append_child(&self, child_name: impl Into<tf::Token>) -> Result<Self> {
		let child_name = child_name.into();
		if !is_valid_identifier(child_name.as_str()) {
			return Err(Error::invalid_path(
				format!("{}/{}", self, child_name),
				format!("`{}` is not a valid prim name", child_name),
			));
		}

		let mut elements = self.elements.clone();
		elements.push(child_name);
		Ok(Self {
			absolute: self.absolute,
			elements,
		})
	}

	/// Appends a name that is already known to be valid, such as one taken from a prim.
	pub(crate) fn child_path(&self, child_name: &tf::Token) -> Self {
		let mut elements = self.elements.clone();
		elements.push(child_name.clone());
		Self {
			absolute: self.absolute,
			elements,
		}
	}

	/// Creates a path by appending the relative path `suffix` to this path.
	///
	/// An absolute `suffix` is rejected, as it cannot be anchored below another path.
	pub fn append_path(&self, suffix: &Path) -> Result<Self> {
		if suffix.absolute {
			return Err(Error::invalid_path(
				suffix,
				format!("cannot append an absolute path to <{}>", self),
			));
		}

		let mut elements = self.elements.clone();
		elements.extend(suffix.elements.iter().cloned());
		Ok(Self {
			absolute: self.absolute,
			elements,
		})
	}
}

/// Valid prim names start with a letter or `_`, followed by letters, digits and `_`.
pub fn is_valid_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	chars.next().is_some_and(|c| c.is_alphabetic() || c == '_')
		&& chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Valid attribute names are `:`-separated identifiers, e.g. `primvars:displayColor`.
pub fn is_valid_property_name(name: &str) -> bool {
	name.split(':').all(is_valid_identifier)
}

impl std::str::FromStr for Path {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		Self::parse(s)
	}
}

impl TryFrom<&str> for Path {
	type Error = Error;

	fn try_from(s: &str) -> Result<Self> {
		Self::parse(s)
	}
}

impl std::fmt::Display for Path {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		if self.elements.is_empty() {
			return f.write_str(if self.absolute { "/" } else { "." });
		}

		for (index, element) in self.elements.iter().enumerate() {
			if self.absolute || index > 0 {
				f.write_str("/")?;
			}
			f.write_str(element.as_str())?;
		}
		Ok(())
	}
}

pub struct PathAncestorsRange {
	path: Path,
}

impl std::iter::Iterator for PathAncestorsRange {
	type Item = Path;

	fn next(&mut self) -> Option<Self::Item> {
		if self.path.elements.is_empty() {
			return None;
		}

		let current_path = self.path.clone();
		self.path.elements.pop();
		Some(current_path)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn p(s: &str) -> Path {
		Path::parse(s).unwrap()
	}

	#[test]
	fn append_child() {
		assert_eq!(p("/foo").append_child("bar").unwrap(), p("/foo/bar"));
		assert_eq!(p("foo").append_child("bar").unwrap(), p("foo/bar"));
		assert_eq!(
			Path::absolute_root_path().append_child("foo").unwrap(),
			p("/foo")
		);
		assert!(p("/foo").append_child("").is_err());
		assert!(p("/foo").append_child("a/b").is_err());
	}

	#[test]
	fn append_path() {
		let base = p("/Geometry");
		assert_eq!(
			base.append_path(&p("GroupTransform")).unwrap(),
			p("/Geometry/GroupTransform")
		);
		assert_eq!(base.append_path(&p("A/B")).unwrap(), p("/Geometry/A/B"));
		assert!(base.append_path(&p("/Other")).is_err());
		assert_eq!(base, p("/Geometry"));
	}

	#[test]
	fn parent_path() {
		assert_eq!(p("/foo").parent_path(), Path::absolute_root_path());
		assert_eq!(p("/foo/bar").parent_path(), p("/foo"));
		assert_eq!(p("foo/bar").parent_path(), p("foo"));
		assert_eq!(Path::absolute_root_path().parent_path(), Path::absolute_root_path());
	}

	#[test]
	fn ancestors_range() {
		let path = p("/foo/bar/baz");
		let mut ancestors = path.ancestors_range();
		assert_eq!(ancestors.next(), Some(p("/foo/bar/baz")));
		assert_eq!(ancestors.next(), Some(p("/foo/bar")));
		assert_eq!(ancestors.next(), Some(p("/foo")));
		assert_eq!(ancestors.next(), None);
	}

	#[test]
	fn equality_is_structural() {
		assert_eq!(p("/A/B"), Path::absolute_root_path().append_path(&p("A/B")).unwrap());
		assert_ne!(p("/A/B"), p("A/B"));
		assert_ne!(p("/A/B"), p("/A/B/C"));
	}

	#[test]
	fn names_start_with_a_letter_or_underscore() {
		assert!(is_valid_identifier("_2d"));
		assert!(is_valid_identifier("Box2"));
		assert!(!is_valid_identifier("2d"));
		assert!(!is_valid_identifier("3D"));
		assert!(is_valid_property_name("primvars:displayColor"));
		assert!(!is_valid_property_name("primvars:2d"));
		assert!(!is_valid_property_name("2d"));
		assert!(p("/A").append_child("3D").is_err());
	}

	#[test]
	fn print() {
		assert_eq!(p("/foo").to_string(), "/foo");
		assert_eq!(p("/foo/bar").to_string(), "/foo/bar");
		assert_eq!(p("foo/bar").to_string(), "foo/bar");
		assert_eq!(Path::absolute_root_path().to_string(), "/");
		assert_eq!(p("/foo/bar").name(), "bar");
	}
}

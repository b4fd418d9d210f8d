use super::AttributeStore;
use crate::{Error, Result, sdf, tf};

/// A prim and, through its children, the whole subtree below it.
///
/// A prim's path is implied by where it sits in the tree and is never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimSpec {
	name: tf::Token,
	type_name: tf::Token,
	attributes: AttributeStore,
	children: Vec<PrimSpec>,
}

impl PrimSpec {
	pub fn new(name: impl Into<tf::Token>, type_name: impl Into<tf::Token>) -> Self {
		PrimSpec {
			name: name.into(),
			type_name: type_name.into(),
			..Default::default()
		}
	}

	pub fn name(&self) -> &tf::Token {
		&self.name
	}

	/// The schema type, empty for untyped containers.
	pub fn type_name(&self) -> &tf::Token {
		&self.type_name
	}

	pub(crate) fn set_type_name(&mut self, type_name: tf::Token) {
		self.type_name = type_name;
	}

	pub fn attributes(&self) -> &AttributeStore {
		&self.attributes
	}

	pub fn attributes_mut(&mut self) -> &mut AttributeStore {
		&mut self.attributes
	}

	pub fn children(&self) -> &[PrimSpec] {
		&self.children
	}

	/// Look up a direct child by name. Deeper descendants are never considered.
	pub fn child(&self, name: &str) -> Option<&PrimSpec> {
		self.children.iter().find(|child| child.name == name)
	}

	pub fn child_mut(&mut self, name: &str) -> Option<&mut PrimSpec> {
		self.children.iter_mut().find(|child| child.name == name)
	}

	/// Append `child` after the existing children, failing if its name is taken.
	pub(crate) fn push_child(&mut self, child: PrimSpec) -> std::result::Result<&mut PrimSpec, PrimSpec> {
		if self.child(child.name.as_str()).is_some() {
			return Err(child);
		}
		self.children.push(child);
		let last = self.children.len() - 1;
		Ok(&mut self.children[last])
	}
}

/// The prim hierarchy of a stage, hanging off a nameless pseudo-root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimTree {
	pseudo_root: PrimSpec,
}

impl PrimTree {
	pub fn new() -> Self {
		Self::default()
	}

	pub(crate) fn from_pseudo_root(pseudo_root: PrimSpec) -> Self {
		PrimTree { pseudo_root }
	}

	pub fn pseudo_root(&self) -> &PrimSpec {
		&self.pseudo_root
	}

	/// Return the prim at the absolute `path`, or `None` if there is none.
	pub fn prim_at_path(&self, path: &sdf::Path) -> Option<&PrimSpec> {
		if !path.is_absolute() {
			return None;
		}
		path.elements()
			.iter()
			.try_fold(&self.pseudo_root, |prim, name| prim.child(name.as_str()))
	}

	pub fn prim_at_path_mut(&mut self, path: &sdf::Path) -> Option<&mut PrimSpec> {
		if !path.is_absolute() {
			return None;
		}
		path.elements()
			.iter()
			.try_fold(&mut self.pseudo_root, |prim, name| prim.child_mut(name.as_str()))
	}

	pub fn has_prim(&self, path: &sdf::Path) -> bool {
		self.prim_at_path(path).is_some()
	}

	/// Append `prim` as the last child of the prim at `parent`.
	pub fn add_child(&mut self, parent: &sdf::Path, prim: PrimSpec) -> Result<&mut PrimSpec> {
		let parent_spec = self
			.prim_at_path_mut(parent)
			.ok_or_else(|| Error::ExpiredPrim(parent.clone()))?;

		parent_spec.push_child(prim).map_err(|prim| Error::DuplicateChild {
			parent: parent.clone(),
			name: prim.name,
		})
	}

	/// Detach and return the subtree rooted at `path`. The pseudo-root cannot be removed.
	pub fn remove(&mut self, path: &sdf::Path) -> Option<PrimSpec> {
		if path.is_absolute_root() {
			return None;
		}
		let name = path.name_token();
		let parent = self.prim_at_path_mut(&path.parent_path())?;
		let index = parent.children.iter().position(|child| child.name == name)?;
		Some(parent.children.remove(index))
	}

	/// Depth-first, pre-order walk over every prim, excluding the pseudo-root.
	pub fn traverse(&self) -> PrimTreeRange<'_> {
		let root = sdf::Path::absolute_root_path();
		let mut range = PrimTreeRange { stack: Vec::new() };
		range.push_children(&root, &self.pseudo_root);
		range
	}

	/// Depth-first, pre-order walk starting at, and including, the prim at `path`.
	pub fn traverse_from(&self, path: &sdf::Path) -> PrimTreeRange<'_> {
		let stack = match self.prim_at_path(path) {
			Some(prim) => vec![(path.clone(), prim)],
			None => Vec::new(),
		};
		PrimTreeRange { stack }
	}
}

/// Iterator produced by [`PrimTree::traverse`]. Siblings are visited in insertion order.
pub struct PrimTreeRange<'a> {
	stack: Vec<(sdf::Path, &'a PrimSpec)>,
}

impl<'a> PrimTreeRange<'a> {
	fn push_children(&mut self, path: &sdf::Path, prim: &'a PrimSpec) {
		for child in prim.children.iter().rev() {
			self.stack.push((path.child_path(&child.name), child));
		}
	}
}

impl<'a> Iterator for PrimTreeRange<'a> {
	type Item = (sdf::Path, &'a PrimSpec);

	fn next(&mut self) -> Option<Self::Item> {
		let (path, prim) = self.stack.pop()?;
		self.push_children(&path, prim);
		Some((path, prim))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn p(s: &str) -> sdf::Path {
		sdf::Path::parse(s).unwrap()
	}

	fn sample() -> PrimTree {
		let mut tree = PrimTree::new();
		let root = sdf::Path::absolute_root_path();
		tree.add_child(&root, PrimSpec::new("Geometry", "Scope")).unwrap();
		tree.add_child(&p("/Geometry"), PrimSpec::new("GroupTransform", "Xform"))
			.unwrap();
		tree.add_child(&p("/Geometry/GroupTransform"), PrimSpec::new("Box", "Cube"))
			.unwrap();
		tree.add_child(&root, PrimSpec::new("Lights", "Scope")).unwrap();
		tree.add_child(&p("/Lights"), PrimSpec::new("DomeLight", "DomeLight"))
			.unwrap();
		tree
	}

	fn paths(range: PrimTreeRange<'_>) -> Vec<String> {
		range.map(|(path, _)| path.to_string()).collect()
	}

	#[test]
	fn lookup() {
		let tree = sample();
		assert_eq!(
			tree.prim_at_path(&p("/Geometry/GroupTransform/Box"))
				.unwrap()
				.type_name(),
			"Cube"
		);
		assert!(tree.prim_at_path(&p("/Geometry/Box")).is_none());
		assert!(tree.prim_at_path(&p("Geometry")).is_none());
		assert_eq!(
			tree.prim_at_path(&sdf::Path::absolute_root_path()),
			Some(tree.pseudo_root())
		);
	}

	#[test]
	fn child_is_shallow() {
		let tree = sample();
		let geometry = tree.prim_at_path(&p("/Geometry")).unwrap();
		assert!(geometry.child("GroupTransform").is_some());
		assert!(geometry.child("Box").is_none());
	}

	#[test]
	fn traversal_is_pre_order() {
		let tree = sample();
		assert_eq!(
			paths(tree.traverse()),
			vec![
				"/Geometry",
				"/Geometry/GroupTransform",
				"/Geometry/GroupTransform/Box",
				"/Lights",
				"/Lights/DomeLight"
			]
		);
		assert_eq!(paths(tree.traverse()), paths(tree.traverse()));
	}

	#[test]
	fn traverse_from_includes_start() {
		let tree = sample();
		assert_eq!(
			paths(tree.traverse_from(&p("/Geometry/GroupTransform"))),
			vec!["/Geometry/GroupTransform", "/Geometry/GroupTransform/Box"]
		);
		assert_eq!(paths(tree.traverse_from(&p("/Missing"))), Vec::<String>::new());
	}

	#[test]
	fn duplicate_child() {
		let mut tree = sample();
		let err = tree
			.add_child(&p("/Geometry"), PrimSpec::new("GroupTransform", "Scope"))
			.unwrap_err();
		assert!(matches!(err, Error::DuplicateChild { .. }));
		assert_eq!(tree, sample());

		let err = tree
			.add_child(&p("/Nowhere"), PrimSpec::new("A", ""))
			.unwrap_err();
		assert!(matches!(err, Error::ExpiredPrim(_)));
	}

	#[test]
	fn remove_drops_subtree() {
		let mut tree = sample();
		let removed = tree.remove(&p("/Geometry")).unwrap();
		assert_eq!(removed.children().len(), 1);
		assert!(!tree.has_prim(&p("/Geometry/GroupTransform/Box")));
		assert_eq!(paths(tree.traverse()), vec!["/Lights", "/Lights/DomeLight"]);
		assert!(tree.remove(&sdf::Path::absolute_root_path()).is_none());
		assert!(tree.remove(&p("/Geometry")).is_none());
	}
}

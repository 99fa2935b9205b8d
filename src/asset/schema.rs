use std::collections::HashMap;

use crate::asset::{AssetError, Result};

/// Field requires 4-byte alignment after its payload.
pub const FLAG_ALIGN_AFTER: u32 = 0x4000;
/// Field is hidden from editor inspection.
pub const FLAG_HIDE_IN_EDITOR: u32 = 0x1;

/// Sentinel byte size for variable-length fields (arrays, strings).
pub const SIZE_VARIABLE: i32 = -1;

/// One node of a class's flattened field-layout tree.
///
/// The tree is stored pre-order; `depth` encodes nesting. A node's
/// children are the following nodes with `depth + 1` up to the next
/// node at `depth` or shallower.
#[derive(Debug, Clone)]
pub struct FieldNode {
	/// Primitive or composite type name (for example `int`, `string`,
	/// `PPtr<GameObject>`).
	pub type_name: Box<str>,
	/// Field name.
	pub name: Box<str>,
	/// Nesting depth below the class root node.
	pub depth: u8,
	/// Declared byte size, or [`SIZE_VARIABLE`] for variable length.
	pub size: i32,
	/// Whether this node is an array header (`size` child + element child).
	pub is_array: bool,
	/// Flag bits controlling alignment and editor visibility.
	pub flags: u32,
}

impl FieldNode {
	/// Create a fixed-size leaf node.
	pub fn leaf(type_name: &str, name: &str, depth: u8, size: i32) -> Self {
		Self {
			type_name: type_name.into(),
			name: name.into(),
			depth,
			size,
			is_array: false,
			flags: 0,
		}
	}

	/// Return this node with extra flag bits set.
	pub fn with_flags(mut self, flags: u32) -> Self {
		self.flags |= flags;
		self
	}

	/// Return this node marked as an array header.
	pub fn as_array(mut self) -> Self {
		self.is_array = true;
		self.size = SIZE_VARIABLE;
		self
	}

	/// Whether this node is an embedded object reference.
	pub fn is_reference(&self) -> bool {
		self.type_name.starts_with("PPtr<")
	}
}

/// Immutable schema for one class id.
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
	/// Numeric class id.
	pub class_id: i32,
	/// Class name (matches the root field node's type name).
	pub name: Box<str>,
	/// Flattened pre-order field tree, root node first.
	pub fields: Vec<FieldNode>,
}

/// Read-only index of class descriptors keyed by id and name.
#[derive(Debug, Default)]
pub struct ClassIndex {
	classes: Vec<ClassDescriptor>,
	by_id: HashMap<i32, usize>,
	by_name: HashMap<Box<str>, usize>,
}

impl ClassIndex {
	/// Create an empty index.
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a class descriptor.
	pub fn register(&mut self, descriptor: ClassDescriptor) -> Result<()> {
		if self.by_id.contains_key(&descriptor.class_id) {
			return Err(AssetError::DuplicateClass {
				class_id: descriptor.class_id,
			});
		}

		let slot = self.classes.len();
		self.by_id.insert(descriptor.class_id, slot);
		self.by_name.insert(descriptor.name.clone(), slot);
		self.classes.push(descriptor);
		Ok(())
	}

	/// Resolve a class descriptor by numeric id.
	pub fn resolve(&self, class_id: i32) -> Result<&ClassDescriptor> {
		self.by_id
			.get(&class_id)
			.map(|slot| &self.classes[*slot])
			.ok_or(AssetError::UnknownClass { class_id })
	}

	/// Resolve a class descriptor by name.
	pub fn resolve_by_name(&self, name: &str) -> Result<&ClassDescriptor> {
		self.by_name
			.get(name)
			.map(|slot| &self.classes[*slot])
			.ok_or_else(|| AssetError::UnknownClassName { name: name.to_owned() })
	}

	/// Return number of registered classes.
	pub fn len(&self) -> usize {
		self.classes.len()
	}

	/// Return whether no classes are registered.
	pub fn is_empty(&self) -> bool {
		self.classes.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::{ClassDescriptor, ClassIndex, FieldNode};

	#[test]
	fn duplicate_class_id_is_rejected() {
		let mut index = ClassIndex::new();
		index
			.register(ClassDescriptor {
				class_id: 1,
				name: "GameObject".into(),
				fields: vec![FieldNode::leaf("GameObject", "Base", 0, -1)],
			})
			.expect("first registration succeeds");

		let err = index.register(ClassDescriptor {
			class_id: 1,
			name: "Other".into(),
			fields: Vec::new(),
		});
		assert!(err.is_err());
	}

	#[test]
	fn lookup_by_id_and_name_agree() {
		let mut index = ClassIndex::new();
		index
			.register(ClassDescriptor {
				class_id: 4,
				name: "Transform".into(),
				fields: vec![FieldNode::leaf("Transform", "Base", 0, -1)],
			})
			.expect("registration succeeds");

		let by_id = index.resolve(4).expect("id resolves");
		let by_name = index.resolve_by_name("Transform").expect("name resolves");
		assert_eq!(by_id.class_id, by_name.class_id);
		assert!(index.resolve(99).is_err());
	}
}

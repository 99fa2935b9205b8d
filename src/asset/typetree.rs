use std::collections::HashMap;

use crate::asset::schema::{ClassDescriptor, FieldNode};
use crate::asset::store::SCRIPT_INDEX_NONE;
use crate::asset::{AssetError, Result};

/// One field of a type tree entry.
///
/// Mirrors [`FieldNode`] with an explicit pre-order position, which is
/// what serialized field references inside a container use.
#[derive(Debug, Clone)]
pub struct TypeField {
	/// Type name.
	pub type_name: Box<str>,
	/// Field name.
	pub name: Box<str>,
	/// Nesting depth below the entry root.
	pub depth: u8,
	/// Declared byte size, `-1` for variable length.
	pub size: i32,
	/// Pre-order position within the entry.
	pub index: u32,
	/// Whether this field is an array header.
	pub is_array: bool,
	/// Flag bits (alignment, editor visibility).
	pub flags: u32,
}

impl TypeField {
	fn from_node(node: &FieldNode, index: u32) -> Self {
		Self {
			type_name: node.type_name.clone(),
			name: node.name.clone(),
			depth: node.depth,
			size: node.size,
			index,
			is_array: node.is_array,
			flags: node.flags,
		}
	}
}

/// One class layout embedded in an output container.
#[derive(Debug, Clone)]
pub struct TypeTreeEntry {
	/// Numeric class id this entry describes.
	pub class_id: i32,
	/// Script type index, [`SCRIPT_INDEX_NONE`] for plain classes.
	pub script_index: u16,
	/// Script layout hash, zero for plain classes.
	pub type_hash: [u8; 16],
	/// Field tree in pre-order, root field first.
	pub fields: Vec<TypeField>,
}

impl TypeTreeEntry {
	/// Build an entry from a schema class descriptor.
	pub fn from_class(descriptor: &ClassDescriptor) -> Self {
		let fields = descriptor
			.fields
			.iter()
			.enumerate()
			.map(|(index, node)| TypeField::from_node(node, index as u32))
			.collect();

		Self {
			class_id: descriptor.class_id,
			script_index: SCRIPT_INDEX_NONE,
			type_hash: [0_u8; 16],
			fields,
		}
	}

	/// Return the root field name (the class type name).
	pub fn type_name(&self) -> &str {
		self.fields.first().map(|field| field.type_name.as_ref()).unwrap_or("")
	}
}

/// Builder splicing extra fields into an existing type tree entry.
///
/// Used to synthesize layouts for injected metadata object types that
/// are absent from the class schema database. Insertion keeps
/// parent/child ordering intact and re-numbers pre-order positions.
pub struct TypeTreeEditor {
	entry: TypeTreeEntry,
}

impl TypeTreeEditor {
	/// Start editing an entry.
	pub fn new(entry: TypeTreeEntry) -> Self {
		Self { entry }
	}

	/// Return the pre-order index of the entry's root field.
	pub fn base_field(&self) -> Result<u32> {
		if self.entry.fields.is_empty() {
			return Err(AssetError::EmptyFieldTree {
				class_id: self.entry.class_id,
			});
		}
		Ok(0)
	}

	/// Build a detached field ready for [`TypeTreeEditor::add_field`].
	pub fn create_field(&self, type_name: &str, name: &str, depth: u8, size: i32, is_array: bool, flags: u32) -> TypeField {
		TypeField {
			type_name: type_name.into(),
			name: name.into(),
			depth,
			size,
			index: 0,
			is_array,
			flags,
		}
	}

	/// Insert a field as the last child of `parent`, returning its index.
	///
	/// The field lands after every existing descendant of the parent so
	/// sibling order follows insertion order.
	pub fn add_field(&mut self, parent: u32, field: TypeField) -> Result<u32> {
		let parent_slot = parent as usize;
		let fields = &mut self.entry.fields;
		if parent_slot >= fields.len() {
			return Err(AssetError::FieldIndexOutOfRange {
				index: parent,
				max: fields.len().saturating_sub(1) as u32,
			});
		}

		let parent_depth = fields[parent_slot].depth;
		let mut slot = parent_slot + 1;
		while slot < fields.len() && fields[slot].depth > parent_depth {
			slot += 1;
		}

		fields.insert(slot, field);
		for (index, item) in fields.iter_mut().enumerate() {
			item.index = index as u32;
		}
		Ok(slot as u32)
	}

	/// Finish editing and return the immutable entry.
	pub fn finish(self) -> TypeTreeEntry {
		self.entry
	}

	/// Return the fields edited so far.
	pub fn fields(&self) -> &[TypeField] {
		&self.entry.fields
	}
}

/// Insertion-ordered, memoized collection of type tree entries.
///
/// The position of an entry is the numeric type index referenced by
/// every serialized object of that class within one container, so
/// insertion order is load-bearing and entries are never reordered.
#[derive(Debug, Default)]
pub struct TypeRegistry {
	entries: Vec<TypeTreeEntry>,
	by_key: HashMap<(Box<str>, u16), u32>,
}

impl TypeRegistry {
	/// Create an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Return the type index for a plain class, inserting on first sight.
	pub fn index_for_class(&mut self, descriptor: &ClassDescriptor) -> u32 {
		let key = (descriptor.name.clone(), SCRIPT_INDEX_NONE);
		if let Some(index) = self.by_key.get(&key) {
			return *index;
		}

		let index = self.entries.len() as u32;
		self.entries.push(TypeTreeEntry::from_class(descriptor));
		self.by_key.insert(key, index);
		index
	}

	/// Insert a pre-built (typically synthesized) entry under a name.
	pub fn insert_entry(&mut self, name: &str, entry: TypeTreeEntry) -> u32 {
		let key = (Box::<str>::from(name), entry.script_index);
		if let Some(index) = self.by_key.get(&key) {
			return *index;
		}

		let index = self.entries.len() as u32;
		self.entries.push(entry);
		self.by_key.insert(key, index);
		index
	}

	/// Return entries in insertion order.
	pub fn entries(&self) -> &[TypeTreeEntry] {
		&self.entries
	}

	/// Consume the registry and return entries in insertion order.
	pub fn into_entries(self) -> Vec<TypeTreeEntry> {
		self.entries
	}

	/// Return number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Return whether the registry is empty.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

use crate::asset::bytes::Cursor;
use crate::asset::schema::{ClassDescriptor, FLAG_ALIGN_AFTER, FieldNode};
use crate::asset::{AssetError, Result};

/// One embedded reference located inside an object's raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefSpan {
	/// Byte offset of the reference within the object payload.
	pub offset: usize,
	/// Serialized file id (`0` = owner file).
	pub file_id: i32,
	/// Serialized target path id.
	pub path_id: i64,
}

impl RefSpan {
	/// Serialized byte width of one reference (`i32` file id + `i64` path id).
	pub const WIDTH: usize = 12;

	/// Whether this is the null reference `(0, 0)`.
	pub fn is_null(&self) -> bool {
		self.file_id == 0 && self.path_id == 0
	}
}

/// Result of enumerating one object's reference fields.
#[derive(Debug)]
pub struct ObjectScan {
	/// Discovered reference fields in layout order.
	pub refs: Vec<RefSpan>,
	/// Bytes consumed by the declared class layout.
	pub consumed: usize,
}

/// Walk an object's bytes far enough to enumerate every reference field.
///
/// The walk follows the class's flattened field tree: fixed-size leaves
/// advance by their declared size, array headers read an `i32` count and
/// repeat their element subtree, and fields flagged with
/// [`FLAG_ALIGN_AFTER`] re-align the cursor to 4 bytes after their
/// payload. Trailing bytes beyond the declared layout are permitted;
/// script-extended objects carry per-script fields the base class
/// descriptor does not cover.
pub fn scan_object(descriptor: &ClassDescriptor, bytes: &[u8]) -> Result<ObjectScan> {
	if descriptor.fields.is_empty() {
		return Err(AssetError::EmptyFieldTree {
			class_id: descriptor.class_id,
		});
	}

	let mut walker = Walker {
		class_id: descriptor.class_id,
		fields: &descriptor.fields,
		cursor: Cursor::new(bytes),
		refs: Vec::new(),
	};

	walker.walk_field(0)?;
	Ok(ObjectScan {
		consumed: walker.cursor.pos(),
		refs: walker.refs,
	})
}

struct Walker<'a> {
	class_id: i32,
	fields: &'a [FieldNode],
	cursor: Cursor<'a>,
	refs: Vec<RefSpan>,
}

impl Walker<'_> {
	/// Walk the subtree rooted at `slot`, returning the slot past it.
	fn walk_field(&mut self, slot: usize) -> Result<usize> {
		let fields = self.fields;
		let node = &fields[slot];
		let end = self.subtree_end(slot);

		if node.is_reference() {
			let offset = self.cursor.pos();
			let file_id = self.read_i32()?;
			let path_id = self.read_i64()?;
			self.refs.push(RefSpan { offset, file_id, path_id });
		} else if node.is_array {
			let count = self.read_i32()?;
			if count < 0 {
				return Err(self.malformed("negative array count"));
			}

			// children: the size field, then the element subtree
			if slot + 1 >= end {
				return Err(self.malformed("array header missing element node"));
			}
			let elem = self.subtree_end(slot + 1);
			if elem >= end {
				return Err(self.malformed("array header missing element node"));
			}
			for _ in 0..count {
				self.walk_field(elem)?;
			}
		} else if slot + 1 < end {
			let mut child = slot + 1;
			while child < end {
				child = self.walk_field(child)?;
			}
		} else {
			if node.size < 0 {
				return Err(self.malformed("variable-size leaf without children"));
			}
			self.cursor.read_exact(node.size as usize).map_err(|_| self.eof())?;
		}

		if node.flags & FLAG_ALIGN_AFTER != 0 {
			self.cursor.align4().map_err(|_| self.eof())?;
		}
		Ok(end)
	}

	/// Return the first slot past the subtree rooted at `slot`.
	fn subtree_end(&self, slot: usize) -> usize {
		let depth = self.fields[slot].depth;
		let mut end = slot + 1;
		while end < self.fields.len() && self.fields[end].depth > depth {
			end += 1;
		}
		end
	}

	fn read_i32(&mut self) -> Result<i32> {
		self.cursor.read_i32_le().map_err(|_| self.eof())
	}

	fn read_i64(&mut self) -> Result<i64> {
		self.cursor.read_i64_le().map_err(|_| self.eof())
	}

	fn eof(&self) -> AssetError {
		AssetError::MalformedObject {
			class_id: self.class_id,
			detail: "object bytes shorter than class layout",
		}
	}

	fn malformed(&self, detail: &'static str) -> AssetError {
		AssetError::MalformedObject {
			class_id: self.class_id,
			detail,
		}
	}
}

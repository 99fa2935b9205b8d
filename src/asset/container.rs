use crate::asset::bytes::{ByteWriter, Cursor};
use crate::asset::typetree::{TypeField, TypeTreeEntry};
use crate::asset::{AssetError, Result};

/// Leading magic of a written container.
pub const CONTAINER_MAGIC: [u8; 4] = *b"SXC1";
/// Current container format version.
pub const CONTAINER_VERSION: u32 = 1;
/// Engine version tag matched by the target game build.
pub const DEFAULT_ENGINE_VERSION: &str = "2017.4.10f1";

/// One object pending write, bytes already relocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord {
	/// Local id within this container.
	pub local_id: i64,
	/// Numeric class id.
	pub class_id: i32,
	/// Position of the object's class in the container type tree.
	pub type_index: u32,
	/// Script type index, `0xffff` for plain classes.
	pub script_index: u16,
	/// Relocated object payload bytes.
	pub data: Vec<u8>,
}

/// In-memory image of one output container.
///
/// Object and type order are preserved verbatim on write: consumers
/// resolve "first object of a given class" positionally, and type tree
/// positions are the type indices object records point at.
#[derive(Debug, Default)]
pub struct Container {
	/// Engine version tag written into the preamble.
	pub engine_version: String,
	/// Embedded type tree entries in insertion order.
	pub types: Vec<TypeTreeEntry>,
	/// Path-based dependencies on other containers.
	pub dependencies: Vec<String>,
	/// Object records in write order.
	pub objects: Vec<ObjectRecord>,
}

impl Container {
	/// Create an empty container with an engine version tag.
	pub fn new(engine_version: impl Into<String>) -> Self {
		Self {
			engine_version: engine_version.into(),
			..Self::default()
		}
	}

	/// Serialize the container to its on-disk byte image.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut writer = ByteWriter::new();
		writer.put_bytes(&CONTAINER_MAGIC);
		writer.put_u32(CONTAINER_VERSION);
		writer.put_count_string(&self.engine_version);

		writer.put_u32(self.types.len() as u32);
		for entry in &self.types {
			write_type_entry(&mut writer, entry);
		}

		writer.put_u32(self.dependencies.len() as u32);
		for path in &self.dependencies {
			writer.put_count_string(path);
		}

		writer.put_u32(self.objects.len() as u32);
		for record in &self.objects {
			writer.put_i64(record.local_id);
			writer.put_i32(record.class_id);
			writer.put_u32(record.type_index);
			writer.put_u16(record.script_index);
			writer.align4();
			writer.put_u32(record.data.len() as u32);
			writer.put_bytes(&record.data);
			writer.align4();
		}

		writer.into_bytes()
	}

	/// Parse a container byte image back into memory.
	pub fn parse(bytes: &[u8]) -> Result<Self> {
		let mut cursor = Cursor::new(bytes);

		let magic = cursor.read_code4()?;
		if magic != CONTAINER_MAGIC {
			return Err(AssetError::BadMagic { magic });
		}

		let version = cursor.read_u32_le()?;
		if version != CONTAINER_VERSION {
			return Err(AssetError::UnsupportedContainerVersion { version });
		}

		let engine_version = cursor.read_count_string()?;

		let type_count = cursor.read_u32_le()? as usize;
		let mut types = Vec::with_capacity(type_count);
		for _ in 0..type_count {
			types.push(read_type_entry(&mut cursor)?);
		}

		let dep_count = cursor.read_u32_le()? as usize;
		let mut dependencies = Vec::with_capacity(dep_count);
		for _ in 0..dep_count {
			dependencies.push(cursor.read_count_string()?);
		}

		let object_count = cursor.read_u32_le()? as usize;
		let mut objects = Vec::with_capacity(object_count);
		for _ in 0..object_count {
			let local_id = cursor.read_i64_le()?;
			let class_id = cursor.read_i32_le()?;
			let type_index = cursor.read_u32_le()?;
			let script_index = cursor.read_u16_le()?;
			cursor.align4()?;
			let len = cursor.read_u32_le()? as usize;
			let data = cursor.read_exact(len)?.to_vec();
			cursor.align4()?;
			objects.push(ObjectRecord {
				local_id,
				class_id,
				type_index,
				script_index,
				data,
			});
		}

		Ok(Self {
			engine_version,
			types,
			dependencies,
			objects,
		})
	}
}

fn write_type_entry(writer: &mut ByteWriter, entry: &TypeTreeEntry) {
	writer.put_i32(entry.class_id);
	writer.put_u16(entry.script_index);
	writer.align4();
	writer.put_bytes(&entry.type_hash);
	writer.put_u32(entry.fields.len() as u32);
	for field in &entry.fields {
		writer.put_cstring(&field.type_name);
		writer.put_cstring(&field.name);
		writer.put_u8(field.depth);
		writer.put_u8(u8::from(field.is_array));
		writer.put_i32(field.size);
		writer.put_u32(field.index);
		writer.put_u32(field.flags);
		writer.align4();
	}
}

fn read_type_entry(cursor: &mut Cursor<'_>) -> Result<TypeTreeEntry> {
	let class_id = cursor.read_i32_le()?;
	let script_index = cursor.read_u16_le()?;
	cursor.align4()?;
	let mut type_hash = [0_u8; 16];
	type_hash.copy_from_slice(cursor.read_exact(16)?);

	let field_count = cursor.read_u32_le()? as usize;
	let mut fields = Vec::with_capacity(field_count);
	for _ in 0..field_count {
		let type_name = String::from_utf8_lossy(cursor.read_cstring_bytes()?).into_owned().into_boxed_str();
		let name = String::from_utf8_lossy(cursor.read_cstring_bytes()?).into_owned().into_boxed_str();
		let depth = cursor.read_u8()?;
		let is_array = cursor.read_u8()? != 0;
		let size = cursor.read_i32_le()?;
		let index = cursor.read_u32_le()?;
		let flags = cursor.read_u32_le()?;
		cursor.align4()?;
		fields.push(TypeField {
			type_name,
			name,
			depth,
			size,
			index,
			is_array,
			flags,
		});
	}

	Ok(TypeTreeEntry {
		class_id,
		script_index,
		type_hash,
		fields,
	})
}

#[cfg(test)]
mod tests {
	use super::{Container, ObjectRecord};
	use crate::asset::schema::{ClassDescriptor, FieldNode, SIZE_VARIABLE};
	use crate::asset::store::SCRIPT_INDEX_NONE;
	use crate::asset::typetree::TypeTreeEntry;

	#[test]
	fn container_round_trips_verbatim() {
		let descriptor = ClassDescriptor {
			class_id: 1,
			name: "GameObject".into(),
			fields: vec![
				FieldNode::leaf("GameObject", "Base", 0, SIZE_VARIABLE),
				FieldNode::leaf("UInt8", "m_IsActive", 1, 1),
			],
		};

		let mut container = Container::new("2017.4.10f1");
		container.types.push(TypeTreeEntry::from_class(&descriptor));
		container.dependencies.push("ExportedScenesData/level2-data.assets".to_owned());
		container.objects.push(ObjectRecord {
			local_id: 1,
			class_id: 1,
			type_index: 0,
			script_index: SCRIPT_INDEX_NONE,
			data: vec![1, 2, 3, 4, 5],
		});
		container.objects.push(ObjectRecord {
			local_id: 2,
			class_id: 1,
			type_index: 0,
			script_index: SCRIPT_INDEX_NONE,
			data: Vec::new(),
		});

		let bytes = container.to_bytes();
		let parsed = Container::parse(&bytes).expect("parse succeeds");

		assert_eq!(parsed.engine_version, container.engine_version);
		assert_eq!(parsed.dependencies, container.dependencies);
		assert_eq!(parsed.objects, container.objects);
		assert_eq!(parsed.types.len(), 1);
		assert_eq!(parsed.types[0].fields.len(), 2);
		assert_eq!(parsed.types[0].fields[1].name.as_ref(), "m_IsActive");
	}

	#[test]
	fn foreign_magic_is_rejected() {
		let err = Container::parse(b"BLEN\x01\x00\x00\x00");
		assert!(err.is_err());
	}
}

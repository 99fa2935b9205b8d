use std::collections::HashMap;
use std::sync::Arc;

use crate::asset::{AssetError, AssetId, Result};

/// Script type index marking a plain, non-script class.
pub const SCRIPT_INDEX_NONE: u16 = 0xffff;

/// Table metadata for one serialized object.
#[derive(Debug, Clone, Copy)]
pub struct ObjectInfo {
	/// Object path id, unique within its source file.
	pub path_id: i64,
	/// Numeric class id.
	pub class_id: i32,
	/// Script type index, [`SCRIPT_INDEX_NONE`] for plain classes.
	pub script_index: u16,
	/// Byte offset of the object payload within the file data.
	pub offset: usize,
	/// Byte length of the object payload.
	pub len: usize,
}

/// One loaded source file: object table, externals table, payload bytes.
#[derive(Debug)]
pub struct SourceFile {
	/// File name used for cross-file reference resolution.
	pub name: Arc<str>,
	externals: Vec<Arc<str>>,
	objects: Vec<ObjectInfo>,
	by_path: HashMap<i64, usize>,
	data: Vec<u8>,
}

impl SourceFile {
	/// Create a file over its raw payload bytes.
	pub fn new(name: impl Into<Arc<str>>, data: Vec<u8>) -> Self {
		Self {
			name: name.into(),
			externals: Vec::new(),
			objects: Vec::new(),
			by_path: HashMap::new(),
			data,
		}
	}

	/// Append an external file reference.
	///
	/// Serialized references with `file_id == n + 1` resolve to the
	/// `n`-th external; `file_id == 0` means this file itself.
	pub fn add_external(&mut self, name: impl Into<Arc<str>>) {
		self.externals.push(name.into());
	}

	/// Append an object table entry.
	pub fn add_object(&mut self, info: ObjectInfo) -> Result<()> {
		if self.by_path.contains_key(&info.path_id) {
			return Err(AssetError::DuplicateObject {
				file: self.name.to_string(),
				path_id: info.path_id,
			});
		}

		self.by_path.insert(info.path_id, self.objects.len());
		self.objects.push(info);
		Ok(())
	}

	/// Look up an object table entry by path id.
	pub fn object(&self, path_id: i64) -> Option<&ObjectInfo> {
		self.by_path.get(&path_id).map(|slot| &self.objects[*slot])
	}

	/// Return an object's raw payload bytes.
	pub fn object_bytes(&self, info: &ObjectInfo) -> Result<&[u8]> {
		let end = info.offset.checked_add(info.len);
		end.and_then(|end| self.data.get(info.offset..end)).ok_or(AssetError::ObjectOutOfRange {
			file: self.name.to_string(),
			path_id: info.path_id,
			offset: info.offset,
			len: info.len,
			have: self.data.len(),
		})
	}

	/// Iterate objects of one class in table order.
	pub fn objects_of_class(&self, class_id: i32) -> impl Iterator<Item = &ObjectInfo> {
		self.objects.iter().filter(move |info| info.class_id == class_id)
	}

	/// Iterate all objects in table order.
	pub fn objects(&self) -> impl Iterator<Item = &ObjectInfo> {
		self.objects.iter()
	}

	/// Map a serialized file id to the target file name.
	pub fn target_file(&self, file_id: i32) -> Result<Arc<str>> {
		if file_id == 0 {
			return Ok(self.name.clone());
		}

		file_id
			.checked_sub(1)
			.and_then(|slot| usize::try_from(slot).ok())
			.and_then(|slot| self.externals.get(slot))
			.cloned()
			.ok_or(AssetError::ExternalOutOfRange {
				file: self.name.to_string(),
				file_id,
			})
	}
}

/// Read-only collection of all loaded source files.
#[derive(Debug, Default)]
pub struct ObjectStore {
	files: Vec<SourceFile>,
	by_name: HashMap<Arc<str>, usize>,
}

impl ObjectStore {
	/// Create an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a loaded source file.
	pub fn add_file(&mut self, file: SourceFile) -> Result<()> {
		if self.by_name.contains_key(&file.name) {
			return Err(AssetError::DuplicateFile { file: file.name.to_string() });
		}

		self.by_name.insert(file.name.clone(), self.files.len());
		self.files.push(file);
		Ok(())
	}

	/// Look up a loaded file by name.
	pub fn file(&self, name: &str) -> Result<&SourceFile> {
		self.by_name
			.get(name)
			.map(|slot| &self.files[*slot])
			.ok_or_else(|| AssetError::FileNotLoaded { file: name.to_owned() })
	}

	/// Resolve an identity to its object table entry.
	pub fn resolve(&self, id: &AssetId) -> Result<&ObjectInfo> {
		self.file(&id.file)?.object(id.path_id).ok_or(AssetError::UnresolvedReference {
			file: id.file.to_string(),
			path_id: id.path_id,
		})
	}

	/// Return an object's raw payload bytes by identity.
	pub fn object_bytes(&self, id: &AssetId) -> Result<&[u8]> {
		let file = self.file(&id.file)?;
		let info = file.object(id.path_id).ok_or(AssetError::UnresolvedReference {
			file: id.file.to_string(),
			path_id: id.path_id,
		})?;
		file.object_bytes(info)
	}

	/// Iterate loaded files in load order.
	pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
		self.files.iter()
	}
}

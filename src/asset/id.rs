use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Globally unique object identity across all loaded source files.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetId {
	/// Owning source file name.
	pub file: Arc<str>,
	/// Object path id within the owning file.
	pub path_id: i64,
}

impl AssetId {
	/// Create an identity from a file name and path id.
	pub fn new(file: impl Into<Arc<str>>, path_id: i64) -> Self {
		Self {
			file: file.into(),
			path_id,
		}
	}
}

impl fmt::Display for AssetId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.file, self.path_id)
	}
}

/// Global-to-local identity mapping for one extraction run.
///
/// Doubles as the crawler's visited set: insertion is idempotent, so
/// re-discovering an already-mapped object never allocates a second
/// local id and traversal of cyclic graphs terminates.
#[derive(Debug, Default)]
pub struct IdentityMap {
	by_global: HashMap<AssetId, i64>,
	order: Vec<AssetId>,
}

impl IdentityMap {
	/// First local id handed out by [`IdentityMap::insert`].
	pub const FIRST_LOCAL_ID: i64 = 1;

	/// Create an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Map an identity to a local id, allocating one on first sight.
	///
	/// Returns the already-assigned id when the identity is known.
	pub fn insert(&mut self, id: AssetId) -> i64 {
		if let Some(local) = self.by_global.get(&id) {
			return *local;
		}

		let local = self.next_local();
		self.by_global.insert(id.clone(), local);
		self.order.push(id);
		local
	}

	/// Look up the local id for an identity.
	pub fn get(&self, id: &AssetId) -> Option<i64> {
		self.by_global.get(id).copied()
	}

	/// Return whether an identity has been mapped.
	pub fn contains(&self, id: &AssetId) -> bool {
		self.by_global.contains_key(id)
	}

	/// Return the next local id that would be allocated.
	///
	/// Useful for allocating ids for injected objects above the
	/// crawler's range without touching the map.
	pub fn next_local(&self) -> i64 {
		Self::FIRST_LOCAL_ID + self.order.len() as i64
	}

	/// Iterate mapped identities in first-discovery order.
	pub fn iter(&self) -> impl Iterator<Item = (&AssetId, i64)> {
		self.order.iter().map(|id| (id, self.by_global[id]))
	}

	/// Return mapped local ids in first-discovery order.
	pub fn local_ids(&self) -> impl Iterator<Item = i64> {
		Self::FIRST_LOCAL_ID..self.next_local()
	}

	/// Return number of mapped identities.
	pub fn len(&self) -> usize {
		self.order.len()
	}

	/// Return whether the map is empty.
	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}
}

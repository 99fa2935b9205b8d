use std::collections::VecDeque;

use crate::asset::id::{AssetId, IdentityMap};
use crate::asset::schema::ClassIndex;
use crate::asset::store::ObjectStore;
use crate::asset::walk::scan_object;
use crate::asset::{AssetError, Result};

/// Output of one reference-graph crawl.
#[derive(Debug)]
pub struct CrawlResult {
	/// Global-to-local identity mapping in first-discovery order.
	pub map: IdentityMap,
	/// Distinct class ids in first-encounter order.
	pub classes: Vec<i32>,
}

/// Breadth-first object graph traversal over the loaded store.
///
/// Discovers everything transitively reachable from the given roots,
/// assigning each object exactly one local id. The identity map is the
/// visited set, so diamonds and cycles terminate naturally. Discovery
/// order is deterministic for identical inputs: roots first, in the
/// order given, then each object's references in field layout order.
pub struct Crawler<'a> {
	store: &'a ObjectStore,
	schema: &'a ClassIndex,
}

impl<'a> Crawler<'a> {
	/// Create a crawler over a store and schema index.
	pub fn new(store: &'a ObjectStore, schema: &'a ClassIndex) -> Self {
		Self { store, schema }
	}

	/// Crawl the graph reachable from `roots`.
	///
	/// A reference to an object absent from the store is a hard
	/// [`AssetError::UnresolvedReference`]; a partially-valid result is
	/// never produced. Null references `(0, 0)` are dropped and never
	/// allocated an id.
	pub fn crawl(&self, roots: &[AssetId]) -> Result<CrawlResult> {
		let mut map = IdentityMap::new();
		let mut classes = Vec::new();
		let mut queue: VecDeque<AssetId> = roots.iter().cloned().collect();

		while let Some(id) = queue.pop_front() {
			if map.contains(&id) {
				continue;
			}

			let file = self.store.file(&id.file)?;
			let info = *file.object(id.path_id).ok_or(AssetError::UnresolvedReference {
				file: id.file.to_string(),
				path_id: id.path_id,
			})?;

			map.insert(id);
			if !classes.contains(&info.class_id) {
				classes.push(info.class_id);
			}

			let descriptor = self.schema.resolve(info.class_id)?;
			let bytes = file.object_bytes(&info)?;
			let scan = scan_object(descriptor, bytes)?;

			for span in scan.refs {
				if span.is_null() {
					continue;
				}

				let target = AssetId::new(file.target_file(span.file_id)?, span.path_id);
				if map.contains(&target) {
					continue;
				}

				// fail now so the error names the missing object
				self.store.resolve(&target)?;
				queue.push_back(target);
			}
		}

		Ok(CrawlResult { map, classes })
	}
}

#[cfg(test)]
mod tests {
	use super::Crawler;
	use crate::asset::bytes::ByteWriter;
	use crate::asset::id::AssetId;
	use crate::asset::schema::{ClassDescriptor, ClassIndex, FieldNode, SIZE_VARIABLE};
	use crate::asset::store::{ObjectInfo, ObjectStore, SCRIPT_INDEX_NONE, SourceFile};

	fn link_schema() -> ClassIndex {
		let mut schema = ClassIndex::new();
		schema
			.register(ClassDescriptor {
				class_id: 7,
				name: "Link".into(),
				fields: vec![
					FieldNode::leaf("Link", "Base", 0, SIZE_VARIABLE),
					FieldNode::leaf("PPtr<Link>", "m_Next", 1, 12),
					FieldNode::leaf("int", "m_FileID", 2, 4),
					FieldNode::leaf("SInt64", "m_PathID", 2, 8),
				],
			})
			.expect("schema registers");
		schema
	}

	fn link_file(name: &str, links: &[(i64, i32, i64)]) -> SourceFile {
		let mut writer = ByteWriter::new();
		let mut infos = Vec::new();
		for (path_id, file_id, target) in links {
			let offset = writer.len();
			writer.put_i32(*file_id);
			writer.put_i64(*target);
			infos.push(ObjectInfo {
				path_id: *path_id,
				class_id: 7,
				script_index: SCRIPT_INDEX_NONE,
				offset,
				len: 12,
			});
		}

		let mut file = SourceFile::new(name, writer.into_bytes());
		for info in infos {
			file.add_object(info).expect("object adds");
		}
		file
	}

	#[test]
	fn self_cycle_allocates_one_id() {
		let mut store = ObjectStore::new();
		store.add_file(link_file("a", &[(1, 0, 1)])).expect("file adds");
		let schema = link_schema();

		let result = Crawler::new(&store, &schema).crawl(&[AssetId::new("a", 1)]).expect("crawl succeeds");
		assert_eq!(result.map.len(), 1);
		assert_eq!(result.classes, vec![7]);
	}

	#[test]
	fn unresolved_reference_is_a_hard_error() {
		let mut store = ObjectStore::new();
		store.add_file(link_file("a", &[(1, 0, 99)])).expect("file adds");
		let schema = link_schema();

		let err = Crawler::new(&store, &schema).crawl(&[AssetId::new("a", 1)]);
		assert!(err.is_err());
	}

	#[test]
	fn null_reference_is_dropped() {
		let mut store = ObjectStore::new();
		store.add_file(link_file("a", &[(1, 0, 0)])).expect("file adds");
		let schema = link_schema();

		let result = Crawler::new(&store, &schema).crawl(&[AssetId::new("a", 1)]).expect("crawl succeeds");
		assert_eq!(result.map.len(), 1);
	}
}

mod bytes;
mod container;
mod crawl;
mod error;
mod extract;
mod id;
mod metadata;
mod reloc;
mod schema;
mod sidecar;
mod store;
mod typetree;
mod walk;

/// Bounded cursor and little-endian byte sink.
pub use bytes::{ByteWriter, Cursor};
/// Output container image, records, and format constants.
pub use container::{CONTAINER_MAGIC, CONTAINER_VERSION, Container, DEFAULT_ENGINE_VERSION, ObjectRecord};
/// Reference graph traversal entry points.
pub use crawl::{CrawlResult, Crawler};
/// Error and result aliases.
pub use error::{AssetError, Result};
/// Extraction orchestration and on-disk commit.
pub use extract::{DATA_DIR_NAME, ExtractOptions, Extraction, ExtractionPaths, extract, write_extraction};
/// Object identity and global-to-local mapping.
pub use id::{AssetId, IdentityMap};
/// Synthetic metadata object types and payload builders.
pub use metadata::{CLASS_GAME_OBJECT, CLASS_MONO_BEHAVIOUR, CLASS_TRANSFORM, METADATA_VERSION, ORIGIN_TRACKER_SCRIPT, SCENE_METADATA_SCRIPT};
/// Pointer relocation pass.
pub use reloc::relocate;
/// Class schema index types and field flags.
pub use schema::{ClassDescriptor, ClassIndex, FLAG_ALIGN_AFTER, FLAG_HIDE_IN_EDITOR, FieldNode, SIZE_VARIABLE};
/// Sidecar identity file helpers.
pub use sidecar::{identity_guid, sidecar_text};
/// Loaded source files and object tables.
pub use store::{ObjectInfo, ObjectStore, SCRIPT_INDEX_NONE, SourceFile};
/// Type tree synthesis and registry types.
pub use typetree::{TypeField, TypeRegistry, TypeTreeEditor, TypeTreeEntry};
/// Reference-field enumeration over raw object bytes.
pub use walk::{ObjectScan, RefSpan, scan_object};

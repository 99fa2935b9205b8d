use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Errors produced while crawling, relocating, and writing asset data.
#[derive(Debug, Error)]
pub enum AssetError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Referenced source file is not among the loaded files.
	#[error("file not loaded: {file}")]
	FileNotLoaded {
		/// Requested source file name.
		file: String,
	},
	/// A source file with the same name is already loaded.
	#[error("duplicate source file: {file}")]
	DuplicateFile {
		/// Offending file name.
		file: String,
	},
	/// Two objects in one source file share a path id.
	#[error("duplicate object {path_id} in {file}")]
	DuplicateObject {
		/// Source file name.
		file: String,
		/// Duplicated object path id.
		path_id: i64,
	},
	/// Object table entry points outside the file's payload bytes.
	#[error("object {path_id} in {file} out of range: offset={offset}, len={len}, have={have}")]
	ObjectOutOfRange {
		/// Source file name.
		file: String,
		/// Object path id.
		path_id: i64,
		/// Declared byte offset.
		offset: usize,
		/// Declared byte length.
		len: usize,
		/// Available payload bytes.
		have: usize,
	},
	/// Schema lookup by class id failed.
	#[error("unknown class id {class_id}")]
	UnknownClass {
		/// Requested numeric class id.
		class_id: i32,
	},
	/// Schema lookup by class name failed.
	#[error("unknown class name: {name}")]
	UnknownClassName {
		/// Requested class name.
		name: String,
	},
	/// A class id was registered twice in the schema index.
	#[error("duplicate class id {class_id}")]
	DuplicateClass {
		/// Duplicated class id.
		class_id: i32,
	},
	/// Crawler could not locate a referenced object in the store.
	#[error("unresolved reference to {path_id} in {file}")]
	UnresolvedReference {
		/// Target source file name.
		file: String,
		/// Target object path id.
		path_id: i64,
	},
	/// Relocation found a non-null reference the crawler never mapped.
	#[error("unrelocated reference to {path_id} in {file}")]
	Unrelocated {
		/// Target source file name.
		file: String,
		/// Target object path id.
		path_id: i64,
	},
	/// Serialized file id does not fit the owner file's externals table.
	#[error("external file id {file_id} out of range in {file}")]
	ExternalOutOfRange {
		/// Owner source file name.
		file: String,
		/// Offending serialized file id.
		file_id: i32,
	},
	/// Object bytes do not match the declared class layout.
	#[error("malformed object of class {class_id}: {detail}")]
	MalformedObject {
		/// Declared class id of the object being walked.
		class_id: i32,
		/// Short layout violation description.
		detail: &'static str,
	},
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Unknown leading container magic.
	#[error("not a scenex container (magic={magic:?})")]
	BadMagic {
		/// First up-to-4 bytes of the stream.
		magic: [u8; 4],
	},
	/// Unsupported container format version.
	#[error("unsupported container version {version} (expected 1)")]
	UnsupportedContainerVersion {
		/// Parsed format version.
		version: u32,
	},
	/// Serialized length prefix was negative.
	#[error("negative length {len} at offset {at}")]
	NegativeLength {
		/// Byte offset of the length prefix.
		at: usize,
		/// Parsed signed length.
		len: i64,
	},
	/// Type tree editor received an out-of-range field index.
	#[error("type field index {index} out of range (max={max})")]
	FieldIndexOutOfRange {
		/// Offending field index.
		index: u32,
		/// Maximum valid index.
		max: u32,
	},
	/// Type tree entry has no base field to attach children to.
	#[error("class {class_id} has an empty field tree")]
	EmptyFieldTree {
		/// Class id of the empty entry.
		class_id: i32,
	},
}

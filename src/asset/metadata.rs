use crate::asset::bytes::{ByteWriter, Cursor};
use crate::asset::schema::{ClassDescriptor, FLAG_ALIGN_AFTER, FLAG_HIDE_IN_EDITOR, SIZE_VARIABLE};
use crate::asset::typetree::{TypeTreeEditor, TypeTreeEntry};
use crate::asset::{AssetError, Result};

/// Class id of GameObject.
pub const CLASS_GAME_OBJECT: i32 = 0x01;
/// Class id of Transform.
pub const CLASS_TRANSFORM: i32 = 0x04;
/// Class id of MonoBehaviour, the base class of script-attached objects.
pub const CLASS_MONO_BEHAVIOUR: i32 = 0x72;

/// Script type index of the per-root origin tracker behaviour.
pub const ORIGIN_TRACKER_SCRIPT: u16 = 0x0000;
/// Script type index of the scene metadata behaviour.
pub const SCENE_METADATA_SCRIPT: u16 = 0x0001;

/// Version stamp written into scene metadata behaviours.
pub const METADATA_VERSION: i32 = 1;
/// Name of the injected metadata game object.
pub const METADATA_MARKER_NAME: &str = " <//Scene Metadata//>";

/// Synthesized type name for the origin tracker behaviour.
pub const ORIGIN_TRACKER_TYPE: &str = "OriginTracker";
/// Synthesized type name for the scene metadata behaviour.
pub const SCENE_METADATA_TYPE: &str = "SceneMetadata";

fn script_hash(type_name: &str) -> [u8; 16] {
	let hash = blake3::hash(type_name.as_bytes());
	let mut out = [0_u8; 16];
	out.copy_from_slice(&hash.as_bytes()[..16]);
	out
}

/// Synthesize the origin tracker layout on top of the behaviour base class.
///
/// The tracker records where each extracted root object came from:
/// its new identity, the original path id, and a per-run instance id.
pub fn origin_tracker_entry(base: &ClassDescriptor) -> Result<TypeTreeEntry> {
	let mut entry = TypeTreeEntry::from_class(base);
	entry.script_index = ORIGIN_TRACKER_SCRIPT;
	entry.type_hash = script_hash(ORIGIN_TRACKER_TYPE);

	let mut editor = TypeTreeEditor::new(entry);
	let base_field = editor.base_field()?;
	editor.add_field(base_field, editor.create_field("unsigned int", "fileId", 1, 4, false, 0))?;
	editor.add_field(base_field, editor.create_field("UInt64", "pathId", 1, 8, false, 0))?;
	editor.add_field(base_field, editor.create_field("UInt64", "origPathId", 1, 8, false, 0))?;
	editor.add_field(base_field, editor.create_field("UInt8", "newAsset", 1, 1, false, FLAG_ALIGN_AFTER))?;
	editor.add_field(base_field, editor.create_field("int", "instanceId", 1, 4, false, 0))?;
	Ok(editor.finish())
}

/// Synthesize the scene metadata layout on top of the behaviour base class.
///
/// String and array payloads force 4-byte alignment after themselves;
/// the flags here are load-bearing for binary compatibility, not
/// cosmetic.
pub fn scene_metadata_entry(base: &ClassDescriptor) -> Result<TypeTreeEntry> {
	let mut entry = TypeTreeEntry::from_class(base);
	entry.script_index = SCENE_METADATA_SCRIPT;
	entry.type_hash = script_hash(SCENE_METADATA_TYPE);

	let mut editor = TypeTreeEditor::new(entry);
	let base_field = editor.base_field()?;

	let scene_name = editor.add_field(base_field, editor.create_field("string", "sceneName", 1, SIZE_VARIABLE, false, FLAG_ALIGN_AFTER))?;
	let name_array = editor.add_field(scene_name, editor.create_field("Array", "Array", 2, SIZE_VARIABLE, true, FLAG_HIDE_IN_EDITOR))?;
	editor.add_field(name_array, editor.create_field("int", "size", 3, 4, false, FLAG_HIDE_IN_EDITOR))?;
	editor.add_field(name_array, editor.create_field("char", "data", 3, 1, false, FLAG_HIDE_IN_EDITOR))?;

	let used_ids = editor.add_field(base_field, editor.create_field("vector", "usedIds", 1, SIZE_VARIABLE, false, FLAG_ALIGN_AFTER))?;
	let ids_array = editor.add_field(used_ids, editor.create_field("Array", "Array", 2, SIZE_VARIABLE, true, 0))?;
	editor.add_field(ids_array, editor.create_field("int", "size", 3, 4, false, 0))?;
	editor.add_field(ids_array, editor.create_field("SInt64", "data", 3, 8, false, 0))?;

	editor.add_field(base_field, editor.create_field("int", "version", 1, 4, false, 0))?;
	Ok(editor.finish())
}

fn put_behaviour_header(writer: &mut ByteWriter, go_local: i64) {
	// m_GameObject
	writer.put_i32(0);
	writer.put_i64(go_local);
	// m_Enabled
	writer.put_u8(1);
	writer.align4();
	// m_Script stays null: script dependencies are identity-based and
	// identity-based resolution is unsupported in the output format
	writer.put_i32(0);
	writer.put_i64(0);
	// m_Name
	writer.put_count_string("");
}

/// Build the payload of one origin tracker behaviour.
pub fn origin_tracker_blob(go_local: i64, orig_path_id: i64, instance_id: i32) -> Vec<u8> {
	let mut writer = ByteWriter::new();
	put_behaviour_header(&mut writer, go_local);
	writer.put_u32(0); // fileId
	writer.put_i64(orig_path_id); // pathId
	writer.put_i64(orig_path_id); // origPathId
	writer.put_u8(0); // newAsset
	writer.align4();
	writer.put_i32(instance_id);
	writer.into_bytes()
}

/// Build the payload of the scene metadata behaviour.
pub fn scene_metadata_blob(go_local: i64, scene_name: &str, used_ids: &[i64]) -> Vec<u8> {
	let mut writer = ByteWriter::new();
	put_behaviour_header(&mut writer, go_local);
	writer.put_count_string(scene_name);
	writer.put_i32(used_ids.len() as i32);
	for id in used_ids {
		writer.put_i64(*id);
	}
	writer.align4();
	writer.put_i32(METADATA_VERSION);
	writer.into_bytes()
}

/// Build the payload of the metadata carrier game object.
pub fn metadata_game_object_blob(tf_local: i64, mb_local: i64) -> Vec<u8> {
	let mut writer = ByteWriter::new();
	writer.put_i32(2);
	writer.put_i32(0);
	writer.put_i64(tf_local);
	writer.put_i32(0);
	writer.put_i64(mb_local);
	writer.put_u32(0); // m_Layer
	writer.put_count_string(METADATA_MARKER_NAME);
	writer.put_u16(0); // m_Tag
	writer.put_u8(1); // m_IsActive
	writer.into_bytes()
}

/// Build the payload of the metadata carrier transform.
pub fn metadata_transform_blob(go_local: i64) -> Vec<u8> {
	let mut writer = ByteWriter::new();
	writer.put_i32(0);
	writer.put_i64(go_local);
	// identity rotation, zero position, unit scale
	for value in [0.0_f32, 0.0, 0.0, 1.0] {
		writer.put_f32(value);
	}
	for value in [0.0_f32, 0.0, 0.0] {
		writer.put_f32(value);
	}
	for value in [1.0_f32, 1.0, 1.0] {
		writer.put_f32(value);
	}
	writer.put_i32(0); // m_Children count
	writer.put_i32(0); // m_Father
	writer.put_i64(0);
	writer.into_bytes()
}

/// Append a behaviour reference to a game object's component list.
///
/// Reads the leading component array (count, then one reference per
/// component), drops null entries, appends `(0, behaviour_local)`, and
/// re-emits the payload with the remainder untouched.
pub fn append_component(bytes: &[u8], behaviour_local: i64) -> Result<Vec<u8>> {
	let malformed = |detail| AssetError::MalformedObject {
		class_id: CLASS_GAME_OBJECT,
		detail,
	};

	let mut cursor = Cursor::new(bytes);
	let count = cursor.read_i32_le().map_err(|_| malformed("component count missing"))?;
	if count < 0 {
		return Err(malformed("negative component count"));
	}

	let mut refs = Vec::with_capacity(count as usize + 1);
	for _ in 0..count {
		let file_id = cursor.read_i32_le().map_err(|_| malformed("component list truncated"))?;
		let path_id = cursor.read_i64_le().map_err(|_| malformed("component list truncated"))?;
		if file_id == 0 && path_id == 0 {
			continue;
		}
		refs.push((file_id, path_id));
	}
	refs.push((0, behaviour_local));

	let rest = cursor.read_exact(cursor.remaining()).map_err(|_| malformed("component list truncated"))?;

	let mut writer = ByteWriter::new();
	writer.put_i32(refs.len() as i32);
	for (file_id, path_id) in refs {
		writer.put_i32(file_id);
		writer.put_i64(path_id);
	}
	writer.put_bytes(rest);
	Ok(writer.into_bytes())
}

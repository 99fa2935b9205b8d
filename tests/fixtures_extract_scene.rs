#![allow(missing_docs)]

use scenex::asset::{
	ByteWriter, ClassDescriptor, ClassIndex, Container, ExtractOptions, FieldNode, ObjectInfo, ObjectStore, SCRIPT_INDEX_NONE, SIZE_VARIABLE, SourceFile,
	extract, scan_object, sidecar_text, write_extraction,
};

const CLASS_GAME_OBJECT: i32 = 1;
const CLASS_TRANSFORM: i32 = 4;
const CLASS_RENDERER: i32 = 23;
const CLASS_TEXTURE: i32 = 28;
const CLASS_MONO_BEHAVIOUR: i32 = 114;

fn pptr(type_name: &str, name: &str, depth: u8) -> Vec<FieldNode> {
	vec![
		FieldNode::leaf(type_name, name, depth, 12),
		FieldNode::leaf("int", "m_FileID", depth + 1, 4),
		FieldNode::leaf("SInt64", "m_PathID", depth + 1, 8),
	]
}

fn string_field(name: &str, depth: u8) -> Vec<FieldNode> {
	vec![
		FieldNode::leaf("string", name, depth, SIZE_VARIABLE).with_flags(scenex::asset::FLAG_ALIGN_AFTER),
		FieldNode::leaf("Array", "Array", depth + 1, SIZE_VARIABLE).as_array(),
		FieldNode::leaf("int", "size", depth + 2, 4),
		FieldNode::leaf("char", "data", depth + 2, 1),
	]
}

fn schema() -> ClassIndex {
	let mut game_object = vec![
		FieldNode::leaf("GameObject", "Base", 0, SIZE_VARIABLE),
		FieldNode::leaf("vector", "m_Component", 1, SIZE_VARIABLE),
		FieldNode::leaf("Array", "Array", 2, SIZE_VARIABLE).as_array(),
		FieldNode::leaf("int", "size", 3, 4),
		FieldNode::leaf("ComponentPair", "data", 3, 12),
	];
	game_object.extend(pptr("PPtr<Component>", "component", 4));
	game_object.push(FieldNode::leaf("unsigned int", "m_Layer", 1, 4));
	game_object.extend(string_field("m_Name", 1));
	game_object.push(FieldNode::leaf("UInt16", "m_Tag", 1, 2));
	game_object.push(FieldNode::leaf("UInt8", "m_IsActive", 1, 1));

	let mut transform = vec![FieldNode::leaf("Transform", "Base", 0, SIZE_VARIABLE)];
	transform.extend(pptr("PPtr<GameObject>", "m_GameObject", 1));
	transform.push(FieldNode::leaf("Quaternionf", "m_LocalRotation", 1, 16));
	for axis in ["x", "y", "z", "w"] {
		transform.push(FieldNode::leaf("float", axis, 2, 4));
	}
	for vector in ["m_LocalPosition", "m_LocalScale"] {
		transform.push(FieldNode::leaf("Vector3f", vector, 1, 12));
		for axis in ["x", "y", "z"] {
			transform.push(FieldNode::leaf("float", axis, 2, 4));
		}
	}
	transform.push(FieldNode::leaf("vector", "m_Children", 1, SIZE_VARIABLE));
	transform.push(FieldNode::leaf("Array", "Array", 2, SIZE_VARIABLE).as_array());
	transform.push(FieldNode::leaf("int", "size", 3, 4));
	transform.extend(pptr("PPtr<Transform>", "data", 3));
	transform.extend(pptr("PPtr<Transform>", "m_Father", 1));

	let mut renderer = vec![FieldNode::leaf("Renderer", "Base", 0, SIZE_VARIABLE)];
	renderer.extend(pptr("PPtr<GameObject>", "m_GameObject", 1));
	renderer.extend(pptr("PPtr<Texture2D>", "m_MainTexture", 1));

	let mut texture = vec![FieldNode::leaf("Texture2D", "Base", 0, SIZE_VARIABLE)];
	texture.extend(string_field("m_Name", 1));
	texture.push(FieldNode::leaf("int", "m_Width", 1, 4));
	texture.push(FieldNode::leaf("int", "m_Height", 1, 4));

	let mut behaviour = vec![FieldNode::leaf("MonoBehaviour", "Base", 0, SIZE_VARIABLE)];
	behaviour.extend(pptr("PPtr<GameObject>", "m_GameObject", 1));
	behaviour.push(FieldNode::leaf("UInt8", "m_Enabled", 1, 1).with_flags(scenex::asset::FLAG_ALIGN_AFTER));
	behaviour.extend(pptr("PPtr<MonoScript>", "m_Script", 1));
	behaviour.extend(string_field("m_Name", 1));

	let mut index = ClassIndex::new();
	for (class_id, name, fields) in [
		(CLASS_GAME_OBJECT, "GameObject", game_object),
		(CLASS_TRANSFORM, "Transform", transform),
		(CLASS_RENDERER, "Renderer", renderer),
		(CLASS_TEXTURE, "Texture2D", texture),
		(CLASS_MONO_BEHAVIOUR, "MonoBehaviour", behaviour),
	] {
		index
			.register(ClassDescriptor {
				class_id,
				name: name.into(),
				fields,
			})
			.expect("class registers");
	}
	index
}

fn game_object_blob(name: &str, components: &[(i32, i64)]) -> Vec<u8> {
	let mut writer = ByteWriter::new();
	writer.put_i32(components.len() as i32);
	for (file_id, path_id) in components {
		writer.put_i32(*file_id);
		writer.put_i64(*path_id);
	}
	writer.put_u32(0);
	writer.put_count_string(name);
	writer.put_u16(0);
	writer.put_u8(1);
	writer.into_bytes()
}

fn transform_blob(game_object: (i32, i64)) -> Vec<u8> {
	let mut writer = ByteWriter::new();
	writer.put_i32(game_object.0);
	writer.put_i64(game_object.1);
	for value in [0.0_f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0] {
		writer.put_f32(value);
	}
	writer.put_i32(0);
	writer.put_i32(0);
	writer.put_i64(0);
	writer.into_bytes()
}

fn renderer_blob(game_object: (i32, i64), texture: (i32, i64)) -> Vec<u8> {
	let mut writer = ByteWriter::new();
	writer.put_i32(game_object.0);
	writer.put_i64(game_object.1);
	writer.put_i32(texture.0);
	writer.put_i64(texture.1);
	writer.into_bytes()
}

fn texture_blob(name: &str, width: i32, height: i32) -> Vec<u8> {
	let mut writer = ByteWriter::new();
	writer.put_count_string(name);
	writer.put_i32(width);
	writer.put_i32(height);
	writer.into_bytes()
}

fn build_file(name: &str, externals: &[&str], objects: &[(i64, i32, Vec<u8>)]) -> SourceFile {
	let mut writer = ByteWriter::new();
	let mut infos = Vec::new();
	for (path_id, class_id, blob) in objects {
		let offset = writer.len();
		writer.put_bytes(blob);
		infos.push(ObjectInfo {
			path_id: *path_id,
			class_id: *class_id,
			script_index: SCRIPT_INDEX_NONE,
			offset,
			len: blob.len(),
		});
	}

	let mut file = SourceFile::new(name, writer.into_bytes());
	for external in externals {
		file.add_external(*external);
	}
	for info in infos {
		file.add_object(info).expect("object adds");
	}
	file
}

fn build_store() -> ObjectStore {
	let level = build_file(
		"level2",
		&["sharedassets0.assets"],
		&[
			(10, CLASS_GAME_OBJECT, game_object_blob("Player", &[(0, 20), (0, 30)])),
			(20, CLASS_TRANSFORM, transform_blob((0, 10))),
			(30, CLASS_RENDERER, renderer_blob((0, 10), (1, 500))),
		],
	);
	let shared = build_file("sharedassets0.assets", &[], &[(500, CLASS_TEXTURE, texture_blob("atlas", 64, 64))]);

	let mut store = ObjectStore::new();
	store.add_file(level).expect("level adds");
	store.add_file(shared).expect("shared adds");
	store
}

#[test]
fn extraction_partitions_and_relocates() {
	let store = build_store();
	let schema = schema();

	let result = extract(&store, &schema, "level2", &ExtractOptions::default()).expect("extraction succeeds");

	assert_eq!(result.scene.dependencies, vec!["ExportedScenesData/level2-data.assets".to_owned()]);
	assert!(result.data.dependencies.is_empty());

	let scene_ids: Vec<i64> = result.scene.objects.iter().map(|record| record.local_id).collect();
	assert_eq!(scene_ids, vec![1, 2, 3, 5, 6, 7, 8]);
	let data_ids: Vec<i64> = result.data.objects.iter().map(|record| record.local_id).collect();
	assert_eq!(data_ids, vec![4]);
	assert_eq!(result.data.objects[0].class_id, CLASS_TEXTURE);

	// root game object now carries transform, renderer, origin tracker
	let root = &result.scene.objects[0];
	assert_eq!(&root.data[0..4], &3_i32.to_le_bytes());
	assert_eq!(&root.data[8..16], &2_i64.to_le_bytes());
	assert_eq!(&root.data[20..28], &3_i64.to_le_bytes());
	assert_eq!(&root.data[32..40], &5_i64.to_le_bytes());

	// renderer points at the texture's new local id, file id 0
	let renderer = &result.scene.objects[2];
	assert_eq!(&renderer.data[12..16], &0_i32.to_le_bytes());
	assert_eq!(&renderer.data[16..24], &4_i64.to_le_bytes());

	let type_names: Vec<&str> = result.scene.types.iter().map(|entry| entry.type_name()).collect();
	assert_eq!(type_names, vec!["GameObject", "Transform", "Renderer", "MonoBehaviour", "MonoBehaviour"]);
	assert_eq!(result.scene.types[3].script_index, 0x0000);
	assert_eq!(result.scene.types[4].script_index, 0x0001);

	// scene metadata behaviour: header 32, then "level2" (aligned), used ids, version
	let behaviour = result.scene.objects.last().expect("metadata behaviour exists");
	assert_eq!(behaviour.script_index, 0x0001);
	assert_eq!(&behaviour.data[44..48], &4_i32.to_le_bytes());
	assert_eq!(&behaviour.data[80..84], &1_i32.to_le_bytes());

	assert_eq!(result.sidecar, sidecar_text("level2"));
}

#[test]
fn single_container_output_has_no_dangling_references() {
	let store = build_store();
	let schema = schema();
	let options = ExtractOptions {
		heavy_classes: Vec::new(),
		..ExtractOptions::default()
	};

	let result = extract(&store, &schema, "level2", &options).expect("extraction succeeds");
	assert!(result.data.objects.is_empty());

	let ids: Vec<i64> = result.scene.objects.iter().map(|record| record.local_id).collect();
	for record in &result.scene.objects {
		let descriptor = schema.resolve(record.class_id).expect("class resolves");
		let scan = scan_object(descriptor, &record.data).expect("relocated bytes walk");
		for span in scan.refs {
			if span.is_null() {
				continue;
			}
			assert_eq!(span.file_id, 0);
			assert!(ids.contains(&span.path_id), "dangling local reference {}", span.path_id);
		}
	}
}

#[test]
fn extraction_commits_atomically_to_disk() {
	let store = build_store();
	let schema = schema();
	let result = extract(&store, &schema, "level2", &ExtractOptions::default()).expect("extraction succeeds");

	let root = tempfile::tempdir().expect("tempdir creates");
	let scenes_dir = root.path().join("ExportedScenes");
	let data_dir = root.path().join("ExportedScenesData");

	let paths = write_extraction(&result, &scenes_dir, &data_dir).expect("commit succeeds");
	assert!(paths.scene.ends_with("level2.unity"));
	assert!(paths.data.ends_with("level2-data.assets"));

	let scene = Container::parse(&std::fs::read(&paths.scene).expect("scene reads")).expect("scene parses");
	assert_eq!(scene.objects.len(), result.scene.objects.len());
	let sidecar = std::fs::read_to_string(&paths.sidecar).expect("sidecar reads");
	assert!(sidecar.starts_with("fileFormatVersion: 2\n"));
}

#[test]
fn missing_target_aborts_the_run() {
	// renderer points at a texture absent from the shared file
	let level = build_file(
		"level2",
		&["sharedassets0.assets"],
		&[
			(10, CLASS_GAME_OBJECT, game_object_blob("Player", &[(0, 20), (0, 30)])),
			(20, CLASS_TRANSFORM, transform_blob((0, 10))),
			(30, CLASS_RENDERER, renderer_blob((0, 10), (1, 999))),
		],
	);
	let shared = build_file("sharedassets0.assets", &[], &[(500, CLASS_TEXTURE, texture_blob("atlas", 64, 64))]);

	let mut store = ObjectStore::new();
	store.add_file(level).expect("level adds");
	store.add_file(shared).expect("shared adds");
	let schema = schema();

	assert!(extract(&store, &schema, "level2", &ExtractOptions::default()).is_err());
	assert!(extract(&store, &schema, "level3", &ExtractOptions::default()).is_err());
}

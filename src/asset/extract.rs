use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::asset::Result;
use crate::asset::container::{Container, DEFAULT_ENGINE_VERSION, ObjectRecord};
use crate::asset::crawl::Crawler;
use crate::asset::id::AssetId;
use crate::asset::metadata::{self, CLASS_GAME_OBJECT, CLASS_MONO_BEHAVIOUR, CLASS_TRANSFORM, ORIGIN_TRACKER_SCRIPT, SCENE_METADATA_SCRIPT};
use crate::asset::reloc::relocate;
use crate::asset::schema::ClassIndex;
use crate::asset::sidecar::sidecar_text;
use crate::asset::store::{ObjectStore, SCRIPT_INDEX_NONE};
use crate::asset::typetree::TypeRegistry;

/// Extraction run options.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
	/// Engine version tag written into both container preambles.
	pub engine_version: String,
	/// Class ids routed to the heavy data container.
	pub heavy_classes: Vec<i32>,
	/// Whether to append the synthetic scene metadata objects.
	pub inject_metadata: bool,
}

impl Default for ExtractOptions {
	fn default() -> Self {
		Self {
			engine_version: DEFAULT_ENGINE_VERSION.to_owned(),
			// texture, shader, and audio payloads
			heavy_classes: vec![0x1c, 0x30, 0x53],
			inject_metadata: true,
		}
	}
}

/// Result of one extraction run, not yet committed to disk.
#[derive(Debug)]
pub struct Extraction {
	/// Lightweight scene container (graph and behaviour objects).
	pub scene: Container,
	/// Heavy payload container the scene container depends on.
	pub data: Container,
	/// Sidecar identity text for the scene container.
	pub sidecar: String,
	/// Base name shared by all output files.
	pub base_name: String,
}

/// Paths committed by [`write_extraction`].
#[derive(Debug)]
pub struct ExtractionPaths {
	/// Scene container path.
	pub scene: PathBuf,
	/// Data container path.
	pub data: PathBuf,
	/// Sidecar identity file path.
	pub sidecar: PathBuf,
}

/// Directory name the scene container's data dependency points into.
pub const DATA_DIR_NAME: &str = "ExportedScenesData";

/// Extract the subgraph reachable from a scene file's root game objects.
///
/// Runs the crawl, relocation, and synthesis phases in sequence and
/// returns both containers fully staged in memory; nothing touches disk
/// until [`write_extraction`].
pub fn extract(store: &ObjectStore, schema: &ClassIndex, scene_file: &str, options: &ExtractOptions) -> Result<Extraction> {
	let file = store.file(scene_file)?;
	let base_name = base_name_of(scene_file);

	let roots: Vec<AssetId> = file
		.objects_of_class(CLASS_GAME_OBJECT)
		.map(|info| AssetId::new(file.name.clone(), info.path_id))
		.collect();
	let crawl = Crawler::new(store, schema).crawl(&roots)?;

	let mut scene = Container::new(options.engine_version.clone());
	let mut data = Container::new(options.engine_version.clone());
	scene.dependencies.push(format!("{DATA_DIR_NAME}/{base_name}-data.assets"));

	let mut scene_types = TypeRegistry::new();
	let mut data_types = TypeRegistry::new();
	let mut scene_slots: HashMap<i64, usize> = HashMap::new();

	for (id, local_id) in crawl.map.iter() {
		let src = store.file(&id.file)?;
		let info = *store.resolve(id)?;
		let descriptor = schema.resolve(info.class_id)?;
		let relocated = relocate(src, descriptor, src.object_bytes(&info)?, &crawl.map)?;

		let heavy = options.heavy_classes.contains(&info.class_id);
		let (container, registry) = if heavy {
			(&mut data, &mut data_types)
		} else {
			(&mut scene, &mut scene_types)
		};

		let record = ObjectRecord {
			local_id,
			class_id: info.class_id,
			type_index: registry.index_for_class(descriptor),
			script_index: info.script_index,
			data: relocated,
		};
		if !heavy {
			scene_slots.insert(local_id, container.objects.len());
		}
		container.objects.push(record);
	}

	if options.inject_metadata {
		inject_metadata(&mut scene, &mut scene_types, &scene_slots, schema, &crawl, &roots, &base_name)?;
	}

	scene.types = scene_types.into_entries();
	data.types = data_types.into_entries();

	Ok(Extraction {
		scene,
		data,
		sidecar: sidecar_text(&base_name),
		base_name,
	})
}

/// Append the synthetic bookkeeping objects to the scene container.
///
/// Every root game object gains an origin tracker behaviour recording
/// its pre-extraction identity, and one metadata carrier (game object,
/// transform, behaviour) holds the scene name and the set of local ids
/// the run consumed.
fn inject_metadata(
	scene: &mut Container,
	types: &mut TypeRegistry,
	slots: &HashMap<i64, usize>,
	schema: &ClassIndex,
	crawl: &crate::asset::crawl::CrawlResult,
	roots: &[AssetId],
	base_name: &str,
) -> Result<()> {
	let behaviour_base = schema.resolve(CLASS_MONO_BEHAVIOUR)?;
	let tracker_index = types.insert_entry(metadata::ORIGIN_TRACKER_TYPE, metadata::origin_tracker_entry(behaviour_base)?);
	let metadata_index = types.insert_entry(metadata::SCENE_METADATA_TYPE, metadata::scene_metadata_entry(behaviour_base)?);

	let mut next_local = crawl.map.next_local();
	let mut allocate = || {
		let id = next_local;
		next_local += 1;
		id
	};

	for root in roots {
		let Some(go_local) = crawl.map.get(root) else {
			continue;
		};
		let tracker_local = allocate();

		if let Some(slot) = slots.get(&go_local) {
			let patched = metadata::append_component(&scene.objects[*slot].data, tracker_local)?;
			scene.objects[*slot].data = patched;
		}

		scene.objects.push(ObjectRecord {
			local_id: tracker_local,
			class_id: CLASS_MONO_BEHAVIOUR,
			type_index: tracker_index,
			script_index: ORIGIN_TRACKER_SCRIPT,
			data: metadata::origin_tracker_blob(go_local, root.path_id, go_local as i32),
		});
	}

	let go_local = allocate();
	let tf_local = allocate();
	let mb_local = allocate();
	let used_ids: Vec<i64> = crawl.map.local_ids().collect();

	scene.objects.push(ObjectRecord {
		local_id: go_local,
		class_id: CLASS_GAME_OBJECT,
		type_index: types.index_for_class(schema.resolve(CLASS_GAME_OBJECT)?),
		script_index: SCRIPT_INDEX_NONE,
		data: metadata::metadata_game_object_blob(tf_local, mb_local),
	});
	scene.objects.push(ObjectRecord {
		local_id: tf_local,
		class_id: CLASS_TRANSFORM,
		type_index: types.index_for_class(schema.resolve(CLASS_TRANSFORM)?),
		script_index: SCRIPT_INDEX_NONE,
		data: metadata::metadata_transform_blob(go_local),
	});
	scene.objects.push(ObjectRecord {
		local_id: mb_local,
		class_id: CLASS_MONO_BEHAVIOUR,
		type_index: metadata_index,
		script_index: SCENE_METADATA_SCRIPT,
		data: metadata::scene_metadata_blob(go_local, base_name, &used_ids),
	});

	Ok(())
}

/// Commit an extraction to disk.
///
/// All three outputs are staged into temporary files in their target
/// directories first and persisted only after every write succeeded, so
/// a failed run never leaves a partially-written container behind.
pub fn write_extraction(extraction: &Extraction, scenes_dir: &Path, data_dir: &Path) -> Result<ExtractionPaths> {
	fs::create_dir_all(scenes_dir)?;
	fs::create_dir_all(data_dir)?;

	let paths = ExtractionPaths {
		scene: scenes_dir.join(format!("{}.unity", extraction.base_name)),
		data: data_dir.join(format!("{}-data.assets", extraction.base_name)),
		sidecar: scenes_dir.join(format!("{}.unity.meta", extraction.base_name)),
	};

	let mut staged = [
		stage(scenes_dir, &extraction.scene.to_bytes())?,
		stage(data_dir, &extraction.data.to_bytes())?,
		stage(scenes_dir, extraction.sidecar.as_bytes())?,
	];

	for temp in &mut staged {
		temp.as_file_mut().sync_all()?;
	}
	let [scene_tmp, data_tmp, sidecar_tmp] = staged;
	scene_tmp.persist(&paths.scene).map_err(|err| err.error)?;
	data_tmp.persist(&paths.data).map_err(|err| err.error)?;
	sidecar_tmp.persist(&paths.sidecar).map_err(|err| err.error)?;

	Ok(paths)
}

fn stage(dir: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
	let mut temp = NamedTempFile::new_in(dir)?;
	temp.write_all(bytes)?;
	Ok(temp)
}

fn base_name_of(scene_file: &str) -> String {
	let name = scene_file.rsplit(['/', '\\']).next().unwrap_or(scene_file);
	match name.rsplit_once('.') {
		Some((stem, _)) if !stem.is_empty() => stem.to_owned(),
		_ => name.to_owned(),
	}
}

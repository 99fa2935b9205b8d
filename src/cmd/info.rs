use std::fs;
use std::path::PathBuf;

use scenex::asset::{Container, Result, SCRIPT_INDEX_NONE};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
}

/// Print a high-level summary of one written container.
pub fn run(args: Args) -> Result<()> {
	let Args { path } = args;

	let bytes = fs::read(&path)?;
	let container = Container::parse(&bytes)?;

	let script_objects = container.objects.iter().filter(|record| record.script_index != SCRIPT_INDEX_NONE).count();
	let payload_bytes: usize = container.objects.iter().map(|record| record.data.len()).sum();

	println!("path: {}", path.display());
	println!("engine_version: {}", container.engine_version);
	println!("type_count: {}", container.types.len());
	println!("dependency_count: {}", container.dependencies.len());
	println!("object_count: {}", container.objects.len());
	println!("script_object_count: {script_objects}");
	println!("payload_bytes: {payload_bytes}");

	println!("types:");
	for (index, entry) in container.types.iter().enumerate() {
		println!("  {index}: {} (class {}, {} fields)", entry.type_name(), entry.class_id, entry.fields.len());
	}

	Ok(())
}

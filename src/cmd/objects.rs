use std::fs;
use std::path::PathBuf;

use scenex::asset::{Container, Result};
use serde::Serialize;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

#[derive(Serialize)]
struct ObjectRow {
	local_id: i64,
	class_id: i32,
	type_index: u32,
	script_index: u16,
	size: usize,
}

/// List a container's object records in write order.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let bytes = fs::read(&path)?;
	let container = Container::parse(&bytes)?;

	let rows: Vec<ObjectRow> = container
		.objects
		.iter()
		.map(|record| ObjectRow {
			local_id: record.local_id,
			class_id: record.class_id,
			type_index: record.type_index,
			script_index: record.script_index,
			size: record.data.len(),
		})
		.collect();

	if json {
		println!("{}", serde_json::to_string_pretty(&rows).expect("rows serialize"));
		return Ok(());
	}

	for row in rows {
		println!("{}: class {} type {} script {:#06x} ({} bytes)", row.local_id, row.class_id, row.type_index, row.script_index, row.size);
	}
	Ok(())
}

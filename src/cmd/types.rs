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
struct TypeRow<'a> {
	index: usize,
	class_id: i32,
	script_index: u16,
	type_name: &'a str,
	field_count: usize,
}

/// List a container's embedded type tree entries.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let bytes = fs::read(&path)?;
	let container = Container::parse(&bytes)?;

	let rows: Vec<TypeRow<'_>> = container
		.types
		.iter()
		.enumerate()
		.map(|(index, entry)| TypeRow {
			index,
			class_id: entry.class_id,
			script_index: entry.script_index,
			type_name: entry.type_name(),
			field_count: entry.fields.len(),
		})
		.collect();

	if json {
		println!("{}", serde_json::to_string_pretty(&rows).expect("rows serialize"));
		return Ok(());
	}

	for row in rows {
		println!("{}: {} (class {}, script {:#06x}, {} fields)", row.index, row.type_name, row.class_id, row.script_index, row.field_count);
	}
	Ok(())
}

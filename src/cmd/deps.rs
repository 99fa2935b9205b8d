use std::fs;
use std::path::PathBuf;

use scenex::asset::{Container, Result};

/// Print a container's path-based dependency list.
pub fn run(path: PathBuf) -> Result<()> {
	let bytes = fs::read(&path)?;
	let container = Container::parse(&bytes)?;

	for (index, dep) in container.dependencies.iter().enumerate() {
		println!("{index}: {dep}");
	}
	Ok(())
}

use scenex::asset::{Result, identity_guid};

/// Print the sidecar identity string for a container base name.
pub fn run(name: &str) -> Result<()> {
	println!("{}", identity_guid(name));
	Ok(())
}

/// Sidecar identity file format version.
pub const SIDECAR_FORMAT_VERSION: u32 = 2;

/// Derive the stable identity string for a container base name.
///
/// The identity depends only on the base name, never on file content,
/// so re-extracting the same scene keeps its identity. Truncated to 32
/// hex characters to keep the guid shape the consumer expects.
pub fn identity_guid(base_name: &str) -> String {
	let hash = blake3::hash(base_name.as_bytes());
	hash.to_hex().as_str()[..32].to_owned()
}

/// Render the sidecar identity text block for a container base name.
pub fn sidecar_text(base_name: &str) -> String {
	let guid = identity_guid(base_name);
	format!(
		"fileFormatVersion: {SIDECAR_FORMAT_VERSION}\n\
		guid: {guid}\n\
		DefaultImporter:\n\
		  externalObjects: {{}}\n\
		  userData: \n\
		  assetBundleName: \n\
		  assetBundleVariant: \n"
	)
}

#[cfg(test)]
mod tests {
	use super::{identity_guid, sidecar_text};

	#[test]
	fn guid_is_deterministic_and_name_sensitive() {
		let a = identity_guid("level2");
		let b = identity_guid("level2");
		let c = identity_guid("level3");

		assert_eq!(a, b);
		assert_ne!(a, c);
		assert_eq!(a.len(), 32);
		assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
	}

	#[test]
	fn sidecar_block_carries_version_and_guid() {
		let text = sidecar_text("level2");
		assert!(text.starts_with("fileFormatVersion: 2\n"));
		assert!(text.contains(&format!("guid: {}\n", identity_guid("level2"))));
	}
}

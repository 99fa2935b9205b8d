use crate::asset::id::{AssetId, IdentityMap};
use crate::asset::schema::ClassDescriptor;
use crate::asset::store::SourceFile;
use crate::asset::walk::scan_object;
use crate::asset::{AssetError, Result};

/// Rewrite every embedded reference in an object's bytes to local ids.
///
/// Each non-null `(file_id, path_id)` pair becomes `(0, local_id)`,
/// where file id `0` denotes "local to this container" in the output
/// format. Null references stay untouched. A non-null reference absent
/// from the map means the crawler's field walk missed a field, which is
/// an invariant violation and is refused rather than silently zeroed.
pub fn relocate(file: &SourceFile, descriptor: &ClassDescriptor, bytes: &[u8], map: &IdentityMap) -> Result<Vec<u8>> {
	let scan = scan_object(descriptor, bytes)?;
	let mut out = bytes.to_vec();

	for span in scan.refs {
		if span.is_null() {
			continue;
		}

		let target = AssetId::new(file.target_file(span.file_id)?, span.path_id);
		let local = map.get(&target).ok_or(AssetError::Unrelocated {
			file: target.file.to_string(),
			path_id: target.path_id,
		})?;

		out[span.offset..span.offset + 4].copy_from_slice(&0_i32.to_le_bytes());
		out[span.offset + 4..span.offset + 12].copy_from_slice(&local.to_le_bytes());
	}

	Ok(out)
}

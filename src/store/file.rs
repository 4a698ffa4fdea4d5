//! JSON file helpers with atomic replacement.

// std
use std::{
	fs::{self, File},
	io::{ErrorKind, Write},
	path::Path,
};
// self
use crate::{_prelude::*, error::StoreError};

/// Reads and decodes `path`; a missing or empty file yields `None`.
pub fn read_json<T>(path: &Path) -> Result<Option<T>, StoreError>
where
	T: DeserializeOwned,
{
	let bytes = match fs::read(path) {
		Ok(bytes) => bytes,
		Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
		Err(e) =>
			return Err(StoreError::Backend {
				message: format!("Failed to read {}: {e}", path.display()),
			}),
	};

	if bytes.iter().all(u8::is_ascii_whitespace) {
		return Ok(None);
	}

	serde_json::from_slice(&bytes).map(Some).map_err(|e| StoreError::Serialization {
		message: format!("Failed to parse {}: {e}", path.display()),
	})
}

/// Writes `value` as pretty JSON through a sibling temp file and a rename.
pub fn write_json_atomic<T>(path: &Path, value: &T) -> Result<(), StoreError>
where
	T: ?Sized + Serialize,
{
	ensure_parent_exists(path)?;

	let serialized = serde_json::to_vec_pretty(value).map_err(|e| StoreError::Serialization {
		message: format!("Failed to serialize {}: {e}", path.display()),
	})?;
	let tmp_path = path.with_extension("tmp");

	{
		let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
			message: format!("Failed to create {}: {e}", tmp_path.display()),
		})?;

		file.write_all(&serialized).map_err(|e| StoreError::Backend {
			message: format!("Failed to write {}: {e}", tmp_path.display()),
		})?;
		file.sync_all().map_err(|e| StoreError::Backend {
			message: format!("Failed to sync {}: {e}", tmp_path.display()),
		})?;
	}

	fs::rename(&tmp_path, path).map_err(|e| StoreError::Backend {
		message: format!("Failed to replace {}: {e}", path.display()),
	})
}

fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
			message: format!("Failed to create directory {}: {e}", parent.display()),
		})?;
	}

	Ok(())
}

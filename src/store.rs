//! On-disk home for persisted credentials and concurrency tags.
//!
//! Layout under the home directory:
//!
//! - `config.json`: [`Credentials`] (`tenant_id`, `client_id`, `client_secret`, `scopes`).
//! - `cache.json`: `{"eTags": {<resource url>: <tag>}}`.

pub mod file;

// std
use std::path::{Path, PathBuf};
// self
use crate::{_prelude::*, auth::Credentials, error::StoreError};

const ENV_HOME_DIR: &str = "MS_GRAPH_HOME_DIR";
const HOME_DIR_NAME: &str = ".ms-graph";
const CONFIG_FILE: &str = "config.json";
const CACHE_FILE: &str = "cache.json";

/// Persisted tag cache document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheFile {
	/// Resource URL to concurrency tag.
	#[serde(rename = "eTags", default)]
	pub etags: HashMap<String, String>,
}

/// Directory holding `config.json` and `cache.json`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphHome {
	dir: PathBuf,
}
impl GraphHome {
	/// Uses `dir` as the home directory.
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	/// Resolves `$MS_GRAPH_HOME_DIR`, falling back to `~/.ms-graph`.
	pub fn from_env() -> Result<Self, StoreError> {
		if let Some(dir) = std::env::var_os(ENV_HOME_DIR).filter(|dir| !dir.is_empty()) {
			return Ok(Self::new(dir));
		}

		dirs::home_dir().map(|home| Self::new(home.join(HOME_DIR_NAME))).ok_or_else(|| {
			StoreError::Backend { message: "Failed to locate the user's home directory".into() }
		})
	}

	/// Home directory path.
	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Path of the credentials file.
	pub fn config_path(&self) -> PathBuf {
		self.dir.join(CONFIG_FILE)
	}

	/// Path of the tag cache file.
	pub fn cache_path(&self) -> PathBuf {
		self.dir.join(CACHE_FILE)
	}

	/// Loads persisted credentials; `None` when the file does not exist or is empty.
	pub fn load_credentials(&self) -> Result<Option<Credentials>, StoreError> {
		file::read_json(&self.config_path())
	}

	/// Replaces the persisted credentials.
	pub fn save_credentials(&self, credentials: &Credentials) -> Result<(), StoreError> {
		file::write_json_atomic(&self.config_path(), credentials)
	}

	/// Loads persisted tags; empty when the file does not exist.
	pub fn load_tags(&self) -> Result<HashMap<String, String>, StoreError> {
		Ok(file::read_json::<CacheFile>(&self.cache_path())?.unwrap_or_default().etags)
	}

	/// Replaces the persisted tags.
	pub fn save_tags(&self, etags: HashMap<String, String>) -> Result<(), StoreError> {
		file::write_json_atomic(&self.cache_path(), &CacheFile { etags })
	}
}

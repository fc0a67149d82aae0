//! Durable storage for the single tracked region.
//!
//! The record is a JSON object `{"region": [x, y, width, height]}`. A missing
//! record means "no prior region" and is not an error.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::tracker::Region;

/// Record location used when none is given.
pub const DEFAULT_RECORD_PATH: &str = "searched.json";

/// On-disk shape of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionRecord {
    #[serde(alias = "roi")]
    pub region: [i32; 4],
}

impl From<Region> for RegionRecord {
    fn from(region: Region) -> Self {
        Self {
            region: region.to_tlwh(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegionStore {
    path: PathBuf,
}

impl Default for RegionStore {
    fn default() -> Self {
        Self::new(DEFAULT_RECORD_PATH)
    }
}

impl RegionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved region. `Ok(None)` if there is no record.
    pub fn load(&self) -> Result<Option<Region>, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Unreadable {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let corrupt = |reason: String| StoreError::Corrupt {
            path: self.path.clone(),
            reason,
        };
        let record: RegionRecord =
            serde_json::from_str(&data).map_err(|err| corrupt(err.to_string()))?;
        let region = Region::try_from(record.region).map_err(|err| corrupt(err.to_string()))?;

        info!("Loaded region {region} from {}", self.path.display());
        Ok(Some(region))
    }

    /// Replace the record with `region`.
    ///
    /// The data goes to a sibling temporary file first and is renamed over the
    /// record, so a reader sees either the old or the new record, never a partial one.
    pub fn save(&self, region: Region) -> Result<(), StoreError> {
        let write_err = |source: io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let json = serde_json::to_string(&RegionRecord::from(region))
            .map_err(|err| write_err(err.into()))?;

        let tmp_path = self.tmp_path();
        let result = (|| {
            let mut file = File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        })();
        if let Err(err) = result {
            let _ = fs::remove_file(&tmp_path);
            return Err(write_err(err));
        }

        info!("Saved region {region} to {}", self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_RECORD_PATH.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fresh empty directory under the system temp dir.
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("roi-track-store-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_record_is_absent() {
        let dir = scratch_dir("missing");
        let store = RegionStore::new(dir.join("searched.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_round_trip() {
        let dir = scratch_dir("round-trip");
        let store = RegionStore::new(dir.join("searched.json"));
        for region in [
            Region::new(10, 10, 50, 50).unwrap(),
            Region::new(-3, 7, 1, 200).unwrap(),
        ] {
            store.save(region).unwrap();
            assert_eq!(store.load().unwrap(), Some(region));
        }
        assert!(!dir.join("searched.json.tmp").exists());
    }

    #[test]
    fn test_record_format() {
        let dir = scratch_dir("format");
        let store = RegionStore::new(dir.join("searched.json"));
        store.save(Region::new(1, 2, 3, 4).unwrap()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({ "region": [1, 2, 3, 4] }));
    }

    #[test]
    fn test_accepts_legacy_key() {
        let dir = scratch_dir("legacy");
        let store = RegionStore::new(dir.join("searched.json"));
        fs::write(store.path(), r#"{"roi": [5, 5, 20, 20]}"#).unwrap();
        assert_eq!(store.load().unwrap(), Some(Region::new(5, 5, 20, 20).unwrap()));
    }

    #[test]
    fn test_corrupt_records() {
        let dir = scratch_dir("corrupt");
        let store = RegionStore::new(dir.join("searched.json"));
        for data in [
            r#"{"region": [5, 5, 0, 20]}"#,
            r#"{"region": [5, 5, 20, -1]}"#,
            r#"{"region": [2147483600, 0, 100, 10]}"#,
            r#"{"region": [0, 2147483647, 10, 1]}"#,
            r#"{"region": [5, 5, 20]}"#,
            r#"{"region": [5, 5, 20, 20, 1]}"#,
            r#"{"region": [5.5, 5, 20, 20]}"#,
            r#"{"other": [5, 5, 20, 20]}"#,
            r#"{}"#,
            "",
            "not json",
        ] {
            fs::write(store.path(), data).unwrap();
            assert!(
                matches!(store.load(), Err(StoreError::Corrupt { .. })),
                "expected corrupt for {data:?}"
            );
        }
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = scratch_dir("no-dir");
        let store = RegionStore::new(dir.join("missing").join("searched.json"));
        assert!(matches!(
            store.save(Region::new(0, 0, 1, 1).unwrap()),
            Err(StoreError::Write { .. })
        ));
    }
}

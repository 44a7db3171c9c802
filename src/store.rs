//! Analysis record persistence.
//!
//! One JSON document per identifier under `<data_dir>/analyses/`. Records
//! are never deleted. There is no cross-request locking: two concurrent
//! first-views of the same identifier both recompute and the second write
//! wins.

use crate::params::AnalysisParameters;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt record {id}: {source}")]
    Corrupt {
        id: Uuid,
        source: serde_json::Error,
    },

    #[error("record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub struct AnalysisStore {
    root: PathBuf,
}

impl AnalysisStore {
    /// Open (and create if needed) the store directory.
    pub fn open(data_dir: &std::path::Path) -> Result<Self, StoreError> {
        let root = data_dir.join("analyses");
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn record_path(&self, id: &Uuid) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    /// Write a record, overwriting any existing document for the id.
    pub fn save(&self, params: &AnalysisParameters) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(params)?;
        fs::write(self.record_path(&params.id), body)?;
        Ok(())
    }

    pub fn get(&self, id: &Uuid) -> Result<Option<AnalysisParameters>, StoreError> {
        let path = self.record_path(id);
        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let params = serde_json::from_str(&contents)
            .map_err(|source| StoreError::Corrupt { id: *id, source })?;
        Ok(Some(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::AnalysisRequest;

    fn temp_store() -> (AnalysisStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("windsite_store_{}", Uuid::new_v4()));
        let store = AnalysisStore::open(&dir).unwrap();
        (store, dir)
    }

    #[test]
    fn save_then_get_round_trips() {
        let (store, dir) = temp_store();
        let params = AnalysisParameters::new(AnalysisRequest::default());
        store.save(&params).unwrap();

        let loaded = store.get(&params.id).unwrap().unwrap();
        assert_eq!(loaded.id, params.id);
        assert_eq!(loaded.latitude, params.latitude);
        assert!(!loaded.is_complete());

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn missing_record_is_none() {
        let (store, dir) = temp_store();
        assert!(store.get(&Uuid::new_v4()).unwrap().is_none());
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn save_overwrites_in_place() {
        let (store, dir) = temp_store();
        let mut params = AnalysisParameters::new(AnalysisRequest::default());
        store.save(&params).unwrap();

        params.mean_suitability = Some(61.25);
        params.suitability_map = Some("/static/maps/x/map.html".to_string());
        store.save(&params).unwrap();

        let loaded = store.get(&params.id).unwrap().unwrap();
        assert_eq!(loaded.mean_suitability, Some(61.25));
        assert!(loaded.is_complete());

        fs::remove_dir_all(dir).ok();
    }
}

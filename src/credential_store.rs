// =============================================================================
// Credential store — file-backed persistence with atomic save
// =============================================================================
//
// The client itself never persists credentials; the binary composes the store
// and the client. Saves use the tmp + rename pattern so a crash mid-write
// cannot leave a corrupt record behind.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::credentials::Credentials;

/// Receipt returned by [`CredentialStore::save`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: Uuid,
    pub saved_at: DateTime<Utc>,
}

/// On-disk representation: the record metadata plus the credentials.
#[derive(Debug, Serialize, Deserialize)]
struct StoredCredentials {
    id: Uuid,
    saved_at: DateTime<Utc>,
    credentials: Credentials,
}

/// File-backed credential store.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored credentials, if any.
    ///
    /// A missing file is not an error: it simply means nothing has been saved
    /// yet.
    pub fn load(&self) -> Result<Option<Credentials>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no stored credentials");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read credentials from {}", self.path.display()))?;

        let record: StoredCredentials = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse credentials from {}", self.path.display()))?;

        debug!(id = %record.id, saved_at = %record.saved_at, "credentials loaded");
        Ok(Some(record.credentials))
    }

    /// Persist `credentials`, replacing any existing record.
    pub fn save(&self, credentials: &Credentials) -> Result<StoredRecord> {
        let record = StoredCredentials {
            id: Uuid::new_v4(),
            saved_at: Utc::now(),
            credentials: credentials.clone(),
        };

        let content = serde_json::to_string_pretty(&record)
            .context("failed to serialise credentials to JSON")?;

        // Atomic write: tmp sibling first, then rename over the target.
        let tmp_path = self.path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp credentials to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("failed to rename tmp credentials to {}", self.path.display()))?;

        info!(path = %self.path.display(), id = %record.id, "credentials saved");
        Ok(StoredRecord {
            id: record.id,
            saved_at: record.saved_at,
        })
    }

    /// Delete the stored record. Deleting a store that holds nothing is a
    /// no-op.
    pub fn delete(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).with_context(|| {
                format!("failed to delete credentials at {}", self.path.display())
            })?;
            info!(path = %self.path.display(), "credentials deleted");
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_store() -> CredentialStore {
        let path = std::env::temp_dir().join(format!("meridian-creds-{}.json", Uuid::new_v4()));
        CredentialStore::new(path)
    }

    fn sample_credentials() -> Credentials {
        Credentials::new(
            "a1b2c3d4-e5f6-7890-abcd-ef1234567890",
            "a-long-enough-secret-key",
            "my-passphrase",
        )
    }

    #[test]
    fn load_missing_file_returns_none() {
        let store = scratch_store();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let store = scratch_store();
        let creds = sample_credentials();

        let record = store.save(&creds).unwrap();
        let loaded = store.load().unwrap().expect("should have credentials");

        assert_eq!(loaded.api_key, creds.api_key);
        assert_eq!(loaded.secret_key, creds.secret_key);
        assert_eq!(loaded.passphrase, creds.passphrase);
        assert!(!record.id.is_nil());

        store.delete().unwrap();
    }

    #[test]
    fn save_replaces_previous_record() {
        let store = scratch_store();
        let mut creds = sample_credentials();

        let first = store.save(&creds).unwrap();
        creds.passphrase = "rotated".to_string();
        let second = store.save(&creds).unwrap();

        assert_ne!(first.id, second.id);
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.passphrase, "rotated");

        store.delete().unwrap();
    }

    #[test]
    fn delete_then_load_returns_none() {
        let store = scratch_store();
        store.save(&sample_credentials()).unwrap();
        store.delete().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn delete_on_empty_store_is_ok() {
        let store = scratch_store();
        assert!(store.delete().is_ok());
    }
}

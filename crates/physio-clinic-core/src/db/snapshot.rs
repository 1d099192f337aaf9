//! Whole-snapshot load and save with single-slot auto-backup.
//!
//! ```text
//! load:  primary ──ok──▶ migrate ──▶ Database
//!          │ absent/corrupt
//!          ▼
//!        auto-backup ──ok──▶ migrate, restore as primary ──▶ Database
//!          │ absent/corrupt
//!          ▼
//!        seed, write as primary ──▶ Database
//!
//! save:  previous primary ──▶ auto-backup {timestamp, data}
//!        new snapshot     ──▶ primary            (one transaction)
//! ```
//!
//! Corrupt content is never reported to the caller; only SQLite failures are.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::{
    decode_snapshot, decode_value, get_value, put_value, Keyspace, Store, StoreResult,
    AUTO_BACKUP_KEY, SNAPSHOT_KEY,
};
use crate::models::Database;

/// The auto-backup envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutoBackup {
    /// When the backup was taken (ISO-8601)
    pub timestamp: String,
    /// The snapshot that was primary at that moment
    pub data: Value,
}

impl Store {
    /// Load the clinic snapshot, recovering or seeding as needed.
    pub fn load(&mut self) -> StoreResult<Database> {
        match self.get(Keyspace::Local, SNAPSHOT_KEY)? {
            Some(raw) => match decode_snapshot(&raw) {
                Ok((db, _)) => {
                    self.fingerprint = Some(fingerprint(&raw));
                    return Ok(db);
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "stored snapshot is unreadable, checking auto-backup"
                    )
                }
            },
            None => tracing::debug!("no stored snapshot, checking auto-backup"),
        }

        if let Some(db) = self.recover_from_auto_backup()? {
            return Ok(db);
        }

        let db = Database::seed();
        let raw = serde_json::to_string(&db)?;
        self.set(Keyspace::Local, SNAPSHOT_KEY, &raw)?;
        self.fingerprint = Some(fingerprint(&raw));
        tracing::info!("seeded a fresh clinic database");
        Ok(db)
    }

    /// Persist `db`, first moving the current primary into the auto-backup slot.
    pub fn save(&mut self, db: &Database) -> StoreResult<()> {
        let raw = serde_json::to_string(db)?;
        let previous = self.get(Keyspace::Local, SNAPSHOT_KEY)?;

        if let (Some(previous), Some(seen)) = (&previous, &self.fingerprint) {
            if fingerprint(previous) != *seen {
                tracing::warn!("snapshot was modified by another writer; overwriting it");
            }
        }

        let tx = self.conn.transaction()?;
        if let Some(previous) = previous {
            match serde_json::from_str::<Value>(&previous) {
                Ok(data) => {
                    let envelope = AutoBackup {
                        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                        data,
                    };
                    put_value(
                        &tx,
                        Keyspace::Local,
                        AUTO_BACKUP_KEY,
                        &serde_json::to_string(&envelope)?,
                    )?;
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "previous snapshot is unreadable, auto-backup kept as is"
                    )
                }
            }
        }
        put_value(&tx, Keyspace::Local, SNAPSHOT_KEY, &raw)?;
        tx.commit()?;

        self.fingerprint = Some(fingerprint(&raw));
        Ok(())
    }

    /// Overwrite the primary snapshot with `raw` exactly as given.
    ///
    /// No migration and no auto-backup; the next [`load`](Self::load)
    /// migrates it.
    pub fn replace_snapshot(&mut self, raw: &str) -> StoreResult<()> {
        self.set(Keyspace::Local, SNAPSHOT_KEY, raw)?;
        self.fingerprint = Some(fingerprint(raw));
        Ok(())
    }

    /// Raw primary snapshot, if any.
    pub fn raw_snapshot(&self) -> StoreResult<Option<String>> {
        get_value(&self.conn, Keyspace::Local, SNAPSHOT_KEY)
    }

    /// The current auto-backup, if present and readable.
    pub fn auto_backup(&self) -> StoreResult<Option<AutoBackup>> {
        Ok(self
            .get(Keyspace::Local, AUTO_BACKUP_KEY)?
            .and_then(|raw| serde_json::from_str(&raw).ok()))
    }

    /// SHA-256 of the snapshot this store last read or wrote.
    pub fn snapshot_fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    fn recover_from_auto_backup(&mut self) -> StoreResult<Option<Database>> {
        let Some(raw) = self.get(Keyspace::Local, AUTO_BACKUP_KEY)? else {
            return Ok(None);
        };

        let backup = match serde_json::from_str::<AutoBackup>(&raw) {
            Ok(backup) => backup,
            Err(e) => {
                tracing::warn!(error = %e, "auto-backup is unreadable");
                return Ok(None);
            }
        };

        let data = serde_json::to_string(&backup.data)?;
        match decode_value(backup.data) {
            Ok((db, _)) => {
                tracing::info!(taken_at = %backup.timestamp, "restored snapshot from auto-backup");
                self.set(Keyspace::Local, SNAPSHOT_KEY, &data)?;
                self.fingerprint = Some(fingerprint(&data));
                Ok(Some(db))
            }
            Err(e) => {
                tracing::warn!(error = %e, "auto-backup does not hold a usable snapshot");
                Ok(None)
            }
        }
    }
}

fn fingerprint(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewGroup;

    fn setup_store() -> Store {
        Store::open_in_memory().unwrap()
    }

    #[test]
    fn test_first_load_seeds_and_persists() {
        let mut store = setup_store();
        let db = store.load().unwrap();

        assert_eq!(db.statuses.len(), 2);
        assert_eq!(db.settings.len(), 1);
        assert!(store.raw_snapshot().unwrap().is_some());
        // Seeding writes directly; there was nothing to back up.
        assert!(store.auto_backup().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = setup_store();
        let mut db = store.load().unwrap();
        db.add_group(NewGroup::named("Neck"));
        store.save(&db).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, db);
    }

    #[test]
    fn test_save_backs_up_previous_snapshot_only() {
        let mut store = setup_store();
        let mut db = store.load().unwrap();

        db.add_group(NewGroup::named("First"));
        store.save(&db).unwrap();
        db.add_group(NewGroup::named("Second"));
        store.save(&db).unwrap();

        let backup = store.auto_backup().unwrap().unwrap();
        let groups = backup.data["groups"].as_array().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0]["name"], "First");
    }

    #[test]
    fn test_corrupt_snapshot_recovers_from_auto_backup() {
        let mut store = setup_store();
        let mut db = store.load().unwrap();
        db.add_group(NewGroup::named("Kept"));
        store.save(&db).unwrap();
        db.add_group(NewGroup::named("Lost"));
        store.save(&db).unwrap();

        store
            .set(Keyspace::Local, SNAPSHOT_KEY, "{definitely not json")
            .unwrap();

        let recovered = store.load().unwrap();
        assert_eq!(recovered.groups.len(), 1);
        assert_eq!(recovered.groups[0].name, "Kept");

        // The restored snapshot is primary again.
        let raw = store.raw_snapshot().unwrap().unwrap();
        assert!(raw.contains("Kept"));
    }

    #[test]
    fn test_corrupt_snapshot_and_backup_reseeds() {
        let mut store = setup_store();
        store
            .set(Keyspace::Local, SNAPSHOT_KEY, "{definitely not json")
            .unwrap();
        store
            .set(Keyspace::Local, AUTO_BACKUP_KEY, "also broken")
            .unwrap();

        let db = store.load().unwrap();
        assert_eq!(db.statuses.len(), 2);
        assert!(db.groups.is_empty());
    }

    #[test]
    fn test_missing_snapshot_uses_auto_backup() {
        let mut store = setup_store();
        let mut db = store.load().unwrap();
        db.add_group(NewGroup::named("Saved"));
        store.save(&db).unwrap();
        store.save(&db).unwrap();
        store.remove(Keyspace::Local, SNAPSHOT_KEY).unwrap();

        let recovered = store.load().unwrap();
        assert_eq!(recovered.groups.len(), 1);
    }

    #[test]
    fn test_load_heals_available() {
        let mut store = setup_store();
        let mut db = store.load().unwrap();
        let group = db.add_group(NewGroup::named("Drifted").with_capacity(5));
        db.group_mut(&group).unwrap().available = 99;
        store.save(&db).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.group(&group).unwrap().available, 5);
    }

    #[test]
    fn test_fingerprint_tracks_writes() {
        let mut store = setup_store();
        let db = store.load().unwrap();
        let first = store.snapshot_fingerprint().unwrap().to_string();

        store.save(&db).unwrap();
        assert_eq!(store.snapshot_fingerprint().unwrap(), first);

        store.replace_snapshot("{}").unwrap();
        assert_ne!(store.snapshot_fingerprint().unwrap(), first);
    }
}

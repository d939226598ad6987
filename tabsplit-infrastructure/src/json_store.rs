use std::{fs, io, path::PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use tabsplit_application::{LedgerState, LedgerStore, StoreError};
use tabsplit_domain::{Person, Purchase};

use crate::records::{CountersRecord, PersonRecord, PurchaseRecord};

const PERSONS_KEY: &str = "persons";
const PURCHASES_KEY: &str = "purchases";
const COUNTERS_KEY: &str = "counters";

/// Key-value store with one JSON document per key inside a directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn read_key<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>, StoreError> {
        let path = self.key_path(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|err| StoreError::Corrupt {
                key,
                detail: err.to_string(),
            })
    }

    fn write_key<T: Serialize>(&self, key: &'static str, value: &T) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(value).map_err(|err| StoreError::Corrupt {
            key,
            detail: err.to_string(),
        })?;

        let path = self.key_path(key);
        let tmp_path = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp_path, content).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &path).map_err(|source| StoreError::Io { path, source })
    }
}

impl LedgerStore for JsonFileStore {
    fn load(&self) -> Result<Option<LedgerState>, StoreError> {
        let Some(persons) = self.read_key::<Vec<PersonRecord>>(PERSONS_KEY)? else {
            return Ok(None);
        };
        let purchases = self
            .read_key::<Vec<PurchaseRecord>>(PURCHASES_KEY)?
            .unwrap_or_default();
        let counters = self
            .read_key::<CountersRecord>(COUNTERS_KEY)?
            .unwrap_or_default();

        let purchases = purchases
            .into_iter()
            .map(Purchase::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| {
                tracing::error!(error = %err, dir = %self.dir.display(), "Stored purchase rejected");
                StoreError::Corrupt {
                    key: PURCHASES_KEY,
                    detail: err.to_string(),
                }
            })?;

        tracing::debug!(
            dir = %self.dir.display(),
            person_count = persons.len(),
            purchase_count = purchases.len(),
            "Loaded ledger"
        );

        Ok(Some(LedgerState {
            persons: persons.into_iter().map(Person::from).collect(),
            purchases,
            next_person_id: counters.next_person_id,
            next_purchase_id: counters.next_purchase_id,
        }))
    }

    fn save(&self, state: &LedgerState) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let persons: Vec<PersonRecord> = state.persons.iter().map(PersonRecord::from).collect();
        let purchases: Vec<PurchaseRecord> =
            state.purchases.iter().map(PurchaseRecord::from).collect();
        let counters = CountersRecord {
            next_person_id: state.next_person_id,
            next_purchase_id: state.next_purchase_id,
        };

        self.write_key(PURCHASES_KEY, &purchases)?;
        self.write_key(COUNTERS_KEY, &counters)?;
        // Written last: its presence marks the ledger as stored.
        self.write_key(PERSONS_KEY, &persons)?;

        tracing::debug!(dir = %self.dir.display(), "Saved ledger");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tabsplit_domain::{Money, PersonId, PurchaseId};
    use tempfile::TempDir;

    #[fixture]
    fn dir() -> TempDir {
        tempfile::tempdir().expect("temp dir")
    }

    fn sample_state() -> LedgerState {
        LedgerState {
            persons: vec![
                Person::new(PersonId(1), "Ana"),
                Person::new(PersonId(3), "Carla"),
            ],
            purchases: vec![
                Purchase::try_new(
                    PurchaseId(2),
                    "market",
                    Money::new(9990, 2),
                    PersonId(1),
                    [PersonId(3)],
                )
                .expect("valid purchase"),
            ],
            next_person_id: 4,
            next_purchase_id: 3,
        }
    }

    #[rstest]
    fn empty_directory_has_nothing_stored(dir: TempDir) {
        let store = JsonFileStore::new(dir.path());
        assert_eq!(store.load().expect("load succeeds"), None);
    }

    #[rstest]
    fn save_then_load_restores_state(dir: TempDir) {
        let store = JsonFileStore::new(dir.path().join("nested"));
        let state = sample_state();

        store.save(&state).expect("save succeeds");

        assert_eq!(store.load().expect("load succeeds"), Some(state));
        assert!(!dir.path().join("nested/.persons.json.tmp").exists());
    }

    #[rstest]
    fn each_key_is_its_own_document(dir: TempDir) {
        let store = JsonFileStore::new(dir.path());
        store.save(&sample_state()).expect("save succeeds");

        let persons = fs::read_to_string(dir.path().join("persons.json")).expect("persons key");
        let persons: serde_json::Value = serde_json::from_str(&persons).expect("valid json");
        assert_eq!(
            persons,
            serde_json::json!([{ "id": 1, "name": "Ana" }, { "id": 3, "name": "Carla" }])
        );
        assert!(dir.path().join("purchases.json").exists());
        assert!(dir.path().join("counters.json").exists());
    }

    #[rstest]
    fn loads_data_written_without_counters(dir: TempDir) {
        fs::write(
            dir.path().join("persons.json"),
            r#"[{"id":1,"name":"Ana"},{"id":2,"name":"Bruno"}]"#,
        )
        .expect("write persons");
        fs::write(
            dir.path().join("purchases.json"),
            r#"[{"id":1,"item":"bread","price":6,"buyer":{"id":1,"name":"Ana"},"participants":[{"id":2,"name":"Bruno"}]}]"#,
        )
        .expect("write purchases");

        let state = JsonFileStore::new(dir.path())
            .load()
            .expect("load succeeds")
            .expect("state stored");

        assert_eq!(state.persons.len(), 2);
        assert_eq!(state.purchases[0].price(), Money::from_i64(6));
        assert_eq!(state.next_person_id, 0);
    }

    #[rstest]
    #[case::malformed_json(r#"[{"id":1"#)]
    #[case::invalid_purchase(r#"[{"id":1,"item":"x","price":"0","buyer":1,"participants":[]}]"#)]
    fn corrupt_purchases_are_reported(dir: TempDir, #[case] raw: &str) {
        fs::write(dir.path().join("persons.json"), "[]").expect("write persons");
        fs::write(dir.path().join("purchases.json"), raw).expect("write purchases");

        let result = JsonFileStore::new(dir.path()).load();

        assert!(matches!(
            result,
            Err(StoreError::Corrupt {
                key: PURCHASES_KEY,
                ..
            })
        ));
    }
}

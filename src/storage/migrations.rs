use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::storage::StorageError;

type MigrationFn = fn(Value) -> Result<Value, StorageError>;

fn get_migrations() -> Vec<MigrationFn> {
    vec![migrate_v1_to_v2]
}

/// Returns 1 if version field is missing: a bare export of the project
/// documents, with no accounts or session.
pub fn detect_version(content: &str) -> Result<u32, StorageError> {
    let value: Value = serde_json::from_str(content).map_err(|e| StorageError::ParseFailed {
        path: PathBuf::from("<unknown>"),
        source: e,
    })?;

    match value.get("version") {
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| StorageError::InvalidVersion(v.to_string())),
        None => Ok(1),
    }
}

/// Migrations are applied sequentially: v1→v2→v3→...→target
pub fn apply_migrations(
    mut data: Value,
    from_version: u32,
    to_version: u32,
) -> Result<Value, StorageError> {
    if from_version == to_version {
        return Ok(data);
    }

    if from_version > to_version {
        return Err(StorageError::FutureVersion(from_version));
    }

    // Versions start at 1
    if from_version == 0 {
        return Err(StorageError::UnsupportedVersion(0));
    }

    let migrations = get_migrations();

    for version in from_version..to_version {
        let migration_idx = (version - 1) as usize; // v1→v2 is at index 0

        if migration_idx >= migrations.len() {
            return Err(StorageError::UnsupportedVersion(version));
        }

        data = migrations[migration_idx](data)?;
    }

    Ok(data)
}

/// v1 exports hold only project documents, either keyed by id or as a list
/// of documents carrying their own `id`. v2 keys them by id and adds the
/// account list and session slot.
fn migrate_v1_to_v2(mut value: Value) -> Result<Value, StorageError> {
    let Some(obj) = value.as_object_mut() else {
        return Err(StorageError::MigrationFailed {
            from: 1,
            reason: String::from("top-level value is not an object"),
        });
    };

    let projects = match obj.remove("projects") {
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(Value::Object(map)) => Value::Object(map),
        Some(Value::Array(list)) => {
            let mut map = Map::new();
            for mut document in list {
                let id = document
                    .as_object_mut()
                    .and_then(|d| d.remove("id"))
                    .and_then(|id| id.as_str().map(String::from))
                    .ok_or_else(|| StorageError::MigrationFailed {
                        from: 1,
                        reason: String::from("project document without a string 'id'"),
                    })?;
                map.insert(id, document);
            }
            Value::Object(map)
        }
        Some(other) => {
            return Err(StorageError::MigrationFailed {
                from: 1,
                reason: format!("'projects' has unexpected shape: {other}"),
            });
        }
    };

    obj.insert("version".to_string(), Value::from(2));
    obj.insert("projects".to_string(), projects);
    obj.entry("accounts").or_insert_with(|| Value::Array(vec![]));
    obj.entry("session").or_insert(Value::Null);

    Ok(value)
}

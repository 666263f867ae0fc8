use crate::{DataError, FamilySnapshot};
use std::path::PathBuf;

/// Storage seam. Implementations return the complete data set on every call;
/// callers never cache or diff between calls.
pub trait FamilySource {
    fn load_snapshot(&self) -> Result<FamilySnapshot, DataError>;
}

/// Reads a JSON snapshot from disk on every load.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl FamilySource for JsonFileSource {
    fn load_snapshot(&self) -> Result<FamilySnapshot, DataError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| DataError::Io {
            path: self.path.clone(),
            source,
        })?;
        FamilySnapshot::from_json(&content)
    }
}

/// Serves a snapshot held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    snapshot: FamilySnapshot,
}

impl MemorySource {
    pub fn new(snapshot: FamilySnapshot) -> Self {
        Self { snapshot }
    }

    pub fn replace(&mut self, snapshot: FamilySnapshot) {
        self.snapshot = snapshot;
    }
}

impl FamilySource for MemorySource {
    fn load_snapshot(&self) -> Result<FamilySnapshot, DataError> {
        Ok(self.snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Gender, Person, PersonId};

    #[test]
    fn test_json_file_source_reloads_each_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("family.json");

        let mut snapshot = FamilySnapshot::default();
        snapshot
            .people
            .push(Person::founder(PersonId(1), "First", Gender::Male));
        std::fs::write(&path, snapshot.to_json().unwrap()).unwrap();

        let source = JsonFileSource::new(&path);
        assert_eq!(source.load_snapshot().unwrap().people.len(), 1);

        snapshot
            .people
            .push(Person::founder(PersonId(2), "Second", Gender::Female));
        std::fs::write(&path, snapshot.to_json().unwrap()).unwrap();
        assert_eq!(source.load_snapshot().unwrap().people.len(), 2);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let source = JsonFileSource::new("/definitely/not/here.json");
        assert!(matches!(
            source.load_snapshot(),
            Err(DataError::Io { .. })
        ));
    }
}

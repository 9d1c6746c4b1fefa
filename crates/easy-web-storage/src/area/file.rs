use std::{
    borrow::Cow,
    fs, io,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::{AreaKind, AreaResolver, MemoryStorage, StorageArea};
use crate::errors::AreaError;

/// Directory-backed storage area. Each key is one file named by the percent-encoded key.
#[derive(Clone, Debug)]
pub struct FileStorage<'a> {
    path: Cow<'a, Path>,
}

impl<'a> FileStorage<'a> {
    pub fn new<P>(path: P) -> Self
    where
        P: Into<Cow<'a, Path>>,
    {
        FileStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.path.join(urlencoding::encode(key).into_owned())
    }
}

impl StorageArea for FileStorage<'_> {
    fn get_item(&self, key: &str) -> Result<Option<String>, AreaError> {
        match fs::read_to_string(self.entry_path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), AreaError> {
        fs::create_dir_all(&self.path)?;
        let path = self.entry_path(key);
        debug!(path = %path.display(), "writing storage entry");
        fs::write(path, value)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), AreaError> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Resolves the local area to a directory under `root` and the session area to memory that lives as
/// long as this resolver.
#[derive(Clone, Debug)]
pub struct DirectoryAreas {
    root: PathBuf,
    session: MemoryStorage,
}

impl DirectoryAreas {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        DirectoryAreas { root: root.into(), session: MemoryStorage::new() }
    }

    pub fn local_path(&self) -> PathBuf {
        self.root.join("local")
    }
}

impl AreaResolver for DirectoryAreas {
    fn resolve(&self, kind: AreaKind) -> Result<Box<dyn StorageArea>, AreaError> {
        match kind {
            AreaKind::Local => {
                let path = self.local_path();
                if path.exists() && !path.is_dir() {
                    return Err(AreaError::Unavailable(format!("{} is not a directory", path.display())));
                }
                debug!(path = %path.display(), "resolved directory storage area");
                Ok(Box::new(FileStorage::new(path)))
            }
            AreaKind::Session => Ok(Box::new(self.session.clone())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{DirectoryAreas, FileStorage};
    use crate::{
        area::{AreaKind, AreaResolver, StorageArea},
        errors::AreaError,
    };

    #[test]
    fn when_item_is_written_then_it_is_read_back_from_disk() {
        let dir = tempfile::tempdir().expect("creating temp dir should be successful");
        let storage = FileStorage::new(dir.path().join("local"));

        storage.set_item("user/profile", "{\"name\":\"a\"}").expect("setting item should be successful");

        assert!(dir.path().join("local").join("user%2Fprofile").exists());
        let reopened = FileStorage::new(dir.path().join("local"));
        assert_eq!(reopened.get_item("user/profile").unwrap().as_deref(), Some("{\"name\":\"a\"}"));
    }

    #[test]
    fn when_key_was_never_written_then_get_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        assert_eq!(storage.get_item("missing").unwrap(), None);
    }

    #[test]
    fn when_removing_missing_key_then_remove_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.set_item("k", "1").unwrap();

        storage.remove_item("k").expect("removing existing key should be successful");
        storage.remove_item("k").expect("removing missing key should be successful");
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn when_local_path_is_a_file_then_resolve_returns_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("local"), "not a directory").unwrap();
        let areas = DirectoryAreas::new(dir.path());

        assert!(matches!(areas.resolve(AreaKind::Local), Err(AreaError::Unavailable(_))));
        assert!(areas.resolve(AreaKind::Session).is_ok());
    }

    #[test]
    fn when_session_is_resolved_twice_then_both_share_entries() {
        let dir = tempfile::tempdir().unwrap();
        let areas = DirectoryAreas::new(dir.path());

        areas.resolve(AreaKind::Session).unwrap().set_item("k", "1").unwrap();

        assert_eq!(areas.resolve(AreaKind::Session).unwrap().get_item("k").unwrap().as_deref(), Some("1"));
        assert!(!areas.local_path().exists());
    }
}

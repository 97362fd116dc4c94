use std::error::Error;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::KeyValueStore;

/// A storage that keeps every key in its own file, inside a given folder
#[derive(Clone, Debug, PartialEq)]
pub struct FolderStorage {
    backing_folder: PathBuf,
}

impl FolderStorage {
    /// Use `folder` as a backing folder. It will be created when the first key is written
    pub fn new(folder: &Path) -> Self {
        Self { backing_folder: PathBuf::from(folder) }
    }

    pub fn folder(&self) -> &Path {
        &self.backing_folder
    }

    /// The file that backs a given key
    fn key_file(&self, key: &str) -> PathBuf {
        let file_name = sanitize_filename::sanitize(key) + ".json";
        self.backing_folder.join(file_name)
    }
}

impl KeyValueStore for FolderStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let path = self.key_file(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(format!("Unable to read file {:?}: {}", path, err).into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        if let Err(err) = std::fs::create_dir_all(&self.backing_folder) {
            return Err(format!("Unable to create folder {:?}: {}", self.backing_folder, err).into());
        }
        let path = self.key_file(key);
        log::trace!("Writing {} bytes to {:?}", value.len(), path);
        match std::fs::write(&path, value) {
            Ok(()) => Ok(()),
            Err(err) => Err(format!("Unable to save file {:?}: {}", path, err).into()),
        }
    }

    fn remove(&self, key: &str) -> Result<(), Box<dyn Error>> {
        let path = self.key_file(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(format!("Unable to remove file {:?}: {}", path, err).into()),
        }
    }
}

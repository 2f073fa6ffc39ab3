//! Platform capability
//!
//! Physical folder/file primitives the file backing store is built on.

use std::fmt::Debug;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Folder and file primitives of the host platform
///
/// Every call is a single physical operation; retry and fallback logic
/// (open-or-create, delete-then-recreate) lives in the callers.
pub trait Platform: Send + Sync + 'static {
    /// Handle to an opened folder
    type Folder: Clone + Debug + Send + Sync;

    /// Handle to an opened file
    type File: Debug + Send;

    /// The root folder everything else lives under
    fn root(&self) -> Self::Folder;

    /// Open an existing subfolder
    fn open_folder(&self, parent: &Self::Folder, name: &str) -> io::Result<Self::Folder>;

    /// Create a new, empty subfolder
    fn create_folder(&self, parent: &Self::Folder, name: &str) -> io::Result<Self::Folder>;

    /// Delete a folder and everything in it
    fn delete_folder(&self, folder: &Self::Folder) -> io::Result<()>;

    /// Names of the files directly inside `folder`
    fn list_files(&self, folder: &Self::Folder) -> io::Result<Vec<String>>;

    /// Open an existing file
    fn open_file(&self, folder: &Self::Folder, name: &str) -> io::Result<Self::File>;

    /// Create a new, empty file
    fn create_file(&self, folder: &Self::Folder, name: &str) -> io::Result<Self::File>;

    /// Read a file's full content as UTF-8 text
    fn read_text(&self, file: &Self::File) -> io::Result<String>;

    /// Replace a file's content with `text`
    fn write_text(&self, file: &Self::File, text: &str) -> io::Result<()>;

    /// Delete a file
    fn delete_file(&self, file: Self::File) -> io::Result<()>;
}

/// `std::fs` platform rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalDisk {
    root: PathBuf,
}

impl LocalDisk {
    /// Use `root` as the root folder, creating it if needed
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Root directory path
    pub fn root_dir(&self) -> &Path {
        &self.root
    }

    fn not_found(path: &Path) -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
    }
}

impl Platform for LocalDisk {
    type Folder = PathBuf;
    type File = PathBuf;

    fn root(&self) -> PathBuf {
        self.root.clone()
    }

    fn open_folder(&self, parent: &PathBuf, name: &str) -> io::Result<PathBuf> {
        let path = parent.join(name);
        if fs::metadata(&path)?.is_dir() {
            Ok(path)
        } else {
            Err(Self::not_found(&path))
        }
    }

    fn create_folder(&self, parent: &PathBuf, name: &str) -> io::Result<PathBuf> {
        let path = parent.join(name);
        fs::create_dir(&path)?;
        Ok(path)
    }

    fn delete_folder(&self, folder: &PathBuf) -> io::Result<()> {
        fs::remove_dir_all(folder)
    }

    fn list_files(&self, folder: &PathBuf) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(folder)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            // Non UTF-8 names can't have come from the key codec
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn open_file(&self, folder: &PathBuf, name: &str) -> io::Result<PathBuf> {
        let path = folder.join(name);
        if fs::metadata(&path)?.is_file() {
            Ok(path)
        } else {
            Err(Self::not_found(&path))
        }
    }

    fn create_file(&self, folder: &PathBuf, name: &str) -> io::Result<PathBuf> {
        let path = folder.join(name);
        OpenOptions::new().write(true).create_new(true).open(&path)?;
        Ok(path)
    }

    fn read_text(&self, file: &PathBuf) -> io::Result<String> {
        fs::read_to_string(file)
    }

    fn write_text(&self, file: &PathBuf, text: &str) -> io::Result<()> {
        fs::write(file, text)
    }

    fn delete_file(&self, file: PathBuf) -> io::Result<()> {
        fs::remove_file(file)
    }
}

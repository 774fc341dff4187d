use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::EnhanceResult;
use crate::hierarchy::ClassBytesProvider;

// ---------------------------------------------------------------------------
// JarFile
// ---------------------------------------------------------------------------

/// In-memory, read-only view of a JAR (ZIP) archive.
///
/// Entries are stored as a `BTreeMap<String, Vec<u8>>` mapping entry paths to
/// raw bytes, so lookups never go back to the archive.
#[derive(Clone, Debug, Default)]
pub struct JarFile {
    entries: BTreeMap<String, Vec<u8>>,
}

impl JarFile {
    /// Read a JAR from any reader.
    pub fn read<R: Read + Seek>(reader: R) -> EnhanceResult<Self> {
        let mut archive = zip::ZipArchive::new(reader)?;
        let mut entries = BTreeMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            entries.insert(name, data);
        }

        Ok(JarFile { entries })
    }

    /// Read a JAR from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> EnhanceResult<Self> {
        Self::read(Cursor::new(bytes))
    }

    /// Read a JAR from a file path.
    pub fn open(path: impl AsRef<Path>) -> EnhanceResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::read(std::io::BufReader::new(file))
    }

    /// Iterate over all entry paths (sorted).
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    /// Iterate over `.class` entry paths only.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.entry_names().filter(|n| n.ends_with(".class"))
    }

    pub fn get_entry(&self, path: &str) -> Option<&[u8]> {
        self.entries.get(path).map(|v| v.as_slice())
    }

    pub fn contains_entry(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }
}

// ---------------------------------------------------------------------------
// ClassPath
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub enum ClassPathEntry {
    Directory(PathBuf),
    Jar(JarFile),
}

/// Ordered class path used to read supertypes. The first entry holding a
/// class wins, as with a class loader's search order.
#[derive(Clone, Debug, Default)]
pub struct ClassPath {
    entries: Vec<ClassPathEntry>,
}

impl ClassPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.entries.push(ClassPathEntry::Directory(dir.into()));
        self
    }

    /// Load a jar into memory and append it.
    pub fn add_jar(&mut self, path: impl AsRef<Path>) -> EnhanceResult<&mut Self> {
        let jar = JarFile::open(path)?;
        self.entries.push(ClassPathEntry::Jar(jar));
        Ok(self)
    }

    pub fn add_jar_bytes(&mut self, bytes: &[u8]) -> EnhanceResult<&mut Self> {
        let jar = JarFile::from_bytes(bytes)?;
        self.entries.push(ClassPathEntry::Jar(jar));
        Ok(self)
    }

    pub fn entries(&self) -> &[ClassPathEntry] {
        &self.entries
    }

    /// Bytes of `<internal_name>.class` from the first entry that has it.
    pub fn find_class(&self, internal_name: &str) -> Option<Vec<u8>> {
        let resource = format!("{internal_name}.class");
        self.entries.iter().find_map(|entry| match entry {
            ClassPathEntry::Directory(dir) => read_file(&dir.join(&resource)),
            ClassPathEntry::Jar(jar) => jar.get_entry(&resource).map(<[u8]>::to_vec),
        })
    }
}

fn read_file(path: &Path) -> Option<Vec<u8>> {
    if !path.is_file() {
        return None;
    }
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            debug!("unable to read {}: {e}", path.display());
            None
        }
    }
}

impl ClassBytesProvider for ClassPath {
    fn class_bytes(&self, internal_name: &str) -> Option<Vec<u8>> {
        self.find_class(internal_name)
    }
}

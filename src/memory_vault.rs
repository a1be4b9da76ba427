//! An in-memory vault
//!
//! This is mostly useful for tests and demos, or for hosts that already keep their notes in memory.
//! It can also be told to fail some reads, to check how failures are handled.

use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::front_matter::FrontMatter;
use crate::note::NoteFile;
use crate::traits::{ContentReader, FileIndex, LinkResolver, MetadataIndex, NoteFactory, ResourceLocator};
use crate::utils::normalize_path;

const RESOURCE_ROOT: &str = "app://local/";

#[derive(Clone, Debug, Default)]
struct StoredFile {
    front_matter: Option<FrontMatter>,
    content: String,
}

/// The JSON description of a vault, see [`MemoryVault::from_fixture`]
#[derive(Debug, Default, Deserialize)]
struct Fixture {
    #[serde(default)]
    notes: Vec<FixtureNote>,
    /// Attachments (images...), that have no content
    #[serde(default)]
    files: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct FixtureNote {
    path: String,
    #[serde(default)]
    front_matter: Option<Value>,
    #[serde(default)]
    content: String,
}

/// A vault whose files only live in memory
#[derive(Debug, Default)]
pub struct MemoryVault {
    files: Mutex<BTreeMap<String, StoredFile>>,
    failing_reads: Mutex<HashSet<String>>,
    metadata_lookups: AtomicUsize,
    content_reads: AtomicUsize,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vault from a JSON document such as
    /// `{"notes": [{"path": "2024-03-05.md", "front_matter": {"image": "[[a.png]]"}, "content": "..."}], "files": ["a.png"]}`
    pub fn from_fixture(json: &str) -> Result<Self, Box<dyn Error>> {
        let fixture: Fixture = serde_json::from_str(json)?;
        let vault = Self::new();
        for path in fixture.files {
            vault.add_file(&path);
        }
        for note in fixture.notes {
            match note.front_matter {
                Some(front_matter) => vault.add_note_with_front_matter(&note.path, front_matter, &note.content),
                None => vault.add_note(&note.path, &note.content),
            }
        }
        Ok(vault)
    }

    pub fn from_fixture_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let json = match std::fs::read_to_string(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(json) => json,
        };
        Self::from_fixture(&json)
    }

    fn files(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, StoredFile>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a file that is not a note (e.g. an image)
    pub fn add_file(&self, path: &str) {
        self.files().insert(normalize_path(path), StoredFile::default());
    }

    pub fn add_note(&self, path: &str, content: &str) {
        let file = StoredFile { front_matter: None, content: content.to_string() };
        self.files().insert(normalize_path(path), file);
    }

    /// Add a note. Front matter that is not a JSON object is ignored
    pub fn add_note_with_front_matter(&self, path: &str, front_matter: Value, content: &str) {
        let file = StoredFile { front_matter: FrontMatter::from_value(front_matter), content: content.to_string() };
        self.files().insert(normalize_path(path), file);
    }

    /// Replace the front matter of an existing note
    pub fn set_front_matter(&self, path: &str, front_matter: Value) {
        if let Some(file) = self.files().get_mut(&normalize_path(path)) {
            file.front_matter = FrontMatter::from_value(front_matter);
        }
    }

    pub fn set_content(&self, path: &str, content: &str) {
        if let Some(file) = self.files().get_mut(&normalize_path(path)) {
            file.content = content.to_string();
        }
    }

    pub fn remove(&self, path: &str) -> bool {
        self.files().remove(&normalize_path(path)).is_some()
    }

    pub fn rename(&self, old_path: &str, new_path: &str) -> bool {
        let mut files = self.files();
        match files.remove(&normalize_path(old_path)) {
            None => false,
            Some(file) => {
                files.insert(normalize_path(new_path), file);
                true
            },
        }
    }

    /// Make every future read of this path fail
    pub fn fail_reads_for(&self, path: &str) {
        self.failing_reads.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(normalize_path(path));
    }

    /// How many times front matter has been requested
    pub fn metadata_lookups(&self) -> usize {
        self.metadata_lookups.load(Ordering::SeqCst)
    }

    /// How many times a content has been read
    pub fn content_reads(&self) -> usize {
        self.content_reads.load(Ordering::SeqCst)
    }

    fn read_now(&self, file: &NoteFile) -> Result<String, Box<dyn Error>> {
        self.content_reads.fetch_add(1, Ordering::SeqCst);
        let is_failing = self.failing_reads.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(file.path());
        if is_failing {
            return Err(format!("Mocked behaviour requires reading {} to fail", file).into());
        }

        match self.files().get(file.path()) {
            None => Err(format!("No file at {}", file).into()),
            Some(stored) => Ok(stored.content.clone()),
        }
    }
}

impl FileIndex for MemoryVault {
    fn find_file_by_path(&self, path: &str) -> Option<NoteFile> {
        let files = self.files();
        files.get_key_value(path).map(|(path, _)| NoteFile::new(path.clone()))
    }

    fn list_all_note_files(&self) -> Vec<NoteFile> {
        self.files().keys()
            .map(|path| NoteFile::new(path.clone()))
            .filter(|file| file.is_markdown())
            .collect()
    }
}

impl MetadataIndex for MemoryVault {
    fn front_matter(&self, file: &NoteFile) -> Option<FrontMatter> {
        self.metadata_lookups.fetch_add(1, Ordering::SeqCst);
        self.files().get(file.path())?.front_matter.clone()
    }
}

impl LinkResolver for MemoryVault {
    /// Resolves a link the way the host does: a link with a folder must match the end of a path,
    /// otherwise any file with this name matches, preferring the folder of the linking note.
    /// The `.md` extension can be omitted.
    fn resolve_link(&self, link_text: &str, from_path: &str) -> Option<NoteFile> {
        let link = normalize_path(link_text);
        if link.is_empty() {
            return None;
        }
        let source_folder = NoteFile::new(from_path).parent().to_string();
        let with_md = format!("{}.md", link);

        let candidates: Vec<NoteFile> = self.files().keys()
            .filter(|path| {
                [&link, &with_md].iter().any(|wanted| {
                    *path == *wanted || path.ends_with(&format!("/{}", wanted))
                })
            })
            .map(|path| NoteFile::new(path.clone()))
            .collect();

        candidates.iter()
            .find(|file| file.parent() == source_folder)
            .or_else(|| candidates.first())
            .cloned()
    }
}

impl ResourceLocator for MemoryVault {
    fn to_resource_locator(&self, file: &NoteFile) -> String {
        match Url::parse(RESOURCE_ROOT).and_then(|root| root.join(file.path())) {
            Ok(url) => url.to_string(),
            Err(err) => {
                log::warn!("Unable to build a resource URL for {}: {}", file, err);
                format!("{}{}", RESOURCE_ROOT, file.path())
            }
        }
    }
}

#[async_trait]
impl ContentReader for MemoryVault {
    async fn read_content(&self, file: &NoteFile) -> Result<String, Box<dyn Error>> {
        self.read_now(file)
    }
}

#[async_trait]
impl NoteFactory for MemoryVault {
    async fn create_note(&self, path: &str, template: Option<&str>) -> Result<NoteFile, Box<dyn Error>> {
        let path = normalize_path(path);
        if self.find_file_by_path(&path).is_some() {
            return Err(format!("A file already exists at {}", path).into());
        }

        let content = match template.and_then(|t| self.find_file_by_path(&normalize_path(t))) {
            Some(template) => self.read_now(&template)?,
            None => String::new(),
        };
        self.add_note(&path, &content);
        Ok(NoteFile::new(path))
    }
}

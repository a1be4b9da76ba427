//! The services this crate expects from the host application

use std::error::Error;

use async_trait::async_trait;

use crate::front_matter::FrontMatter;
use crate::note::NoteFile;

/// Lookup of files by path
pub trait FileIndex {
    /// Returns the file at this exact (normalized) path, if any
    fn find_file_by_path(&self, path: &str) -> Option<NoteFile>;
    /// Returns every markdown note of the vault
    fn list_all_note_files(&self) -> Vec<NoteFile>;
}

pub trait MetadataIndex {
    /// Returns the parsed front matter of a note, or `None` if it has none
    fn front_matter(&self, file: &NoteFile) -> Option<FrontMatter>;
}

pub trait LinkResolver {
    /// Resolves the target of a `[[link]]` written in the note at `from_path`
    fn resolve_link(&self, link_text: &str, from_path: &str) -> Option<NoteFile>;
}

pub trait ResourceLocator {
    /// Returns an opaque string the rendering layer can use to display this file
    fn to_resource_locator(&self, file: &NoteFile) -> String;
}

#[async_trait]
pub trait ContentReader {
    /// Reads the latest saved content of a note.
    /// This may fail, e.g. in case the file has been removed in the meantime
    async fn read_content(&self, file: &NoteFile) -> Result<String, Box<dyn Error>>;
}

/// Everything a vault provides.
///
/// This is automatically implemented for every type that implements the individual traits.
pub trait Vault: FileIndex + MetadataIndex + LinkResolver + ResourceLocator + ContentReader + Send + Sync {}

impl<T> Vault for T
where
    T: FileIndex + MetadataIndex + LinkResolver + ResourceLocator + ContentReader + Send + Sync,
{}


/// The part of the host UI that displays notes and talks to the user
#[async_trait]
pub trait Workspace {
    /// Opens a note, in a new leaf if `new_leaf` is true
    async fn open_note(&self, file: &NoteFile, new_leaf: bool) -> Result<(), Box<dyn Error>>;
    /// Asks the user a yes/no question. Returns true if the user agreed
    async fn confirm(&self, title: &str, message: &str) -> bool;
    /// Shows a transient notice
    fn notify(&self, message: &str);
}

/// Creates periodic notes
#[async_trait]
pub trait NoteFactory {
    /// Creates a note at `path`, possibly pre-filled from the `template` note, and returns it
    async fn create_note(&self, path: &str, template: Option<&str>) -> Result<NoteFile, Box<dyn Error>>;
}

//! Handles to files of the vault

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Just a wrapper around the vault-relative path of a file
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteFile {
    path: String,
}

impl NoteFile {
    pub fn new<S: Into<String>>(path: S) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str { &self.path }

    /// The file name, including its extension
    pub fn name(&self) -> &str {
        match self.path.rfind('/') {
            Some(pos) => &self.path[pos + 1..],
            None => &self.path,
        }
    }

    /// The file name, without its extension
    pub fn basename(&self) -> &str {
        let name = self.name();
        match name.rfind('.') {
            Some(pos) if pos > 0 => &name[..pos],
            _ => name,
        }
    }

    /// The extension, without the dot, or an empty string
    pub fn extension(&self) -> &str {
        let name = self.name();
        match name.rfind('.') {
            Some(pos) if pos > 0 => &name[pos + 1..],
            _ => "",
        }
    }

    /// The folder this file is in (an empty string for the vault root)
    pub fn parent(&self) -> &str {
        match self.path.rfind('/') {
            Some(pos) => &self.path[..pos],
            None => "",
        }
    }

    pub fn is_markdown(&self) -> bool {
        self.extension().eq_ignore_ascii_case("md")
    }
}

impl Display for NoteFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}

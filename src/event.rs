//! Changes of the vault, as notified by the host

use std::fmt::{Display, Error, Formatter};

/// Something that happened to a file of the vault.
///
/// The host delivers these one at a time, in the order they happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VaultEvent {
    Created(String),
    Modified(String),
    Deleted(String),
    Renamed { old_path: String, new_path: String },
}

impl VaultEvent {
    /// The paths whose cached data is outdated after this event
    pub fn affected_paths(&self) -> Vec<&str> {
        match self {
            VaultEvent::Created(path) | VaultEvent::Modified(path) | VaultEvent::Deleted(path) => vec![path.as_str()],
            VaultEvent::Renamed { old_path, new_path } => vec![old_path.as_str(), new_path.as_str()],
        }
    }
}

impl Display for VaultEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            VaultEvent::Created(path) => write!(f, "{} created", path),
            VaultEvent::Modified(path) => write!(f, "{} modified", path),
            VaultEvent::Deleted(path) => write!(f, "{} deleted", path),
            VaultEvent::Renamed { old_path, new_path } => write!(f, "{} renamed to {}", old_path, new_path),
        }
    }
}

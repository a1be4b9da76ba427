//! Some utility functions

use crate::metadata::DayMetadata;

/// Turn a user-provided path into the canonical form the vault uses for its keys
///
/// Backslashes become slashes, repeated slashes are collapsed, leading and trailing slashes are removed,
/// and non-breaking spaces become regular spaces.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    let mut last_was_separator = false;
    for c in path.chars() {
        let c = match c {
            '\\' => '/',
            '\u{00A0}' | '\u{202F}' => ' ',
            other => other,
        };
        if c == '/' {
            if last_was_separator == false {
                normalized.push('/');
            }
            last_was_separator = true;
        } else {
            normalized.push(c);
            last_was_separator = false;
        }
    }
    normalized.trim_matches('/').to_string()
}

/// Whether `path` is `folder` itself or lives somewhere below it.
///
/// An empty folder stands for the vault root, which contains everything.
pub fn is_in_folder(path: &str, folder: &str) -> bool {
    let folder = normalize_path(folder);
    if folder.is_empty() {
        return true;
    }
    let path = normalize_path(path);
    path == folder || (path.starts_with(&folder) && path[folder.len()..].starts_with('/'))
}

/// A debug utility that pretty-prints the metadata of a day
pub fn print_day_metadata(label: &str, metadata: &DayMetadata) {
    let dots: String = metadata.dots().iter()
        .map(|dot| if dot.filled { '●' } else { '○' })
        .collect();
    println!("    {}\t{:<20}\t{}", label, metadata.class_names().join(" "), dots);
}

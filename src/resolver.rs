//! Turns a raw photo reference into something the renderer can display

use once_cell::sync::Lazy;
use regex::Regex;

use crate::traits::{FileIndex, LinkResolver, ResourceLocator};
use crate::utils::normalize_path;

static WIKILINK_RE: Lazy<Option<Regex>> = Lazy::new(|| {
    match Regex::new(r"\[\[([^\]]+)\]\]") {
        Ok(re) => Some(re),
        Err(err) => {
            log::error!("Invalid wikilink pattern: {}", err);
            None
        }
    }
});

/// Returns the link path of the first `[[wikilink]]` in `value`, without its `|alias` part
pub fn wikilink_target(value: &str) -> Option<&str> {
    let inner = WIKILINK_RE.as_ref()?.captures(value)?.get(1)?.as_str();
    let target = match inner.find('|') {
        Some(pos) => &inner[..pos],
        None => inner,
    };
    Some(target.trim())
}

fn is_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Resolves photo references (wikilinks, URLs, vault paths) against a vault
pub struct ImageResolver<'v, V: ?Sized> {
    vault: &'v V,
}

impl<'v, V> ImageResolver<'v, V>
where
    V: FileIndex + LinkResolver + ResourceLocator + ?Sized,
{
    pub fn new(vault: &'v V) -> Self {
        Self { vault }
    }

    /// Resolve `raw`, found in the note at `source_path`.
    ///
    /// This never fails: when the reference points to nothing, `raw` is returned unchanged.
    pub fn resolve(&self, raw: &str, source_path: &str) -> String {
        if let Some(target) = wikilink_target(raw) {
            match self.vault.resolve_link(target, source_path) {
                Some(file) => return self.vault.to_resource_locator(&file),
                None => log::debug!("Unresolved wikilink {:?} in {}", raw, source_path),
            }
        }

        if is_url(raw) {
            return raw.to_string();
        }

        match self.vault.find_file_by_path(&normalize_path(raw)) {
            Some(file) => self.vault.to_resource_locator(&file),
            None => {
                log::debug!("No file at {:?} (referenced by {}), keeping the raw value", raw, source_path);
                raw.to_string()
            }
        }
    }
}

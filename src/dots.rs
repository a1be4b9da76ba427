//! Word-count "activity dots"

use std::error::Error;

use serde::Serialize;

use crate::note::NoteFile;
use crate::settings::Settings;
use crate::traits::ContentReader;

/// A day never shows more dots than this
pub const NUM_MAX_DOTS: usize = 5;

/// A small mark drawn under a day
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dot {
    pub filled: bool,
    pub color_tag: String,
}

impl Default for Dot {
    fn default() -> Self {
        Self { filled: true, color_tag: "default".to_string() }
    }
}

/// Number of whitespace-separated words
pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

/// Quantize a word count into dots: one dot per full `words_per_dot` words, at most [`NUM_MAX_DOTS`].
///
/// A note with fewer than `words_per_dot` words gets no dot, and so does every note when `words_per_dot` is zero or less.
pub fn dots_for_word_count(word_count: usize, words_per_dot: i64) -> Vec<Dot> {
    if words_per_dot <= 0 || word_count == 0 {
        return Vec::new();
    }

    let n_dots = (word_count as u64 / words_per_dot as u64) as usize;
    if n_dots == 0 {
        return Vec::new();
    }
    vec![Dot::default(); n_dots.min(NUM_MAX_DOTS)]
}

/// Reads notes to compute their dots. This holds no cache.
pub struct DotQuantizer<'v, V: ?Sized> {
    reader: &'v V,
}

impl<'v, V: ContentReader + ?Sized> DotQuantizer<'v, V> {
    pub fn new(reader: &'v V) -> Self {
        Self { reader }
    }

    /// Returns the dots of a note, reading its current content
    pub async fn dots_for(&self, file: &NoteFile, settings: &Settings) -> Result<Vec<Dot>, Box<dyn Error>> {
        if settings.words_per_dot <= 0 {
            return Ok(Vec::new());
        }

        let content = self.reader.read_content(file).await?;
        let words = word_count(&content);
        log::trace!("{} has {} words", file, words);
        Ok(dots_for_word_count(words, settings.words_per_dot))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_vault::MemoryVault;

    #[test]
    fn counting_words() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("  \n\t "), 0);
        assert_eq!(word_count("one"), 1);
        assert_eq!(word_count("  one two\n\nthree\tfour  "), 4);
    }

    #[test]
    fn quantization() {
        assert!(dots_for_word_count(0, 250).is_empty());
        assert!(dots_for_word_count(1, 250).is_empty());
        assert!(dots_for_word_count(249, 250).is_empty());
        assert_eq!(dots_for_word_count(250, 250).len(), 1);
        assert_eq!(dots_for_word_count(500, 250).len(), 2);
        assert_eq!(dots_for_word_count(1249, 250).len(), 4);
        assert_eq!(dots_for_word_count(10000, 250).len(), NUM_MAX_DOTS);
    }

    #[test]
    fn disabled_quantization() {
        assert!(dots_for_word_count(10000, 0).is_empty());
        assert!(dots_for_word_count(10000, -3).is_empty());
    }

    #[tokio::test]
    async fn dots_from_content() {
        let vault = MemoryVault::new();
        vault.add_note("long.md", &"word ".repeat(600));
        vault.add_note("empty.md", "   ");
        vault.add_note("short.md", "just a few words");
        let quantizer = DotQuantizer::new(&vault);
        let settings = Settings::default();

        let dots = quantizer.dots_for(&NoteFile::new("long.md"), &settings).await.unwrap();
        assert_eq!(dots, vec![Dot { filled: true, color_tag: "default".to_string() }; 2]);
        assert!(quantizer.dots_for(&NoteFile::new("empty.md"), &settings).await.unwrap().is_empty());
        assert!(quantizer.dots_for(&NoteFile::new("short.md"), &settings).await.unwrap().is_empty());
        assert!(quantizer.dots_for(&NoteFile::new("missing.md"), &settings).await.is_err());

        let disabled = Settings { words_per_dot: 0, ..Settings::default() };
        let reads = vault.content_reads();
        assert!(quantizer.dots_for(&NoteFile::new("long.md"), &disabled).await.unwrap().is_empty());
        assert_eq!(vault.content_reads(), reads);
    }
}

//! This crate computes what a calendar view of a note vault displays for every day and week.
//!
//! For each period, a [`CalendarSource`] tells whether a periodic (daily or weekly) note exists, whether this note has a photo,
//! and how many "dots" its word count is worth. Photos replace dots, unless photos are hidden.
//!
//! Photos are read from the front matter of notes (see [`front_matter`]), resolved to something displayable (see [`resolver`]),
//! and memoized in a [`PhotoCache`] that is invalidated when the host reports file changes.
//!
//! This crate does not access any file by itself: everything goes through the host services described in [`traits`].
//! A [`MemoryVault`](memory_vault::MemoryVault) implements them in memory. \
//! A [`PhotoCalendar`] wires everything together for the lifetime of a plugin.

pub mod traits;

pub mod settings;
pub use settings::Settings;
mod note;
pub use note::NoteFile;
pub mod event;
pub use event::VaultEvent;

pub mod front_matter;
pub mod resolver;
pub mod cache;
pub use cache::{CachedPhoto, PhotoCache};
pub mod dots;
pub use dots::Dot;
pub mod metadata;
pub use metadata::{ClassTags, DayMetadata};
pub mod date_format;
pub mod periodic;
pub mod source;
pub use source::CalendarSource;

pub mod refresh;
pub mod navigation;
pub mod plugin;
pub use plugin::PhotoCalendar;

pub mod memory_vault;
pub mod utils;

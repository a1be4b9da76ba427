//! What happens when the user clicks on a day or a week of the calendar

use chrono::NaiveDate;

use crate::date_format::start_of_week;
use crate::note::NoteFile;
use crate::periodic::Granularity;
use crate::source::CalendarSource;
use crate::traits::{NoteFactory, Vault, Workspace};

/// The result of a click on the calendar
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The note already existed and has been opened
    Opened(NoteFile),
    /// The note has just been created, and opened
    Created(NoteFile),
    /// There was no note, and none has been created
    Declined,
    /// Something went wrong. The user has already been notified
    Failed,
}

/// Opens (or creates) the periodic notes the user clicks on
pub struct Navigator<'a, V: ?Sized, W, F> {
    source: &'a CalendarSource<V>,
    workspace: &'a W,
    factory: &'a F,
}

impl<'a, V, W, F> Navigator<'a, V, W, F>
where
    V: Vault + ?Sized,
    W: Workspace + Sync,
    F: NoteFactory + Sync,
{
    pub fn new(source: &'a CalendarSource<V>, workspace: &'a W, factory: &'a F) -> Self {
        Self { source, workspace, factory }
    }

    /// Open the daily note of `date`. If there is none, it is created only if `create_if_missing` is set
    pub async fn open_daily(&self, date: NaiveDate, create_if_missing: bool) -> NavigationOutcome {
        let notes = self.source.periodic_notes(Granularity::Day);
        if let Some(note) = notes.note_for(date) {
            return self.open_existing(note, false).await;
        }
        if create_if_missing == false {
            return NavigationOutcome::Declined;
        }

        let question = format!("Do you want to create a new note for {}?", date.format("%Y-%m-%d"));
        let path = notes.note_path(date);
        let template = notes.config().template.clone();
        self.create_and_open("Create new note", &question, &path, template.as_deref(), false, "daily").await
    }

    /// Open the weekly note of the week `date` is in, creating it if needed
    pub async fn open_weekly(&self, date: NaiveDate, new_leaf: bool) -> NavigationOutcome {
        let week_start = start_of_week(date, self.source.settings().week_start);
        let notes = self.source.periodic_notes(Granularity::Week);
        if let Some(note) = notes.note_for(week_start) {
            return self.open_existing(note, new_leaf).await;
        }

        let question = format!("Do you want to create a new weekly note for week starting {}?", week_start.format("%Y-%m-%d"));
        let path = notes.note_path(week_start);
        let template = notes.config().template.clone();
        self.create_and_open("Create new weekly note", &question, &path, template.as_deref(), new_leaf, "weekly").await
    }

    /// The note to preview when the user hovers a day
    pub fn hover_target(&self, date: NaiveDate) -> Option<String> {
        self.source.periodic_notes(Granularity::Day)
            .note_for(date)
            .map(|note| note.path().to_string())
    }

    async fn open_existing(&self, note: NoteFile, new_leaf: bool) -> NavigationOutcome {
        match self.workspace.open_note(&note, new_leaf).await {
            Ok(()) => NavigationOutcome::Opened(note),
            Err(err) => {
                log::error!("Unable to open {}: {}", note, err);
                self.workspace.notify(&format!("Failed to open {}", note));
                NavigationOutcome::Failed
            }
        }
    }

    async fn create_and_open(&self, title: &str, question: &str, path: &str, template: Option<&str>, new_leaf: bool, kind: &str) -> NavigationOutcome {
        if self.source.settings().should_confirm_before_create {
            if self.workspace.confirm(title, question).await == false {
                return NavigationOutcome::Declined;
            }
        }

        let note = match self.factory.create_note(path, template).await {
            Ok(note) => note,
            Err(err) => {
                log::error!("Failed to create {} note: {}", kind, err);
                self.workspace.notify(&format!("Failed to create {} note", kind));
                return NavigationOutcome::Failed;
            }
        };

        match self.workspace.open_note(&note, new_leaf).await {
            Ok(()) => NavigationOutcome::Created(note),
            Err(err) => {
                log::error!("Unable to open {}: {}", note, err);
                self.workspace.notify(&format!("Failed to open {}", note));
                NavigationOutcome::Failed
            }
        }
    }
}

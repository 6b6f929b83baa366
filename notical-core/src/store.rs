//! Whole-document storage for the shared calendar file.

use crate::error::NoticalResult;
use crate::event::Event;
use crate::ics::{generate_calendar, parse_calendar};
use chrono_tz::Tz;
use std::path::{Path, PathBuf};

/// The single on-disk calendar document.
///
/// Every mutation is a full read + full rewrite; there is no caching and no
/// incremental diff. `save` overwrites in place rather than write-then-rename,
/// so a crash mid-write can corrupt the file. Callers wanting isolation from
/// concurrent requests must scope load-mutate-save themselves.
pub struct CalendarStore {
    path: PathBuf,
    tz: Tz,
}

impl CalendarStore {
    pub fn new(path: impl Into<PathBuf>, tz: Tz) -> Self {
        CalendarStore {
            path: path.into(),
            tz,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// On first run, write an empty well-formed document. Returns whether a
    /// new document was created.
    pub fn init_if_missing(&self) -> NoticalResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        self.save(&[])?;
        Ok(true)
    }

    /// Read and parse the full document.
    pub fn load(&self) -> NoticalResult<Vec<Event>> {
        let content = std::fs::read_to_string(&self.path)?;
        parse_calendar(&content, self.tz)
    }

    /// Serialize the full event set back to the document path.
    pub fn save(&self, events: &[Event]) -> NoticalResult<()> {
        let content = generate_calendar(events)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

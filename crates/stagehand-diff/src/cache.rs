//! The per-file diff cache and fetch tickets.

use stagehand_backend::BackendResult;
use stagehand_types::{DiffHunk, FileType};

use crate::error::DiffResult;
use crate::text::TextDiff;

/// Identity of one outstanding diff fetch.
///
/// Sequence numbers come from a [`TicketCounter`] shared by every file of a
/// staging area, so a ticket issued for an evicted file can never match a
/// fetch issued later for a file re-created at the same path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DiffTicket {
    pub path: String,
    pub seq: u64,
}

/// Monotonic source of ticket sequence numbers.
#[derive(Clone, Debug, Default)]
pub struct TicketCounter {
    last: u64,
}

impl TicketCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> u64 {
        self.last += 1;
        self.last
    }
}

/// What happened to a fetch completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffOutcome {
    /// The cache now holds the fetched lines.
    Updated { lines: usize },
    /// The file was gone on the backend; nothing changed.
    Absorbed,
    /// A newer fetch was issued, or the fetch was cancelled.
    Stale,
    /// No file exists for the ticket's path any more.
    Orphaned,
}

impl DiffOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}

/// Per-file diff state, polymorphic over the file type.
#[derive(Clone, Debug)]
pub enum DiffCache {
    Text(TextDiff),
    /// Image sources are pure functions of file state; nothing is cached.
    Image,
}

impl DiffCache {
    pub fn for_type(file_type: FileType) -> Self {
        match file_type {
            FileType::Text => Self::Text(TextDiff::new()),
            FileType::Image => Self::Image,
        }
    }

    /// Start a new fetch for `path`, superseding any outstanding one.
    ///
    /// Returns `None` for images, which never fetch.
    pub fn invalidate(&mut self, path: &str, counter: &mut TicketCounter) -> Option<DiffTicket> {
        match self {
            Self::Text(text) => {
                let seq = counter.next();
                text.request(seq);
                Some(DiffTicket {
                    path: path.to_string(),
                    seq,
                })
            }
            Self::Image => None,
        }
    }

    /// Forget any outstanding fetch; its completion will be reported stale.
    pub fn cancel(&mut self) {
        if let Self::Text(text) = self {
            text.cancel();
        }
    }

    pub fn complete(
        &mut self,
        ticket: &DiffTicket,
        result: BackendResult<Vec<DiffHunk>>,
    ) -> DiffResult<DiffOutcome> {
        match self {
            Self::Text(text) => text.complete(ticket, result),
            Self::Image => Ok(DiffOutcome::Stale),
        }
    }

    pub fn text(&self) -> Option<&TextDiff> {
        match self {
            Self::Text(text) => Some(text),
            Self::Image => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.text().is_some_and(TextDiff::is_loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagehand_types::RawDiffLine;

    #[test]
    fn counter_is_monotonic() {
        let mut counter = TicketCounter::new();
        let a = counter.next();
        let b = counter.next();
        assert!(b > a);
    }

    #[test]
    fn image_never_fetches() {
        let mut counter = TicketCounter::new();
        let mut cache = DiffCache::for_type(FileType::Image);
        assert!(cache.invalidate("logo.png", &mut counter).is_none());
        assert!(!cache.is_loading());
        assert!(cache.text().is_none());
    }

    #[test]
    fn text_issues_ticket_and_applies() {
        let mut counter = TicketCounter::new();
        let mut cache = DiffCache::for_type(FileType::Text);
        let ticket = cache.invalidate("a.rs", &mut counter).unwrap();
        assert_eq!(ticket.path, "a.rs");
        assert!(cache.is_loading());

        let hunks = vec![DiffHunk::new(vec![RawDiffLine::new(None, Some(1), "+x")])];
        let outcome = cache.complete(&ticket, Ok(hunks)).unwrap();
        assert_eq!(outcome, DiffOutcome::Updated { lines: 1 });
        assert!(outcome.is_applied());
        assert!(!cache.is_loading());
    }

    #[test]
    fn cancelled_fetch_is_stale() {
        let mut counter = TicketCounter::new();
        let mut cache = DiffCache::for_type(FileType::Text);
        let ticket = cache.invalidate("a.rs", &mut counter).unwrap();
        cache.cancel();
        assert_eq!(cache.complete(&ticket, Ok(Vec::new())).unwrap(), DiffOutcome::Stale);
        assert!(cache.text().unwrap().lines().is_none());
    }
}

//! Cached line diff for a text file.

use stagehand_backend::{BackendError, BackendResult};
use stagehand_types::DiffHunk;
use tracing::{debug, warn};

use crate::cache::{DiffOutcome, DiffTicket};
use crate::error::{DiffError, DiffResult};
use crate::line::{flatten_hunks, DiffLine};

/// Fetched diff lines plus the sequence number of the fetch in flight.
///
/// Overlapping fetches resolve last-request-wins: only the completion whose
/// sequence matches the latest request is applied.
#[derive(Clone, Debug, Default)]
pub struct TextDiff {
    lines: Option<Vec<DiffLine>>,
    pending: Option<u64>,
}

impl TextDiff {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last successfully fetched lines, or `None` before the first fetch.
    pub fn lines(&self) -> Option<&[DiffLine]> {
        self.lines.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<u64> {
        self.pending
    }

    pub fn added_count(&self) -> usize {
        self.lines().map_or(0, |l| l.iter().filter(|l| l.added).count())
    }

    pub fn removed_count(&self) -> usize {
        self.lines().map_or(0, |l| l.iter().filter(|l| l.removed).count())
    }

    pub(crate) fn request(&mut self, seq: u64) {
        self.pending = Some(seq);
    }

    pub(crate) fn cancel(&mut self) {
        self.pending = None;
    }

    /// Apply a fetch completion.
    ///
    /// A missing file is absorbed: the next status poll is expected to evict
    /// it. Other failures are returned and leave cached lines untouched.
    pub(crate) fn complete(
        &mut self,
        ticket: &DiffTicket,
        result: BackendResult<Vec<DiffHunk>>,
    ) -> DiffResult<DiffOutcome> {
        if self.pending != Some(ticket.seq) {
            debug!(path = %ticket.path, seq = ticket.seq, "discarding stale diff");
            return Ok(DiffOutcome::Stale);
        }
        self.pending = None;

        match result {
            Ok(hunks) => {
                let lines = flatten_hunks(&hunks);
                let count = lines.len();
                self.lines = Some(lines);
                debug!(path = %ticket.path, lines = count, "diff updated");
                Ok(DiffOutcome::Updated { lines: count })
            }
            Err(BackendError::NoSuchFile(_)) => {
                debug!(path = %ticket.path, "file vanished before its diff was fetched");
                Ok(DiffOutcome::Absorbed)
            }
            Err(source) => {
                warn!(path = %ticket.path, error = %source, "diff fetch failed");
                Err(DiffError::Fetch {
                    path: ticket.path.clone(),
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagehand_types::RawDiffLine;

    fn ticket(seq: u64) -> DiffTicket {
        DiffTicket {
            path: "a.txt".into(),
            seq,
        }
    }

    fn hunks(texts: &[&str]) -> Vec<DiffHunk> {
        vec![DiffHunk::new(
            texts.iter().map(|t| RawDiffLine::new(None, None, *t)).collect(),
        )]
    }

    #[test]
    fn last_request_wins() {
        let mut diff = TextDiff::new();
        diff.request(1);
        diff.request(2);

        let outcome = diff.complete(&ticket(1), Ok(hunks(&["+old"]))).unwrap();
        assert_eq!(outcome, DiffOutcome::Stale);
        assert!(diff.lines().is_none());
        assert!(diff.is_loading());

        let outcome = diff.complete(&ticket(2), Ok(hunks(&["+new", "-gone"]))).unwrap();
        assert_eq!(outcome, DiffOutcome::Updated { lines: 2 });
        assert_eq!(diff.lines().unwrap()[0].text, "+new");
        assert_eq!(diff.added_count(), 1);
        assert_eq!(diff.removed_count(), 1);
    }

    #[test]
    fn no_such_file_is_absorbed() {
        let mut diff = TextDiff::new();
        diff.request(1);
        diff.complete(&ticket(1), Ok(hunks(&["+kept"]))).unwrap();

        diff.request(2);
        let outcome = diff
            .complete(&ticket(2), Err(BackendError::NoSuchFile("a.txt".into())))
            .unwrap();
        assert_eq!(outcome, DiffOutcome::Absorbed);
        assert_eq!(diff.lines().unwrap()[0].text, "+kept");
        assert!(!diff.is_loading());
    }

    #[test]
    fn other_failures_surface_and_keep_content() {
        let mut diff = TextDiff::new();
        diff.request(1);
        diff.complete(&ticket(1), Ok(hunks(&["+kept"]))).unwrap();

        diff.request(2);
        let err = diff
            .complete(&ticket(2), Err(BackendError::Transport("down".into())))
            .unwrap_err();
        assert!(matches!(err, DiffError::Fetch { ref path, .. } if path == "a.txt"));
        assert_eq!(diff.lines().unwrap().len(), 1);
        assert!(!diff.is_loading());
    }

    #[test]
    fn completion_without_request_is_stale() {
        let mut diff = TextDiff::new();
        let outcome = diff.complete(&ticket(7), Ok(hunks(&["+x"]))).unwrap();
        assert_eq!(outcome, DiffOutcome::Stale);
    }
}

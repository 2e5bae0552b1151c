//! The per-path file entity.

use stagehand_backend::BackendResult;
use stagehand_diff::{
    DiffCache, DiffLine, DiffOutcome, DiffResult, DiffTicket, ImageDiff, ImageEndpoint,
    TicketCounter,
};
use stagehand_types::{DiffHunk, FileStatus, FileType};

/// One changed path of the working tree.
///
/// `is_new`, `removed` and `conflict` mirror the latest snapshot and are
/// overwritten on every reconciliation. `staged` and diff visibility are
/// local-only and survive reconciliations for as long as the path does.
#[derive(Clone, Debug)]
pub struct FileEntity {
    path: String,
    file_type: FileType,
    /// Whether the file goes into the next commit.
    pub staged: bool,
    pub is_new: bool,
    pub removed: bool,
    pub conflict: bool,
    diff_visible: bool,
    diff: DiffCache,
}

impl FileEntity {
    /// Create an entity on first sight of `path`. New entities are staged.
    pub fn new(path: impl Into<String>, status: &FileStatus) -> Self {
        Self {
            path: path.into(),
            file_type: status.file_type,
            staged: true,
            is_new: status.is_new,
            removed: status.removed,
            conflict: status.conflict,
            diff_visible: false,
            diff: DiffCache::for_type(status.file_type),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn is_diff_visible(&self) -> bool {
        self.diff_visible
    }

    pub fn diff(&self) -> &DiffCache {
        &self.diff
    }

    /// Cached diff lines of a text file.
    pub fn diff_lines(&self) -> Option<&[DiffLine]> {
        self.diff.text().and_then(|t| t.lines())
    }

    /// Image diff sources; `None` for text files.
    pub fn image_diff(&self, endpoint: &ImageEndpoint) -> Option<ImageDiff> {
        match self.file_type {
            FileType::Image => Some(ImageDiff::new(endpoint, &self.path, self.is_new, self.removed)),
            FileType::Text => None,
        }
    }

    /// Overwrite the authoritative flags. The file type is fixed at creation.
    pub fn apply_status(&mut self, status: &FileStatus) {
        self.is_new = status.is_new;
        self.removed = status.removed;
        self.conflict = status.conflict;
    }

    /// Refresh the cached diff.
    ///
    /// No-op unless the diff is visible, or `force_if_hidden` is set and the
    /// file is text. Returns the ticket of the fetch to perform, if any.
    pub fn invalidate_diff(
        &mut self,
        force_if_hidden: bool,
        counter: &mut TicketCounter,
    ) -> Option<DiffTicket> {
        let forced = force_if_hidden && self.file_type == FileType::Text;
        if !self.diff_visible && !forced {
            return None;
        }
        self.diff.invalidate(&self.path, counter)
    }

    pub fn toggle_staged(&mut self) {
        self.staged = !self.staged;
    }

    /// Show or hide the diff. Showing forces a fresh fetch; hiding cancels
    /// the fetch in flight.
    pub fn toggle_diffs(&mut self, counter: &mut TicketCounter) -> Option<DiffTicket> {
        if self.diff_visible {
            self.hide_diff();
            None
        } else {
            self.diff_visible = true;
            self.invalidate_diff(true, counter)
        }
    }

    /// Show or hide the diff without fetching.
    pub fn toggle_diffs_no_invalidate(&mut self) {
        if self.diff_visible {
            self.hide_diff();
        } else {
            self.diff_visible = true;
        }
    }

    fn hide_diff(&mut self) {
        self.diff_visible = false;
        self.diff.cancel();
    }

    pub(crate) fn complete_diff(
        &mut self,
        ticket: &DiffTicket,
        result: BackendResult<Vec<DiffHunk>>,
    ) -> DiffResult<DiffOutcome> {
        self.diff.complete(ticket, result)
    }
}

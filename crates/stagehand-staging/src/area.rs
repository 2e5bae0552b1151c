//! The staging area: reconciliation of status snapshots into file entities.
//!
//! The [`StagingArea`] is the only owner of [`FileEntity`] values. Entities
//! are created on first sight of a path and dropped, together with their
//! cached diff and any pending fetch, as soon as a snapshot omits the path.

use std::collections::HashMap;

use stagehand_backend::BackendResult;
use stagehand_diff::{DiffOutcome, DiffTicket, ImageDiff, ImageEndpoint, TicketCounter};
use stagehand_types::{DiffHunk, SnapshotFile, StatusSnapshot};
use tracing::debug;

use crate::entity::FileEntity;
use crate::error::{StagingError, StagingResult};
use crate::message::split_message;

/// What a reconciliation changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Diff fetches to perform, one per visible text file.
    pub diff_requests: Vec<DiffTicket>,
    /// Paths seen for the first time, in snapshot order.
    pub added: Vec<String>,
    /// Paths dropped because the snapshot no longer lists them, sorted.
    pub evicted: Vec<String>,
    /// Title and body of the backend's merge message, when merging.
    pub merge_draft: Option<(String, String)>,
}

/// The live set of changed files.
#[derive(Debug)]
pub struct StagingArea {
    files: Vec<FileEntity>,
    in_rebase: bool,
    in_merge: bool,
    /// Value the next "toggle all" assigns to every `staged` flag.
    all_stage_flag: bool,
    tickets: TicketCounter,
    images: ImageEndpoint,
}

impl StagingArea {
    /// Create an empty area whose image diffs are served from `images`.
    pub fn new(images: ImageEndpoint) -> Self {
        Self {
            files: Vec::new(),
            in_rebase: false,
            in_merge: false,
            all_stage_flag: false,
            tickets: TicketCounter::new(),
            images,
        }
    }

    // ---------------------------------------------------------------
    // Reconciliation
    // ---------------------------------------------------------------

    /// Merge a snapshot into the file set.
    ///
    /// Surviving entities keep their local state; their authoritative flags
    /// are overwritten and visible diffs are invalidated. The resulting
    /// order is the snapshot's order.
    pub fn reconcile(&mut self, snapshot: StatusSnapshot) -> Reconciliation {
        let mut previous: HashMap<String, FileEntity> = self
            .files
            .drain(..)
            .map(|f| (f.path().to_string(), f))
            .collect();
        let mut files: Vec<FileEntity> = Vec::with_capacity(snapshot.files.len());
        let mut positions: HashMap<String, usize> = HashMap::with_capacity(snapshot.files.len());
        let mut report = Reconciliation::default();

        for SnapshotFile { path, status } in snapshot.files {
            if let Some(&idx) = positions.get(&path) {
                files[idx].apply_status(&status);
                continue;
            }
            let mut entity = match previous.remove(&path) {
                Some(existing) => existing,
                None => {
                    report.added.push(path.clone());
                    FileEntity::new(path.clone(), &status)
                }
            };
            entity.apply_status(&status);
            if let Some(ticket) = entity.invalidate_diff(false, &mut self.tickets) {
                report.diff_requests.push(ticket);
            }
            positions.insert(path, files.len());
            files.push(entity);
        }

        report.evicted = previous.into_keys().collect();
        report.evicted.sort();
        for path in &report.evicted {
            debug!(path = %path, "evicted file");
        }

        self.files = files;
        self.in_rebase = snapshot.in_rebase;
        self.in_merge = snapshot.in_merge;
        if snapshot.in_merge {
            report.merge_draft = Some(split_message(
                snapshot.commit_message.as_deref().unwrap_or_default(),
            ));
        }

        debug!(
            files = self.files.len(),
            added = report.added.len(),
            evicted = report.evicted.len(),
            fetches = report.diff_requests.len(),
            in_rebase = self.in_rebase,
            in_merge = self.in_merge,
            "reconciled status snapshot"
        );
        report
    }

    /// Apply a diff fetch completion.
    ///
    /// Completions for paths that were evicted, or for fetches that were
    /// superseded or cancelled, are discarded.
    pub fn apply_diff(
        &mut self,
        ticket: &DiffTicket,
        result: BackendResult<Vec<DiffHunk>>,
    ) -> StagingResult<DiffOutcome> {
        match self.files.iter_mut().find(|f| f.path() == ticket.path) {
            Some(entity) => Ok(entity.complete_diff(ticket, result)?),
            None => {
                debug!(path = %ticket.path, seq = ticket.seq, "diff arrived for evicted file");
                Ok(DiffOutcome::Orphaned)
            }
        }
    }

    /// Invalidate every visible diff.
    pub fn invalidate_all_diffs(&mut self) -> Vec<DiffTicket> {
        let tickets = &mut self.tickets;
        self.files
            .iter_mut()
            .filter_map(|f| f.invalidate_diff(false, tickets))
            .collect()
    }

    /// Drop every entity, e.g. after a commit, ahead of the next snapshot.
    pub fn clear(&mut self) {
        self.files.clear();
    }

    // ---------------------------------------------------------------
    // Local toggles
    // ---------------------------------------------------------------

    /// Flip the staged flag of `path` and return the new value.
    pub fn toggle_staged(&mut self, path: &str) -> StagingResult<bool> {
        let entity = self.entity_mut(path)?;
        entity.toggle_staged();
        Ok(entity.staged)
    }

    pub fn set_staged(&mut self, path: &str, staged: bool) -> StagingResult<()> {
        self.entity_mut(path)?.staged = staged;
        Ok(())
    }

    /// Set every staged flag to the current all-stage flag, then flip it.
    ///
    /// The flag starts out `false`, so the first call unstages everything.
    pub fn toggle_all_staged(&mut self) {
        for entity in &mut self.files {
            entity.staged = self.all_stage_flag;
        }
        self.all_stage_flag = !self.all_stage_flag;
    }

    pub fn all_stage_flag(&self) -> bool {
        self.all_stage_flag
    }

    /// Show or hide the diff of `path`; showing yields a fetch ticket.
    pub fn toggle_diffs(&mut self, path: &str) -> StagingResult<Option<DiffTicket>> {
        let idx = self.position(path)?;
        Ok(self.files[idx].toggle_diffs(&mut self.tickets))
    }

    pub fn toggle_diffs_no_invalidate(&mut self, path: &str) -> StagingResult<()> {
        self.entity_mut(path)?.toggle_diffs_no_invalidate();
        Ok(())
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    pub fn files(&self) -> &[FileEntity] {
        &self.files
    }

    pub fn get(&self, path: &str) -> Option<&FileEntity> {
        self.files.iter().find(|f| f.path() == path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn in_rebase(&self) -> bool {
        self.in_rebase
    }

    pub fn in_merge(&self) -> bool {
        self.in_merge
    }

    pub fn staged_count(&self) -> usize {
        self.files.iter().filter(|f| f.staged).count()
    }

    pub fn has_staged(&self) -> bool {
        self.files.iter().any(|f| f.staged)
    }

    pub fn has_conflicts(&self) -> bool {
        self.files.iter().any(|f| f.conflict)
    }

    /// Paths of staged files, in file-set order.
    pub fn staged_paths(&self) -> Vec<String> {
        self.files
            .iter()
            .filter(|f| f.staged)
            .map(|f| f.path().to_string())
            .collect()
    }

    pub fn conflict_paths(&self) -> Vec<String> {
        self.files
            .iter()
            .filter(|f| f.conflict)
            .map(|f| f.path().to_string())
            .collect()
    }

    /// One-line summary, e.g. `"3 files, 2 to be committed"`.
    pub fn stats(&self) -> String {
        format!("{} files, {} to be committed", self.len(), self.staged_count())
    }

    pub fn image_endpoint(&self) -> &ImageEndpoint {
        &self.images
    }

    /// Image diff sources of `path`; `None` for text files.
    pub fn image_diff(&self, path: &str) -> StagingResult<Option<ImageDiff>> {
        let entity = self
            .get(path)
            .ok_or_else(|| StagingError::PathNotFound(path.to_string()))?;
        Ok(entity.image_diff(&self.images))
    }

    fn position(&self, path: &str) -> StagingResult<usize> {
        self.files
            .iter()
            .position(|f| f.path() == path)
            .ok_or_else(|| StagingError::PathNotFound(path.to_string()))
    }

    fn entity_mut(&mut self, path: &str) -> StagingResult<&mut FileEntity> {
        self.files
            .iter_mut()
            .find(|f| f.path() == path)
            .ok_or_else(|| StagingError::PathNotFound(path.to_string()))
    }
}

//! The commit workflow controller.
//!
//! Owns the [`StagingArea`], the draft message and the amend flag, and is
//! the only component that talks to the backend. Every operation takes
//! `&mut self`, so reconciliations on one controller never overlap; diff
//! fetches for different files run concurrently and are applied through the
//! staging area's ticket check.

use std::sync::Arc;

use stagehand_backend::{Backend, BackendError, CommitGraph, ConfirmDialog};
use stagehand_diff::{DiffOutcome, DiffTicket};
use stagehand_staging::{Reconciliation, StagingArea};
use stagehand_types::{CommitRequest, DiscardTarget};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::StagingConfig;
use crate::draft::DraftMessage;
use crate::error::{WorkflowError, WorkflowResult};
use crate::validation::{validate_commit, CommitMode, CommitValidationError};

const DISCARD_ALL_TITLE: &str = "Are you sure you want to discard all changes?";
const DISCARD_ALL_DETAILS: &str = "This operation cannot be undone.";

/// Tally of diff fetch completions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiffFetchSummary {
    pub updated: usize,
    pub absorbed: usize,
    /// Stale or orphaned completions that were dropped.
    pub discarded: usize,
    /// Paths whose fetch failed; their cached lines are unchanged.
    pub failed: Vec<String>,
}

impl DiffFetchSummary {
    fn record(&mut self, outcome: DiffOutcome) {
        match outcome {
            DiffOutcome::Updated { .. } => self.updated += 1,
            DiffOutcome::Absorbed => self.absorbed += 1,
            DiffOutcome::Stale | DiffOutcome::Orphaned => self.discarded += 1,
        }
    }
}

/// Result of one status poll.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub reconciliation: Reconciliation,
    pub diffs: DiffFetchSummary,
}

/// Outcome of an ignore-file command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreOutcome {
    Ignored,
    /// The file was already ignored; the staging area was refreshed instead.
    AlreadyIgnored,
}

pub struct CommitWorkflowController {
    backend: Arc<dyn Backend>,
    graph: Arc<dyn CommitGraph>,
    dialog: Arc<dyn ConfirmDialog>,
    config: StagingConfig,
    area: StagingArea,
    draft: DraftMessage,
    amend: bool,
}

impl std::fmt::Debug for CommitWorkflowController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitWorkflowController")
            .field("repo_path", &self.config.repo_path)
            .field("files", &self.area.len())
            .field("mode", &self.mode())
            .field("draft", &self.draft)
            .finish()
    }
}

impl CommitWorkflowController {
    pub fn new(
        config: StagingConfig,
        backend: Arc<dyn Backend>,
        graph: Arc<dyn CommitGraph>,
        dialog: Arc<dyn ConfirmDialog>,
    ) -> Self {
        let area = StagingArea::new(config.image_endpoint());
        Self {
            backend,
            graph,
            dialog,
            config,
            area,
            draft: DraftMessage::default(),
            amend: false,
        }
    }

    // ---------------------------------------------------------------
    // Observable state
    // ---------------------------------------------------------------

    pub fn area(&self) -> &StagingArea {
        &self.area
    }

    pub fn config(&self) -> &StagingConfig {
        &self.config
    }

    pub fn draft(&self) -> &DraftMessage {
        &self.draft
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.draft.body = body.into();
    }

    /// Amending only applies outside a rebase or merge.
    pub fn is_amend(&self) -> bool {
        self.mode() == CommitMode::Amend
    }

    pub fn mode(&self) -> CommitMode {
        CommitMode::resolve(self.amend, self.area.in_rebase(), self.area.in_merge())
    }

    pub fn can_amend(&self) -> bool {
        self.graph.head().is_some() && !self.area.in_rebase() && !self.area.in_merge()
    }

    pub fn can_stash_all(&self) -> bool {
        !self.is_amend()
    }

    pub fn commit_button_visible(&self) -> bool {
        !self.area.in_rebase() && !self.area.in_merge()
    }

    /// Nothing to show: no changed files, not amending, not rebasing.
    pub fn show_nux(&self) -> bool {
        self.area.is_empty() && !self.is_amend() && !self.area.in_rebase()
    }

    pub fn validation(&self) -> Option<CommitValidationError> {
        validate_commit(&self.area, &self.draft, self.is_amend())
    }

    /// The validation message, or an empty string when committing is allowed.
    pub fn commit_validation_error(&self) -> String {
        self.validation().map(|e| e.to_string()).unwrap_or_default()
    }

    // ---------------------------------------------------------------
    // Status polling and diffs
    // ---------------------------------------------------------------

    /// Poll the backend, reconcile, and fetch the diffs that need it.
    ///
    /// A failed status query leaves every entity untouched.
    pub async fn refresh(&mut self) -> WorkflowResult<RefreshReport> {
        let snapshot = match self.backend.status().await {
            Ok(snapshot) => snapshot,
            Err(BackendError::MustBeInWorkingTree(path)) => {
                warn!(repo = %self.config.repo_path, "status requested outside a working tree");
                return Err(WorkflowError::NotInWorkingTree(path));
            }
            Err(e) => {
                warn!(repo = %self.config.repo_path, error = %e, "status query failed");
                return Err(e.into());
            }
        };

        let reconciliation = self.area.reconcile(snapshot);
        if self.amend && (self.area.in_rebase() || self.area.in_merge()) {
            debug!(
                in_rebase = self.area.in_rebase(),
                in_merge = self.area.in_merge(),
                "leaving amend"
            );
            self.amend = false;
        }
        if let Some((title, body)) = &reconciliation.merge_draft {
            self.draft = DraftMessage::new(title.clone(), body.clone());
        }
        let diffs = self.fetch_diffs(reconciliation.diff_requests.clone()).await;
        Ok(RefreshReport {
            reconciliation,
            diffs,
        })
    }

    /// Re-fetch every visible diff.
    pub async fn invalidate_files_diffs(&mut self) -> DiffFetchSummary {
        let tickets = self.area.invalidate_all_diffs();
        self.fetch_diffs(tickets).await
    }

    /// Run the fetches concurrently and apply each completion as it lands.
    async fn fetch_diffs(&mut self, tickets: Vec<DiffTicket>) -> DiffFetchSummary {
        let mut summary = DiffFetchSummary::default();
        if tickets.is_empty() {
            return summary;
        }

        let limit = Arc::new(Semaphore::new(self.config.fetch_limit()));
        let mut fetches = JoinSet::new();
        for ticket in tickets {
            let backend = Arc::clone(&self.backend);
            let limit = Arc::clone(&limit);
            fetches.spawn(async move {
                let _permit = limit.acquire_owned().await;
                let result = backend.diff(&ticket.path).await;
                (ticket, result)
            });
        }

        while let Some(joined) = fetches.join_next().await {
            let (ticket, result) = match joined {
                Ok(completion) => completion,
                Err(e) => {
                    warn!(error = %e, "diff fetch task did not complete");
                    continue;
                }
            };
            match self.area.apply_diff(&ticket, result) {
                Ok(outcome) => summary.record(outcome),
                Err(e) => {
                    warn!(path = %ticket.path, error = %e, "diff not updated");
                    summary.failed.push(ticket.path);
                }
            }
        }

        debug!(
            updated = summary.updated,
            absorbed = summary.absorbed,
            discarded = summary.discarded,
            failed = summary.failed.len(),
            "diff fetches settled"
        );
        summary
    }

    // ---------------------------------------------------------------
    // Local toggles
    // ---------------------------------------------------------------

    pub fn toggle_staged(&mut self, path: &str) -> WorkflowResult<bool> {
        Ok(self.area.toggle_staged(path)?)
    }

    pub fn toggle_all_staged(&mut self) {
        self.area.toggle_all_staged();
    }

    /// Show or hide a file's diff, fetching it right away when shown.
    pub async fn toggle_diffs(&mut self, path: &str) -> WorkflowResult<DiffFetchSummary> {
        let ticket = self.area.toggle_diffs(path)?;
        Ok(self.fetch_diffs(ticket.into_iter().collect()).await)
    }

    /// Switch between normal and amend mode.
    ///
    /// Entering amend with an empty title copies HEAD's message into the
    /// draft. Leaving amend clears the draft only if it is still HEAD's
    /// message, so user edits survive. Entering amend needs a HEAD commit
    /// and no rebase or merge in progress.
    pub fn toggle_amend(&mut self) -> WorkflowResult<()> {
        if !self.amend && !self.can_amend() {
            return Err(WorkflowError::InvalidOperation(
                "cannot amend without a HEAD commit or during a rebase or merge".to_string(),
            ));
        }
        let head = self.graph.head();
        if !self.amend && self.draft.title.is_empty() {
            if let Some(head) = &head {
                self.draft = DraftMessage::from_head(head);
            }
        } else if self.amend && head.as_ref().is_some_and(|h| self.draft.matches(h)) {
            self.draft.clear();
        }
        self.amend = !self.amend;
        debug!(amend = self.amend, "toggled amend");
        Ok(())
    }

    // ---------------------------------------------------------------
    // Commands
    // ---------------------------------------------------------------

    /// Commit the staged files with the drafted message.
    ///
    /// On success the draft, the amend flag and the file set are cleared
    /// ahead of the next poll. On failure nothing changes, so the user can
    /// retry.
    pub async fn commit(&mut self) -> WorkflowResult<()> {
        if let Some(invalid) = self.validation() {
            return Err(WorkflowError::Validation(invalid));
        }

        let request = CommitRequest {
            files: self.area.staged_paths(),
            message: self.draft.compose(),
            amend: self.is_amend(),
        };
        info!(files = request.files.len(), amend = request.amend, "committing");

        match self.backend.commit(&request).await {
            Ok(()) => {
                self.draft.clear();
                self.amend = false;
                self.area.clear();
                Ok(())
            }
            Err(BackendError::NoIdentityConfigured) => {
                warn!("commit refused: author identity not configured");
                Err(WorkflowError::IdentityNotConfigured)
            }
            Err(e) => {
                warn!(error = %e, "commit failed");
                Err(e.into())
            }
        }
    }

    pub async fn rebase_continue(&self) -> WorkflowResult<()> {
        info!("continuing rebase");
        self.backend.rebase_continue().await.map_err(|e| command_failed("rebase continue", e))
    }

    pub async fn rebase_abort(&self) -> WorkflowResult<()> {
        info!("aborting rebase");
        self.backend.rebase_abort().await.map_err(|e| command_failed("rebase abort", e))
    }

    /// Conclude the merge with the drafted message.
    pub async fn merge_continue(&self) -> WorkflowResult<()> {
        info!("continuing merge");
        let message = self.draft.compose();
        self.backend
            .merge_continue(&message)
            .await
            .map_err(|e| command_failed("merge continue", e))
    }

    pub async fn merge_abort(&self) -> WorkflowResult<()> {
        info!("aborting merge");
        self.backend.merge_abort().await.map_err(|e| command_failed("merge abort", e))
    }

    /// Stash every change, using the draft title as the stash message.
    pub async fn stash_all(&self) -> WorkflowResult<()> {
        if !self.can_stash_all() {
            return Err(WorkflowError::InvalidOperation(
                "cannot stash while amending".to_string(),
            ));
        }
        info!("stashing all changes");
        self.backend
            .create_stash(&self.draft.title)
            .await
            .map_err(|e| command_failed("stash", e))
    }

    /// Ask for confirmation, then discard every change.
    ///
    /// Returns whether the discard was issued.
    pub async fn discard_all_changes(&self) -> WorkflowResult<bool> {
        if !self.dialog.confirm(DISCARD_ALL_TITLE, DISCARD_ALL_DETAILS).await {
            debug!("discard all declined");
            return Ok(false);
        }
        info!("discarding all changes");
        self.backend
            .discard_changes(&DiscardTarget::All)
            .await
            .map_err(|e| command_failed("discard all", e))?;
        Ok(true)
    }

    pub async fn discard_file(&self, path: &str) -> WorkflowResult<()> {
        info!(path = %path, "discarding file changes");
        self.backend
            .discard_changes(&DiscardTarget::File(path.to_string()))
            .await
            .map_err(|e| command_failed("discard", e))
    }

    /// Add an ignore rule for `path`. A file that is already ignored is not
    /// an error: the staging area is refreshed so it can drop out.
    pub async fn ignore_file(&mut self, path: &str) -> WorkflowResult<IgnoreOutcome> {
        info!(path = %path, "ignoring file");
        match self.backend.ignore_file(path).await {
            Ok(()) => Ok(IgnoreOutcome::Ignored),
            Err(BackendError::AlreadyIgnored(_)) => {
                debug!(path = %path, "file already ignored; refreshing");
                self.refresh().await?;
                Ok(IgnoreOutcome::AlreadyIgnored)
            }
            Err(e) => Err(command_failed("ignore", e)),
        }
    }

    pub async fn resolve_conflict(&self, path: &str) -> WorkflowResult<()> {
        info!(path = %path, "marking conflict resolved");
        self.backend
            .resolve_conflicts(&[path.to_string()])
            .await
            .map_err(|e| command_failed("resolve conflict", e))
    }
}

fn command_failed(command: &str, error: BackendError) -> WorkflowError {
    warn!(command, error = %error, "command failed");
    WorkflowError::Backend(error)
}

//! In-memory collaborators for testing and snapshot replay.
//!
//! [`InMemoryBackend`] serves scripted status snapshots and diffs, records
//! every call it receives, and can be told to fail the next call of a given
//! [`Operation`]. [`ScriptedDialog`] and [`StaticCommitGraph`] stand in for
//! the confirmation dialog and the commit graph.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, RwLock};

use async_trait::async_trait;
use serde::Serialize;
use stagehand_types::{CommitRequest, DiffHunk, DiscardTarget, HeadCommit, StatusSnapshot};
use tracing::{debug, warn};

use crate::error::{BackendError, BackendResult};
use crate::traits::{Backend, CommitGraph, ConfirmDialog};

/// The kind of a backend call, used to target injected failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Status,
    Diff,
    Commit,
    RebaseContinue,
    RebaseAbort,
    MergeContinue,
    MergeAbort,
    Discard,
    Ignore,
    Resolve,
    Stash,
}

/// A call received by the [`InMemoryBackend`], in arrival order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum Command {
    Status,
    Diff { path: String },
    Commit(CommitRequest),
    RebaseContinue,
    RebaseAbort,
    MergeContinue { message: String },
    MergeAbort,
    Discard { target: DiscardTarget },
    Ignore { path: String },
    Resolve { files: Vec<String> },
    Stash { message: String },
}

impl Command {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Status => Operation::Status,
            Self::Diff { .. } => Operation::Diff,
            Self::Commit(_) => Operation::Commit,
            Self::RebaseContinue => Operation::RebaseContinue,
            Self::RebaseAbort => Operation::RebaseAbort,
            Self::MergeContinue { .. } => Operation::MergeContinue,
            Self::MergeAbort => Operation::MergeAbort,
            Self::Discard { .. } => Operation::Discard,
            Self::Ignore { .. } => Operation::Ignore,
            Self::Resolve { .. } => Operation::Resolve,
            Self::Stash { .. } => Operation::Stash,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    /// Snapshots served in order; the last one served keeps being returned.
    queued: VecDeque<StatusSnapshot>,
    current: StatusSnapshot,
    diffs: HashMap<String, Vec<DiffHunk>>,
    failures: HashMap<Operation, VecDeque<BackendError>>,
    log: Vec<Command>,
}

/// A scripted [`Backend`] kept entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    state: Mutex<State>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose every status query returns `snapshot`.
    pub fn with_snapshot(snapshot: StatusSnapshot) -> Self {
        Self {
            state: Mutex::new(State {
                current: snapshot,
                ..State::default()
            }),
        }
    }

    /// Replace the snapshot returned by status queries, dropping any queue.
    pub fn set_snapshot(&self, snapshot: StatusSnapshot) -> BackendResult<()> {
        let mut state = self.lock()?;
        state.queued.clear();
        state.current = snapshot;
        Ok(())
    }

    /// Queue a snapshot to be served by a later status query.
    pub fn push_snapshot(&self, snapshot: StatusSnapshot) -> BackendResult<()> {
        self.lock()?.queued.push_back(snapshot);
        Ok(())
    }

    /// Set the hunks returned for `path`.
    pub fn set_diff(&self, path: impl Into<String>, hunks: Vec<DiffHunk>) -> BackendResult<()> {
        self.lock()?.diffs.insert(path.into(), hunks);
        Ok(())
    }

    /// Make the next call of `operation` fail with `error`. Failures queue
    /// up and are consumed one per call.
    pub fn fail_next(&self, operation: Operation, error: BackendError) -> BackendResult<()> {
        self.lock()?
            .failures
            .entry(operation)
            .or_default()
            .push_back(error);
        Ok(())
    }

    /// Every call received so far.
    pub fn commands(&self) -> BackendResult<Vec<Command>> {
        Ok(self.lock()?.log.clone())
    }

    /// Calls of one kind received so far.
    pub fn commands_of(&self, operation: Operation) -> BackendResult<Vec<Command>> {
        Ok(self
            .lock()?
            .log
            .iter()
            .filter(|c| c.operation() == operation)
            .cloned()
            .collect())
    }

    pub fn clear_commands(&self) -> BackendResult<()> {
        self.lock()?.log.clear();
        Ok(())
    }

    fn lock(&self) -> BackendResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|e| BackendError::Transport(format!("lock poisoned: {e}")))
    }

    /// Record a call and return the injected failure for it, if any.
    fn record(&self, command: Command) -> BackendResult<()> {
        let mut state = self.lock()?;
        let operation = command.operation();
        debug!(?operation, "in-memory backend call");
        state.log.push(command);
        match state.failures.get_mut(&operation).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn status(&self) -> BackendResult<StatusSnapshot> {
        self.record(Command::Status)?;
        let mut state = self.lock()?;
        if let Some(next) = state.queued.pop_front() {
            state.current = next;
        }
        Ok(state.current.clone())
    }

    async fn diff(&self, path: &str) -> BackendResult<Vec<DiffHunk>> {
        self.record(Command::Diff {
            path: path.to_string(),
        })?;
        let state = self.lock()?;
        if let Some(hunks) = state.diffs.get(path) {
            return Ok(hunks.clone());
        }
        if state.current.get(path).is_some() {
            Ok(Vec::new())
        } else {
            Err(BackendError::NoSuchFile(path.to_string()))
        }
    }

    async fn commit(&self, request: &CommitRequest) -> BackendResult<()> {
        self.record(Command::Commit(request.clone()))
    }

    async fn rebase_continue(&self) -> BackendResult<()> {
        self.record(Command::RebaseContinue)
    }

    async fn rebase_abort(&self) -> BackendResult<()> {
        self.record(Command::RebaseAbort)
    }

    async fn merge_continue(&self, message: &str) -> BackendResult<()> {
        self.record(Command::MergeContinue {
            message: message.to_string(),
        })
    }

    async fn merge_abort(&self) -> BackendResult<()> {
        self.record(Command::MergeAbort)
    }

    async fn discard_changes(&self, target: &DiscardTarget) -> BackendResult<()> {
        self.record(Command::Discard {
            target: target.clone(),
        })
    }

    async fn ignore_file(&self, path: &str) -> BackendResult<()> {
        self.record(Command::Ignore {
            path: path.to_string(),
        })
    }

    async fn resolve_conflicts(&self, files: &[String]) -> BackendResult<()> {
        self.record(Command::Resolve {
            files: files.to_vec(),
        })
    }

    async fn create_stash(&self, message: &str) -> BackendResult<()> {
        self.record(Command::Stash {
            message: message.to_string(),
        })
    }
}

/// A [`ConfirmDialog`] that always gives the same answer and remembers what
/// it was asked.
#[derive(Debug)]
pub struct ScriptedDialog {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedDialog {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Titles of the prompts shown so far.
    pub fn prompts(&self) -> BackendResult<Vec<String>> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .map_err(|e| BackendError::Transport(format!("lock poisoned: {e}")))
    }
}

#[async_trait]
impl ConfirmDialog for ScriptedDialog {
    async fn confirm(&self, title: &str, _details: &str) -> bool {
        match self.prompts.lock() {
            Ok(mut prompts) => prompts.push(title.to_string()),
            Err(_) => warn!(title, "prompt log poisoned; prompt not recorded"),
        }
        self.answer
    }
}

/// A [`CommitGraph`] with a settable HEAD.
#[derive(Debug, Default)]
pub struct StaticCommitGraph {
    head: RwLock<Option<HeadCommit>>,
}

impl StaticCommitGraph {
    pub fn new(head: Option<HeadCommit>) -> Self {
        Self {
            head: RwLock::new(head),
        }
    }

    pub fn set_head(&self, head: Option<HeadCommit>) -> BackendResult<()> {
        let mut current = self
            .head
            .write()
            .map_err(|e| BackendError::Transport(format!("lock poisoned: {e}")))?;
        *current = head;
        Ok(())
    }
}

impl CommitGraph for StaticCommitGraph {
    fn head(&self) -> Option<HeadCommit> {
        match self.head.read() {
            Ok(head) => head.clone(),
            Err(_) => {
                warn!("commit graph lock poisoned; reporting no HEAD");
                None
            }
        }
    }
}

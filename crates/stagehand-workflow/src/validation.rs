//! Commit modes and commit-readiness validation.

use std::fmt;

use stagehand_staging::StagingArea;

use crate::draft::DraftMessage;

/// The kind of commit the next action produces.
///
/// Rebase and merge come from the backend's snapshot; amend is a local
/// toggle. When several apply, rebase wins over merge, merge over amend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitMode {
    Normal,
    Amend,
    Rebase,
    Merge,
}

impl CommitMode {
    pub fn resolve(amend: bool, in_rebase: bool, in_merge: bool) -> Self {
        if in_rebase {
            Self::Rebase
        } else if in_merge {
            Self::Merge
        } else if amend {
            Self::Amend
        } else {
            Self::Normal
        }
    }
}

impl fmt::Display for CommitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "normal",
            Self::Amend => "amend",
            Self::Rebase => "rebase",
            Self::Merge => "merge",
        };
        f.write_str(name)
    }
}

/// Why a commit cannot be made right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitValidationError {
    NoFilesToCommit,
    FilesInConflict,
    ProvideTitle,
}

impl fmt::Display for CommitValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::NoFilesToCommit => "No files to commit",
            Self::FilesInConflict => "Files in conflict",
            Self::ProvideTitle => "Provide a title",
        };
        f.write_str(message)
    }
}

impl std::error::Error for CommitValidationError {}

/// Check commit readiness. Rules are evaluated in order and the first that
/// applies is returned:
///
/// 1. nothing staged, unless amending or rebasing
/// 2. any file in conflict
/// 3. empty title, unless rebasing
pub fn validate_commit(
    area: &StagingArea,
    draft: &DraftMessage,
    amend: bool,
) -> Option<CommitValidationError> {
    let rebasing = area.in_rebase();

    if !amend && !rebasing && !area.has_staged() {
        return Some(CommitValidationError::NoFilesToCommit);
    }

    if area.has_conflicts() {
        return Some(CommitValidationError::FilesInConflict);
    }

    if !rebasing && draft.title.is_empty() {
        return Some(CommitValidationError::ProvideTitle);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagehand_diff::ImageEndpoint;
    use stagehand_types::{FileStatus, StatusSnapshot};

    fn area_with(snapshot: StatusSnapshot) -> StagingArea {
        let mut area = StagingArea::new(ImageEndpoint::new("/api/diff/image", "/repo"));
        area.reconcile(snapshot);
        area
    }

    fn titled() -> DraftMessage {
        DraftMessage::new("Fix bug", "")
    }

    #[test]
    fn nothing_staged() {
        let mut area = area_with(StatusSnapshot::new().with_file("a", FileStatus::text()));
        area.set_staged("a", false).unwrap();
        assert_eq!(
            validate_commit(&area, &titled(), false),
            Some(CommitValidationError::NoFilesToCommit)
        );
        assert_eq!(validate_commit(&area, &titled(), true), None);

        let empty = area_with(StatusSnapshot::new());
        assert_eq!(
            validate_commit(&empty, &titled(), false).map(|e| e.to_string()),
            Some("No files to commit".to_string())
        );
    }

    #[test]
    fn rebasing_with_nothing_staged_is_allowed() {
        let area = area_with(StatusSnapshot::new().with_rebase());
        assert_eq!(validate_commit(&area, &DraftMessage::default(), false), None);
    }

    #[test]
    fn conflict_wins_regardless_of_staging() {
        let mut area = area_with(
            StatusSnapshot::new()
                .with_file("a", FileStatus::text().with_conflict())
                .with_file("b", FileStatus::text()),
        );
        assert_eq!(
            validate_commit(&area, &titled(), false),
            Some(CommitValidationError::FilesInConflict)
        );
        area.set_staged("a", false).unwrap();
        assert_eq!(
            validate_commit(&area, &titled(), false),
            Some(CommitValidationError::FilesInConflict)
        );
        assert_eq!(
            validate_commit(&area, &titled(), true).map(|e| e.to_string()),
            Some("Files in conflict".to_string())
        );
    }

    #[test]
    fn title_required_unless_rebasing() {
        let area = area_with(StatusSnapshot::new().with_file("a", FileStatus::text()));
        assert_eq!(
            validate_commit(&area, &DraftMessage::default(), false).map(|e| e.to_string()),
            Some("Provide a title".to_string())
        );
        assert_eq!(validate_commit(&area, &titled(), false), None);

        let rebasing = area_with(
            StatusSnapshot::new()
                .with_file("a", FileStatus::text())
                .with_rebase(),
        );
        assert_eq!(validate_commit(&rebasing, &DraftMessage::default(), false), None);
    }

    #[test]
    fn mode_precedence() {
        assert_eq!(CommitMode::resolve(false, false, false), CommitMode::Normal);
        assert_eq!(CommitMode::resolve(true, false, false), CommitMode::Amend);
        assert_eq!(CommitMode::resolve(true, false, true), CommitMode::Merge);
        assert_eq!(CommitMode::resolve(true, true, true), CommitMode::Rebase);
        assert_eq!(CommitMode::Merge.to_string(), "merge");
    }
}

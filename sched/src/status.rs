use std::fmt;

use crate::MarkerState;

/// Completion state of a unit.
///
/// Units that have never been evaluated and units whose children are still
/// running are both `Pending`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    Pending,
    Success,
    Failed,
}

impl Status {
    /// True once the unit has a terminal outcome.
    pub fn completed(self) -> bool {
        !matches!(self, Status::Pending)
    }

    /// Status of a unit judged only by the markers in its own directory.
    /// Conflicting markers count as a failure.
    pub fn from_markers(markers: MarkerState) -> Self {
        match markers {
            MarkerState::None => Status::Pending,
            MarkerState::Success => Status::Success,
            MarkerState::Failed | MarkerState::Conflict => Status::Failed,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Pending => "PENDING",
            Status::Success => "SUCCESS",
            Status::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// Status of a parent given the statuses of its children.
///
/// Pending while any child is pending; otherwise Success iff every child
/// succeeded. A parent with no children is trivially successful.
pub fn aggregate<I: IntoIterator<Item = Status>>(children: I) -> Status {
    let mut any_failed = false;
    for child in children {
        match child {
            Status::Pending => return Status::Pending,
            Status::Failed => any_failed = true,
            Status::Success => {}
        }
    }
    if any_failed {
        Status::Failed
    } else {
        Status::Success
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_all_success() {
        assert_eq!(aggregate([Status::Success, Status::Success]), Status::Success);
    }

    #[test]
    fn test_any_failure_fails_parent() {
        assert_eq!(aggregate([Status::Success, Status::Failed]), Status::Failed);
        assert_eq!(aggregate([Status::Failed, Status::Failed]), Status::Failed);
    }

    #[test]
    fn test_pending_child_blocks_evaluation() {
        // a failure elsewhere doesn't make the parent judgeable yet:
        assert_eq!(
            aggregate([Status::Failed, Status::Pending, Status::Success]),
            Status::Pending
        );
    }

    #[test]
    fn test_from_markers() {
        assert_eq!(Status::from_markers(MarkerState::None), Status::Pending);
        assert_eq!(Status::from_markers(MarkerState::Success), Status::Success);
        assert_eq!(Status::from_markers(MarkerState::Failed), Status::Failed);
        assert_eq!(Status::from_markers(MarkerState::Conflict), Status::Failed);
    }

    #[test]
    fn test_completed() {
        assert!(!Status::Pending.completed());
        assert!(Status::Success.completed());
        assert!(Status::Failed.completed());
    }
}

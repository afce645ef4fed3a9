/// Node state definitions for the traversal
///
/// Every (url, depth) pair the traversal touches moves through these states.
use std::fmt;

/// Represents the state of a traversal node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeState {
    // ===== Active States =====
    /// Node has been popped but not yet checked
    Pending,

    /// Node passed its checks and its content is being acquired
    Processing,

    /// Node's links are being screened and scheduled
    Recursing,

    // ===== Terminal Skip States =====
    /// Link failed the eligibility filter or lies beyond the depth limit
    FilteredOut,

    /// The page budget was spent before the node could be processed
    BudgetExceeded,

    /// The URL was already visited in this seed's traversal
    VisitedDuplicate,

    // ===== Terminal Outcome States =====
    /// Content was acquired, but the node is a leaf (depth limit or budget)
    Succeeded,

    /// Acquisition failed; the error was recorded and children are skipped
    Failed,

    /// Node was processed and its children scheduled
    Done,
}

impl NodeState {
    /// Checks whether the traversal may move from `self` to `next`
    pub fn can_transition_to(&self, next: NodeState) -> bool {
        match self {
            Self::Pending => matches!(
                next,
                Self::FilteredOut | Self::BudgetExceeded | Self::VisitedDuplicate | Self::Processing
            ),
            Self::Processing => matches!(
                next,
                Self::Succeeded | Self::Failed | Self::BudgetExceeded | Self::Recursing
            ),
            Self::Recursing => matches!(next, Self::Done),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Recursing => "recursing",
            Self::FilteredOut => "filtered_out",
            Self::BudgetExceeded => "budget_exceeded",
            Self::VisitedDuplicate => "visited_duplicate",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

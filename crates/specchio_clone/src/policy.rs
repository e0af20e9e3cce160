//! Per-operation failure policy.
//!
//! Whether a failed operation is counted as a phase error or merely noted is
//! decided here, in one table, instead of at the call sites. Best-effort
//! operations are the ones whose outcome does not change what ends up on the
//! target: the icon fetch and the reposition passes.

/// Mutating operations the pipeline performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    /// Edit the target's name or icon.
    EditSettings,
    /// Fetch the source icon binary and apply it.
    FetchIcon,
    /// Delete an existing emoji during wipe.
    DeleteEmoji,
    /// Delete an existing channel during wipe.
    DeleteChannel,
    /// Delete an existing role during wipe.
    DeleteRole,
    /// Edit the target's default role permissions in place.
    EditDefaultRole,
    /// Create a role.
    CreateRole,
    /// Re-apply a role's source position after creation.
    RepositionRole,
    /// Create a category.
    CreateCategory,
    /// Re-apply a category's source position after creation.
    RepositionCategory,
    /// Create a channel.
    CreateChannel,
    /// Fetch an emoji binary from the CDN.
    FetchEmoji,
    /// Create an emoji from a fetched binary.
    CreateEmoji,
}

/// What the pipeline does when an operation fails for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    /// Log the failure and count it toward the phase's error tally.
    Count,
    /// Log only. The operation is best-effort and its failure leaves the
    /// phase's outcome intact.
    BestEffort,
}

/// The failure policy for an operation.
pub fn on_failure(operation: Operation) -> OnFailure {
    match operation {
        Operation::FetchIcon | Operation::RepositionRole | Operation::RepositionCategory => {
            OnFailure::BestEffort
        }
        _ => OnFailure::Count,
    }
}

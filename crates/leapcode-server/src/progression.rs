//! Progression table for the two-level campaign.
//!
//! The table below is the entire content of the game. Crossing into a new
//! level resets lives; clearing the final objective completes the campaign
//! and admits no further transitions.

/// Outcome of advancing past a cleared objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Move to the given pair; `reset_lives` is set when the transition
    /// crosses into a new level.
    Next {
        /// Next level number.
        level: u32,
        /// Next objective number.
        objective: u32,
        /// Whether lives are restored to the starting count.
        reset_lives: bool,
    },
    /// The final objective was cleared; the campaign is complete.
    Completed,
}

/// Returns the transition for a cleared (level, objective) pair.
///
/// `None` means the pair has no defined transition; callers leave the
/// session state untouched in that case.
#[must_use]
pub const fn next_state(level: u32, objective: u32) -> Option<Progress> {
    match (level, objective) {
        (1, 1) => Some(Progress::Next {
            level: 1,
            objective: 2,
            reset_lives: false,
        }),
        (1, 2) => Some(Progress::Next {
            level: 2,
            objective: 1,
            reset_lives: true,
        }),
        (2, 1) => Some(Progress::Next {
            level: 2,
            objective: 2,
            reset_lives: false,
        }),
        (2, 2) => Some(Progress::Completed),
        _ => None,
    }
}

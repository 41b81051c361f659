//! Static fallback text.
//!
//! Used whenever the model call errors or no tutor is configured. The
//! strings are fixed per (level, objective) so responses stay deterministic
//! when the model is unavailable.

/// Returns the fixed feedback shown when feedback generation fails.
#[must_use]
pub const fn fallback_feedback() -> &'static str {
    "Great attempt! Try reviewing the available actions and think about \
     what your hero needs to do to overcome this challenge."
}

/// Returns the static hint for a level/objective pair.
///
/// Unknown pairs get a generic nudge; the orchestrator validates pairs
/// against the catalog before asking for hints, so that arm is a safety
/// net rather than a gameplay path.
#[must_use]
pub const fn fallback_hint(level: u32, objective: u32) -> &'static str {
    match (level, objective) {
        (1, 1) => {
            "Think about what your hero needs to do when facing an obstacle: \
             move forward, jump over it, then land safely."
        }
        (1, 2) => {
            "This challenge has two obstacles in a row. Your hero will need \
             to jump twice while in the air before landing."
        }
        (2, 1) => {
            "Your hero needs to activate something before crossing. Look for \
             a switch that needs to be toggled!"
        }
        (2, 2) => {
            "There's an enemy in your hero's path. Use a projectile to defeat \
             it before moving forward."
        }
        _ => {
            "Think about what actions your hero needs to take to complete \
             this challenge. Check the available actions for guidance!"
        }
    }
}

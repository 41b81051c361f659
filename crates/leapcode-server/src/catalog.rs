//! Solution catalog for the Leapcode campaign.
//!
//! Static mapping from (level, objective) to the expected action sequence
//! and a human-readable description. Loaded once at startup, never mutated.

/// A single level/objective entry with its expected solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolutionEntry {
    /// Level number.
    pub level: u32,
    /// Objective number within the level.
    pub objective: u32,
    /// The exact action sequence that clears the objective.
    pub expected_actions: &'static [&'static str],
    /// What the player is asked to do.
    pub description: &'static str,
}

/// The full campaign: two levels of two objectives each.
const ENTRIES: &[SolutionEntry] = &[
    SolutionEntry {
        level: 1,
        objective: 1,
        expected_actions: &["move_forward()", "jump()", "come_down()"],
        description: "Jump over single obstacle",
    },
    SolutionEntry {
        level: 1,
        objective: 2,
        expected_actions: &["move_forward()", "jump()", "jump()", "come_down()"],
        description: "Multiple jumps over two obstacles",
    },
    SolutionEntry {
        level: 2,
        objective: 1,
        expected_actions: &[
            "move_forward()",
            "toggle_switch()",
            "move_forward()",
            "move_forward()",
        ],
        description: "Activate bridge lever",
    },
    SolutionEntry {
        level: 2,
        objective: 2,
        expected_actions: &["move_forward()", "throw()", "move_forward()"],
        description: "Defeat enemy",
    },
];

/// Action signatures available to players. Game-mechanics documentation for
/// the tutor and the frontend, not gameplay-enforced.
const AVAILABLE_ACTIONS: &[&str] = &[
    "move_forward(steps=1)",
    "jump(height=1)",
    "toggle_switch()",
    "throw()",
    "come_down()",
];

/// Returns the action signatures players may use.
#[must_use]
pub const fn available_actions() -> &'static [&'static str] {
    AVAILABLE_ACTIONS
}

/// Read-only lookup over the campaign's solution entries.
#[derive(Debug, Clone, Copy)]
pub struct SolutionCatalog {
    entries: &'static [SolutionEntry],
}

impl SolutionCatalog {
    /// Creates a catalog over the built-in campaign.
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: ENTRIES }
    }

    /// Returns the entry for a level/objective pair, if it exists.
    #[must_use]
    pub fn lookup(&self, level: u32, objective: u32) -> Option<&'static SolutionEntry> {
        self.entries
            .iter()
            .find(|entry| entry.level == level && entry.objective == objective)
    }

    /// Returns `true` if the pair is part of the campaign.
    #[must_use]
    pub fn contains(&self, level: u32, objective: u32) -> bool {
        self.lookup(level, objective).is_some()
    }
}

impl Default for SolutionCatalog {
    fn default() -> Self {
        Self::new()
    }
}

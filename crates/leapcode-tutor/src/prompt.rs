//! Prompt assembly for the tutor model.
//!
//! The instruction blocks keep feedback and hints on-tone for learners:
//! feedback explains what to adjust without scolding, hints nudge without
//! revealing the full solution.

use crate::LevelInfo;

/// Instructions prepended to feedback requests.
const FEEDBACK_INSTRUCTIONS: &str = "\
You are a helpful coding tutor for a platformer-style educational game.
Analyze the player's code attempt and provide encouraging, specific feedback.
Focus on:
1. What they did correctly
2. What specific action they might be missing
3. Hints about the game mechanics
4. Encouraging tone suitable for learners
Keep responses concise and actionable.";

/// Instructions prepended to hint requests.
const HINT_INSTRUCTIONS: &str = "\
You are a helpful coding tutor providing hints for a platformer-style game.
Based on the current level, objective, and the player's partial code:
1. Provide a gentle nudge in the right direction
2. Explain relevant game mechanics
3. Suggest the next logical step
4. Maintain an encouraging, educational tone
Do not give away the complete solution.";

/// Builds the prompt for an incorrect-submission feedback request.
pub fn feedback_prompt(info: &LevelInfo<'_>, submitted: &[String], expected: &[&str]) -> String {
    format!(
        "{FEEDBACK_INSTRUCTIONS}\n\n\
         Level {}, Objective {}: {}\n\
         Player's code attempt: {submitted:?}\n\
         Correct solution: {expected:?}\n\
         Available actions: {:?}\n\n\
         Provide encouraging feedback explaining what the player did right \
         and what they need to adjust.",
        info.level, info.objective, info.description, info.available_actions,
    )
}

/// Builds the prompt for a hint request.
pub fn hint_prompt(info: &LevelInfo<'_>, partial_code: Option<&[String]>) -> String {
    let code_text = partial_code.map_or_else(
        || "No code submitted yet.".to_string(),
        |code| format!("Current code attempt: {code:?}"),
    );

    format!(
        "{HINT_INSTRUCTIONS}\n\n\
         Level {}, Objective {}: {}\n\
         {code_text}\n\
         Available actions: {:?}\n\n\
         Provide a helpful hint without giving away the complete solution.",
        info.level, info.objective, info.description, info.available_actions,
    )
}

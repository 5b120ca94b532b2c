//! All possible UI actions. Actions are the sole mechanism for state mutation.

use ingresso_core::{Section, SubmitOutcome};

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Focus ──────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,

    // ── Form ───────────────────────────────────────────────────────
    /// Flip the excluded state of a catalog section.
    ToggleSection(Section),
    /// The user asked to start the bot.
    SubmitRequested,
    /// A spawned submission settled with this outcome.
    SubmitSettled(SubmitOutcome),
}

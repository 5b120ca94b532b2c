//! Business logic between `ingresso-api` and the UI.
//!
//! This crate owns everything the booking form does that is not drawing:
//!
//! - **[`Section`]** — the fixed six-entry stadium-section catalog.
//!   Excluded-section sets are typed subsets of it by construction.
//!
//! - **[`BookingDraft`]** — the form-state controller. Field overwrites
//!   and idempotent section toggles, deliberately validation-free.
//!
//! - **[`StatusFeed`]** — the message surface: an ordered feed capped to
//!   the most recent N entries by FIFO truncation. Capacity 1 models the
//!   replaced-single-message surface, capacity 5 the live log.
//!
//! - **[`BookingSession`]** — the unified component: the submission
//!   controller (busy-flag serialized, three-way outcome policy) plus the
//!   optional live status subscriber, parameterized by
//!   [`SessionConfig::live_updates`].

pub mod draft;
pub mod section;
pub mod session;
pub mod status;

// ── Primary re-exports ──────────────────────────────────────────────
pub use draft::{BookingDraft, Field};
pub use section::Section;
pub use session::{BookingSession, SessionConfig, SubmitOutcome};
pub use status::StatusFeed;

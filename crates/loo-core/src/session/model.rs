//! Session state for one visit to the court.

use serde::{Deserialize, Serialize};

use crate::verdict::Verdict;

/// One discrete phase of the interaction. Exactly one is active at a time.
///
/// Transitions are one-directional through the flow; the only way back is
/// the explicit reset from `Verdict` to `Welcome`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Entry screen with the jury preview
    Welcome,
    /// Camera view: capture a photo or skip
    Capturing,
    /// Plea text entry, submit gated on non-empty text
    Pleading,
    /// Submission in flight; the jury is "thinking"
    Deliberating,
    /// Verdict delivered; reset returns to `Welcome`
    Verdict,
}

/// A still image produced by the capture adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    /// Raw JPEG bytes
    pub data: Vec<u8>,
}

impl CapturedImage {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

/// All state for one visit, exclusively owned by the stage controller.
///
/// The transient flags (`is_submitting`, `celebration_active`,
/// `shake_active`) are presentation side effects cleared by timers; they are
/// never persisted anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub stage: Stage,
    pub plea_text: String,
    /// Immutable once set, until reset
    pub captured_image: Option<CapturedImage>,
    /// Session preference; survives reset
    pub demo_mode: bool,
    pub verdict: Option<Verdict>,
    pub is_submitting: bool,
    pub celebration_active: bool,
    pub shake_active: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            stage: Stage::Welcome,
            plea_text: String::new(),
            captured_image: None,
            demo_mode: false,
            verdict: None,
            is_submitting: false,
            celebration_active: false,
            shake_active: false,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

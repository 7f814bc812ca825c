//! Session state machine: model, controller, and presentation views.

pub mod controller;
pub mod model;
pub mod view;

pub use controller::{
    CaptureAdapter, DecisionClient, PleaSubmission, StageController, CELEBRATION_DURATION,
    DELIBERATION_PACING, SHAKE_DURATION,
};
pub use model::{CapturedImage, Session, Stage};
pub use view::{render, CardSlot, JuryCardView, StageView};

//! Pure presentation mapping.
//!
//! [`render`] turns `(stage, session data)` into a per-stage view model and
//! never mutates anything. Frontends decide how to draw a view; the copy,
//! symbols, and badge classification all live here.

use crate::jury::{JurorDefinition, VoteBadge, JURY_BENCH};
use crate::session::model::{Session, Stage};
use crate::verdict::{Outcome, Verdict};

pub const APP_TITLE: &str = "Lucky Loo";
pub const APP_TAGLINE: &str = "The High-Stakes Restroom Finder";
pub const PLEA_PLACEHOLDER: &str =
    "PLEASE! I've been holding it for 3 hours and I'm about to EXPLODE!!";

/// What a juror card shows in its vote slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardSlot {
    /// Dash placeholder: no vote cast
    Placeholder,
    /// Animated placeholder while the court deliberates
    Thinking,
    /// A classified vote; only affirmative or negative votes get a badge,
    /// everything else falls back to [`CardSlot::Placeholder`]
    Badge { badge: VoteBadge, label: String },
}

/// One juror card as displayed on the jury grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JuryCardView {
    pub juror: &'static JurorDefinition,
    pub slot: CardSlot,
}

/// The displayed content for the current stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageView {
    Welcome {
        heading: &'static str,
        intro: &'static str,
        action_label: &'static str,
        demo_mode: bool,
        jury: Vec<JuryCardView>,
    },
    Capturing {
        heading: &'static str,
        hint: &'static str,
        capture_label: &'static str,
        skip_label: &'static str,
    },
    Pleading {
        heading: &'static str,
        hint: &'static str,
        image_attached: bool,
        plea_text: String,
        can_submit: bool,
    },
    Deliberating {
        heading: &'static str,
        hint: &'static str,
        jury: Vec<JuryCardView>,
    },
    Verdict {
        granted: bool,
        banner: &'static str,
        slots: [&'static str; 3],
        roast: String,
        reasoning: String,
        jury: Vec<JuryCardView>,
        celebration_active: bool,
        shake_active: bool,
    },
}

/// The three-symbol decorative indicator under the verdict banner.
///
/// Depends solely on the outcome; the no-result case is unreachable from a
/// normal flow but handled with the neutral symbol anyway.
pub fn slot_symbols(outcome: Option<Outcome>) -> [&'static str; 3] {
    match outcome {
        Some(Outcome::Granted) => ["✅", "✅", "✅"],
        Some(Outcome::Denied) | Some(Outcome::Unknown) => ["❌", "❌", "❌"],
        None => ["🎰", "🎰", "🎰"],
    }
}

fn jury_cards<F>(slot_for: F) -> Vec<JuryCardView>
where
    F: Fn(&'static JurorDefinition) -> CardSlot,
{
    JURY_BENCH
        .iter()
        .map(|juror| JuryCardView {
            juror,
            slot: slot_for(juror),
        })
        .collect()
}

fn verdict_card_slot(juror: &JurorDefinition, verdict: &Verdict) -> CardSlot {
    let vote = verdict.vote_for(juror.id);
    match juror.classify_vote(vote) {
        VoteBadge::NoVote => CardSlot::Placeholder,
        badge => CardSlot::Badge {
            badge,
            label: vote.unwrap_or_default().to_uppercase(),
        },
    }
}

/// Maps the session onto its stage view. Read-only.
pub fn render(session: &Session) -> StageView {
    match session.stage {
        Stage::Welcome => StageView::Welcome {
            heading: "Prove Your Desperation",
            intro: "The AI Jury will analyze your face and plea to decide if you deserve access.",
            action_label: "I Need To Go",
            demo_mode: session.demo_mode,
            jury: jury_cards(|_| CardSlot::Placeholder),
        },
        Stage::Capturing => StageView::Capturing {
            heading: "Show Your Face",
            hint: "The Skeptic will analyze your expression",
            capture_label: "Capture Photo",
            skip_label: "Skip Photo",
        },
        Stage::Pleading => StageView::Pleading {
            heading: "State Your Case",
            hint: "Make it desperate. The Doctor is listening.",
            image_attached: session.captured_image.is_some(),
            plea_text: session.plea_text.clone(),
            can_submit: !session.is_submitting && !session.plea_text.trim().is_empty(),
        },
        Stage::Deliberating => StageView::Deliberating {
            heading: "Court is Deliberating",
            hint: "The jury is reviewing your case...",
            jury: jury_cards(|_| CardSlot::Thinking),
        },
        Stage::Verdict => {
            let outcome = session.verdict.as_ref().map(|v| v.outcome);
            let granted = outcome == Some(Outcome::Granted);
            StageView::Verdict {
                granted,
                banner: if granted {
                    "Access Granted!"
                } else {
                    "Access Denied"
                },
                slots: slot_symbols(outcome),
                roast: session
                    .verdict
                    .as_ref()
                    .map(|v| v.roast.clone())
                    .unwrap_or_default(),
                reasoning: session
                    .verdict
                    .as_ref()
                    .map(|v| v.reasoning.clone())
                    .unwrap_or_default(),
                jury: match session.verdict.as_ref() {
                    Some(verdict) => jury_cards(|juror| verdict_card_slot(juror, verdict)),
                    None => jury_cards(|_| CardSlot::Placeholder),
                },
                celebration_active: session.celebration_active,
                shake_active: session.shake_active,
            }
        }
    }
}

//! The stage controller.
//!
//! Owns the [`Session`], enforces the stage transition graph, and
//! orchestrates the two external collaborators: the capture adapter and the
//! decision client. Every mutation of session state goes through here;
//! everything else only reads snapshots.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::session::model::{CapturedImage, Session, Stage};
use crate::session::view::{render, StageView};
use crate::verdict::Verdict;

/// Minimum visible deliberation, applied strictly after a successful
/// response. Total deliberation time is network round-trip plus this
/// pacing floor; a failed exchange skips it.
pub const DELIBERATION_PACING: Duration = Duration::from_millis(2500);

/// How long the celebration effect stays active after a granted verdict.
pub const CELEBRATION_DURATION: Duration = Duration::from_secs(5);

/// How long the negative jolt stays active after any other verdict.
pub const SHAKE_DURATION: Duration = Duration::from_millis(400);

/// The payload handed to the decision service.
#[derive(Debug, Clone)]
pub struct PleaSubmission {
    pub plea: String,
    pub image: Option<CapturedImage>,
    pub demo_mode: bool,
}

/// The remote decision service boundary.
///
/// Implementations live outside the core; the controller only needs a single
/// request/response exchange that either yields a verdict or fails.
#[async_trait]
pub trait DecisionClient: Send + Sync {
    /// Sends a submission to the court and awaits the verdict payload.
    async fn judge(&self, submission: PleaSubmission) -> Result<Verdict>;
}

/// On-demand still image capability.
pub trait CaptureAdapter: Send + Sync {
    /// Returns a still image, or `None` if no image is available.
    fn capture(&self) -> Result<Option<CapturedImage>>;
}

/// Drives a single visit through the court.
///
/// The controller is cheap to clone; clones share the same session. Effect
/// timers spawned for the transient celebration/shake flags capture the
/// session epoch at spawn time, so a timer that outlives a reset becomes a
/// no-op instead of reactivating an effect on a session it no longer
/// applies to.
#[derive(Clone)]
pub struct StageController {
    session: Arc<RwLock<Session>>,
    /// Bumped on reset and on every verdict delivery; stale timers compare
    /// against it before touching the session.
    epoch: Arc<AtomicU64>,
}

impl StageController {
    pub fn new() -> Self {
        Self {
            session: Arc::new(RwLock::new(Session::new())),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns a read-only snapshot of the current session state.
    pub async fn snapshot(&self) -> Session {
        self.session.read().await.clone()
    }

    /// Renders the current session into its per-stage view model.
    pub async fn view(&self) -> StageView {
        render(&*self.session.read().await)
    }

    /// `Welcome -> Capturing`. No precondition beyond being on `Welcome`.
    pub async fn begin(&self) {
        let mut session = self.session.write().await;
        if session.stage != Stage::Welcome {
            return;
        }
        session.stage = Stage::Capturing;
        tracing::debug!("entering capture stage");
    }

    /// `Capturing -> Pleading` with an image from the capture adapter.
    ///
    /// Stays on `Capturing` if the adapter yields nothing or fails; returns
    /// whether the stage advanced.
    pub async fn capture_photo(&self, adapter: &dyn CaptureAdapter) -> bool {
        let mut session = self.session.write().await;
        if session.stage != Stage::Capturing {
            return false;
        }
        match adapter.capture() {
            Ok(Some(image)) => {
                tracing::debug!(bytes = image.data.len(), "photo captured");
                session.captured_image = Some(image);
                session.stage = Stage::Pleading;
                true
            }
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(%err, "capture failed, staying on capture stage");
                false
            }
        }
    }

    /// `Capturing -> Pleading` without an image.
    pub async fn skip_capture(&self) {
        let mut session = self.session.write().await;
        if session.stage != Stage::Capturing {
            return;
        }
        session.captured_image = None;
        session.stage = Stage::Pleading;
    }

    /// Updates the plea text while on the pleading stage.
    pub async fn set_plea(&self, text: impl Into<String>) {
        let mut session = self.session.write().await;
        if session.stage != Stage::Pleading {
            return;
        }
        session.plea_text = text.into();
    }

    /// Toggles the demo-mode session preference. Conventionally set before
    /// submission; not cleared by reset.
    pub async fn set_demo_mode(&self, enabled: bool) {
        self.session.write().await.demo_mode = enabled;
    }

    /// True when the submit action should be enabled: on the pleading stage
    /// with a non-empty trimmed plea and no submission in flight.
    pub async fn can_submit(&self) -> bool {
        let session = self.session.read().await;
        session.stage == Stage::Pleading
            && !session.is_submitting
            && !session.plea_text.trim().is_empty()
    }

    /// `Pleading -> Deliberating -> Verdict`: the full submission protocol.
    ///
    /// A no-op unless the session is on `Pleading` with a non-empty trimmed
    /// plea and no submission already in flight. The network call has no
    /// timeout; any failure of the exchange is absorbed into the offline
    /// fallback verdict, never surfaced as an error.
    pub async fn submit(&self, client: &dyn DecisionClient) {
        let submission = {
            let mut session = self.session.write().await;
            if session.stage != Stage::Pleading || session.is_submitting {
                return;
            }
            if session.plea_text.trim().is_empty() {
                return;
            }
            session.is_submitting = true;
            session.stage = Stage::Deliberating;
            PleaSubmission {
                plea: session.plea_text.clone(),
                image: session.captured_image.clone(),
                demo_mode: session.demo_mode,
            }
        };

        tracing::info!(
            demo_mode = submission.demo_mode,
            has_image = submission.image.is_some(),
            "submitting plea to the court"
        );

        let verdict = match client.judge(submission).await {
            Ok(verdict) => {
                // Pacing floor applies strictly after a successful response;
                // total deliberation time is round-trip plus the floor.
                tokio::time::sleep(DELIBERATION_PACING).await;
                verdict
            }
            Err(err) => {
                tracing::warn!(%err, "court unreachable, delivering offline verdict");
                Verdict::offline()
            }
        };

        self.deliver_verdict(verdict).await;
    }

    /// `Verdict -> Welcome`. Clears case data, keeps the demo preference,
    /// and invalidates any outstanding effect timers.
    pub async fn reset(&self) {
        let mut session = self.session.write().await;
        if session.stage != Stage::Verdict {
            return;
        }
        self.epoch.fetch_add(1, Ordering::SeqCst);
        session.stage = Stage::Welcome;
        session.plea_text.clear();
        session.captured_image = None;
        session.verdict = None;
        session.celebration_active = false;
        session.shake_active = false;
        tracing::debug!("session reset");
    }

    /// `Deliberating -> Verdict`: records the result and fires exactly one
    /// of the two transient effects, with a scoped auto-deactivation timer.
    async fn deliver_verdict(&self, verdict: Verdict) {
        let granted = verdict.outcome.is_granted();
        tracing::info!(outcome = ?verdict.outcome, "verdict delivered");

        let epoch = {
            let mut session = self.session.write().await;
            session.verdict = Some(verdict);
            session.is_submitting = false;
            session.stage = Stage::Verdict;
            // Mutually exclusive: a new verdict restarts the matching
            // effect and kills the other.
            session.celebration_active = granted;
            session.shake_active = !granted;
            self.epoch.fetch_add(1, Ordering::SeqCst) + 1
        };

        let duration = if granted {
            CELEBRATION_DURATION
        } else {
            SHAKE_DURATION
        };
        let session = Arc::clone(&self.session);
        let epoch_counter = Arc::clone(&self.epoch);
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let mut session = session.write().await;
            // Reset bumped the epoch under the same lock; a stale timer
            // must not touch a session it no longer applies to.
            if epoch_counter.load(Ordering::SeqCst) != epoch {
                return;
            }
            if granted {
                session.celebration_active = false;
            } else {
                session.shake_active = false;
            }
        });
    }
}

impl Default for StageController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LooError;
    use crate::jury::{juror_by_id, VoteBadge};
    use crate::verdict::{Outcome, OFFLINE_ROAST};
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;

    struct MockDecisionClient {
        response: Result<Verdict>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl MockDecisionClient {
        fn responding(response: Result<Verdict>) -> Self {
            Self {
                response,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }

        fn granted(votes: &[(&str, &str)]) -> Self {
            let jury_votes: HashMap<String, String> = votes
                .iter()
                .map(|(id, vote)| (id.to_string(), vote.to_string()))
                .collect();
            Self::responding(Ok(Verdict {
                outcome: Outcome::Granted,
                reasoning: "Desperation confirmed.".to_string(),
                roast: "Fine, go.".to_string(),
                jury_votes,
            }))
        }

        fn denied() -> Self {
            Self::responding(Ok(Verdict {
                outcome: Outcome::Denied,
                reasoning: "Not buying it.".to_string(),
                roast: "Hold it.".to_string(),
                jury_votes: HashMap::new(),
            }))
        }

        fn failing() -> Self {
            Self::responding(Err(LooError::transport("connection refused")))
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DecisionClient for MockDecisionClient {
        async fn judge(&self, _submission: PleaSubmission) -> Result<Verdict> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.response.clone()
        }
    }

    struct StubCapture(Result<Option<CapturedImage>>);

    impl CaptureAdapter for StubCapture {
        fn capture(&self) -> Result<Option<CapturedImage>> {
            self.0.clone()
        }
    }

    async fn pleading_controller(plea: &str) -> StageController {
        let controller = StageController::new();
        controller.begin().await;
        controller.skip_capture().await;
        controller.set_plea(plea).await;
        controller
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_plea_blocks_submission() {
        let controller = pleading_controller("").await;
        let client = MockDecisionClient::granted(&[]);

        controller.submit(&client).await;

        assert_eq!(controller.snapshot().await.stage, Stage::Pleading);
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_whitespace_plea_blocks_submission() {
        let controller = pleading_controller("   \n\t ").await;
        let client = MockDecisionClient::granted(&[]);

        controller.submit(&client).await;

        assert_eq!(controller.snapshot().await.stage, Stage::Pleading);
        assert_eq!(client.calls(), 0);
        assert!(!controller.can_submit().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_granted_verdict_triggers_celebration() {
        let controller = pleading_controller("I am DESPERATE").await;
        let client = MockDecisionClient::granted(&[("skeptic", "real")]);

        controller.submit(&client).await;

        let session = controller.snapshot().await;
        assert_eq!(session.stage, Stage::Verdict);
        assert!(session.celebration_active);
        assert!(!session.shake_active);
        assert!(!session.is_submitting);

        let verdict = session.verdict.expect("verdict should be present");
        assert_eq!(verdict.outcome, Outcome::Granted);
        // Case-insensitive against the skeptic's "REAL" vocabulary
        let skeptic = juror_by_id("skeptic").unwrap();
        assert_eq!(
            skeptic.classify_vote(verdict.vote_for("skeptic")),
            VoteBadge::Affirmative
        );

        // Celebration auto-clears within its fixed duration
        tokio::time::sleep(CELEBRATION_DURATION + Duration::from_secs(1)).await;
        assert!(!controller.snapshot().await.celebration_active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_denied_verdict_triggers_shake_not_celebration() {
        let controller = pleading_controller("please").await;
        let client = MockDecisionClient::denied();

        controller.submit(&client).await;

        let session = controller.snapshot().await;
        assert!(session.shake_active);
        assert!(!session.celebration_active);

        tokio::time::sleep(SHAKE_DURATION + Duration::from_millis(100)).await;
        assert!(!controller.snapshot().await.shake_active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_submission_observes_pacing_floor() {
        let controller = pleading_controller("so close").await;
        let before = tokio::time::Instant::now();

        controller.submit(&MockDecisionClient::granted(&[])).await;

        assert!(before.elapsed() >= DELIBERATION_PACING);
        assert_eq!(controller.snapshot().await.stage, Stage::Verdict);
    }

    #[tokio::test(start_paused = true)]
    async fn test_offline_verdict_skips_pacing_floor() {
        let controller = pleading_controller("HELP").await;
        let before = tokio::time::Instant::now();

        controller.submit(&MockDecisionClient::failing()).await;

        // The fallback is exposed as soon as the exchange fails; nothing
        // on the failure path waits on the clock.
        assert_eq!(tokio::time::Instant::now(), before);
        assert_eq!(controller.snapshot().await.stage, Stage::Verdict);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_submission_yields_offline_verdict() {
        let controller = pleading_controller("HELP").await;
        let client = MockDecisionClient::failing();

        controller.submit(&client).await;

        let session = controller.snapshot().await;
        assert_eq!(session.stage, Stage::Verdict);
        assert!(session.shake_active);
        assert_eq!(session.verdict, Some(Verdict::offline()));
        assert_eq!(session.verdict.unwrap().roast, OFFLINE_ROAST);
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_one_submission_in_flight() {
        let controller = pleading_controller("let me in").await;
        let client =
            Arc::new(MockDecisionClient::granted(&[]).with_delay(Duration::from_secs(30)));

        let background = controller.clone();
        let background_client = Arc::clone(&client);
        let handle =
            tokio::spawn(async move { background.submit(background_client.as_ref()).await });

        // Let the first submission take the gate
        tokio::task::yield_now().await;
        assert!(controller.snapshot().await.is_submitting);

        // Second trigger while in flight is inert
        controller.submit(client.as_ref()).await;
        assert_eq!(client.calls(), 1);

        handle.await.unwrap();
        assert_eq!(client.calls(), 1);
        assert_eq!(controller.snapshot().await.stage, Stage::Verdict);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_case_data_but_keeps_demo_mode() {
        let controller = pleading_controller("I really need this").await;
        controller.set_demo_mode(true).await;
        controller.submit(&MockDecisionClient::granted(&[])).await;

        controller.reset().await;

        let session = controller.snapshot().await;
        assert_eq!(session.stage, Stage::Welcome);
        assert!(session.plea_text.is_empty());
        assert!(session.captured_image.is_none());
        assert!(session.verdict.is_none());
        assert!(session.demo_mode);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_effect_timer_is_inert_after_reset() {
        let controller = pleading_controller("victory lap").await;
        controller.submit(&MockDecisionClient::granted(&[])).await;
        assert!(controller.snapshot().await.celebration_active);

        // Reset while the 5s celebration timer is still pending
        controller.reset().await;
        assert!(!controller.snapshot().await.celebration_active);

        tokio::time::sleep(CELEBRATION_DURATION + Duration::from_secs(1)).await;
        let session = controller.snapshot().await;
        assert_eq!(session.stage, Stage::Welcome);
        assert!(!session.celebration_active);
        assert!(!session.shake_active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_outside_verdict_stage_is_a_no_op() {
        let controller = pleading_controller("not yet").await;
        controller.reset().await;
        assert_eq!(controller.snapshot().await.stage, Stage::Pleading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_capture_stores_image_and_advances() {
        let controller = StageController::new();
        controller.begin().await;

        let adapter = StubCapture(Ok(Some(CapturedImage::new(vec![0xff, 0xd8, 0xff]))));
        assert!(controller.capture_photo(&adapter).await);

        let session = controller.snapshot().await;
        assert_eq!(session.stage, Stage::Pleading);
        assert_eq!(
            session.captured_image,
            Some(CapturedImage::new(vec![0xff, 0xd8, 0xff]))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_capture_absence_stays_on_capture_stage() {
        let controller = StageController::new();
        controller.begin().await;

        assert!(!controller.capture_photo(&StubCapture(Ok(None))).await);
        assert_eq!(controller.snapshot().await.stage, Stage::Capturing);

        assert!(
            !controller
                .capture_photo(&StubCapture(Err(LooError::io("no camera"))))
                .await
        );
        assert_eq!(controller.snapshot().await.stage, Stage::Capturing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_capture_advances_without_image() {
        let controller = StageController::new();
        controller.begin().await;
        controller.skip_capture().await;

        let session = controller.snapshot().await;
        assert_eq!(session.stage, Stage::Pleading);
        assert!(session.captured_image.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_actions_outside_their_stage_are_no_ops() {
        let controller = StageController::new();

        // Capture and plea actions do not apply on Welcome
        controller.skip_capture().await;
        controller.set_plea("too early").await;
        let session = controller.snapshot().await;
        assert_eq!(session.stage, Stage::Welcome);
        assert!(session.plea_text.is_empty());

        // begin is only valid from Welcome
        controller.begin().await;
        controller.begin().await;
        assert_eq!(controller.snapshot().await.stage, Stage::Capturing);
    }
}

//! Verdict value objects returned by the court.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::jury::JURY_BENCH;

/// Fixed reasoning text used when the court cannot be reached.
pub const OFFLINE_REASONING: &str = "Connection error";

/// Fixed roast text used when the court cannot be reached.
pub const OFFLINE_ROAST: &str = "The court is offline.";

/// Sentinel vote label assigned to every juror on the offline fallback.
pub const ERROR_VOTE: &str = "ERROR";

/// The court's decision.
///
/// Anything the wire carries other than `GRANTED`/`DENIED` decodes into
/// `Unknown` so a misbehaving service can never break decoding; it is
/// rendered like a denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Granted,
    Denied,
    Unknown,
}

impl Outcome {
    /// Maps a wire label onto an outcome. Unseen labels become `Unknown`
    /// rather than a decode error.
    pub fn from_wire(label: &str) -> Self {
        match label {
            "GRANTED" => Self::Granted,
            "DENIED" => Self::Denied,
            _ => Self::Unknown,
        }
    }

    /// True only for an explicit `GRANTED` outcome.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl<'de> Deserialize<'de> for Outcome {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&label))
    }
}

/// The full decision payload delivered at the end of deliberation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub outcome: Outcome,
    /// Explanation of the decision
    pub reasoning: String,
    /// Flavor commentary from the Pit Boss
    pub roast: String,
    /// Raw vote label per juror id
    pub jury_votes: HashMap<String, String>,
}

impl Verdict {
    /// The fallback verdict used when the submission exchange fails.
    ///
    /// Every known juror is mapped to the `ERROR` sentinel so the cards
    /// render as no-vote.
    pub fn offline() -> Self {
        Self {
            outcome: Outcome::Denied,
            reasoning: OFFLINE_REASONING.to_string(),
            roast: OFFLINE_ROAST.to_string(),
            jury_votes: JURY_BENCH
                .iter()
                .map(|juror| (juror.id.to_string(), ERROR_VOTE.to_string()))
                .collect(),
        }
    }

    /// Returns the raw vote label for a juror, if the court recorded one.
    pub fn vote_for(&self, juror_id: &str) -> Option<&str> {
        self.jury_votes.get(juror_id).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_decodes_wire_labels() {
        assert_eq!(
            serde_json::from_str::<Outcome>("\"GRANTED\"").unwrap(),
            Outcome::Granted
        );
        assert_eq!(
            serde_json::from_str::<Outcome>("\"DENIED\"").unwrap(),
            Outcome::Denied
        );
    }

    #[test]
    fn test_unseen_outcome_decodes_to_unknown() {
        assert_eq!(
            serde_json::from_str::<Outcome>("\"MISTRIAL\"").unwrap(),
            Outcome::Unknown
        );
        assert!(!Outcome::Unknown.is_granted());
    }

    #[test]
    fn test_offline_fallback_shape() {
        let verdict = Verdict::offline();
        assert_eq!(verdict.outcome, Outcome::Denied);
        assert_eq!(verdict.reasoning, OFFLINE_REASONING);
        assert_eq!(verdict.roast, OFFLINE_ROAST);
        for juror in &JURY_BENCH {
            assert_eq!(verdict.vote_for(juror.id), Some(ERROR_VOTE));
        }
    }
}

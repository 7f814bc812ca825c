//! The jury bench.
//!
//! The court seats a fixed bench of three jurors. Each juror votes with its
//! own vocabulary: the words that count as an affirmative or negative vote
//! differ per juror, so badge classification is driven by the definition
//! rather than special-cased per juror.

/// A system-defined member of the jury.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JurorDefinition {
    /// Stable identifier, used as the key in verdict vote maps
    pub id: &'static str,
    /// Display name of the juror
    pub name: &'static str,
    /// Icon shown on the juror's card
    pub icon: &'static str,
    /// One-line description of what the juror evaluates
    pub description: &'static str,
    /// The vote label that counts as an affirmative vote for this juror
    pub yes_label: &'static str,
    /// The vote label that counts as a negative vote for this juror
    pub no_label: &'static str,
}

/// How a juror's vote renders on its card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteBadge {
    /// The vote matched the juror's affirmative label
    Affirmative,
    /// The vote matched the juror's negative label
    Negative,
    /// No vote cast: missing, or a label outside the juror's vocabulary
    /// (including sentinels like "UNKNOWN" or "ERROR")
    NoVote,
}

impl JurorDefinition {
    /// Classifies a raw vote label against this juror's vocabulary.
    ///
    /// Comparison is case-insensitive. Anything that is not exactly this
    /// juror's yes or no label renders as no-vote, never as an error.
    pub fn classify_vote(&self, vote: Option<&str>) -> VoteBadge {
        let Some(vote) = vote else {
            return VoteBadge::NoVote;
        };
        let vote = vote.trim();
        if vote.eq_ignore_ascii_case(self.yes_label) {
            VoteBadge::Affirmative
        } else if vote.eq_ignore_ascii_case(self.no_label) {
            VoteBadge::Negative
        } else {
            VoteBadge::NoVote
        }
    }
}

/// The official bench, defined once at process start.
pub const JURY_BENCH: [JurorDefinition; 3] = [
    JurorDefinition {
        id: "skeptic",
        name: "The Skeptic",
        icon: "🕵️",
        description: "Analyzes your face",
        yes_label: "REAL",
        no_label: "FAKE",
    },
    JurorDefinition {
        id: "doctor",
        name: "The Doctor",
        icon: "👨‍⚕️",
        description: "Evaluates urgency",
        yes_label: "CRITICAL",
        no_label: "STABLE",
    },
    JurorDefinition {
        id: "gambler",
        name: "The Gambler",
        icon: "🎲",
        description: "Tests your luck",
        yes_label: "IN",
        no_label: "OUT",
    },
];

/// Looks up a juror definition by its stable identifier.
pub fn juror_by_id(id: &str) -> Option<&'static JurorDefinition> {
    JURY_BENCH.iter().find(|juror| juror.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skeptic() -> &'static JurorDefinition {
        juror_by_id("skeptic").unwrap()
    }

    #[test]
    fn test_yes_label_classifies_affirmative() {
        assert_eq!(
            skeptic().classify_vote(Some("REAL")),
            VoteBadge::Affirmative
        );
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        assert_eq!(
            skeptic().classify_vote(Some("real")),
            VoteBadge::Affirmative
        );
        assert_eq!(skeptic().classify_vote(Some("Fake")), VoteBadge::Negative);
    }

    #[test]
    fn test_vocabulary_differs_per_juror() {
        let doctor = juror_by_id("doctor").unwrap();
        assert_eq!(
            doctor.classify_vote(Some("CRITICAL")),
            VoteBadge::Affirmative
        );
        // The Skeptic's affirmative word means nothing to the Doctor
        assert_eq!(doctor.classify_vote(Some("REAL")), VoteBadge::NoVote);
    }

    #[test]
    fn test_sentinels_render_as_no_vote() {
        assert_eq!(skeptic().classify_vote(Some("UNKNOWN")), VoteBadge::NoVote);
        assert_eq!(skeptic().classify_vote(Some("ERROR")), VoteBadge::NoVote);
        assert_eq!(skeptic().classify_vote(None), VoteBadge::NoVote);
    }

    #[test]
    fn test_bench_has_unique_ids() {
        for juror in &JURY_BENCH {
            assert_eq!(
                JURY_BENCH.iter().filter(|j| j.id == juror.id).count(),
                1,
                "duplicate juror id {}",
                juror.id
            );
        }
    }
}

//! ReportBuilder - final scores plus narrative, with template fallback.

use std::sync::Arc;
use std::time::Duration;

use super::with_deadline;
use crate::domain::training::{NarrativeSource, ReportScores, Turn};
use crate::ports::{CapabilityError, CounterpartGenerator};

/// Report contents ready to be committed to the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    pub scores: ReportScores,
    pub narrative: String,
    pub source: NarrativeSource,
}

pub struct ReportBuilder {
    generator: Arc<dyn CounterpartGenerator>,
    timeout: Duration,
}

impl ReportBuilder {
    pub fn new(generator: Arc<dyn CounterpartGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Never fails: narrative problems fall back to the canned template.
    pub async fn build(&self, transcript: &[Turn], scores: ReportScores) -> ReportDraft {
        let generated = with_deadline(self.timeout, self.generator.generate_narrative(transcript, &scores))
            .await
            .and_then(|text| {
                let text = text.trim().to_string();
                if text.is_empty() {
                    Err(CapabilityError::invalid_response("empty narrative"))
                } else {
                    Ok(text)
                }
            });

        match generated {
            Ok(narrative) => ReportDraft {
                scores,
                narrative,
                source: NarrativeSource::Generated,
            },
            Err(e) => {
                tracing::warn!("Narrative generation failed, using template: {}", e);
                ReportDraft {
                    narrative: scores.fallback_narrative(),
                    scores,
                    source: NarrativeSource::Fallback,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::capabilities::ScriptedCounterpart;
    use crate::domain::training::{test_support::sales_scenario, GoalChecklist, Rubric};

    fn scores() -> ReportScores {
        let scenario = sales_scenario();
        ReportScores::aggregate(
            &scenario,
            &Rubric::new(&scenario.rubric_dimension_labels),
            &GoalChecklist::from_specs(&scenario.goals),
        )
    }

    #[tokio::test]
    async fn uses_generated_narrative() {
        let generator = Arc::new(ScriptedCounterpart::new().with_narrative("Strong opening."));
        let builder = ReportBuilder::new(generator, Duration::from_secs(1));

        let draft = builder.build(&[], scores()).await;
        assert_eq!(draft.narrative, "Strong opening.");
        assert_eq!(draft.source, NarrativeSource::Generated);
    }

    #[tokio::test]
    async fn falls_back_when_generation_fails() {
        let generator = Arc::new(
            ScriptedCounterpart::new().with_narrative_error(CapabilityError::unavailable("down")),
        );
        let builder = ReportBuilder::new(generator, Duration::from_secs(1));

        let scores = scores();
        let draft = builder.build(&[], scores.clone()).await;
        assert_eq!(draft.source, NarrativeSource::Fallback);
        assert_eq!(draft.narrative, scores.fallback_narrative());
    }

    #[tokio::test]
    async fn falls_back_on_blank_narrative() {
        let generator = Arc::new(ScriptedCounterpart::new().with_narrative("   "));
        let builder = ReportBuilder::new(generator, Duration::from_secs(1));

        let draft = builder.build(&[], scores()).await;
        assert_eq!(draft.source, NarrativeSource::Fallback);
    }

    #[tokio::test(start_paused = true)]
    async fn falls_back_on_timeout() {
        let generator = Arc::new(
            ScriptedCounterpart::new()
                .with_narrative("Too late")
                .with_delay(Duration::from_secs(60)),
        );
        let builder = ReportBuilder::new(generator, Duration::from_secs(2));

        let draft = builder.build(&[], scores()).await;
        assert_eq!(draft.source, NarrativeSource::Fallback);
    }
}

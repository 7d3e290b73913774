//! LLM-backed training capabilities over the [`AIProvider`] port.
//!
//! One provider serves all three capabilities. Each call is tagged with a
//! [`RequestPurpose`] so logs and the mock provider can tell them apart.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::domain::training::{GoalSpec, ReportScores, ScenarioConfig, Sender, Turn};
use crate::ports::{
    AIProvider, CapabilityError, CompletionRequest, CounterpartGenerator, GoalClassifier,
    Message, MessageRole, RawTurnScore, RequestMetadata, RequestPurpose, TurnScorer,
};

/// Placeholder user message so the conversation opens on the trainee side.
const CALL_CONNECTED: &str = "[The trainee joins the call.]";

pub struct LlmCapabilities {
    provider: Arc<dyn AIProvider>,
}

impl LlmCapabilities {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self { provider }
    }

    fn metadata(purpose: RequestPurpose) -> RequestMetadata {
        RequestMetadata::new(purpose, uuid::Uuid::new_v4().to_string())
    }

    async fn ask(&self, request: CompletionRequest) -> Result<String, CapabilityError> {
        let purpose = request.metadata.purpose;
        let response = self.provider.complete(request).await?;
        tracing::debug!(
            purpose = %purpose,
            model = %response.model,
            tokens = response.usage.total_tokens,
            "capability completion"
        );
        Ok(response.content)
    }
}

// ───────────────────────────────────────────────────────────────────────────────
// Prompts
// ───────────────────────────────────────────────────────────────────────────────

fn counterpart_system_prompt(scenario: &ScenarioConfig) -> String {
    let mut prompt = String::new();
    match &scenario.persona {
        Some(persona) => {
            let _ = write!(prompt, "You are {}, {}.", persona.name, persona.job_title);
            if !persona.personality.is_empty() {
                let _ = write!(prompt, " Personality: {}.", persona.personality.join(", "));
            }
            if let Some(description) = &persona.description {
                let _ = write!(prompt, " {}", description);
            }
        }
        None => prompt.push_str("You are the customer in a sales conversation."),
    }
    let _ = write!(
        prompt,
        "\n\nYou are role-playing the scenario \"{}\" with a trainee. Stay in character, \
         never coach or reveal that this is training, and answer in one to three sentences.",
        scenario.title
    );
    prompt
}

/// Maps the transcript to chat messages from the counterpart's point of view.
fn counterpart_messages(transcript: &[Turn]) -> Vec<Message> {
    let mut messages: Vec<Message> = transcript
        .iter()
        .filter_map(|turn| match turn.sender() {
            Sender::Trainee => Some(Message::user(turn.text())),
            Sender::Counterpart => Some(Message::assistant(turn.text())),
            Sender::System => None,
        })
        .collect();

    if messages.first().map_or(true, |m| m.role != MessageRole::User) {
        messages.insert(0, Message::user(CALL_CONNECTED));
    }
    messages
}

fn render_transcript(transcript: &[Turn]) -> String {
    transcript
        .iter()
        .map(|turn| {
            let speaker = match turn.sender() {
                Sender::Trainee => "Trainee",
                Sender::Counterpart => "Counterpart",
                Sender::System => "Briefing",
            };
            format!("{}: {}", speaker, turn.text())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn scoring_prompt(labels: &[String]) -> String {
    format!(
        "You are a sales coach scoring the trainee's latest turn in a role-play. \
         Respond with JSON only: {{\"score\": <0-100>, \"tips\": [<up to 2 short tips>], \
         \"dimensions\": {{<label>: <0-100>}}}}. Score these dimensions: {}.",
        labels.join(", ")
    )
}

#[derive(Debug, Deserialize)]
struct ScoreReply {
    score: f64,
    #[serde(default)]
    tips: Vec<String>,
    #[serde(default)]
    dimensions: BTreeMap<String, f64>,
}

/// Parses the first JSON object in `content`, tolerating prose or code fences
/// around it.
fn parse_score(content: &str) -> Result<RawTurnScore, CapabilityError> {
    let start = content.find('{');
    let end = content.rfind('}');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &content[start..=end],
        _ => return Err(CapabilityError::invalid_response("no JSON object in score reply")),
    };

    let reply: ScoreReply = serde_json::from_str(json)
        .map_err(|e| CapabilityError::invalid_response(format!("bad score JSON: {}", e)))?;

    Ok(RawTurnScore {
        raw_score: reply.score,
        tips: reply.tips,
        dimension_scores: reply.dimensions,
    })
}

fn parse_verdict(content: &str) -> Result<bool, CapabilityError> {
    let answer = content.trim().to_ascii_uppercase();
    if answer.starts_with("YES") {
        Ok(true)
    } else if answer.starts_with("NO") {
        Ok(false)
    } else {
        Err(CapabilityError::invalid_response(format!(
            "expected YES or NO, got '{}'",
            content.trim()
        )))
    }
}

fn narrative_prompt(scores: &ReportScores) -> String {
    let mut prompt = format!(
        "Write a short coaching summary (3-5 sentences, second person) of this role-play. \
         Overall score {}/100, pass mark {}, {}.\nDimensions:",
        scores.overall_score,
        scores.pass_threshold,
        if scores.passed { "passed" } else { "not passed" }
    );
    for dimension in &scores.dimensions {
        let _ = write!(prompt, "\n- {}: {}", dimension.label, dimension.score);
    }
    prompt.push_str("\nGoals:");
    for goal in &scores.goals {
        let mark = if goal.is_done() { "done" } else { "open" };
        let _ = write!(prompt, "\n- {} ({})", goal.description(), mark);
    }
    prompt
}

// ───────────────────────────────────────────────────────────────────────────────
// Capability impls
// ───────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl CounterpartGenerator for LlmCapabilities {
    async fn generate_counterpart_turn(
        &self,
        transcript: &[Turn],
        scenario: &ScenarioConfig,
    ) -> Result<String, CapabilityError> {
        let mut request = CompletionRequest::new(
            Self::metadata(RequestPurpose::CounterpartTurn).with_scenario(scenario.scenario_id.clone()),
        )
        .with_system_prompt(counterpart_system_prompt(scenario))
        .with_max_tokens(300)
        .with_temperature(0.8);
        request.messages = counterpart_messages(transcript);

        self.ask(request).await
    }

    async fn generate_narrative(
        &self,
        transcript: &[Turn],
        scores: &ReportScores,
    ) -> Result<String, CapabilityError> {
        let request = CompletionRequest::new(Self::metadata(RequestPurpose::Narrative))
            .with_system_prompt(narrative_prompt(scores))
            .with_message(MessageRole::User, render_transcript(transcript))
            .with_max_tokens(500)
            .with_temperature(0.5);

        self.ask(request).await
    }
}

#[async_trait]
impl TurnScorer for LlmCapabilities {
    async fn score_turn(
        &self,
        transcript: &[Turn],
        turn: &Turn,
        labels: &[String],
    ) -> Result<RawTurnScore, CapabilityError> {
        let content = format!(
            "{}\n\nScore this trainee turn:\n{}",
            render_transcript(transcript),
            turn.text()
        );
        let request = CompletionRequest::new(Self::metadata(RequestPurpose::TurnScore))
            .with_system_prompt(scoring_prompt(labels))
            .with_message(MessageRole::User, content)
            .with_max_tokens(400)
            .with_temperature(0.0);

        parse_score(&self.ask(request).await?)
    }
}

#[async_trait]
impl GoalClassifier for LlmCapabilities {
    async fn is_satisfied(
        &self,
        transcript: &[Turn],
        goal: &GoalSpec,
    ) -> Result<bool, CapabilityError> {
        let request = CompletionRequest::new(Self::metadata(RequestPurpose::GoalCheck))
            .with_system_prompt(format!(
                "Has the trainee achieved this goal in the conversation so far: \"{}\"? \
                 Answer YES or NO only.",
                goal.description
            ))
            .with_message(MessageRole::User, render_transcript(transcript))
            .with_max_tokens(5)
            .with_temperature(0.0);

        parse_verdict(&self.ask(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::training::{test_support::sales_scenario, Persona, Transcript};

    fn transcript() -> Transcript {
        let mut transcript = Transcript::new();
        transcript.append_system("Scenario Started");
        transcript.append_counterpart("What makes you different?", None);
        transcript.append_trainee("Our integration takes days, not weeks.");
        transcript
    }

    mod parsing {
        use super::*;

        #[test]
        fn score_json_inside_code_fence() {
            let raw = parse_score(
                "```json\n{\"score\": 88, \"tips\": [\"Ask about budget\"], \"dimensions\": {\"Logic\": 90}}\n```",
            )
            .unwrap();

            assert_eq!(raw.raw_score, 88.0);
            assert_eq!(raw.tips, vec!["Ask about budget".to_string()]);
            assert_eq!(raw.dimension_scores.get("Logic"), Some(&90.0));
        }

        #[test]
        fn score_without_json_is_invalid() {
            assert!(matches!(
                parse_score("Great turn!"),
                Err(CapabilityError::InvalidResponse(_))
            ));
            assert!(matches!(
                parse_score("{\"tips\": []}"),
                Err(CapabilityError::InvalidResponse(_))
            ));
        }

        #[test]
        fn verdicts() {
            assert_eq!(parse_verdict(" yes."), Ok(true));
            assert_eq!(parse_verdict("NO"), Ok(false));
            assert!(parse_verdict("maybe").is_err());
        }
    }

    mod prompts {
        use super::*;

        #[test]
        fn counterpart_messages_open_with_user() {
            let messages = counterpart_messages(transcript().turns());

            assert_eq!(messages.len(), 3);
            assert_eq!(messages[0].content, CALL_CONNECTED);
            assert_eq!(messages[1].role, MessageRole::Assistant);
            assert_eq!(messages[2].role, MessageRole::User);
        }

        #[test]
        fn system_prompt_uses_persona() {
            let mut scenario = sales_scenario();
            scenario.persona = Some(Persona {
                name: "Sarah Lin".to_string(),
                job_title: "Purchasing Manager".to_string(),
                age: Some(32),
                personality: vec!["Analytical".to_string(), "Direct".to_string()],
                description: None,
            });

            let prompt = counterpart_system_prompt(&scenario);
            assert!(prompt.starts_with("You are Sarah Lin, Purchasing Manager."));
            assert!(prompt.contains("Analytical, Direct"));
        }
    }

    mod capabilities {
        use super::*;

        #[tokio::test]
        async fn scores_turn_through_provider() {
            let provider = MockAIProvider::new()
                .with_response(RequestPurpose::TurnScore, r#"{"score": 72, "tips": ["Quantify it"]}"#);
            let llm = LlmCapabilities::new(Arc::new(provider.clone()));
            let transcript = transcript();

            let raw = llm
                .score_turn(transcript.turns(), transcript.last().unwrap(), &[])
                .await
                .unwrap();

            assert_eq!(raw.raw_score, 72.0);
            assert_eq!(provider.calls_for(RequestPurpose::TurnScore), 1);
        }

        #[tokio::test]
        async fn goal_check_reads_verdict() {
            let provider = MockAIProvider::new().with_response(RequestPurpose::GoalCheck, "YES");
            let llm = LlmCapabilities::new(Arc::new(provider));
            let scenario = sales_scenario();

            let satisfied = llm
                .is_satisfied(transcript().turns(), &scenario.goals[0])
                .await
                .unwrap();
            assert!(satisfied);
        }

        #[tokio::test]
        async fn counterpart_turn_tags_scenario() {
            let provider = MockAIProvider::new()
                .with_response(RequestPurpose::CounterpartTurn, "Days? Prove it.");
            let llm = LlmCapabilities::new(Arc::new(provider.clone()));
            let scenario = sales_scenario();

            let reply = llm
                .generate_counterpart_turn(transcript().turns(), &scenario)
                .await
                .unwrap();

            assert_eq!(reply, "Days? Prove it.");
            let call = &provider.get_calls()[0];
            assert_eq!(call.metadata.scenario_id, Some(scenario.scenario_id.clone()));
            assert!(call.system_prompt.is_some());
        }

        #[tokio::test]
        async fn provider_errors_become_capability_errors() {
            let provider = MockAIProvider::new().with_error(
                RequestPurpose::Narrative,
                MockError::Unavailable {
                    message: "overloaded".to_string(),
                },
            );
            let llm = LlmCapabilities::new(Arc::new(provider));
            let scenario = sales_scenario();
            let scores = crate::domain::training::ReportScores::aggregate(
                &scenario,
                &crate::domain::training::Rubric::new(&scenario.rubric_dimension_labels),
                &crate::domain::training::GoalChecklist::from_specs(&scenario.goals),
            );

            let result = llm.generate_narrative(&[], &scores).await;
            assert!(matches!(result, Err(CapabilityError::Unavailable(_))));
        }
    }
}

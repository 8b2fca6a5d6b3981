//! Generated Love Shack lines.
//!
//! Each call re-supplies both profiles, the mood and the whole transcript;
//! the LLM keeps no session.

use async_trait::async_trait;
use island_domain::TurnKind;
use std::sync::Arc;

use crate::infrastructure::ports::{
    ContentError, DialogueContext, DialogueSource, LlmPort, LlmRequest,
};

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 150;

pub struct LlmDialogueSource {
    llm: Arc<dyn LlmPort>,
}

impl LlmDialogueSource {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        Self { llm }
    }
}

/// Prompt for the speaker's next line.
pub fn build_dialogue_prompt(context: &DialogueContext) -> String {
    let history: Vec<String> = context
        .transcript
        .iter()
        .filter(|turn| turn.kind == TurnKind::Line)
        .filter_map(|turn| {
            turn.speaker
                .seat()
                .map(|seat| format!("{}: {}", context.name_of(seat), turn.content))
        })
        .collect();

    format!(
        "You are {speaker}\n\n\
         You are chatting with {listener}\n\n\
         The mood between you right now is {tone}.\n\n\
         Previous conversation:\n{history}\n\n\
         Respond as {name} in a way that matches your personality, your traits and the mood. \
         Keep the response natural, flirty, and engaging, one or two sentences, like a real \
         dating app conversation. Reply with the message text only.",
        speaker = context.speaker.persona_summary(),
        listener = context.listener.persona_summary(),
        tone = context.vibe.tone(),
        history = if history.is_empty() {
            "(nothing yet)".to_string()
        } else {
            history.join("\n")
        },
        name = context.speaker.name,
    )
}

/// Strip quoting and a leading "Name:" the model sometimes adds.
fn clean_line(raw: &str, speaker_name: &str) -> String {
    let trimmed = raw.trim();
    let without_name = trimmed
        .strip_prefix(speaker_name)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(trimmed);
    without_name.trim().trim_matches('"').trim().to_string()
}

#[async_trait]
impl DialogueSource for LlmDialogueSource {
    async fn next_line(&self, context: &DialogueContext) -> Result<String, ContentError> {
        let request = LlmRequest::new(Vec::new())
            .with_system_prompt(build_dialogue_prompt(context))
            .with_temperature(TEMPERATURE)
            .with_max_tokens(Some(MAX_TOKENS));

        let response = self.llm.generate(request).await?;
        let line = clean_line(&response.content, &context.speaker.name);
        if line.is_empty() {
            return Err(ContentError::Empty);
        }
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{FinishReason, LlmError, LlmResponse, MockLlmPort};
    use chrono::Utc;
    use island_domain::{Gender, Islander, Seat, Speaker, Turn, Vibe};

    fn context() -> DialogueContext {
        DialogueContext {
            vibe: Vibe::Flirty,
            speaker_seat: Seat::B,
            speaker: Islander::new("Sarah", Gender::Female).with_personality("adventurous"),
            listener: Islander::new("Mike", Gender::Male),
            transcript: vec![
                Turn::new(
                    Speaker::Participant(Seat::A),
                    TurnKind::Line,
                    "Hey there! Ready to chat? 💖",
                    Utc::now(),
                ),
                Turn::system(TurnKind::Error, "Failed to generate response", Utc::now()),
            ],
        }
    }

    fn reply(content: &str) -> LlmResponse {
        LlmResponse {
            content: content.to_string(),
            finish_reason: FinishReason::Stop,
            usage: None,
        }
    }

    #[test]
    fn prompt_names_both_islanders_and_history() {
        let prompt = build_dialogue_prompt(&context());
        assert!(prompt.starts_with("You are Sarah, a female islander"));
        assert!(prompt.contains("You are chatting with Mike, a male islander"));
        assert!(prompt.contains("Mike: Hey there! Ready to chat? 💖"));
        assert!(!prompt.contains("Failed to generate response"));
        assert!(prompt.contains(Vibe::Flirty.tone()));
        assert!(prompt.contains("Respond as Sarah"));
    }

    #[test]
    fn clean_line_strips_name_and_quotes() {
        assert_eq!(clean_line("Sarah: \"Hi you\"  ", "Sarah"), "Hi you");
        assert_eq!(clean_line("  just this ", "Sarah"), "just this");
    }

    #[tokio::test]
    async fn sends_sampling_limits() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .withf(|req| {
                req.temperature == Some(0.7)
                    && req.max_tokens == Some(150)
                    && req.system_prompt.is_some()
            })
            .times(1)
            .returning(|_| Ok(reply("Race you to the water?")));

        let source = LlmDialogueSource::new(Arc::new(llm));
        let line = source.next_line(&context()).await.expect("line");
        assert_eq!(line, "Race you to the water?");
    }

    #[tokio::test]
    async fn blank_reply_is_empty_content() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate().returning(|_| Ok(reply("   ")));

        let source = LlmDialogueSource::new(Arc::new(llm));
        assert!(matches!(
            source.next_line(&context()).await,
            Err(ContentError::Empty)
        ));
    }

    #[tokio::test]
    async fn llm_failure_becomes_content_error() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .returning(|_| Err(LlmError::RequestFailed("503".into())));

        let source = LlmDialogueSource::new(Arc::new(llm));
        assert!(matches!(
            source.next_line(&context()).await,
            Err(ContentError::Llm(_))
        ));
    }
}

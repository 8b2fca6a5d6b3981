//! Reply suggestions for the viewer's islander in a Love Shack chat.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use island_domain::TurnKind;

use crate::infrastructure::ports::{DialogueContext, LlmError, LlmPort, LlmRequest};

const SUGGESTION_COUNT: usize = 3;
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 300;

/// One candidate reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplySuggestion {
    pub id: String,
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SuggestionError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("Could not parse suggestions: {0}")]
    Parse(String),
}

/// Ask the LLM for a few replies the speaker in `context` could send next.
pub struct SuggestReplies {
    llm: Arc<dyn LlmPort>,
}

impl SuggestReplies {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        Self { llm }
    }

    pub async fn execute(
        &self,
        context: &DialogueContext,
    ) -> Result<Vec<ReplySuggestion>, SuggestionError> {
        let request = LlmRequest::new(Vec::new())
            .with_system_prompt(build_suggestion_prompt(context))
            .with_temperature(TEMPERATURE)
            .with_max_tokens(Some(MAX_TOKENS));

        let response = self.llm.generate(request).await?;
        let suggestions = parse_suggestions(&response.content)?;
        tracing::debug!(
            speaker = %context.speaker.name,
            count = suggestions.len(),
            "Generated reply suggestions"
        );
        Ok(suggestions)
    }
}

fn build_suggestion_prompt(context: &DialogueContext) -> String {
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
         Previous conversation:\n{history}\n\n\
         Generate {count} possible responses that {name} could send next, each matching their \
         personality and traits with a different tone. Keep them short, natural, flirty, and \
         engaging. Format the response as a JSON array of objects with 'id' and 'text' properties.",
        speaker = context.speaker.persona_summary(),
        listener = context.listener.persona_summary(),
        history = history.join("\n"),
        count = SUGGESTION_COUNT,
        name = context.speaker.name,
    )
}

/// Pull the JSON array out of a reply that may be wrapped in prose or a code fence.
fn parse_suggestions(raw: &str) -> Result<Vec<ReplySuggestion>, SuggestionError> {
    let start = raw.find('[');
    let end = raw.rfind(']');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => return Err(SuggestionError::Parse("no JSON array in response".into())),
    };

    let items: Vec<serde_json::Value> =
        serde_json::from_str(json).map_err(|e| SuggestionError::Parse(e.to_string()))?;

    let suggestions: Vec<ReplySuggestion> = items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            let text = item.get("text")?.as_str()?.trim().to_string();
            if text.is_empty() {
                return None;
            }
            let id = match item.get("id") {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(serde_json::Value::Number(n)) => n.to_string(),
                _ => (idx + 1).to_string(),
            };
            Some(ReplySuggestion { id, text })
        })
        .take(SUGGESTION_COUNT)
        .collect();

    if suggestions.is_empty() {
        return Err(SuggestionError::Parse("no usable suggestions".into()));
    }
    Ok(suggestions)
}

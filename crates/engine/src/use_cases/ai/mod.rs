//! LLM-assisted helpers around encounters.

use std::sync::Arc;

mod suggest_replies;

pub use suggest_replies::{ReplySuggestion, SuggestReplies, SuggestionError};

pub struct AiUseCases {
    pub suggest_replies: Arc<SuggestReplies>,
}

impl AiUseCases {
    pub fn new(suggest_replies: Arc<SuggestReplies>) -> Self {
        Self { suggest_replies }
    }
}

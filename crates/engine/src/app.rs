//! Application state and composition.

use std::sync::Arc;

use island_domain::EncounterSettings;

use crate::infrastructure::{
    clock::{SystemClock, SystemRandom},
    config::{DialogueBackend, EngineConfig},
    content_sources::{LlmDialogueSource, StaticDialogueSource, StaticTriviaSource},
    memory::InMemoryIslanderRepo,
    openai::OpenAiClient,
    ports::{AvatarPort, ClockPort, DialogueSource, IslanderRepo, LlmPort, RandomPort},
    replicate::ReplicateAvatarClient,
    supabase::SupabaseIslanderRepo,
};
use crate::use_cases::{
    ai::SuggestReplies,
    assets::GenerateAvatar,
    encounter::{EncounterRunner, StartBattle, StartChat},
    AiUseCases, AssetUseCases, EncounterUseCases,
};

/// Main application state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub llm: Arc<dyn LlmPort>,
}

/// Container for the profile store.
pub struct Repositories {
    pub islanders: Arc<dyn IslanderRepo>,
}

/// Container for all use cases.
pub struct UseCases {
    pub encounter: EncounterUseCases,
    pub ai: AiUseCases,
    pub assets: AssetUseCases,
}

/// External dependencies the application is assembled from.
pub struct AppPorts {
    pub islanders: Arc<dyn IslanderRepo>,
    pub llm: Arc<dyn LlmPort>,
    pub avatars: Arc<dyn AvatarPort>,
    pub clock: Arc<dyn ClockPort>,
    pub random: Arc<dyn RandomPort>,
}

impl App {
    /// Build adapters from configuration and wire the application.
    pub fn from_config(config: &EngineConfig) -> Self {
        let islanders: Arc<dyn IslanderRepo> = match &config.supabase {
            Some((url, key)) => {
                tracing::info!(url = %url, "Using Supabase profile store");
                Arc::new(SupabaseIslanderRepo::new(url, key))
            }
            None => {
                tracing::info!("SUPABASE_URL not set, using in-memory demo roster");
                Arc::new(InMemoryIslanderRepo::with_demo_roster())
            }
        };

        tracing::info!(
            base_url = %config.llm_base_url,
            model = %config.llm_model,
            authenticated = config.llm_api_key.is_some(),
            "LLM client configured"
        );
        let llm = Arc::new(OpenAiClient::new(
            &config.llm_base_url,
            &config.llm_model,
            config.llm_api_key.clone(),
        ));
        let avatars = Arc::new(ReplicateAvatarClient::new(
            config.replicate_api_token.clone(),
        ));

        Self::new(
            AppPorts {
                islanders,
                llm,
                avatars,
                clock: Arc::new(SystemClock::new()),
                random: Arc::new(SystemRandom::new()),
            },
            config,
        )
    }

    pub fn new(ports: AppPorts, config: &EngineConfig) -> Self {
        let AppPorts {
            islanders,
            llm,
            avatars,
            clock,
            random,
        } = ports;

        let dialogue: Arc<dyn DialogueSource> = match config.dialogue_backend {
            DialogueBackend::Static => Arc::new(StaticDialogueSource::new(random.clone())),
            DialogueBackend::Llm => Arc::new(LlmDialogueSource::new(llm.clone())),
        };
        let trivia = Arc::new(StaticTriviaSource::new(random.clone()));

        let mut chat_settings = EncounterSettings::chat();
        if let Some(secs) = config.chat_duration_secs {
            chat_settings = chat_settings.with_duration_secs(secs);
        }
        let mut battle_settings = EncounterSettings::battle();
        if let Some(secs) = config.battle_duration_secs {
            battle_settings = battle_settings.with_duration_secs(secs);
        }

        let runner = Arc::new(EncounterRunner::new(
            dialogue,
            trivia,
            clock.clone(),
            random,
        ));
        let encounter = EncounterUseCases::new(
            Arc::new(StartChat::new(islanders.clone(), clock.clone(), chat_settings)),
            Arc::new(StartBattle::new(islanders.clone(), clock, battle_settings)),
            runner,
        );

        let use_cases = UseCases {
            encounter,
            ai: AiUseCases::new(Arc::new(SuggestReplies::new(llm.clone()))),
            assets: AssetUseCases::new(Arc::new(GenerateAvatar::new(avatars))),
        };

        Self {
            repositories: Repositories { islanders },
            use_cases,
            llm,
        }
    }
}

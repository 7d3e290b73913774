use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use roleplay_trainer::adapters::ai::{
    AnthropicConfig, AnthropicProvider, FailoverAIProvider, OpenAIConfig, OpenAIProvider,
};
use roleplay_trainer::adapters::capabilities::{
    HeuristicScorer, KeywordGoalClassifier, LlmCapabilities, ScriptedCounterpart,
};
use roleplay_trainer::adapters::http::app_router;
use roleplay_trainer::adapters::scenarios::InMemoryScenarioCatalog;
use roleplay_trainer::application::{Capabilities, SessionRegistry};
use roleplay_trainer::config::{AiConfig, AiProvider, AppConfig, LogFormat, ServerConfig};
use roleplay_trainer::ports::{AIProvider, ScenarioCatalog};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.server);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Roleplay trainer stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), BoxError> {
    config.validate()?;

    let catalog: Arc<dyn ScenarioCatalog> = match &config.training.scenario_dir {
        Some(dir) => Arc::new(InMemoryScenarioCatalog::with_scenario_dir(
            dir,
            config.training.default_pass_threshold,
        )?),
        None => Arc::new(InMemoryScenarioCatalog::builtin()),
    };
    info!(scenarios = catalog.list().len(), "Scenario catalog loaded");

    let registry = Arc::new(SessionRegistry::new(
        catalog,
        build_capabilities(&config.ai),
        config.training.engine_settings()?,
    ));

    let eviction = registry.spawn_eviction(
        config.training.session_idle_timeout(),
        config.training.eviction_interval(),
    );

    let app = app_router(registry, config.server.request_timeout());
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, environment = ?config.server.environment, "Roleplay trainer listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    eviction.abort();
    info!("Roleplay trainer shut down");
    Ok(())
}

/// `server.log_level` wins; `RUST_LOG` applies only when that directive is invalid.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_new(&server.log_level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match server.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn build_capabilities(ai: &AiConfig) -> Capabilities {
    let Some(primary) = remote_provider(ai.primary_provider, ai) else {
        info!("Using offline capabilities (scripted counterpart, heuristic scoring)");
        return Capabilities {
            counterpart: Arc::new(ScriptedCounterpart::new()),
            scorer: Arc::new(HeuristicScorer::new()),
            goal_classifier: Arc::new(KeywordGoalClassifier),
        };
    };

    let provider: Arc<dyn AIProvider> =
        match ai.fallback_provider.and_then(|kind| remote_provider(kind, ai)) {
            Some(fallback) => Arc::new(FailoverAIProvider::new(primary).with_fallback(fallback)),
            None => Arc::new(FailoverAIProvider::new(primary)),
        };

    let info = provider.provider_info();
    info!(provider = %info.name, model = %info.model, "Using LLM capabilities");

    let llm = Arc::new(LlmCapabilities::new(provider));
    Capabilities {
        counterpart: llm.clone(),
        scorer: llm.clone(),
        goal_classifier: llm,
    }
}

fn remote_provider(kind: AiProvider, ai: &AiConfig) -> Option<Arc<dyn AIProvider>> {
    match kind {
        AiProvider::OpenAI => ai.openai_key().map(|key| {
            let config = OpenAIConfig::new(key)
                .with_model(ai.openai_model.clone())
                .with_timeout(ai.timeout())
                .with_max_retries(ai.max_retries);
            Arc::new(OpenAIProvider::new(config)) as Arc<dyn AIProvider>
        }),
        AiProvider::Anthropic => ai.anthropic_key().map(|key| {
            let config = AnthropicConfig::new(key)
                .with_model(ai.anthropic_model.clone())
                .with_timeout(ai.timeout())
                .with_max_retries(ai.max_retries);
            Arc::new(AnthropicProvider::new(config)) as Arc<dyn AIProvider>
        }),
        AiProvider::Mock => None,
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}

//! CLI entrypoint for llm-council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use council_application::{
    ConversationLogger, GenerateTitleUseCase, ModelQueryService, NoConversationLogger,
    RunCouncilInput, RunCouncilUseCase,
};
use council_domain::{ConversationRepository, CouncilConfig, Model, Question};
use council_infrastructure::{
    ConfigLoader, FileConfig, JsonConversationStore, JsonlTranscriptLogger,
    OpenRouterQueryService, OpenRouterSettings,
};
use council_presentation::{
    ChatRepl, Cli, ConsoleFormatter, CtrlCGuard, OutputConfig, OutputFormatter, ProgressReporter,
    ReplConfig,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting llm-council");

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_ref()) {
            println!("{}", line);
        }
        return Ok(());
    }

    // === Configuration ===
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    check_config(&file_config)?;

    let council = council_config(&cli, &file_config)?;
    let execution = file_config.execution_params();
    let output_config = OutputConfig {
        format: cli
            .output
            .map(Into::into)
            .or(file_config.output.format)
            .unwrap_or_default(),
        color: file_config.output.color,
        show_progress: !cli.quiet && file_config.repl.show_progress,
    };
    output_config.apply_color_preference();

    let repository: Option<Arc<dyn ConversationRepository>> = if file_config.storage.enabled {
        file_config
            .storage
            .data_dir()
            .map(|dir| Arc::new(JsonConversationStore::new(dir)) as Arc<dyn ConversationRepository>)
    } else {
        None
    };

    if cli.list {
        let repository = repository.context("Conversation storage is disabled")?;
        print!(
            "{}",
            ConsoleFormatter::format_conversation_list(&repository.list().await?)
        );
        return Ok(());
    }

    // === Dependency Injection ===
    let query_service: Arc<dyn ModelQueryService> = Arc::new(openrouter_service(&file_config)?);
    let conversation_logger = conversation_logger(&file_config);
    let use_case =
        RunCouncilUseCase::new(query_service.clone()).with_conversation_logger(conversation_logger);

    // Chat mode
    if cli.is_chat() {
        let title_use_case = GenerateTitleUseCase::new(query_service, file_config.title_model())
            .with_timeout(execution.title_timeout);
        let repl_config = ReplConfig {
            show_progress: output_config.show_progress,
            history_file: file_config
                .repl
                .history_file()
                .or(ReplConfig::default().history_file),
        };

        let mut repl = ChatRepl::new(use_case, title_use_case, council)
            .with_execution(execution)
            .with_config(repl_config);

        if let Some(id) = &cli.resume {
            let store = repository
                .as_ref()
                .context("Cannot resume: conversation storage is disabled")?;
            repl = repl.with_conversation(store.load(id).await?);
        }
        if let Some(store) = repository {
            repl = repl.with_repository(store);
        }

        repl.run().await?;
        return Ok(());
    }

    // Single question mode - question is required
    let Some(question) = cli.question.as_deref() else {
        bail!("Question is required. Use --chat for interactive mode.");
    };
    let question = Question::new(question)?;

    let ctrl_c = CtrlCGuard::install();
    let input = RunCouncilInput::new(question.clone(), council)
        .with_execution(execution)
        .with_cancellation(ctrl_c.token());

    let result = if output_config.show_progress {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await?
    } else {
        use_case.execute(input).await?
    };
    drop(ctrl_c);

    if result.is_total_failure() {
        warn!("No panel member answered");
    }

    let output = ConsoleFormatter.render(output_config.format, question.content(), &result);
    println!("{}", output);

    Ok(())
}

/// Install the tracing subscriber: stderr always, plus a file when requested
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Cannot open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Report every config issue; refuse to run on errors
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        if issue.is_error() {
            eprintln!("Config error: {}", issue.message);
        } else {
            warn!("{}", issue.message);
        }
    }
    if issues.iter().any(|issue| issue.is_error()) {
        bail!("Invalid configuration");
    }
    Ok(())
}

/// File configuration with `-m` and `--chairman` applied on top
fn council_config(cli: &Cli, file_config: &FileConfig) -> Result<CouncilConfig> {
    let mut council = file_config.council_config();

    if !cli.model.is_empty() {
        if cli.model.iter().any(|m| m.trim().is_empty()) {
            bail!("Model names cannot be empty");
        }
        let panel = cli.model.iter().map(|m| Model::new(m.trim())).collect();
        council = CouncilConfig::new(panel, council.chairman);
    }

    if let Some(chairman) = &cli.chairman {
        if chairman.trim().is_empty() {
            bail!("Chairman model name cannot be empty");
        }
        council = council.with_chairman(Model::new(chairman.trim()));
    }

    council.validate()?;
    Ok(council)
}

fn openrouter_service(file_config: &FileConfig) -> Result<OpenRouterQueryService> {
    let openrouter = &file_config.openrouter;
    let api_key = openrouter.resolve_api_key().with_context(|| {
        format!(
            "No OpenRouter API key found. Set {} or openrouter.api_key in council.toml",
            openrouter.api_key_env
        )
    })?;

    let mut settings = OpenRouterSettings::new(api_key)
        .with_base_url(&openrouter.base_url)
        .with_timeout(openrouter.timeout());
    if let Some(referer) = &openrouter.referer {
        settings = settings.with_referer(referer);
    }
    if let Some(app_title) = &openrouter.app_title {
        settings = settings.with_app_title(app_title);
    }

    Ok(OpenRouterQueryService::new(settings)?)
}

fn conversation_logger(file_config: &FileConfig) -> Arc<dyn ConversationLogger> {
    if !file_config.logging.conversation_log {
        return Arc::new(NoConversationLogger);
    }
    let keep = file_config.logging.keep_transcripts();
    match file_config
        .logging
        .log_dir()
        .and_then(|dir| JsonlTranscriptLogger::open(dir, keep))
    {
        Some(logger) => {
            info!("Council transcripts: {}", logger.dir().display());
            Arc::new(logger)
        }
        None => Arc::new(NoConversationLogger),
    }
}

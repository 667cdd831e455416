//! CLI entrypoint for marshall
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use marshall_application::{
    AgentProgressNotifier, DecisionAgent, Ensemble, NoAgentProgress, NoRunLogger,
    RunAgentError, RunLogger,
};
use marshall_domain::{ConfigIssue, ReconcileStrategy, Severity, Task};
use marshall_infrastructure::{
    ConfigLoader, FileConfig, JsonlRunLogger, OpenAiEmbedder, PythonExecutor, RoutingGateway,
    load_toolkit,
};
use marshall_presentation::{
    AgentArgs, Cli, Command, ConsoleFormatter, EnsembleArgs, OutputFormat, ProgressReporter,
    SimpleProgress,
};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Exit status after Ctrl-C
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_ref()) {
            println!("{}", line);
        }
        println!();
        println!("{}", toml::to_string_pretty(&redacted(&config))?);
        return Ok(());
    }

    let _log_guard = init_logging(&cli, &config)?;
    info!("Starting marshall");

    let Some(command) = cli.command.take() else {
        bail!("a command is required: `marshall agent <task>` or `marshall ensemble <query>`");
    };

    match &command {
        Command::Agent(args) => apply_agent_overrides(&mut config, args),
        Command::Ensemble(args) => apply_ensemble_overrides(&mut config, args),
    }
    check_config(&config, &command)?;

    // === Dependency Injection ===
    let gateway = Arc::new(RoutingGateway::from_config(&config.providers));
    if gateway.is_empty() {
        bail!(
            "no LLM provider configured: set {} or {}",
            config.providers.openai.api_key_env,
            config.providers.anthropic.api_key_env
        );
    }

    let transcript_path = cli.transcript.clone().or(config.logging.transcript.clone());
    let run_logger: Arc<dyn RunLogger> = match &transcript_path {
        Some(path) => Arc::new(
            JsonlRunLogger::create(path)
                .with_context(|| format!("cannot create transcript {}", path.display()))?,
        ),
        None => Arc::new(NoRunLogger),
    };

    let progress: Arc<dyn AgentProgressNotifier> = if cli.quiet {
        Arc::new(NoAgentProgress)
    } else if std::io::stderr().is_terminal() {
        Arc::new(ProgressReporter::new())
    } else {
        Arc::new(SimpleProgress)
    };

    let cancellation = CancellationToken::new();
    let signal_token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling run");
            signal_token.cancel();
        }
    });

    let rendered = tokio::select! {
        result = execute(command, &config, gateway, progress, run_logger, cancellation.clone(), cli.output) => result,
        _ = cancellation.cancelled() => Err(anyhow!(RunAgentError::Cancelled)),
    };

    match rendered {
        Ok(text) => {
            println!("{}", text);
            if let Some(path) = transcript_path {
                info!("Transcript written to {}", path.display());
            }
            Ok(())
        }
        Err(_) if cancellation.is_cancelled() => {
            eprintln!("Interrupted");
            std::process::exit(EXIT_INTERRUPTED);
        }
        Err(e) => Err(e),
    }
}

async fn execute(
    command: Command,
    config: &FileConfig,
    gateway: Arc<RoutingGateway>,
    progress: Arc<dyn AgentProgressNotifier>,
    run_logger: Arc<dyn RunLogger>,
    cancellation: CancellationToken,
    format: OutputFormat,
) -> Result<String> {
    match command {
        Command::Agent(args) => {
            let task = Task::try_new(args.task).context("the task must not be empty")?;
            let toolkit = load_toolkit(&config.tools, Path::new("."))?;

            let mut agent = DecisionAgent::new(gateway, config.models.to_agent_models())
                .with_params(config.agent.to_execution_params())
                .with_toolkit(toolkit)
                .with_progress(progress)
                .with_run_logger(run_logger)
                .with_cancellation(cancellation);
            if config.executor.enabled {
                agent = agent.with_executor(Arc::new(PythonExecutor::from_config(&config.executor)));
            }

            let output = agent.run(task).await?;
            Ok(match format {
                OutputFormat::Text => ConsoleFormatter::format_agent(&output),
                OutputFormat::Answer => ConsoleFormatter::format_agent_answer(&output),
                OutputFormat::Json => ConsoleFormatter::format_json(&output),
            })
        }
        Command::Ensemble(args) => {
            let params = config.ensemble.to_ensemble_params();
            let mut builder = Ensemble::builder(gateway, config.models.ensemble_model())
                .params(params.clone());
            match params.strategy {
                ReconcileStrategy::Similarity => {
                    let model = config
                        .models
                        .embedding_model()
                        .context("an embedding model is required for similarity voting")?;
                    builder = builder.embedder(Arc::new(OpenAiEmbedder::from_config(
                        &config.providers.openai,
                        model,
                    )?));
                }
                ReconcileStrategy::Agent => {
                    if let Some(refiner) = config.models.to_agent_models().refiner {
                        builder = builder.refiner(refiner);
                    }
                }
            }

            let ensemble = builder
                .build()?
                .with_progress(progress)
                .with_run_logger(run_logger)
                .with_cancellation(cancellation);

            let result = ensemble.run(&args.query).await?;
            Ok(match format {
                OutputFormat::Text => ConsoleFormatter::format_ensemble(&result),
                OutputFormat::Answer => result.answer,
                OutputFormat::Json => ConsoleFormatter::format_json(&result),
            })
        }
    }
}

/// Initialize tracing; verbosity comes from `-v`/`-q`, output goes to
/// `--log-file` (or `[logging] log_file`) when set, stderr otherwise.
fn init_logging(cli: &Cli, config: &FileConfig) -> Result<Option<WorkerGuard>> {
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else {
        match cli.verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    match cli.log_file.as_ref().or(config.logging.log_file.as_ref()) {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

fn apply_agent_overrides(config: &mut FileConfig, args: &AgentArgs) {
    if let Some(model) = &args.model {
        config.models.base = model.clone();
    }
    if let Some(model) = &args.sub_model {
        config.models.sub = Some(model.clone());
    }
    if let Some(model) = &args.refiner {
        config.models.refiner = Some(model.clone());
    }
    if let Some(depth) = args.max_depth {
        config.agent.max_depth = depth;
    }
    if args.no_exec {
        config.executor.enabled = false;
    }
    if args.accumulate {
        config.agent.context_retention = "accumulate".to_string();
    }
}

fn apply_ensemble_overrides(config: &mut FileConfig, args: &EnsembleArgs) {
    if let Some(model) = &args.model {
        config.models.ensemble = Some(model.clone());
    }
    if let Some(model) = &args.refiner {
        config.models.refiner = Some(model.clone());
    }
    if let Some(samples) = args.samples {
        config.ensemble.samples = samples;
    }
    if let Some(strategy) = &args.strategy {
        config.ensemble.strategy = strategy.clone();
    }
    if let Some(temperature) = args.temperature {
        config.ensemble.temperature = temperature;
    }
    if let Some(concurrency) = args.concurrency {
        config.ensemble.concurrency = concurrency;
    }
}

/// Print config issues relevant to the command; abort on errors.
fn check_config(config: &FileConfig, command: &Command) -> Result<()> {
    let issues: Vec<ConfigIssue> = config
        .validate()
        .into_iter()
        .filter(|issue| relevant(issue, command))
        .collect();

    for issue in &issues {
        match issue.severity {
            Severity::Error => eprintln!("config error: {}", issue.message),
            Severity::Warning => warn!("config: {}", issue.message),
        }
    }

    let errors = issues.iter().filter(|i| i.is_error()).count();
    if errors > 0 {
        bail!("configuration has {} error(s)", errors);
    }
    Ok(())
}

/// Ensemble settings do not matter for agent runs and vice versa.
fn relevant(issue: &ConfigIssue, command: &Command) -> bool {
    let field = issue.code.field();
    match command {
        Command::Agent(_) => !field.starts_with("ensemble."),
        Command::Ensemble(_) => !field.starts_with("agent."),
    }
}

/// Copy of the config with inline API keys masked
fn redacted(config: &FileConfig) -> FileConfig {
    let mut config = config.clone();
    for key in [
        &mut config.providers.openai.api_key,
        &mut config.providers.anthropic.api_key,
    ] {
        if key.is_some() {
            *key = Some("********".to_string());
        }
    }
    config
}

// Copydesk - reporter/editor refinement loop
// Main entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use copydesk::cli::Args;
use copydesk::config::load_config;
use copydesk::errors::RefineError;
use copydesk::logging::init_tracing;
use copydesk::providers::{LlmProvider, OpenAIProvider};
use copydesk::refinement::{
    ConsoleTranscript, MarkerSignal, RecordingTranscript, RefinementConfig, RefinementLoop,
};
use copydesk::roles::build_roles;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    // Everything that can be misconfigured is checked before the first call
    let topic = args.topic()?;
    let mut config = load_config(args.config.as_deref())?;
    args.apply_overrides(&mut config)?;

    let provider: Arc<dyn LlmProvider> = Arc::new(
        OpenAIProvider::from_settings(config.api_key.clone(), &config.provider)
            .context("Failed to create completion provider")?,
    );
    let roles = build_roles(&config, provider)?;
    let signal = Arc::new(MarkerSignal::new(config.refinement.termination_marker.clone()));
    let runner = RefinementLoop::new(
        Arc::new(roles.generator),
        Arc::new(roles.reviewer),
        signal,
        RefinementConfig::from_config(&config),
    );

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping the run");
            shutdown.cancel();
        }
    });

    if args.json {
        // Printed before the exit status is decided so a failed run keeps its events
        let mut transcript = RecordingTranscript::new();
        let result = runner.run(&topic, &mut transcript, &cancel).await;
        let report = transcript.into_report(&result);
        println!("{}", serde_json::to_string_pretty(&report)?);
        result?;
    } else {
        let mut transcript = ConsoleTranscript::stdout();
        runner
            .run(&topic, &mut transcript, &cancel)
            .await
            .map_err(report_failure)?;
    }

    Ok(())
}

/// Surface the last good draft before turning the failure into a process error.
fn report_failure(err: RefineError) -> anyhow::Error {
    if let Some(draft) = err.last_draft() {
        eprintln!("\nLast draft before {} stopped the run:\n{}\n", err.stage(), draft);
    }
    anyhow::Error::new(err)
}

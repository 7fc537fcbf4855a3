use anyhow::{anyhow, Context, Result};
use aws_config::{BehaviorVersion, Region};
use cdn_invalidator::{
    cli::{Cli, Commands, InvokeCmdOpts},
    client::{cloudfront::CloudFrontInvalidator, codepipeline::CodePipelineReporter},
    config::load_config,
    InvalidationHandler, InvalidatorConfig, InvocationContext, InvocationEvent,
};
use cdn_telemetry::TelemetryConfig;
use clap::Parser;
use dotenv::dotenv;
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use std::{env, fs::read_to_string};
use tracing::{error, info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let Cli { log, command } = Cli::parse();
    match command.unwrap_or(Commands::Lambda) {
        Commands::Lambda => run_lambda(log).await,
        Commands::Invoke(opts) => invoke(log, opts).await,
    }
}

async fn run_lambda(log: Option<Level>) -> Result<()> {
    let mut config = InvalidatorConfig::from_env()?;
    config.merge_log_level(log);
    init_telemetry(&config, true)?;
    if let Err(err) = config.validate() {
        error!(error = %err, "Refusing to start");
        return Err(err.into());
    }

    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let handler = InvalidationHandler::new(
        config,
        CloudFrontInvalidator::from_conf(&sdk_config),
        CodePipelineReporter::from_conf(&sdk_config),
    )?;
    info!(
        distribution_id = %handler.config().distribution_id,
        "Starting CDN invalidator"
    );

    let handler = &handler;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler.handle_lambda(event).await
    }))
    .await
    .map_err(|e| anyhow!(e))
}

async fn invoke(log: Option<Level>, opts: InvokeCmdOpts) -> Result<()> {
    let mut config = match &opts.config {
        Some(path) => load_config(path)?,
        None => InvalidatorConfig::default(),
    };
    config.merge_vars(env::vars())?;
    config.merge_log_level(log);
    config.merge_invoke_opts(&opts);
    init_telemetry(&config, false)?;

    let event = match &opts.event {
        Some(path) => {
            let raw = read_to_string(path)
                .with_context(|| format!("Failed to read event file {path:?}"))?;
            let value: Value = serde_json::from_str(&raw).context("Event is not valid JSON")?;
            InvocationEvent::from_value(value)?
        }
        None => InvocationEvent::default(),
    };
    let ctx = opts
        .request_id
        .clone()
        .map(InvocationContext::new)
        .unwrap_or_else(InvocationContext::local);

    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = opts.region.clone() {
        loader = loader.region(Region::new(region));
    }
    let sdk_config = loader.load().await;
    let handler = InvalidationHandler::new(
        config,
        CloudFrontInvalidator::from_conf(&sdk_config),
        CodePipelineReporter::from_conf(&sdk_config),
    )?;

    let response = handler.handle(&event, &ctx).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn init_telemetry(config: &InvalidatorConfig, json_default: bool) -> Result<()> {
    TelemetryConfig::new(env!("CARGO_PKG_NAME"))
        .with_log_level(&config.log_level)
        .with_json_log(config.json_log.unwrap_or(json_default))
        .init()
        .context("error initializing logging/tracing system")
}

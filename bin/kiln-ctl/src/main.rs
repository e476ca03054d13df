//! kiln-ctl - operator CLI for the kiln training platform.
//!
//! Startup order:
//! 1. Parse configuration from environment variables.
//! 2. Initialise tracing.
//! 3. Dispatch the subcommand against the typed API client.

mod config;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use bytes::Bytes;
use tracing::debug;

use kiln_client::{
    ApiClient, Gateway, ProgressFn, TokioClock, TrackCallbacks, TrackConfig, UploadHandle,
    api::DatasetUpload, track,
};
use kiln_types::TaskSpec;

const USAGE: &str = "\
kiln-ctl - operator CLI for the kiln training platform

USAGE:
    kiln-ctl <command> [args]

COMMANDS:
    stats                          platform-wide counters
    datasets                       list datasets
    upload <name> <archive.zip>    upload a dataset archive
    models                         list trained models
    download-model <id> <dest>     fetch model weights to a file
    train <dataset-id> <name>      create a training task
    watch <task-id>                follow a task until it settles
    stop <task-id>                 stop a running task

ENVIRONMENT:
    KILN_API_URL        backend API root (default http://127.0.0.1:5000/api)
    KILN_LOG            tracing filter (default info)
    KILN_POLL_INTERVAL  watch poll interval in seconds (default 2)
";

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = config::Config::from_env();

    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => cfg
            .log_level
            .parse::<tracing_subscriber::EnvFilter>()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    debug!(api_url = %cfg.api_url, "kiln-ctl starting");

    let api = ApiClient::new(Gateway::new(&cfg.api_url));
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["stats"] => {
            let s = api.stats().await?;
            println!("datasets: {}", s.dataset_count);
            println!("models:   {}", s.model_count);
            println!("tasks:    {} ({} training)", s.task_count, s.training_count);
        }
        ["datasets"] => {
            for d in api.datasets().list().await? {
                println!(
                    "{:>6}  {:<24} {:<10} {:>8} files  {:>10} bytes  {:?}",
                    d.id, d.name, d.task_type, d.file_count, d.size, d.status
                );
            }
        }
        ["upload", name, path] => {
            let data = tokio::fs::read(path)
                .await
                .with_context(|| format!("reading {path}"))?;
            let file_name = Path::new(path)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "dataset.zip".to_owned());

            let handle = UploadHandle::new();
            let progress: ProgressFn = Arc::new(|pct| {
                print!("\rupload: {pct:>3}%");
                let _ = std::io::Write::flush(&mut std::io::stdout());
            });

            let dataset = api
                .datasets()
                .upload(
                    DatasetUpload::new(*name, file_name),
                    Bytes::from(data),
                    Some(progress),
                    &handle,
                )
                .await?;
            println!("\nuploaded dataset {} ({})", dataset.id, dataset.name);
        }
        ["models"] => {
            for m in api.models().list().await? {
                println!("{:>6}  {:<24} {:<10} {:>10} bytes", m.id, m.name, m.model_type, m.size);
            }
        }
        ["download-model", id, dest] => {
            let bytes = api.models().download(id).await?;
            tokio::fs::write(dest, &bytes)
                .await
                .with_context(|| format!("writing {dest}"))?;
            println!("wrote {} bytes to {dest}", bytes.len());
        }
        ["train", dataset_id, name] => {
            let task = api.tasks().create(&TaskSpec::new(*dataset_id, *name)).await?;
            println!("created task {} ({:?})", task.id, task.status);
            println!("follow it with: kiln-ctl watch {}", task.id);
        }
        ["watch", id] => {
            watch(&api, id, cfg.poll_interval_secs).await?;
        }
        ["stop", id] => {
            api.tasks().stop(id).await?;
            println!("task {id} stopped");
        }
        _ => {
            eprint!("{USAGE}");
            bail!("unknown or incomplete command");
        }
    }

    Ok(())
}

/// Follow one task's progress until it reaches a terminal state.
async fn watch(api: &ApiClient, task_id: &str, interval_secs: u64) -> Result<()> {
    let settled = Arc::new(tokio::sync::Notify::new());
    let on_settled = settled.clone();
    let on_errored = settled.clone();

    let callbacks = TrackCallbacks {
        on_update: Box::new(|task| {
            println!(
                "{:?}  {:>5.1}%  epoch {}",
                task.status, task.progress, task.current_epoch
            );
        }),
        on_terminal: Box::new(move |task| {
            println!("task settled: {:?}", task.status);
            on_settled.notify_one();
        }),
        on_error: Box::new(move |err| {
            if !err.is_transient() {
                eprintln!("watch aborted: {err}");
                on_errored.notify_one();
            }
        }),
    };

    let handle = track(
        Arc::new(api.clone()),
        Arc::new(TokioClock),
        task_id,
        TrackConfig {
            interval: Duration::from_secs(interval_secs),
        },
        callbacks,
    );

    settled.notified().await;
    handle.cancel();
    Ok(())
}

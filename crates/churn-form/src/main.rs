mod cli;

use anyhow::Context;
use churn_form::config::{load_form_config, resolve_config, Overrides};
use churn_form::dom::{FormPage, ResultRegion, SubmitControl, SubmitEvent};
use churn_form::logging::init_tracing;
use churn_form::transport::HttpTransport;
use churn_form::ChurnFormHandler;
use churn_protocol::config::FormConfig;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use crate::cli::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let log_guard = init_tracing(args.log_dir.as_deref())?;

    let file_config = match &args.config {
        Some(path) => load_form_config(path)?,
        None => FormConfig::default(),
    };
    let resolved = resolve_config(
        file_config,
        Overrides {
            base_url: args.base_url.clone(),
            request_timeout: args.timeout,
        },
    )?;
    info!(
        base_url = %resolved.endpoint.base_url,
        form = %args.form.display(),
        "churn form starting"
    );

    let page = Arc::new(FormPage::load(&resolved.labels.idle, &args.form)?);
    let transport = Arc::new(
        HttpTransport::new(resolved.endpoint.clone()).context("failed to build http client")?,
    );
    if args.check_health {
        transport
            .health()
            .await
            .context("prediction server health check failed")?;
    }

    let handler = ChurnFormHandler::new(
        page.clone(),
        page.clone(),
        page.clone(),
        transport,
        resolved.labels,
    );
    let mut event = SubmitEvent::new();
    let outcome = handler.handle_submit(&mut event).await;

    println!("{}", page.html());
    println!(
        "[{}] {}",
        if page.is_disabled() { "disabled" } else { "enabled" },
        page.label()
    );
    if !outcome.is_success() {
        drop(log_guard);
        std::process::exit(1);
    }
    Ok(())
}

use anyhow::Result;
use chrono::Duration;
use clap::Parser;
use colored::Colorize;
use tracing::info;

use hookgen_client::WebhookClient;
use hookgen_core::{run, RunPlan};

#[derive(Parser)]
#[command(name = "hookgen")]
#[command(version, about = "Post mock source-control webhook events to an event handler", long_about = None)]
struct Cli {
    /// Time duration (in seconds) of timestamps of generated events
    /// (from [now - timespan] to [now])
    #[arg(short = 't', long, default_value_t = 604_800, value_parser = clap::value_parser!(i64).range(1..))]
    event_timespan: i64,

    /// Number of changeset events to generate
    #[arg(short = 'e', long, default_value_t = 40)]
    num_events: usize,

    /// Number of incident issues to generate
    #[arg(short = 'i', long, default_value_t = 2)]
    num_issues: usize,

    /// Fixed number of commits per changeset (random between 1 and 4 if unset)
    #[arg(short = 'c', long)]
    num_changes: Option<usize>,
}

struct Env {
    webhook_url: String,
    secret: String,
    token: Option<String>,
}

fn load_env() -> Result<Env> {
    let webhook_url = std::env::var("WEBHOOK").ok().filter(|v| !v.is_empty());
    let secret = std::env::var("SECRET").ok().filter(|v| !v.is_empty());

    match (webhook_url, secret) {
        (Some(webhook_url), Some(secret)) => Ok(Env {
            webhook_url,
            secret,
            token: std::env::var("TOKEN").ok().filter(|v| !v.is_empty()),
        }),
        _ => anyhow::bail!(
            "please ensure the following environment variables are set: WEBHOOK, SECRET"
        ),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if cli.num_issues > cli.num_events {
        anyhow::bail!("num_issues cannot be greater than num_events");
    }

    let env = load_env()?;

    let plan = RunPlan {
        num_events: cli.num_events,
        event_timespan: Duration::seconds(cli.event_timespan),
        num_issues: cli.num_issues,
        commits_per_changeset: cli.num_changes,
    };

    println!(
        "{}",
        format!(
            "Sending {} changeset events ({} issues) to {}",
            plan.num_events, plan.num_issues, env.webhook_url
        )
        .bold()
    );
    info!("Event timestamps span the last {} seconds", cli.event_timespan);

    let mut client = WebhookClient::new(env.webhook_url, env.secret).with_token(env.token);
    let summary = run(&mut rand::thread_rng(), &mut client, &plan)?;

    info!(
        "Delivered {} changesets, {} deployments, {} issues",
        summary.changesets_sent, summary.deployments_sent, summary.issues_sent
    );
    println!(
        "{} changes successfully sent to event-handler",
        summary.changes_sent
    );

    Ok(())
}

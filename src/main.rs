use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use conventional_release::config;
use conventional_release::events::TriggerEvent;
use conventional_release::render::Renderer;
use conventional_release::ui;
use conventional_release::{Decision, EventContext, ReleaseOrchestrator};

#[derive(clap::Parser)]
#[command(
    name = "conventional-release",
    version,
    about = "Preview the release a push would produce from its conventional commits"
)]
struct Args {
    #[arg(short, long, help = "Push event payload (GitHub webhook JSON)")]
    payload: PathBuf,

    #[arg(long, help = "Previous release tag [default: configured initial version]")]
    previous_tag: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, help = "Print the decision as JSON instead of release notes")]
    json: bool,

    #[arg(short, long, help = "Log pipeline progress to stderr")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "info,conventional_release=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let body = fs::read_to_string(&args.payload)
        .with_context(|| format!("reading payload {}", args.payload.display()))?;
    let push = match TriggerEvent::from_webhook("push", &body)? {
        Some(TriggerEvent::Push(push)) => push,
        _ => {
            ui::display_error("Payload is not a push event");
            std::process::exit(1);
        }
    };

    let previous_tag = args
        .previous_tag
        .unwrap_or_else(|| config.initial_version.clone());
    let ctx = EventContext {
        date: push
            .head_commit_date
            .unwrap_or_else(|| Utc::now().date_naive()),
        owner: push.owner.clone(),
        repo: push.repo.clone(),
        target_branch: config.release_branch.clone(),
    };

    if !args.json {
        if push.reference != config.release_ref() {
            ui::display_status(&format!(
                "Note: {} is not the release branch '{}'",
                push.reference, config.release_branch
            ));
        }

        ui::display_status(&format!(
            "Analyzing {} commits of {}/{} since {}",
            push.commits.len(),
            ctx.owner,
            ctx.repo,
            previous_tag
        ));
    }

    let orchestrator = ReleaseOrchestrator::new(&config)?;
    match orchestrator.decide(&previous_tag, &push.commits, &ctx) {
        Decision::NoOp(reason) => {
            if args.json {
                println!("null");
            } else {
                ui::display_skip(&reason);
            }
        }
        Decision::Release(decision) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&decision)?);
            } else {
                ui::display_decision(&decision);
                ui::display_notes(&config.template.render(&decision, &ctx)?);
                ui::display_success(&format!("Would release {}", decision.next_tag));
            }
        }
    }

    Ok(())
}

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use client_core::{CommentSession, HttpCommentService, SessionOptions};
use shared::domain::{CommentId, FormField};
use tokio::io::{self, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod shell;

use config::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(name = "comments", version, about = "Browse and edit comments on a JSON comment service")]
struct Cli {
    /// Config file (defaults to ./comments.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Number of records kept from the initial fetch.
    #[arg(long, global = true)]
    limit: Option<usize>,
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,
    /// Refuse to submit a form with blank fields.
    #[arg(long, global = true)]
    validate: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print the first page of comments.
    List,
    /// Create a comment.
    Add(FieldArgs),
    /// Replace a comment. Fields not given keep their listed value; for an id
    /// missing from the first page they are sent blank.
    Update {
        #[arg(value_parser = clap::value_parser!(i64).range(1..))]
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a comment.
    Delete {
        #[arg(value_parser = clap::value_parser!(i64).range(1..))]
        id: i64,
    },
    /// Interactive session over stdin (default).
    Shell,
}

#[derive(Args, Debug, Default, PartialEq, Eq)]
struct FieldArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    body: Option<String>,
}

impl FieldArgs {
    fn provided(&self) -> Vec<(FormField, String)> {
        [
            (FormField::Name, &self.name),
            (FormField::Email, &self.email),
            (FormField::Body, &self.body),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.clone().map(|value| (field, value)))
        .collect()
    }

    async fn fill_form(&self, session: &CommentSession) {
        for (field, value) in self.provided() {
            session.set_form_field(field, value).await;
        }
    }
}

impl Cli {
    fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(v) = &self.base_url {
            settings.base_url = v.clone();
        }
        if let Some(v) = self.limit {
            settings.initial_limit = v;
        }
        if let Some(v) = self.timeout_secs {
            settings.request_timeout_secs = v;
        }
        if self.validate {
            settings.validate_before_submit = true;
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref())?;
    cli.apply_overrides(&mut settings);
    settings.validate()?;
    init_tracing(&settings.log_filter);

    let service = HttpCommentService::with_timeout(&settings.base_url, settings.request_timeout())?;
    let session = CommentSession::with_options(
        Arc::new(service),
        SessionOptions {
            validate_before_submit: settings.validate_before_submit,
        },
    );
    info!(
        base_url = %settings.base_url,
        limit = settings.initial_limit,
        "comments: session started"
    );

    // A failed first load is logged by the session and leaves the list empty.
    let _ = session.initialize(settings.initial_limit).await;

    let mut stdout = io::stdout();
    match cli.command.unwrap_or(Command::Shell) {
        Command::List => {}
        Command::Add(fields) => {
            session.clear_form().await;
            fields.fill_form(&session).await;
            session.submit().await?;
        }
        Command::Update { id, fields } => {
            let id = CommentId(id);
            match session.find_comment(id).await {
                Some(existing) => session.begin_edit(&existing).await,
                None => session.edit_form(|form| form.id = id).await,
            }
            fields.fill_form(&session).await;
            session.submit().await?;
        }
        Command::Delete { id } => {
            session.delete(CommentId(id)).await?;
        }
        Command::Shell => {
            let input = BufReader::new(io::stdin());
            shell::run_shell(&session, settings.initial_limit, input, &mut stdout).await?;
            return Ok(());
        }
    }

    let listing = render::render_comments(&session.comments().await);
    stdout.write_all(listing.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;

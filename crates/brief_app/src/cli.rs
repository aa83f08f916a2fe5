//! Command line surface of the client.
//!
//! Most subcommands open an interactive session on one of the screens; the
//! `status` and `delete` subcommands are one-shot calls that skip the
//! session machinery entirely.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use brief_api::{ApiClient, ApiSettings};
use brief_core::{NewProjectDraft, ProjectDetails, Route};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::logging::{self, LogDestination};
use crate::session;

/// Terminal client for the SEO brief backend.
#[derive(Debug, Parser)]
#[command(
    name = "brief",
    version,
    about = "Create SEO briefs: search competitors, pick up to seven, generate the document"
)]
pub struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Where log output goes. The file destination writes ./brief.log.
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    log: LogTarget,

    /// Directory saved documents are written to.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Args)]
struct ConnectionArgs {
    /// Base URL of the backend.
    #[arg(long, env = "SEOBRIEF_BASE_URL", default_value = "http://localhost:5678")]
    base_url: String,

    /// Path prefix the webhook endpoints live under.
    #[arg(long, env = "SEOBRIEF_WEBHOOK_PATH", default_value = "/webhook")]
    webhook_path: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Browse the project list (the default).
    Projects,
    /// Create a project and follow it through the workflow.
    New(NewArgs),
    /// Open competitor selection for a project.
    Competitors {
        /// Project id.
        id: String,
    },
    /// Open the generated brief for a project.
    Result {
        /// Project id.
        id: String,
    },
    /// Print the current status of a project and exit.
    Status {
        /// Project id.
        id: String,
    },
    /// Delete a project and exit.
    Delete {
        /// Project id.
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
struct NewArgs {
    /// Project title.
    #[arg(long)]
    title: String,

    /// Main keyword the brief is built around.
    #[arg(long)]
    keyword: String,

    /// Competitor domain to hide from the candidate lists; repeatable.
    #[arg(long = "exclude", value_name = "DOMAIN")]
    excluded: Vec<String>,

    /// Kind of text to produce.
    #[arg(long, default_value = "article")]
    text_type: String,

    /// Target length in words.
    #[arg(long, default_value_t = 3000)]
    volume: u32,

    /// Writing style.
    #[arg(long, default_value = "neutral")]
    style: String,

    /// Target region.
    #[arg(long, default_value = "Moscow")]
    region: String,

    /// Content language.
    #[arg(long, default_value = "ru")]
    language: String,

    /// Client or company name.
    #[arg(long)]
    client: Option<String>,

    /// Client website.
    #[arg(long)]
    website: Option<String>,

    /// Client niche.
    #[arg(long)]
    niche: Option<String>,

    /// Free-form description of the client.
    #[arg(long)]
    description: Option<String>,

    /// Who the text is written for.
    #[arg(long)]
    audience: Option<String>,

    /// Number of FAQ questions; without it the section is omitted.
    #[arg(long, value_name = "COUNT")]
    faq: Option<u32>,

    /// Anything else the writer should honor.
    #[arg(long)]
    requirements: Option<String>,

    /// Kick off the competitor search right after creation.
    #[arg(long)]
    search: bool,
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log.into());

    let settings = ApiSettings::resolve(&cli.connection.base_url, &cli.connection.webhook_path)
        .context("resolving the backend address")?;

    match cli.command.unwrap_or(Command::Projects) {
        Command::Projects => session::run(Route::Projects, settings, cli.output_dir),
        Command::New(args) => {
            let then_search = args.search;
            let draft = build_draft(args)?;
            session::run(
                Route::Create { draft, then_search },
                settings,
                cli.output_dir,
            )
        }
        Command::Competitors { id } => {
            session::run(Route::Competitors(id), settings, cli.output_dir)
        }
        Command::Result { id } => session::run(Route::Result(id), settings, cli.output_dir),
        Command::Status { id } => print_status(settings, &id),
        Command::Delete { id, yes } => delete_project(settings, &id, yes),
    }
}

fn build_draft(args: NewArgs) -> anyhow::Result<NewProjectDraft> {
    let defaults = NewProjectDraft::default();
    let draft = NewProjectDraft {
        title: args.title,
        main_keyword: args.keyword,
        excluded_competitors: args.excluded,
        details: ProjectDetails {
            client_name: args.client.unwrap_or_default(),
            client_website: args.website.unwrap_or_default(),
            client_niche: args.niche.unwrap_or_default(),
            client_description: args.description.unwrap_or_default(),
            text_type: args.text_type,
            text_volume: args.volume,
            text_style: args.style,
            target_audience: args.audience.unwrap_or_default(),
            region: args.region,
            language: args.language,
            faq_enabled: args.faq.is_some(),
            faq_count: args.faq.unwrap_or(defaults.details.faq_count),
            additional_requirements: args.requirements.unwrap_or_default(),
        },
    };
    if let Err(violations) = draft.validate() {
        for violation in &violations {
            eprintln!("error: {violation}");
        }
        anyhow::bail!("the project draft is incomplete");
    }
    Ok(draft)
}

/// One-shot check against the dedicated status endpoint.
fn print_status(settings: ApiSettings, id: &str) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("starting the async runtime")?;
    let client = ApiClient::new(settings);
    let status = runtime
        .block_on(client.project_status(id))
        .with_context(|| format!("fetching the status of project {id}"))?;
    println!("{}", status.presentation().label);
    Ok(())
}

fn delete_project(settings: ApiSettings, id: &str, yes: bool) -> anyhow::Result<()> {
    if !yes && !confirm(&format!("Delete project {id}? [y/N] "))? {
        println!("Kept.");
        return Ok(());
    }
    let runtime = tokio::runtime::Runtime::new().context("starting the async runtime")?;
    let client = ApiClient::new(settings);
    runtime
        .block_on(client.delete_project(id))
        .with_context(|| format!("deleting project {id}"))?;
    println!("Deleted project {id}.");
    Ok(())
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

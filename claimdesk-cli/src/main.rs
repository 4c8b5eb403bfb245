mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::info;

use claimdesk::{init_logging, load_or_default, ClaimDesk, LoggingOptions};
use commands::{respond, AssessTarget};

/// Insurance claim intake and review.
#[derive(Parser, Debug)]
#[command(name = "claimdesk", version, about = "Insurance claim intake and review")]
struct Cli {
    /// Path to the JSON configuration file. Defaults to ~/.claimdesk/config.json.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `claimdesk=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new claim.
    Create {
        #[arg(long)]
        customer: String,
        #[arg(long)]
        description: String,
    },
    /// List every claim.
    List,
    /// Show one claim.
    Show { id: String },
    /// Delete a claim and its media.
    Delete { id: String },
    /// Attach media files to a claim.
    Attach {
        id: String,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Remove a media file from a claim.
    Detach { id: String, file_id: String },
    /// List a claim's media with their payloads.
    Previews {
        id: String,
        /// Print complete data URIs.
        #[arg(long)]
        full: bool,
    },
    /// Set the damage summary.
    Summary { id: String, text: String },
    /// Set the assessment text.
    Assessment { id: String, text: String },
    /// Generate an assessment.
    Assess {
        #[arg(value_enum)]
        target: AssessTarget,
        id: String,
    },
    /// Submit a claim for approver review.
    Submit { id: String },
    /// List claims awaiting review.
    Pending,
    /// Approve a submitted claim.
    Approve { id: String },
    /// Reject a submitted claim.
    Reject { id: String },
    /// Replace the assessment of a claim under review.
    Revise { id: String, text: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = LoggingOptions {
        level: cli.log_level.clone(),
        json: cli.json_logs,
    };
    if let Err(e) = init_logging(&logging) {
        eprintln!("{}", e);
        return ExitCode::from(2);
    }

    let config = match load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return respond(commands::ApiResponse::<()>::err(e.to_string()));
        }
    };
    info!(
        "Starting claimdesk v{} with {:?} storage",
        env!("CARGO_PKG_VERSION"),
        config.storage.backend
    );

    let desk = match ClaimDesk::from_config(&config) {
        Ok(desk) => desk,
        Err(e) => {
            log::error!("Failed to open claim desk: {}", e);
            return respond(commands::ApiResponse::<()>::err(e.to_string()));
        }
    };

    run(&desk, cli.command).await
}

async fn run(desk: &ClaimDesk, command: Commands) -> ExitCode {
    match command {
        Commands::Create {
            customer,
            description,
        } => respond(commands::create_claim(desk, &customer, &description)),
        Commands::List => respond(commands::list_claims(desk)),
        Commands::Show { id } => respond(commands::show_claim(desk, &id)),
        Commands::Delete { id } => respond(commands::delete_claim(desk, &id)),
        Commands::Attach { id, files } => respond(commands::attach_media(desk, &id, &files)),
        Commands::Detach { id, file_id } => respond(commands::detach_media(desk, &id, &file_id)),
        Commands::Previews { id, full } => respond(commands::preview_media(desk, &id, full)),
        Commands::Summary { id, text } => respond(commands::update_summary(desk, &id, &text)),
        Commands::Assessment { id, text } => {
            respond(commands::update_assessment(desk, &id, &text))
        }
        Commands::Assess { target, id } => respond(commands::generate(desk, &id, target).await),
        Commands::Submit { id } => respond(commands::submit_claim(desk, &id)),
        Commands::Pending => respond(commands::pending_claims(desk)),
        Commands::Approve { id } => respond(commands::approve_claim(desk, &id)),
        Commands::Reject { id } => respond(commands::reject_claim(desk, &id)),
        Commands::Revise { id, text } => respond(commands::revise_assessment(desk, &id, &text)),
    }
}

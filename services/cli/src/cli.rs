use std::path::PathBuf;

use admission_portal::error::AppError;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::admin::{self, AdminCommand};
use crate::draft::{self, DraftCommand};
use crate::infra::Context;

#[derive(Parser, Debug)]
#[command(
    name = "portal",
    about = "Fill in and submit a school admission application, or run the admin back office",
    version
)]
struct Cli {
    /// Override PORTAL_API_BASE_URL for this invocation
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Override PORTAL_DATA_DIR (draft and session files)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Work on the local admission draft and submit it
    Draft {
        #[command(subcommand)]
        command: DraftCommand,
    },
    /// Browse submitted admissions through the public endpoint
    Admissions {
        #[command(subcommand)]
        command: AdmissionsCommand,
    },
    /// Sign in and manage applications and site content
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum AdmissionsCommand {
    /// List every submitted admission
    List,
    /// Show one admission by id
    Show { id: String },
}

/// Which upload list an attachment command targets.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AttachmentKind {
    Certificate,
    Passport,
}

#[derive(Args, Debug)]
pub(crate) struct PageArgs {
    /// 1-based page to show
    #[arg(long, default_value_t = 1)]
    pub(crate) page: usize,
    /// Rows per page
    #[arg(long, default_value_t = admission_portal::backoffice::DEFAULT_PAGE_SIZE)]
    pub(crate) page_size: usize,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let context = Context::load(cli.api_url, cli.data_dir)?;

    match cli.command {
        Command::Draft { command } => draft::run(&context, command).await,
        Command::Admissions { command } => admin::run_admissions(&context, command).await,
        Command::Admin { command } => admin::run(&context, command).await,
    }
}

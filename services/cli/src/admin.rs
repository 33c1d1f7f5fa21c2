use admission_portal::api::{
    EventDraft, EventRecord, LoginRequest, NewsArticle, NewsDraft, PortalClient,
    SubmittedApplication, TestimonyStatus,
};
use admission_portal::backoffice::{
    referees, ApplicationReviewer, DashboardOverview, Pagination, ReviewAction, StatusFilter,
};
use admission_portal::error::AppError;
use admission_portal::session::SessionRole;
use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};
use tracing::info;

use crate::cli::{AdmissionsCommand, PageArgs};
use crate::infra::{cell, parse_date, Context};

#[derive(Subcommand, Debug)]
pub(crate) enum AdminCommand {
    /// Exchange credentials for a bearer token and keep it for later commands
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Sign in through the student endpoint instead of the admin one
        #[arg(long)]
        student: bool,
    },
    /// Forget the saved token
    Logout,
    /// Review submitted applications
    Applications {
        #[command(subcommand)]
        command: ApplicationsCommand,
    },
    /// Manage news articles
    News {
        #[command(subcommand)]
        command: NewsCommand,
    },
    /// Manage events
    Events {
        #[command(subcommand)]
        command: EventsCommand,
    },
    /// Moderate testimonies
    Testimonies {
        #[command(subcommand)]
        command: TestimoniesCommand,
    },
    /// Counts and recent activity across the back office
    Overview,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ApplicationsCommand {
    /// List applications, one page at a time
    List {
        /// all, pending, review, approved or rejected
        #[arg(long, default_value = "all")]
        status: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one application with its referees
    Show { id: String },
    Approve { id: String },
    Reject { id: String },
}

#[derive(Subcommand, Debug)]
pub(crate) enum NewsCommand {
    List,
    Create(NewsArgs),
    Update {
        id: String,
        #[command(flatten)]
        article: NewsArgs,
    },
    Delete { id: String },
}

#[derive(Args, Debug)]
pub(crate) struct NewsArgs {
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    summary: String,
    #[arg(long, default_value = "General")]
    category: String,
    #[arg(long, default_value = "")]
    body: String,
}

impl From<NewsArgs> for NewsDraft {
    fn from(args: NewsArgs) -> Self {
        NewsDraft {
            title: args.title,
            summary: args.summary,
            category: args.category,
            body: args.body,
        }
    }
}

#[derive(Subcommand, Debug)]
pub(crate) enum EventsCommand {
    List,
    Create(EventArgs),
    Update {
        id: String,
        #[command(flatten)]
        event: EventArgs,
    },
    Delete { id: String },
}

#[derive(Args, Debug)]
pub(crate) struct EventArgs {
    #[arg(long)]
    title: String,
    /// Event day as YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    date: NaiveDate,
    #[arg(long, default_value = "")]
    location: String,
    #[arg(long, default_value = "")]
    description: String,
}

impl From<EventArgs> for EventDraft {
    fn from(args: EventArgs) -> Self {
        EventDraft {
            title: args.title,
            date: args.date.format("%Y-%m-%d").to_string(),
            location: args.location,
            description: args.description,
        }
    }
}

#[derive(Subcommand, Debug)]
pub(crate) enum TestimoniesCommand {
    List {
        /// pending or approved; omit for both
        #[arg(long)]
        status: Option<String>,
    },
    Approve { id: String },
    Delete { id: String },
}

pub(crate) async fn run(context: &Context, command: AdminCommand) -> Result<(), AppError> {
    match command {
        AdminCommand::Login {
            email,
            password,
            student,
        } => {
            let client = context.public_client()?;
            let credentials = LoginRequest { email, password };
            let (role, grant) = if student {
                (SessionRole::Student, client.student_login(&credentials).await?)
            } else {
                (SessionRole::Admin, client.admin_login(&credentials).await?)
            };
            let tokens = context.tokens();
            tokens.save(role, &grant)?;
            info!(path = %tokens.path().display(), "session saved");
            println!("signed in as {}", credentials.email);
            Ok(())
        }
        AdminCommand::Logout => {
            if context.tokens().clear() {
                println!("signed out");
            } else {
                println!("no saved session");
            }
            Ok(())
        }
        AdminCommand::Applications { command } => applications(context, command).await,
        AdminCommand::News { command } => news(context, command).await,
        AdminCommand::Events { command } => events(context, command).await,
        AdminCommand::Testimonies { command } => testimonies(context, command).await,
        AdminCommand::Overview => {
            let client = context.admin_client()?;
            let overview = DashboardOverview::load(&client).await?;
            println!("news:                 {}", overview.news);
            println!("events:               {}", overview.events);
            println!("pending testimonies:  {}", overview.pending_testimonies);
            println!("applications:         {}", overview.applications);
            if !overview.recent_activity.is_empty() {
                println!();
                println!("recent activity");
                let now = Utc::now();
                for item in &overview.recent_activity {
                    println!("  [{}] {} ({})", item.kind, item.title, item.age(now));
                }
            }
            Ok(())
        }
    }
}

pub(crate) async fn run_admissions(
    context: &Context,
    command: AdmissionsCommand,
) -> Result<(), AppError> {
    let client = context.public_client()?;
    match command {
        AdmissionsCommand::List => {
            let admissions = client.list_admissions().await?;
            print_application_rows(&admissions);
            println!("{} admission(s)", admissions.len());
        }
        AdmissionsCommand::Show { id } => {
            let admission = client.get_admission(&id).await?;
            print_application(&admission);
        }
    }
    Ok(())
}

async fn applications(context: &Context, command: ApplicationsCommand) -> Result<(), AppError> {
    let client = context.admin_client()?;
    match command {
        ApplicationsCommand::List { status, page } => {
            let filter = StatusFilter::parse(&status)?;
            let applications = client.list_applications(filter.status()).await?;
            let pagination = Pagination::new(page.page, page.page_size);
            print_application_rows(pagination.slice(&applications));
            println!(
                "page {} of {} ({} application(s))",
                pagination.effective_page(applications.len()),
                pagination.total_pages(applications.len()),
                applications.len()
            );
        }
        ApplicationsCommand::Show { id } => {
            let application = client.get_application(&id).await?;
            print_application(&application);
            for referee in referees(&application) {
                println!("{}: {}", referee.role, referee.name);
                println!("  organisation: {}", referee.organisation);
                println!("  position:     {}", referee.position);
                println!("  phone:        {}", referee.phone);
                println!("  email:        {}", referee.email);
            }
        }
        ApplicationsCommand::Approve { id } => {
            decide(&client, &id, ReviewAction::Approve).await?;
        }
        ApplicationsCommand::Reject { id } => {
            decide(&client, &id, ReviewAction::Reject).await?;
        }
    }
    Ok(())
}

async fn decide(
    client: &PortalClient,
    id: &str,
    action: ReviewAction,
) -> Result<(), AppError> {
    let updated = ApplicationReviewer::new(client).apply(id, action).await?;
    println!(
        "{} ({}) is now {}",
        updated.id,
        updated.applicant_name(),
        updated.status
    );
    Ok(())
}

async fn news(context: &Context, command: NewsCommand) -> Result<(), AppError> {
    let client = context.admin_client()?;
    match command {
        NewsCommand::List => {
            let articles = client.list_news().await?;
            for article in &articles {
                print_article(article);
            }
            println!("{} article(s)", articles.len());
        }
        NewsCommand::Create(args) => {
            let article = client.create_news(&args.into()).await?;
            print_article(&article);
        }
        NewsCommand::Update { id, article } => {
            let article = client.update_news(&id, &article.into()).await?;
            print_article(&article);
        }
        NewsCommand::Delete { id } => {
            client.delete_news(&id).await?;
            println!("deleted news article {id}");
        }
    }
    Ok(())
}

async fn events(context: &Context, command: EventsCommand) -> Result<(), AppError> {
    let client = context.admin_client()?;
    match command {
        EventsCommand::List => {
            let events = client.list_events().await?;
            for event in &events {
                print_event(event);
            }
            println!("{} event(s)", events.len());
        }
        EventsCommand::Create(args) => {
            let event = client.create_event(&args.into()).await?;
            print_event(&event);
        }
        EventsCommand::Update { id, event } => {
            let event = client.update_event(&id, &event.into()).await?;
            print_event(&event);
        }
        EventsCommand::Delete { id } => {
            client.delete_event(&id).await?;
            println!("deleted event {id}");
        }
    }
    Ok(())
}

async fn testimonies(context: &Context, command: TestimoniesCommand) -> Result<(), AppError> {
    let client = context.admin_client()?;
    match command {
        TestimoniesCommand::List { status } => {
            let status = status
                .map(|raw| {
                    TestimonyStatus::parse(&raw).ok_or_else(|| {
                        AppError::Usage(format!(
                            "unknown testimony status '{raw}' (expected pending or approved)"
                        ))
                    })
                })
                .transpose()?;
            let testimonies = client.list_testimonies(status).await?;
            for testimony in &testimonies {
                println!(
                    "{}  [{}]  {} <{}>: {}",
                    testimony.id,
                    testimony.status,
                    cell(&testimony.name),
                    cell(&testimony.email),
                    testimony.message.trim()
                );
            }
            println!("{} testimony(ies)", testimonies.len());
        }
        TestimoniesCommand::Approve { id } => {
            client.approve_testimony(&id).await?;
            println!("approved testimony {id}");
        }
        TestimoniesCommand::Delete { id } => {
            client.delete_testimony(&id).await?;
            println!("deleted testimony {id}");
        }
    }
    Ok(())
}

fn print_application_rows(applications: &[SubmittedApplication]) {
    for application in applications {
        println!(
            "{}  {:<12}  {:<28}  {}  {}",
            application.id,
            application.status,
            application.applicant_name(),
            cell(&application.programme_choice),
            application
                .submitted_at()
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    }
}

fn print_application(application: &SubmittedApplication) {
    println!("id:         {}", application.id);
    println!("applicant:  {}", application.applicant_name());
    println!("status:     {}", application.status);
    println!(
        "programme:  {} / {}",
        cell(&application.programme_level),
        cell(&application.programme_choice)
    );
    println!("email:      {}", cell(&application.email));
    println!("phone:      {}", cell(&application.phone));
    if let Some(at) = application.submitted_at() {
        println!("submitted:  {}", at.format("%Y-%m-%d %H:%M UTC"));
    }
    for (position, entry) in application.education.iter().enumerate() {
        println!(
            "education #{}: {} ({} to {}), {}",
            position + 1,
            cell(&entry.institution),
            cell(&entry.from),
            cell(&entry.to),
            cell(&entry.qualification)
        );
    }
    for file in application
        .certificates
        .iter()
        .chain(&application.passport_photos)
    {
        println!("file:       {}", file.file_url);
    }
}

fn print_article(article: &NewsArticle) {
    println!(
        "{}  [{}]  {}",
        article.id,
        cell(&article.category),
        article.title
    );
}

fn print_event(event: &EventRecord) {
    println!(
        "{}  {}  {}  {}",
        event.id,
        cell(&event.date),
        event.title,
        cell(&event.location)
    );
}

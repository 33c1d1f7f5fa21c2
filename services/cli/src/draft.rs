use std::path::PathBuf;

use admission_portal::admission::{
    ContactDetails, DraftStorage, DraftStore, Education, FinancialReference, FormFields,
    GuardianInfo, PersonalInfo, ProgrammeInfo, ReviewSummary, Section, SectionEditor,
    SectionKind, SubmissionController, SubmissionPayload, SubmitStatus,
};
use admission_portal::error::AppError;
use clap::Subcommand;
use tracing::warn;

use crate::cli::AttachmentKind;
use crate::infra::Context;

#[derive(Subcommand, Debug)]
pub(crate) enum DraftCommand {
    /// Print the review summary, optionally for one section only
    Show {
        /// programme, personal, contact, guardian, education or financial
        section: Option<String>,
    },
    /// Set one field of a section, e.g. `set personal firstName Ada`
    Set {
        section: String,
        field: String,
        /// Empty string clears the field
        value: String,
    },
    /// Append an institution to the education history
    AddEducation {
        institution: String,
        #[arg(long, default_value = "")]
        from: String,
        #[arg(long, default_value = "")]
        to: String,
        #[arg(long, default_value = "")]
        qualification: String,
    },
    /// Remove an institution by its 1-based position
    RemoveEducation { index: usize },
    /// Add a file to the certificate or passport photo uploads
    Attach {
        #[arg(value_enum)]
        kind: AttachmentKind,
        path: PathBuf,
    },
    /// Drop every file of one upload kind
    ClearAttachments {
        #[arg(value_enum)]
        kind: AttachmentKind,
    },
    /// Print the multipart fields the draft would be submitted with
    Payload,
    /// Discard the draft
    Reset,
    /// Submit the draft; it is cleared only when the server accepts it
    Submit,
}

pub(crate) async fn run(context: &Context, command: DraftCommand) -> Result<(), AppError> {
    let mut store = context.draft_store();

    match command {
        DraftCommand::Show { section } => show(&store, section.as_deref()),
        DraftCommand::Set {
            section,
            field,
            value,
        } => {
            let kind = parse_section(&section)?;
            match kind {
                SectionKind::Programme => set::<ProgrammeInfo, _>(&mut store, &field, &value)?,
                SectionKind::Personal => set::<PersonalInfo, _>(&mut store, &field, &value)?,
                SectionKind::Contact => set::<ContactDetails, _>(&mut store, &field, &value)?,
                SectionKind::Guardian => set::<GuardianInfo, _>(&mut store, &field, &value)?,
                SectionKind::Education => set::<Education, _>(&mut store, &field, &value)?,
                SectionKind::Financial => {
                    set::<FinancialReference, _>(&mut store, &field, &value)?
                }
            }
            report_persistence(&store);
            println!("{}: {field} updated", kind.title());
            Ok(())
        }
        DraftCommand::AddEducation {
            institution,
            from,
            to,
            qualification,
        } => {
            let mut editor = SectionEditor::<Education>::open(&store);
            // The editor always carries one row; fill it instead of appending
            // when it is still blank.
            let reuse_blank = editor
                .form()
                .institutions
                .last()
                .is_some_and(|record| record.is_blank());
            if !reuse_blank {
                editor.add_institution();
            }
            let index = editor.form().institutions.len() - 1;
            for (field, value) in [
                ("institution", &institution),
                ("from", &from),
                ("to", &to),
                ("qualification", &qualification),
            ] {
                editor.set_institution_field(index, field, value)?;
            }
            editor.save(&mut store);
            report_persistence(&store);
            println!("added institution #{}: {institution}", index + 1);
            Ok(())
        }
        DraftCommand::RemoveEducation { index } => {
            if index == 0 {
                return Err(AppError::Usage(
                    "institution positions start at 1".to_string(),
                ));
            }
            let mut editor = SectionEditor::<Education>::open(&store);
            let removed = editor.remove_institution(index - 1)?;
            editor.save(&mut store);
            report_persistence(&store);
            println!("removed institution #{index}: {}", removed.institution);
            Ok(())
        }
        DraftCommand::Attach { kind, path } => {
            if !path.is_file() {
                warn!(path = %path.display(), "attachment does not exist yet; submit will fail until it does");
            }
            match kind {
                AttachmentKind::Certificate => {
                    let mut editor = SectionEditor::<Education>::open(&store);
                    editor.attach_certificate(&path);
                    editor.save(&mut store);
                }
                AttachmentKind::Passport => {
                    let mut editor = SectionEditor::<ProgrammeInfo>::open(&store);
                    editor.attach_passport_photo(&path);
                    editor.save(&mut store);
                }
            }
            report_persistence(&store);
            println!("attached {}", path.display());
            Ok(())
        }
        DraftCommand::ClearAttachments { kind } => {
            match kind {
                AttachmentKind::Certificate => {
                    let mut editor = SectionEditor::<Education>::open(&store);
                    editor.clear_certificates();
                    editor.save(&mut store);
                }
                AttachmentKind::Passport => {
                    let mut editor = SectionEditor::<ProgrammeInfo>::open(&store);
                    editor.clear_passport_photos();
                    editor.save(&mut store);
                }
            }
            report_persistence(&store);
            println!("attachments cleared");
            Ok(())
        }
        DraftCommand::Payload => {
            let payload = SubmissionPayload::from_draft(store.draft())?;
            for (name, value) in payload.fields() {
                println!("{name}={value}");
            }
            for (name, attachment) in payload.files() {
                println!("{name}=@{}", attachment.path.display());
            }
            Ok(())
        }
        DraftCommand::Reset => {
            store.reset();
            report_persistence(&store);
            println!("draft cleared");
            Ok(())
        }
        DraftCommand::Submit => submit(context, &mut store).await,
    }
}

fn show<S: DraftStorage>(store: &DraftStore<S>, section: Option<&str>) -> Result<(), AppError> {
    let summary = ReviewSummary::from_draft(store.draft());
    match section {
        None => print!("{summary}"),
        Some(raw) => {
            let kind = parse_section(raw)?;
            if let Some(section) = summary.section(kind) {
                println!("{}", kind.title());
                for row in &section.rows {
                    println!("  {}: {}", row.label, row.value);
                }
            }
        }
    }
    Ok(())
}

fn set<T, S>(store: &mut DraftStore<S>, field: &str, value: &str) -> Result<(), AppError>
where
    T: Section + FormFields,
    S: DraftStorage,
{
    let mut editor = SectionEditor::<T>::open(store);
    editor.set_field(field, value)?;
    editor.save(store);
    Ok(())
}

async fn submit<S: DraftStorage>(
    context: &Context,
    store: &mut DraftStore<S>,
) -> Result<(), AppError> {
    let client = context.public_client()?;
    let controller = SubmissionController::new();
    match controller.submit(store, &client).await {
        SubmitStatus::Submitted(application) => {
            report_persistence(store);
            println!(
                "application {} submitted for {} (status: {})",
                application.id,
                application.applicant_name(),
                application.status
            );
            Ok(())
        }
        SubmitStatus::Failed(message) => Err(AppError::Submission(message)),
        SubmitStatus::Busy => Err(AppError::Submission(
            "another submission is still in progress".to_string(),
        )),
    }
}

fn parse_section(raw: &str) -> Result<SectionKind, AppError> {
    SectionKind::parse(raw).ok_or_else(|| {
        let known: Vec<&str> = SectionKind::ALL
            .iter()
            .map(|kind| kind.short_name())
            .collect();
        AppError::Usage(format!(
            "unknown section '{raw}' (expected one of: {})",
            known.join(", ")
        ))
    })
}

fn report_persistence<S: DraftStorage>(store: &DraftStore<S>) {
    if let Some(err) = store.persistence_error() {
        eprintln!("warning: draft could not be saved to disk: {err}");
    }
}

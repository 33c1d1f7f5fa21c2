//! Read-only summary shown before the applicant submits.

use std::fmt;

use super::domain::{ApplicationDraft, Attachment, InstitutionRecord, RefereeDetails, SectionKind};

/// Placeholder for any value the applicant left empty.
pub const MISSING_VALUE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    pub label: String,
    pub value: String,
}

impl ReviewRow {
    fn new(label: impl Into<String>, value: &str) -> Self {
        Self {
            label: label.into(),
            value: or_missing(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSection {
    pub kind: SectionKind,
    pub rows: Vec<ReviewRow>,
}

impl ReviewSection {
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }
}

/// Every section of the draft as labelled rows, in wizard order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSummary {
    sections: Vec<ReviewSection>,
}

impl ReviewSummary {
    pub fn from_draft(draft: &ApplicationDraft) -> Self {
        let sections = SectionKind::ALL
            .into_iter()
            .map(|kind| ReviewSection {
                kind,
                rows: rows_for(kind, draft),
            })
            .collect();
        Self { sections }
    }

    pub fn sections(&self) -> &[ReviewSection] {
        &self.sections
    }

    pub fn section(&self, kind: SectionKind) -> Option<&ReviewSection> {
        self.sections.iter().find(|section| section.kind == kind)
    }
}

impl fmt::Display for ReviewSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, section) in self.sections.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", section.kind.title())?;
            for row in &section.rows {
                writeln!(f, "  {}: {}", row.label, row.value)?;
            }
        }
        Ok(())
    }
}

fn rows_for(kind: SectionKind, draft: &ApplicationDraft) -> Vec<ReviewRow> {
    match kind {
        SectionKind::Programme => {
            let programme = &draft.programme;
            vec![
                ReviewRow::new("Programme Level", &programme.level),
                ReviewRow::new("Programme Choice", &programme.choice),
                ReviewRow::new("Passport Photos", &file_names(&programme.passport_photos)),
            ]
        }
        SectionKind::Personal => {
            let personal = &draft.personal;
            let gender = personal.gender.map(|g| g.label()).unwrap_or_default();
            vec![
                ReviewRow::new("Title", &personal.title),
                ReviewRow::new("Surname", &personal.surname),
                ReviewRow::new("First Name", &personal.first_name),
                ReviewRow::new("Other Names", &personal.other_names),
                ReviewRow::new("Date of Birth", &personal.date_of_birth),
                ReviewRow::new("Place of Birth", &personal.place_of_birth),
                ReviewRow::new("Gender", gender),
            ]
        }
        SectionKind::Contact => {
            let contact = &draft.contact;
            let differs = match contact.place_differs_from_nationality {
                Some(true) => "Yes",
                Some(false) => "No",
                None => "",
            };
            let marital = contact
                .marital_status
                .map(|status| status.label())
                .unwrap_or_default();
            vec![
                ReviewRow::new("Present Address", &contact.present_address),
                ReviewRow::new("Permanent Address", &contact.permanent_address),
                ReviewRow::new("Postal Address", &contact.postal_address),
                ReviewRow::new("Phone", &contact.phone),
                ReviewRow::new("Email", &contact.email),
                ReviewRow::new("Nationality", &contact.nationality),
                ReviewRow::new("Native Language", &contact.native_language),
                ReviewRow::new("Place of Birth Differs from Nationality", differs),
                ReviewRow::new("Marital Status", marital),
                ReviewRow::new("Religion", &contact.religion),
                ReviewRow::new("Denomination", &contact.denomination),
            ]
        }
        SectionKind::Guardian => {
            let guardian = &draft.guardian;
            vec![
                ReviewRow::new("Parent/Guardian", &guardian.parent_guardian),
                ReviewRow::new("Emergency Contact", &guardian.emergency_contact),
                ReviewRow::new("Emergency Phone", &guardian.emergency_phone),
                ReviewRow::new("Next of Kin", &guardian.next_of_kin),
                ReviewRow::new("Next of Kin Phone", &guardian.next_of_kin_phone),
            ]
        }
        SectionKind::Education => {
            let education = &draft.education;
            let mut rows: Vec<ReviewRow> = education
                .filled_institutions()
                .enumerate()
                .map(|(index, record)| {
                    ReviewRow::new(format!("Institution {}", index + 1), &describe(record))
                })
                .collect();
            if rows.is_empty() {
                rows.push(ReviewRow::new("Institutions", ""));
            }
            rows.push(ReviewRow::new(
                "Certificates",
                &file_names(&education.certificates),
            ));
            rows.push(ReviewRow::new(
                "Description",
                education.description.as_deref().unwrap_or_default(),
            ));
            rows
        }
        SectionKind::Financial => {
            let financial = &draft.financial;
            let mut rows = vec![
                ReviewRow::new("Financial Support", &financial.finance_info),
                ReviewRow::new("Health Information", &financial.health_info),
            ];
            rows.extend(referee_rows(
                "Academic Referee",
                ["Profession", "Institution"],
                &financial.academic_referee,
            ));
            rows.extend(referee_rows(
                "Clergy Referee",
                ["Position", "Church"],
                &financial.clergy_referee,
            ));
            rows.push(ReviewRow::new(
                "Applicant Signature",
                &financial.applicant_signature,
            ));
            rows.push(ReviewRow::new("Date", &financial.applicant_date));
            rows
        }
    }
}

fn referee_rows(prefix: &str, roles: [&str; 2], referee: &RefereeDetails) -> Vec<ReviewRow> {
    let [position, organisation] = roles;
    vec![
        ReviewRow::new(prefix, &referee.name),
        ReviewRow::new(format!("{prefix} {position}"), &referee.position),
        ReviewRow::new(format!("{prefix} {organisation}"), &referee.organisation),
        ReviewRow::new(format!("{prefix} Address"), &referee.address),
        ReviewRow::new(format!("{prefix} Phone"), &referee.phone),
        ReviewRow::new(format!("{prefix} Email"), &referee.email),
    ]
}

fn describe(record: &InstitutionRecord) -> String {
    format!(
        "{} ({} to {}), {}",
        or_missing(&record.institution),
        or_missing(&record.from),
        or_missing(&record.to),
        or_missing(&record.qualification)
    )
}

fn file_names(files: &[Attachment]) -> String {
    files
        .iter()
        .map(|file| file.file_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn or_missing(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        MISSING_VALUE.to_string()
    } else {
        trimmed.to_string()
    }
}

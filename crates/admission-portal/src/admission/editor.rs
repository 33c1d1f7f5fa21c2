//! Step editors: each one edits a private copy of a single draft section and
//! only touches the store when saved.

use std::path::PathBuf;

use tracing::debug;

use super::domain::{
    Attachment, ContactDetails, Education, FinancialReference, Gender, GuardianInfo,
    InstitutionRecord, MaritalStatus, PersonalInfo, ProgrammeInfo, RefereeDetails, Section,
};
use super::store::{DraftStorage, DraftStore};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("{section} has no field named '{field}' (expected one of: {expected})")]
    UnknownField {
        section: &'static str,
        field: String,
        expected: String,
    },
    #[error("'{value}' is not a valid {field} (expected one of: {expected})")]
    InvalidChoice {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("no institution at position {index}")]
    NoSuchInstitution { index: usize },
}

/// Field-by-name access used by forms and the command line.
///
/// Names are matched ignoring case and separators, so `firstName`,
/// `first_name` and `first-name` address the same field.
pub trait FormFields {
    const FIELDS: &'static [&'static str];

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), EditorError>;
}

/// Editing session for one section.
///
/// Dropping the editor (or calling [`SectionEditor::cancel`]) discards the
/// local copy; the store only changes through [`SectionEditor::save`].
#[derive(Debug, Clone)]
pub struct SectionEditor<T> {
    form: T,
}

pub type ProgrammeInfoEditor = SectionEditor<ProgrammeInfo>;
pub type PersonalInfoEditor = SectionEditor<PersonalInfo>;
pub type ContactDetailsEditor = SectionEditor<ContactDetails>;
pub type GuardianInfoEditor = SectionEditor<GuardianInfo>;
pub type EducationEditor = SectionEditor<Education>;
pub type FinancialReferenceEditor = SectionEditor<FinancialReference>;

impl<T: Section> SectionEditor<T> {
    /// Seed the local copy from the store's current value for this section.
    pub fn open<S: DraftStorage>(store: &DraftStore<S>) -> Self {
        Self {
            form: store.section::<T>().clone().for_editing(),
        }
    }

    pub fn form(&self) -> &T {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut T {
        &mut self.form
    }

    /// Write the local copy back as the section's new value.
    pub fn save<S: DraftStorage>(self, store: &mut DraftStore<S>) {
        debug!(section = T::KIND.key(), "saving section editor");
        store.update(self.form);
    }

    pub fn cancel(self) {}
}

impl<T: Section + FormFields> SectionEditor<T> {
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), EditorError> {
        self.form.set_field(field, value)
    }
}

impl SectionEditor<ProgrammeInfo> {
    pub fn attach_passport_photo(&mut self, path: impl Into<PathBuf>) {
        self.form.passport_photos.push(Attachment::from_path(path));
    }

    pub fn clear_passport_photos(&mut self) {
        self.form.passport_photos.clear();
    }
}

impl SectionEditor<Education> {
    pub fn add_institution(&mut self) {
        self.form.institutions.push(InstitutionRecord::default());
    }

    /// Remove a row. Removing the last row leaves a blank template behind.
    pub fn remove_institution(&mut self, index: usize) -> Result<InstitutionRecord, EditorError> {
        if index >= self.form.institutions.len() {
            return Err(EditorError::NoSuchInstitution { index });
        }
        let removed = self.form.institutions.remove(index);
        if self.form.institutions.is_empty() {
            self.form.institutions.push(InstitutionRecord::default());
        }
        Ok(removed)
    }

    pub fn set_institution_field(
        &mut self,
        index: usize,
        field: &str,
        value: &str,
    ) -> Result<(), EditorError> {
        let record = self
            .form
            .institutions
            .get_mut(index)
            .ok_or(EditorError::NoSuchInstitution { index })?;
        record.set_field(field, value)
    }

    pub fn attach_certificate(&mut self, path: impl Into<PathBuf>) {
        self.form.certificates.push(Attachment::from_path(path));
    }

    pub fn clear_certificates(&mut self) {
        self.form.certificates.clear();
    }
}

fn normalize(field: &str) -> String {
    field
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn unknown_field(section: &'static str, field: &str, expected: &[&str]) -> EditorError {
    EditorError::UnknownField {
        section,
        field: field.to_string(),
        expected: expected.join(", "),
    }
}

fn text(value: &str) -> String {
    value.trim().to_string()
}

fn parse_gender(value: &str) -> Result<Option<Gender>, EditorError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    Gender::from_label(value)
        .map(Some)
        .ok_or_else(|| EditorError::InvalidChoice {
            field: "gender",
            value: value.to_string(),
            expected: Gender::CHOICES,
        })
}

fn parse_marital_status(value: &str) -> Result<Option<MaritalStatus>, EditorError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    MaritalStatus::from_label(value)
        .map(Some)
        .ok_or_else(|| EditorError::InvalidChoice {
            field: "marital status",
            value: value.to_string(),
            expected: MaritalStatus::CHOICES,
        })
}

fn parse_yes_no(field: &'static str, value: &str) -> Result<Option<bool>, EditorError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "yes" | "y" | "true" => Ok(Some(true)),
        "no" | "n" | "false" => Ok(Some(false)),
        _ => Err(EditorError::InvalidChoice {
            field,
            value: value.to_string(),
            expected: "Yes, No",
        }),
    }
}

impl FormFields for ProgrammeInfo {
    const FIELDS: &'static [&'static str] = &["programmeLevel", "programmeChoice"];

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), EditorError> {
        match normalize(field).as_str() {
            "programmelevel" | "level" => self.level = text(value),
            "programmechoice" | "choice" => self.choice = text(value),
            _ => return Err(unknown_field("programme info", field, Self::FIELDS)),
        }
        Ok(())
    }
}

impl FormFields for PersonalInfo {
    const FIELDS: &'static [&'static str] = &[
        "firstName",
        "surname",
        "otherNames",
        "title",
        "dateOfBirth",
        "placeOfBirth",
        "gender",
    ];

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), EditorError> {
        match normalize(field).as_str() {
            "firstname" => self.first_name = text(value),
            "surname" => self.surname = text(value),
            "othernames" => self.other_names = text(value),
            "title" => self.title = text(value),
            "dateofbirth" => self.date_of_birth = text(value),
            "placeofbirth" => self.place_of_birth = text(value),
            "gender" => self.gender = parse_gender(value)?,
            _ => return Err(unknown_field("personal info", field, Self::FIELDS)),
        }
        Ok(())
    }
}

impl FormFields for ContactDetails {
    const FIELDS: &'static [&'static str] = &[
        "presentAddress",
        "phone",
        "email",
        "permanentAddress",
        "postalAddress",
        "nationality",
        "nativeLanguage",
        "placeDiffNationality",
        "maritalStatus",
        "religion",
        "denomination",
    ];

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), EditorError> {
        match normalize(field).as_str() {
            "presentaddress" => self.present_address = text(value),
            "phone" => self.phone = text(value),
            "email" => self.email = text(value),
            "permanentaddress" => self.permanent_address = text(value),
            "postaladdress" => self.postal_address = text(value),
            "nationality" => self.nationality = text(value),
            "nativelanguage" => self.native_language = text(value),
            "placediffnationality" | "placediffersfromnationality" => {
                self.place_differs_from_nationality =
                    parse_yes_no("place of birth differs from nationality", value)?
            }
            "maritalstatus" => self.marital_status = parse_marital_status(value)?,
            "religion" => self.religion = text(value),
            "denomination" => self.denomination = text(value),
            _ => return Err(unknown_field("contact details", field, Self::FIELDS)),
        }
        Ok(())
    }
}

impl FormFields for GuardianInfo {
    const FIELDS: &'static [&'static str] = &[
        "parentGuardian",
        "emergencyContact",
        "emergencyPhone",
        "nextOfKin",
        "nextOfKinPhone",
    ];

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), EditorError> {
        match normalize(field).as_str() {
            "parentguardian" => self.parent_guardian = text(value),
            "emergencycontact" => self.emergency_contact = text(value),
            "emergencyphone" => self.emergency_phone = text(value),
            "nextofkin" => self.next_of_kin = text(value),
            "nextofkinphone" => self.next_of_kin_phone = text(value),
            _ => return Err(unknown_field("guardian info", field, Self::FIELDS)),
        }
        Ok(())
    }
}

impl FormFields for InstitutionRecord {
    const FIELDS: &'static [&'static str] = &["institution", "from", "to", "qualification"];

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), EditorError> {
        match normalize(field).as_str() {
            "institution" => self.institution = text(value),
            "from" => self.from = text(value),
            "to" => self.to = text(value),
            "qualification" => self.qualification = text(value),
            _ => return Err(unknown_field("institution", field, Self::FIELDS)),
        }
        Ok(())
    }
}

impl FormFields for Education {
    /// Institution rows are addressed as `<index>.<field>`, e.g. `0.qualification`.
    const FIELDS: &'static [&'static str] = &[
        "description",
        "<n>.institution",
        "<n>.from",
        "<n>.to",
        "<n>.qualification",
    ];

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), EditorError> {
        if normalize(field) == "description" {
            let value = text(value);
            self.description = (!value.is_empty()).then_some(value);
            return Ok(());
        }

        let (index, inner) = field
            .split_once('.')
            .and_then(|(index, inner)| index.trim().parse::<usize>().ok().map(|i| (i, inner)))
            .ok_or_else(|| unknown_field("education", field, Self::FIELDS))?;
        let record = self
            .institutions
            .get_mut(index)
            .ok_or(EditorError::NoSuchInstitution { index })?;
        record.set_field(inner, value)
    }
}

impl FormFields for RefereeDetails {
    const FIELDS: &'static [&'static str] =
        &["name", "position", "organisation", "address", "phone", "email"];

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), EditorError> {
        match normalize(field).as_str() {
            "name" | "referee" => self.name = text(value),
            "position" | "profession" => self.position = text(value),
            "organisation" | "organization" | "institution" | "church" => {
                self.organisation = text(value)
            }
            "address" => self.address = text(value),
            "phone" => self.phone = text(value),
            "email" => self.email = text(value),
            _ => return Err(unknown_field("referee", field, Self::FIELDS)),
        }
        Ok(())
    }
}

impl FormFields for FinancialReference {
    const FIELDS: &'static [&'static str] = &[
        "financeInfo",
        "healthInfo",
        "academicReferee",
        "academicProfession",
        "academicInstitution",
        "academicAddress",
        "academicPhone",
        "academicEmail",
        "clergyReferee",
        "clergyPosition",
        "clergyChurch",
        "clergyAddress",
        "clergyPhone",
        "clergyEmail",
        "applicantSignature",
        "applicantDate",
    ];

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), EditorError> {
        let key = normalize(field);
        match key.as_str() {
            "financeinfo" => self.finance_info = text(value),
            "healthinfo" => self.health_info = text(value),
            "applicantsignature" => self.applicant_signature = text(value),
            "applicantdate" => self.applicant_date = text(value),
            _ => {
                let (referee, inner) = if let Some(inner) = key.strip_prefix("academic") {
                    (&mut self.academic_referee, inner)
                } else if let Some(inner) = key.strip_prefix("clergy") {
                    (&mut self.clergy_referee, inner)
                } else {
                    return Err(unknown_field("financial reference", field, Self::FIELDS));
                };
                referee
                    .set_field(inner, value)
                    .map_err(|_| unknown_field("financial reference", field, Self::FIELDS))?;
            }
        }
        Ok(())
    }
}

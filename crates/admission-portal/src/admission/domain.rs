use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The six named sections an admission draft is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectionKind {
    Programme,
    Personal,
    Contact,
    Guardian,
    Education,
    Financial,
}

impl SectionKind {
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Programme,
        SectionKind::Personal,
        SectionKind::Contact,
        SectionKind::Guardian,
        SectionKind::Education,
        SectionKind::Financial,
    ];

    /// Key the section is stored under in the persisted draft.
    pub const fn key(self) -> &'static str {
        match self {
            SectionKind::Programme => "programmeInfo",
            SectionKind::Personal => "personalInfo",
            SectionKind::Contact => "contactDetails",
            SectionKind::Guardian => "guardianInfo",
            SectionKind::Education => "education",
            SectionKind::Financial => "financialReference",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            SectionKind::Programme => "Programme Information",
            SectionKind::Personal => "Personal Info",
            SectionKind::Contact => "Contact Details",
            SectionKind::Guardian => "Guardian Info",
            SectionKind::Education => "Education Qualification",
            SectionKind::Financial => "Financial & Reference",
        }
    }

    /// Accepts the storage key or a short name (`personal`, `contact`, ...).
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_ascii_lowercase();
        SectionKind::ALL.into_iter().find(|kind| {
            kind.key().eq_ignore_ascii_case(&wanted) || kind.short_name() == wanted
        })
    }

    pub const fn short_name(self) -> &'static str {
        match self {
            SectionKind::Programme => "programme",
            SectionKind::Personal => "personal",
            SectionKind::Contact => "contact",
            SectionKind::Guardian => "guardian",
            SectionKind::Education => "education",
            SectionKind::Financial => "financial",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A local file the applicant picked for upload. Bytes are only read when the
/// multipart body is assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub path: PathBuf,
    pub file_name: String,
}

impl Attachment {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, file_name }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const CHOICES: &'static str = "Male, Female";

    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Some(Gender::Male),
            "female" | "f" => Some(Gender::Female),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaritalStatus {
    Single,
    Married,
    Widowed,
    Divorced,
}

impl MaritalStatus {
    pub const CHOICES: &'static str = "Single, Married, Widowed, Divorced";

    pub const fn label(self) -> &'static str {
        match self {
            MaritalStatus::Single => "Single",
            MaritalStatus::Married => "Married",
            MaritalStatus::Widowed => "Widowed",
            MaritalStatus::Divorced => "Divorced",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "single" => Some(MaritalStatus::Single),
            "married" => Some(MaritalStatus::Married),
            "widowed" => Some(MaritalStatus::Widowed),
            "divorced" => Some(MaritalStatus::Divorced),
            _ => None,
        }
    }
}

/// Titles offered by the personal info form. The field itself stays free text.
pub const TITLE_OPTIONS: [&str; 5] = ["Mr", "Mrs", "Miss", "Dr", "Prof"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgrammeInfo {
    pub level: String,
    pub choice: String,
    pub passport_photos: Vec<Attachment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalInfo {
    pub surname: String,
    pub first_name: String,
    pub other_names: String,
    pub title: String,
    pub date_of_birth: String,
    pub place_of_birth: String,
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactDetails {
    pub present_address: String,
    pub permanent_address: String,
    pub postal_address: String,
    pub phone: String,
    pub email: String,
    pub nationality: String,
    pub native_language: String,
    pub place_differs_from_nationality: Option<bool>,
    pub marital_status: Option<MaritalStatus>,
    pub religion: String,
    pub denomination: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GuardianInfo {
    pub parent_guardian: String,
    pub emergency_contact: String,
    pub emergency_phone: String,
    pub next_of_kin: String,
    pub next_of_kin_phone: String,
}

/// One school attended. Field names double as the wire keys inside the
/// `education` JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstitutionRecord {
    pub institution: String,
    pub from: String,
    pub to: String,
    pub qualification: String,
}

impl InstitutionRecord {
    pub fn is_blank(&self) -> bool {
        [&self.institution, &self.from, &self.to, &self.qualification]
            .iter()
            .all(|value| value.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EducationShape")]
pub struct Education {
    pub institutions: Vec<InstitutionRecord>,
    pub certificates: Vec<Attachment>,
    pub description: Option<String>,
}

impl Education {
    /// Institutions that carry at least one filled-in field.
    pub fn filled_institutions(&self) -> impl Iterator<Item = &InstitutionRecord> {
        self.institutions.iter().filter(|record| !record.is_blank())
    }
}

/// Persisted drafts have stored education both as a bare list of
/// institutions and as the full object; both hydrate into [`Education`].
#[derive(Deserialize)]
#[serde(untagged)]
enum EducationShape {
    Institutions(Vec<InstitutionRecord>),
    Full {
        #[serde(default)]
        institutions: Vec<InstitutionRecord>,
        #[serde(default)]
        certificates: Vec<Attachment>,
        #[serde(default)]
        description: Option<String>,
    },
}

impl From<EducationShape> for Education {
    fn from(shape: EducationShape) -> Self {
        match shape {
            EducationShape::Institutions(institutions) => Education {
                institutions,
                ..Education::default()
            },
            EducationShape::Full {
                institutions,
                certificates,
                description,
            } => Education {
                institutions,
                certificates,
                description,
            },
        }
    }
}

/// Contact block for a referee. `position` and `organisation` carry the
/// profession/institution of an academic referee and the position/church of
/// a clergy referee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RefereeDetails {
    pub name: String,
    pub position: String,
    pub organisation: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinancialReference {
    pub finance_info: String,
    pub health_info: String,
    pub academic_referee: RefereeDetails,
    pub clergy_referee: RefereeDetails,
    pub applicant_signature: String,
    pub applicant_date: String,
}

/// The in-progress application: exactly six sections, each optional while
/// the applicant is still filling the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationDraft {
    #[serde(rename = "programmeInfo")]
    pub programme: ProgrammeInfo,
    #[serde(rename = "personalInfo")]
    pub personal: PersonalInfo,
    #[serde(rename = "contactDetails")]
    pub contact: ContactDetails,
    #[serde(rename = "guardianInfo")]
    pub guardian: GuardianInfo,
    pub education: Education,
    #[serde(rename = "financialReference")]
    pub financial: FinancialReference,
}

impl ApplicationDraft {
    /// Replace one section wholesale.
    pub fn apply(&mut self, data: SectionData) {
        match data {
            SectionData::Programme(section) => self.programme = section,
            SectionData::Personal(section) => self.personal = section,
            SectionData::Contact(section) => self.contact = section,
            SectionData::Guardian(section) => self.guardian = section,
            SectionData::Education(section) => self.education = section,
            SectionData::Financial(section) => self.financial = section,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ApplicationDraft::default()
    }
}

/// A full replacement value for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionData {
    Programme(ProgrammeInfo),
    Personal(PersonalInfo),
    Contact(ContactDetails),
    Guardian(GuardianInfo),
    Education(Education),
    Financial(FinancialReference),
}

impl SectionData {
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionData::Programme(_) => SectionKind::Programme,
            SectionData::Personal(_) => SectionKind::Personal,
            SectionData::Contact(_) => SectionKind::Contact,
            SectionData::Guardian(_) => SectionKind::Guardian,
            SectionData::Education(_) => SectionKind::Education,
            SectionData::Financial(_) => SectionKind::Financial,
        }
    }
}

/// Ties a section type to its slot in the draft.
pub trait Section: Clone + Default + fmt::Debug + Into<SectionData> {
    const KIND: SectionKind;

    fn in_draft(draft: &ApplicationDraft) -> &Self;

    /// Shape the stored value takes when an editor opens it.
    fn for_editing(self) -> Self {
        self
    }
}

macro_rules! section {
    ($ty:ty, $variant:ident, $field:ident) => {
        impl From<$ty> for SectionData {
            fn from(section: $ty) -> Self {
                SectionData::$variant(section)
            }
        }

        impl Section for $ty {
            const KIND: SectionKind = SectionKind::$variant;

            fn in_draft(draft: &ApplicationDraft) -> &Self {
                &draft.$field
            }
        }
    };
}

section!(ProgrammeInfo, Programme, programme);
section!(PersonalInfo, Personal, personal);
section!(ContactDetails, Contact, contact);
section!(GuardianInfo, Guardian, guardian);
section!(FinancialReference, Financial, financial);

impl From<Education> for SectionData {
    fn from(section: Education) -> Self {
        SectionData::Education(section)
    }
}

impl Section for Education {
    const KIND: SectionKind = SectionKind::Education;

    fn in_draft(draft: &ApplicationDraft) -> &Self {
        &draft.education
    }

    /// The education form always shows at least one institution row.
    fn for_editing(mut self) -> Self {
        if self.institutions.is_empty() {
            self.institutions.push(InstitutionRecord::default());
        }
        self
    }
}

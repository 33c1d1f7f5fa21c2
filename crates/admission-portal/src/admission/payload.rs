//! Flattening a draft into the multipart body `POST /admissions` expects.

use std::collections::BTreeSet;
use std::path::PathBuf;

use reqwest::multipart::{Form, Part};

use super::domain::{ApplicationDraft, Attachment, InstitutionRecord, RefereeDetails};

pub const EDUCATION_FIELD: &str = "education";
pub const CERTIFICATES_FIELD: &str = "certificates";
pub const PASSPORT_PHOTOS_FIELD: &str = "passportPhotos";

/// Every text field the backend accepts, in the order they are sent.
pub const TEXT_FIELDS: [&str; 43] = [
    "programmeLevel",
    "programmeChoice",
    "surname",
    "firstname",
    "otherNames",
    "title",
    "dateOfBirth",
    "placeOfBirth",
    "gender",
    "email",
    "phone",
    "presentAddress",
    "permanentAddress",
    "postalAddress",
    "nationality",
    "nativeLanguage",
    "placeDiffNationality",
    "maritalStatus",
    "religion",
    "denomination",
    "parentGuardian",
    "emergencyContact",
    "emergencyPhone",
    "nextOfKin",
    "nextOfKinPhone",
    EDUCATION_FIELD,
    "description",
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

pub const FILE_FIELDS: [&str; 2] = [CERTIFICATES_FIELD, PASSPORT_PHOTOS_FIELD];

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("education records could not be encoded: {0}")]
    Education(#[from] serde_json::Error),
    #[error("attachment {path} could not be read: {source}")]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("attachment {file_name} has an unusable content type: {source}")]
    ContentType {
        file_name: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Wire representation of a draft: flat text fields plus file parts.
///
/// Every documented text field is present (empty when the applicant left it
/// blank); files may repeat under the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    fields: Vec<(&'static str, String)>,
    files: Vec<(&'static str, Attachment)>,
}

impl SubmissionPayload {
    pub fn from_draft(draft: &ApplicationDraft) -> Result<Self, PayloadError> {
        let programme = &draft.programme;
        let personal = &draft.personal;
        let contact = &draft.contact;
        let guardian = &draft.guardian;
        let education = &draft.education;
        let financial = &draft.financial;

        let institutions: Vec<&InstitutionRecord> = education.filled_institutions().collect();
        let education_json = serde_json::to_string(&institutions)?;

        let mut fields = vec![
            ("programmeLevel", programme.level.clone()),
            ("programmeChoice", programme.choice.clone()),
            ("surname", personal.surname.clone()),
            ("firstname", personal.first_name.clone()),
            ("otherNames", personal.other_names.clone()),
            ("title", personal.title.clone()),
            ("dateOfBirth", personal.date_of_birth.clone()),
            ("placeOfBirth", personal.place_of_birth.clone()),
            (
                "gender",
                personal.gender.map(|g| g.label().to_string()).unwrap_or_default(),
            ),
            ("email", contact.email.clone()),
            ("phone", contact.phone.clone()),
            ("presentAddress", contact.present_address.clone()),
            ("permanentAddress", contact.permanent_address.clone()),
            ("postalAddress", contact.postal_address.clone()),
            ("nationality", contact.nationality.clone()),
            ("nativeLanguage", contact.native_language.clone()),
            (
                "placeDiffNationality",
                contact
                    .place_differs_from_nationality
                    .unwrap_or(false)
                    .to_string(),
            ),
            (
                "maritalStatus",
                contact
                    .marital_status
                    .map(|status| status.label().to_string())
                    .unwrap_or_default(),
            ),
            ("religion", contact.religion.clone()),
            ("denomination", contact.denomination.clone()),
            ("parentGuardian", guardian.parent_guardian.clone()),
            ("emergencyContact", guardian.emergency_contact.clone()),
            ("emergencyPhone", guardian.emergency_phone.clone()),
            ("nextOfKin", guardian.next_of_kin.clone()),
            ("nextOfKinPhone", guardian.next_of_kin_phone.clone()),
            (EDUCATION_FIELD, education_json),
            (
                "description",
                education.description.clone().unwrap_or_default(),
            ),
            ("financeInfo", financial.finance_info.clone()),
            ("healthInfo", financial.health_info.clone()),
        ];
        fields.extend(referee_fields(
            &financial.academic_referee,
            [
                "academicReferee",
                "academicProfession",
                "academicInstitution",
                "academicAddress",
                "academicPhone",
                "academicEmail",
            ],
        ));
        fields.extend(referee_fields(
            &financial.clergy_referee,
            [
                "clergyReferee",
                "clergyPosition",
                "clergyChurch",
                "clergyAddress",
                "clergyPhone",
                "clergyEmail",
            ],
        ));
        fields.push(("applicantSignature", financial.applicant_signature.clone()));
        fields.push(("applicantDate", financial.applicant_date.clone()));

        let files = education
            .certificates
            .iter()
            .map(|file| (CERTIFICATES_FIELD, file.clone()))
            .chain(
                programme
                    .passport_photos
                    .iter()
                    .map(|file| (PASSPORT_PHOTOS_FIELD, file.clone())),
            )
            .collect();

        Ok(Self { fields, files })
    }

    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn files(&self) -> &[(&'static str, Attachment)] {
        &self.files
    }

    pub fn files_under<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Attachment> + 'a {
        self.files
            .iter()
            .filter(move |(name, _)| *name == key)
            .map(|(_, file)| file)
    }

    /// Distinct keys across text and file parts.
    pub fn keys(&self) -> BTreeSet<&'static str> {
        self.fields
            .iter()
            .map(|(key, _)| *key)
            .chain(self.files.iter().map(|(key, _)| *key))
            .collect()
    }

    /// Read the attachments and assemble the multipart body.
    pub async fn into_form(self) -> Result<Form, PayloadError> {
        let mut form = Form::new();
        for (key, value) in self.fields {
            form = form.text(key, value);
        }

        for (key, attachment) in self.files {
            let bytes = tokio::fs::read(&attachment.path)
                .await
                .map_err(|source| PayloadError::Attachment {
                    path: attachment.path.clone(),
                    source,
                })?;
            let content_type = mime_guess::from_path(&attachment.path)
                .first_or(mime::APPLICATION_OCTET_STREAM);
            let part = Part::bytes(bytes)
                .file_name(attachment.file_name.clone())
                .mime_str(content_type.essence_str())
                .map_err(|source| PayloadError::ContentType {
                    file_name: attachment.file_name.clone(),
                    source,
                })?;
            form = form.part(key, part);
        }

        Ok(form)
    }
}

fn referee_fields(
    referee: &RefereeDetails,
    keys: [&'static str; 6],
) -> [(&'static str, String); 6] {
    let [name, position, organisation, address, phone, email] = keys;
    [
        (name, referee.name.clone()),
        (position, referee.position.clone()),
        (organisation, referee.organisation.clone()),
        (address, referee.address.clone()),
        (phone, referee.phone.clone()),
        (email, referee.email.clone()),
    ]
}

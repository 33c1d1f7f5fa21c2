//! The admission wizard: draft store, step editors, review and submission.

pub mod domain;
pub mod editor;
pub mod payload;
pub mod review;
pub mod store;
pub mod submit;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationDraft, Attachment, ContactDetails, Education, FinancialReference, Gender,
    GuardianInfo, InstitutionRecord, MaritalStatus, PersonalInfo, ProgrammeInfo, RefereeDetails,
    Section, SectionData, SectionKind, TITLE_OPTIONS,
};
pub use editor::{
    ContactDetailsEditor, EditorError, EducationEditor, FinancialReferenceEditor, FormFields,
    GuardianInfoEditor, PersonalInfoEditor, ProgrammeInfoEditor, SectionEditor,
};
pub use payload::{PayloadError, SubmissionPayload};
pub use review::{ReviewRow, ReviewSection, ReviewSummary, MISSING_VALUE};
pub use store::{
    DraftStorage, DraftStore, FileDraftStorage, MemoryDraftStorage, StoreError, DRAFT_STORAGE_KEY,
};
pub use submit::{
    AdmissionGateway, CompletedSubmission, PendingSubmission, SubmissionController, SubmitError,
    SubmitStatus, SUBMIT_FALLBACK_MESSAGE,
};

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::admission::domain::{
    ApplicationDraft, Attachment, ContactDetails, Education, FinancialReference, Gender,
    GuardianInfo, InstitutionRecord, MaritalStatus, PersonalInfo, ProgrammeInfo, RefereeDetails,
};
use crate::admission::payload::SubmissionPayload;
use crate::admission::store::{DraftStore, MemoryDraftStorage};
use crate::admission::submit::AdmissionGateway;
use crate::api::{ApiError, ApplicationStatus, SubmittedApplication};

pub(super) fn referee(name: &str, position: &str, organisation: &str) -> RefereeDetails {
    RefereeDetails {
        name: name.to_string(),
        position: position.to_string(),
        organisation: organisation.to_string(),
        address: "12 College Road".to_string(),
        phone: "+233 20 000 0000".to_string(),
        email: format!("{}@example.org", name.to_ascii_lowercase().replace(' ', ".")),
    }
}

/// A draft with every field filled in.
pub(super) fn populated_draft() -> ApplicationDraft {
    ApplicationDraft {
        programme: ProgrammeInfo {
            level: "Diploma".to_string(),
            choice: "Theology".to_string(),
            passport_photos: vec![Attachment::from_path("/uploads/passport-front.jpg")],
        },
        personal: PersonalInfo {
            surname: "Lovelace".to_string(),
            first_name: "Ada".to_string(),
            other_names: "Augusta".to_string(),
            title: "Miss".to_string(),
            date_of_birth: "1815-12-10".to_string(),
            place_of_birth: "London".to_string(),
            gender: Some(Gender::Female),
        },
        contact: ContactDetails {
            present_address: "1 St James's Square".to_string(),
            permanent_address: "Ockham Park".to_string(),
            postal_address: "P.O. Box 1815".to_string(),
            phone: "+44 20 7946 0000".to_string(),
            email: "ada@example.org".to_string(),
            nationality: "British".to_string(),
            native_language: "English".to_string(),
            place_differs_from_nationality: Some(true),
            marital_status: Some(MaritalStatus::Married),
            religion: "Christian".to_string(),
            denomination: "Anglican".to_string(),
        },
        guardian: GuardianInfo {
            parent_guardian: "Anne Isabella Milbanke".to_string(),
            emergency_contact: "William King".to_string(),
            emergency_phone: "+44 20 7946 0001".to_string(),
            next_of_kin: "Byron King".to_string(),
            next_of_kin_phone: "+44 20 7946 0002".to_string(),
        },
        education: Education {
            institutions: vec![
                InstitutionRecord {
                    institution: "Home tutoring".to_string(),
                    from: "1820".to_string(),
                    to: "1832".to_string(),
                    qualification: "Mathematics".to_string(),
                },
                InstitutionRecord::default(),
            ],
            certificates: vec![
                Attachment::from_path("/uploads/transcript.pdf"),
                Attachment::from_path("/uploads/diploma.pdf"),
            ],
            description: Some("Analytical engine notes".to_string()),
        },
        financial: FinancialReference {
            finance_info: "Self-funded".to_string(),
            health_info: "None".to_string(),
            academic_referee: referee("Augustus De Morgan", "Professor", "University College"),
            clergy_referee: referee("John Keble", "Vicar", "Hursley Parish"),
            applicant_signature: "A. A. Lovelace".to_string(),
            applicant_date: "1843-07-01".to_string(),
        },
    }
}

pub(super) fn populated_store() -> (DraftStore<MemoryDraftStorage>, MemoryDraftStorage) {
    let storage = MemoryDraftStorage::default();
    let mut store = DraftStore::open(storage.clone());
    let draft = populated_draft();
    store.update(draft.programme);
    store.update(draft.personal);
    store.update(draft.contact);
    store.update(draft.guardian);
    store.update(draft.education);
    store.update(draft.financial);
    (store, storage)
}

pub(super) fn accepted_application(id: &str) -> SubmittedApplication {
    SubmittedApplication {
        id: id.to_string(),
        status: ApplicationStatus::Pending,
        firstname: "Ada".to_string(),
        surname: "Lovelace".to_string(),
        ..SubmittedApplication::default()
    }
}

#[derive(Debug, Clone)]
pub(super) enum Reply {
    Accept(SubmittedApplication),
    Reject { status: u16, message: Option<String> },
}

/// Scripted stand-in for the admissions endpoint.
#[derive(Debug)]
pub(super) struct FakeGateway {
    reply: Reply,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
    payloads: Mutex<Vec<SubmissionPayload>>,
}

impl FakeGateway {
    pub(super) fn accepting(application: SubmittedApplication) -> Self {
        Self::replying(Reply::Accept(application))
    }

    pub(super) fn rejecting(status: u16, message: Option<&str>) -> Self {
        Self::replying(Reply::Reject {
            status,
            message: message.map(str::to_string),
        })
    }

    fn replying(reply: Reply) -> Self {
        Self {
            reply,
            gate: None,
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
        }
    }

    /// Hold every reply until the gate is notified.
    pub(super) fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn payloads(&self) -> Vec<SubmissionPayload> {
        self.payloads.lock().expect("payload lock").clone()
    }
}

impl AdmissionGateway for FakeGateway {
    fn submit_application(
        &self,
        payload: SubmissionPayload,
    ) -> impl Future<Output = Result<SubmittedApplication, ApiError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().expect("payload lock").push(payload);
        let gate = self.gate.clone();
        let reply = self.reply.clone();
        async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            match reply {
                Reply::Accept(application) => Ok(application),
                Reply::Reject { status, message } => Err(ApiError::Status {
                    endpoint: "POST /admissions".to_string(),
                    status,
                    message,
                }),
            }
        }
    }
}

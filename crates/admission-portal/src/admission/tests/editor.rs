use super::common::*;
use crate::admission::domain::{
    ContactDetails, Education, FinancialReference, Gender, InstitutionRecord, MaritalStatus,
    PersonalInfo, ProgrammeInfo,
};
use crate::admission::editor::{
    ContactDetailsEditor, EditorError, EducationEditor, FinancialReferenceEditor,
    PersonalInfoEditor, ProgrammeInfoEditor,
};
use crate::admission::store::{DraftStore, MemoryDraftStorage};

fn empty_store() -> DraftStore<MemoryDraftStorage> {
    DraftStore::open(MemoryDraftStorage::default())
}

#[test]
fn saved_personal_info_reopens_with_exactly_those_values() {
    let mut store = empty_store();

    let mut editor = PersonalInfoEditor::open(&store);
    editor.set_field("firstName", "Ada").expect("known field");
    editor.set_field("surname", "Lovelace").expect("known field");
    editor.save(&mut store);

    let reopened = PersonalInfoEditor::open(&store);
    assert_eq!(
        reopened.form(),
        &PersonalInfo {
            first_name: "Ada".to_string(),
            surname: "Lovelace".to_string(),
            ..PersonalInfo::default()
        }
    );
    assert_eq!(reopened.form().other_names, "");
    assert_eq!(reopened.form().gender, None);
}

#[test]
fn cancelled_editor_leaves_store_untouched() {
    let (store, storage) = populated_store();
    let before = store.draft().clone();
    let persisted = storage.contents();

    let mut editor = ContactDetailsEditor::open(&store);
    editor.set_field("email", "someone@else.org").expect("known field");
    editor.form_mut().religion = String::new();
    editor.cancel();

    let mut dropped = PersonalInfoEditor::open(&store);
    dropped.set_field("surname", "Byron").expect("known field");
    drop(dropped);

    assert_eq!(store.draft(), &before);
    assert_eq!(storage.contents(), persisted);
}

#[test]
fn field_names_ignore_case_and_separators() {
    let store = empty_store();
    let mut editor = PersonalInfoEditor::open(&store);

    editor.set_field("first_name", " Ada ").expect("snake case");
    editor.set_field("Date-Of-Birth", "1815-12-10").expect("kebab case");

    assert_eq!(editor.form().first_name, "Ada");
    assert_eq!(editor.form().date_of_birth, "1815-12-10");
}

#[test]
fn unknown_field_is_an_editor_error() {
    let store = empty_store();
    let mut editor = ProgrammeInfoEditor::open(&store);

    let err = editor
        .set_field("programmeDuration", "4 years")
        .expect_err("no such field");

    match err {
        EditorError::UnknownField { field, expected, .. } => {
            assert_eq!(field, "programmeDuration");
            assert!(expected.contains("programmeLevel"));
        }
        other => panic!("expected unknown field, got {other:?}"),
    }
    assert_eq!(editor.form(), &ProgrammeInfo::default());
}

#[test]
fn single_select_fields_hold_one_value_or_none() {
    let mut store = empty_store();

    let mut personal = PersonalInfoEditor::open(&store);
    personal.set_field("gender", "female").expect("label parses");
    assert_eq!(personal.form().gender, Some(Gender::Female));
    personal.set_field("gender", "MALE").expect("label parses");
    assert_eq!(personal.form().gender, Some(Gender::Male));
    personal.set_field("gender", "").expect("empty clears");
    assert_eq!(personal.form().gender, None);
    assert!(matches!(
        personal.set_field("gender", "unspecified"),
        Err(EditorError::InvalidChoice { field: "gender", .. })
    ));

    let mut contact = ContactDetailsEditor::open(&store);
    contact
        .set_field("maritalStatus", "Widowed")
        .expect("label parses");
    contact
        .set_field("placeDiffNationality", "yes")
        .expect("yes parses");
    assert!(contact.set_field("maritalStatus", "engaged").is_err());
    contact.save(&mut store);

    let saved = store.section::<ContactDetails>();
    assert_eq!(saved.marital_status, Some(MaritalStatus::Widowed));
    assert_eq!(saved.place_differs_from_nationality, Some(true));
}

#[test]
fn education_editor_always_shows_a_template_row() {
    let mut store = empty_store();

    let mut editor = EducationEditor::open(&store);
    assert_eq!(editor.form().institutions, vec![InstitutionRecord::default()]);

    editor
        .set_institution_field(0, "institution", "Ridge School")
        .expect("row exists");
    editor.add_institution();
    editor
        .set_field("1.qualification", "WASSCE")
        .expect("indexed field");
    assert_eq!(editor.form().institutions.len(), 2);

    let removed = editor.remove_institution(0).expect("row exists");
    assert_eq!(removed.institution, "Ridge School");
    editor.remove_institution(0).expect("row exists");
    assert_eq!(editor.form().institutions, vec![InstitutionRecord::default()]);

    assert!(matches!(
        editor.remove_institution(3),
        Err(EditorError::NoSuchInstitution { index: 3 })
    ));
    assert!(matches!(
        editor.set_institution_field(2, "to", "2020"),
        Err(EditorError::NoSuchInstitution { index: 2 })
    ));

    editor.set_field("description", "Transferred in 2019").expect("description");
    editor.attach_certificate("/tmp/results.pdf");
    editor.save(&mut store);

    let saved = store.section::<Education>();
    assert_eq!(saved.description.as_deref(), Some("Transferred in 2019"));
    assert_eq!(saved.certificates[0].file_name, "results.pdf");
}

#[test]
fn financial_editor_routes_referee_fields() {
    let mut store = empty_store();
    let mut editor = FinancialReferenceEditor::open(&store);

    editor
        .set_field("academicReferee", "Augustus De Morgan")
        .expect("referee name");
    editor
        .set_field("academicProfession", "Professor")
        .expect("academic profession");
    editor
        .set_field("clergyChurch", "Hursley Parish")
        .expect("clergy church");
    editor.set_field("healthInfo", "None").expect("health");
    assert!(editor.set_field("clergyShoeSize", "9").is_err());
    editor.save(&mut store);

    let saved = store.section::<FinancialReference>();
    assert_eq!(saved.academic_referee.name, "Augustus De Morgan");
    assert_eq!(saved.academic_referee.position, "Professor");
    assert_eq!(saved.clergy_referee.organisation, "Hursley Parish");
    assert_eq!(saved.health_info, "None");
}

#[test]
fn passport_photos_attach_and_clear() {
    let mut store = empty_store();
    let mut editor = ProgrammeInfoEditor::open(&store);

    editor.attach_passport_photo("/photos/front.png");
    editor.attach_passport_photo("/photos/side.png");
    assert_eq!(editor.form().passport_photos.len(), 2);
    editor.clear_passport_photos();
    editor.attach_passport_photo("/photos/retake.png");
    editor.save(&mut store);

    let saved = store.section::<ProgrammeInfo>();
    assert_eq!(saved.passport_photos.len(), 1);
    assert_eq!(saved.passport_photos[0].file_name, "retake.png");
}

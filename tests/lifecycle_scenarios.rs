use tempfile::TempDir;

use transdesk::desk::WorkDesk;
use transdesk::error::DeskError;
use transdesk::lifecycle::{
    GuardFailure, LifecycleEngine, NewWork, TransitionName, WorkItem, WorkState,
};
use transdesk::permissions::{Actor, Operation, PermissionEvaluator, Role};
use transdesk::store::{JsonFileStore, WorkStore};
use transdesk::translator::{Translator, TranslatorRoster};

fn director() -> Actor {
    Actor::new("dir-1", Role::Director)
}

fn file_desk(dir: &TempDir) -> WorkDesk<JsonFileStore> {
    WorkDesk::new(JsonFileStore::open(dir.path().join("works.json")))
}

fn new_work(name: &str) -> NewWork {
    NewWork {
        name: name.into(),
        ..Default::default()
    }
}

#[test]
fn draft_is_approved_at_ten_percent() {
    let dir = TempDir::new().unwrap();
    let mut desk = file_desk(&dir);
    let work = desk.create(&director(), new_work("Đại Nam thực lục")).unwrap();
    assert_eq!(work.state(), WorkState::Draft);

    let approved = desk.approve(&director(), &work.id).unwrap();
    assert_eq!(approved.state(), WorkState::Approved);
    assert_eq!(approved.progress_percent(), 10);

    let reloaded = JsonFileStore::open(dir.path().join("works.json"))
        .load(&work.id)
        .unwrap();
    assert_eq!(reloaded.state(), WorkState::Approved);
    assert_eq!(reloaded.progress_percent(), 10);
}

#[test]
fn assign_without_translator_reference_is_missing_translator() {
    let work = LifecycleEngine::approve(&WorkItem::new("Gia Định thành thông chí")).unwrap();
    let err = LifecycleEngine::apply_transition(&work, TransitionName::AssignTranslator)
        .unwrap_err();
    assert!(matches!(err.reason, GuardFailure::MissingTranslator { .. }));
    assert_eq!(err.status_code(), 400);
    assert_eq!(work.state(), WorkState::Approved);
}

#[test]
fn assign_with_translator_reference_reaches_fifteen_percent() {
    let mut work = LifecycleEngine::approve(&WorkItem::new("Ô châu cận lục")).unwrap();
    work.translator = Some("T1".into());
    let assigned =
        LifecycleEngine::apply_transition(&work, TransitionName::AssignTranslator).unwrap();
    assert_eq!(assigned.state(), WorkState::TranslatorAssigned);
    assert_eq!(assigned.progress_percent(), 15);
}

#[test]
fn approve_from_trial_translation_is_invalid() {
    let dir = TempDir::new().unwrap();
    let mut desk = file_desk(&dir);
    let root = Actor::new("root", Role::Superuser);
    let work = desk.create(&director(), new_work("Dư địa chí")).unwrap();
    desk.approve(&director(), &work.id).unwrap();
    desk.assign_translator(&director(), &work.id, Some("T1")).unwrap();
    desk.start_trial(&root, &work.id).unwrap();

    let err = desk.approve(&director(), &work.id).unwrap_err();
    match err {
        DeskError::Transition(e) => {
            assert_eq!(
                e.reason,
                GuardFailure::InvalidTransition {
                    current: WorkState::TrialTranslation,
                    requested: TransitionName::Approve,
                }
            );
            assert_eq!(e.status_code(), 409);
        }
        other => panic!("expected transition error, got {other:?}"),
    }

    let stored = desk.store().load(&work.id).unwrap();
    assert_eq!(stored.state(), WorkState::TrialTranslation);
    assert_eq!(stored.progress_percent(), 20);
}

#[test]
fn other_translator_cannot_update() {
    let mut work = WorkItem::new("Lịch triều hiến chương loại chí");
    work.translator = Some("T1".into());
    let intruder = Actor::new("T2", Role::Translator);
    assert!(!PermissionEvaluator::can_perform(
        &intruder,
        Operation::Update,
        Some(&work)
    ));
}

#[test]
fn roster_backed_assignment_checks_translator() {
    let dir = TempDir::new().unwrap();
    let roster_path = dir.path().join("translators.json");
    let secretary = Actor::new("s-1", Role::ComponentSecretary);

    let mut desk = file_desk(&dir).with_roster(TranslatorRoster::load(&roster_path).unwrap());
    desk.register_translator(&secretary, Translator::new("T1", "Nguyễn Du"))
        .unwrap();

    let work = desk.create(&director(), new_work("Truyện Kiều")).unwrap();
    desk.approve(&director(), &work.id).unwrap();

    // A fresh desk over the same files sees the registered translator.
    let mut desk = file_desk(&dir).with_roster(TranslatorRoster::load(&roster_path).unwrap());
    let err = desk
        .assign_translator(&director(), &work.id, Some("T7"))
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
    let assigned = desk
        .assign_translator(&director(), &work.id, Some("T1"))
        .unwrap();
    assert_eq!(assigned.state(), WorkState::TranslatorAssigned);
}

use aoc_access::{count_by_role, AccessibilityProvider, AccessibleEventKind, Role, Toolkit};
use aoc_harness::*;
use aoc_model::{Desktop, DocumentService, PropertyChange, PropertySet, ServiceError, Value, TITLE};
use aoc_test_utils::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[test]
fn test_title_sequence_and_disposal() {
    let case = GraphicObjectCase::new(Desktop::new(), Toolkit::new());
    let fixture = case.initialize().unwrap();
    let env = case.create_test_environment(&fixture).unwrap();

    assert_eq!(env.test_object().role(), Role::Graphic);

    let title0 = fixture.object().get_string(TITLE).unwrap();
    let writes = PropertyRecorder::attach(&**fixture.object(), TITLE);
    let events = EventRecorder::attach(env.test_object());

    env.event_producer().unwrap().fire_event();

    let mut observed = vec![Value::from(title0.as_str())];
    observed.extend(writes.values());
    assert_eq!(
        observed,
        vec![
            Value::from(title0.as_str()),
            Value::from("New Title"),
            Value::from(title0.as_str()),
        ]
    );
    assert_eq!(fixture.object().get_string(TITLE).unwrap(), title0);

    let kinds: Vec<_> = events.events().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![AccessibleEventKind::NameChanged, AccessibleEventKind::NameChanged]
    );
    assert!(events.detach());

    case.cleanup(&fixture).unwrap();
    assert!(fixture.document().is_disposed());
    assert!(matches!(
        fixture.document().snapshot(),
        Err(ServiceError::Disposed(_))
    ));
    assert!(matches!(
        case.cleanup(&fixture),
        Err(ServiceError::AlreadyClosed(_))
    ));
}

#[test]
fn test_fresh_fixture_has_exactly_one_graphic() {
    let desktop = Desktop::new();
    let toolkit = Toolkit::new();
    let fixture = FixtureBuilder::new(&desktop).build().unwrap();

    let window = toolkit.current_window(fixture.document()).unwrap();
    let root = toolkit.accessible_root(&window).unwrap();
    assert_eq!(count_by_role(&root, Role::Graphic), 1);

    let node = TreeLocator::new(&toolkit).locate(&window, Role::Graphic).unwrap();
    assert_eq!(node.role(), Role::Graphic);
    assert_eq!(node.implementation_name(), "aoc.text.GraphicObject");
}

#[test]
fn test_renamed_node_must_be_relocated() {
    let case = GraphicObjectCase::new(Desktop::new(), Toolkit::new());
    let fixture = case.initialize().unwrap();
    let before = case.create_test_environment(&fixture).unwrap();

    fixture.object().set_property(TITLE, Value::from("Logo")).unwrap();

    let after = case.create_test_environment(&fixture).unwrap();
    assert_eq!(before.test_object().name(), "Graphic1");
    assert_eq!(after.test_object().name(), "Logo");
    case.cleanup(&fixture).unwrap();
}

#[test]
fn test_controller_runs_checker_and_disposes_once() {
    let mut controller = LifecycleController::new(recording_case());
    let report = controller
        .run(|env| EventBroadcasterCheck::new().run(env))
        .unwrap()
        .unwrap();

    assert!(report.passed());
    assert_eq!(report.events_received.len(), 2);
    assert_eq!(controller.state(), LifecycleState::Disposed);

    let service = controller.case().service();
    assert_eq!(service.create_count(), 1);
    assert_eq!(service.close_count(), 1);
    assert_eq!(service.inner().open_documents(), 0);
}

#[test]
fn test_vetoed_title_reduces_event_count_silently() {
    let case = GraphicObjectCase::new(Desktop::new(), Toolkit::new());
    let fixture = case.initialize().unwrap();
    fixture.object().add_veto_listener(
        TITLE,
        Arc::new(|_: &PropertyChange| -> Result<(), String> { Err("locked".to_string()) }),
    );
    let env = case.create_test_environment(&fixture).unwrap();

    let report = EventBroadcasterCheck::new().run(&env).unwrap();

    assert!(report.events_received.is_empty());
    assert!(!report.passed());
    case.cleanup(&fixture).unwrap();
}

#[test]
fn test_every_fault_kind_is_discarded() {
    for fault in all_faults() {
        let target = Arc::new(FaultingPropertySet::new(fault.clone()));
        let trigger = TitleRoundTrip::new(target.clone());

        trigger.fire_event();
        assert_eq!(target.write_attempts(), 1, "{fault}");

        assert_eq!(trigger.trigger().unwrap_err(), fault);
        assert_eq!(target.write_attempts(), 2);
    }
}

#[test]
fn test_restore_fault_leaves_sentinel_in_place() {
    for fault in all_faults() {
        let target = Arc::new(FaultingPropertySet::new(fault.clone()).after_writes(1));
        let trigger = TitleRoundTrip::new(target.clone());

        trigger.fire_event();

        assert_eq!(target.write_attempts(), 2, "{fault}");
        assert_eq!(target.title(), "New Title");
    }
}

#[test]
fn test_shared_session_keeps_no_windows() {
    let desktop = Arc::new(Desktop::new());
    let toolkit = Arc::new(Toolkit::new());

    for _ in 0..2 {
        let case = GraphicObjectCase::new(Arc::clone(&desktop), Arc::clone(&toolkit));
        let report = run_with_check(case, &EventBroadcasterCheck::new());
        assert!(report.passed(), "{}", report.generate_text());
    }

    assert_eq!(desktop.open_documents(), 0);
    assert_eq!(toolkit.window_count(), 0);
    assert_eq!(toolkit.broadcaster_count(), 0);
}

#[test]
fn test_unknown_title_is_discarded() {
    let object = Arc::new(aoc_model::PropertyStore::new().with("Name", "Graphic1"));
    let trigger = TitleRoundTrip::new(object.clone());

    trigger.fire_event();
    assert!(matches!(
        trigger.trigger(),
        Err(MutationFault::UnknownProperty(_))
    ));
}

#[test]
fn test_non_string_title_is_discarded() {
    let object = Arc::new(aoc_model::PropertyStore::new().with(TITLE, 3_i64));
    let trigger = TitleRoundTrip::new(object.clone());

    trigger.fire_event();
    assert!(matches!(
        trigger.trigger(),
        Err(MutationFault::TypeMismatch { .. })
    ));
    assert_eq!(object.get_property(TITLE).unwrap(), Value::Int(3));
}

#[test]
fn test_independent_runs_on_separate_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(|| {
                run_with_check(
                    GraphicObjectCase::new(Desktop::new(), Toolkit::new()),
                    &EventBroadcasterCheck::new(),
                )
            })
        })
        .collect();

    for handle in handles {
        let report = handle.join().unwrap();
        assert!(report.passed(), "{}", report.generate_text());
    }
}

#[test]
fn test_first_graphic_in_document_order_wins() {
    let root = window_tree([
        aoc_access::AccessibleNode::builder(Role::Paragraph)
            .child(aoc_access::AccessibleNode::builder(Role::Graphic).name("nested")),
        aoc_access::AccessibleNode::builder(Role::TextFrame),
        aoc_access::AccessibleNode::builder(Role::Graphic).name("sibling"),
    ]);

    let found = aoc_access::find_first_by_role(&root, Role::Graphic).unwrap();
    assert_eq!(found.name(), "nested");
    assert_eq!(count_by_role(&root, Role::Graphic), 2);
}

#[test]
fn test_listener_survives_reprojection() {
    let desktop = Desktop::new();
    let toolkit = Toolkit::new();
    let (document, graphic) = text_with_graphic(&desktop);

    let locator = TreeLocator::new(&toolkit);
    let first = locator.locate_in(&document, Role::Graphic).unwrap();
    let events = EventRecorder::attach(&first);

    let second = locator.locate_in(&document, Role::Graphic).unwrap();
    TitleRoundTrip::new(graphic.clone()).fire_event();

    assert_eq!(second.source(), first.source());
    assert_eq!(events.events().len(), 2);
    desktop.close_document(&document).unwrap();
}

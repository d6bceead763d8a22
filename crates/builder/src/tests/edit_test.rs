use super::*;
use crate::{BuilderEvent, EditField};
use node::{CanvasPoint, ScreenPoint};

#[test]
fn test_new_nodes_open_label_editing() {
    let mut builder = empty_builder(&[]);
    let stage = builder.add_stage("", None).unwrap();
    let session = builder.edit_session().unwrap();
    assert_eq!(session.node_id, stage);
    assert_eq!(session.field, EditField::Label);

    builder.set_draft("Intake");
    assert!(builder.save_edit());
    assert_eq!(builder.node(&stage).unwrap().label, "Intake");
    assert_eq!(builder.render().node(&stage).unwrap().title, "1. Intake");
}

#[test]
fn test_second_create_discards_first_session() {
    let mut builder = empty_builder(&[]);
    let first = builder.add_conditional("Branch", None).unwrap();
    builder.set_draft("Typed but not saved");
    let second = builder.add_error_handler("Escalate", "", None).unwrap();

    assert_eq!(builder.edit_session().unwrap().node_id, second);
    assert_eq!(builder.node(&first).unwrap().label, "Branch");
    let events = builder.take_events();
    assert!(events.contains(&BuilderEvent::EditClosed {
        node_id: first,
        committed: false,
    }));
}

#[test]
fn test_task_cards_do_not_auto_open() {
    let mut builder = empty_builder(&["t"]);
    builder.drop_on_canvas(&pool_payload("t"), ScreenPoint::new(0.0, 0.0));
    assert!(builder.edit_session().is_none());
}

#[test]
fn test_department_edit() {
    let mut builder = empty_builder(&["t"]);
    let t = builder
        .drop_on_canvas(&pool_payload("t"), ScreenPoint::new(0.0, 0.0))
        .unwrap();
    assert!(builder.begin_edit(&t, EditField::Department));
    assert_eq!(builder.edit_session().unwrap().draft, "Ops");
    builder.set_draft("Finance");
    builder.save_edit();
    assert_eq!(builder.node(&t).unwrap().department(), Some("Finance"));

    assert!(!builder.begin_edit(&t, EditField::Description));
}

#[test]
fn test_cancel_leaves_graph_untouched() {
    let mut builder = empty_builder(&[]);
    let stage = builder.add_stage("Intake", Some(CanvasPoint::new(0.0, 0.0))).unwrap();
    let before = builder.snapshot();
    builder.set_draft("Changed");
    assert!(builder.cancel_edit());
    assert!(!builder.save_edit());
    assert_eq!(builder.snapshot(), before);
    assert_eq!(builder.node(&stage).unwrap().label, "Intake");
}

#[test]
fn test_spawn_points_cascade() {
    let mut builder = empty_builder(&[]);
    let a = builder.add_stage("A", None).unwrap();
    let b = builder.add_stage("B", None).unwrap();
    let origin = builder.settings().spawn_origin;
    let offset = builder.settings().spawn_offset;
    assert_eq!(builder.store().absolute_position(&a), Some(origin));
    assert_eq!(builder.store().absolute_position(&b), Some(origin + offset));
}

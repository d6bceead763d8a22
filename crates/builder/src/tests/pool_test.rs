use super::*;
use crate::BuilderEvent;
use node::{CanvasPoint, ScreenPoint};

const IDS: [&str; 3] = ["a", "b", "c"];

#[test]
fn test_pool_and_canvas_stay_disjoint() {
    let mut builder = empty_builder(&IDS);
    assert_disjoint(&builder, &IDS);

    let stage = builder.add_stage("S", Some(CanvasPoint::new(0.0, 0.0))).unwrap();
    builder.drop_on_canvas(&pool_payload("a"), ScreenPoint::new(10.0, 10.0));
    assert_disjoint(&builder, &IDS);
    builder.drop_on_canvas(&pool_payload("b"), ScreenPoint::new(600.0, 10.0));
    assert_disjoint(&builder, &IDS);

    builder.delete_node(&NodeId::from("b"));
    assert_disjoint(&builder, &IDS);

    builder.delete_node(&stage);
    assert_disjoint(&builder, &IDS);
    assert_eq!(builder.pool().len(), 3);
}

#[test]
fn test_consumed_entry_cannot_be_dropped_twice() {
    let mut builder = empty_builder(&["a"]);
    assert!(builder
        .drop_on_canvas(&pool_payload("a"), ScreenPoint::new(10.0, 10.0))
        .is_some());
    assert!(builder
        .drop_on_canvas(&pool_payload("a"), ScreenPoint::new(400.0, 10.0))
        .is_none());
    assert_eq!(builder.store().node_count(), 1);
}

#[test]
fn test_returned_entry_keeps_label_and_department() {
    let mut builder = empty_builder(&["a"]);
    let id = builder
        .drop_on_canvas(&pool_payload("a"), ScreenPoint::new(10.0, 10.0))
        .unwrap();
    builder.take_events();

    builder.delete_node(&id);
    let entry = builder.pool().get(&id).unwrap();
    assert_eq!(entry.label, "Task a");
    assert_eq!(entry.department, "Ops");
    assert!(builder
        .take_events()
        .contains(&BuilderEvent::PoolEntryReturned(id)));
}

#[test]
fn test_loaded_cards_are_not_pooled() {
    let slot = MemorySlot::new();
    slot.write(
        DEFAULT_STORAGE_KEY,
        r#"{"version":1,"nodes":[{"id":"b","kind":"taskCard","position":{"x":0,"y":0},"label":"Task b","department":"Ops"}],"edges":[]}"#,
    )
    .unwrap();
    let builder = WorkflowBuilder::open(settings_with_pool(&IDS), Box::new(slot));
    assert_disjoint(&builder, &IDS);
    assert_eq!(builder.pool().len(), 2);
}

#[test]
fn test_entry_sharing_an_id_with_a_stage_stays_pooled() {
    let ids = ["stage-intake", "a"];
    let mut builder = WorkflowBuilder::new(settings_with_pool(&ids));
    assert!(builder.node(&NodeId::from("stage-intake")).is_some_and(|n| n.is_stage()));
    assert_disjoint(&builder, &ids);
    assert_eq!(builder.pool().len(), 2);

    builder.reset();
    assert_disjoint(&builder, &ids);
    assert_eq!(builder.pool().len(), 2);
}

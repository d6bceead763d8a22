use super::*;
use crate::{BuilderEvent, EditField};
use graph::GraphEvent;
use node::{CanvasPoint, ScreenPoint, CONDITIONAL_TRUE};

fn three_stages(builder: &mut WorkflowBuilder) -> [NodeId; 3] {
    [
        builder.add_stage("One", Some(CanvasPoint::new(0.0, 0.0))).unwrap(),
        builder.add_stage("Two", Some(CanvasPoint::new(300.0, 0.0))).unwrap(),
        builder.add_stage("Three", Some(CanvasPoint::new(600.0, 0.0))).unwrap(),
    ]
}

#[test]
fn test_delete_stage_two_renumbers() {
    let mut builder = empty_builder(&[]);
    let [one, two, three] = three_stages(&mut builder);
    builder.take_events();

    builder.delete_node(&two);

    let titles: Vec<_> = builder.render().nodes.into_iter().map(|n| n.title).collect();
    assert_eq!(titles, vec!["1. One", "2. Three"]);
    assert_eq!(builder.node(&one).unwrap().display_number(), Some(1));
    assert_eq!(builder.node(&three).unwrap().display_number(), Some(2));
    assert!(builder
        .take_events()
        .contains(&BuilderEvent::Graph(GraphEvent::Renumbered)));
}

#[test]
fn test_cascade_is_complete() {
    let mut builder = empty_builder(&["a", "b"]);
    let [one, two, _] = three_stages(&mut builder);
    let a = builder
        .drop_on_canvas(&pool_payload("a"), ScreenPoint::new(10.0, 10.0))
        .unwrap();
    let b = builder
        .drop_on_canvas(&pool_payload("b"), ScreenPoint::new(320.0, 10.0))
        .unwrap();
    let cond = builder.add_conditional("Ok?", Some(CanvasPoint::new(0.0, 400.0))).unwrap();
    builder.connect(&a, &b, None, None).unwrap();
    builder.connect(&cond, &a, Some(CONDITIONAL_TRUE.into()), None).unwrap();
    let kept = builder.connect(&b, &two, None, None).unwrap();

    let removal = builder.delete_node(&one);

    assert_eq!(removal.nodes.len(), 2);
    assert_eq!(removal.edges.len(), 2);
    let store = builder.store();
    assert!(store.node(&one).is_none() && store.node(&a).is_none());
    assert!(store.nodes().all(|n| n.parent_id() != Some(&one)));
    assert!(store.edges().all(|e| !e.touches(&a) && !e.touches(&one)));
    assert!(store.edge(&kept).is_some());
    assert_eq!(store.edge_count(), 1);
}

#[test]
fn test_deleting_edited_node_closes_session() {
    let mut builder = empty_builder(&[]);
    let stage = builder.add_stage("One", None).unwrap();
    assert!(builder.begin_edit(&stage, EditField::Label));
    builder.set_draft("Never saved");
    builder.take_events();

    builder.delete_node(&stage);

    assert!(builder.edit_session().is_none());
    assert!(builder.take_events().contains(&BuilderEvent::EditClosed {
        node_id: stage,
        committed: false,
    }));
}

#[test]
fn test_delete_unknown_id_is_noop() {
    let mut builder = empty_builder(&[]);
    three_stages(&mut builder);
    builder.take_events();
    assert!(builder.delete_node(&NodeId::from("ghost")).is_empty());
    assert!(builder.take_events().is_empty());
}

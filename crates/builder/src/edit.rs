//! Editing a node's text through a transient session.
//!
//! `closed -> editing(node, draft) -> closed`. Saving commits the draft to
//! the graph; cancelling throws it away. At most one session is open.

use graph::GraphStore;
use node::{Node, NodeId};
use serde::{Deserialize, Serialize};

/// Which text attribute a session edits.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EditField {
    #[default]
    Label,
    /// Task cards only
    Department,
    /// Error handlers only
    Description,
}

impl EditField {
    /// Current value of this field on `node`, if the node has it.
    pub fn read<'a>(&self, node: &'a Node) -> Option<&'a str> {
        match self {
            Self::Label => Some(&node.label),
            Self::Department => node.department(),
            Self::Description => node.description(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditSession {
    pub node_id: NodeId,
    pub field: EditField,
    pub draft: String,
}

impl EditSession {
    /// Start with the draft set to the field's current value.
    pub fn open(store: &GraphStore, node_id: &NodeId, field: EditField) -> Option<Self> {
        let draft = field.read(store.node(node_id)?)?.to_string();
        Some(Self {
            node_id: node_id.clone(),
            field,
            draft,
        })
    }

    /// Write the draft into the graph. Blank labels are discarded.
    pub fn commit(self, store: &mut GraphStore) -> bool {
        let value = self.draft.trim();
        match self.field {
            EditField::Label if value.is_empty() => {
                log::debug!("Discarding blank label for {}", self.node_id);
                false
            }
            EditField::Label => store.update_node_label(&self.node_id, value),
            EditField::Department => store.update_department(&self.node_id, value),
            EditField::Description => store.update_description(&self.node_id, value),
        }
    }
}

/// Holds the single open session, if any.
#[derive(Clone, Debug, Default)]
pub struct LabelEditor {
    session: Option<EditSession>,
}

impl LabelEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// Make `session` the open one, discarding any open session without
    /// committing it. Returns the discarded session.
    pub fn start(&mut self, session: EditSession) -> Option<EditSession> {
        self.session.replace(session)
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) -> bool {
        match &mut self.session {
            Some(session) => {
                session.draft = draft.into();
                true
            }
            None => false,
        }
    }

    /// Commit and close. Returns the closed session and whether the graph changed.
    pub fn save(&mut self, store: &mut GraphStore) -> Option<(EditSession, bool)> {
        let session = self.session.take()?;
        let changed = session.clone().commit(store);
        Some((session, changed))
    }

    pub fn cancel(&mut self) -> Option<EditSession> {
        self.session.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::{CanvasPoint, CanvasSize, NodeSpec};

    fn store_with_handler() -> (GraphStore, NodeId) {
        let mut store = GraphStore::new();
        let id = store
            .add_node(
                NodeSpec::error_handler(CanvasPoint::new(0.0, 0.0), CanvasSize::new(180.0, 70.0))
                    .with_label("Escalate"),
            )
            .unwrap();
        (store, id)
    }

    fn open(
        editor: &mut LabelEditor,
        store: &GraphStore,
        id: &NodeId,
        field: EditField,
    ) -> Option<EditSession> {
        editor.start(EditSession::open(store, id, field).unwrap())
    }

    #[test]
    fn test_draft_starts_with_current_value() {
        let (store, id) = store_with_handler();
        let mut editor = LabelEditor::new();
        open(&mut editor, &store, &id, EditField::Label);
        assert_eq!(editor.session().unwrap().draft, "Escalate");
    }

    #[test]
    fn test_save_commits_and_closes() {
        let (mut store, id) = store_with_handler();
        let mut editor = LabelEditor::new();
        open(&mut editor, &store, &id, EditField::Description);
        editor.set_draft("  Page the on-call lead ");

        let (_, changed) = editor.save(&mut store).unwrap();
        assert!(changed);
        assert!(editor.session().is_none());
        assert_eq!(store.node(&id).unwrap().description(), Some("Page the on-call lead"));
    }

    #[test]
    fn test_cancel_discards() {
        let (mut store, id) = store_with_handler();
        let before = store.snapshot();
        let mut editor = LabelEditor::new();
        open(&mut editor, &store, &id, EditField::Label);
        editor.set_draft("Something else");
        assert!(editor.cancel().is_some());
        assert!(editor.save(&mut store).is_none());
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_opening_replaces_without_committing() {
        let (mut store, first) = store_with_handler();
        let spec =
            NodeSpec::conditional(CanvasPoint::new(300.0, 0.0), CanvasSize::new(140.0, 80.0));
        let second = store.add_node(spec).unwrap();
        let mut editor = LabelEditor::new();
        open(&mut editor, &store, &first, EditField::Label);
        editor.set_draft("Never saved");

        let replaced = open(&mut editor, &store, &second, EditField::Label);
        assert_eq!(replaced.unwrap().node_id, first);
        assert_eq!(editor.session().map(|s| &s.node_id), Some(&second));
        assert_eq!(store.node(&first).unwrap().label, "Escalate");
    }

    #[test]
    fn test_blank_label_is_discarded() {
        let (mut store, id) = store_with_handler();
        let mut editor = LabelEditor::new();
        open(&mut editor, &store, &id, EditField::Label);
        editor.set_draft("   ");
        let (_, changed) = editor.save(&mut store).unwrap();
        assert!(!changed);
        assert_eq!(store.node(&id).unwrap().label, "Escalate");
    }

    #[test]
    fn test_missing_field_or_node_does_not_open() {
        let (mut store, id) = store_with_handler();
        assert!(EditSession::open(&store, &id, EditField::Department).is_none());
        assert!(EditSession::open(&store, &NodeId::from("ghost"), EditField::Label).is_none());
        let mut editor = LabelEditor::new();

        // Node removed while editing: save closes without effect
        open(&mut editor, &store, &id, EditField::Label);
        editor.set_draft("Renamed");
        store.remove_node(&id);
        let (_, changed) = editor.save(&mut store).unwrap();
        assert!(!changed);
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Result, SproutError};

/// Which of the two child collections an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildKind {
    Affirmation,
    Trigger,
}

impl ChildKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChildKind::Affirmation => "affirmation",
            ChildKind::Trigger => "trigger",
        }
    }

    /// Table holding rows of this kind
    pub fn table(&self) -> &'static str {
        match self {
            ChildKind::Affirmation => "affirmations",
            ChildKind::Trigger => "triggers",
        }
    }
}

impl fmt::Display for ChildKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text entry owned by a Sprout, ranked by a dense zero-based position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    id: String,
    text: String,
    position: u32,
}

pub type Affirmation = ListItem;
pub type Trigger = ListItem;

impl ListItem {
    /// Rehydrate an item exactly as stored
    pub fn from_persistence(id: impl Into<String>, text: impl Into<String>, position: u32) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            position,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> u32 {
        self.position
    }
}

/// Ordered, bounded collection of items
///
/// Invariant: after every structural change the item at index `i` has
/// `position == i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ItemList {
    kind: ChildKind,
    items: Vec<ListItem>,
}

impl ItemList {
    pub(crate) fn new(kind: ChildKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    pub(crate) fn from_items(kind: ChildKind, items: Vec<ListItem>) -> Self {
        Self { kind, items }
    }

    pub(crate) fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Append a trimmed item, returning its freshly generated id
    pub(crate) fn add(&mut self, text: &str, max: usize) -> Result<String> {
        if self.items.len() >= max {
            return Err(SproutError::CapacityExceeded {
                kind: self.kind,
                max,
            });
        }

        let id = Uuid::now_v7().to_string();
        let position = self.items.len() as u32;
        self.items.push(ListItem {
            id: id.clone(),
            text: text.trim().to_string(),
            position,
        });
        Ok(id)
    }

    pub(crate) fn remove(&mut self, item_id: &str) -> Result<ListItem> {
        let index = self.index_of(item_id)?;
        let removed = self.items.remove(index);
        self.reindex();
        Ok(removed)
    }

    pub(crate) fn update_text(&mut self, item_id: &str, text: &str) -> Result<()> {
        let index = self.index_of(item_id)?;
        self.items[index].text = text.trim().to_string();
        Ok(())
    }

    /// Move an item to `new_index`, shifting everything in between by one
    pub(crate) fn reorder(&mut self, item_id: &str, new_index: i64) -> Result<()> {
        let current = self.index_of(item_id)?;

        let len = self.items.len();
        let target = usize::try_from(new_index)
            .ok()
            .filter(|&index| index < len)
            .ok_or(SproutError::InvalidPosition {
                kind: self.kind,
                index: new_index,
                len,
            })?;

        let item = self.items.remove(current);
        self.items.insert(target, item);
        self.reindex();
        Ok(())
    }

    fn index_of(&self, item_id: &str) -> Result<usize> {
        self.items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| SproutError::NotFound {
                kind: self.kind,
                item_id: item_id.to_string(),
            })
    }

    fn reindex(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.position = index as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(list: &ItemList) -> Vec<&str> {
        list.items().iter().map(ListItem::text).collect()
    }

    fn positions(list: &ItemList) -> Vec<u32> {
        list.items().iter().map(ListItem::position).collect()
    }

    #[test]
    fn test_add_assigns_pre_append_length() {
        let mut list = ItemList::new(ChildKind::Trigger);
        list.add("a", 5).unwrap();
        list.add("b", 5).unwrap();
        assert_eq!(positions(&list), vec![0, 1]);
    }

    #[test]
    fn test_add_rejects_at_cap_without_change() {
        let mut list = ItemList::new(ChildKind::Affirmation);
        list.add("only", 1).unwrap();
        let before = list.clone();

        let result = list.add("extra", 1);

        assert_eq!(
            result,
            Err(SproutError::CapacityExceeded {
                kind: ChildKind::Affirmation,
                max: 1
            })
        );
        assert_eq!(list, before);
    }

    #[test]
    fn test_reorder_moves_backward() {
        let mut list = ItemList::new(ChildKind::Affirmation);
        list.add("A", 5).unwrap();
        list.add("B", 5).unwrap();
        let c = list.add("C", 5).unwrap();

        list.reorder(&c, 0).unwrap();

        assert_eq!(texts(&list), vec!["C", "A", "B"]);
        assert_eq!(positions(&list), vec![0, 1, 2]);
    }

    #[test]
    fn test_reorder_unknown_id_reports_not_found_before_position() {
        let mut list = ItemList::new(ChildKind::Trigger);
        list.add("A", 5).unwrap();

        let result = list.reorder("missing", 99);

        assert!(matches!(result, Err(SproutError::NotFound { .. })));
    }

    #[test]
    fn test_rehydrated_items_kept_as_stored() {
        let list = ItemList::from_items(
            ChildKind::Affirmation,
            vec![
                ListItem::from_persistence("x", "first", 0),
                ListItem::from_persistence("y", "second", 1),
            ],
        );
        assert_eq!(texts(&list), vec!["first", "second"]);
    }
}

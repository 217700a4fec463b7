//! Board document.

use crate::object::{BoardObject, ObjectId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Current board format version.
pub const BOARD_VERSION: u32 = 2;

/// A board: metadata plus its objects in paint order.
///
/// `objects[0]` is the topmost object. Objects are shared between revisions
/// behind `Arc`, so editing one object only copies that object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardData {
    pub version: u32,
    pub width: u32,
    pub height: u32,
    pub name: String,
    pub background_id: u32,
    pub objects: Vec<Arc<BoardObject>>,
}

impl BoardData {
    /// Create an empty board.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            version: BOARD_VERSION,
            width,
            height,
            name: String::new(),
            background_id: 1,
            objects: Vec::new(),
        }
    }

    /// Build a board from owned objects, first object on top.
    pub fn with_objects(width: u32, height: u32, objects: Vec<BoardObject>) -> Self {
        let mut board = Self::new(width, height);
        board.objects = objects.into_iter().map(Arc::new).collect();
        board
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate objects from top to bottom.
    pub fn objects(&self) -> impl Iterator<Item = &BoardObject> {
        self.objects.iter().map(|obj| obj.as_ref())
    }

    /// Object ids from top to bottom.
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.iter().map(|obj| obj.id)
    }

    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|obj| obj.id == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: ObjectId) -> Option<&BoardObject> {
        self.objects.iter().find(|obj| obj.id == id).map(|obj| obj.as_ref())
    }

    /// Mutable access to one object, copying it if an older revision still shares it.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut BoardObject> {
        self.objects
            .iter_mut()
            .find(|obj| obj.id == id)
            .map(Arc::make_mut)
    }

    /// Number of objects with the given type number.
    pub fn count_of_type(&self, object_id: u32) -> usize {
        self.objects.iter().filter(|obj| obj.object_id == object_id).count()
    }

    /// Keep only the ids that exist on this board, preserving their order and dropping duplicates.
    pub fn existing_ids(&self, ids: &[ObjectId]) -> Vec<ObjectId> {
        let mut seen = HashSet::new();
        ids.iter()
            .copied()
            .filter(|&id| self.contains(id) && seen.insert(id))
            .collect()
    }

    /// Insert objects on top of the stack, keeping their relative order.
    pub fn insert_front(&mut self, objects: Vec<BoardObject>) {
        let count = objects.len();
        self.objects.splice(0..0, objects.into_iter().map(Arc::new));
        log::debug!("Inserted {} objects at the front", count);
    }

    /// Remove every object whose id is in `ids`. Returns how many were removed.
    pub fn remove(&mut self, ids: &HashSet<ObjectId>) -> usize {
        let before = self.objects.len();
        self.objects.retain(|obj| !ids.contains(&obj.id));
        before - self.objects.len()
    }

    /// Move an object to the top of the stack.
    pub fn bring_to_front(&mut self, id: ObjectId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos > 0 => {
                let obj = self.objects.remove(pos);
                self.objects.insert(0, obj);
                true
            }
            _ => false,
        }
    }

    /// Move an object to the bottom of the stack.
    pub fn send_to_back(&mut self, id: ObjectId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos + 1 < self.objects.len() => {
                let obj = self.objects.remove(pos);
                self.objects.push(obj);
                true
            }
            _ => false,
        }
    }

    /// Move an object one layer towards the front.
    /// Returns true if the object was moved, false if already at front.
    pub fn bring_forward(&mut self, id: ObjectId) -> bool {
        if let Some(pos) = self.index_of(id) {
            if pos > 0 {
                self.objects.swap(pos, pos - 1);
                return true;
            }
        }
        false
    }

    /// Move an object one layer towards the back.
    /// Returns true if the object was moved, false if already at back.
    pub fn send_backward(&mut self, id: ObjectId) -> bool {
        if let Some(pos) = self.index_of(id) {
            if pos + 1 < self.objects.len() {
                self.objects.swap(pos, pos + 1);
                return true;
            }
        }
        false
    }

    /// Pull the given objects out of the stack as one block, in their current order.
    /// Returns the block and the index its topmost member occupied.
    pub(crate) fn take_block(&mut self, ids: &HashSet<ObjectId>) -> (Vec<Arc<BoardObject>>, usize) {
        let first = self
            .objects
            .iter()
            .position(|obj| ids.contains(&obj.id))
            .unwrap_or(0);
        let (block, rest): (Vec<_>, Vec<_>) = self
            .objects
            .drain(..)
            .partition(|obj| ids.contains(&obj.id));
        self.objects = rest;
        (block, first)
    }

    /// Re-insert a block taken with [`take_block`](Self::take_block) at `index`.
    pub(crate) fn put_block(&mut self, index: usize, block: Vec<Arc<BoardObject>>) {
        let index = index.min(self.objects.len());
        self.objects.splice(index..index, block);
    }
}

impl Default for BoardData {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_BOARD_WIDTH, crate::config::DEFAULT_BOARD_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn board_with(n: usize) -> (BoardData, Vec<ObjectId>) {
        let objects: Vec<BoardObject> = (0..n)
            .map(|i| BoardObject::new(1, Point::new(i as f64 * 10.0, 0.0)))
            .collect();
        let ids = objects.iter().map(|o| o.id).collect();
        (BoardData::with_objects(512, 384, objects), ids)
    }

    #[test]
    fn test_board_creation() {
        let board = BoardData::default();
        assert!(board.is_empty());
        assert_eq!(board.version, BOARD_VERSION);
    }

    #[test]
    fn test_insert_front_keeps_order() {
        let (mut board, ids) = board_with(2);
        let a = BoardObject::new(2, Point::ZERO);
        let b = BoardObject::new(3, Point::ZERO);
        let (a_id, b_id) = (a.id, b.id);
        board.insert_front(vec![a, b]);
        let order: Vec<_> = board.ids().collect();
        assert_eq!(order, vec![a_id, b_id, ids[0], ids[1]]);
    }

    #[test]
    fn test_remove() {
        let (mut board, ids) = board_with(3);
        let removed = board.remove(&HashSet::from([ids[0], ids[2]]));
        assert_eq!(removed, 2);
        assert_eq!(board.ids().collect::<Vec<_>>(), vec![ids[1]]);
    }

    #[test]
    fn test_layer_order() {
        let (mut board, ids) = board_with(3);

        assert!(board.send_to_back(ids[0]));
        assert_eq!(board.ids().collect::<Vec<_>>(), vec![ids[1], ids[2], ids[0]]);

        assert!(board.bring_to_front(ids[0]));
        assert_eq!(board.ids().collect::<Vec<_>>(), vec![ids[0], ids[1], ids[2]]);

        assert!(!board.bring_forward(ids[0]));
        assert!(board.send_backward(ids[0]));
        assert_eq!(board.ids().collect::<Vec<_>>(), vec![ids[1], ids[0], ids[2]]);

        assert!(!board.send_backward(ids[2]));
    }

    #[test]
    fn test_get_mut_copies_shared_object() {
        let (mut board, ids) = board_with(1);
        let snapshot = board.clone();
        board.get_mut(ids[0]).unwrap().rotation = 90.0;
        assert_eq!(snapshot.get(ids[0]).unwrap().rotation, 0.0);
        assert_eq!(board.get(ids[0]).unwrap().rotation, 90.0);
    }

    #[test]
    fn test_existing_ids_filters_and_dedupes() {
        let (board, ids) = board_with(2);
        let stale = uuid::Uuid::new_v4();
        assert_eq!(board.existing_ids(&[ids[1], stale, ids[1], ids[0]]), vec![ids[1], ids[0]]);
    }

    #[test]
    fn test_take_and_put_block() {
        let (mut board, ids) = board_with(4);
        let (block, first) = board.take_block(&HashSet::from([ids[1], ids[3]]));
        assert_eq!(first, 1);
        assert_eq!(block.len(), 2);
        board.put_block(0, block);
        assert_eq!(board.ids().collect::<Vec<_>>(), vec![ids[1], ids[3], ids[0], ids[2]]);
    }
}

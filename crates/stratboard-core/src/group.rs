//! Object groups.
//!
//! A group names a set of objects that are selected and moved together. An
//! object belongs to at most one group, and a group always has at least two
//! members: anything that would shrink a group below that dissolves it.

use crate::object::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use uuid::Uuid;

/// Unique identifier for groups.
pub type GroupId = Uuid;

/// Smallest valid group.
pub const MIN_GROUP_SIZE: usize = 2;

/// A named set of board objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectGroup {
    pub id: GroupId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub collapsed: bool,
    pub object_ids: BTreeSet<ObjectId>,
}

impl ObjectGroup {
    /// Create a group over the given objects.
    pub fn new(object_ids: impl IntoIterator<Item = ObjectId>, name: Option<String>) -> Self {
        Self::with_id(Uuid::new_v4(), object_ids, name)
    }

    /// Create a group with a specific ID.
    pub fn with_id(
        id: GroupId,
        object_ids: impl IntoIterator<Item = ObjectId>,
        name: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            collapsed: false,
            object_ids: object_ids.into_iter().collect(),
        }
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.object_ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.object_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_ids.is_empty()
    }

    /// Whether the group still has enough members to exist.
    pub fn is_valid(&self) -> bool {
        self.object_ids.len() >= MIN_GROUP_SIZE
    }
}

/// Find a group by id.
pub fn find(groups: &[ObjectGroup], id: GroupId) -> Option<&ObjectGroup> {
    groups.iter().find(|g| g.id == id)
}

/// Find the group an object belongs to.
pub fn group_of(groups: &[ObjectGroup], object_id: ObjectId) -> Option<&ObjectGroup> {
    groups.iter().find(|g| g.contains(object_id))
}

/// Group the given objects.
///
/// Members are taken out of any group they were in before, and groups left
/// too small by that are dissolved. Returns the new group's id, or None when
/// fewer than two distinct objects were given.
pub fn create(
    groups: &mut Vec<ObjectGroup>,
    object_ids: &[ObjectId],
    name: Option<String>,
) -> Option<GroupId> {
    let members: BTreeSet<ObjectId> = object_ids.iter().copied().collect();
    if members.len() < MIN_GROUP_SIZE {
        return None;
    }

    for group in groups.iter_mut() {
        group.object_ids.retain(|id| !members.contains(id));
    }
    groups.retain(ObjectGroup::is_valid);

    let group = ObjectGroup::new(members, name);
    let id = group.id;
    groups.push(group);
    Some(id)
}

/// Remove a group, leaving its members on the board.
pub fn ungroup(groups: &mut Vec<ObjectGroup>, id: GroupId) -> bool {
    let before = groups.len();
    groups.retain(|g| g.id != id);
    groups.len() != before
}

/// Take one object out of a group, dissolving the group if it gets too small.
pub fn remove_member(groups: &mut Vec<ObjectGroup>, id: GroupId, object_id: ObjectId) -> bool {
    let Some(group) = groups.iter_mut().find(|g| g.id == id) else {
        return false;
    };
    if !group.object_ids.remove(&object_id) {
        return false;
    }
    if !group.is_valid() {
        groups.retain(|g| g.id != id);
    }
    true
}

/// Drop members for which `exists` is false, then dissolve groups that became too small.
/// Returns the ids of dissolved groups.
pub fn prune(groups: &mut Vec<ObjectGroup>, exists: impl Fn(ObjectId) -> bool) -> Vec<GroupId> {
    for group in groups.iter_mut() {
        group.object_ids.retain(|&id| exists(id));
    }
    let dissolved: Vec<GroupId> = groups
        .iter()
        .filter(|g| !g.is_valid())
        .map(|g| g.id)
        .collect();
    groups.retain(ObjectGroup::is_valid);
    dissolved
}

/// Repair a group list read from outside the editor.
///
/// Members for which `exists` is false are dropped. An object listed in
/// several groups stays in the first one only. Groups left too small are
/// dissolved. Returns the ids of dissolved groups.
pub fn normalize(groups: &mut Vec<ObjectGroup>, exists: impl Fn(ObjectId) -> bool) -> Vec<GroupId> {
    let mut dissolved = prune(groups, exists);
    let mut claimed: HashSet<ObjectId> = HashSet::new();
    for group in groups.iter_mut() {
        group.object_ids.retain(|&id| claimed.insert(id));
    }
    dissolved.extend(prune(groups, |_| true));
    dissolved
}

/// Rename a group. An empty name clears it.
pub fn rename(groups: &mut [ObjectGroup], id: GroupId, name: &str) -> bool {
    let Some(group) = groups.iter_mut().find(|g| g.id == id) else {
        return false;
    };
    let name = name.trim();
    group.name = (!name.is_empty()).then(|| name.to_string());
    true
}

/// Flip a group's collapsed flag.
pub fn toggle_collapsed(groups: &mut [ObjectGroup], id: GroupId) -> bool {
    match groups.iter_mut().find(|g| g.id == id) {
        Some(group) => {
            group.collapsed = !group.collapsed;
            true
        }
        None => false,
    }
}

/// Expand a group if it is collapsed.
pub fn expand(groups: &mut [ObjectGroup], id: GroupId) {
    if let Some(group) = groups.iter_mut().find(|g| g.id == id) {
        group.collapsed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<ObjectId> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_group_creation() {
        let objects = ids(3);
        let mut groups = Vec::new();
        let id = create(&mut groups, &objects, Some("Tanks".into())).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, id);
        assert_eq!(groups[0].len(), 3);
        assert_eq!(groups[0].name.as_deref(), Some("Tanks"));
    }

    #[test]
    fn test_group_needs_two_members() {
        let objects = ids(1);
        let mut groups = Vec::new();
        assert!(create(&mut groups, &objects, None).is_none());
        // Duplicate ids count once.
        assert!(create(&mut groups, &[objects[0], objects[0]], None).is_none());
        assert!(groups.is_empty());
    }

    #[test]
    fn test_group_membership_is_order_independent() {
        let objects = ids(2);
        let a = ObjectGroup::with_id(Uuid::nil(), [objects[0], objects[1]], None);
        let b = ObjectGroup::with_id(Uuid::nil(), [objects[1], objects[0]], None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_regrouping_steals_members() {
        let objects = ids(4);
        let mut groups = Vec::new();
        let first = create(&mut groups, &objects[0..2], None).unwrap();
        create(&mut groups, &objects[1..4], None).unwrap();
        // The first group lost a member and dropped below two.
        assert!(find(&groups, first).is_none());
        assert_eq!(groups.len(), 1);
        assert_eq!(group_of(&groups, objects[1]).unwrap().len(), 3);
    }

    #[test]
    fn test_remove_member_dissolves_small_group() {
        let objects = ids(3);
        let mut groups = Vec::new();
        let id = create(&mut groups, &objects, None).unwrap();

        assert!(remove_member(&mut groups, id, objects[0]));
        assert_eq!(find(&groups, id).unwrap().len(), 2);

        assert!(remove_member(&mut groups, id, objects[1]));
        assert!(find(&groups, id).is_none());
    }

    #[test]
    fn test_prune_dissolves() {
        let objects = ids(5);
        let mut groups = Vec::new();
        let small = create(&mut groups, &objects[0..3], None).unwrap();
        let big = create(&mut groups, &objects[3..5], None).unwrap();

        let dead = [objects[0], objects[1]];
        let dissolved = prune(&mut groups, |id| !dead.contains(&id));
        assert_eq!(dissolved, vec![small]);
        assert!(find(&groups, big).is_some());
        assert!(groups.iter().all(ObjectGroup::is_valid));
    }

    #[test]
    fn test_normalize_first_group_keeps_shared_member() {
        let objects = ids(4);
        let first = ObjectGroup::new([objects[0], objects[1]], None);
        let second = ObjectGroup::new([objects[1], objects[2], objects[3]], None);
        let third = ObjectGroup::new([objects[2], objects[3]], None);
        let (first_id, second_id, third_id) = (first.id, second.id, third.id);
        let mut groups = vec![first, second, third];

        let dissolved = normalize(&mut groups, |_| true);
        assert_eq!(dissolved, vec![third_id]);
        assert_eq!(find(&groups, first_id).unwrap().len(), 2);
        let second = find(&groups, second_id).unwrap();
        assert!(!second.contains(objects[1]));
        assert_eq!(second.len(), 2);
        for id in &objects {
            assert!(groups.iter().filter(|g| g.contains(*id)).count() <= 1);
        }
    }

    #[test]
    fn test_normalize_drops_missing_members_before_claiming() {
        let objects = ids(3);
        // The first group loses its second member, so it must not keep objects[0].
        let mut groups = vec![
            ObjectGroup::new([objects[0], objects[1]], None),
            ObjectGroup::new([objects[0], objects[2]], None),
        ];
        let survivor = groups[1].id;
        let dissolved = normalize(&mut groups, |id| id != objects[1]);
        assert_eq!(dissolved.len(), 1);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, survivor);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn test_rename_and_collapse() {
        let objects = ids(2);
        let mut groups = Vec::new();
        let id = create(&mut groups, &objects, None).unwrap();

        assert!(rename(&mut groups, id, "  Healers "));
        assert_eq!(groups[0].name.as_deref(), Some("Healers"));
        assert!(rename(&mut groups, id, ""));
        assert!(groups[0].name.is_none());

        assert!(toggle_collapsed(&mut groups, id));
        assert!(groups[0].collapsed);
        expand(&mut groups, id);
        assert!(!groups[0].collapsed);
        assert!(!toggle_collapsed(&mut groups, Uuid::new_v4()));
    }
}

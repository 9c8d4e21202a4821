//! The relationship graph store
//!
//! [`FamilyGraph`] is the sole owner of person nodes and their parent/child/
//! spouse edges. Every public mutation validates its preconditions first and
//! only then touches the graph, so a rejected call leaves no partial change
//! behind. Successful mutations re-stabilize the slot grid and fire the
//! change notifier before returning.
//!
//! Business-rule violations (duplicate parent slot, second spouse, self
//! links, stale ids) are reported as `None`/`false`, never as panics; panics
//! are reserved for internal invariant breakage, which would be a bug in the
//! store itself.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::layout::Point;

use super::node::{Gender, ParentPair, Person, PersonId};
use super::observer::{ChangeNotifier, SubscriptionToken};

/// Which direction to probe first when hunting for a free slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Mutable family graph: an arena of persons keyed by id, with relationship
/// edges stored as id sets on both endpoints.
#[derive(Debug)]
pub struct FamilyGraph {
    nodes: BTreeMap<PersonId, Person>,
    next_id: u32,
    last_added: Option<PersonId>,
    notifier: ChangeNotifier,
}

impl FamilyGraph {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_id: 1,
            last_added: None,
            notifier: ChangeNotifier::new(),
        }
    }

    // ---- queries ----

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.nodes.get(&id)
    }

    /// All persons in id (= creation) order
    pub fn people(&self) -> impl Iterator<Item = &Person> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The most recently created person still present in the graph
    pub fn last_added(&self) -> Option<PersonId> {
        self.last_added
    }

    /// First person with the given display name, in id order
    pub fn find_by_name(&self, name: &str) -> Option<PersonId> {
        self.nodes.values().find(|p| p.name == name).map(|p| p.id)
    }

    /// A person's parents broken out by gender.
    ///
    /// Unknown ids yield an empty pair; the scan is O(≤2) since parents are
    /// capped at two.
    pub fn parent_pair(&self, id: PersonId) -> ParentPair {
        let mut pair = ParentPair::default();
        if let Some(person) = self.nodes.get(&id) {
            for pid in &person.parents {
                if let Some(parent) = self.nodes.get(pid) {
                    match parent.gender {
                        Gender::Female => pair.mother = Some(*pid),
                        Gender::Male => pair.father = Some(*pid),
                    }
                }
            }
        }
        pair
    }

    /// Resolve the partner that new children of `id` are shared with: the
    /// spouse if set, otherwise the first other parent found on any existing
    /// child (in child insertion order).
    pub fn find_co_parent(&self, id: PersonId) -> Option<PersonId> {
        let person = self.nodes.get(&id)?;
        if let Some(spouse) = person.spouse {
            return Some(spouse);
        }
        for cid in &person.children {
            if let Some(child) = self.nodes.get(cid) {
                if let Some(other) = child.parents.iter().find(|p| **p != id) {
                    return Some(*other);
                }
            }
        }
        None
    }

    /// Whether `id` already shares at least one child with another person
    pub fn has_co_parent_via_children(&self, id: PersonId) -> bool {
        let Some(person) = self.nodes.get(&id) else {
            return false;
        };
        person.children.iter().any(|cid| {
            self.nodes
                .get(cid)
                .is_some_and(|child| child.parents.iter().any(|p| *p != id))
        })
    }

    // ---- observation ----

    /// Register a listener fired after every state-changing operation
    pub fn subscribe(&mut self, listener: impl FnMut() + 'static) -> SubscriptionToken {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, token: SubscriptionToken) {
        self.notifier.unsubscribe(token);
    }

    // ---- add operations ----

    /// Create a person at level 0: at slot 0 for the very first node, else
    /// anchored one unit right of the current level-0 occupancy.
    pub fn add_root(
        &mut self,
        name: impl Into<String>,
        gender: Gender,
        birthday: Option<NaiveDate>,
    ) -> PersonId {
        let slot = self.level_anchor_slot(0);
        let id = self.insert_person(name.into(), gender, birthday, 0, slot);
        self.stabilize();
        self.notifier.emit();
        id
    }

    /// Start a disconnected branch beside the existing level-0 nodes.
    ///
    /// Placement is identical to [`add_root`](Self::add_root); the separate
    /// entry point exists because callers express different intent.
    pub fn add_standalone(
        &mut self,
        name: impl Into<String>,
        gender: Gender,
        birthday: Option<NaiveDate>,
    ) -> PersonId {
        self.add_root(name, gender, birthday)
    }

    /// Attach a new parent of the given gender to `of`.
    ///
    /// Fails if `of` is unknown, already has two parents, or already has a
    /// parent of that gender. When the opposite-gender parent exists the new
    /// parent is placed to flank the pair (mother left, father right) and is
    /// auto-linked to every child of that other parent still lacking a
    /// parent of the new gender (sibling backfill).
    pub fn add_parent(
        &mut self,
        of: PersonId,
        gender: Gender,
        name: impl Into<String>,
        birthday: Option<NaiveDate>,
    ) -> Option<PersonId> {
        let (person_level, person_slot, parent_count) = {
            let p = self.nodes.get(&of)?;
            (p.level, p.slot, p.parents.len())
        };
        if parent_count >= 2 {
            return None;
        }
        let pair = self.parent_pair(of);
        if pair.of(gender).is_some() {
            return None;
        }
        let other = pair.of(gender.opposite());
        let slot = match other {
            Some(oid) => {
                let other_slot = self.nodes[&oid].slot;
                match gender {
                    Gender::Female => other_slot.min(person_slot) - 1.0,
                    Gender::Male => other_slot.max(person_slot) + 1.0,
                }
            }
            None => person_slot,
        };
        let id = self.insert_person(name.into(), gender, birthday, person_level - 1, slot);
        self.attach_parent(id, of);
        if let Some(oid) = other {
            self.backfill_children_of(oid, id);
        }
        self.stabilize();
        self.notifier.emit();
        Some(id)
    }

    /// Create a child below `from`, auto-linked to `from` and its resolved
    /// co-parent (if any). The child lands at the nearest free slot around
    /// the midpoint between the two parents.
    pub fn add_child(
        &mut self,
        from: PersonId,
        name: impl Into<String>,
        gender: Gender,
        birthday: Option<NaiveDate>,
    ) -> Option<PersonId> {
        let level = self.nodes.get(&from)?.level + 1;
        let co = self.find_co_parent(from);
        let (anchor, prefer) = self.child_anchor(from, co);
        let slot = self.nearest_free_slot(level, anchor, prefer, None);
        let id = self.insert_person(name.into(), gender, birthday, level, slot);
        self.attach_parent(from, id);
        if let Some(co) = co {
            self.attach_parent(co, id);
        }
        self.stabilize();
        self.notifier.emit();
        Some(id)
    }

    /// Create a spouse for `of` (opposite gender, same level, beside the
    /// person on the conventional side). Fails if `of` is unknown or already
    /// married. Existing children of `of` that lack a parent of the spouse's
    /// gender are backfilled onto the new spouse.
    pub fn add_spouse(
        &mut self,
        of: PersonId,
        name: impl Into<String>,
        birthday: Option<NaiveDate>,
    ) -> Option<PersonId> {
        let (level, person_slot, gender) = {
            let p = self.nodes.get(&of)?;
            if p.spouse.is_some() {
                return None;
            }
            (p.level, p.slot, p.gender.opposite())
        };
        let (anchor, prefer) = match gender {
            Gender::Female => (person_slot - 1.0, Side::Left),
            Gender::Male => (person_slot + 1.0, Side::Right),
        };
        let slot = self.nearest_free_slot(level, anchor, prefer, None);
        let id = self.insert_person(name.into(), gender, birthday, level, slot);
        self.node_mut(of).spouse = Some(id);
        self.node_mut(id).spouse = Some(of);
        self.backfill_spouses(of, id);
        self.stabilize();
        self.notifier.emit();
        Some(id)
    }

    // ---- existing-node linking (drag-to-connect) ----

    /// Link two existing persons as parent and child.
    ///
    /// The child must have a free parent slot of the parent's gender. On
    /// success the parent's resolved co-parent is attached to the same child
    /// where it qualifies, and the child is re-anchored into the grid below
    /// the parent: level, slot, and manual offset are all recomputed, so a
    /// freely dragged node snaps back into the tree when adopted.
    pub fn link_existing_parent(&mut self, parent: PersonId, child: PersonId) -> bool {
        if parent == child {
            return false;
        }
        let (gender, parent_level) = match self.nodes.get(&parent) {
            Some(p) => (p.gender, p.level),
            None => return false,
        };
        match self.nodes.get(&child) {
            Some(c) if c.parents.len() < 2 => {}
            _ => return false,
        }
        if self.parent_pair(child).of(gender).is_some() {
            return false;
        }
        self.attach_parent(parent, child);
        let co = self.find_co_parent(parent).filter(|co| *co != child);
        if let Some(co_id) = co {
            if self.nodes[&child].parents.len() < 2
                && self
                    .parent_pair(child)
                    .of(self.nodes[&co_id].gender)
                    .is_none()
            {
                self.attach_parent(co_id, child);
            }
        }
        let (anchor, prefer) = self.child_anchor(parent, co);
        let slot = self.nearest_free_slot(parent_level + 1, anchor, prefer, Some(child));
        let node = self.node_mut(child);
        node.level = parent_level + 1;
        node.slot = slot;
        node.offset = Point::new(0.0, 0.0);
        self.stabilize();
        self.notifier.emit();
        true
    }

    /// Same edge as [`link_existing_parent`](Self::link_existing_parent),
    /// named for the opposite drag direction (from the parent's card).
    pub fn link_existing_child(&mut self, parent: PersonId, child: PersonId) -> bool {
        self.link_existing_parent(parent, child)
    }

    /// Marry two existing persons.
    ///
    /// Requires opposite genders, both currently spouse-less, and neither
    /// already co-parenting with anyone via shared children. On success both
    /// sides' children are backfilled onto the new spouse where they qualify.
    pub fn link_existing_spouses(&mut self, a: PersonId, b: PersonId) -> bool {
        if a == b {
            return false;
        }
        let (Some(pa), Some(pb)) = (self.nodes.get(&a), self.nodes.get(&b)) else {
            return false;
        };
        if pa.gender == pb.gender || pa.spouse.is_some() || pb.spouse.is_some() {
            return false;
        }
        if self.has_co_parent_via_children(a) || self.has_co_parent_via_children(b) {
            return false;
        }
        self.node_mut(a).spouse = Some(b);
        self.node_mut(b).spouse = Some(a);
        self.backfill_spouses(a, b);
        self.stabilize();
        self.notifier.emit();
        true
    }

    // ---- removal and field edits ----

    /// Remove a person and strip their id from every peer's relationship
    /// sets. Children are not cascaded; they just lose one parent. Unknown
    /// ids are a silent no-op.
    pub fn delete_node(&mut self, id: PersonId) {
        let Some(node) = self.nodes.remove(&id) else {
            return;
        };
        for pid in &node.parents {
            if let Some(parent) = self.nodes.get_mut(pid) {
                parent.children.retain(|c| *c != id);
            }
        }
        for cid in &node.children {
            if let Some(child) = self.nodes.get_mut(cid) {
                child.parents.retain(|p| *p != id);
            }
        }
        if let Some(sid) = node.spouse {
            if let Some(spouse) = self.nodes.get_mut(&sid) {
                spouse.spouse = None;
            }
        }
        if self.last_added == Some(id) {
            self.last_added = self.nodes.keys().next_back().copied();
        }
        self.stabilize();
        self.notifier.emit();
    }

    pub fn rename(&mut self, id: PersonId, name: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.name = name.into();
            self.notifier.emit();
        }
    }

    pub fn set_birthday(&mut self, id: PersonId, birthday: Option<NaiveDate>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.birthday = birthday;
            self.notifier.emit();
        }
    }

    /// Accumulate a drag delta onto each listed person's manual offset.
    /// Stale ids are skipped; the notifier fires once if anything moved.
    pub fn apply_manual_offset(&mut self, ids: &[PersonId], delta: Point) {
        let mut moved = false;
        for id in ids {
            if let Some(node) = self.nodes.get_mut(id) {
                node.offset.x += delta.x;
                node.offset.y += delta.y;
                moved = true;
            }
        }
        if moved {
            self.notifier.emit();
        }
    }

    /// Reset to an empty graph; id assignment restarts as well
    pub fn clear_all(&mut self) {
        self.nodes.clear();
        self.next_id = 1;
        self.last_added = None;
        self.notifier.emit();
    }

    // ---- internals ----

    fn node_mut(&mut self, id: PersonId) -> &mut Person {
        self.nodes.get_mut(&id).expect("node id validated by caller")
    }

    fn insert_person(
        &mut self,
        name: String,
        gender: Gender,
        birthday: Option<NaiveDate>,
        level: i32,
        slot: f64,
    ) -> PersonId {
        let id = PersonId(self.next_id);
        self.next_id += 1;
        self.nodes
            .insert(id, Person::new(id, name, gender, birthday, level, slot));
        self.last_added = Some(id);
        id
    }

    /// Wire a parent/child edge on both endpoints. Callers must have
    /// validated the cap and gender preconditions already.
    fn attach_parent(&mut self, parent: PersonId, child: PersonId) {
        debug_assert_ne!(parent, child, "self-parenting edge");
        debug_assert!(
            self.nodes[&child].parents.len() < 2,
            "parent cap exceeded on {child}"
        );
        debug_assert!(
            self.parent_pair(child)
                .of(self.nodes[&parent].gender)
                .is_none(),
            "duplicate parent gender on {child}"
        );
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parents.push(parent);
    }

    /// Link `parent` to every child of `of` that still has room for a parent
    /// of `parent`'s gender. Shared by sibling backfill (second parent added
    /// to one child) and spouse backfill (marriage joining two lineages).
    fn backfill_children_of(&mut self, of: PersonId, parent: PersonId) {
        let gender = self.nodes[&parent].gender;
        let kids = self.nodes[&of].children.clone();
        for child in kids {
            if child == parent || self.nodes[&child].parents.len() >= 2 {
                continue;
            }
            if self.parent_pair(child).of(gender).is_some() {
                continue;
            }
            self.attach_parent(parent, child);
        }
    }

    fn backfill_spouses(&mut self, a: PersonId, b: PersonId) {
        self.backfill_children_of(a, b);
        self.backfill_children_of(b, a);
    }

    /// Anchor slot for a fresh level entry: one right of the current
    /// occupancy, or 0 on an empty level.
    fn level_anchor_slot(&self, level: i32) -> f64 {
        self.nodes
            .values()
            .filter(|p| p.level == level)
            .map(|p| p.slot)
            .fold(None::<f64>, |acc, s| Some(acc.map_or(s, |m| m.max(s))))
            .map_or(0.0, |m| m + 1.0)
    }

    /// Where a new child of `from` (shared with `co`) should be anchored:
    /// the midpoint of the pair, probing toward `from`'s side first.
    fn child_anchor(&self, from: PersonId, co: Option<PersonId>) -> (f64, Side) {
        let from_slot = self.nodes[&from].slot;
        match co.and_then(|c| self.nodes.get(&c)) {
            Some(other) => (
                (from_slot + other.slot) / 2.0,
                if from_slot < other.slot {
                    Side::Left
                } else {
                    Side::Right
                },
            ),
            None => (from_slot, Side::Right),
        }
    }

    /// Nearest slot at `level` at least one unit away from every occupant,
    /// probing outward from `anchor` on the preferred side first. `exclude`
    /// ignores a node that is about to be re-anchored onto this level.
    fn nearest_free_slot(
        &self,
        level: i32,
        anchor: f64,
        prefer: Side,
        exclude: Option<PersonId>,
    ) -> f64 {
        let occupied: Vec<f64> = self
            .nodes
            .values()
            .filter(|p| p.level == level && Some(p.id) != exclude)
            .map(|p| p.slot)
            .collect();
        let free = |slot: f64| occupied.iter().all(|o| (o - slot).abs() >= 1.0);
        if free(anchor) {
            return anchor;
        }
        for step in 1..=occupied.len() + 1 {
            let d = step as f64;
            let (first, second) = match prefer {
                Side::Left => (anchor - d, anchor + d),
                Side::Right => (anchor + d, anchor - d),
            };
            if free(first) {
                return first;
            }
            if free(second) {
                return second;
            }
        }
        // dense fractional occupancy can exhaust the probe window; fall past
        // the right edge of the level
        occupied.iter().fold(anchor, |m, s| m.max(*s)) + 1.0
    }

    /// Two-pass per-level compaction plus root anchoring.
    ///
    /// Left→right rounds slots to integers and pushes collisions right
    /// (minimum gap of one unit, preserving order); right→left pulls every
    /// gap tight to exactly one unit. Finally the topmost, lowest-id node is
    /// shifted to slot 0 so the horizontal origin stays put across edits.
    fn stabilize(&mut self) {
        let mut levels: BTreeMap<i32, Vec<PersonId>> = BTreeMap::new();
        for p in self.nodes.values() {
            levels.entry(p.level).or_default().push(p.id);
        }
        for ids in levels.values_mut() {
            ids.sort_by(|a, b| {
                let (sa, sb) = (self.nodes[a].slot, self.nodes[b].slot);
                sa.partial_cmp(&sb).unwrap_or(Ordering::Equal).then(a.cmp(b))
            });
            let mut prev: Option<f64> = None;
            for id in ids.iter() {
                let mut slot = self.nodes[id].slot.round();
                if let Some(p) = prev {
                    if slot < p + 1.0 {
                        slot = p + 1.0;
                    }
                }
                self.node_mut(*id).slot = slot;
                prev = Some(slot);
            }
            let mut next: Option<f64> = None;
            for id in ids.iter().rev() {
                if let Some(n) = next {
                    if self.nodes[id].slot < n - 1.0 {
                        self.node_mut(*id).slot = n - 1.0;
                    }
                }
                next = Some(self.nodes[id].slot);
            }
        }
        let shift = self
            .nodes
            .values()
            .min_by_key(|p| (p.level, p.id))
            .map(|p| p.slot);
        if let Some(shift) = shift {
            if shift != 0.0 {
                for p in self.nodes.values_mut() {
                    p.slot -= shift;
                }
            }
        }
    }
}

impl Default for FamilyGraph {
    fn default() -> Self {
        Self::new()
    }
}

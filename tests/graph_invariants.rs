//! Structural invariant tests for the family graph store.
//!
//! Every edge must stay symmetric, cardinality caps must hold, and slot
//! assignments must stay unique per level, after every single operation in
//! any sequence. The scenario tests mirror the editing flows the store is
//! built around: sibling backfill, spouse backfill, deletion cleanup,
//! rejection without partial state, and re-anchoring on adoption.

use std::collections::BTreeMap;

use kin_canvas::{FamilyGraph, Gender, Point};

/// Check every structural invariant the store promises to hold between
/// operations.
fn assert_invariants(graph: &FamilyGraph) {
    for person in graph.people() {
        // edge symmetry
        for parent in person.parents() {
            let parent_node = graph.get(*parent).expect("dangling parent id");
            assert!(
                parent_node.children().contains(&person.id()),
                "{} lists parent {} but not vice versa",
                person.id(),
                parent
            );
        }
        for child in person.children() {
            let child_node = graph.get(*child).expect("dangling child id");
            assert!(
                child_node.parents().contains(&person.id()),
                "{} lists child {} but not vice versa",
                person.id(),
                child
            );
        }
        if let Some(spouse) = person.spouse() {
            let spouse_node = graph.get(spouse).expect("dangling spouse id");
            assert_eq!(spouse_node.spouse(), Some(person.id()));
            assert_ne!(spouse_node.gender(), person.gender());
        }

        // cardinality
        assert!(person.parents().len() <= 2, "{} has >2 parents", person.id());
        let mothers = person
            .parents()
            .iter()
            .filter(|id| graph.get(**id).unwrap().gender() == Gender::Female)
            .count();
        let fathers = person.parents().len() - mothers;
        assert!(mothers <= 1, "{} has two mothers", person.id());
        assert!(fathers <= 1, "{} has two fathers", person.id());
    }

    // slot uniqueness per level, with unit packing
    let mut by_level: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for person in graph.people() {
        by_level.entry(person.level()).or_default().push(person.slot());
    }
    for (level, slots) in &mut by_level {
        slots.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for pair in slots.windows(2) {
            assert!(
                pair[1] - pair[0] >= 1.0,
                "level {level} slots too close: {pair:?}"
            );
        }
        for slot in slots.iter() {
            assert_eq!(slot.fract(), 0.0, "level {level} slot {slot} not integer");
        }
    }
}

#[test]
fn test_invariants_hold_across_an_editing_session() {
    let mut graph = FamilyGraph::new();

    let a = graph.add_root("A", Gender::Female, None);
    assert_invariants(&graph);

    let spouse = graph.add_spouse(a, "S", None).unwrap();
    assert_invariants(&graph);

    let c1 = graph.add_child(a, "C1", Gender::Male, None).unwrap();
    let c2 = graph.add_child(spouse, "C2", Gender::Female, None).unwrap();
    assert_invariants(&graph);

    graph.add_parent(a, Gender::Male, "GF", None).unwrap();
    graph.add_parent(a, Gender::Female, "GM", None).unwrap();
    assert_invariants(&graph);

    let d = graph.add_standalone("D", Gender::Male, None);
    graph.add_child(c2, "GC", Gender::Male, None).unwrap();
    assert_invariants(&graph);

    assert!(graph.link_existing_spouses(c2, d));
    assert_invariants(&graph);

    graph.apply_manual_offset(&[c1, c2], Point::new(30.0, -12.0));
    graph.rename(c1, "Charlie");
    assert_invariants(&graph);

    graph.delete_node(spouse);
    assert_invariants(&graph);

    graph.delete_node(a);
    assert_invariants(&graph);
}

#[test]
fn test_sibling_backfill_reaches_existing_children() {
    let mut graph = FamilyGraph::new();
    let a = graph.add_root("A", Gender::Female, None);
    let c1 = graph.add_child(a, "C1", Gender::Female, None).unwrap();
    let c2 = graph.add_child(a, "C2", Gender::Male, None).unwrap();

    // attaching a father to one child propagates to the sibling that also
    // lacks a father
    let d = graph.add_parent(c1, Gender::Male, "D", None).unwrap();
    assert!(graph.get(c1).unwrap().parents().contains(&d));
    assert!(graph.get(c2).unwrap().parents().contains(&d));
    assert_eq!(graph.get(c2).unwrap().parents().len(), 2);
    assert_invariants(&graph);
}

#[test]
fn test_spouse_backfill_adopts_existing_children() {
    let mut graph = FamilyGraph::new();
    let a = graph.add_root("A", Gender::Female, None);
    let c = graph.add_child(a, "C", Gender::Female, None).unwrap();
    assert_eq!(graph.get(c).unwrap().parents(), &[a]);

    let d = graph.add_spouse(a, "D", None).unwrap();
    assert_eq!(graph.get(d).unwrap().gender(), Gender::Male);
    let parents = graph.get(c).unwrap().parents();
    assert!(parents.contains(&a) && parents.contains(&d));
    assert_invariants(&graph);
}

#[test]
fn test_spouse_backfill_runs_both_directions() {
    let mut graph = FamilyGraph::new();
    // two single-parent lineages joined by marriage
    let a = graph.add_root("A", Gender::Female, None);
    let ac = graph.add_child(a, "AC", Gender::Male, None).unwrap();
    let b = graph.add_standalone("B", Gender::Male, None);
    let bc = graph.add_child(b, "BC", Gender::Female, None).unwrap();

    assert!(graph.link_existing_spouses(a, b));
    assert!(graph.get(ac).unwrap().parents().contains(&b));
    assert!(graph.get(bc).unwrap().parents().contains(&a));
    assert_invariants(&graph);
}

#[test]
fn test_deletion_strips_every_reference() {
    let mut graph = FamilyGraph::new();
    let a = graph.add_root("A", Gender::Female, None);
    let b = graph.add_spouse(a, "B", None).unwrap();
    let c = graph.add_child(a, "C", Gender::Male, None).unwrap();
    assert_eq!(graph.get(c).unwrap().parents().len(), 2);

    graph.delete_node(a);
    assert_eq!(graph.get(a), None);
    assert_eq!(graph.get(b).unwrap().spouse(), None);
    assert_eq!(graph.get(c).unwrap().parents(), &[b]);
    assert_invariants(&graph);
}

#[test]
fn test_rejected_parent_leaves_graph_untouched() {
    let mut graph = FamilyGraph::new();
    let a = graph.add_root("A", Gender::Female, None);
    let m = graph.add_parent(a, Gender::Female, "M", None).unwrap();
    let f = graph.add_parent(a, Gender::Male, "F", None).unwrap();

    assert_eq!(graph.add_parent(a, Gender::Female, "M2", None), None);
    assert_eq!(graph.len(), 3);
    let parents = graph.get(a).unwrap().parents();
    assert!(parents.contains(&m) && parents.contains(&f));
    assert_invariants(&graph);
}

#[test]
fn test_link_existing_re_anchors_the_child() {
    let mut graph = FamilyGraph::new();
    let p = graph.add_root("P", Gender::Female, None);
    let x = graph.add_standalone("X", Gender::Male, None);
    graph.apply_manual_offset(&[x], Point::new(250.0, -80.0));
    assert_ne!(graph.get(x).unwrap().offset(), Point::zero());

    assert!(graph.link_existing_child(p, x));
    let adopted = graph.get(x).unwrap();
    assert_eq!(adopted.level(), graph.get(p).unwrap().level() + 1);
    assert_eq!(adopted.offset(), Point::zero());
    assert!(adopted.parents().contains(&p));
    assert_invariants(&graph);
}

#[test]
fn test_link_existing_parent_attaches_co_parent() {
    let mut graph = FamilyGraph::new();
    let p = graph.add_root("P", Gender::Female, None);
    let s = graph.add_spouse(p, "S", None).unwrap();
    let x = graph.add_standalone("X", Gender::Male, None);

    assert!(graph.link_existing_parent(p, x));
    let parents = graph.get(x).unwrap().parents();
    assert!(parents.contains(&p), "dragged-to parent missing");
    assert!(parents.contains(&s), "spouse not attached as co-parent");
    assert_invariants(&graph);
}

#[test]
fn test_link_existing_parent_rejects_taken_gender_slot() {
    let mut graph = FamilyGraph::new();
    let p = graph.add_root("P", Gender::Female, None);
    let x = graph.add_standalone("X", Gender::Male, None);
    graph.add_parent(x, Gender::Female, "M", None).unwrap();

    assert!(!graph.link_existing_parent(p, x));
    assert_eq!(graph.get(x).unwrap().parents().len(), 1);
    assert!(!graph.get(p).unwrap().children().contains(&x));
    assert_invariants(&graph);
}

#[test]
fn test_self_links_are_rejected() {
    let mut graph = FamilyGraph::new();
    let a = graph.add_root("A", Gender::Female, None);
    assert!(!graph.link_existing_parent(a, a));
    assert!(!graph.link_existing_spouses(a, a));
    assert_invariants(&graph);
}

#[test]
fn test_slot_order_is_preserved_by_stabilization() {
    let mut graph = FamilyGraph::new();
    let a = graph.add_root("A", Gender::Female, None);
    graph.add_spouse(a, "S", None).unwrap();
    let mut children = Vec::new();
    for name in ["C1", "C2", "C3", "C4"] {
        children.push(graph.add_child(a, name, Gender::Male, None).unwrap());
    }
    // capture left-to-right order, then force another stabilization pass
    let order_before: Vec<_> = {
        let mut ids = children.clone();
        ids.sort_by(|x, y| {
            graph
                .get(*x)
                .unwrap()
                .slot()
                .partial_cmp(&graph.get(*y).unwrap().slot())
                .unwrap()
        });
        ids
    };
    graph.delete_node(children[1]);
    let mut order_after: Vec<_> = children
        .iter()
        .filter(|id| graph.get(**id).is_some())
        .copied()
        .collect();
    order_after.sort_by(|x, y| {
        graph
            .get(*x)
            .unwrap()
            .slot()
            .partial_cmp(&graph.get(*y).unwrap().slot())
            .unwrap()
    });
    let expected: Vec<_> = order_before
        .iter()
        .filter(|id| graph.get(**id).is_some())
        .copied()
        .collect();
    assert_eq!(order_after, expected);
    assert_invariants(&graph);
}

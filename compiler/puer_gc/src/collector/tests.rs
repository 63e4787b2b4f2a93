#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Toy heap object: a node with outgoing edges.
#[derive(Debug, Default)]
struct Node {
    edges: Vec<GcRef>,
}

impl Trace for Node {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        self.edges.trace(tracer);
    }
}

fn leaf() -> Node {
    Node::default()
}

fn run_cycle(gc: &mut Collector<Node>, roots: &[GcRef]) -> usize {
    let mut steps = 0;
    while gc.collect_step(roots) {
        steps += 1;
        assert!(steps < 100_000, "collect_step never finished");
    }
    steps
}

#[test]
fn alloc_and_get() {
    let mut gc = Collector::default();
    let a = gc.alloc(leaf()).unwrap();
    assert!(gc.is_live(a));
    assert_eq!(gc.live_count(), 1);
    assert_eq!(gc.get(a).unwrap().edges.len(), 0);
    assert_eq!(gc.stats().allocated, 1);
}

#[test]
fn unreachable_objects_are_freed_by_full_collection() {
    let mut gc = Collector::default();
    let kept = gc.alloc(leaf()).unwrap();
    let dropped = gc.alloc(leaf()).unwrap();

    let freed = gc.collect_full(&vec![kept]);

    assert_eq!(freed, 1);
    assert!(gc.is_live(kept));
    assert!(!gc.is_live(dropped));
    assert_eq!(gc.phase(), GcPhase::Idle);
}

#[test]
fn children_of_roots_survive() {
    let mut gc = Collector::default();
    let child = gc.alloc(leaf()).unwrap();
    let grandchild = gc.alloc(leaf()).unwrap();
    gc.get_mut(child).unwrap().edges.push(grandchild);
    let root = gc.alloc(Node { edges: vec![child] }).unwrap();

    gc.collect_full(&vec![root]);

    assert_eq!(gc.live_count(), 3);
    assert!(gc.is_live(grandchild));
}

#[test]
fn cycles_without_roots_are_collected() {
    let mut gc = Collector::default();
    let a = gc.alloc(leaf()).unwrap();
    let b = gc.alloc(Node { edges: vec![a] }).unwrap();
    gc.get_mut(a).unwrap().edges.push(b);

    let freed = gc.collect_full(&Vec::<GcRef>::new());

    assert_eq!(freed, 2);
    assert_eq!(gc.live_count(), 0);
}

#[test]
fn stale_handle_does_not_alias_reused_slot() {
    let mut gc = Collector::default();
    let old = gc.alloc(leaf()).unwrap();
    gc.collect_full(&Vec::<GcRef>::new());
    let new = gc.alloc(leaf()).unwrap();

    assert_eq!(old.index(), new.index());
    assert_ne!(old.generation(), new.generation());
    assert!(gc.get(old).is_none());
    assert!(gc.get(new).is_some());
}

#[test]
fn step_walks_the_phases_and_reports_completion() {
    let mut gc = Collector::new(GcConfig {
        sweep_slice: 1,
        step_per_statement: true,
    });
    let root = gc.alloc(leaf()).unwrap();
    let _garbage = gc.alloc(leaf()).unwrap();
    let roots = vec![root];

    // Begin: roots gray, first mark step empties the gray list.
    assert!(gc.collect_step(&roots));
    assert_eq!(gc.phase(), GcPhase::Sweeping);
    // Two objects, slice of one: first slice leaves work behind.
    assert!(gc.collect_step(&roots));
    // Second slice reaches the end of the list.
    assert!(!gc.collect_step(&roots));
    assert_eq!(gc.phase(), GcPhase::Idle);
    assert_eq!(gc.live_count(), 1);
}

#[test]
fn objects_allocated_mid_cycle_survive_it() {
    let mut gc = Collector::default();
    let a = gc.alloc(leaf()).unwrap();
    let b = gc.alloc(leaf()).unwrap();
    let roots = vec![a, b];

    assert!(gc.collect_step(&roots));
    assert_eq!(gc.phase(), GcPhase::Marking);

    let fresh = gc.alloc(leaf()).unwrap();
    assert!(gc.is_marked(fresh));

    run_cycle(&mut gc, &roots);
    assert!(gc.is_live(fresh));
}

#[test]
fn write_barrier_keeps_late_stored_child_alive() {
    let mut gc = Collector::default();
    let orphan = gc.alloc(leaf()).unwrap();
    let holder = gc.alloc(Node { edges: vec![orphan] }).unwrap();
    let parent = gc.alloc(leaf()).unwrap();
    // The gray list is a stack, so `parent` is scanned before `holder`.
    let roots = vec![holder, parent];

    assert!(gc.collect_step(&roots));
    assert_eq!(gc.phase(), GcPhase::Marking);
    assert!(!gc.is_marked(orphan));

    // Move the orphan from the unscanned holder into the scanned parent.
    gc.get_mut(holder).unwrap().edges.clear();
    gc.get_mut(parent).unwrap().edges.push(orphan);
    gc.shade(orphan);

    run_cycle(&mut gc, &roots);
    assert!(gc.is_live(orphan));
}

#[test]
fn unreachable_object_survives_at_most_one_extra_cycle() {
    let mut gc = Collector::default();
    let root = gc.alloc(leaf()).unwrap();
    let victim = gc.alloc(leaf()).unwrap();
    let mut roots = vec![root, victim];

    gc.collect_step(&roots);
    roots.pop();
    run_cycle(&mut gc, &roots);
    // It was a root when the first cycle began.
    assert!(gc.is_live(victim));

    run_cycle(&mut gc, &roots);
    assert!(!gc.is_live(victim));
}

#[test]
fn collect_full_finishes_in_progress_cycle() {
    let mut gc = Collector::default();
    let root = gc.alloc(leaf()).unwrap();
    let garbage = gc.alloc(leaf()).unwrap();
    let roots = vec![root];

    gc.collect_step(&roots);
    let before = gc.stats().cycles;
    gc.collect_full(&roots);

    assert_eq!(gc.stats().cycles, before + 1);
    assert!(!gc.is_live(garbage));
    assert_eq!(gc.phase(), GcPhase::Idle);
}

#[test]
fn zero_sweep_slice_still_makes_progress() {
    let mut gc = Collector::new(GcConfig {
        sweep_slice: 0,
        step_per_statement: false,
    });
    for _ in 0..5 {
        gc.alloc(leaf()).unwrap();
    }
    let steps = run_cycle(&mut gc, &Vec::new());
    assert!(steps >= 5);
    assert_eq!(gc.live_count(), 0);
}

#[test]
fn freed_slots_are_reused() {
    let mut gc = Collector::default();
    for _ in 0..10 {
        gc.alloc(leaf()).unwrap();
    }
    gc.collect_full(&Vec::<GcRef>::new());
    for _ in 0..10 {
        gc.alloc(leaf()).unwrap();
    }
    assert_eq!(gc.objects.len(), 10);
    assert_eq!(gc.stats().freed, 10);
}

/// Builds `count` nodes with `edges` between them; returns the handles.
fn build_graph(gc: &mut Collector<Node>, count: usize, edges: &[(usize, usize)]) -> Vec<GcRef> {
    let refs: Vec<GcRef> = (0..count).map(|_| gc.alloc(leaf()).unwrap()).collect();
    for &(from, to) in edges {
        gc.get_mut(refs[from % count])
            .unwrap()
            .edges
            .push(refs[to % count]);
    }
    refs
}

fn reachable(count: usize, edges: &[(usize, usize)], roots: &[usize]) -> Vec<bool> {
    let mut seen = vec![false; count];
    let mut stack: Vec<usize> = roots.iter().map(|r| r % count).collect();
    while let Some(n) = stack.pop() {
        if seen[n] {
            continue;
        }
        seen[n] = true;
        for &(from, to) in edges {
            if from % count == n {
                stack.push(to % count);
            }
        }
    }
    seen
}

proptest! {
    #[test]
    fn full_collection_keeps_exactly_the_reachable_set(
        count in 1usize..40,
        edges in prop::collection::vec((0usize..40, 0usize..40), 0..80),
        root_picks in prop::collection::vec(0usize..40, 0..5),
    ) {
        let mut gc = Collector::default();
        let refs = build_graph(&mut gc, count, &edges);
        let roots: Vec<GcRef> = root_picks.iter().map(|r| refs[r % count]).collect();
        let expected = reachable(count, &edges, &root_picks);

        gc.collect_full(&roots);

        for (r, keep) in refs.iter().zip(&expected) {
            prop_assert_eq!(gc.is_live(*r), *keep);
        }
    }

    #[test]
    fn incremental_collection_keeps_exactly_the_reachable_set(
        count in 1usize..40,
        edges in prop::collection::vec((0usize..40, 0usize..40), 0..80),
        root_picks in prop::collection::vec(0usize..40, 0..5),
        slice in 1usize..8,
    ) {
        let mut gc = Collector::new(GcConfig { sweep_slice: slice, step_per_statement: true });
        let refs = build_graph(&mut gc, count, &edges);
        let roots: Vec<GcRef> = root_picks.iter().map(|r| refs[r % count]).collect();
        let expected = reachable(count, &edges, &root_picks);

        run_cycle(&mut gc, &roots);

        for (r, keep) in refs.iter().zip(&expected) {
            prop_assert_eq!(gc.is_live(*r), *keep);
        }
        prop_assert_eq!(gc.phase(), GcPhase::Idle);
    }
}

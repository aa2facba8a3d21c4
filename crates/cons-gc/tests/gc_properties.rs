//! Property tests: random mutator programs checked against an independent
//! reachability walk.

use cons_gc::{Heap, Object, ObjectRef};
use proptest::prelude::*;
use rustc_hash::FxHashSet;

/// One mutator step
#[derive(Debug, Clone)]
enum Op {
    PushInt(i64),
    MakePair,
    PopRoot,
    AllocGarbage(i64),
    Reroot(usize),
    SetFirst(usize, usize),
    SetSecond(usize, usize),
    Collect,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<i64>().prop_map(Op::PushInt),
        3 => Just(Op::MakePair),
        2 => Just(Op::PopRoot),
        2 => any::<i64>().prop_map(Op::AllocGarbage),
        1 => any::<usize>().prop_map(Op::Reroot),
        1 => (any::<usize>(), any::<usize>()).prop_map(|(p, v)| Op::SetFirst(p, v)),
        1 => (any::<usize>(), any::<usize>()).prop_map(|(p, v)| Op::SetSecond(p, v)),
        1 => Just(Op::Collect),
    ]
}

/// Pick a live object by position
fn pick(heap: &Heap, n: usize) -> Option<ObjectRef> {
    let live: Vec<ObjectRef> = heap.objects().map(|(r, _)| r).collect();
    if live.is_empty() {
        None
    } else {
        Some(live[n % live.len()])
    }
}

fn apply(heap: &mut Heap, op: &Op) {
    // Usage errors (underflow, overflow, non-pair targets) are part of the
    // program space; they must leave the heap consistent.
    match *op {
        Op::PushInt(value) => {
            let _ = heap.new_integer(value);
        }
        Op::MakePair => {
            let _ = heap.new_pair();
        }
        Op::PopRoot => {
            let _ = heap.pop_root();
        }
        Op::AllocGarbage(value) => {
            heap.allocate(Object::Integer(value)).unwrap();
        }
        Op::Reroot(n) => {
            if let Some(r) = pick(heap, n) {
                let _ = heap.push_root(r);
            }
        }
        Op::SetFirst(p, v) => {
            if let (Some(p), Some(v)) = (pick(heap, p), pick(heap, v)) {
                let _ = heap.set_first(p, v);
            }
        }
        Op::SetSecond(p, v) => {
            if let (Some(p), Some(v)) = (pick(heap, p), pick(heap, v)) {
                let _ = heap.set_second(p, v);
            }
        }
        Op::Collect => {
            heap.force_collect();
        }
    }
}

/// Everything reachable from the roots, computed without the collector
fn reachable(heap: &Heap) -> FxHashSet<ObjectRef> {
    let mut seen = FxHashSet::default();
    let mut pending: Vec<ObjectRef> = heap.roots().to_vec();
    while let Some(r) = pending.pop() {
        if !seen.insert(r) {
            continue;
        }
        if let Object::Pair { first, second } = *heap.get(r).unwrap() {
            pending.push(first);
            pending.push(second);
        }
    }
    seen
}

/// No root or pair field points at a freed object
fn assert_no_dangling(heap: &Heap) {
    for &root in heap.roots() {
        assert!(heap.is_live(root), "dangling root {root}");
    }
    for (r, object) in heap.objects() {
        object.trace(&mut |child| {
            assert!(heap.is_live(child), "{r} points at freed {child}");
        });
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_collection_frees_exactly_unreachable(
        initial_threshold in 0usize..8,
        ops in prop::collection::vec(op_strategy(), 0..150),
    ) {
        let mut heap = Heap::new(64, initial_threshold);
        for op in &ops {
            apply(&mut heap, op);
            assert_no_dangling(&heap);
        }

        let expected = reachable(&heap);
        heap.force_collect();

        let live: FxHashSet<ObjectRef> = heap.objects().map(|(r, _)| r).collect();
        prop_assert_eq!(live, expected);
        prop_assert_eq!(heap.threshold(), 2 * heap.live_count());
    }

    #[test]
    fn prop_second_collection_frees_nothing(
        ops in prop::collection::vec(op_strategy(), 0..100),
    ) {
        let mut heap = Heap::new(64, 5);
        for op in &ops {
            apply(&mut heap, op);
        }

        heap.force_collect();
        let live = heap.live_count();

        prop_assert_eq!(heap.force_collect(), 0);
        prop_assert_eq!(heap.live_count(), live);
    }

    #[test]
    fn prop_pair_takes_top_as_second(a in any::<i64>(), b in any::<i64>()) {
        let mut heap = Heap::default();
        heap.new_integer(a).unwrap();
        heap.new_integer(b).unwrap();
        let pair = heap.new_pair().unwrap();

        prop_assert_eq!(heap.integer(heap.first(pair).unwrap()).unwrap(), a);
        prop_assert_eq!(heap.integer(heap.second(pair).unwrap()).unwrap(), b);
    }
}

// ==============================================
// TOMBSTONE HEAP PROPERTY TESTS (integration)
// ==============================================
//
// Model-based checks: every operation sequence is mirrored on a BTreeSet of
// live values, which is the exact observable state of the heap.

use std::collections::BTreeSet;

use proptest::prelude::*;
use rentkit::ds::TombstoneHeap;

#[derive(Debug, Clone)]
enum Op {
    Insert(u8),
    Remove(u8),
    Pop,
    Peek(usize),
    Compact,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..32).prop_map(Op::Insert),
        3 => (0u8..32).prop_map(Op::Remove),
        2 => Just(Op::Pop),
        1 => (0usize..8).prop_map(Op::Peek),
        1 => Just(Op::Compact),
    ]
}

proptest! {
    /// Property: pop returns the smallest live value; peek returns the
    /// smallest live values without consuming them.
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_matches_sorted_live_set(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut heap = TombstoneHeap::new();
        let mut live = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(v) => {
                    heap.insert(v);
                    live.insert(v);
                },
                Op::Remove(v) => {
                    let was_live = heap.remove(v);
                    prop_assert_eq!(was_live, live.remove(&v));
                },
                Op::Pop => {
                    prop_assert_eq!(heap.pop(), live.pop_first());
                },
                Op::Peek(k) => {
                    let expected: Vec<u8> = live.iter().copied().take(k).collect();
                    prop_assert_eq!(heap.peek_top_k(k), expected);
                },
                Op::Compact => {
                    heap.compact();
                    prop_assert_eq!(heap.heap_len(), live.len());
                },
            }
            prop_assert_eq!(heap.len(), live.len());
            prop_assert!(heap.heap_len() >= heap.len());
        }

        let drained: Vec<u8> = std::iter::from_fn(|| heap.pop()).collect();
        let expected: Vec<u8> = live.into_iter().collect();
        prop_assert_eq!(drained, expected);
    }

    /// Property: inserting a value twice in a row behaves like inserting it once.
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_repeated_insert_is_idempotent(values in prop::collection::vec(0u16..500, 0..100)) {
        let mut once = TombstoneHeap::new();
        let mut twice = TombstoneHeap::new();
        for &v in &values {
            once.insert(v);
            twice.insert(v);
            twice.insert(v);
        }
        prop_assert_eq!(once.heap_len(), twice.heap_len());

        let a: Vec<u16> = std::iter::from_fn(|| once.pop()).collect();
        let b: Vec<u16> = std::iter::from_fn(|| twice.pop()).collect();
        prop_assert_eq!(a, b);
    }

    /// Property: removing values that were never inserted leaves the pop
    /// sequence of everything else unchanged.
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_removing_absent_values_is_inert(
        values in prop::collection::btree_set(0u32..1000, 0..50),
        absent in prop::collection::vec(1000u32..2000, 0..50),
    ) {
        let mut heap: TombstoneHeap<u32> = values.iter().copied().collect();
        for v in absent {
            prop_assert!(!heap.remove(v));
        }
        let drained: Vec<u32> = std::iter::from_fn(|| heap.pop()).collect();
        let expected: Vec<u32> = values.into_iter().collect();
        prop_assert_eq!(drained, expected);
    }

    /// Property: insert, remove, insert leaves the value poppable.
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_reinsert_after_remove_restores(v in any::<i64>(), others in prop::collection::vec(any::<i64>(), 0..20)) {
        let mut heap: TombstoneHeap<i64> = others.iter().copied().filter(|o| *o != v).collect();
        heap.insert(v);
        heap.remove(v);
        heap.insert(v);
        prop_assert!(heap.contains(&v));

        let drained: Vec<i64> = std::iter::from_fn(|| heap.pop()).collect();
        prop_assert!(drained.contains(&v));
        prop_assert!(drained.windows(2).all(|w| w[0] < w[1]));
    }
}

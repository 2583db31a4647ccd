/*!
 * Ordered Set Law Tests
 * Randomized insert/find/erase interleavings checked against a reference
 */

use std::cmp::Ordering;

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use schedsim::collections::{Compare, OrderedSet};
use schedsim::sched::order::PriorityOrder;
use schedsim::sched::Pcb;

fn random_pcb<R: Rng>(rng: &mut R, pid: u32) -> Pcb {
    let mut p = Pcb::new(
        pid,
        rng.gen_range(1..20),
        rng.gen_range(0..50),
        rng.gen_range(0..100),
        rng.gen_range(1..100),
        0,
    );
    p.restamp(rng.gen_range(0..200));
    p
}

#[test]
fn test_random_interleaving_matches_reference() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let cmp = PriorityOrder;

    let mut set: OrderedSet<Pcb, PriorityOrder> = OrderedSet::new();
    let mut reference: Vec<Pcb> = Vec::new();

    let mut inserts = 0usize;
    let mut erases = 0usize;
    let mut next_pid = 1u32;

    for _ in 0..10_000 {
        match rng.gen_range(0..3) {
            0 | 1 => {
                let p = random_pcb(&mut rng, next_pid);
                next_pid += 1;
                set.insert(p.clone());
                reference.push(p);
                inserts += 1;
            }
            _ if !reference.is_empty() => {
                let idx = rng.gen_range(0..reference.len());
                let p = reference.swap_remove(idx);
                let handle = set.find(&p).expect("reference element must be present");
                // With unique pids the total order is strict, so find can
                // only land on the element itself.
                assert_eq!(set.get(handle).pid, p.pid);
                let removed = set.erase(handle);
                assert_eq!(removed, p);
                erases += 1;
            }
            _ => {}
        }
        assert_eq!(set.len(), inserts - erases);
    }

    assert_eq!(set.len(), inserts - erases);

    reference.sort_by(|a, b| cmp.compare(a, b));
    let drained: Vec<u32> = set.iter().map(|p| p.pid).collect();
    let expected: Vec<u32> = reference.iter().map(|p| p.pid).collect();
    assert_eq!(drained, expected);
}

#[test]
fn test_pop_min_drains_in_comparator_order() {
    let mut rng = StdRng::seed_from_u64(42);
    let cmp = PriorityOrder;

    let mut set: OrderedSet<Pcb, PriorityOrder> = OrderedSet::new();
    let mut reference: Vec<Pcb> = Vec::new();
    for pid in 1..=500 {
        let p = random_pcb(&mut rng, pid);
        set.insert(p.clone());
        reference.push(p);
    }
    reference.sort_by(|a, b| cmp.compare(a, b));

    let mut drained = Vec::new();
    while let Some(p) = set.pop_min() {
        drained.push(p);
    }
    assert_eq!(drained, reference);
}

#[test]
fn test_find_is_equivalence_under_the_comparator() {
    let mut rng = StdRng::seed_from_u64(7);
    let cmp = PriorityOrder;

    let mut set: OrderedSet<Pcb, PriorityOrder> = OrderedSet::new();
    let mut members = Vec::new();
    for pid in 1..=200 {
        let p = random_pcb(&mut rng, pid);
        set.insert(p.clone());
        members.push(p);
    }

    for p in &members {
        let handle = set.find(p).expect("member must be found");
        assert_eq!(cmp.compare(set.get(handle), p), Ordering::Equal);
    }

    // A probe that matches no member comes back empty.
    let stranger = random_pcb(&mut rng, 9999);
    assert!(set.find(&stranger).is_none());
}

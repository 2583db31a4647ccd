/*!
 * Comparator Family
 * Total orders over process records and age-queue tags
 */

use std::cmp::Ordering;

use super::pcb::Pcb;
use super::ready::AgeTag;
use crate::collections::Compare;
use crate::core::types::{Clock, Prio, KERNEL_PRIO_MIN};

/// Stamp key shared by the stamp-sensitive orders: unmaxed entries sort
/// before maxed ones and compare by stamp; maxed entries are mutually equal
/// on this key, leaving the pid tie-break to decide.
fn stamp_key(maxed: bool, stamp: Clock) -> (bool, Clock) {
    (maxed, if maxed { 0 } else { stamp })
}

/// Interleave the user and kernel bands onto one scale that puts the two
/// class ceilings last: user p maps to 2p (49 -> 98), kernel p maps to
/// 2(p - 50) + 1 (99 -> 99). Aging scans stop at the first maxed entry
/// because of this.
fn effective_priority(priority: Prio) -> Prio {
    if priority < KERNEL_PRIO_MIN {
        priority * 2
    } else {
        (priority - KERNEL_PRIO_MIN) * 2 + 1
    }
}

/// New-arrivals order: arrival tick ascending, pid ascending.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArrivalOrder;

impl Compare<Pcb> for ArrivalOrder {
    fn compare(&self, a: &Pcb, b: &Pcb) -> Ordering {
        a.arrival
            .cmp(&b.arrival)
            .then_with(|| a.pid.cmp(&b.pid))
    }
}

/// Priority order: priority descending (more urgent pops first), then stamp
/// ascending (older first), then pid ascending.
#[derive(Debug, Default, Clone, Copy)]
pub struct PriorityOrder;

impl Compare<Pcb> for PriorityOrder {
    fn compare(&self, a: &Pcb, b: &Pcb) -> Ordering {
        b.priority
            .cmp(&a.priority)
            .then_with(|| stamp_key(a.maxed, a.stamp).cmp(&stamp_key(b.maxed, b.stamp)))
            .then_with(|| a.pid.cmp(&b.pid))
    }
}

/// FIFO order: stamp ascending, pid ascending.
#[derive(Debug, Default, Clone, Copy)]
pub struct FifoOrder;

impl Compare<Pcb> for FifoOrder {
    fn compare(&self, a: &Pcb, b: &Pcb) -> Ordering {
        stamp_key(a.maxed, a.stamp)
            .cmp(&stamp_key(b.maxed, b.stamp))
            .then_with(|| a.pid.cmp(&b.pid))
    }
}

/// SJF order: remaining burst ascending, then stamp, then pid.
#[derive(Debug, Default, Clone, Copy)]
pub struct SjfOrder;

impl Compare<Pcb> for SjfOrder {
    fn compare(&self, a: &Pcb, b: &Pcb) -> Ordering {
        a.burst
            .cmp(&b.burst)
            .then_with(|| stamp_key(a.maxed, a.stamp).cmp(&stamp_key(b.maxed, b.stamp)))
            .then_with(|| a.pid.cmp(&b.pid))
    }
}

/// EDF order: absolute deadline ascending, pid ascending.
#[derive(Debug, Default, Clone, Copy)]
pub struct EdfOrder;

impl Compare<Pcb> for EdfOrder {
    fn compare(&self, a: &Pcb, b: &Pcb) -> Ordering {
        a.deadline
            .cmp(&b.deadline)
            .then_with(|| a.pid.cmp(&b.pid))
    }
}

/// Age order over ready-queue tags: maxed entries last, otherwise stamp
/// ascending, then effective priority ascending, then pid ascending.
#[derive(Debug, Default, Clone, Copy)]
pub struct AgeOrder;

impl Compare<AgeTag> for AgeOrder {
    fn compare(&self, a: &AgeTag, b: &AgeTag) -> Ordering {
        stamp_key(a.maxed, a.stamp)
            .cmp(&stamp_key(b.maxed, b.stamp))
            .then_with(|| effective_priority(a.priority).cmp(&effective_priority(b.priority)))
            .then_with(|| a.pid.cmp(&b.pid))
    }
}

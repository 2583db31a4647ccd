/*!
 * Dual Ready Structure
 * Scheduler-ordered ready queue with an age-ordered shadow
 */

use super::order::AgeOrder;
use super::pcb::Pcb;
use crate::collections::{Compare, NodeRef, OrderedSet};
use crate::core::types::{Clock, Pid, Prio};

/// Age-queue entry: a stable handle into the ready set plus copies of the
/// fields the age order sorts on. The copies make the tag self-ordering and
/// double as the lookup key when a specific ready entry must be dropped.
#[derive(Debug, Clone, Copy)]
pub struct AgeTag {
    pub(super) node: NodeRef,
    pub(super) maxed: bool,
    pub(super) stamp: Clock,
    pub(super) priority: Prio,
    pub(super) pid: Pid,
}

impl AgeTag {
    fn of(node: NodeRef, p: &Pcb) -> Self {
        Self {
            node,
            maxed: p.maxed,
            stamp: p.stamp,
            priority: p.priority,
            pid: p.pid,
        }
    }
}

/// Ready queue paired with an age-ordered shadow of the same processes.
///
/// Each side carries one entry per queued process, so aging can pull out the
/// oldest ready entry in O(log n) instead of scanning the whole queue. The
/// structure costs roughly twice the memory of a bare ready queue in
/// exchange.
#[derive(Debug)]
pub struct ReadyQueue<C: Compare<Pcb> + Default> {
    ready: OrderedSet<Pcb, C>,
    age: OrderedSet<AgeTag, AgeOrder>,
}

impl<C: Compare<Pcb> + Default> Default for ReadyQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Compare<Pcb> + Default> ReadyQueue<C> {
    pub fn new() -> Self {
        Self {
            ready: OrderedSet::new(),
            age: OrderedSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.ready.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ready.is_empty()
    }

    /// Add a process to both sides.
    pub fn push(&mut self, p: Pcb) {
        let node = self.ready.insert(p);
        let tag = AgeTag::of(node, self.ready.get(node));
        self.age.insert(tag);
        assert_eq!(self.ready.len(), self.age.len());
    }

    /// Next process in scheduler order, without removing it.
    pub fn peek(&self) -> Option<&Pcb> {
        self.ready.peek_min()
    }

    /// Remove and return the next process in scheduler order, dropping its
    /// age entry alongside.
    pub fn pop(&mut self) -> Option<Pcb> {
        let min = self.ready.min()?;
        let probe = AgeTag::of(min, self.ready.get(min));
        let tag = self
            .age
            .find(&probe)
            .expect("age entry missing for ready minimum");
        debug_assert_eq!(self.age.get(tag).node, min);
        self.age.erase(tag);
        let p = self.ready.erase(min);
        assert_eq!(self.ready.len(), self.age.len());
        Some(p)
    }

    /// The process the age order would retire next, without removing it.
    pub fn peek_oldest(&self) -> Option<&Pcb> {
        self.age.peek_min().map(|tag| self.ready.get(tag.node))
    }

    /// Remove and return the process the age order retires next, dropping
    /// its ready entry alongside.
    pub fn take_oldest(&mut self) -> Option<Pcb> {
        let tag = self.age.pop_min()?;
        let p = self.ready.erase(tag.node);
        assert_eq!(self.ready.len(), self.age.len());
        Some(p)
    }

    /// Iterate processes in scheduler order.
    pub fn iter(&self) -> impl Iterator<Item = &Pcb> {
        self.ready.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sched::order::PriorityOrder;

    fn pcb(pid: u32, priority: i32, stamp: u64) -> Pcb {
        let mut p = Pcb::new(pid, 10, 0, priority, 100, 0);
        p.restamp(stamp);
        p
    }

    #[test]
    fn test_sides_stay_size_synchronized() {
        let mut q: ReadyQueue<PriorityOrder> = ReadyQueue::new();
        assert!(q.is_empty());

        q.push(pcb(1, 10, 0));
        q.push(pcb(2, 40, 1));
        q.push(pcb(3, 25, 2));
        assert_eq!(q.len(), 3);

        q.pop();
        assert_eq!(q.len(), 2);
        q.take_oldest();
        assert_eq!(q.len(), 1);
        q.pop();
        assert!(q.is_empty());
    }

    #[test]
    fn test_pop_follows_scheduler_order() {
        let mut q: ReadyQueue<PriorityOrder> = ReadyQueue::new();
        q.push(pcb(1, 10, 0));
        q.push(pcb(2, 40, 1));
        q.push(pcb(3, 25, 2));

        assert_eq!(q.pop().map(|p| p.pid), Some(2));
        assert_eq!(q.pop().map(|p| p.pid), Some(3));
        assert_eq!(q.pop().map(|p| p.pid), Some(1));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn test_oldest_follows_age_order_not_scheduler_order() {
        let mut q: ReadyQueue<PriorityOrder> = ReadyQueue::new();
        // Highest priority but freshly stamped; the age side must ignore it.
        q.push(pcb(1, 45, 9));
        q.push(pcb(2, 5, 1));
        q.push(pcb(3, 30, 4));

        assert_eq!(q.peek().map(|p| p.pid), Some(1));
        assert_eq!(q.peek_oldest().map(|p| p.pid), Some(2));
        assert_eq!(q.take_oldest().map(|p| p.pid), Some(2));
        assert_eq!(q.take_oldest().map(|p| p.pid), Some(3));
        assert_eq!(q.take_oldest().map(|p| p.pid), Some(1));
    }

    #[test]
    fn test_maxed_entries_come_last_in_age_order() {
        let mut q: ReadyQueue<PriorityOrder> = ReadyQueue::new();
        q.push(pcb(1, 49, 0)); // maxed on restamp
        q.push(pcb(2, 10, 7));

        assert_eq!(q.peek_oldest().map(|p| p.pid), Some(2));
    }

    #[test]
    fn test_equal_scheduler_keys_pop_deterministically() {
        let mut q: ReadyQueue<PriorityOrder> = ReadyQueue::new();
        q.push(pcb(4, 20, 3));
        q.push(pcb(2, 20, 3));
        q.push(pcb(9, 20, 3));

        assert_eq!(q.pop().map(|p| p.pid), Some(2));
        assert_eq!(q.pop().map(|p| p.pid), Some(4));
        assert_eq!(q.pop().map(|p| p.pid), Some(9));
    }
}

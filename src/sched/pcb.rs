/*!
 * Process Control Block
 * Per-process record with saturating priority adjustment
 */

use crate::core::types::{
    Clock, Pid, Prio, KERNEL_PRIO_MAX, KERNEL_PRIO_MIN, USER_PRIO_MAX, USER_PRIO_MIN,
};

/// Process control block.
///
/// `priority` stays inside its class band for the whole lifetime of the
/// process: [0, 49] for user processes, [50, 99] for kernel processes.
/// `stamp` is the tick at which the process was last placed on the ready
/// queue; it is meaningful only while `maxed` is false. A maxed process sits
/// at its class ceiling and is exempt from aging until something demotes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pcb {
    pub pid: Pid,
    /// Remaining CPU burst, in ticks
    pub burst: u64,
    /// Arrival tick
    pub arrival: Clock,
    pub priority: Prio,
    /// Absolute deadline tick (consulted by EDF only)
    pub deadline: Clock,
    /// I/O duration; 0 means the process never performs I/O
    pub io_time: u64,
    /// Elapsed I/O ticks while the process sits on the I/O list
    pub io_elapsed: u64,
    /// Tick of the last placement on the ready queue
    pub stamp: Clock,
    /// Process sits at its class ceiling and must not age further
    pub maxed: bool,
}

impl Pcb {
    pub fn new(
        pid: Pid,
        burst: u64,
        arrival: Clock,
        priority: Prio,
        deadline: Clock,
        io_time: u64,
    ) -> Self {
        Self {
            pid,
            burst,
            arrival,
            priority,
            deadline,
            io_time,
            io_elapsed: 0,
            stamp: 0,
            maxed: false,
        }
    }

    /// Kernel processes live in the [50, 99] priority band.
    pub fn is_kernel(&self) -> bool {
        self.priority >= KERNEL_PRIO_MIN
    }

    /// Single-letter class flag for display: `k` for kernel, `u` for user.
    pub fn class_flag(&self) -> char {
        if self.is_kernel() {
            'k'
        } else {
            'u'
        }
    }

    /// Whether the priority sits at its class ceiling (49 or 99).
    pub fn at_ceiling(&self) -> bool {
        self.priority == USER_PRIO_MAX || self.priority == KERNEL_PRIO_MAX
    }

    /// Raise priority by `amount`, saturating at the class bounds. The class
    /// is decided from the pre-adjustment priority: a user process can never
    /// be promoted into the kernel band.
    pub fn promote(&mut self, amount: i64) {
        let (floor, ceiling) = self.class_bounds();
        self.priority = clamp_prio(self.priority as i64 + amount, floor, ceiling);
    }

    /// Lower priority by `amount`, saturating at the class bounds.
    pub fn demote(&mut self, amount: i64) {
        let (floor, ceiling) = self.class_bounds();
        self.priority = clamp_prio(self.priority as i64 - amount, floor, ceiling);
    }

    /// Record a (re)placement on the ready queue at `clock`. A process at
    /// its class ceiling is marked maxed instead, which exempts it from
    /// aging and sinks it to the back of the age order.
    pub fn restamp(&mut self, clock: Clock) {
        if self.at_ceiling() {
            self.maxed = true;
        } else {
            self.maxed = false;
            self.stamp = clock;
        }
    }

    fn class_bounds(&self) -> (Prio, Prio) {
        if self.is_kernel() {
            (KERNEL_PRIO_MIN, KERNEL_PRIO_MAX)
        } else {
            (USER_PRIO_MIN, USER_PRIO_MAX)
        }
    }
}

fn clamp_prio(value: i64, floor: Prio, ceiling: Prio) -> Prio {
    value.clamp(floor as i64, ceiling as i64) as Prio
}

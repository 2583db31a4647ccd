/*!
 * Scheduling Subsystem
 * Process records, ready queues, comparators, and the simulation driver
 */

use std::fmt;
use std::str::FromStr;

use crate::collections::OrderedSet;
use crate::config::SimConfig;
use crate::core::errors::ConfigError;
use crate::core::types::SimResult;
use crate::trace::Tracer;

pub mod driver;
pub mod order;
pub mod pcb;
pub mod ready;
pub mod stats;

pub use driver::Simulation;
pub use order::{ArrivalOrder, EdfOrder, FifoOrder, PriorityOrder, SjfOrder};
pub use pcb::Pcb;
pub use ready::ReadyQueue;
pub use stats::Stats;

/// Scheduling discipline for the ready queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerKind {
    /// First-in first-out by ready-queue stamp
    Fifo,
    /// Shortest remaining burst first
    Sjf,
    /// Priority-driven with aging
    Priority,
    /// Earliest deadline first with admission control
    Edf,
}

impl SchedulerKind {
    /// Whether the per-tick aging pass applies to this discipline.
    pub fn ages(self) -> bool {
        self == SchedulerKind::Priority
    }
}

impl fmt::Display for SchedulerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchedulerKind::Fifo => "FIFO",
            SchedulerKind::Sjf => "SJF",
            SchedulerKind::Priority => "PRIORITY",
            SchedulerKind::Edf => "EDF",
        };
        f.write_str(name)
    }
}

impl FromStr for SchedulerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "FIFO" => Ok(SchedulerKind::Fifo),
            "SJF" => Ok(SchedulerKind::Sjf),
            "PRIORITY" => Ok(SchedulerKind::Priority),
            "EDF" => Ok(SchedulerKind::Edf),
            other => Err(ConfigError::InvalidScheduler(other.to_string())),
        }
    }
}

/// Run the configured discipline over a loaded workload, writing the event
/// trace through `tracer`. The driver is generic over the ready-queue
/// comparator; this is the one place the discipline name picks the type.
pub fn simulate(
    config: &SimConfig,
    workload: OrderedSet<Pcb, ArrivalOrder>,
    tracer: &mut Tracer,
) -> SimResult<Stats> {
    match config.scheduler {
        SchedulerKind::Fifo => Simulation::<FifoOrder>::new(config, workload).run(tracer),
        SchedulerKind::Sjf => Simulation::<SjfOrder>::new(config, workload).run(tracer),
        SchedulerKind::Priority => Simulation::<PriorityOrder>::new(config, workload).run(tracer),
        SchedulerKind::Edf => Simulation::<EdfOrder>::new(config, workload).run(tracer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduler_names_parse_case_insensitively() {
        assert_eq!("fifo".parse::<SchedulerKind>().ok(), Some(SchedulerKind::Fifo));
        assert_eq!("SJF".parse::<SchedulerKind>().ok(), Some(SchedulerKind::Sjf));
        assert_eq!(
            "Priority".parse::<SchedulerKind>().ok(),
            Some(SchedulerKind::Priority)
        );
        assert_eq!("edf".parse::<SchedulerKind>().ok(), Some(SchedulerKind::Edf));
        assert!("cfs".parse::<SchedulerKind>().is_err());
    }

    #[test]
    fn test_only_priority_ages() {
        assert!(SchedulerKind::Priority.ages());
        assert!(!SchedulerKind::Fifo.ages());
        assert!(!SchedulerKind::Sjf.ages());
        assert!(!SchedulerKind::Edf.ages());
    }
}

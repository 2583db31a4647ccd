/*!
 * Scheduler Statistics
 * Waiting and turnaround accounting across a simulation run
 */

use crate::core::types::Clock;

/// Running accumulators, folded into a [`Stats`] snapshot after the loop.
#[derive(Debug)]
pub struct StatsBuilder {
    np: usize,
    waiting: f64,
    turnaround: f64,
}

impl StatsBuilder {
    pub fn new(process_count: usize) -> Self {
        Self {
            np: process_count,
            waiting: 0.0,
            turnaround: 0.0,
        }
    }

    /// A process terminated at `clock`.
    pub fn add_turnaround(&mut self, clock: Clock) {
        self.turnaround += clock as f64;
    }

    /// One tick elapsed with `ready_len` processes waiting on the ready
    /// queue. Each queued process is counted once per tick it waits.
    pub fn add_ready_wait(&mut self, ready_len: usize) {
        self.waiting += ready_len as f64;
    }

    /// A process was dropped at dispatch time (deadline admission).
    pub fn drop_process(&mut self) {
        self.np -= 1;
    }

    /// Averages over the full workload size.
    pub fn finalize(self) -> Stats {
        Stats::averaged(self.np, self.waiting, self.turnaround)
    }

    /// Deadline-scheduler variant: the population is recomputed as the
    /// number of pids that recorded any wait (admission drops zero their
    /// slot beforehand), and the waiting total comes from the per-pid
    /// vector.
    pub fn finalize_deadline(self, wait_by_pid: &[u64]) -> Stats {
        let np = wait_by_pid.iter().filter(|&&w| w != 0).count();
        let waiting = wait_by_pid.iter().sum::<u64>() as f64;
        Stats::averaged(np, waiting, self.turnaround)
    }
}

/// Aggregate timing results of one simulation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    /// Number of processes that count toward the averages
    pub np: usize,
    /// Average waiting time
    pub awt: f64,
    /// Average turnaround time
    pub att: f64,
}

impl Stats {
    pub fn zero() -> Self {
        Self {
            np: 0,
            awt: 0.0,
            att: 0.0,
        }
    }

    fn averaged(np: usize, waiting: f64, turnaround: f64) -> Self {
        if np == 0 {
            return Self::zero();
        }
        Self {
            np,
            awt: waiting / np as f64,
            att: turnaround / np as f64,
        }
    }

    /// Print the closing stats block to stdout.
    pub fn print(&self) {
        println!("************* STATS *************");
        println!("NP: {}", self.np);
        println!("AWT: {:.3}", self.awt);
        println!("ATT: {:.3}", self.att);
    }
}

/*!
 * Simulation Driver
 * Per-tick state machine: arrivals, I/O, aging, dispatch, accounting
 */

use std::io;

use log::{debug, info};

use super::order::ArrivalOrder;
use super::pcb::Pcb;
use super::ready::ReadyQueue;
use super::stats::{Stats, StatsBuilder};
use super::SchedulerKind;
use crate::collections::{Compare, OrderedSet};
use crate::config::SimConfig;
use crate::core::types::{Clock, Pid, SimResult};
use crate::trace::{self, Action, TickView, Tracer};

/// The process currently holding the CPU.
#[derive(Debug)]
struct Running {
    pcb: Pcb,
    /// Ticks consumed of the current quantum
    used: u64,
    /// Quantum length chosen at dispatch
    quantum: u64,
}

/// One simulation run, parameterized over the ready-queue order.
///
/// Discipline-specific behavior that does not follow from the ordering
/// (aging, deadline admission, the I/O interrupt) branches on the configured
/// scheduler kind, mirroring how the ready order itself is fixed by `C`.
#[derive(Debug)]
pub struct Simulation<'a, C: Compare<Pcb> + Default> {
    config: &'a SimConfig,
    clock: Clock,
    new_queue: OrderedSet<Pcb, ArrivalOrder>,
    ready: ReadyQueue<C>,
    io_queue: Vec<Pcb>,
    running: Option<Running>,
    stats: StatsBuilder,
    /// Per-pid wait counters, EDF only; indexed by pid, so pids are assumed
    /// to be dense in [1, workload size]
    deadline_wait: Vec<u64>,
    /// Every workload pid, ascending, for the dashboard
    workload_pids: Vec<Pid>,
}

impl<'a, C: Compare<Pcb> + Default> Simulation<'a, C> {
    pub fn new(config: &'a SimConfig, workload: OrderedSet<Pcb, ArrivalOrder>) -> Self {
        let mut workload_pids: Vec<Pid> = workload.iter().map(|p| p.pid).collect();
        workload_pids.sort_unstable();

        let count = workload.len();
        let deadline_wait = if config.scheduler == SchedulerKind::Edf {
            vec![0; count + 1]
        } else {
            Vec::new()
        };

        Self {
            config,
            clock: 0,
            new_queue: workload,
            ready: ReadyQueue::new(),
            io_queue: Vec::new(),
            running: None,
            stats: StatsBuilder::new(count),
            deadline_wait,
            workload_pids,
        }
    }

    /// Run the simulation to completion, writing the event trace.
    pub fn run(mut self, tracer: &mut Tracer) -> SimResult<Stats> {
        tracer.header()?;

        if self.new_queue.is_empty() {
            eprintln!("No processes to run");
            return Ok(Stats::zero());
        }

        info!(
            "{} simulation starting with {} processes",
            self.config.scheduler,
            self.new_queue.len()
        );

        if self.config.interactive {
            trace::interactive_preamble();
            trace::wait_for_tick();
        }

        while self.active() {
            if self.config.interactive {
                trace::tick_banner(self.clock, self.config);
            } else if self.clock % 100 == 0 {
                debug!("now at clock {}", self.clock);
            }

            self.step_io();
            if self.config.scheduler.ages() {
                self.step_aging(tracer);
            }
            self.admit_arrivals();
            self.advance_running(tracer)?;
            self.dispatch(tracer)?;

            if self.config.interactive {
                self.render();
                trace::wait_for_tick();
            }

            self.account();
            self.clock += 1;
        }

        info!("simulation finished at clock {}", self.clock);

        let stats = if self.config.scheduler == SchedulerKind::Edf {
            self.stats.finalize_deadline(&self.deadline_wait)
        } else {
            self.stats.finalize()
        };
        Ok(stats)
    }

    fn active(&self) -> bool {
        self.running.is_some()
            || !self.ready.is_empty()
            || !self.io_queue.is_empty()
            || !self.new_queue.is_empty()
    }

    /// Advance every process on the I/O list by one tick; completed ones are
    /// promoted by their I/O duration and re-enter the ready queue.
    fn step_io(&mut self) {
        let mut i = 0;
        while i < self.io_queue.len() {
            self.io_queue[i].io_elapsed += 1;
            if self.io_queue[i].io_elapsed == self.io_queue[i].io_time {
                let mut p = self.io_queue.remove(i);
                let boost = p.io_time as i64;
                p.promote(boost);
                p.restamp(self.clock);
                debug!("process {} finished io at clock {}", p.pid, self.clock);
                self.ready.push(p);
            } else {
                i += 1;
            }
        }
    }

    /// Promote every ready process that has waited a full aging period.
    ///
    /// The scan walks age minima only: it stops at the first entry that is
    /// maxed (those sort last) or still too young. A promoted entry is
    /// restamped to the current tick, so it cannot come back as the next
    /// minimum and the loop always terminates.
    fn step_aging(&mut self, tracer: &Tracer) {
        loop {
            match self.ready.peek_oldest() {
                Some(p) if !p.at_ceiling() && self.clock - p.stamp >= self.config.age_time => {}
                _ => break,
            }
            if let Some(mut p) = self.ready.take_oldest() {
                tracer.echo(p.pid, trace::HAS_AGED);
                debug!("process {} aged at clock {}", p.pid, self.clock);
                p.promote(self.config.age_amount);
                p.restamp(self.clock);
                self.ready.push(p);
            }
        }
    }

    /// Move every process whose arrival tick is now onto the ready queue.
    fn admit_arrivals(&mut self) {
        while let Some(head) = self.new_queue.peek_min() {
            if head.arrival != self.clock {
                break;
            }
            if let Some(mut p) = self.new_queue.pop_min() {
                p.restamp(self.clock);
                debug!("process {} arrives at clock {}", p.pid, self.clock);
                self.ready.push(p);
            }
        }
    }

    /// Burn one tick of the running process and decide its fate: done,
    /// clock-interrupted, or I/O-interrupted on the penultimate quantum
    /// tick. EDF processes never take the I/O path.
    fn advance_running(&mut self, tracer: &mut Tracer) -> io::Result<()> {
        let mut run = match self.running.take() {
            Some(run) => run,
            None => return Ok(()),
        };

        run.pcb.burst -= 1;
        run.used += 1;

        if run.pcb.burst == 0 {
            tracer.action(self.clock, run.pcb.pid, Action::End)?;
            debug!("process {} finished at clock {}", run.pcb.pid, self.clock);
            self.stats.add_turnaround(self.clock);
        } else if run.used == run.quantum {
            tracer.action(self.clock, run.pcb.pid, Action::ClockInterrupt)?;
            let mut p = run.pcb;
            let penalty = if p.is_kernel() {
                self.config.kernel_quantum
            } else {
                self.config.user_quantum
            };
            p.demote(penalty as i64);
            p.restamp(self.clock);
            self.ready.push(p);
        } else if self.config.scheduler != SchedulerKind::Edf
            && run.pcb.io_time != 0
            && run.used == run.quantum - 1
        {
            tracer.action(self.clock, run.pcb.pid, Action::IoInterrupt)?;
            let mut p = run.pcb;
            p.io_elapsed = 0;
            self.io_queue.push(p);
        } else {
            self.running = Some(run);
        }
        Ok(())
    }

    /// Hand the CPU to the next ready process, if the CPU is free. Under
    /// EDF, processes that can no longer meet their deadline are dropped
    /// here, before they ever run.
    fn dispatch(&mut self, tracer: &mut Tracer) -> io::Result<()> {
        if self.running.is_some() || self.ready.is_empty() {
            return Ok(());
        }

        let next = if self.config.scheduler == SchedulerKind::Edf {
            self.admit_feasible(tracer)
        } else {
            self.ready.pop()
        };

        let p = match next {
            Some(p) => p,
            None => return Ok(()),
        };

        let quantum = if p.is_kernel() {
            self.config.kernel_quantum
        } else {
            self.config.user_quantum
        };
        tracer.action(self.clock, p.pid, Action::GetsCpu)?;
        debug!(
            "process {} gets cpu at clock {} (quantum {})",
            p.pid, self.clock, quantum
        );
        self.running = Some(Running {
            pcb: p,
            used: 0,
            quantum,
        });
        Ok(())
    }

    /// Drop ready-queue heads that cannot finish before their deadline; the
    /// first feasible head, if any, is extracted for dispatch. Dropped
    /// processes leave no trace-file record and are excluded from the
    /// statistics population.
    fn admit_feasible(&mut self, tracer: &Tracer) -> Option<Pcb> {
        while let Some(head) = self.ready.peek() {
            if self.clock + head.burst <= head.deadline {
                break;
            }
            if let Some(victim) = self.ready.pop() {
                self.deadline_wait[victim.pid as usize] = 0;
                tracer.echo(victim.pid, trace::CANNOT_MEET_DEADLINE);
                debug!(
                    "process {} dropped at clock {}: deadline {} unreachable",
                    victim.pid, self.clock, victim.deadline
                );
                self.stats.drop_process();
            }
        }
        self.ready.pop()
    }

    /// Per-tick waiting-time bookkeeping over whatever remained on ready.
    fn account(&mut self) {
        if self.config.scheduler == SchedulerKind::Edf {
            for p in self.ready.iter() {
                self.deadline_wait[p.pid as usize] += 1;
            }
        } else {
            self.stats.add_ready_wait(self.ready.len());
        }
    }

    fn render(&self) {
        let view = TickView {
            scheduler: self.config.scheduler,
            running: self.running.as_ref().map(|r| (&r.pcb, r.quantum - r.used)),
            new_procs: self.new_queue.iter().collect(),
            ready_procs: self.ready.iter().collect(),
            io_procs: &self.io_queue,
            all_pids: &self.workload_pids,
        };
        trace::render_dashboard(&view);
    }
}

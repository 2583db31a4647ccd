/*!
 * Trace and Interactive Renderer
 * Event-trace file writer plus the per-tick console dashboard
 */

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;

use ahash::AHashSet;

use crate::config::SimConfig;
use crate::core::types::{Clock, Pid};
use crate::sched::{Pcb, SchedulerKind};

/// Interactive-only notice labels. These never appear in the trace file.
pub const HAS_AGED: &str = "Has Aged";
pub const CANNOT_MEET_DEADLINE: &str = "Cannot Meet Deadline";

/// Traced scheduling action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    GetsCpu,
    End,
    ClockInterrupt,
    IoInterrupt,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::GetsCpu => "Gets CPU",
            Action::End => "End",
            Action::ClockInterrupt => "Clock Interrupt",
            Action::IoInterrupt => "I/O Interrupt",
        };
        f.write_str(label)
    }
}

/// Trace file name for a workload path: `output-` prefix with path
/// separators flattened to dashes.
pub fn trace_file_name(workload_path: &str) -> String {
    let flat: String = workload_path
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();
    format!("output-{flat}")
}

/// Buffered writer for the event trace, echoing to stdout when interactive.
#[derive(Debug)]
pub struct Tracer {
    out: BufWriter<File>,
    interactive: bool,
}

impl Tracer {
    /// Create the trace file for `workload_path` inside `dir`.
    pub fn create(dir: &Path, workload_path: &str, interactive: bool) -> io::Result<Self> {
        let path = dir.join(trace_file_name(workload_path));
        Ok(Self {
            out: BufWriter::new(File::create(path)?),
            interactive,
        })
    }

    /// Write the column-title header line.
    pub fn header(&mut self) -> io::Result<()> {
        writeln!(self.out, "CLOCK\tPID\tACTION")
    }

    /// Record one scheduling action, echoing it when interactive.
    pub fn action(&mut self, clock: Clock, pid: Pid, action: Action) -> io::Result<()> {
        writeln!(self.out, "{clock}\t{pid}\t{action}")?;
        if self.interactive {
            println!("process {pid} '{action}'");
        }
        Ok(())
    }

    /// Interactive-only notice; no trace line is written.
    pub fn echo(&self, pid: Pid, label: &str) {
        if self.interactive {
            println!("process {pid} '{label}'");
        }
    }

    pub fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Startup banner for interactive mode.
pub fn interactive_preamble() {
    eprintln!();
    eprintln!("**** INTERACTIVE MODE ****");
    eprintln!("To enter next clock cycle, press <enter>");
}

/// Per-tick banner for interactive mode.
pub fn tick_banner(clock: Clock, config: &SimConfig) {
    eprintln!(
        "*** Now at clock {} u{} k{} a{} ***",
        clock, config.user_quantum, config.kernel_quantum, config.age_time
    );
}

/// Block until the user submits a blank line (or stdin closes).
pub fn wait_for_tick() {
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                if line.trim().is_empty() {
                    break;
                }
            }
        }
    }
}

/// Everything the dashboard shows for one tick.
#[derive(Debug)]
pub struct TickView<'a> {
    pub scheduler: SchedulerKind,
    /// Running process and its remaining quantum
    pub running: Option<(&'a Pcb, u64)>,
    pub new_procs: Vec<&'a Pcb>,
    pub ready_procs: Vec<&'a Pcb>,
    pub io_procs: &'a [Pcb],
    /// Every pid of the original workload, ascending
    pub all_pids: &'a [Pid],
}

/// Print the per-tick dashboard to stdout.
///
/// Processes are listed as columns in pid order. Which attribute rows appear
/// depends on the discipline: priority and stamp only matter under PRIORITY,
/// deadlines only under EDF, and EDF processes never perform I/O.
pub fn render_dashboard(view: &TickView<'_>) {
    let mut procs: Vec<(&str, &Pcb)> = Vec::new();
    if let Some((p, _)) = view.running {
        procs.push(("running", p));
    }
    for p in &view.new_procs {
        procs.push(("new", p));
    }
    for p in &view.ready_procs {
        procs.push(("ready", p));
    }
    for p in view.io_procs {
        procs.push(("io", p));
    }
    procs.sort_by_key(|(_, p)| p.pid);

    let live: AHashSet<Pid> = procs.iter().map(|(_, p)| p.pid).collect();

    println!();
    match view.running {
        Some((p, left)) => println!("RUNNING:\tpid: {} (tq: {})", p.pid, left),
        None => println!("RUNNING:\tnone"),
    }

    print!("TERMINATED:");
    for pid in view.all_pids {
        if !live.contains(pid) {
            print!("\t{pid}");
        }
    }
    println!();

    print!("IO-QUEUE:");
    for p in view.io_procs {
        print!("\t{}({})", p.pid, p.io_time - p.io_elapsed);
    }
    println!();
    println!();

    print!("STATE:\t");
    for (state, _) in &procs {
        print!("\t{state}");
    }
    println!();

    print!("PID:\t");
    for (_, p) in &procs {
        print!("\t{}({})", p.pid, p.class_flag());
    }
    println!();

    if view.scheduler == SchedulerKind::Priority {
        print!("PRIORITY:");
        for (_, p) in &procs {
            print!("\t{}", p.priority);
        }
        println!();
    }

    print!("BURST:\t");
    for (_, p) in &procs {
        print!("\t{}", p.burst);
    }
    println!();

    print!("ARRIVAL:");
    for (_, p) in &procs {
        print!("\t{}", p.arrival);
    }
    println!();

    if view.scheduler == SchedulerKind::Priority {
        print!("Clock:\t");
        for (_, p) in &procs {
            if p.maxed {
                print!("\t-1");
            } else {
                print!("\t{}", p.stamp);
            }
        }
        println!();
    }

    if view.scheduler != SchedulerKind::Edf {
        print!("IO:\t");
        for (_, p) in &procs {
            print!("\t{}", p.io_time);
        }
        println!();
    }

    if view.scheduler == SchedulerKind::Edf {
        print!("DLINE:\t");
        for (_, p) in &procs {
            print!("\t{}", p.deadline);
        }
        println!();
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_trace_file_name_flattens_separators() {
        assert_eq!(trace_file_name("test_cases"), "output-test_cases");
        assert_eq!(trace_file_name("data/run1"), "output-data-run1");
        assert_eq!(trace_file_name("data\\run1"), "output-data-run1");
        assert_eq!(trace_file_name("/abs/path"), "output--abs-path");
    }

    #[test]
    fn test_tracer_writes_header_and_events() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut tracer = Tracer::create(dir.path(), "wl", false).expect("create");
        tracer.header().unwrap();
        tracer.action(0, 1, Action::GetsCpu).unwrap();
        tracer.action(5, 1, Action::IoInterrupt).unwrap();
        tracer.action(9, 1, Action::End).unwrap();
        tracer.echo(2, CANNOT_MEET_DEADLINE); // must not reach the file
        tracer.finish().unwrap();

        let text = fs::read_to_string(dir.path().join("output-wl")).expect("read trace");
        assert_eq!(
            text,
            "CLOCK\tPID\tACTION\n0\t1\tGets CPU\n5\t1\tI/O Interrupt\n9\t1\tEnd\n"
        );
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(Action::GetsCpu.to_string(), "Gets CPU");
        assert_eq!(Action::End.to_string(), "End");
        assert_eq!(Action::ClockInterrupt.to_string(), "Clock Interrupt");
        assert_eq!(Action::IoInterrupt.to_string(), "I/O Interrupt");
    }
}

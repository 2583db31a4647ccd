/*!
 * Workload Loader
 * Tab-separated workload parsing and random workload generation
 */

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::collections::OrderedSet;
use crate::core::errors::WorkloadError;
use crate::sched::{ArrivalOrder, Pcb};

/// Load a workload file into an arrival-ordered queue.
///
/// The first line is a column header and is ignored. Every other line must
/// hold six tab-separated integers: pid, burst, arrival, priority, deadline,
/// io. Malformed or out-of-range lines are skipped; only failure to open the
/// file is fatal.
pub fn load(path: &str) -> Result<OrderedSet<Pcb, ArrivalOrder>, WorkloadError> {
    let file = File::open(path).map_err(|source| WorkloadError::Open {
        path: path.to_string(),
        source,
    })?;

    let mut queue = OrderedSet::new();
    let mut accepted = 0usize;
    let mut skipped = 0usize;

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        if index == 0 {
            continue;
        }
        match parse_line(&line) {
            Some(pcb) => {
                queue.insert(pcb);
                accepted += 1;
            }
            None => {
                debug!("skipping workload line {}: {:?}", index + 1, line);
                skipped += 1;
            }
        }
    }

    info!(
        "loaded {} processes from '{}', {} lines skipped",
        accepted, path, skipped
    );
    Ok(queue)
}

/// Parse one data line. Lines without exactly five tabs, with non-integer
/// fields, or with out-of-range values yield `None`.
fn parse_line(line: &str) -> Option<Pcb> {
    if line.matches('\t').count() != 5 {
        return None;
    }
    let mut fields = line.split('\t').map(|f| f.trim().parse::<i64>());
    let pid = fields.next()?.ok()?;
    let burst = fields.next()?.ok()?;
    let arrival = fields.next()?.ok()?;
    let priority = fields.next()?.ok()?;
    let deadline = fields.next()?.ok()?;
    let io_time = fields.next()?.ok()?;

    let valid = pid > 0
        && burst > 0
        && arrival >= 0
        && (0..=99).contains(&priority)
        && deadline > 0
        && io_time >= 0;
    if !valid {
        return None;
    }

    Some(Pcb::new(
        u32::try_from(pid).ok()?,
        burst as u64,
        arrival as u64,
        priority as i32,
        deadline as u64,
        io_time as u64,
    ))
}

/// Generate `count` random processes into `path`, seeded from the wall
/// clock.
pub fn generate(count: usize, path: &Path) -> io::Result<()> {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut rng = StdRng::seed_from_u64(seed);
    generate_with(&mut rng, count, path)
}

/// Generator core with an injectable random source, so tests can pin the
/// seed.
pub fn generate_with<R: Rng>(rng: &mut R, count: usize, path: &Path) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "Pid\tBst\tArr\tPri\tDline\tIO")?;

    for pid in 1..=count {
        let burst = rng.gen_range(1..20);
        let arrival = rng.gen_range(0..=count);
        let priority = rng.gen_range(0..100);
        let deadline = rng.gen_range(1..100);
        let io_time = if rng.gen_range(0..100) < 50 {
            rng.gen_range(0..25)
        } else {
            0
        };
        writeln!(
            out,
            "{pid}\t{burst}\t{arrival}\t{priority}\t{deadline}\t{io_time}"
        )?;
    }

    info!("generated {} processes into {}", count, path.display());
    out.flush()
}

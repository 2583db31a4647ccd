/*!
 * schedsim - Main Entry Point
 *
 * Discrete-time process scheduler simulator:
 * - FIFO, SJF, PRIORITY and EDF disciplines
 * - Event trace plus waiting/turnaround statistics
 * - Optional interactive per-tick dashboard
 */

use std::path::Path;
use std::process;

use log::info;

use schedsim::config;
use schedsim::sched;
use schedsim::trace::Tracer;
use schedsim::workload;

fn main() {
    env_logger::init();

    let invocation = config::parse().unwrap_or_else(|err| {
        eprintln!("{err}");
        process::exit(1);
    });
    let config = invocation.config;

    info!(
        "schedsim starting: scheduler={}, kernel_quantum={}, user_quantum={}, age_timer={}, age_amount={}",
        config.scheduler,
        config.kernel_quantum,
        config.user_quantum,
        config.age_time,
        config.age_amount
    );

    if let Some(count) = invocation.generate {
        workload::generate(count, Path::new(&config.workload_path)).unwrap_or_else(|err| {
            eprintln!("Could not write '{}': {}", config.workload_path, err);
            process::exit(1);
        });
    }

    let queue = workload::load(&config.workload_path).unwrap_or_else(|err| {
        eprintln!("{err}");
        process::exit(1);
    });

    let mut tracer = Tracer::create(Path::new("."), &config.workload_path, config.interactive)
        .unwrap_or_else(|err| {
            eprintln!("Could not create trace file: {err}");
            process::exit(1);
        });

    let stats = sched::simulate(&config, queue, &mut tracer).unwrap_or_else(|err| {
        eprintln!("{err}");
        process::exit(1);
    });

    if let Err(err) = tracer.finish() {
        eprintln!("Could not flush trace file: {err}");
        process::exit(1);
    }

    stats.print();
}

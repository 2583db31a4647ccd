/*!
 * Configuration
 * Immutable simulation options built once from the command line
 */

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::warn;

use crate::core::errors::ConfigError;
use crate::sched::SchedulerKind;

pub const DEFAULT_KERNEL_QUANTUM: u64 = 100;
pub const DEFAULT_USER_QUANTUM: u64 = 25;
pub const DEFAULT_AGE_TIME: u64 = 100;
pub const DEFAULT_AGE_AMOUNT: i64 = 10;

/// Path the random generator writes to when no workload file is given.
pub const GENERATED_WORKLOAD: &str = "test_cases";

/// Immutable simulation options. Constructed once at startup and passed by
/// reference to everything that needs it.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub scheduler: SchedulerKind,
    /// Quantum for kernel processes, in ticks
    pub kernel_quantum: u64,
    /// Quantum for user processes, in ticks
    pub user_quantum: u64,
    /// Ticks a ready process may wait before it ages
    pub age_time: u64,
    /// Priority increment per aging event
    pub age_amount: i64,
    pub interactive: bool,
    pub workload_path: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerKind::Priority,
            kernel_quantum: DEFAULT_KERNEL_QUANTUM,
            user_quantum: DEFAULT_USER_QUANTUM,
            age_time: DEFAULT_AGE_TIME,
            age_amount: DEFAULT_AGE_AMOUNT,
            interactive: false,
            workload_path: String::new(),
        }
    }
}

/// A parsed invocation: the configuration plus an optional request to
/// generate a random workload before the run.
#[derive(Debug)]
pub struct Invocation {
    pub config: SimConfig,
    pub generate: Option<usize>,
}

pub fn command() -> Command {
    Command::new("schedsim")
        .about("Discrete-time process scheduler simulator")
        .arg(
            Arg::new("file_name")
                .long("file_name")
                .value_name("PATH")
                .help("Name of the file with processes"),
        )
        .arg(
            Arg::new("generate_processes")
                .long("generate_processes")
                .value_name("N")
                .help("Automatically generate test cases and run them"),
        )
        .arg(
            Arg::new("kernel_quantum")
                .long("kernel_quantum")
                .value_name("INT")
                .help("Time quantum for kernel processes"),
        )
        .arg(
            Arg::new("user_quantum")
                .long("user_quantum")
                .value_name("INT")
                .help("Time quantum for user processes"),
        )
        .arg(
            Arg::new("age_timer")
                .long("age_timer")
                .value_name("INT")
                .help("Ticks a ready process may wait before aging"),
        )
        .arg(
            Arg::new("age_amount")
                .long("age_amount")
                .value_name("INT")
                .help("Amount to increase priority after aging"),
        )
        .arg(
            Arg::new("scheduler")
                .long("scheduler")
                .value_name("NAME")
                .help("Scheduler algorithm: fifo, sjf, priority, edf"),
        )
        .arg(
            Arg::new("interactive")
                .long("interactive")
                .action(ArgAction::SetTrue)
                .help("Open the interactive dashboard"),
        )
}

/// Parse the process command line, exiting for `--help` and usage errors.
pub fn parse() -> Result<Invocation, ConfigError> {
    from_matches(&command().get_matches())
}

pub fn from_matches(matches: &ArgMatches) -> Result<Invocation, ConfigError> {
    let scheduler = match matches.get_one::<String>("scheduler") {
        Some(name) => name.parse::<SchedulerKind>()?,
        None => SchedulerKind::Priority,
    };

    let generate = matches.get_one::<String>("generate_processes").map(|v| {
        let n: i64 = v.parse().unwrap_or(0);
        if n <= 0 {
            10
        } else {
            n as usize
        }
    });

    let workload_path = if generate.is_some() {
        GENERATED_WORKLOAD.to_string()
    } else if let Some(path) = matches.get_one::<String>("file_name") {
        path.clone()
    } else {
        return Err(ConfigError::MissingWorkload);
    };

    let config = SimConfig {
        scheduler,
        kernel_quantum: positive_or(matches, "kernel_quantum", DEFAULT_KERNEL_QUANTUM),
        user_quantum: positive_or(matches, "user_quantum", DEFAULT_USER_QUANTUM),
        age_time: non_negative_or(matches, "age_timer", DEFAULT_AGE_TIME),
        age_amount: int_or(matches, "age_amount", DEFAULT_AGE_AMOUNT),
        interactive: matches.get_flag("interactive"),
        workload_path,
    };
    Ok(Invocation { config, generate })
}

fn int_or(matches: &ArgMatches, id: &str, default: i64) -> i64 {
    match matches.get_one::<String>(id) {
        Some(value) => value.parse().unwrap_or_else(|_| {
            warn!("ignoring non-integer --{id}={value}, using {default}");
            default
        }),
        None => default,
    }
}

fn positive_or(matches: &ArgMatches, id: &str, default: u64) -> u64 {
    let value = int_or(matches, id, default as i64);
    if value <= 0 {
        warn!("ignoring non-positive --{id}={value}, using {default}");
        default
    } else {
        value as u64
    }
}

fn non_negative_or(matches: &ArgMatches, id: &str, default: u64) -> u64 {
    let value = int_or(matches, id, default as i64);
    if value < 0 {
        warn!("ignoring negative --{id}={value}, using {default}");
        default
    } else {
        value as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(args: &[&str]) -> Result<Invocation, ConfigError> {
        let mut argv = vec!["schedsim"];
        argv.extend_from_slice(args);
        from_matches(&command().get_matches_from(argv))
    }

    #[test]
    fn test_defaults() {
        let inv = invocation(&["--file_name=wl"]).expect("parse");
        let c = inv.config;
        assert_eq!(c.scheduler, SchedulerKind::Priority);
        assert_eq!(c.kernel_quantum, 100);
        assert_eq!(c.user_quantum, 25);
        assert_eq!(c.age_time, 100);
        assert_eq!(c.age_amount, 10);
        assert!(!c.interactive);
        assert_eq!(c.workload_path, "wl");
        assert!(inv.generate.is_none());
    }

    #[test]
    fn test_explicit_options() {
        let inv = invocation(&[
            "--file_name=wl",
            "--scheduler=sjf",
            "--kernel_quantum=40",
            "--user_quantum=8",
            "--age_timer=3",
            "--age_amount=5",
            "--interactive",
        ])
        .expect("parse");
        let c = inv.config;
        assert_eq!(c.scheduler, SchedulerKind::Sjf);
        assert_eq!(c.kernel_quantum, 40);
        assert_eq!(c.user_quantum, 8);
        assert_eq!(c.age_time, 3);
        assert_eq!(c.age_amount, 5);
        assert!(c.interactive);
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let inv = invocation(&[
            "--file_name=wl",
            "--kernel_quantum=-3",
            "--user_quantum=abc",
            "--age_timer=-1",
        ])
        .expect("parse");
        let c = inv.config;
        assert_eq!(c.kernel_quantum, 100);
        assert_eq!(c.user_quantum, 25);
        assert_eq!(c.age_time, 100);
    }

    #[test]
    fn test_invalid_scheduler_is_an_error() {
        assert!(matches!(
            invocation(&["--file_name=wl", "--scheduler=cfs"]),
            Err(ConfigError::InvalidScheduler(_))
        ));
    }

    #[test]
    fn test_missing_workload_is_an_error() {
        assert!(matches!(
            invocation(&["--scheduler=fifo"]),
            Err(ConfigError::MissingWorkload)
        ));
    }

    #[test]
    fn test_generate_takes_precedence_over_file_name() {
        let inv = invocation(&["--generate_processes=5", "--file_name=wl"]).expect("parse");
        assert_eq!(inv.generate, Some(5));
        assert_eq!(inv.config.workload_path, GENERATED_WORKLOAD);
    }

    #[test]
    fn test_non_positive_generate_count_defaults_to_ten() {
        let inv = invocation(&["--generate_processes=0"]).expect("parse");
        assert_eq!(inv.generate, Some(10));
        let inv = invocation(&["--generate_processes=-4"]).expect("parse");
        assert_eq!(inv.generate, Some(10));
    }
}

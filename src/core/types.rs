/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type
pub type Pid = u32;

/// Virtual time, in ticks
pub type Clock = u64;

/// Priority level (0-99, higher is more urgent)
pub type Prio = i32;

/// Lowest priority of the user band
pub const USER_PRIO_MIN: Prio = 0;

/// Highest priority of the user band
pub const USER_PRIO_MAX: Prio = 49;

/// Lowest priority of the kernel band
pub const KERNEL_PRIO_MIN: Prio = 50;

/// Highest priority of the kernel band
pub const KERNEL_PRIO_MAX: Prio = 99;

/// Common result type for simulator operations
pub type SimResult<T> = Result<T, super::errors::SimError>;

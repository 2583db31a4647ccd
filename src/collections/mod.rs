/*!
 * Collections
 * Ordered containers backing the scheduler queues
 */

pub mod ordered_set;

pub use ordered_set::{Compare, Iter, NodeRef, OrderedSet};

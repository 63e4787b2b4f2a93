//! Puer GC - tri-color incremental mark-and-sweep collector.
//!
//! Every heap object the runtime creates is owned by a [`Collector`]. The
//! runtime refers to objects through [`GcRef`] handles: a slot index plus a
//! generation counter, so a handle that outlives its object is detected
//! instead of silently aliasing whatever reuses the slot.
//!
//! # Cycle
//!
//! ```text
//! Idle --begin--> Marking --gray list empty--> Sweeping --list exhausted--> Idle
//! ```
//!
//! - *Begin*: flip the mark polarity (every object turns white), clear the
//!   gray list, mark the roots gray.
//! - *Mark step*: pop one gray object and [`Trace::trace`] it; children that
//!   are still white are marked and pushed gray.
//! - *Sweep slice*: visit at most [`GcConfig::sweep_slice`] objects of the
//!   object list, reclaiming the white ones.
//!
//! [`Collector::collect_step`] performs exactly one of these quanta per call,
//! so the evaluator can interleave collection with execution.
//! [`Collector::collect_full`] runs a whole cycle synchronously.
//!
//! # Invariants
//!
//! - Objects allocated while a cycle is running carry the current polarity
//!   (allocate-black) and, during marking, are queued for scanning.
//! - During marking, [`Collector::shade`] is the write barrier: any handle
//!   stored into an already-scanned object must be shaded so no black object
//!   ever points at a white one.

mod collector;
mod error;
mod trace;

pub use collector::{Collector, GcConfig, GcPhase, GcStats};
pub use error::GcError;
pub use trace::{GcRef, Trace, Tracer};

//! # patchup-reconcile
//!
//! The reconciliation engine. Every known patch is classified from stored
//! checksums versus live content into apply, reset-and-drop, or up-to-date,
//! then the plan is executed with an ordering that can never leave the tree
//! partially patched: reset before apply, restore before metadata delete,
//! metadata committed only after a successful apply.

pub mod error;
pub mod executor;
pub mod pipeline;
pub mod planner;
pub mod report;
pub mod store;

pub use error::ReconcileError;
pub use planner::{Disposition, Plan, StaleReason};
pub use report::{Action, RunReport, ScopeReport, TargetOutcome};
pub use store::{AffectedFile, PatchRecord};

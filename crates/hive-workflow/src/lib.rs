//! # Hive Workflow - Layer 4: Incident Workflow Engine
//!
//! The three linked state machines and the rules binding them:
//!
//! - [`ReportLifecycle`]: submission and read access for incident reports
//! - [`TriageWorkflow`]: immutable, hashed triage decisions; the only writer
//!   of a report's status
//! - [`AlertLifecycle`]: the alert publication state machine with CAP
//!   regeneration on every change
//!
//! Every mutation is serialized per entity through [`EntityLocks`] and leaves
//! an entry in the audit ledger. Storage is reached only through the
//! repository traits in [`repository`]; clock and randomness only through
//! [`WorkflowEffects`], passed per call.
//!
//! [`Engine`] wires the three components over one store and one ledger.

#![forbid(unsafe_code)]

pub mod alert;
pub mod audit;
pub mod config;
pub mod effects;
pub mod engine;
pub mod locks;
pub mod query;
pub mod report;
pub mod repository;
pub mod triage;

pub use alert::AlertLifecycle;
pub use audit::AuditRecorder;
pub use config::{AuditPolicy, WorkflowConfig};
pub use effects::WorkflowEffects;
pub use engine::Engine;
pub use locks::EntityLocks;
pub use query::{AlertQuery, ReportQuery, ReportSort, TriageQuery};
pub use report::ReportLifecycle;
pub use repository::{AlertRepository, ReportRepository, TriageRepository};
pub use triage::TriageWorkflow;

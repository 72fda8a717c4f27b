//! Domain Policies
//!
//! Business rules that can be configured per project.

pub mod repairs;

pub use repairs::{InstanceRepair, MissingInstanceIdRepair, RepairTable, INSTANCE_ID_REPAIR};

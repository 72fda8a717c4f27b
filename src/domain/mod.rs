//! Domain Layer
//!
//! The core of rigcascade - staleness and planning logic without I/O.
//!
//! ## Structure
//!
//! - `entities/` - Documents, versions, jobs, publish contexts
//! - `value_objects/` - Ids, source locators, revision names, stages
//! - `services/` - Version graph reader, staleness resolver, job planner
//! - `policies/` - Repair capability table
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or network directly
//! 2. **Pure Functions** - Services are stateless and testable
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod policies;
pub mod ports;
pub mod services;
pub mod value_objects;

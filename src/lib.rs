//! osns-rs: process environment & lifecycle namespace for script hosts
//!
//! The typed surface through which embedded scripts observe process and
//! OS state and through which orderly termination is governed. Host
//! operations are reached through an opaque bridge, so the whole crate
//! works against a mock host as well as the live process.
//!
//! # Modules
//!
//! - **bridge**: host operations trait, typed façade, and the production
//!   `/proc`-backed host
//! - **env**: map-like environment namespace
//! - **facts**: the frozen OS facts root object
//! - **lifecycle**: exit protocol and unload notification
//! - **descriptor**: property-exposure descriptors for embedders
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use osns_rs::{OsNs, SystemHost};
//!
//! let ns = OsNs::new(Rc::new(SystemHost::new()), dispatcher);
//! ns.env().set("MODE", "debug")?;
//! println!("pid {} on {}", ns.pid()?, ns.platform()?);
//! ```

// Core modules
pub mod descriptor;
pub mod errors;
pub mod utils;

// Layered modules
pub mod bridge;
pub mod env;
pub mod facts;
pub mod lifecycle;

// Public API
pub use bridge::{CpuInfo, HostOps, OpBridge, SystemHost};
pub use env::Environ;
pub use errors::{OsNsError, Result};
pub use facts::{MemberKind, OsNs};
pub use lifecycle::{EventDispatcher, LifecycleController, LifecycleState, UNLOAD_EVENT};

#[cfg(test)]
pub(crate) mod test_support;

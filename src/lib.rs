//! pingwatch - live terminal dashboard for host reachability.
//!
//! A background polling engine keeps pinging a set of hosts and stores the
//! latest result per host in a shared table; a renderer turns that table
//! into terminal output on a fixed cadence. The host set can come from a
//! file that is reloaded whenever it changes.
//!
//! - `model` - hosts, status records and display order
//! - `source` - host list loading and hot reload
//! - `collector` - the `Prober` seam and the system `ping` implementation
//! - `engine` - polling loop, status table, shared context
//! - `render` - line-oriented display modes
//! - `tui` - full-screen ratatui dashboard
//! - `supervisor` - session wiring and shutdown

pub mod collector;
pub mod engine;
pub mod model;
pub mod render;
pub mod source;
pub mod supervisor;
pub mod tui;

//! Presentation Layer
//!
//! Route table and navigation.

pub mod navigator;
pub mod router;

pub use navigator::{NavigationOutcome, Navigator, Screen};
pub use router::{RouteTable, View};

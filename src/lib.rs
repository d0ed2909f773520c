//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (e.g., `core-service`, `core-auth`, `core-playback`).
//! Host shells can depend on `mcs-workspace` and enable the documented
//! features without needing to wire each crate individually.

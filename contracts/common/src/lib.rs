//! Shared utilities for the MasterChef contract suite.
//!
//! This crate provides:
//! - [`roles`] — a single-role access guard (`Admin`) whose holders may
//!   grant or revoke the role, with an enumerable membership list.

#![no_std]

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod roles;

pub use roles::*;

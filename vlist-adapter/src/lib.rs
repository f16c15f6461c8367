//! Adapter utilities for the `vlist` crate.
//!
//! The `vlist` crate is UI-agnostic and focuses on the core math and state.
//! This crate provides the small, framework-neutral pieces an embedder needs
//! to wire that core to a real scroll container:
//!
//! - A [`ScrollContainer`] contract for the scrollable element
//! - A [`Controller`] that routes container events into store actions,
//!   delivers jump compensations, detects scroll quiescence, and drives
//!   ease-out smooth scrolling
//!
//! This crate is intentionally framework-agnostic (no DOM/TUI/GUI bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod container;
mod controller;

#[cfg(test)]
mod tests;

pub use container::ScrollContainer;
pub use controller::{Align, Controller};

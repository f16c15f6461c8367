//! A headless list virtualization core.
//!
//! For adapter-level utilities (scroll container driving, smooth scrolling),
//! see the `vlist-adapter` crate.
//!
//! This crate decides which subrange of a large item sequence must be
//! materialized in a scrolling viewport, where each item goes, and how to
//! compensate the scroll position so that asynchronous size measurements,
//! prepends/appends, and programmatic scrolls never produce visible jumps.
//!
//! It is UI-agnostic. A rendering layer is expected to provide:
//! - viewport geometry and scroll events
//! - measured item sizes (e.g. from a layout/resize observer)
//! - the actual scroll writes that deliver compensations
//!
//! The mutation surface is a single reducer: the renderer submits
//! [`Action`]s via [`VirtualStore::dispatch`] and reads the resulting range,
//! offsets, and sizes back out through query accessors.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod cache;
mod store;
mod subscriber;
mod types;


pub use cache::{CacheSnapshot, UNCACHED};
pub use store::{Action, StoreOptions, VirtualStore, SUBPIXEL_THRESHOLD};
pub use subscriber::{SubscriberCallback, SubscriptionId};
pub use types::{ItemsRange, ScrollDirection, StateUpdate};

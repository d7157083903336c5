// src/watch/mod.rs

//! Watch paths and change detection.
//!
//! This module is responsible for:
//! - Resolving user-supplied paths/globs against the project root
//!   ([`resolve`]).
//! - Compiling the resolved set into a glob predicate ([`patterns`]).
//! - Wiring up a cross-platform filesystem watcher (`notify`) for hosts that
//!   do not bring their own ([`watcher`]).
//!
//! It does **not** decide what happens on a match; see [`crate::reload`].

pub mod path_utils;
pub mod patterns;
pub mod resolve;
pub mod watcher;

pub use patterns::ReloadMatcher;
pub use resolve::{normalize_paths, resolve_root, ResolvedPathSet, WatchPaths};
pub use watcher::{spawn_watcher, WatcherHandle};

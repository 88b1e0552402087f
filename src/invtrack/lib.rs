//! # Invtrack Architecture
//!
//! Invtrack keeps an inventory of **Categories**, **Items** and **Lists**:
//! categories tag items; lists aggregate items and other lists by reference,
//! each with a quantity. It is a library with a small CLI client on top.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs)                                     │
//! │  - Parses arguments, prints JSON, sets the exit code        │
//! │  - The ONLY place that knows about stdout/stderr            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs)                                               │
//! │  - JSON bodies in, Outcome + status out                     │
//! │  - Listing parameters checked by query.rs                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Store (store/)                                             │
//! │  - Owns the aggregate, assigns ids, enforces references     │
//! │  - Backend trait: FsBackend (JSON file), MemBackend (tests) │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//!
//! - Ids are assigned from per-type counters that only move forward, so an
//!   id is never handed out twice, even after a delete.
//! - Every post or patch is checked in full before it touches the
//!   aggregate; a rejected call leaves no trace.
//! - `createdAt <= modifiedAt` everywhere, and `modifiedAt` moves only when
//!   something was actually changed.
//! - Deletes do not cascade; references may dangle afterwards.
//!
//! ## Testing Strategy
//!
//! - Store logic: unit tests next to each entity module over `MemBackend`.
//! - File persistence: `store::fs` tests and `tests/` with `tempfile`.
//! - CLI: `tests/cli.rs` drives the binary with `assert_cmd`.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod query;
pub mod store;
pub mod validation;

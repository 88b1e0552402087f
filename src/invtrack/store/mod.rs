//! # Storage Layer
//!
//! [`Store`] owns the entire inventory state as one in-memory aggregate
//! ([`Data`]): the three entity collections plus their id counters. A
//! [`Backend`] persists that aggregate as a single unit.
//!
//! ## Mutation Pipeline
//!
//! Every `post_*` / `patch_*` / `delete_*` runs the same steps:
//!
//! 1. **Check arguments**: ids passed to the call must be `>= 0`
//!    (`InvalidArgument` otherwise).
//! 2. **Validate input**: names, referenced ids and counts in the payload
//!    (`ValidationError`).
//! 3. **Build a candidate**: a fresh entity (post) or a patched clone of the
//!    stored one (patch). The aggregate is not touched yet.
//! 4. **Revalidate the candidate**: full invariant check. Reference
//!    problems (a List naming itself, a category deleted since the item was
//!    tagged) are validation errors; anything else is an integrity fault
//!    and is logged as such.
//! 5. **Commit**: the candidate enters the aggregate (and the counter moves
//!    on for posts).
//! 6. **Persist**: the whole aggregate is saved.
//!
//! Failures in steps 1-4 leave the aggregate untouched. A failure in step 6
//! is returned to the caller but the committed mutation stays in memory;
//! memory and disk disagree until the next successful save.
//!
//! ## References
//!
//! Items reference Categories and Lists reference Items and Lists by id
//! only. Deleting a referenced entity does not cascade: dangling ids may
//! remain in Items and Lists. Only direct self-reference of a List is
//! rejected; longer cycles (A -> B -> A) are allowed.
//!
//! ## Implementations
//!
//! - [`fs::FsBackend`]: JSON file with atomic replace and an exclusive lock.
//! - [`memory::MemBackend`]: for testing logic without filesystem I/O.

use crate::error::{InvError, Result};
use crate::model::{Data, Entity, Id};
use crate::query::Page;
use chrono::{DateTime, Utc};
use log::{debug, error, info};
use std::fmt::Display;
use std::path::Path;

pub mod backend;
pub mod category;
pub mod fs;
pub mod item;
pub mod list;
pub mod memory;

pub use backend::Backend;
pub use fs::FsBackend;
pub use memory::MemBackend;

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The inventory store. Owns the aggregate and the backend it persists to.
///
/// Mutating operations take `&mut self`; a caller sharing a store across
/// threads must serialize access itself (e.g. `Mutex<Store<_>>`).
pub struct Store<B: Backend> {
    backend: B,
    data: Data,
    clock: Clock,
}

impl Store<FsBackend> {
    /// Open (or create) the store backed by the JSON file at `path`.
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(FsBackend::open(path)?)
    }
}

impl<B: Backend> Store<B> {
    /// Load the persisted aggregate, or start empty and materialize it.
    ///
    /// # Errors
    /// - Persistence errors when stored state exists but cannot be read,
    ///   or when the initial empty state cannot be written.
    /// - [`InvError::Integrity`] when the stored counters would reissue ids.
    pub fn open(backend: B) -> Result<Self> {
        let mut store = Self {
            backend,
            data: Data::default(),
            clock: Box::new(Utc::now),
        };

        let loaded = store.load().inspect_err(|err| {
            error!(
                "event=store_load status=error location={} error={}",
                store.backend.location(),
                err
            );
        })?;

        if loaded {
            check_counters(&store.data)?;
            info!(
                "event=store_open status=loaded location={} categories={} items={} lists={}",
                store.backend.location(),
                store.data.categories.len(),
                store.data.items.len(),
                store.data.lists.len()
            );
        } else {
            store.data = Data::default();
            store.save()?;
            info!(
                "event=store_open status=initialized location={}",
                store.backend.location()
            );
        }

        Ok(store)
    }

    /// Replace the clock used to stamp `createdAt`/`modifiedAt`.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    /// Read the backend into memory.
    /// Returns false (and leaves memory as is) when nothing is stored yet.
    pub fn load(&mut self) -> Result<bool> {
        match self.backend.load()? {
            Some(data) => {
                self.data = data;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Write the whole aggregate to the backend.
    pub fn save(&self) -> Result<()> {
        match self.backend.save(&self.data) {
            Ok(()) => {
                debug!(
                    "event=store_save status=ok location={}",
                    self.backend.location()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save status=error location={} error={}",
                    self.backend.location(),
                    err
                );
                Err(err)
            }
        }
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Timestamp for a modification of something last modified at
    /// `previous`. Never earlier than `previous`, even if the clock steps back.
    pub(crate) fn touch(&self, previous: DateTime<Utc>) -> DateTime<Utc> {
        self.now().max(previous)
    }
}

// --- Shared helpers for the per-entity modules ---

pub(crate) fn find<E: Entity>(entities: &[E], id: Id) -> Option<&E> {
    entities.iter().find(|e| e.id() == id)
}

pub(crate) fn position<E: Entity>(entities: &[E], id: Id) -> Option<usize> {
    entities.iter().position(|e| e.id() == id)
}

pub(crate) fn paginate<'a, E: Entity>(entities: &'a [E], page: &Page) -> Vec<&'a E> {
    entities
        .iter()
        .filter(|e| page.matches(e.name()))
        .skip(page.skip())
        .take(page.limit())
        .collect()
}

/// Wrap a revalidation failure of an already-accepted candidate.
pub(crate) fn integrity(context: &str, err: impl Display) -> InvError {
    error!(
        "event=integrity_violation context=\"{}\" error={}",
        context, err
    );
    InvError::Integrity(format!("{}: {}", context, err))
}

fn check_counters(data: &Data) -> Result<()> {
    fn check<E: Entity>(kind: &str, entities: &[E], next: Id) -> Result<()> {
        match entities.iter().map(Entity::id).max() {
            Some(max) if max >= next => Err(integrity(
                "stored counters",
                format!("next {} id {} is not above existing id {}", kind, next, max),
            )),
            _ => Ok(()),
        }
    }
    check("category", &data.categories, data.next_category_id)?;
    check("item", &data.items, data.next_item_id)?;
    check("list", &data.lists, data.next_list_id)
}

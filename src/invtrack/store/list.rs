use super::{find, integrity, paginate, position, Backend, Store};
use crate::error::{Result, ValidationError};
use crate::model::{Id, ItemRef, ItemRefInput, List, ListInput, ListRef, ListRefInput, Patched};
use crate::query::Page;
use crate::validation::{argument_id, non_empty_string, valid_count, valid_id, valid_timestamps};
use chrono::{DateTime, Utc};
use log::info;

impl<B: Backend> Store<B> {
    /// All lists, in insertion order.
    pub fn lists(&self) -> &[List] {
        &self.data.lists
    }

    pub fn query_lists(&self, page: &Page) -> Vec<&List> {
        paginate(&self.data.lists, page)
    }

    pub fn get_list(&self, id: i64) -> Result<Option<&List>> {
        let id = argument_id(id)?;
        Ok(find(&self.data.lists, id))
    }

    pub fn post_list(&mut self, input: ListInput) -> Result<List> {
        let name = non_empty_string(input.name.as_deref(), "name")?.to_string();
        let now = self.now();
        let item_refs = match input.item_refs.as_deref() {
            Some(refs) => self.resolve_item_refs(refs, &[], now)?,
            None => Vec::new(),
        };
        let list_refs = match input.list_refs.as_deref() {
            Some(refs) => self.resolve_list_refs(refs, &[], now)?,
            None => Vec::new(),
        };

        let list = List {
            id: self.data.next_list_id,
            name,
            item_refs,
            list_refs,
            created_at: now,
            modified_at: now,
        };
        self.verify_list(&list, "new list")?;

        self.data.next_list_id += 1;
        self.data.lists.push(list.clone());
        info!(
            "event=list_created id={} name={:?} item_refs={} list_refs={}",
            list.id,
            list.name,
            list.item_refs.len(),
            list.list_refs.len()
        );
        self.save()?;
        Ok(list)
    }

    /// Apply the supplied fields of `patch` to the list `id`.
    ///
    /// A supplied ref sequence replaces the stored one and counts as a
    /// modification whether or not its content differs. Refs that target
    /// the same id as a previous ref keep that ref's `createdAt`.
    pub fn patch_list(&mut self, id: i64, patch: ListInput) -> Result<Option<Patched<List>>> {
        let id = argument_id(id)?;
        let Some(index) = position(&self.data.lists, id) else {
            return Ok(None);
        };
        let existing = &self.data.lists[index];
        if patch.name.is_none() && patch.item_refs.is_none() && patch.list_refs.is_none() {
            return Ok(Some(Patched::Unchanged(existing.clone())));
        }

        let now = self.touch(existing.modified_at);
        let mut updated = existing.clone();
        if let Some(name) = patch.name.as_deref() {
            updated.name = non_empty_string(Some(name), "name")?.to_string();
        }
        if let Some(refs) = patch.item_refs.as_deref() {
            updated.item_refs = self.resolve_item_refs(refs, &existing.item_refs, now)?;
        }
        if let Some(refs) = patch.list_refs.as_deref() {
            updated.list_refs = self.resolve_list_refs(refs, &existing.list_refs, now)?;
        }
        updated.modified_at = now;
        self.verify_list(&updated, &format!("update list with id {}", id))?;

        self.data.lists[index] = updated.clone();
        info!("event=list_updated id={}", id);
        self.save()?;
        Ok(Some(Patched::Modified(updated)))
    }

    /// Remove the list `id`. Other lists referencing it keep the dangling ref.
    pub fn delete_list(&mut self, id: i64) -> Result<bool> {
        let id = argument_id(id)?;
        let Some(index) = position(&self.data.lists, id) else {
            return Ok(false);
        };
        self.data.lists.remove(index);
        info!("event=list_deleted id={}", id);
        self.save()?;
        Ok(true)
    }

    fn resolve_item_refs(
        &self,
        refs: &[ItemRefInput],
        previous: &[ItemRef],
        now: DateTime<Utc>,
    ) -> std::result::Result<Vec<ItemRef>, ValidationError> {
        let mut stamper = Stamper::new(
            previous
                .iter()
                .map(|r| (r.item_id, r.count, r.created_at, r.modified_at)),
            now,
        );
        refs.iter()
            .enumerate()
            .map(|(i, input)| {
                let field = format!("itemRefs[{}]", i);
                let item_id = valid_id(input.item_id, &field)?;
                let count = valid_count(input.count, &field)?;
                if find(&self.data.items, item_id).is_none() {
                    return Err(ValidationError::UnknownItem {
                        field,
                        id: input.item_id,
                    });
                }
                let (created_at, modified_at) = stamper.stamp(item_id, count);
                Ok(ItemRef {
                    item_id,
                    count,
                    created_at,
                    modified_at,
                })
            })
            .collect()
    }

    fn resolve_list_refs(
        &self,
        refs: &[ListRefInput],
        previous: &[ListRef],
        now: DateTime<Utc>,
    ) -> std::result::Result<Vec<ListRef>, ValidationError> {
        let mut stamper = Stamper::new(
            previous
                .iter()
                .map(|r| (r.list_id, r.count, r.created_at, r.modified_at)),
            now,
        );
        refs.iter()
            .enumerate()
            .map(|(i, input)| {
                let field = format!("listRefs[{}]", i);
                let list_id = valid_id(input.list_id, &field)?;
                let count = valid_count(input.count, &field)?;
                if find(&self.data.lists, list_id).is_none() {
                    return Err(ValidationError::UnknownList {
                        field,
                        id: input.list_id,
                    });
                }
                let (created_at, modified_at) = stamper.stamp(list_id, count);
                Ok(ListRef {
                    list_id,
                    count,
                    created_at,
                    modified_at,
                })
            })
            .collect()
    }

    /// Full check of a candidate before commit.
    ///
    /// Reference problems (unknown targets, the list naming itself) are
    /// validation errors. Anything else means the store built a bad entity.
    fn verify_list(&self, list: &List, context: &str) -> Result<()> {
        for (i, r) in list.item_refs.iter().enumerate() {
            if find(&self.data.items, r.item_id).is_none() {
                return Err(ValidationError::UnknownItem {
                    field: format!("itemRefs[{}]", i),
                    id: r.item_id as i64,
                }
                .into());
            }
        }
        for (i, r) in list.list_refs.iter().enumerate() {
            if r.list_id == list.id {
                return Err(ValidationError::SelfReference(list.id).into());
            }
            if find(&self.data.lists, r.list_id).is_none() {
                return Err(ValidationError::UnknownList {
                    field: format!("listRefs[{}]", i),
                    id: r.list_id as i64,
                }
                .into());
            }
        }
        verify_list_shape(list).map_err(|e| integrity(context, e))
    }
}

fn verify_list_shape(list: &List) -> std::result::Result<(), ValidationError> {
    non_empty_string(Some(&list.name), "name")?;
    for (i, r) in list.item_refs.iter().enumerate() {
        let field = format!("itemRefs[{}]", i);
        valid_count(r.count as i64, &field)?;
        valid_timestamps(r.created_at, r.modified_at, &field)?;
    }
    for (i, r) in list.list_refs.iter().enumerate() {
        let field = format!("listRefs[{}]", i);
        valid_count(r.count as i64, &field)?;
        valid_timestamps(r.created_at, r.modified_at, &field)?;
    }
    valid_timestamps(list.created_at, list.modified_at, "list")
}

/// Hands out ref timestamps, reusing those of matching previous refs.
///
/// Each previous ref matches at most one new ref (first come, first served),
/// so duplicate targets pair up in order.
struct Stamper {
    previous: Vec<(Id, u64, DateTime<Utc>, DateTime<Utc>)>,
    used: Vec<bool>,
    now: DateTime<Utc>,
}

impl Stamper {
    fn new(
        previous: impl Iterator<Item = (Id, u64, DateTime<Utc>, DateTime<Utc>)>,
        now: DateTime<Utc>,
    ) -> Self {
        let previous: Vec<_> = previous.collect();
        let used = vec![false; previous.len()];
        Self {
            previous,
            used,
            now,
        }
    }

    fn stamp(&mut self, target: Id, count: u64) -> (DateTime<Utc>, DateTime<Utc>) {
        let matched = (0..self.previous.len()).find(|&i| !self.used[i] && self.previous[i].0 == target);
        match matched {
            Some(i) => {
                self.used[i] = true;
                let (_, old_count, created_at, modified_at) = self.previous[i];
                if old_count == count {
                    (created_at, modified_at)
                } else {
                    (created_at, self.now.max(modified_at))
                }
            }
            None => (self.now, self.now),
        }
    }
}

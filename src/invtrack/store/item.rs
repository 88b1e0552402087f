use super::{find, integrity, paginate, position, Backend, Store};
use crate::error::{Result, ValidationError};
use crate::model::{Id, Item, ItemInput, Patched};
use crate::query::Page;
use crate::validation::{argument_id, non_empty_string, valid_id, valid_timestamps};
use log::info;

impl<B: Backend> Store<B> {
    /// All items, in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.data.items
    }

    pub fn query_items(&self, page: &Page) -> Vec<&Item> {
        paginate(&self.data.items, page)
    }

    pub fn get_item(&self, id: i64) -> Result<Option<&Item>> {
        let id = argument_id(id)?;
        Ok(find(&self.data.items, id))
    }

    pub fn post_item(&mut self, input: ItemInput) -> Result<Item> {
        let name = non_empty_string(input.name.as_deref(), "name")?.to_string();
        let category_ids = match input.category_ids.as_deref() {
            Some(ids) => self.resolve_category_ids(ids)?,
            None => Vec::new(),
        };

        let now = self.now();
        let item = Item {
            id: self.data.next_item_id,
            name,
            category_ids,
            created_at: now,
            modified_at: now,
        };
        self.verify_item(&item, "new item")?;

        self.data.next_item_id += 1;
        self.data.items.push(item.clone());
        info!(
            "event=item_created id={} name={:?} categories={}",
            item.id,
            item.name,
            item.category_ids.len()
        );
        self.save()?;
        Ok(item)
    }

    /// Apply the supplied fields of `patch` to the item `id`.
    ///
    /// A supplied `categoryIds` counts as a modification even when it equals
    /// the stored sequence.
    pub fn patch_item(&mut self, id: i64, patch: ItemInput) -> Result<Option<Patched<Item>>> {
        let id = argument_id(id)?;
        let Some(index) = position(&self.data.items, id) else {
            return Ok(None);
        };

        let name = match patch.name.as_deref() {
            Some(name) => Some(non_empty_string(Some(name), "name")?.to_string()),
            None => None,
        };
        let category_ids = match patch.category_ids.as_deref() {
            Some(ids) => Some(self.resolve_category_ids(ids)?),
            None => None,
        };

        let existing = &self.data.items[index];
        if name.is_none() && category_ids.is_none() {
            return Ok(Some(Patched::Unchanged(existing.clone())));
        }

        let mut updated = existing.clone();
        if let Some(name) = name {
            updated.name = name;
        }
        if let Some(category_ids) = category_ids {
            updated.category_ids = category_ids;
        }
        updated.modified_at = self.touch(existing.modified_at);
        self.verify_item(&updated, &format!("update item with id {}", id))?;

        self.data.items[index] = updated.clone();
        info!("event=item_updated id={}", id);
        self.save()?;
        Ok(Some(Patched::Modified(updated)))
    }

    /// Remove the item `id`. Lists still referencing it keep the dangling ref.
    pub fn delete_item(&mut self, id: i64) -> Result<bool> {
        let id = argument_id(id)?;
        let Some(index) = position(&self.data.items, id) else {
            return Ok(false);
        };
        self.data.items.remove(index);
        info!("event=item_deleted id={}", id);
        self.save()?;
        Ok(true)
    }

    /// Check every raw category id is non-negative and names an existing
    /// category. Duplicates are kept.
    fn resolve_category_ids(
        &self,
        ids: &[i64],
    ) -> std::result::Result<Vec<Id>, ValidationError> {
        ids.iter()
            .enumerate()
            .map(|(i, &raw)| {
                let id = valid_id(raw, &format!("categoryIds[{}]", i))?;
                match find(&self.data.categories, id) {
                    Some(_) => Ok(id),
                    None => Err(ValidationError::UnknownCategory(raw)),
                }
            })
            .collect()
    }

    /// Full check of a candidate before commit. A category deleted since
    /// the item was tagged surfaces here as a validation error the caller can
    /// fix by supplying new `categoryIds`.
    fn verify_item(&self, item: &Item, context: &str) -> Result<()> {
        for &category_id in &item.category_ids {
            if find(&self.data.categories, category_id).is_none() {
                return Err(ValidationError::UnknownCategory(category_id as i64).into());
            }
        }
        non_empty_string(Some(&item.name), "name")
            .and_then(|_| valid_timestamps(item.created_at, item.modified_at, "item"))
            .map_err(|e| integrity(context, e))
    }
}

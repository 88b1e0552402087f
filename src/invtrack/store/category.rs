use super::{find, integrity, paginate, position, Backend, Store};
use crate::error::{Result, ValidationError};
use crate::model::{Category, CategoryInput, Patched};
use crate::query::Page;
use crate::validation::{argument_id, non_empty_string, valid_timestamps};
use log::info;

impl<B: Backend> Store<B> {
    /// All categories, in insertion order.
    pub fn categories(&self) -> &[Category] {
        &self.data.categories
    }

    /// Categories whose name matches the page filter, paginated.
    pub fn query_categories(&self, page: &Page) -> Vec<&Category> {
        paginate(&self.data.categories, page)
    }

    pub fn get_category(&self, id: i64) -> Result<Option<&Category>> {
        let id = argument_id(id)?;
        Ok(find(&self.data.categories, id))
    }

    pub fn post_category(&mut self, input: CategoryInput) -> Result<Category> {
        let name = non_empty_string(input.name.as_deref(), "name")?.to_string();

        let now = self.now();
        let category = Category {
            id: self.data.next_category_id,
            name,
            created_at: now,
            modified_at: now,
        };
        verify_category(&category).map_err(|e| integrity("new category", e))?;

        self.data.next_category_id += 1;
        self.data.categories.push(category.clone());
        info!(
            "event=category_created id={} name={:?}",
            category.id, category.name
        );
        self.save()?;
        Ok(category)
    }

    /// Apply the supplied fields of `patch` to the category `id`.
    ///
    /// Returns `Ok(None)` when no category has that id. A patch that supplies
    /// no field returns [`Patched::Unchanged`] without touching `modifiedAt`.
    pub fn patch_category(
        &mut self,
        id: i64,
        patch: CategoryInput,
    ) -> Result<Option<Patched<Category>>> {
        let id = argument_id(id)?;
        let Some(index) = position(&self.data.categories, id) else {
            return Ok(None);
        };
        let existing = &self.data.categories[index];

        let Some(name) = patch.name.as_deref() else {
            return Ok(Some(Patched::Unchanged(existing.clone())));
        };
        let name = non_empty_string(Some(name), "name")?.to_string();

        let mut updated = existing.clone();
        updated.name = name;
        updated.modified_at = self.touch(existing.modified_at);
        verify_category(&updated)
            .map_err(|e| integrity(&format!("update category with id {}", id), e))?;

        self.data.categories[index] = updated.clone();
        info!("event=category_updated id={}", id);
        self.save()?;
        Ok(Some(Patched::Modified(updated)))
    }

    /// Remove the category `id`. Items still listing it keep the dangling id.
    pub fn delete_category(&mut self, id: i64) -> Result<bool> {
        let id = argument_id(id)?;
        let Some(index) = position(&self.data.categories, id) else {
            return Ok(false);
        };
        self.data.categories.remove(index);
        info!("event=category_deleted id={}", id);
        self.save()?;
        Ok(true)
    }
}

fn verify_category(category: &Category) -> std::result::Result<(), ValidationError> {
    non_empty_string(Some(&category.name), "name")?;
    valid_timestamps(category.created_at, category.modified_at, "category")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvError;
    use crate::model::ItemInput;
    use crate::store::test_support::ticking_store;

    #[test]
    fn creates_category_with_first_id() {
        let mut store = ticking_store();
        let category = store.post_category(CategoryInput::named("Books")).unwrap();

        assert_eq!(category.id, 0);
        assert_eq!(category.name, "Books");
        assert_eq!(category.created_at, category.modified_at);
        assert_eq!(store.categories(), &[category]);
    }

    #[test]
    fn rejects_missing_or_empty_name() {
        let mut store = ticking_store();
        let err = store.post_category(CategoryInput::default()).unwrap_err();
        assert!(matches!(
            err,
            InvError::Validation(ValidationError::Missing { .. })
        ));

        let err = store.post_category(CategoryInput::named("")).unwrap_err();
        assert!(matches!(
            err,
            InvError::Validation(ValidationError::EmptyString { .. })
        ));
        assert!(store.categories().is_empty());
        // Rejected posts do not consume ids.
        assert_eq!(store.data().next_category_id, 0);
    }

    #[test]
    fn ids_are_never_reused_after_delete() {
        let mut store = ticking_store();
        let first = store.post_category(CategoryInput::named("A")).unwrap();
        assert!(store.delete_category(first.id as i64).unwrap());
        let second = store.post_category(CategoryInput::named("B")).unwrap();
        assert_eq!(second.id, 1);
    }

    #[test]
    fn patch_updates_name_and_advances_modified_at() {
        let mut store = ticking_store();
        let category = store.post_category(CategoryInput::named("Old")).unwrap();

        let patched = store
            .patch_category(0, CategoryInput::named("New"))
            .unwrap()
            .unwrap();
        assert!(patched.is_modified());
        let updated = patched.into_inner();
        assert_eq!(updated.name, "New");
        assert_eq!(updated.created_at, category.created_at);
        assert!(updated.modified_at > category.modified_at);
        assert_eq!(store.get_category(0).unwrap(), Some(&updated));
    }

    #[test]
    fn empty_patch_returns_existing_unchanged() {
        let mut store = ticking_store();
        let category = store.post_category(CategoryInput::named("Books")).unwrap();
        let writes = store.backend().write_count();

        let patched = store
            .patch_category(0, CategoryInput::default())
            .unwrap()
            .unwrap();
        assert_eq!(patched, Patched::Unchanged(category));
        assert_eq!(store.backend().write_count(), writes);
    }

    #[test]
    fn patch_with_explicit_empty_name_is_rejected() {
        let mut store = ticking_store();
        let category = store.post_category(CategoryInput::named("Books")).unwrap();

        let err = store
            .patch_category(0, CategoryInput::named(""))
            .unwrap_err();
        assert!(matches!(err, InvError::Validation(_)));
        assert_eq!(store.get_category(0).unwrap(), Some(&category));
    }

    #[test]
    fn patch_of_absent_category_is_none() {
        let mut store = ticking_store();
        let result = store
            .patch_category(999, CategoryInput::named("Hello"))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn negative_ids_are_invalid_arguments() {
        let mut store = ticking_store();
        assert!(matches!(
            store.get_category(-1),
            Err(InvError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.patch_category(-1, CategoryInput::named("x")),
            Err(InvError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.delete_category(-1),
            Err(InvError::InvalidArgument(_))
        ));
    }

    #[test]
    fn deleting_absent_category_does_not_write() {
        let mut store = ticking_store();
        store.post_category(CategoryInput::named("Books")).unwrap();
        let writes = store.backend().write_count();

        assert!(!store.delete_category(42).unwrap());
        assert_eq!(store.backend().write_count(), writes);
        assert_eq!(store.categories().len(), 1);
    }

    #[test]
    fn delete_leaves_dangling_item_references() {
        let mut store = ticking_store();
        store.post_category(CategoryInput::named("Produce")).unwrap();
        let item = store
            .post_item(ItemInput::named("Apple").with_categories(vec![0]))
            .unwrap();

        assert!(store.delete_category(0).unwrap());
        assert_eq!(
            store.get_item(item.id as i64).unwrap().unwrap().category_ids,
            vec![0]
        );
    }
}

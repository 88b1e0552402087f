//! # API Facade
//!
//! A thin layer over [`Store`] for callers that speak in JSON bodies and
//! status codes (a REST handler, the CLI). It:
//!
//! - **Decodes** request bodies into the typed input payloads
//! - **Dispatches** to the per-entity store operation for a [`Resource`]
//! - **Maps** results to an [`Outcome`] carrying the status to answer with
//!
//! It holds no business logic of its own: every rule lives in the store.
//! Errors stay [`InvError`]s; [`InvError::status`] gives their status code.

use crate::error::{InvError, Result, ValidationError};
use crate::model::Patched;
use crate::query::{ListQuery, Page};
use crate::store::{Backend, Store};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Category,
    Item,
    List,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Category => "category",
            Resource::Item => "item",
            Resource::List => "list",
        };
        f.write_str(name)
    }
}

/// Result of a successful facade call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Listed(Value),
    Found(Value),
    Created(Value),
    Updated(Value),
    /// Patch that supplied nothing; carries the entity as stored.
    NotModified(Value),
    Deleted,
    NotFound,
}

impl Outcome {
    pub fn status(&self) -> u16 {
        match self {
            Outcome::Listed(_) | Outcome::Found(_) | Outcome::Updated(_) => 200,
            Outcome::Created(_) => 201,
            Outcome::Deleted => 204,
            Outcome::NotModified(_) => 304,
            Outcome::NotFound => 404,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            Outcome::Listed(v)
            | Outcome::Found(v)
            | Outcome::Created(v)
            | Outcome::Updated(v)
            | Outcome::NotModified(v) => Some(v),
            Outcome::Deleted | Outcome::NotFound => None,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::NotFound)
    }
}

pub struct InventoryApi<B: Backend> {
    store: Store<B>,
}

impl<B: Backend> InventoryApi<B> {
    pub fn new(store: Store<B>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store<B> {
        &self.store
    }

    pub fn into_store(self) -> Store<B> {
        self.store
    }

    pub fn list(&self, resource: Resource, query: &ListQuery) -> Result<Outcome> {
        let page = Page::from_query(query)?;
        let body = match resource {
            Resource::Category => to_value(&self.store.query_categories(&page))?,
            Resource::Item => to_value(&self.store.query_items(&page))?,
            Resource::List => to_value(&self.store.query_lists(&page))?,
        };
        Ok(Outcome::Listed(body))
    }

    pub fn get(&self, resource: Resource, id: i64) -> Result<Outcome> {
        let found = match resource {
            Resource::Category => self.store.get_category(id)?.map(to_value),
            Resource::Item => self.store.get_item(id)?.map(to_value),
            Resource::List => self.store.get_list(id)?.map(to_value),
        };
        match found {
            Some(body) => Ok(Outcome::Found(body?)),
            None => Ok(Outcome::NotFound),
        }
    }

    pub fn post(&mut self, resource: Resource, body: Value) -> Result<Outcome> {
        let created = match resource {
            Resource::Category => to_value(&self.store.post_category(decode(body)?)?)?,
            Resource::Item => to_value(&self.store.post_item(decode(body)?)?)?,
            Resource::List => to_value(&self.store.post_list(decode(body)?)?)?,
        };
        Ok(Outcome::Created(created))
    }

    pub fn patch(&mut self, resource: Resource, id: i64, body: Value) -> Result<Outcome> {
        match resource {
            Resource::Category => patched(self.store.patch_category(id, decode(body)?)?),
            Resource::Item => patched(self.store.patch_item(id, decode(body)?)?),
            Resource::List => patched(self.store.patch_list(id, decode(body)?)?),
        }
    }

    pub fn delete(&mut self, resource: Resource, id: i64) -> Result<Outcome> {
        let deleted = match resource {
            Resource::Category => self.store.delete_category(id)?,
            Resource::Item => self.store.delete_item(id)?,
            Resource::List => self.store.delete_list(id)?,
        };
        Ok(if deleted {
            Outcome::Deleted
        } else {
            Outcome::NotFound
        })
    }
}

fn to_value<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Request body to input payload. Only JSON objects are accepted; a field
/// of the wrong type is a validation failure.
fn decode<T: DeserializeOwned>(body: Value) -> Result<T> {
    if !body.is_object() {
        return Err(InvError::InvalidArgument(
            "request body must be a JSON object".to_string(),
        ));
    }
    serde_json::from_value(body).map_err(|e| ValidationError::Malformed(e.to_string()).into())
}

fn patched<T: Serialize>(result: Option<Patched<T>>) -> Result<Outcome> {
    Ok(match result {
        None => Outcome::NotFound,
        Some(Patched::Unchanged(entity)) => Outcome::NotModified(to_value(&entity)?),
        Some(Patched::Modified(entity)) => Outcome::Updated(to_value(&entity)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemBackend;
    use serde_json::json;

    fn api() -> InventoryApi<MemBackend> {
        InventoryApi::new(Store::open(MemBackend::new()).unwrap())
    }

    #[test]
    fn category_lifecycle_statuses() {
        let mut api = api();

        let created = api
            .post(Resource::Category, json!({ "name": "Books" }))
            .unwrap();
        assert_eq!(created.status(), 201);
        assert_eq!(created.body().unwrap()["id"], 0);
        assert_eq!(created.body().unwrap()["name"], "Books");

        let updated = api
            .patch(Resource::Category, 0, json!({ "name": "New" }))
            .unwrap();
        assert_eq!(updated.status(), 200);
        assert_eq!(updated.body().unwrap()["name"], "New");

        let unchanged = api.patch(Resource::Category, 0, json!({})).unwrap();
        assert_eq!(unchanged.status(), 304);
        assert_eq!(unchanged.body(), updated.body());

        assert_eq!(api.get(Resource::Category, 0).unwrap().status(), 200);
        assert_eq!(api.delete(Resource::Category, 0).unwrap().status(), 204);
        assert_eq!(api.delete(Resource::Category, 0).unwrap().status(), 404);
        assert_eq!(api.get(Resource::Category, 0).unwrap().status(), 404);
        assert_eq!(
            api.patch(Resource::Category, 0, json!({ "name": "x" }))
                .unwrap()
                .status(),
            404
        );
    }

    #[test]
    fn body_must_be_an_object() {
        let mut api = api();
        let err = api.post(Resource::Category, json!(["Books"])).unwrap_err();
        assert!(matches!(err, InvError::InvalidArgument(_)));
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn wrongly_typed_field_is_a_validation_error() {
        let mut api = api();
        let err = api.post(Resource::Category, json!({ "name": 5 })).unwrap_err();
        assert!(matches!(
            err,
            InvError::Validation(ValidationError::Malformed(_))
        ));
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn null_fields_are_treated_as_absent() {
        let mut api = api();
        api.post(Resource::Category, json!({ "name": "Books" }))
            .unwrap();
        let outcome = api
            .patch(Resource::Category, 0, json!({ "name": null }))
            .unwrap();
        assert_eq!(outcome.status(), 304);
    }

    #[test]
    fn item_and_list_bodies_use_camel_case() {
        let mut api = api();
        api.post(Resource::Category, json!({ "name": "Produce" }))
            .unwrap();
        let item = api
            .post(Resource::Item, json!({ "name": "Apple", "categoryIds": [0] }))
            .unwrap();
        assert_eq!(item.body().unwrap()["categoryIds"], json!([0]));

        let list = api
            .post(
                Resource::List,
                json!({ "name": "Groceries", "itemRefs": [{ "itemId": 0, "count": 4 }] }),
            )
            .unwrap();
        let body = list.body().unwrap();
        assert_eq!(body["itemRefs"][0]["itemId"], 0);
        assert_eq!(body["itemRefs"][0]["count"], 4);
        assert!(body["itemRefs"][0]["createdAt"].is_string());
        assert_eq!(body["listRefs"], json!([]));
    }

    #[test]
    fn list_applies_query() {
        let mut api = api();
        for name in ["Books", "Boots", "Bread"] {
            api.post(Resource::Category, json!({ "name": name }))
                .unwrap();
        }
        let query = ListQuery {
            name: Some("BOO".to_string()),
            ..ListQuery::default()
        };
        let listed = api.list(Resource::Category, &query).unwrap();
        assert_eq!(listed.status(), 200);
        assert_eq!(listed.body().unwrap().as_array().unwrap().len(), 2);

        let bad = ListQuery {
            limit: Some(0),
            ..ListQuery::default()
        };
        assert!(matches!(
            api.list(Resource::Category, &bad),
            Err(InvError::InvalidArgument(_))
        ));
    }

    #[test]
    fn negative_id_is_invalid_argument() {
        let api = api();
        let err = api.get(Resource::Item, -1).unwrap_err();
        assert_eq!(err.status(), 400);
    }
}

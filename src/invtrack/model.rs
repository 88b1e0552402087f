//! # Data Model
//!
//! Stored entities ([`Category`], [`Item`], [`List`] and the refs a List
//! carries), the persisted aggregate [`Data`], and the partial payloads
//! callers hand to `post`/`patch`.
//!
//! Stored ids are unsigned. Payload ids and counts are signed on purpose:
//! they come from outside (JSON bodies, CLI arguments) and a negative value
//! must reach validation as a value, not be lost to a parse error.
//!
//! Field names serialize in camelCase so the persisted file keeps the
//! `{ categories, nextCategoryId, ... }` layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type Id = u64;

/// Shared shape of the three top-level entity types.
pub trait Entity {
    fn id(&self) -> Id;
    fn name(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
    fn modified_at(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Id,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Id,
    pub name: String,
    pub category_ids: Vec<Id>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRef {
    pub item_id: Id,
    pub count: u64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRef {
    pub list_id: Id,
    pub count: u64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: Id,
    pub name: String,
    pub item_refs: Vec<ItemRef>,
    pub list_refs: Vec<ListRef>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

macro_rules! impl_entity {
    ($($ty:ty),*) => {
        $(
            impl Entity for $ty {
                fn id(&self) -> Id {
                    self.id
                }
                fn name(&self) -> &str {
                    &self.name
                }
                fn created_at(&self) -> DateTime<Utc> {
                    self.created_at
                }
                fn modified_at(&self) -> DateTime<Utc> {
                    self.modified_at
                }
            }
        )*
    };
}

impl_entity!(Category, Item, List);

/// The whole store state. This is the unit of persistence: it is written
/// and read as one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Data {
    pub categories: Vec<Category>,
    pub next_category_id: Id,
    pub items: Vec<Item>,
    pub next_item_id: Id,
    pub lists: Vec<List>,
    pub next_list_id: Id,
}

// --- Payloads ---

/// Body of a category post or patch. For a patch, `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CategoryInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<Vec<i64>>,
}

impl ItemInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_categories(mut self, ids: Vec<i64>) -> Self {
        self.category_ids = Some(ids);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRefInput {
    pub item_id: i64,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRefInput {
    pub list_id: i64,
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_refs: Option<Vec<ItemRefInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_refs: Option<Vec<ListRefInput>>,
}

impl ListInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_item_refs(mut self, refs: Vec<ItemRefInput>) -> Self {
        self.item_refs = Some(refs);
        self
    }

    pub fn with_list_refs(mut self, refs: Vec<ListRefInput>) -> Self {
        self.list_refs = Some(refs);
        self
    }
}

/// Result of a patch on an existing entity.
///
/// `Unchanged` is returned when the patch supplied no field at all; the
/// entity is then exactly what was stored before the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patched<T> {
    Unchanged(T),
    Modified(T),
}

impl<T> Patched<T> {
    pub fn is_modified(&self) -> bool {
        matches!(self, Patched::Modified(_))
    }

    pub fn get(&self) -> &T {
        match self {
            Patched::Unchanged(value) | Patched::Modified(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Patched::Unchanged(value) | Patched::Modified(value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_serializes_with_camel_case_layout() {
        let json = serde_json::to_value(Data::default()).unwrap();
        let obj = json.as_object().unwrap();
        for key in [
            "categories",
            "nextCategoryId",
            "items",
            "nextItemId",
            "lists",
            "nextListId",
        ] {
            assert!(obj.contains_key(key), "missing key {}", key);
        }
    }

    #[test]
    fn timestamps_survive_a_json_trip() {
        let now = Utc::now();
        let category = Category {
            id: 3,
            name: "Books".to_string(),
            created_at: now,
            modified_at: now,
        };
        let json = serde_json::to_string(&category).unwrap();
        assert!(json.contains("\"createdAt\""));
        let loaded: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, category);
    }

    #[test]
    fn absent_and_null_fields_are_not_supplied() {
        let input: ItemInput = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert_eq!(input, ItemInput::default());

        let input: ListInput =
            serde_json::from_str(r#"{"itemRefs": [{"itemId": 2, "count": 3}]}"#).unwrap();
        assert_eq!(input.name, None);
        assert_eq!(
            input.item_refs,
            Some(vec![ItemRefInput {
                item_id: 2,
                count: 3
            }])
        );
        assert_eq!(input.list_refs, None);
    }

    #[test]
    fn patched_exposes_inner_value() {
        let patched = Patched::Modified(5);
        assert!(patched.is_modified());
        assert_eq!(*patched.get(), 5);
        assert_eq!(Patched::Unchanged(1).into_inner(), 1);
    }
}

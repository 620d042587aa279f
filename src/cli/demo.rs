//! In-memory items service used by the CLI to exercise a mux end to end.

use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{CodedError, Error};
use crate::mux::Routable;
use crate::route::{Json, Route, Routes};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Request body for creating or replacing an item.
#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Default)]
struct Inventory {
    next_id: u64,
    items: BTreeMap<u64, Item>,
}

/// A shared, thread-safe item store exposing REST routes.
#[derive(Debug, Clone, Default)]
pub struct ItemService {
    inventory: Arc<Mutex<Inventory>>,
}

impl ItemService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with a couple of items.
    #[must_use]
    pub fn seeded() -> Self {
        let mut inventory = Inventory::default();
        for name in ["widget", "gadget"] {
            inventory.next_id += 1;
            let id = inventory.next_id;
            inventory.items.insert(
                id,
                Item {
                    id,
                    name: name.to_string(),
                    tags: Vec::new(),
                },
            );
        }
        Self {
            inventory: Arc::new(Mutex::new(inventory)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inventory>, anyhow::Error> {
        self.inventory
            .lock()
            .map_err(|_| anyhow::anyhow!("item store lock poisoned"))
    }

    pub fn list(&self) -> Result<Vec<Item>, anyhow::Error> {
        Ok(self.lock()?.items.values().cloned().collect())
    }

    pub fn get(&self, id: u64) -> Result<Item, anyhow::Error> {
        self.lock()?
            .items
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    pub fn create(&self, new: NewItem) -> Result<Item, anyhow::Error> {
        let mut inventory = self.lock()?;
        inventory.next_id += 1;
        let item = Item {
            id: inventory.next_id,
            name: new.name,
            tags: new.tags,
        };
        inventory.items.insert(item.id, item.clone());
        Ok(item)
    }

    pub fn replace(&self, id: u64, new: NewItem) -> Result<Item, anyhow::Error> {
        let mut inventory = self.lock()?;
        let item = inventory.items.get_mut(&id).ok_or_else(|| not_found(id))?;
        item.name = new.name;
        item.tags = new.tags;
        Ok(item.clone())
    }

    pub fn delete(&self, id: u64) -> Result<(), anyhow::Error> {
        self.lock()?
            .items
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: u64) -> anyhow::Error {
    CodedError::new(StatusCode::NOT_FOUND, anyhow::anyhow!("item {id} not found")).into()
}

impl Routable for ItemService {
    fn rest_routes(&self) -> Result<Routes, Error> {
        let list = self.clone();
        let get = self.clone();
        let create = self.clone();
        let replace = self.clone();
        let delete = self.clone();
        let search = self.clone();

        Ok(vec![
            Route::new("/items", Method::GET, move || list.list())?,
            Route::new("/items/:id", Method::GET, move |id: u64| get.get(id))?,
            Route::new("/items", Method::POST, move |new: NewItem| create.create(new))?,
            Route::new("/items/:id", Method::PUT, move |id: u64, new: NewItem| {
                replace.replace(id, new)
            })?,
            Route::new("/items/:id", Method::DELETE, move |id: u64| delete.delete(id))?,
            Route::new("/items/by-name/:name", Method::GET, move |name: String| {
                let found = search
                    .list()
                    .map(|items| items.into_iter().find(|item| item.name == name));
                match found {
                    Ok(item) => (item, None),
                    Err(e) => (None, Some(e)),
                }
            })?,
            Route::new("/ping", Method::GET, || Json("pong"))?,
        ])
    }
}

use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct StoreName(String);

crate::impl_string_newtype!(StoreName);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct Description(String);

crate::impl_string_newtype!(Description);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct FileName(String);

crate::impl_string_newtype!(FileName);

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

impl Coordinates {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: ItemId,
    pub name: StoreName,
    pub description: Description,
    pub filename: Option<FileName>,
    pub coordinates: Option<Coordinates>,
    /// Weekday to opening range, e.g. `"Mon" -> "11:00-21:00"`.
    pub hours: BTreeMap<String, String>,
}

impl Item {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: ItemId::random(),
            name: StoreName::new(name),
            description: Description::new(description),
            filename: None,
            coordinates: None,
            hours: BTreeMap::new(),
        }
    }
}

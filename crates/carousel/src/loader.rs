use crate::item::{Coordinates, Description, FileName, Item, ItemId, StoreName};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Resource '{name}' not found in bundle {root}")]
    MissingResource { name: String, root: PathBuf },
    #[error("Failed to decode '{name}': {source}")]
    Decode {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parses `name,description` lines. Blank and single-field lines are dropped.
pub fn parse_csv(content: &str) -> Vec<Item> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let fields = split_csv_line(line);
            match fields.as_slice() {
                [name, description, ..] => Some(Item::new(name.trim(), description.trim())),
                _ => {
                    log::debug!("Dropping CSV line with fewer than two fields: {:?}", line);
                    None
                }
            }
        })
        .collect()
}

// Every quote toggles quoting and is dropped.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[derive(Debug, Deserialize)]
struct StoreRecord {
    stores: String,
    description: String,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    hours: BTreeMap<String, String>,
}

impl From<StoreRecord> for Item {
    fn from(record: StoreRecord) -> Self {
        Self {
            id: ItemId::random(),
            name: StoreName::new(record.stores),
            description: Description::new(record.description),
            filename: record.filename.map(FileName::new),
            coordinates: record.x.zip(record.y).map(|(x, y)| Coordinates::new(x, y)),
            hours: record.hours,
        }
    }
}

/// Decodes a JSON array of store records. One bad record fails the lot.
pub fn parse_json(content: &str) -> Result<Vec<Item>, serde_json::Error> {
    let records: Vec<StoreRecord> = serde_json::from_str(content)?;
    Ok(records.into_iter().map(Item::from).collect())
}

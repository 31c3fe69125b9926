use crate::item::Item;
use crate::loader::{self, LoadError};
use crate::source::{DataFormat, DataSource};
use fs_err as fs;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const BUNDLE_DIR: &str = "whatoeat";

/// Directory of bundled store lists, parsed lazily and cached per source.
#[derive(Debug)]
pub struct Bundle {
    root: PathBuf,
    cache: RwLock<HashMap<DataSource, Vec<Item>>>,
}

impl Bundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn discover(explicit: Option<PathBuf>) -> Self {
        let root = explicit
            .or_else(|| {
                get_data_directories()
                    .into_iter()
                    .find(|dir| dir.is_dir())
            })
            .unwrap_or_else(|| PathBuf::from("data"));
        log::debug!("Using data bundle at {}", root.display());
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, source: DataSource) -> Result<PathBuf, LoadError> {
        let path = self.root.join(source.file_name());
        if path.is_file() {
            Ok(path)
        } else {
            Err(LoadError::MissingResource {
                name: source.file_name(),
                root: self.root.clone(),
            })
        }
    }

    pub fn load(&self, source: DataSource) -> Result<Vec<Item>, LoadError> {
        if let Some(items) = self.cache.read().get(&source) {
            return Ok(items.clone());
        }

        let path = self.path_for(source)?;
        let content = fs::read_to_string(&path)?;
        let items = match source.format() {
            DataFormat::Csv => loader::parse_csv(&content),
            DataFormat::Json => {
                loader::parse_json(&content).map_err(|source_err| LoadError::Decode {
                    name: source.file_name(),
                    source: source_err,
                })?
            }
        };

        log::info!("Loaded {} stores from {}", items.len(), path.display());
        self.cache.write().insert(source, items.clone());
        Ok(items)
    }

    pub fn load_or_empty(&self, source: DataSource) -> Vec<Item> {
        self.load(source).unwrap_or_else(|e| {
            log::error!("Failed to load {}: {}", source, e);
            Vec::new()
        })
    }

    pub fn refresh(&self) {
        self.cache.write().clear();
    }
}

fn get_data_directories() -> Vec<PathBuf> {
    let xdg = xdg::BaseDirectories::new();
    let mut dirs = Vec::new();

    if let Some(home) = xdg.get_data_home() {
        dirs.push(home.join(BUNDLE_DIR));
    }

    dirs.extend(
        xdg.get_data_dirs()
            .into_iter()
            .map(|p| p.join(BUNDLE_DIR)),
    );
    dirs
}

//! Persisted preferred-cities list on top of a string key-value store.

use anyhow::{Context, Result, bail};
use parking_lot::Mutex;
use std::{
    collections::BTreeMap,
    fmt::{Debug, Write},
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::warn;

use crate::render::escape;

pub const PREFERRED_CITIES_KEY: &str = "preferredCities";

/// String key-value storage, in the spirit of a browser's local storage.
pub trait KeyValueStore: Send + Debug {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

/// All keys in one JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read store file: {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse store file: {}", self.path.display()))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        let mut all = self.read_all()?;
        all.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create store directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(&all).context("Failed to serialize store")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write store file: {}", self.path.display()))
    }
}

/// Process-local store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Debug)]
pub struct PreferredCities {
    store: Box<dyn KeyValueStore>,
}

impl PreferredCities {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self { store: Box::new(store) }
    }

    /// Stored cities in insertion order. Missing or unreadable data reads as empty.
    pub fn load(&self) -> Vec<String> {
        let raw = match self.store.get(PREFERRED_CITIES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(error = %err, "could not read preferred cities");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(error = %err, "ignoring unparsable preferred cities");
            Vec::new()
        })
    }

    /// Append `city` and write the list back. Duplicates are kept.
    pub fn add(&mut self, city: &str) -> Result<Vec<String>> {
        let city = city.trim();
        if city.is_empty() {
            bail!("Cannot add an empty city name to preferred cities");
        }

        let mut cities = self.load();
        cities.push(city.to_string());

        let json = serde_json::to_string(&cities).context("Failed to serialize preferred cities")?;
        self.store.set(PREFERRED_CITIES_KEY, json)?;

        Ok(cities)
    }
}

/// List items for the preferred-cities panel. Each item carries its city in
/// `data-city` so activating it can start a lookup.
pub fn render_city_list(cities: &[String]) -> String {
    let mut html = String::new();
    for city in cities {
        let city = escape(city);
        let _ = writeln!(html, r#"<li data-city="{city}">{city}</li>"#);
    }
    html
}

use std::collections::HashSet;
use std::rc::Rc;

use serde::Deserialize;
use thiserror::Error;

const CATALOG_JSON: &str = include_str!("../assets/catalog.json");

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeveloperGroup {
    Northgate,
    Harbourline,
}

impl DeveloperGroup {
    pub fn label(&self) -> &'static str {
        match self {
            DeveloperGroup::Northgate => "Northgate Developments",
            DeveloperGroup::Harbourline => "Harbourline Homes",
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: String,
    pub ordinal: u32,
    pub name: String,
    pub group: DeveloperGroup,
    pub image: String,
    #[serde(default)]
    pub gallery: Vec<String>,
}

impl CatalogEntry {
    /// Two-digit label shown on tiles, e.g. "03".
    pub fn ordinal_label(&self) -> String {
        format!("{:02}", self.ordinal)
    }

    /// Photos for the detail page; the cover image when no gallery is listed.
    pub fn photos(&self) -> Vec<String> {
        if self.gallery.is_empty() {
            vec![self.image.clone()]
        } else {
            self.gallery.clone()
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog entry with empty id")]
    EmptyId,
    #[error("duplicate catalog id: {0}")]
    DuplicateId(String),
}

fn check_ids(entries: &[CatalogEntry]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for entry in entries {
        if entry.id.trim().is_empty() {
            return Err(CatalogError::EmptyId);
        }
        if !seen.insert(entry.id.as_str()) {
            return Err(CatalogError::DuplicateId(entry.id.clone()));
        }
    }
    Ok(())
}

/// The project list, ordered by ordinal. Cheap to clone; shared through a
/// Yew context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Rc<Vec<CatalogEntry>>,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let mut entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        check_ids(&entries)?;
        // Stable, so equal ordinals keep their file order.
        entries.sort_by_key(|e| e.ordinal);
        Ok(Self {
            entries: Rc::new(entries),
        })
    }

    /// Loads the catalog embedded at build time. A broken asset leaves the
    /// site running with an empty catalog.
    pub fn load() -> Self {
        match Self::from_json(CATALOG_JSON) {
            Ok(catalog) => {
                log::info!("Loaded {} catalog entries", catalog.len());
                catalog
            }
            Err(e) => {
                log::error!("Failed to load catalog: {}", e);
                Self::default()
            }
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn first(&self) -> Option<&CatalogEntry> {
        self.entries.first()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }

    pub fn in_group(&self, group: DeveloperGroup) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(move |e| e.group == group)
    }
}

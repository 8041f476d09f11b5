// ABOUTME: Report catalog for Sakila Charts
// ABOUTME: Read-only registry of named report definitions with lookup by name or section

pub mod sakila;

use std::collections::HashSet;
use thiserror::Error;

use crate::models::QueryDefinition;

#[derive(Error, Debug, PartialEq)]
pub enum CatalogError {
    #[error("Report not found: {0}")]
    NotFound(String),
    #[error("No report in section {0}")]
    SectionNotFound(u32),
    #[error("Duplicate report name in catalog: {0}")]
    DuplicateName(String),
}

/// Ordered, immutable set of report definitions.
///
/// Built once and passed by reference to whatever needs it. Catalogs are small,
/// so lookups are plain linear scans.
#[derive(Debug, Clone)]
pub struct Catalog {
    queries: Vec<QueryDefinition>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate names
    pub fn new(queries: Vec<QueryDefinition>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for query in &queries {
            if !seen.insert(query.name.as_str()) {
                return Err(CatalogError::DuplicateName(query.name.clone()));
            }
        }
        Ok(Self { queries })
    }

    pub fn lookup_by_name(&self, name: &str) -> Result<&QueryDefinition, CatalogError> {
        self.queries
            .iter()
            .find(|q| q.name == name)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }

    /// First report (in catalog order) filed under `section`
    pub fn lookup_by_section(&self, section: u32) -> Result<&QueryDefinition, CatalogError> {
        self.queries
            .iter()
            .find(|q| q.section == section)
            .ok_or(CatalogError::SectionNotFound(section))
    }

    /// Report names in catalog order. Each call starts a fresh iterator.
    pub fn list_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.queries.iter().map(|q| q.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueryDefinition> + '_ {
        self.queries.iter()
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

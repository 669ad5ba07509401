use serde::Deserialize;

use crate::sort::SortOrder;
use crate::types::{ProjectRef, RepositoryRef};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub defaults: Defaults,
    /// Repositories loaded by the engine on every reload.
    pub repositories: Vec<RepositoryConfig>,
}

impl AppConfig {
    pub fn repository_refs(&self) -> Vec<RepositoryRef> {
        self.repositories
            .iter()
            .map(RepositoryConfig::to_ref)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub sort_order: SortOrder,
    /// Identity id used to compute "my approval status".
    pub current_user_id: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            sort_order: SortOrder::Descending,
            current_user_id: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryConfig {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub project_id: Option<String>,
}

impl RepositoryConfig {
    pub fn to_ref(&self) -> RepositoryRef {
        RepositoryRef {
            id: self.id.clone(),
            name: self.name.clone(),
            project: self.project_id.as_ref().map(|id| ProjectRef {
                id: id.clone(),
                name: String::new(),
            }),
        }
    }
}

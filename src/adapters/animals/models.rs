//! Wire models for the animal service listing endpoint

use crate::domain::AnimalId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One page of the animal listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalPage {
    /// Page number echoed by the service
    #[serde(default)]
    pub page: Option<u32>,

    /// Total number of pages, when the service reports it
    #[serde(default)]
    pub total_pages: Option<u32>,

    /// Summaries on this page
    #[serde(default)]
    pub items: Vec<AnimalSummary>,
}

impl AnimalPage {
    /// Whether another page should be requested after `requested_page`
    ///
    /// An empty page always ends the walk. Otherwise the walk continues until
    /// `total_pages` is reached, or indefinitely if it is unknown.
    pub fn has_more(&self, requested_page: u32) -> bool {
        if self.items.is_empty() {
            return false;
        }

        match self.total_pages {
            Some(total) => requested_page < total,
            None => true,
        }
    }

    /// Identifiers on this page in listing order
    pub fn ids(&self) -> Vec<AnimalId> {
        self.items.iter().map(|item| item.id).collect()
    }
}

/// Listing entry; only the id is needed to fetch detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalSummary {
    pub id: AnimalId,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

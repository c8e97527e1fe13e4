//! Product listing grid.

use serde::{Deserialize, Serialize};

use backoffice_core::{CategoryId, LanguageId, ProductId};

use crate::error::CatalogResult;
use crate::shop::ShopConstraint;

pub const DEFAULT_GRID_LIMIT: usize = 50;
pub const MAX_GRID_LIMIT: usize = 1000;

/// Columns the grid can be ordered by.
pub const SORTABLE_COLUMNS: &[&str] = &[
    "id_product",
    "name",
    "reference",
    "price",
    "quantity",
    "active",
    "position",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Listing filters, read from the query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductFilters {
    pub category_id: Option<u32>,
    pub offset: usize,
    pub limit: usize,
    pub order_by: String,
    pub sort_order: SortOrder,
    pub name: Option<String>,
    pub reference: Option<String>,
    /// `1`/`0` as posted by the grid's yes/no select.
    pub active: Option<String>,
}

impl Default for ProductFilters {
    fn default() -> Self {
        Self {
            category_id: None,
            offset: 0,
            limit: DEFAULT_GRID_LIMIT,
            order_by: "id_product".to_string(),
            sort_order: SortOrder::Desc,
            name: None,
            reference: None,
            active: None,
        }
    }
}

impl ProductFilters {
    pub fn category_id(&self) -> Option<CategoryId> {
        self.category_id.and_then(|id| CategoryId::new(id).ok())
    }

    pub fn active_flag(&self) -> Option<bool> {
        match self.active.as_deref().map(str::trim) {
            Some("1") | Some("true") => Some(true),
            Some("0") | Some("false") => Some(false),
            _ => None,
        }
    }

    /// Unknown sort columns fall back to the id column; the limit is clamped.
    pub fn normalized(mut self) -> Self {
        if !SORTABLE_COLUMNS.contains(&self.order_by.as_str()) {
            self.order_by = "id_product".to_string();
        }
        self.limit = self.limit.clamp(1, MAX_GRID_LIMIT);
        self.name = self.name.filter(|s| !s.trim().is_empty());
        self.reference = self.reference.filter(|s| !s.trim().is_empty());
        self.active = self.active.filter(|s| !s.trim().is_empty());
        self
    }

    /// Same filters without pagination, for exports.
    pub fn all_pages(&self) -> Self {
        Self {
            offset: 0,
            limit: usize::MAX,
            ..self.clone()
        }
    }

    /// Non-default values as query pairs, in a stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let defaults = Self::default();
        let mut pairs = Vec::new();
        if let Some(id) = self.category_id {
            pairs.push(("category_id", id.to_string()));
        }
        if self.offset != defaults.offset {
            pairs.push(("offset", self.offset.to_string()));
        }
        if self.limit != defaults.limit {
            pairs.push(("limit", self.limit.to_string()));
        }
        if self.order_by != defaults.order_by {
            pairs.push(("order_by", self.order_by.clone()));
        }
        if self.sort_order != defaults.sort_order {
            pairs.push(("sort_order", self.sort_order.as_str().to_string()));
        }
        if let Some(name) = &self.name {
            pairs.push(("name", name.clone()));
        }
        if let Some(reference) = &self.reference {
            pairs.push(("reference", reference.clone()));
        }
        if let Some(active) = &self.active {
            pairs.push(("active", active.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductGridRow {
    pub id: ProductId,
    pub name: String,
    pub reference: String,
    pub category: Option<String>,
    pub price_cents: u64,
    pub quantity: i64,
    pub active: bool,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductGrid {
    pub rows: Vec<ProductGridRow>,
    /// Matching rows before pagination.
    pub total: usize,
    pub filters: ProductFilters,
}

/// Builds the listing grid for the current shop scope and language.
pub trait ProductGridFactory: Send + Sync {
    fn get_grid(
        &self,
        filters: &ProductFilters,
        shop_constraint: &ShopConstraint,
        language_id: LanguageId,
    ) -> CatalogResult<ProductGrid>;
}

use std::cmp::Ordering;
use std::sync::Arc;

use backoffice_catalog::{
    CatalogResult, Product, ProductFilters, ProductGrid, ProductGridFactory, ProductGridRow,
    ShopConstraint, SortOrder,
};
use backoffice_core::{Entity, LanguageId};

use crate::catalog_store::InMemoryCatalog;

/// Filters, sorts and paginates the in-memory catalog.
#[derive(Debug, Clone)]
pub struct InMemoryProductGridFactory {
    catalog: Arc<InMemoryCatalog>,
}

impl InMemoryProductGridFactory {
    pub fn new(catalog: Arc<InMemoryCatalog>) -> Self {
        Self { catalog }
    }
}

fn contains_ci(haystack: &str, needle: &Option<String>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.trim().to_lowercase()),
        None => true,
    }
}

fn compare(a: &Product, b: &Product, column: &str) -> Ordering {
    match column {
        "name" => a.name.cmp(&b.name),
        "reference" => a.reference.cmp(&b.reference),
        "price" => a.price_cents.cmp(&b.price_cents),
        "quantity" => a.quantity.cmp(&b.quantity),
        "active" => a.active.cmp(&b.active),
        "position" => a.position.cmp(&b.position),
        _ => Ordering::Equal,
    }
    .then_with(|| a.id().cmp(&b.id()))
}

impl ProductGridFactory for InMemoryProductGridFactory {
    fn get_grid(
        &self,
        filters: &ProductFilters,
        shop_constraint: &ShopConstraint,
        language_id: LanguageId,
    ) -> CatalogResult<ProductGrid> {
        let category = filters.category_id();
        let active = filters.active_flag();
        let category_names = self.catalog.category_names(language_id)?;

        let mut products: Vec<Product> = self
            .catalog
            .products()?
            .into_iter()
            .filter(|p| shop_constraint.shop_id().is_none_or(|shop| p.is_associated_with(shop)))
            .filter(|p| category.is_none() || p.category_id == category)
            .filter(|p| active.is_none_or(|flag| p.active == flag))
            .filter(|p| contains_ci(&p.name, &filters.name))
            .filter(|p| contains_ci(&p.reference, &filters.reference))
            .collect();

        products.sort_by(|a, b| {
            let ordering = compare(a, b, &filters.order_by);
            match filters.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = products.len();
        let rows = products
            .into_iter()
            .skip(filters.offset)
            .take(filters.limit)
            .map(|p| ProductGridRow {
                id: p.id(),
                category: p.category_id.and_then(|c| category_names.get(&c).cloned()),
                name: p.name,
                reference: p.reference,
                price_cents: p.price_cents,
                quantity: p.quantity,
                active: p.active,
                position: p.position,
            })
            .collect();

        Ok(ProductGrid {
            rows,
            total,
            filters: filters.clone(),
        })
    }
}

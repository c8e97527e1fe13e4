//! Catalog command and query handlers, and their bus registration.

mod commands;
mod queries;

use std::sync::Arc;

use backoffice_bus::BusError;
use backoffice_catalog::{
    AddProduct, BulkDeleteProduct, BulkDuplicateProduct, BulkUpdateProductStatus,
    CatalogCommandBus, CatalogQueryBus, DeleteProduct, DuplicateProduct, GetCategoryForEditing,
    GetLanguageByCode, GetProductForEditing, GetVirtualProductFile, HasShopAssociation,
    SearchProductsForAssociation, UpdateProduct, UpdateProductStatus, UpdateProductsPositions,
};

use crate::catalog_store::InMemoryCatalog;

pub use commands::CatalogCommandHandlers;
pub use queries::CatalogQueryHandlers;

/// Command and query buses with every catalog handler registered.
pub fn catalog_buses(
    catalog: Arc<InMemoryCatalog>,
) -> Result<(CatalogCommandBus, CatalogQueryBus), BusError> {
    let commands = Arc::new(CatalogCommandHandlers::new(catalog.clone()));
    let mut command_bus = CatalogCommandBus::new();
    command_bus.register::<AddProduct>(commands.clone())?;
    command_bus.register::<UpdateProduct>(commands.clone())?;
    command_bus.register::<DeleteProduct>(commands.clone())?;
    command_bus.register::<DuplicateProduct>(commands.clone())?;
    command_bus.register::<UpdateProductStatus>(commands.clone())?;
    command_bus.register::<UpdateProductsPositions>(commands.clone())?;
    command_bus.register::<BulkDeleteProduct>(commands.clone())?;
    command_bus.register::<BulkUpdateProductStatus>(commands.clone())?;
    command_bus.register::<BulkDuplicateProduct>(commands)?;

    let queries = Arc::new(CatalogQueryHandlers::new(catalog));
    let mut query_bus = CatalogQueryBus::new();
    query_bus.register::<GetProductForEditing>(queries.clone())?;
    query_bus.register::<GetCategoryForEditing>(queries.clone())?;
    query_bus.register::<GetLanguageByCode>(queries.clone())?;
    query_bus.register::<SearchProductsForAssociation>(queries.clone())?;
    query_bus.register::<GetVirtualProductFile>(queries.clone())?;
    query_bus.register::<HasShopAssociation>(queries)?;

    Ok((command_bus, query_bus))
}

use std::sync::Arc;

use backoffice_bus::CommandHandler;
use backoffice_catalog::{
    AddProduct, BulkDeleteProduct, BulkDuplicateProduct, BulkUpdateProductStatus, CatalogError,
    CatalogResult, DeleteProduct, DuplicateProduct, UpdateFailure, UpdateProduct,
    UpdateProductStatus, UpdateProductsPositions,
};
use backoffice_core::ProductId;

use crate::catalog_store::InMemoryCatalog;

/// Handles every catalog command against one [`InMemoryCatalog`].
#[derive(Debug, Clone)]
pub struct CatalogCommandHandlers {
    catalog: Arc<InMemoryCatalog>,
}

impl CatalogCommandHandlers {
    pub fn new(catalog: Arc<InMemoryCatalog>) -> Self {
        Self { catalog }
    }
}

impl CommandHandler<AddProduct, CatalogError> for CatalogCommandHandlers {
    fn handle(&self, command: AddProduct) -> CatalogResult<ProductId> {
        let id = self
            .catalog
            .insert(&command.draft, &command.shop_constraint)
            .map_err(|e| match e {
                CatalogError::ProductConstraint { .. } => e,
                other => CatalogError::CannotAddProduct(other.to_string()),
            })?;
        tracing::info!(product_id = %id, "product created");
        Ok(id)
    }
}

impl CommandHandler<UpdateProduct, CatalogError> for CatalogCommandHandlers {
    fn handle(&self, command: UpdateProduct) -> CatalogResult<()> {
        self.catalog
            .update(command.product_id, &command.draft)
            .map_err(|e| match e {
                CatalogError::ProductConstraint { .. } | CatalogError::ProductNotFound(_) => e,
                other => CatalogError::CannotUpdateProduct {
                    product_id: command.product_id,
                    code: UpdateFailure::BasicInformation,
                    reason: other.to_string(),
                },
            })?;
        tracing::info!(product_id = %command.product_id, "product updated");
        Ok(())
    }
}

impl CommandHandler<DeleteProduct, CatalogError> for CatalogCommandHandlers {
    fn handle(&self, command: DeleteProduct) -> CatalogResult<()> {
        self.catalog.delete(command.product_id)?;
        tracing::info!(product_id = %command.product_id, "product deleted");
        Ok(())
    }
}

impl CommandHandler<DuplicateProduct, CatalogError> for CatalogCommandHandlers {
    fn handle(&self, command: DuplicateProduct) -> CatalogResult<ProductId> {
        let copy = self.catalog.duplicate(command.product_id)?;
        tracing::info!(product_id = %command.product_id, copy_id = %copy, "product duplicated");
        Ok(copy)
    }
}

impl CommandHandler<UpdateProductStatus, CatalogError> for CatalogCommandHandlers {
    fn handle(&self, command: UpdateProductStatus) -> CatalogResult<()> {
        self.catalog
            .set_status(&[command.product_id], command.enable)
            .map_err(|e| match e {
                CatalogError::ProductNotFound(_) => e,
                other => CatalogError::CannotUpdateProduct {
                    product_id: command.product_id,
                    code: UpdateFailure::Status,
                    reason: other.to_string(),
                },
            })
    }
}

impl CommandHandler<UpdateProductsPositions, CatalogError> for CatalogCommandHandlers {
    fn handle(&self, command: UpdateProductsPositions) -> CatalogResult<()> {
        self.catalog.update_positions(&command.update)?;
        tracing::info!(
            category_id = %command.update.category_id,
            rows = command.update.rows.len(),
            "product positions updated"
        );
        Ok(())
    }
}

impl CommandHandler<BulkDeleteProduct, CatalogError> for CatalogCommandHandlers {
    fn handle(&self, command: BulkDeleteProduct) -> CatalogResult<()> {
        self.catalog.delete_many(&command.product_ids)
    }
}

impl CommandHandler<BulkUpdateProductStatus, CatalogError> for CatalogCommandHandlers {
    fn handle(&self, command: BulkUpdateProductStatus) -> CatalogResult<()> {
        self.catalog.set_status(&command.product_ids, command.enable)
    }
}

impl CommandHandler<BulkDuplicateProduct, CatalogError> for CatalogCommandHandlers {
    fn handle(&self, command: BulkDuplicateProduct) -> CatalogResult<Vec<ProductId>> {
        self.catalog.duplicate_many(&command.product_ids)
    }
}

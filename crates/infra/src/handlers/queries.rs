use std::sync::Arc;

use backoffice_bus::QueryHandler;
use backoffice_catalog::{
    CatalogError, CatalogResult, CategoryForEditing, GetCategoryForEditing, GetLanguageByCode,
    GetProductForEditing, GetVirtualProductFile, HasShopAssociation, Language,
    ProductForAssociation, ProductForEditing, SearchProductsForAssociation, VirtualProductFile,
};

use crate::catalog_store::InMemoryCatalog;

/// Answers every catalog query from one [`InMemoryCatalog`].
#[derive(Debug, Clone)]
pub struct CatalogQueryHandlers {
    catalog: Arc<InMemoryCatalog>,
}

impl CatalogQueryHandlers {
    pub fn new(catalog: Arc<InMemoryCatalog>) -> Self {
        Self { catalog }
    }
}

impl QueryHandler<GetProductForEditing, CatalogError> for CatalogQueryHandlers {
    fn handle(&self, query: GetProductForEditing) -> CatalogResult<ProductForEditing> {
        let product = self.catalog.get(query.product_id)?;
        if let Some(shop) = query.shop_constraint.shop_id() {
            if !product.is_associated_with(shop) {
                return Err(CatalogError::ShopAssociationNotFound {
                    product_id: query.product_id,
                    shop_id: shop,
                });
            }
        }
        Ok(ProductForEditing::from(&product))
    }
}

impl QueryHandler<GetCategoryForEditing, CatalogError> for CatalogQueryHandlers {
    fn handle(&self, query: GetCategoryForEditing) -> CatalogResult<CategoryForEditing> {
        self.catalog.category(query.category_id)
    }
}

impl QueryHandler<GetLanguageByCode, CatalogError> for CatalogQueryHandlers {
    fn handle(&self, query: GetLanguageByCode) -> CatalogResult<Option<Language>> {
        self.catalog.language_by_code(&query.code)
    }
}

impl QueryHandler<SearchProductsForAssociation, CatalogError> for CatalogQueryHandlers {
    fn handle(&self, query: SearchProductsForAssociation) -> CatalogResult<Vec<ProductForAssociation>> {
        self.catalog.search(&query.phrase, query.shop_id, query.limit)
    }
}

impl QueryHandler<GetVirtualProductFile, CatalogError> for CatalogQueryHandlers {
    fn handle(&self, query: GetVirtualProductFile) -> CatalogResult<VirtualProductFile> {
        self.catalog.virtual_file(query.file_id)
    }
}

impl QueryHandler<HasShopAssociation, CatalogError> for CatalogQueryHandlers {
    fn handle(&self, query: HasShopAssociation) -> CatalogResult<bool> {
        self.catalog.has_association(query.product_id, query.shop_id)
    }
}

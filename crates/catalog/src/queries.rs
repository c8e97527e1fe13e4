//! Read intents handed to the query bus.

use backoffice_bus::Query;
use backoffice_core::{CategoryId, LanguageId, ProductId, ShopId, VirtualProductFileId};

use crate::error::{CatalogError, CatalogResult, ProductConstraintCode};
use crate::product::{
    CategoryForEditing, Language, ProductForAssociation, ProductForEditing, VirtualProductFile,
};
use crate::shop::ShopConstraint;

pub const SEARCH_PHRASE_MIN_LENGTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetProductForEditing {
    pub product_id: ProductId,
    pub shop_constraint: ShopConstraint,
    pub language_id: LanguageId,
}

impl GetProductForEditing {
    pub fn new(
        raw_id: i64,
        shop_constraint: ShopConstraint,
        language_id: LanguageId,
    ) -> CatalogResult<Self> {
        let product_id =
            ProductId::try_from(raw_id).map_err(|_| CatalogError::invalid_product_id(raw_id))?;
        Ok(Self {
            product_id,
            shop_constraint,
            language_id,
        })
    }
}

impl Query for GetProductForEditing {
    type Output = ProductForEditing;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetCategoryForEditing {
    pub category_id: CategoryId,
}

impl Query for GetCategoryForEditing {
    type Output = CategoryForEditing;
}

/// Resolves an installed language by ISO code (`en`) or locale (`en-US`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetLanguageByCode {
    pub code: String,
}

impl Query for GetLanguageByCode {
    type Output = Option<Language>;
}

/// Free-text product search used by association pickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchProductsForAssociation {
    pub phrase: String,
    pub language_id: LanguageId,
    pub shop_id: ShopId,
    pub limit: usize,
}

impl SearchProductsForAssociation {
    pub fn new(
        phrase: &str,
        language_id: LanguageId,
        shop_id: ShopId,
        limit: i64,
    ) -> CatalogResult<Self> {
        let phrase = phrase.trim();
        if phrase.chars().count() < SEARCH_PHRASE_MIN_LENGTH {
            return Err(CatalogError::constraint(
                ProductConstraintCode::InvalidSearchPhrase,
                format!(
                    "Search phrase must contain at least {SEARCH_PHRASE_MIN_LENGTH} characters, \"{phrase}\" given."
                ),
            ));
        }
        let limit = usize::try_from(limit).ok().filter(|l| *l > 0).ok_or_else(|| {
            CatalogError::constraint(
                ProductConstraintCode::InvalidSearchLimit,
                format!("Search limit must be a positive integer, {limit} given."),
            )
        })?;
        Ok(Self {
            phrase: phrase.to_string(),
            language_id,
            shop_id,
            limit,
        })
    }
}

impl Query for SearchProductsForAssociation {
    type Output = Vec<ProductForAssociation>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetVirtualProductFile {
    pub file_id: VirtualProductFileId,
}

impl Query for GetVirtualProductFile {
    type Output = VirtualProductFile;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HasShopAssociation {
    pub product_id: ProductId,
    pub shop_id: ShopId,
}

impl Query for HasShopAssociation {
    type Output = bool;
}

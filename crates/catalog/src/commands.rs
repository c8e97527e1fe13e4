//! Write intents handed to the command bus.
//!
//! Constructors taking raw `i64` ids validate them up front, so a handler
//! only ever sees positive identifiers.

use serde::{Deserialize, Serialize};

use backoffice_bus::Command;
use backoffice_core::{CategoryId, ProductId};

use crate::error::{CatalogError, CatalogResult};
use crate::position::PositionUpdate;
use crate::product::ProductType;
use crate::shop::ShopConstraint;

/// Editable product fields, as submitted through the product form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub reference: String,
    pub price_cents: u64,
    pub quantity: i64,
    pub active: bool,
    pub product_type: ProductType,
    pub category_id: Option<CategoryId>,
}

fn product_id(raw: i64) -> CatalogResult<ProductId> {
    ProductId::try_from(raw).map_err(|_| CatalogError::invalid_product_id(raw))
}

fn product_ids(raw: &[i64]) -> CatalogResult<Vec<ProductId>> {
    raw.iter().copied().map(product_id).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddProduct {
    pub draft: ProductDraft,
    pub shop_constraint: ShopConstraint,
}

impl Command for AddProduct {
    type Output = ProductId;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProduct {
    pub product_id: ProductId,
    pub draft: ProductDraft,
    pub shop_constraint: ShopConstraint,
}

impl Command for UpdateProduct {
    type Output = ();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteProduct {
    pub product_id: ProductId,
    pub shop_constraint: ShopConstraint,
}

impl DeleteProduct {
    pub fn new(raw_id: i64, shop_constraint: ShopConstraint) -> CatalogResult<Self> {
        Ok(Self {
            product_id: product_id(raw_id)?,
            shop_constraint,
        })
    }
}

impl Command for DeleteProduct {
    type Output = ();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateProduct {
    pub product_id: ProductId,
    pub shop_constraint: ShopConstraint,
}

impl DuplicateProduct {
    pub fn new(raw_id: i64, shop_constraint: ShopConstraint) -> CatalogResult<Self> {
        Ok(Self {
            product_id: product_id(raw_id)?,
            shop_constraint,
        })
    }
}

impl Command for DuplicateProduct {
    /// Id of the copy.
    type Output = ProductId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductStatus {
    pub product_id: ProductId,
    pub enable: bool,
    pub shop_constraint: ShopConstraint,
}

impl UpdateProductStatus {
    pub fn new(raw_id: i64, enable: bool, shop_constraint: ShopConstraint) -> CatalogResult<Self> {
        Ok(Self {
            product_id: product_id(raw_id)?,
            enable,
            shop_constraint,
        })
    }
}

impl Command for UpdateProductStatus {
    type Output = ();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProductsPositions {
    pub update: PositionUpdate,
}

impl Command for UpdateProductsPositions {
    type Output = ();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkDeleteProduct {
    pub product_ids: Vec<ProductId>,
    pub shop_constraint: ShopConstraint,
}

impl BulkDeleteProduct {
    pub fn new(raw_ids: &[i64], shop_constraint: ShopConstraint) -> CatalogResult<Self> {
        Ok(Self {
            product_ids: product_ids(raw_ids)?,
            shop_constraint,
        })
    }
}

impl Command for BulkDeleteProduct {
    type Output = ();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkUpdateProductStatus {
    pub product_ids: Vec<ProductId>,
    pub enable: bool,
    pub shop_constraint: ShopConstraint,
}

impl BulkUpdateProductStatus {
    pub fn new(raw_ids: &[i64], enable: bool, shop_constraint: ShopConstraint) -> CatalogResult<Self> {
        Ok(Self {
            product_ids: product_ids(raw_ids)?,
            enable,
            shop_constraint,
        })
    }
}

impl Command for BulkUpdateProductStatus {
    type Output = ();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkDuplicateProduct {
    pub product_ids: Vec<ProductId>,
    pub shop_constraint: ShopConstraint,
}

impl BulkDuplicateProduct {
    pub fn new(raw_ids: &[i64], shop_constraint: ShopConstraint) -> CatalogResult<Self> {
        Ok(Self {
            product_ids: product_ids(raw_ids)?,
            shop_constraint,
        })
    }
}

impl Command for BulkDuplicateProduct {
    /// Ids of the copies, in the order of the originals.
    type Output = Vec<ProductId>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProductConstraintCode;

    #[test]
    fn single_commands_reject_non_positive_ids() {
        let err = DeleteProduct::new(0, ShopConstraint::AllShops).unwrap_err();
        assert_eq!(
            err,
            CatalogError::invalid_product_id(0),
        );
        assert!(DuplicateProduct::new(-2, ShopConstraint::AllShops).is_err());
        assert!(UpdateProductStatus::new(3, true, ShopConstraint::AllShops).is_ok());
    }

    #[test]
    fn bulk_commands_fail_on_first_bad_id() {
        let err = BulkDeleteProduct::new(&[1, 0, 2], ShopConstraint::AllShops).unwrap_err();
        match err {
            CatalogError::ProductConstraint { code, message } => {
                assert_eq!(code, ProductConstraintCode::InvalidId);
                assert!(message.contains("Product id 0 is invalid"));
            }
            other => panic!("Expected constraint error, got {other:?}"),
        }
    }

    #[test]
    fn empty_selection_is_an_empty_command() {
        let cmd = BulkUpdateProductStatus::new(&[], false, ShopConstraint::AllShops).unwrap();
        assert!(cmd.product_ids.is_empty());
        assert!(!cmd.enable);
    }
}

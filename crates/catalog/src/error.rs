//! Catalog error taxonomy.
//!
//! Every failure a catalog collaborator can report is a [`CatalogError`]. The
//! admin layer never matches on messages: it maps `(kind, code)` pairs to
//! user-facing text, so each variant exposes a stable [`ErrorKind`] and, where
//! one failure family has several causes, a sub-code.

use thiserror::Error;

use backoffice_bus::BusError;
use backoffice_core::{CategoryId, DomainError, ProductId, ShopId, VirtualProductFileId};

use crate::position::PositionError;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Which product constraint was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductConstraintCode {
    InvalidId,
    InvalidName,
    InvalidReference,
    InvalidPrice,
    InvalidQuantity,
    InvalidSearchPhrase,
    InvalidSearchLimit,
}

impl ProductConstraintCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductConstraintCode::InvalidId => "invalid_id",
            ProductConstraintCode::InvalidName => "invalid_name",
            ProductConstraintCode::InvalidReference => "invalid_reference",
            ProductConstraintCode::InvalidPrice => "invalid_price",
            ProductConstraintCode::InvalidQuantity => "invalid_quantity",
            ProductConstraintCode::InvalidSearchPhrase => "invalid_search_phrase",
            ProductConstraintCode::InvalidSearchLimit => "invalid_search_limit",
        }
    }
}

/// Which part of a product update failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateFailure {
    BasicInformation,
    Status,
}

impl UpdateFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateFailure::BasicInformation => "failed_update_basic_information",
            UpdateFailure::Status => "failed_update_status",
        }
    }
}

/// Stable discriminant of a [`CatalogError`], used as the key of the
/// user-facing message table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ProductNotFound,
    ProductConstraint,
    CannotAddProduct,
    CannotUpdateProduct,
    CannotDeleteProduct,
    CannotBulkDeleteProduct,
    CannotDuplicateProduct,
    CannotBulkDuplicateProduct,
    ShopAssociationNotFound,
    CategoryNotFound,
    LanguageNotFound,
    VirtualProductFileNotFound,
    InvalidPositions,
    Domain,
    Bus,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error("{message}")]
    ProductConstraint {
        code: ProductConstraintCode,
        message: String,
    },

    #[error("cannot add product: {0}")]
    CannotAddProduct(String),

    #[error("cannot update product {product_id}: {reason}")]
    CannotUpdateProduct {
        product_id: ProductId,
        code: UpdateFailure,
        reason: String,
    },

    #[error("cannot delete product {0}")]
    CannotDeleteProduct(ProductId),

    #[error("cannot delete products {product_ids:?}")]
    CannotBulkDeleteProduct { product_ids: Vec<ProductId> },

    #[error("cannot duplicate product {0}")]
    CannotDuplicateProduct(ProductId),

    #[error("cannot duplicate products {product_ids:?}")]
    CannotBulkDuplicateProduct { product_ids: Vec<ProductId> },

    #[error("product {product_id} is not associated with shop {shop_id}")]
    ShopAssociationNotFound { product_id: ProductId, shop_id: ShopId },

    #[error("category {0} not found")]
    CategoryNotFound(CategoryId),

    #[error("category {category_id} has no name for language {language}")]
    MissingLocalizedName {
        category_id: CategoryId,
        language: String,
    },

    #[error("no language matches code '{0}'")]
    LanguageNotFound(String),

    #[error("virtual product file {0} not found")]
    VirtualProductFileNotFound(VirtualProductFileId),

    #[error("invalid position update ({} error(s))", .0.len())]
    InvalidPositions(Vec<PositionError>),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Bus(#[from] BusError),
}

impl CatalogError {
    pub fn constraint(code: ProductConstraintCode, message: impl Into<String>) -> Self {
        Self::ProductConstraint {
            code,
            message: message.into(),
        }
    }

    /// Constraint error for a raw id that is not a valid product id.
    pub fn invalid_product_id(raw: i64) -> Self {
        Self::constraint(
            ProductConstraintCode::InvalidId,
            format!("Product id {raw} is invalid. Product id must be number that is greater than zero."),
        )
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::ProductNotFound(_) => ErrorKind::ProductNotFound,
            CatalogError::ProductConstraint { .. } => ErrorKind::ProductConstraint,
            CatalogError::CannotAddProduct(_) => ErrorKind::CannotAddProduct,
            CatalogError::CannotUpdateProduct { .. } => ErrorKind::CannotUpdateProduct,
            CatalogError::CannotDeleteProduct(_) => ErrorKind::CannotDeleteProduct,
            CatalogError::CannotBulkDeleteProduct { .. } => ErrorKind::CannotBulkDeleteProduct,
            CatalogError::CannotDuplicateProduct(_) => ErrorKind::CannotDuplicateProduct,
            CatalogError::CannotBulkDuplicateProduct { .. } => {
                ErrorKind::CannotBulkDuplicateProduct
            }
            CatalogError::ShopAssociationNotFound { .. } => ErrorKind::ShopAssociationNotFound,
            CatalogError::CategoryNotFound(_) | CatalogError::MissingLocalizedName { .. } => {
                ErrorKind::CategoryNotFound
            }
            CatalogError::LanguageNotFound(_) => ErrorKind::LanguageNotFound,
            CatalogError::VirtualProductFileNotFound(_) => ErrorKind::VirtualProductFileNotFound,
            CatalogError::InvalidPositions(_) => ErrorKind::InvalidPositions,
            CatalogError::Domain(_) => ErrorKind::Domain,
            CatalogError::Bus(_) => ErrorKind::Bus,
        }
    }

    /// Sub-code refining [`Self::kind`], when the family has one.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            CatalogError::ProductConstraint { code, .. } => Some(code.as_str()),
            CatalogError::CannotUpdateProduct { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }

    /// Whether the error describes something that does not exist (as opposed
    /// to something that exists but was refused).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::ProductNotFound(_)
                | CatalogError::CategoryNotFound(_)
                | CatalogError::MissingLocalizedName { .. }
                | CatalogError::LanguageNotFound(_)
                | CatalogError::VirtualProductFileNotFound(_)
                | CatalogError::Domain(DomainError::NotFound)
        )
    }
}

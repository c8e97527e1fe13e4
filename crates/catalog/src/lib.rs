//! Catalog domain vocabulary for the back office.
//!
//! This crate names everything the admin layer exchanges with its
//! collaborators: commands and queries (with their read projections), the
//! error taxonomy, shop scoping, position updates and grid types. It contains
//! no IO; handlers live in `backoffice-infra`.

pub mod commands;
pub mod config;
pub mod error;
pub mod grid;
pub mod position;
pub mod product;
pub mod queries;
pub mod shop;

pub use commands::{
    AddProduct, BulkDeleteProduct, BulkDuplicateProduct, BulkUpdateProductStatus, DeleteProduct,
    DuplicateProduct, ProductDraft, UpdateProduct, UpdateProductStatus, UpdateProductsPositions,
};
pub use config::ConfigurationStore;
pub use error::{CatalogError, CatalogResult, ErrorKind, ProductConstraintCode, UpdateFailure};
pub use grid::{DEFAULT_GRID_LIMIT, ProductFilters, ProductGrid, ProductGridFactory, ProductGridRow, SortOrder};
pub use position::{PositionError, PositionRow, PositionUpdate, RawPositionRow};
pub use product::{
    CategoryForEditing, Language, Product, ProductForAssociation, ProductForEditing, ProductType,
    VirtualProductFile,
};
pub use queries::{
    GetCategoryForEditing, GetLanguageByCode, GetProductForEditing, GetVirtualProductFile,
    HasShopAssociation, SearchProductsForAssociation,
};
pub use shop::{RequestShopContext, ShopConstraint, ShopContext, ShopSelection};

/// Command bus specialised to catalog errors.
pub type CatalogCommandBus = backoffice_bus::CommandBus<CatalogError>;

/// Query bus specialised to catalog errors.
pub type CatalogQueryBus = backoffice_bus::QueryBus<CatalogError>;

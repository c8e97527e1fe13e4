//! Product record and the read projections handed to the admin.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backoffice_core::{
    CategoryId, Entity, LanguageId, ProductId, ShopId, VirtualProductFileId,
};

use crate::commands::ProductDraft;
use crate::error::{CatalogError, CatalogResult, ProductConstraintCode};

pub const NAME_MAX_LENGTH: usize = 128;
pub const REFERENCE_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    #[default]
    Standard,
    Combinations,
    Pack,
    Virtual,
}

impl ProductType {
    pub const ALL: [ProductType; 4] = [
        ProductType::Standard,
        ProductType::Combinations,
        ProductType::Pack,
        ProductType::Virtual,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProductType::Standard => "standard",
            ProductType::Combinations => "combinations",
            ProductType::Pack => "pack",
            ProductType::Virtual => "virtual",
        }
    }

    /// Inverse of [`ProductType::as_str`].
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == raw)
    }
}

/// A catalog product as stored by the catalog collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    pub name: String,
    pub reference: String,
    /// Price in the smallest currency unit.
    pub price_cents: u64,
    pub quantity: i64,
    pub active: bool,
    pub product_type: ProductType,
    pub category_id: Option<CategoryId>,
    pub position: u32,
    pub shops: BTreeSet<ShopId>,
    pub virtual_file: Option<VirtualProductFileId>,
    pub cover_image: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

impl Product {
    pub fn create(
        id: ProductId,
        draft: &ProductDraft,
        shops: BTreeSet<ShopId>,
        now: DateTime<Utc>,
    ) -> CatalogResult<Self> {
        validate_draft(draft)?;
        Ok(Self {
            id,
            name: draft.name.trim().to_string(),
            reference: draft.reference.trim().to_string(),
            price_cents: draft.price_cents,
            quantity: draft.quantity,
            active: draft.active,
            product_type: draft.product_type,
            category_id: draft.category_id,
            position: 0,
            shops,
            virtual_file: None,
            cover_image: None,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, draft: &ProductDraft, now: DateTime<Utc>) -> CatalogResult<()> {
        validate_draft(draft)?;
        self.name = draft.name.trim().to_string();
        self.reference = draft.reference.trim().to_string();
        self.price_cents = draft.price_cents;
        self.quantity = draft.quantity;
        self.active = draft.active;
        self.product_type = draft.product_type;
        if draft.category_id != self.category_id {
            self.position = 0;
        }
        self.category_id = draft.category_id;
        self.updated_at = now;
        Ok(())
    }

    /// Copy under a new id. The copy is disabled and keeps shop associations.
    /// Its name is cut to [`NAME_MAX_LENGTH`] so the copy stays editable.
    pub fn duplicate(&self, id: ProductId, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: copy_name(&self.name),
            active: false,
            updated_at: now,
            ..self.clone()
        }
    }

    pub fn set_active(&mut self, active: bool, now: DateTime<Utc>) {
        self.active = active;
        self.updated_at = now;
    }

    pub fn is_associated_with(&self, shop: ShopId) -> bool {
        self.shops.contains(&shop)
    }

    pub fn draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            reference: self.reference.clone(),
            price_cents: self.price_cents,
            quantity: self.quantity,
            active: self.active,
            product_type: self.product_type,
            category_id: self.category_id,
        }
    }
}

fn copy_name(name: &str) -> String {
    format!("copy of {name}").chars().take(NAME_MAX_LENGTH).collect()
}

fn validate_draft(draft: &ProductDraft) -> CatalogResult<()> {
    let name = draft.name.trim();
    if name.is_empty() || name.chars().count() > NAME_MAX_LENGTH {
        return Err(CatalogError::constraint(
            ProductConstraintCode::InvalidName,
            format!("Product name must be between 1 and {NAME_MAX_LENGTH} characters."),
        ));
    }
    if draft.reference.trim().chars().count() > REFERENCE_MAX_LENGTH {
        return Err(CatalogError::constraint(
            ProductConstraintCode::InvalidReference,
            format!("Product reference cannot exceed {REFERENCE_MAX_LENGTH} characters."),
        ));
    }
    if draft.quantity < 0 {
        return Err(CatalogError::constraint(
            ProductConstraintCode::InvalidQuantity,
            "Product quantity cannot be negative.",
        ));
    }
    Ok(())
}

/// Projection used by the edit page and the status toggle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductForEditing {
    pub id: ProductId,
    pub product_type: ProductType,
    pub active: bool,
    pub draft: ProductDraft,
    pub virtual_file: Option<VirtualProductFileId>,
}

impl From<&Product> for ProductForEditing {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            product_type: product.product_type,
            active: product.active,
            draft: product.draft(),
            virtual_file: product.virtual_file,
        }
    }
}

/// Search hit for the association picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductForAssociation {
    pub product_id: ProductId,
    pub name: String,
    pub reference: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryForEditing {
    pub id: CategoryId,
    pub localized_names: BTreeMap<LanguageId, String>,
}

impl CategoryForEditing {
    pub fn name_in(&self, language: LanguageId) -> Option<&str> {
        self.localized_names.get(&language).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Language {
    pub id: LanguageId,
    pub iso_code: String,
    pub locale: String,
    pub name: String,
}

/// Stored downloadable attached to a virtual product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VirtualProductFile {
    pub id: VirtualProductFileId,
    pub product_id: ProductId,
    /// Name of the file on disk, inside the download directory.
    pub filename: String,
    /// Name offered to the browser.
    pub display_filename: String,
}

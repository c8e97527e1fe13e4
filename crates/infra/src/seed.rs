//! Demo catalog used by the dev server and the API tests.

use std::collections::BTreeMap;

use backoffice_catalog::{
    CatalogResult, CategoryForEditing, Language, ProductDraft, ShopConstraint, VirtualProductFile,
};
use backoffice_core::{CategoryId, LanguageId, ProductId, VirtualProductFileId};

use crate::catalog_store::InMemoryCatalog;

pub const ENGLISH: u32 = 1;
pub const FRENCH: u32 = 2;
pub const CATEGORY_CLOTHES: u32 = 3;
pub const CATEGORY_ACCESSORIES: u32 = 6;
pub const DEMO_VIRTUAL_FILE: u32 = 1;

/// On-disk name of the seeded downloadable.
pub const DEMO_VIRTUAL_FILENAME: &str = "3a2b6c1e9f.pdf";

pub fn seed_demo_catalog(catalog: &InMemoryCatalog) -> CatalogResult<()> {
    let en = LanguageId::new(ENGLISH)?;
    let fr = LanguageId::new(FRENCH)?;
    catalog.add_language(Language {
        id: en,
        iso_code: "en".into(),
        locale: "en-US".into(),
        name: "English (English)".into(),
    })?;
    catalog.add_language(Language {
        id: fr,
        iso_code: "fr".into(),
        locale: "fr-FR".into(),
        name: "Français (French)".into(),
    })?;

    let clothes = CategoryId::new(CATEGORY_CLOTHES)?;
    let accessories = CategoryId::new(CATEGORY_ACCESSORIES)?;
    catalog.add_category(CategoryForEditing {
        id: clothes,
        localized_names: BTreeMap::from([(en, "Clothes".into()), (fr, "Vêtements".into())]),
    })?;
    // Accessories has no French name.
    catalog.add_category(CategoryForEditing {
        id: accessories,
        localized_names: BTreeMap::from([(en, "Accessories".into())]),
    })?;

    let products = [
        ("Hummingbird printed t-shirt", "demo_1", 2390, 300, true, Some(clothes)),
        ("Hummingbird printed sweater", "demo_3", 3590, 1200, true, Some(clothes)),
        ("Mug The best is yet to come", "demo_11", 1190, 300, true, Some(accessories)),
        ("Shoe", "SKU1", 4900, 12, true, Some(accessories)),
        ("Pack Mug + Framed poster", "demo_21", 3500, 100, false, None),
    ];
    for (name, reference, price_cents, quantity, active, category_id) in products {
        let draft = ProductDraft {
            name: name.into(),
            reference: reference.into(),
            price_cents,
            quantity,
            active,
            category_id,
            ..ProductDraft::default()
        };
        catalog.insert(&draft, &ShopConstraint::AllShops)?;
    }

    let ebook = catalog.insert(
        &ProductDraft {
            name: "Illustrated guide".into(),
            reference: "demo_19".into(),
            price_cents: 900,
            active: true,
            product_type: backoffice_catalog::ProductType::Virtual,
            ..ProductDraft::default()
        },
        &ShopConstraint::AllShops,
    )?;
    catalog.add_virtual_file(VirtualProductFile {
        id: VirtualProductFileId::new(DEMO_VIRTUAL_FILE)?,
        product_id: ebook,
        filename: DEMO_VIRTUAL_FILENAME.into(),
        display_filename: "illustrated-guide.pdf".into(),
    })?;
    catalog.set_cover_image(ProductId::new(1)?, "1-home_default.jpg")?;

    tracing::info!("demo catalog seeded");
    Ok(())
}

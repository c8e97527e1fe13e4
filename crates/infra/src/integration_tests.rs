//! Integration tests for the catalog pipeline.
//!
//! Tests: Command/Query -> Bus -> Handler -> InMemoryCatalog
//!
//! Verifies:
//! - Every catalog message has exactly one handler
//! - Status toggling is reversible
//! - Shop scoping is enforced on reads

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use backoffice_bus::BusError;
    use backoffice_catalog::{
        AddProduct, BulkDuplicateProduct, CatalogCommandBus, CatalogError, CatalogQueryBus,
        DeleteProduct, GetLanguageByCode, GetProductForEditing, HasShopAssociation, ProductDraft,
        SearchProductsForAssociation, ShopConstraint, UpdateProductStatus,
    };
    use backoffice_core::{LanguageId, ProductId, ShopId};

    use crate::catalog_store::InMemoryCatalog;
    use crate::handlers::catalog_buses;
    use crate::seed::seed_demo_catalog;

    fn shop(id: u32) -> ShopId {
        ShopId::new(id).unwrap()
    }

    fn lang() -> LanguageId {
        LanguageId::new(1).unwrap()
    }

    fn setup() -> (CatalogCommandBus, CatalogQueryBus) {
        let catalog = Arc::new(InMemoryCatalog::new([shop(1), shop(2)], "/img"));
        seed_demo_catalog(&catalog).unwrap();
        catalog_buses(catalog).unwrap()
    }

    fn is_active(queries: &CatalogQueryBus, id: i64) -> bool {
        queries
            .ask(GetProductForEditing::new(id, ShopConstraint::AllShops, lang()).unwrap())
            .unwrap()
            .active
    }

    #[test]
    fn toggling_twice_restores_status() {
        let (commands, queries) = setup();
        let original = is_active(&queries, 1);

        for _ in 0..2 {
            let current = is_active(&queries, 1);
            commands
                .dispatch(UpdateProductStatus::new(1, !current, ShopConstraint::AllShops).unwrap())
                .unwrap();
        }

        assert_eq!(is_active(&queries, 1), original);
    }

    #[test]
    fn created_product_is_scoped_to_its_shop() {
        let (commands, queries) = setup();
        let id = commands
            .dispatch(AddProduct {
                draft: ProductDraft {
                    name: "Scarf".into(),
                    ..ProductDraft::default()
                },
                shop_constraint: ShopConstraint::Shop(shop(2)),
            })
            .unwrap();

        assert!(queries.ask(HasShopAssociation { product_id: id, shop_id: shop(2) }).unwrap());
        assert!(!queries.ask(HasShopAssociation { product_id: id, shop_id: shop(1) }).unwrap());

        let err = queries
            .ask(GetProductForEditing::new(id.value().into(), ShopConstraint::Shop(shop(1)), lang()).unwrap())
            .unwrap_err();
        assert_eq!(err, CatalogError::ShopAssociationNotFound { product_id: id, shop_id: shop(1) });
    }

    #[test]
    fn invalid_draft_surfaces_as_constraint_error() {
        let (commands, _) = setup();
        let err = commands
            .dispatch(AddProduct {
                draft: ProductDraft::default(),
                shop_constraint: ShopConstraint::AllShops,
            })
            .unwrap_err();
        assert_eq!(err.code(), Some("invalid_name"));
    }

    #[test]
    fn deleting_a_missing_product_is_not_found() {
        let (commands, _) = setup();
        let err = commands
            .dispatch(DeleteProduct::new(404, ShopConstraint::AllShops).unwrap())
            .unwrap_err();
        assert_eq!(err, CatalogError::ProductNotFound(ProductId::new(404).unwrap()));
    }

    #[test]
    fn bulk_duplicate_returns_copy_ids() {
        let (commands, _) = setup();
        let copies = commands
            .dispatch(BulkDuplicateProduct::new(&[1, 2], ShopConstraint::AllShops).unwrap())
            .unwrap();
        assert_eq!(copies.len(), 2);
        assert!(copies.iter().all(|id| id.value() > 6));
    }

    #[test]
    fn search_finds_seeded_shoe() {
        let (_, queries) = setup();
        let hits = queries
            .ask(SearchProductsForAssociation::new("shoe", lang(), shop(1), 20).unwrap())
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].reference, "SKU1");

        assert!(queries
            .ask(GetLanguageByCode { code: "xx-INVALID".into() })
            .unwrap()
            .is_none());
    }

    #[test]
    fn unregistered_messages_fail_with_no_handler() {
        let commands = CatalogCommandBus::new();
        let err = commands
            .dispatch(DeleteProduct::new(1, ShopConstraint::AllShops).unwrap())
            .unwrap_err();
        assert_eq!(err, CatalogError::Bus(BusError::NoHandler("DeleteProduct")));
    }
}

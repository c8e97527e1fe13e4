//! In-memory catalog.
//!
//! Intended for tests/dev. Every operation takes the lock once, so a bulk
//! operation is applied atomically with respect to other requests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use backoffice_catalog::{
    CatalogError, CatalogResult, CategoryForEditing, Language, PositionError, PositionUpdate,
    Product, ProductDraft, ProductForAssociation, ShopConstraint, VirtualProductFile,
};
use backoffice_core::{
    CategoryId, DomainError, Entity, LanguageId, ProductId, ShopId, VirtualProductFileId,
};

#[derive(Debug, Default)]
struct CatalogState {
    products: BTreeMap<ProductId, Product>,
    categories: BTreeMap<CategoryId, CategoryForEditing>,
    languages: Vec<Language>,
    files: BTreeMap<VirtualProductFileId, VirtualProductFile>,
    shops: BTreeSet<ShopId>,
    last_product_id: u32,
}

impl CatalogState {
    fn next_product_id(&mut self) -> CatalogResult<ProductId> {
        self.last_product_id += 1;
        Ok(ProductId::new(self.last_product_id)?)
    }

    fn product_mut(&mut self, id: ProductId) -> CatalogResult<&mut Product> {
        self.products
            .get_mut(&id)
            .ok_or(CatalogError::ProductNotFound(id))
    }

    fn ensure_category(&self, draft: &ProductDraft) -> CatalogResult<()> {
        match draft.category_id {
            Some(id) if !self.categories.contains_key(&id) => Err(CatalogError::CategoryNotFound(id)),
            _ => Ok(()),
        }
    }

    /// Shops a new record is associated with, given the request scope.
    fn shops_for(&self, constraint: &ShopConstraint) -> BTreeSet<ShopId> {
        match constraint {
            ShopConstraint::Shop(id) => BTreeSet::from([*id]),
            _ => self.shops.clone(),
        }
    }
}

#[derive(Debug)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
    image_base_url: String,
}

impl InMemoryCatalog {
    pub fn new(shops: impl IntoIterator<Item = ShopId>, image_base_url: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(CatalogState {
                shops: shops.into_iter().collect(),
                ..CatalogState::default()
            }),
            image_base_url: image_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn read(&self) -> CatalogResult<RwLockReadGuard<'_, CatalogState>> {
        self.state
            .read()
            .map_err(|_| DomainError::invariant("catalog lock poisoned").into())
    }

    fn write(&self) -> CatalogResult<RwLockWriteGuard<'_, CatalogState>> {
        self.state
            .write()
            .map_err(|_| DomainError::invariant("catalog lock poisoned").into())
    }

    pub fn add_language(&self, language: Language) -> CatalogResult<()> {
        self.write()?.languages.push(language);
        Ok(())
    }

    pub fn add_category(&self, category: CategoryForEditing) -> CatalogResult<()> {
        self.write()?.categories.insert(category.id, category);
        Ok(())
    }

    pub fn add_virtual_file(&self, file: VirtualProductFile) -> CatalogResult<()> {
        let mut state = self.write()?;
        state.product_mut(file.product_id)?.virtual_file = Some(file.id);
        state.files.insert(file.id, file);
        Ok(())
    }

    pub fn set_cover_image(&self, id: ProductId, image: impl Into<String>) -> CatalogResult<()> {
        self.write()?.product_mut(id)?.cover_image = Some(image.into());
        Ok(())
    }

    pub fn insert(&self, draft: &ProductDraft, constraint: &ShopConstraint) -> CatalogResult<ProductId> {
        let mut state = self.write()?;
        state.ensure_category(draft)?;
        let shops = state.shops_for(constraint);
        let id = state.next_product_id()?;
        let product = Product::create(id, draft, shops, Utc::now())?;
        state.products.insert(id, product);
        Ok(id)
    }

    pub fn update(&self, id: ProductId, draft: &ProductDraft) -> CatalogResult<()> {
        let mut state = self.write()?;
        state.ensure_category(draft)?;
        state.product_mut(id)?.apply(draft, Utc::now())
    }

    pub fn get(&self, id: ProductId) -> CatalogResult<Product> {
        self.read()?
            .products
            .get(&id)
            .cloned()
            .ok_or(CatalogError::ProductNotFound(id))
    }

    pub fn products(&self) -> CatalogResult<Vec<Product>> {
        Ok(self.read()?.products.values().cloned().collect())
    }

    pub fn delete(&self, id: ProductId) -> CatalogResult<()> {
        self.write()?
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or(CatalogError::ProductNotFound(id))
    }

    /// Deletes what exists and reports the ids that could not be deleted.
    pub fn delete_many(&self, ids: &[ProductId]) -> CatalogResult<()> {
        let mut state = self.write()?;
        let failed: Vec<ProductId> = ids
            .iter()
            .filter(|id| state.products.remove(*id).is_none())
            .copied()
            .collect();
        if failed.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::CannotBulkDeleteProduct { product_ids: failed })
        }
    }

    pub fn duplicate(&self, id: ProductId) -> CatalogResult<ProductId> {
        let mut state = self.write()?;
        let source = state
            .products
            .get(&id)
            .cloned()
            .ok_or(CatalogError::ProductNotFound(id))?;
        let copy_id = state.next_product_id()?;
        state.products.insert(copy_id, source.duplicate(copy_id, Utc::now()));
        Ok(copy_id)
    }

    /// Duplicates what exists and reports the ids that could not be duplicated.
    pub fn duplicate_many(&self, ids: &[ProductId]) -> CatalogResult<Vec<ProductId>> {
        let mut state = self.write()?;
        let mut copies = Vec::with_capacity(ids.len());
        let mut failed = Vec::new();
        for id in ids {
            match state.products.get(id).cloned() {
                Some(source) => {
                    let copy_id = state.next_product_id()?;
                    state.products.insert(copy_id, source.duplicate(copy_id, Utc::now()));
                    copies.push(copy_id);
                }
                None => failed.push(*id),
            }
        }
        if failed.is_empty() {
            Ok(copies)
        } else {
            Err(CatalogError::CannotBulkDuplicateProduct { product_ids: failed })
        }
    }

    /// Sets the status of every product, or of none when one is missing.
    pub fn set_status(&self, ids: &[ProductId], active: bool) -> CatalogResult<()> {
        let mut state = self.write()?;
        if let Some(missing) = ids.iter().find(|id| !state.products.contains_key(*id)) {
            return Err(CatalogError::ProductNotFound(*missing));
        }
        let now = Utc::now();
        for id in ids {
            state.product_mut(*id)?.set_active(active, now);
        }
        Ok(())
    }

    pub fn update_positions(&self, update: &PositionUpdate) -> CatalogResult<()> {
        let mut state = self.write()?;
        if !state.categories.contains_key(&update.category_id) {
            return Err(CatalogError::CategoryNotFound(update.category_id));
        }
        let errors: Vec<PositionError> = update
            .rows
            .iter()
            .filter(|row| {
                state
                    .products
                    .get(&row.product_id)
                    .is_none_or(|p| p.category_id != Some(update.category_id))
            })
            .map(|row| PositionError::new("Could not update #%i%").with("%i%", row.product_id))
            .collect();
        if !errors.is_empty() {
            return Err(CatalogError::InvalidPositions(errors));
        }
        for row in &update.rows {
            state.product_mut(row.product_id)?.position = row.new_position;
        }
        Ok(())
    }

    pub fn has_association(&self, id: ProductId, shop: ShopId) -> CatalogResult<bool> {
        let state = self.read()?;
        let product = state
            .products
            .get(&id)
            .ok_or(CatalogError::ProductNotFound(id))?;
        Ok(product.is_associated_with(shop))
    }

    pub fn category(&self, id: CategoryId) -> CatalogResult<CategoryForEditing> {
        self.read()?
            .categories
            .get(&id)
            .cloned()
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    pub fn category_names(&self, language: LanguageId) -> CatalogResult<BTreeMap<CategoryId, String>> {
        Ok(self
            .read()?
            .categories
            .values()
            .filter_map(|c| c.name_in(language).map(|name| (c.id, name.to_string())))
            .collect())
    }

    /// Matches either the ISO code or the full locale, case-insensitively.
    pub fn language_by_code(&self, code: &str) -> CatalogResult<Option<Language>> {
        let code = code.trim();
        Ok(self
            .read()?
            .languages
            .iter()
            .find(|l| l.iso_code.eq_ignore_ascii_case(code) || l.locale.eq_ignore_ascii_case(code))
            .cloned())
    }

    pub fn virtual_file(&self, id: VirtualProductFileId) -> CatalogResult<VirtualProductFile> {
        self.read()?
            .files
            .get(&id)
            .cloned()
            .ok_or(CatalogError::VirtualProductFileNotFound(id))
    }

    /// Case-insensitive match on name or reference, restricted to one shop,
    /// ordered by name.
    pub fn search(&self, phrase: &str, shop: ShopId, limit: usize) -> CatalogResult<Vec<ProductForAssociation>> {
        let needle = phrase.to_lowercase();
        let state = self.read()?;
        let mut hits: Vec<&Product> = state
            .products
            .values()
            .filter(|p| p.is_associated_with(shop))
            .filter(|p| {
                p.name.to_lowercase().contains(&needle) || p.reference.to_lowercase().contains(&needle)
            })
            .collect();
        hits.sort_by(|a, b| a.name.cmp(&b.name).then(a.id().cmp(&b.id())));
        Ok(hits
            .into_iter()
            .take(limit)
            .map(|p| ProductForAssociation {
                product_id: p.id(),
                name: p.name.clone(),
                reference: p.reference.clone(),
                image_url: self.image_url(p),
            })
            .collect())
    }

    fn image_url(&self, product: &Product) -> String {
        match &product.cover_image {
            Some(image) => format!("{}/p/{}", self.image_base_url, image),
            None => format!("{}/p/default.jpg", self.image_base_url),
        }
    }
}

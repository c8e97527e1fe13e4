//! Product form binding, validation and handling.

use std::sync::Arc;

use serde::Serialize;
use validator::{Validate, ValidationError};

use backoffice_catalog::{
    AddProduct, CatalogCommandBus, CatalogError, ProductDraft, ProductForEditing, ProductType,
    ShopConstraint, UpdateProduct,
};
use backoffice_core::{CategoryId, ProductId};

/// Upper bound for a product price, in currency units.
pub const PRICE_MAX: f64 = 1_000_000_000.0;

/// Raw product form fields as posted by the browser.
///
/// Every field stays a string until validated so that a typo becomes a
/// field error rather than a rejected request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct ProductForm {
    #[validate(length(min = 1, max = 128, message = "This value should be between 1 and 128 characters long."))]
    pub name: String,
    #[validate(length(max = 64, message = "This value is too long. It should have 64 characters or less."))]
    pub reference: String,
    #[validate(custom(function = "validate_price"))]
    pub price: String,
    #[validate(custom(function = "validate_quantity"))]
    pub quantity: String,
    /// Checkbox: present (any value but `0`) means enabled.
    pub active: Option<String>,
    /// One of [`ProductType::as_str`]; empty means standard.
    #[validate(custom(function = "validate_product_type"))]
    pub product_type: String,
    #[validate(custom(function = "validate_category"))]
    pub category_id: String,
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn validate_price(raw: &String) -> Result<(), ValidationError> {
    match parse_price(raw) {
        Some(value) if value > PRICE_MAX => Err(field_error(
            "price",
            "This value should be less than or equal to 1000000000.",
        )),
        Some(_) => Ok(()),
        None => Err(field_error(
            "price",
            "This value should be a valid non-negative amount.",
        )),
    }
}

fn validate_quantity(raw: &String) -> Result<(), ValidationError> {
    match parse_quantity(raw) {
        Some(_) => Ok(()),
        None => Err(field_error(
            "quantity",
            "This value should be greater than or equal to 0.",
        )),
    }
}

fn validate_product_type(raw: &String) -> Result<(), ValidationError> {
    if raw.trim().is_empty() || ProductType::parse(raw.trim()).is_some() {
        Ok(())
    } else {
        Err(field_error("product_type", "The selected choice is invalid."))
    }
}

fn validate_category(raw: &String) -> Result<(), ValidationError> {
    if raw.trim().is_empty() || raw.trim().parse::<CategoryId>().is_ok() {
        Ok(())
    } else {
        Err(field_error("category", "This value is not a valid category."))
    }
}

fn parse_price(raw: &str) -> Option<f64> {
    let raw = raw.trim().replace(',', ".");
    if raw.is_empty() {
        return Some(0.0);
    }
    let value: f64 = raw.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// `"12.5"` -> 1250. Empty means zero; anything above [`PRICE_MAX`] is
/// rejected.
pub fn parse_price_cents(raw: &str) -> Option<u64> {
    let value = parse_price(raw).filter(|v| *v <= PRICE_MAX)?;
    Some((value * 100.0).round() as u64)
}

pub fn parse_quantity(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0);
    }
    raw.parse::<i64>().ok().filter(|q| *q >= 0)
}

impl ProductForm {
    /// Binds urlencoded pairs. Unknown keys are ignored and the last value of
    /// a repeated key wins, so no posted body is ever rejected here.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut form = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "name" => &mut form.name,
                "reference" => &mut form.reference,
                "price" => &mut form.price,
                "quantity" => &mut form.quantity,
                "product_type" => &mut form.product_type,
                "category_id" => &mut form.category_id,
                "active" => {
                    form.active = Some(value.clone());
                    continue;
                }
                _ => continue,
            };
            slot.clone_from(value);
        }
        form
    }

    pub fn from_product(product: &ProductForEditing) -> Self {
        let draft = &product.draft;
        Self {
            name: draft.name.clone(),
            reference: draft.reference.clone(),
            price: format!("{}.{:02}", draft.price_cents / 100, draft.price_cents % 100),
            quantity: draft.quantity.to_string(),
            active: draft.active.then(|| "1".to_string()),
            product_type: draft.product_type.as_str().to_string(),
            category_id: draft
                .category_id
                .map(|c| c.to_string())
                .unwrap_or_default(),
        }
    }

    /// Only meaningful once [`Validate::validate`] passed.
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.trim().to_string(),
            reference: self.reference.trim().to_string(),
            price_cents: parse_price_cents(&self.price).unwrap_or(0),
            quantity: parse_quantity(&self.quantity).unwrap_or(0),
            active: self.active.as_deref().is_some_and(|v| v.trim() != "0"),
            product_type: ProductType::parse(self.product_type.trim()).unwrap_or_default(),
            category_id: self.category_id.trim().parse().ok(),
        }
    }
}

/// A form bound to a request: either a fresh GET or a submission.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundForm {
    pub submitted: bool,
    pub data: ProductForm,
}

impl BoundForm {
    pub fn empty() -> Self {
        Self {
            submitted: false,
            data: ProductForm::default(),
        }
    }

    pub fn submitted(data: ProductForm) -> Self {
        Self {
            submitted: true,
            data,
        }
    }
}

/// One root-level field error, named by the field it originated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormFieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormHandlerResult {
    pub submitted: bool,
    pub valid: bool,
    pub identifiable_object_id: Option<ProductId>,
    pub errors: Vec<FormFieldError>,
}

impl FormHandlerResult {
    pub fn not_submitted() -> Self {
        Self::default()
    }

    pub fn is_submitted_and_valid(&self) -> bool {
        self.submitted && self.valid
    }
}

/// Validates a bound product form and applies it.
pub trait ProductFormHandler: Send + Sync {
    fn handle_create(
        &self,
        form: &BoundForm,
        shop_constraint: ShopConstraint,
    ) -> Result<FormHandlerResult, CatalogError>;

    fn handle_update(
        &self,
        product_id: ProductId,
        form: &BoundForm,
        shop_constraint: ShopConstraint,
    ) -> Result<FormHandlerResult, CatalogError>;
}

/// Turns `validator` errors into per-field errors, sorted by field name so
/// the flash order is stable.
pub fn field_errors(form: &ProductForm) -> Vec<FormFieldError> {
    let Err(errors) = form.validate() else {
        return Vec::new();
    };
    let mut out: Vec<FormFieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FormFieldError {
                field: field.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

/// Form handler that dispatches add/update commands on the catalog bus.
pub struct CommandBusFormHandler {
    commands: Arc<CatalogCommandBus>,
}

impl CommandBusFormHandler {
    pub fn new(commands: Arc<CatalogCommandBus>) -> Self {
        Self { commands }
    }

    fn check(form: &BoundForm) -> Option<FormHandlerResult> {
        if !form.submitted {
            return Some(FormHandlerResult::not_submitted());
        }
        let errors = field_errors(&form.data);
        if errors.is_empty() {
            return None;
        }
        Some(FormHandlerResult {
            submitted: true,
            valid: false,
            identifiable_object_id: None,
            errors,
        })
    }
}

impl ProductFormHandler for CommandBusFormHandler {
    fn handle_create(
        &self,
        form: &BoundForm,
        shop_constraint: ShopConstraint,
    ) -> Result<FormHandlerResult, CatalogError> {
        if let Some(result) = Self::check(form) {
            return Ok(result);
        }
        let id = self.commands.dispatch(AddProduct {
            draft: form.data.to_draft(),
            shop_constraint,
        })?;
        Ok(FormHandlerResult {
            submitted: true,
            valid: true,
            identifiable_object_id: Some(id),
            errors: Vec::new(),
        })
    }

    fn handle_update(
        &self,
        product_id: ProductId,
        form: &BoundForm,
        shop_constraint: ShopConstraint,
    ) -> Result<FormHandlerResult, CatalogError> {
        if let Some(result) = Self::check(form) {
            return Ok(result);
        }
        self.commands.dispatch(UpdateProduct {
            product_id,
            draft: form.data.to_draft(),
            shop_constraint,
        })?;
        Ok(FormHandlerResult {
            submitted: true,
            valid: true,
            identifiable_object_id: Some(product_id),
            errors: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, price: &str, quantity: &str) -> ProductForm {
        ProductForm {
            name: name.into(),
            price: price.into(),
            quantity: quantity.into(),
            ..ProductForm::default()
        }
    }

    #[test]
    fn valid_form_has_no_errors() {
        assert!(field_errors(&form("Shoe", "12.50", "3")).is_empty());
    }

    #[test]
    fn reports_each_invalid_field_once() {
        let errors = field_errors(&form("", "-1", "x"));
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "price", "quantity"]);
        assert_eq!(
            errors[0].message,
            "This value should be between 1 and 128 characters long."
        );
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn binding_never_rejects_a_body() {
        let form = ProductForm::from_pairs(&pairs(&[
            ("name", "Scarf"),
            ("name", "Hat"),
            ("product_type", "bogus"),
            ("colour", "red"),
        ]));
        assert_eq!(form.name, "Hat");
        assert_eq!(form.product_type, "bogus");

        let errors = field_errors(&form);
        assert_eq!(
            errors,
            vec![FormFieldError {
                field: "product_type".into(),
                message: "The selected choice is invalid.".into(),
            }]
        );
    }

    #[test]
    fn known_product_type_reaches_the_draft() {
        let form = ProductForm::from_pairs(&pairs(&[
            ("name", "E-book"),
            ("product_type", "virtual"),
            ("active", "1"),
        ]));
        assert!(field_errors(&form).is_empty());
        let draft = form.to_draft();
        assert_eq!(draft.product_type, ProductType::Virtual);
        assert!(draft.active);
    }

    #[test]
    fn absurd_prices_are_field_errors() {
        let errors = field_errors(&form("Shoe", "1e300", "1"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "price");
        assert_eq!(
            errors[0].message,
            "This value should be less than or equal to 1000000000."
        );
        assert_eq!(parse_price_cents("1e300"), None);
        assert_eq!(parse_price_cents("1000000000"), Some(100_000_000_000));
    }

    #[test]
    fn converts_to_draft() {
        let mut f = form(" Shoe ", "12,5", "");
        f.active = Some("1".into());
        f.category_id = "3".into();

        let draft = f.to_draft();
        assert_eq!(draft.name, "Shoe");
        assert_eq!(draft.price_cents, 1250);
        assert_eq!(draft.quantity, 0);
        assert!(draft.active);
        assert_eq!(draft.category_id, Some(CategoryId::new(3).unwrap()));
    }

    #[test]
    fn round_trips_existing_product_values() {
        let product = ProductForEditing {
            id: ProductId::new(1).unwrap(),
            product_type: ProductType::Standard,
            active: false,
            draft: ProductDraft {
                name: "Mug".into(),
                price_cents: 1190,
                quantity: 4,
                ..ProductDraft::default()
            },
            virtual_file: None,
        };
        let form = ProductForm::from_product(&product);
        assert_eq!(form.price, "11.90");
        assert_eq!(form.active, None);
        assert_eq!(form.to_draft(), product.draft);
    }

    #[test]
    fn unsubmitted_form_is_not_handled() {
        let handler = CommandBusFormHandler::new(Arc::new(CatalogCommandBus::new()));
        let result = handler
            .handle_create(&BoundForm::empty(), ShopConstraint::AllShops)
            .unwrap();
        assert!(!result.submitted);
    }
}

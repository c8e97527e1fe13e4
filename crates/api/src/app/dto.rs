//! Request parsing and JSON response shapes for the product admin.
//!
//! Browser forms arrive as ordered `(key, value)` pairs so that PHP-style
//! array fields (`product_bulk[]`, `positions[0][rowId]`) can be read
//! without a bespoke deserializer.

use std::collections::BTreeMap;

use serde::Serialize;

use backoffice_catalog::{ProductFilters, ProductForAssociation, RawPositionRow, SortOrder};

pub type FormPairs = Vec<(String, String)>;

pub const BULK_FIELD: &str = "product_bulk";
pub const POSITIONS_FIELD: &str = "positions";
pub const CATEGORY_FIELD: &str = "id_category";

/// Leading-integer coercion: optional sign, then digits, anything after is
/// ignored. `"12abc"` -> 12, `"abc"` -> 0. Saturates instead of overflowing.
pub fn intval(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(b - b'0');
        value = value.saturating_mul(10).saturating_add(digit);
    }
    if negative { -value } else { value }
}

/// Splits `name[a][b]` into `("name", ["a", "b"])`. Malformed keys keep
/// their full text as the name and have no segments.
fn split_key(key: &str) -> (&str, Vec<&str>) {
    let Some(open) = key.find('[') else {
        return (key, Vec::new());
    };
    let (name, mut rest) = key.split_at(open);
    let mut segments = Vec::new();
    while let Some(stripped) = rest.strip_prefix('[') {
        let Some(close) = stripped.find(']') else {
            return (key, Vec::new());
        };
        segments.push(&stripped[..close]);
        rest = &stripped[close + 1..];
    }
    if !rest.is_empty() {
        return (key, Vec::new());
    }
    (name, segments)
}

/// Ids selected in the grid. Only array-shaped fields count: a scalar
/// `product_bulk=5` yields an empty selection.
pub fn bulk_ids(pairs: &[(String, String)]) -> Vec<i64> {
    pairs
        .iter()
        .filter(|(key, _)| {
            let (name, segments) = split_key(key);
            name == BULK_FIELD && segments.len() == 1
        })
        .map(|(_, value)| intval(value))
        .collect()
}

/// The `positions` payload ordered by row index, plus the `id_category`
/// parent. Unknown row fields are ignored.
pub fn position_rows(pairs: &[(String, String)]) -> (Vec<RawPositionRow>, Option<String>) {
    let mut rows: BTreeMap<usize, RawPositionRow> = BTreeMap::new();
    let mut parent = None;
    for (key, value) in pairs {
        if key == CATEGORY_FIELD {
            parent = Some(value.clone());
            continue;
        }
        let (name, segments) = split_key(key);
        let [index, field] = segments.as_slice() else {
            continue;
        };
        if name != POSITIONS_FIELD {
            continue;
        }
        let Ok(index) = index.parse::<usize>() else {
            continue;
        };
        let row = rows.entry(index).or_default();
        match *field {
            "rowId" => row.row_id = Some(value.clone()),
            "oldPosition" => row.old_position = Some(value.clone()),
            "newPosition" => row.new_position = Some(value.clone()),
            _ => {}
        }
    }
    (rows.into_values().collect(), parent)
}

/// Grid filters from a query string or the filter form. Unparsable values
/// are dropped rather than rejected.
pub fn filters_from_pairs(pairs: &[(String, String)]) -> ProductFilters {
    let mut filters = ProductFilters::default();
    for (key, value) in pairs {
        let value = value.trim();
        match key.as_str() {
            "category_id" => filters.category_id = value.parse().ok().filter(|id| *id > 0),
            "offset" => filters.offset = value.parse().unwrap_or(filters.offset),
            "limit" => filters.limit = value.parse().unwrap_or(filters.limit),
            "order_by" => filters.order_by = value.to_string(),
            "sort_order" => {
                filters.sort_order = match value.to_ascii_lowercase().as_str() {
                    "asc" => SortOrder::Asc,
                    _ => SortOrder::Desc,
                }
            }
            "name" => filters.name = Some(value.to_string()),
            "reference" => filters.reference = Some(value.to_string()),
            "active" => filters.active = Some(value.to_string()),
            _ => {}
        }
    }
    filters.normalized()
}

/// `"Shoe"` + `"SKU1"` -> `"Shoe (ref: SKU1)"`; an empty reference leaves
/// the name untouched.
pub fn association_name(name: &str, reference: &str) -> String {
    if reference.is_empty() {
        name.to_string()
    } else {
        format!("{name} (ref: {reference})")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssociationEntry {
    pub id: u32,
    pub name: String,
    pub image: String,
}

impl From<&ProductForAssociation> for AssociationEntry {
    fn from(product: &ProductForAssociation) -> Self {
        Self {
            id: product.product_id.value(),
            name: association_name(&product.name, &product.reference),
            image: product.image_url.clone(),
        }
    }
}

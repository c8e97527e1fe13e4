//! Drag-and-drop position updates within a category.
//!
//! The grid posts raw rows (`rowId`, `oldPosition`, `newPosition`) plus the
//! category being reordered. [`PositionUpdate::build`] turns that untrusted
//! payload into a typed update, or into the full list of problems found.

use backoffice_core::{CategoryId, ProductId};

/// A translatable, structured error: a message key plus its parameters.
///
/// Parameters are substituted by the translator, e.g. `%field%`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionError {
    pub key: String,
    pub parameters: Vec<(String, String)>,
}

impl PositionError {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with(mut self, name: &str, value: impl ToString) -> Self {
        self.parameters.push((name.to_string(), value.to_string()));
        self
    }
}

/// One row of the posted `positions` payload, as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPositionRow {
    pub row_id: Option<String>,
    pub old_position: Option<String>,
    pub new_position: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRow {
    pub product_id: ProductId,
    pub old_position: u32,
    pub new_position: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionUpdate {
    pub category_id: CategoryId,
    pub rows: Vec<PositionRow>,
}

impl PositionUpdate {
    pub fn build(
        rows: Vec<RawPositionRow>,
        parent_id: Option<&str>,
    ) -> Result<PositionUpdate, Vec<PositionError>> {
        let mut errors = Vec::new();

        let category_id = match parent_id.map(str::trim).filter(|s| !s.is_empty()) {
            None => {
                errors.push(PositionError::new("Missing parent id in your data."));
                None
            }
            Some(raw) => match raw.parse::<CategoryId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.push(
                        PositionError::new("Invalid parent id %id% in your data.").with("%id%", raw),
                    );
                    None
                }
            },
        };

        if rows.is_empty() {
            errors.push(PositionError::new("Missing positions in your data."));
        }

        let mut parsed = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            let product_id = field(&mut errors, index, "rowId", row.row_id.as_deref())
                .and_then(|raw| {
                    ProductId::try_from(raw).map_err(|_| {
                        errors.push(invalid(index, "rowId", raw));
                    }).ok()
                });
            let old_position = position(&mut errors, index, "oldPosition", row.old_position.as_deref());
            let new_position = position(&mut errors, index, "newPosition", row.new_position.as_deref());

            if let (Some(product_id), Some(old_position), Some(new_position)) =
                (product_id, old_position, new_position)
            {
                parsed.push(PositionRow {
                    product_id,
                    old_position,
                    new_position,
                });
            }
        }

        match category_id {
            Some(category_id) if errors.is_empty() => Ok(PositionUpdate {
                category_id,
                rows: parsed,
            }),
            _ => Err(errors),
        }
    }
}

fn field(errors: &mut Vec<PositionError>, index: usize, name: &str, raw: Option<&str>) -> Option<i64> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        errors.push(
            PositionError::new("Missing %field% in row %row% of your data.")
                .with("%field%", name)
                .with("%row%", index),
        );
        return None;
    };
    match raw.parse::<i64>() {
        Ok(v) => Some(v),
        Err(_) => {
            errors.push(
                PositionError::new("Invalid %field% \"%value%\" in row %row% of your data.")
                    .with("%field%", name)
                    .with("%value%", raw)
                    .with("%row%", index),
            );
            None
        }
    }
}

fn position(errors: &mut Vec<PositionError>, index: usize, name: &str, raw: Option<&str>) -> Option<u32> {
    let value = field(errors, index, name, raw)?;
    match u32::try_from(value) {
        Ok(v) => Some(v),
        Err(_) => {
            errors.push(invalid(index, name, value));
            None
        }
    }
}

fn invalid(index: usize, name: &str, value: i64) -> PositionError {
    PositionError::new("Invalid %field% \"%value%\" in row %row% of your data.")
        .with("%field%", name)
        .with("%value%", value)
        .with("%row%", index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, old: &str, new: &str) -> RawPositionRow {
        RawPositionRow {
            row_id: Some(id.into()),
            old_position: Some(old.into()),
            new_position: Some(new.into()),
        }
    }

    #[test]
    fn builds_a_typed_update() {
        let update = PositionUpdate::build(vec![row("4", "0", "2"), row("9", "2", "0")], Some("3"))
            .unwrap();

        assert_eq!(update.category_id.value(), 3);
        assert_eq!(update.rows.len(), 2);
        assert_eq!(update.rows[0].product_id.value(), 4);
        assert_eq!(update.rows[0].new_position, 2);
    }

    #[test]
    fn reports_missing_parent_and_positions_together() {
        let errors = PositionUpdate::build(vec![], None).unwrap_err();
        let keys: Vec<_> = errors.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["Missing parent id in your data.", "Missing positions in your data."]
        );
    }

    #[test]
    fn reports_every_bad_field() {
        let errors = PositionUpdate::build(
            vec![
                RawPositionRow {
                    row_id: Some("5".into()),
                    old_position: None,
                    new_position: Some("x".into()),
                },
                row("0", "1", "-1"),
            ],
            Some("2"),
        )
        .unwrap_err();

        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0].key, "Missing %field% in row %row% of your data.");
        assert_eq!(
            errors[0].parameters,
            vec![("%field%".to_string(), "oldPosition".to_string()), ("%row%".to_string(), "0".to_string())]
        );
        assert!(errors[1].parameters.contains(&("%value%".to_string(), "x".to_string())));
        assert!(errors[2].parameters.contains(&("%field%".to_string(), "rowId".to_string())));
        assert!(errors[3].parameters.contains(&("%value%".to_string(), "-1".to_string())));
    }
}

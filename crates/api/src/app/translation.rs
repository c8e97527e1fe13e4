//! User-facing text lookup.

/// Translates a message key, substituting `%name%`-style parameters.
pub trait Translator: Send + Sync {
    fn trans(&self, key: &str, params: &[(String, String)]) -> String;
}

/// Keys are English source strings, so the English catalog is the identity
/// plus parameter substitution.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishTranslator;

impl Translator for EnglishTranslator {
    fn trans(&self, key: &str, params: &[(String, String)]) -> String {
        substitute(key, params)
    }
}

/// Replace every placeholder in `template` with its value. Placeholders are
/// matched literally, so `%field%` and `%s` both work.
///
/// Single pass over the template: substituted values are never scanned
/// again. Where two placeholders match at the same offset the longer wins.
pub fn substitute(template: &str, params: &[(String, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while !rest.is_empty() {
        let hit = params
            .iter()
            .filter(|(placeholder, _)| !placeholder.is_empty() && rest.starts_with(placeholder.as_str()))
            .max_by_key(|(placeholder, _)| placeholder.len());
        match hit {
            Some((placeholder, value)) => {
                out.push_str(value);
                rest = &rest[placeholder.len()..];
            }
            None => {
                let mut chars = rest.chars();
                if let Some(c) = chars.next() {
                    out.push(c);
                }
                rest = chars.as_str();
            }
        }
    }
    out
}

pub fn param(name: &str, value: impl ToString) -> (String, String) {
    (name.to_string(), value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_each_placeholder() {
        let text = EnglishTranslator.trans(
            "Missing %field% in row %row% of your data.",
            &[param("%field%", "rowId"), param("%row%", 2)],
        );
        assert_eq!(text, "Missing rowId in row 2 of your data.");
    }

    #[test]
    fn unknown_placeholders_are_left_alone() {
        assert_eq!(
            EnglishTranslator.trans("Could not update #%i%", &[]),
            "Could not update #%i%"
        );
    }

    #[test]
    fn values_are_not_substituted_again() {
        let text = substitute(
            "Invalid %field% \"%value%\" in row %row%",
            &[
                param("%field%", "rowId"),
                param("%value%", "%row%"),
                param("%row%", 3),
            ],
        );
        assert_eq!(text, "Invalid rowId \"%row%\" in row 3");
    }

    #[test]
    fn longest_placeholder_wins() {
        assert_eq!(
            substitute("%s and %sku%", &[param("%s", "x"), param("%sku%", "SKU1")]),
            "x and SKU1"
        );
    }
}

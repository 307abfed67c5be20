//! User-facing text for validation errors.
//!
//! The engine only ever produces [`ErrorKind`]s. A [`MessageCatalog`] turns
//! them into text; [`EnglishCatalog`] is the built-in one, and a plain
//! `HashMap` keyed by [`ErrorKind::key`] works as a translation table that
//! falls back to English for missing entries.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::validate::{ErrorKind, ValidationError};

pub trait MessageCatalog {
    fn message(&self, kind: ErrorKind) -> Cow<'static, str>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishCatalog;

impl MessageCatalog for EnglishCatalog {
    fn message(&self, kind: ErrorKind) -> Cow<'static, str> {
        Cow::Borrowed(kind.describe())
    }
}

impl MessageCatalog for HashMap<String, String> {
    fn message(&self, kind: ErrorKind) -> Cow<'static, str> {
        match self.get(kind.key()) {
            Some(text) => Cow::Owned(text.clone()),
            None => EnglishCatalog.message(kind),
        }
    }
}

impl<C: MessageCatalog + ?Sized> MessageCatalog for &C {
    fn message(&self, kind: ErrorKind) -> Cow<'static, str> {
        (**self).message(kind)
    }
}

impl ValidationError {
    /// Render through `catalog`, followed by the position.
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use bomlogic::Validator;
    ///
    /// let err = Validator::default().validate("K001 K002 → B100").unwrap_err();
    /// let mut german = HashMap::new();
    /// german.insert(
    ///     "consecutive_codes".to_owned(),
    ///     "Codes müssen durch einen Operator getrennt sein".to_owned(),
    /// );
    /// assert_eq!(
    ///     err.render(&german),
    ///     "Codes müssen durch einen Operator getrennt sein (position 5)"
    /// );
    /// ```
    #[must_use]
    pub fn render<C: MessageCatalog + ?Sized>(&self, catalog: &C) -> String {
        format!("{} (position {})", catalog.message(self.kind()), self.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Validator;

    #[test]
    fn english_matches_describe() {
        for kind in ErrorKind::ALL {
            assert_eq!(EnglishCatalog.message(*kind), kind.describe());
        }
    }

    #[test]
    fn table_falls_back_to_english() {
        let mut table = HashMap::new();
        table.insert("empty_effect".to_owned(), "rien après →".to_owned());
        assert_eq!(table.message(ErrorKind::EmptyEffect), "rien après →");
        assert_eq!(
            table.message(ErrorKind::EmptyExpression),
            ErrorKind::EmptyExpression.describe()
        );
    }

    #[test]
    fn render_with_trait_object() {
        let err = Validator::default().validate("K1 →").unwrap_err();
        let catalog: &dyn MessageCatalog = &EnglishCatalog;
        assert_eq!(
            err.render(catalog),
            "nothing follows the implication operator (position 4)"
        );
    }
}

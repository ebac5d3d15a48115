use serde::Serialize;
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
};

/// Validation errors collected while processing a submitted form. Non-field errors describe the
/// form as a whole, field errors are rendered next to the corresponding inputs.
#[derive(Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct FormErrors {
    pub non_field: Vec<String>,
    pub fields: BTreeMap<&'static str, Vec<String>>,
}

impl FormErrors {
    /// Adds an error that isn't attached to any specific field.
    pub fn add(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    /// Adds an error for the specified field.
    pub fn add_field(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    /// Returns errors reported for the specified field.
    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has_field(&self, field: &str) -> bool {
        !self.field(field).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.non_field.is_empty() && self.fields.is_empty()
    }

    /// Turns non-empty errors into an `anyhow` error that can be downcast back by the handlers.
    pub fn into_result(self) -> anyhow::Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.into())
        }
    }
}

impl Display for FormErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let messages = self
            .non_field
            .iter()
            .cloned()
            .chain(
                self.fields
                    .iter()
                    .flat_map(|(field, errors)| errors.iter().map(move |e| format!("{field}: {e}"))),
            )
            .collect::<Vec<_>>();
        write!(f, "{}", messages.join(" "))
    }
}

impl std::error::Error for FormErrors {}

use std::fmt::{self, Debug, Formatter};

use zeroize::Zeroizing;

/// A single line of text input owned by a form.
///
/// The value lives in zeroizing storage so secure entries don't linger in memory after they
/// are replaced or cleared.
#[derive(Clone)]
pub struct TextField {
    label: &'static str,
    placeholder: &'static str,
    secure: bool,
    value: Zeroizing<String>,
}

impl TextField {
    pub fn new(label: &'static str, placeholder: &'static str) -> Self {
        Self {
            label,
            placeholder,
            secure: false,
            value: Zeroizing::new(String::new()),
        }
    }

    /// Mask the input of this field
    pub fn secure(mut self) -> Self {
        self.secure = true;
        self
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Zeroizing::new(value.into());
    }

    pub fn clear(&mut self) {
        self.value = Zeroizing::new(String::new());
    }

    /// Move the value out, leaving the field empty.
    pub fn take(&mut self) -> Zeroizing<String> {
        std::mem::replace(&mut self.value, Zeroizing::new(String::new()))
    }
}

impl Debug for TextField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let value = if self.secure { "<hidden>" } else { self.value.as_str() };

        f.debug_struct("TextField")
            .field("label", &self.label)
            .field("secure", &self.secure)
            .field("value", &value)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_take_leaves_empty() {
        let mut field = TextField::new("Name", "");
        field.set_value("Vault");

        assert_eq!(field.take().as_str(), "Vault");
        assert!(field.is_empty());
    }

    #[test]
    fn test_debug_hides_secure_value() {
        let mut field = TextField::new("Password", "").secure();
        field.set_value("hunter2");

        let debug = format!("{field:?}");

        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<hidden>"));
    }
}

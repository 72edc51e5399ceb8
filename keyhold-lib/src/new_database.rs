//! The "create new database" screen.

use std::fmt::{self, Debug, Formatter};

use getset::{CopyGetters, Getters};
use strum::{EnumIter, IntoEnumIterator};
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroizing;

use crate::{
    form::{EditingEnd, FormScreen, Node, Phase, SubmitError, TextField, View},
    version::KdbVersion,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum FieldId {
    Name,
    Password,
    Confirmation,
}

impl FieldId {
    /// The field that receives focus after this one, in layout order
    pub fn next(self) -> Option<Self> {
        match self {
            FieldId::Name => Some(FieldId::Password),
            FieldId::Password => Some(FieldId::Confirmation),
            FieldId::Confirmation => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("A database name is required")]
    MissingName,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl ValidationError {
    /// The field the error is reported next to
    pub fn field(self) -> FieldId {
        match self {
            ValidationError::MissingName => FieldId::Name,
            ValidationError::PasswordMismatch => FieldId::Confirmation,
        }
    }

    /// Whether editing `id` could resolve this error
    fn clears_on_edit(self, id: FieldId) -> bool {
        match self {
            ValidationError::MissingName => id == FieldId::Name,
            ValidationError::PasswordMismatch => {
                matches!(id, FieldId::Password | FieldId::Confirmation)
            }
        }
    }
}

/// A request to create a new database, produced by an accepted [`NewDatabaseForm`].
#[derive(Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct NewDatabase {
    #[getset(get = "pub")]
    name: String,
    password: Zeroizing<String>,
    #[getset(get_copy = "pub")]
    version: KdbVersion,
}

impl NewDatabase {
    pub fn new(name: impl Into<String>, password: impl Into<String>, version: KdbVersion) -> Self {
        Self {
            name: name.into(),
            password: Zeroizing::new(password.into()),
            version,
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn file_name(&self) -> String {
        self.version.file_name(&self.name)
    }
}

impl Debug for NewDatabase {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewDatabase")
            .field("name", &self.name)
            .field("password", &"<hidden>")
            .field("version", &self.version)
            .finish()
    }
}

/// Collects the name, master password and format version of a database to be created.
#[derive(Debug, Clone)]
pub struct NewDatabaseForm {
    name: TextField,
    password: TextField,
    confirmation: TextField,
    version: KdbVersion,
    focused: Option<FieldId>,
    phase: Phase,
    error: Option<ValidationError>,
}

impl NewDatabaseForm {
    pub fn new(version: KdbVersion) -> Self {
        Self {
            name: TextField::new("Name", "Database name"),
            password: TextField::new("Password", "Master password").secure(),
            confirmation: TextField::new("Confirm", "Confirm password").secure(),
            version,
            focused: Some(FieldId::Name),
            phase: Phase::Editing,
            error: None,
        }
    }

    /// Reset the screen to its initial state, keeping the selected version
    pub fn clear(&mut self) {
        *self = Self::new(self.version);
    }

    /// Reopen the screen prefilled with a request the collaborator refused, so the user can
    /// correct it instead of starting over.
    pub fn restore(&mut self, request: NewDatabase) {
        let NewDatabase {
            name,
            password,
            version,
        } = request;

        *self = Self::new(version);
        self.name.set_value(name);
        self.confirmation.set_value(password.as_str());
        self.password.set_value(password.as_str());
    }

    pub fn field(&self, id: FieldId) -> &TextField {
        match id {
            FieldId::Name => &self.name,
            FieldId::Password => &self.password,
            FieldId::Confirmation => &self.confirmation,
        }
    }

    fn field_mut(&mut self, id: FieldId) -> &mut TextField {
        match id {
            FieldId::Name => &mut self.name,
            FieldId::Password => &mut self.password,
            FieldId::Confirmation => &mut self.confirmation,
        }
    }

    /// Replace the contents of a field. Ignored once the form has completed.
    pub fn edit(&mut self, id: FieldId, value: impl Into<String>) {
        if self.phase == Phase::Completed {
            return;
        }

        self.field_mut(id).set_value(value);
        self.focused = Some(id);

        if self.error.is_some_and(|e| e.clears_on_edit(id)) {
            self.error = None;
        }
    }

    pub fn select_version(&mut self, version: KdbVersion) {
        if self.phase != Phase::Completed {
            self.version = version;
        }
    }

    pub fn focus(&mut self, id: FieldId) {
        self.focused = Some(id);
    }

    pub fn version(&self) -> KdbVersion {
        self.version
    }

    pub fn focused(&self) -> Option<FieldId> {
        self.focused
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn error(&self) -> Option<ValidationError> {
        self.error
    }

    fn trimmed_name(&self) -> &str {
        self.name.value().trim()
    }

    fn footer(&self) -> Vec<String> {
        let mut lines = vec![self.version.description().to_string()];

        let name = self.trimmed_name();
        if !name.is_empty() {
            lines.push(format!("Will be saved as {}", self.version.file_name(name)));
        }

        lines
    }

    fn text_node(&self, id: FieldId) -> Node<'_, FieldId> {
        let field = self.field(id);

        Node::TextField {
            field: id,
            label: field.label(),
            placeholder: field.placeholder(),
            value: field.value(),
            secure: field.is_secure(),
            focused: self.focused == Some(id),
        }
    }
}

impl Default for NewDatabaseForm {
    fn default() -> Self {
        Self::new(KdbVersion::default())
    }
}

impl FormScreen for NewDatabaseForm {
    type Field = FieldId;
    type Output = NewDatabase;
    type Invalid = ValidationError;

    fn render(&self) -> View<'_, FieldId> {
        let mut nodes: Vec<Node<'_, FieldId>> = FieldId::iter().map(|id| self.text_node(id)).collect();

        if !self.confirmation.is_empty() && self.password.value() != self.confirmation.value() {
            nodes.push(Node::Hint {
                field: FieldId::Confirmation,
                message: ValidationError::PasswordMismatch.to_string(),
            });
        }

        nodes.push(Node::Selector {
            label: "Version",
            options: KdbVersion::iter().map(|v| v.to_string()).collect(),
            selected: KdbVersion::iter()
                .position(|v| v == self.version)
                .unwrap_or_default(),
        });

        if let Some(error) = self.error {
            nodes.push(Node::Error {
                field: error.field(),
                message: error.to_string(),
            });
        }

        View {
            title: "New Database",
            nodes,
            footer: self.footer(),
        }
    }

    fn on_field_editing_end(&mut self, field: FieldId) -> EditingEnd<FieldId> {
        self.focused = field.next();

        match self.focused {
            Some(next) => EditingEnd::Focus(next),
            None => EditingEnd::Release,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.trimmed_name().is_empty() {
            return Err(ValidationError::MissingName);
        }

        if self.password.value() != self.confirmation.value() {
            return Err(ValidationError::PasswordMismatch);
        }

        Ok(())
    }

    fn submit(&mut self) -> Result<NewDatabase, SubmitError<ValidationError>> {
        if self.phase == Phase::Completed {
            return Err(SubmitError::Completed);
        }

        self.phase = Phase::Validating;

        if let Err(error) = self.validate() {
            debug!("Rejected new database form: {error}");
            self.error = Some(error);
            self.focused = Some(error.field());
            self.phase = Phase::Editing;
            return Err(SubmitError::Invalid(error));
        }

        let name = self.trimmed_name().to_string();
        self.name.clear();
        self.confirmation.clear();

        let request = NewDatabase {
            name,
            password: self.password.take(),
            version: self.version,
        };

        self.error = None;
        self.focused = None;
        self.phase = Phase::Completed;

        debug!("Accepted new database form: {request:?}");

        Ok(request)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn filled(name: &str, password: &str, confirmation: &str) -> NewDatabaseForm {
        let mut form = NewDatabaseForm::default();
        form.edit(FieldId::Name, name);
        form.edit(FieldId::Password, password);
        form.edit(FieldId::Confirmation, confirmation);
        form
    }

    #[test]
    fn test_validate_ok() {
        for (name, password) in [("Vault", "abc123"), ("a", "x"), ("Work Passwords", "  spaced  ")] {
            assert_eq!(filled(name, password, password).validate(), Ok(()));
        }
    }

    #[test]
    fn test_validate_mismatch() {
        for (a, b) in [("abc123", "xyz999"), ("abc", ""), ("", "abc"), ("abc", "abc ")] {
            assert_eq!(
                filled("Vault", a, b).validate(),
                Err(ValidationError::PasswordMismatch)
            );
        }
    }

    #[test]
    fn test_validate_missing_name() {
        for (a, b) in [("", ""), ("abc", "abc"), ("abc", "xyz")] {
            assert_eq!(filled("", a, b).validate(), Err(ValidationError::MissingName));
        }

        assert_eq!(
            filled("   ", "abc", "abc").validate(),
            Err(ValidationError::MissingName)
        );
    }

    #[test]
    fn test_empty_password_left_to_policy() {
        assert_eq!(filled("Vault", "", "").validate(), Ok(()));
    }

    #[test]
    fn test_submit() {
        let mut form = filled("Vault", "abc123", "abc123");
        form.select_version(KdbVersion::V2);

        let request = form.submit().unwrap();

        assert_eq!(request.name(), "Vault");
        assert_eq!(request.password(), "abc123");
        assert_eq!(request.version(), KdbVersion::V2);
        assert_eq!(request.version().to_string(), "Version 2");
        assert_eq!(form.phase(), Phase::Completed);
    }

    #[test]
    fn test_submit_mismatch() {
        let mut form = filled("Vault", "abc123", "xyz999");

        assert_eq!(
            form.submit(),
            Err(SubmitError::Invalid(ValidationError::PasswordMismatch))
        );
        assert_eq!(form.phase(), Phase::Editing);
        assert_eq!(form.error(), Some(ValidationError::PasswordMismatch));
        assert_eq!(form.focused(), Some(FieldId::Confirmation));
        // Nothing was consumed
        assert_eq!(form.field(FieldId::Password).value(), "abc123");
    }

    #[test]
    fn test_submit_missing_name() {
        let mut form = filled("", "", "");

        assert_eq!(
            form.submit(),
            Err(SubmitError::Invalid(ValidationError::MissingName))
        );
        assert_eq!(form.phase(), Phase::Editing);
    }

    #[test]
    fn test_submit_trims_name() {
        let mut form = filled("  Vault  ", "abc123", "abc123");

        assert_eq!(form.submit().unwrap().name(), "Vault");
    }

    #[test]
    fn test_completed_is_terminal() {
        let mut form = filled("Vault", "abc123", "abc123");
        form.submit().unwrap();

        form.edit(FieldId::Name, "Other");
        form.select_version(KdbVersion::V1);

        assert!(form.field(FieldId::Name).is_empty());
        assert!(form.field(FieldId::Password).is_empty());
        assert!(form.field(FieldId::Confirmation).is_empty());
        assert_eq!(form.version(), KdbVersion::V2);
        assert_eq!(form.submit(), Err(SubmitError::Completed));
    }

    #[test]
    fn test_retry_after_failure() {
        let mut form = filled("Vault", "abc123", "xyz999");
        assert!(form.submit().is_err());

        form.edit(FieldId::Confirmation, "abc123");

        assert_eq!(form.error(), None);
        assert_eq!(form.submit().unwrap().password(), "abc123");
    }

    #[test]
    fn test_error_kept_while_unresolved() {
        let mut form = filled("", "", "");
        assert!(form.submit().is_err());

        form.edit(FieldId::Password, "abc123");
        form.edit(FieldId::Confirmation, "abc123");

        assert_eq!(form.error(), Some(ValidationError::MissingName));
        assert_eq!(form.render().error(), Some("A database name is required"));

        form.edit(FieldId::Name, "Vault");

        assert_eq!(form.error(), None);
    }

    #[test]
    fn test_mismatch_cleared_by_either_password() {
        let mut form = filled("Vault", "abc123", "xyz999");
        assert!(form.submit().is_err());

        form.edit(FieldId::Name, "Vault 2");
        assert_eq!(form.error(), Some(ValidationError::PasswordMismatch));

        form.edit(FieldId::Password, "xyz999");
        assert_eq!(form.error(), None);
    }

    #[test]
    fn test_restore() {
        let mut form = filled("Vault", "", "");
        form.select_version(KdbVersion::V1);
        let request = form.submit().unwrap();

        form.restore(request);

        assert_eq!(form.phase(), Phase::Editing);
        assert_eq!(form.field(FieldId::Name).value(), "Vault");
        assert!(form.field(FieldId::Password).is_empty());
        assert_eq!(form.version(), KdbVersion::V1);
        assert_eq!(form.validate(), Ok(()));

        form.edit(FieldId::Password, "abc123");
        form.edit(FieldId::Confirmation, "abc123");

        assert_eq!(form.submit().unwrap().password(), "abc123");
    }

    #[test]
    fn test_clear() {
        let mut form = filled("Vault", "abc123", "abc123");
        form.select_version(KdbVersion::V1);
        form.submit().unwrap();

        form.clear();

        assert_eq!(form.phase(), Phase::Editing);
        assert_eq!(form.version(), KdbVersion::V1);
        assert_eq!(form.focused(), Some(FieldId::Name));
    }

    #[test]
    fn test_focus_traversal() {
        let mut form = NewDatabaseForm::default();

        assert_eq!(
            form.on_field_editing_end(FieldId::Name),
            EditingEnd::Focus(FieldId::Password)
        );
        assert_eq!(
            form.on_field_editing_end(FieldId::Password),
            EditingEnd::Focus(FieldId::Confirmation)
        );
        assert_eq!(
            form.on_field_editing_end(FieldId::Confirmation),
            EditingEnd::Release
        );
        assert_eq!(form.focused(), None);
    }

    #[test]
    fn test_render_fields() {
        let form = filled("Vault", "abc123", "abc123");
        let view = form.render();

        assert_eq!(view.title, "New Database");
        assert!(matches!(
            view.text_field(FieldId::Name),
            Some(Node::TextField { value: "Vault", secure: false, .. })
        ));
        assert!(matches!(
            view.text_field(FieldId::Password),
            Some(Node::TextField { secure: true, .. })
        ));
        assert!(matches!(
            view.text_field(FieldId::Confirmation),
            Some(Node::TextField { secure: true, .. })
        ));
        assert!(view.nodes.iter().any(|node| matches!(
            node,
            Node::Selector { selected: 1, options, .. } if options.len() == 2
        )));
        assert_eq!(view.hint(), None);
        assert_eq!(view.error(), None);
    }

    #[test]
    fn test_render_footer() {
        let mut form = NewDatabaseForm::new(KdbVersion::V1);
        assert_eq!(form.render().footer, [KdbVersion::V1.description()]);

        form.edit(FieldId::Name, "Vault");

        assert_eq!(
            form.render().footer.last().map(String::as_str),
            Some("Will be saved as Vault.kdb")
        );
    }

    #[test]
    fn test_render_mismatch_hint_and_error() {
        let mut form = filled("Vault", "abc123", "abc");
        assert_eq!(form.render().hint(), Some("Passwords do not match"));

        let _ = form.submit();

        assert_eq!(form.render().error(), Some("Passwords do not match"));
    }

    #[test]
    fn test_debug_hides_password() {
        let request = NewDatabase::new("Vault", "abc123", KdbVersion::V2);

        assert!(!format!("{request:?}").contains("abc123"));
        assert_eq!(request.file_name(), "Vault.kdbx");
    }
}

use iced::{
    Element, Task,
    advanced::widget::{Id, operate, operation::focusable},
    widget::{Column, button, container, pick_list, row, space, text, text_input},
};
use keyhold_lib::{
    FieldId, KdbVersion, NewDatabase, NewDatabaseForm,
    form::{EditingEnd, FormScreen, Node, SubmitError},
};
use strum::IntoEnumIterator;
use tracing::debug;

#[derive(Debug, Clone)]
pub enum Message {
    FieldInput(FieldId, String),
    /// Enter was pressed in a field
    FieldSubmitted(FieldId),
    VersionSelected(KdbVersion),
    CancelPressed,
    CreatePressed,
}

/// Action used for communicating with the parent component
#[derive(Debug)]
pub enum Action {
    None,
    Run(Task<Message>),
    Cancel,
    Create(NewDatabase),
}

pub struct NewDatabaseDialog {
    form: NewDatabaseForm,
    versions: Vec<KdbVersion>,
    /// The request handed to the library, kept until it answers
    pending: Option<NewDatabase>,
    /// Why the library refused the last request
    rejection: Option<String>,
}

impl NewDatabaseDialog {
    pub fn new(version: KdbVersion) -> (Self, Task<Message>) {
        (
            Self {
                form: NewDatabaseForm::new(version),
                versions: KdbVersion::iter().collect(),
                pending: None,
                rejection: None,
            },
            Task::none(),
        )
    }

    /// Reset the dialog state
    pub fn clear(&mut self) {
        self.form.clear();
        self.pending = None;
        self.rejection = None;
    }

    /// The library created the pending database
    pub fn created(&mut self) {
        self.clear();
    }

    /// The library refused the pending database. Refills the form so it can be corrected.
    ///
    /// Returns `false` if nothing was pending, e.g. because the dialog was cancelled meanwhile.
    pub fn rejected(&mut self, reason: &str) -> bool {
        match self.pending.take() {
            Some(new_database) => {
                self.form.restore(new_database);
                self.rejection = Some(reason.to_string());
                true
            }
            None => false,
        }
    }

    /// Focus the first field, for when the dialog is shown
    pub fn focus_first(&mut self) -> Task<Message> {
        self.form.focus(FieldId::Name);
        focus(FieldId::Name)
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::FieldInput(field, content) => {
                self.form.edit(field, content);
                self.rejection = None;
                Action::None
            }
            Message::FieldSubmitted(field) => match self.form.on_field_editing_end(field) {
                EditingEnd::Focus(next) => Action::Run(focus(next)),
                EditingEnd::Release => self.submit(),
            },
            Message::VersionSelected(version) => {
                self.form.select_version(version);
                Action::None
            }
            Message::CancelPressed => {
                self.clear();
                Action::Cancel
            }
            Message::CreatePressed => self.submit(),
        }
    }

    fn submit(&mut self) -> Action {
        match self.form.submit() {
            Ok(new_database) => {
                self.rejection = None;
                self.pending = Some(new_database.clone());
                Action::Create(new_database)
            }
            Err(SubmitError::Invalid(error)) => Action::Run(focus(error.field())),
            Err(SubmitError::Completed) => {
                debug!("Ignoring submit of a completed form");
                Action::None
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let view = self.form.render();

        let mut content = Column::new()
            .spacing(10)
            .push(text(view.title).size(20));

        for node in view.nodes {
            let element: Element<'_, Message> = match node {
                Node::TextField {
                    field,
                    label,
                    placeholder,
                    value,
                    secure,
                    ..
                } => row![
                    text(label).width(100),
                    text_input(placeholder, value)
                        .id(widget_id(field))
                        .secure(secure)
                        .on_input(move |content| Message::FieldInput(field, content))
                        .on_submit(Message::FieldSubmitted(field)),
                ]
                .into(),
                Node::Selector { label, .. } => row![
                    text(label).width(100),
                    pick_list(
                        self.versions.as_slice(),
                        Some(self.form.version()),
                        Message::VersionSelected
                    ),
                ]
                .into(),
                Node::Hint { message, .. } => text(message).size(12).style(text::secondary).into(),
                Node::Error { message, .. } => text(message).style(text::danger).into(),
            };

            content = content.push(element);
        }

        if let Some(reason) = &self.rejection {
            content = content.push(text(reason).style(text::danger));
        }

        // Footer
        content = content.push(space::vertical());
        for line in view.footer {
            content = content.push(text(line).size(12).style(text::secondary));
        }

        content = content.push(row![
            space::horizontal(),
            button("Cancel").on_press(Message::CancelPressed),
            button("Create")
                .on_press_maybe(self.form.validate().is_ok().then_some(Message::CreatePressed)),
        ]);

        container(content)
            .padding(20)
            .width(420)
            .height(460)
            .style(container::rounded_box)
            .into()
    }
}

fn widget_id(field: FieldId) -> Id {
    Id::new(match field {
        FieldId::Name => "new-database-name",
        FieldId::Password => "new-database-password",
        FieldId::Confirmation => "new-database-confirmation",
    })
}

fn focus(field: FieldId) -> Task<Message> {
    operate(focusable::focus(widget_id(field)))
}

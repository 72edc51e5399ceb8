use derive_more::{Deref, DerefMut};
use iced::{
    Color, Element,
    Length::{self, Fill},
    Task, Theme, application,
    widget::{button, center, column, container, mouse_area, opaque, row, space, stack, text},
};
use keyhold_lib::{DatabaseCreator, DatabaseEntry, KdbVersion, Library, config::CoreConfig};
use tokio::task::spawn_blocking;
use tracing::{Level, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::{
    components::{
        database_list::{self, DatabaseList},
        new_database_dialog::{self, NewDatabaseDialog},
    },
    config::GuiConfig,
};

pub mod components;
pub mod config;

fn main() -> iced::Result {
    application(App::new, App::update, App::view)
        .theme(App::theme)
        .title(App::title)
        .run()
}

#[derive(Debug, Clone)]
enum Message {
    NewDatabaseButtonPressed,
    DatabaseCreated(Result<DatabaseEntry, String>),
    // Components
    DatabaseList(database_list::Message),
    NewDatabaseDialog(new_database_dialog::Message),
}

struct App {
    title: String,
    theme: Theme,
    /// `None` if the library couldn't be opened
    library: Option<Library>,
    status: Option<Status>,
    // Components
    database_list: DatabaseList,
    new_database_dialog: Dialog,
}

enum Status {
    Created(String),
    Failed(String),
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        // Human friendly panicking in release mode
        human_panic::setup_panic!();

        // Logging
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::TRACE)
            .with_env_filter(EnvFilter::from_default_env())
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("setting default subscriber failed");

        let gui_cfg = GuiConfig::load();
        let (library, default_version, (database_list, database_list_task)) = match open_library() {
            Ok((library, default_version)) => {
                let list = DatabaseList::new(library.clone());
                (Some(library), default_version, list)
            }
            Err(e) => {
                error!("Failed to open the database library: {e}");
                (
                    None,
                    KdbVersion::default(),
                    (DatabaseList::unavailable(e.to_string()), Task::none()),
                )
            }
        };

        let (new_database_dialog, new_database_dialog_task) =
            NewDatabaseDialog::new(default_version);

        (
            Self {
                title: "Keyhold".into(),
                theme: gui_cfg.theme(),
                library,
                status: None,
                database_list,
                new_database_dialog: Dialog {
                    dialog: new_database_dialog,
                    visible: false,
                },
            },
            Task::batch([
                database_list_task.map(Message::DatabaseList),
                new_database_dialog_task.map(Message::NewDatabaseDialog),
            ]),
        )
    }

    // Update application state based on messages passed by view()
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::NewDatabaseButtonPressed => {
                self.new_database_dialog.visible = true;
                self.new_database_dialog
                    .focus_first()
                    .map(Message::NewDatabaseDialog)
            }
            Message::DatabaseCreated(Ok(entry)) => {
                info!("Database {} is ready", entry.file_name);
                self.new_database_dialog.created();
                self.new_database_dialog.visible = false;
                self.status = Some(Status::Created(entry.file_name));
                self.database_list.refresh().map(Message::DatabaseList)
            }
            Message::DatabaseCreated(Err(e)) => {
                warn!("Failed to create database: {e}");
                // Keep the dialog open with its input so the user can correct it
                if !self.new_database_dialog.rejected(&e) {
                    self.status = Some(Status::Failed(e));
                }
                Task::none()
            }
            // Redirect messages to relevant child components
            Message::DatabaseList(msg) => self.database_list.update(msg).map(Message::DatabaseList),
            Message::NewDatabaseDialog(msg) => match self.new_database_dialog.update(msg) {
                new_database_dialog::Action::None => Task::none(),
                new_database_dialog::Action::Run(task) => task.map(Message::NewDatabaseDialog),
                new_database_dialog::Action::Cancel => {
                    self.new_database_dialog.visible = false;
                    Task::none()
                }
                new_database_dialog::Action::Create(new_database) => {
                    let Some(library) = self.library.clone() else {
                        return Task::none();
                    };

                    Task::perform(
                        async move {
                            spawn_blocking(move || {
                                library.create(new_database).map_err(|e| e.to_string())
                            })
                            .await
                            .unwrap_or_else(|e| Err(e.to_string()))
                        },
                        Message::DatabaseCreated,
                    )
                }
            },
        }
    }

    // Render the application and pass along messages from components to update()
    pub fn view(&self) -> Element<'_, Message> {
        let status = match &self.status {
            Some(Status::Created(file_name)) => {
                text(format!("Created {file_name}")).style(text::success)
            }
            Some(Status::Failed(e)) => text(e).style(text::danger),
            None => text(""),
        };

        let content = column![
            // Top bar
            row![
                text("Databases").size(20),
                space::horizontal(),
                button("New Database").on_press_maybe(
                    self.library
                        .is_some()
                        .then_some(Message::NewDatabaseButtonPressed)
                ),
            ],
            status,
            self.database_list.view().map(Message::DatabaseList),
        ]
        .spacing(10)
        .padding(10)
        .height(Fill);

        if self.new_database_dialog.visible {
            modal(
                content,
                self.new_database_dialog
                    .view()
                    .map(Message::NewDatabaseDialog),
                Some(Message::NewDatabaseDialog(
                    new_database_dialog::Message::CancelPressed,
                )),
            )
        } else {
            content.into()
        }
    }

    pub fn title(&self) -> String {
        self.title.clone()
    }

    pub fn theme(&self) -> Theme {
        self.theme.clone()
    }
}

fn open_library() -> keyhold_lib::Result<(Library, KdbVersion)> {
    let cfg = CoreConfig::load()?;
    let default_version = cfg.default_version();

    Ok((Library::new(cfg.into_handle())?, default_version))
}

#[derive(Deref, DerefMut)]
struct Dialog {
    #[deref]
    #[deref_mut]
    dialog: NewDatabaseDialog,
    visible: bool,
}

pub fn modal<'a, Message>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    on_click_outside: Option<Message>,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let mouse_area = mouse_area(center(opaque(content)).style(|_theme| {
        container::Style {
            background: Some(
                Color {
                    a: 0.8,
                    ..Color::BLACK
                }
                .into(),
            ),
            ..container::Style::default()
        }
    }));

    stack![
        base.into(),
        opaque(if let Some(msg) = on_click_outside {
            mouse_area.on_press(msg)
        } else {
            mouse_area
        })
    ]
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

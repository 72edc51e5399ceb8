use iced::{
    Element, Length, Task,
    widget::{Column, column, container, row, scrollable, space, text},
};
use keyhold_lib::{DatabaseEntry, Library};
use tokio::task::spawn_blocking;

#[derive(Debug, Clone)]
pub enum Message {
    StateChanged(State),
}

#[derive(Debug, Clone)]
pub enum State {
    Loading,
    Error(String),
    Empty,
    Loaded(Vec<DatabaseEntry>),
}

/// The databases the library knows about
pub struct DatabaseList {
    library: Option<Library>,
    state: State,
}

impl DatabaseList {
    pub fn new(library: Library) -> (Self, Task<Message>) {
        (
            Self {
                library: Some(library.clone()),
                state: State::Loading,
            },
            load_state(library),
        )
    }

    /// A list for a library that couldn't be opened
    pub fn unavailable(reason: String) -> Self {
        Self {
            library: None,
            state: State::Error(reason),
        }
    }

    pub fn refresh(&self) -> Task<Message> {
        match &self.library {
            Some(library) => load_state(library.clone()),
            None => Task::none(),
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::StateChanged(state) => {
                self.state = state;
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        match &self.state {
            State::Loading => text("Loading...").into(),
            State::Error(e) => text(e).into(),
            State::Empty => container(text("No databases yet"))
                .center_x(Length::Fill)
                .padding(20)
                .into(),
            State::Loaded(entries) => {
                scrollable(Column::with_children(entries.iter().map(database_row)).spacing(4))
                    .height(Length::Fill)
                    .into()
            }
        }
    }
}

fn load_state(library: Library) -> Task<Message> {
    Task::perform(
        async move {
            spawn_blocking(move || {
                let databases = library.databases();

                if databases.is_empty() {
                    State::Empty
                } else {
                    State::Loaded(databases)
                }
            })
            .await
            .unwrap_or_else(|e| State::Error(e.to_string()))
        },
        Message::StateChanged,
    )
}

// Generate a row that represents a database
fn database_row(entry: &DatabaseEntry) -> Element<'_, Message> {
    row![
        column![
            text(&entry.name),
            text(&entry.file_name).size(12).style(text::secondary),
        ],
        space::horizontal(),
        text(entry.version.to_string()),
        text(entry.created.format("%Y-%m-%d %H:%M").to_string()).style(text::secondary),
    ]
    .spacing(12)
    .padding(8)
    .into()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_unavailable() {
        let list = DatabaseList::unavailable("Failed to read the database registry".into());

        assert!(matches!(&list.state, State::Error(e) if e.starts_with("Failed")));
        assert!(list.library.is_none());
    }
}

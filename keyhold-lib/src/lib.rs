//! Headless core of Keyhold.
//!
//! Holds the "new database" form screen, the version choices it offers and the
//! [`Library`] that receives accepted creation requests.

pub mod config;
pub mod form;
pub mod fs;
pub mod library;
pub mod new_database;
pub mod version;

pub use library::{DatabaseCreator, DatabaseEntry, Library};
pub use new_database::{FieldId, NewDatabase, NewDatabaseForm, ValidationError};
pub use version::KdbVersion;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] config::Error),
    #[error(transparent)]
    Library(#[from] library::Error),
}

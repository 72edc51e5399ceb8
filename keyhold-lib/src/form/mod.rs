//! The capability a form screen offers its host.
//!
//! A host (the GUI, or a test) drives a screen through [`FormScreen`]: it asks for a
//! described [`View`], forwards focus changes, and calls [`FormScreen::submit`] when the
//! user confirms. The screen owns all of its field state.

use std::fmt::Debug;

use thiserror::Error;

mod field;
mod view;

pub use field::TextField;
pub use view::{Node, View};

pub trait FormScreen {
    /// Identifies the editable fields of the screen
    type Field: Copy + Eq + Debug;
    /// What an accepted submission hands to the collaborator
    type Output;
    /// Why validation rejected the current input
    type Invalid: std::error::Error;

    fn render(&self) -> View<'_, Self::Field>;

    /// Called when `field` loses focus.
    fn on_field_editing_end(&mut self, field: Self::Field) -> EditingEnd<Self::Field>;

    fn validate(&self) -> Result<(), Self::Invalid>;

    fn submit(&mut self) -> Result<Self::Output, SubmitError<Self::Invalid>>;
}

/// Where focus goes after a field finishes editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditingEnd<F> {
    Focus(F),
    /// The last field was left; the host may submit.
    Release,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Editing,
    Validating,
    /// Terminal. The output has been handed off.
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError<E> {
    #[error(transparent)]
    Invalid(E),
    #[error("This form has already been submitted")]
    Completed,
}

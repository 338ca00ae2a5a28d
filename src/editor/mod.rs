//! Record editor used by the admin client.
//!
//! One [`EditorController`] per entity type holds the list, the selected record, the form
//! and the error panel, and talks to the API through [`EditorApi`].

pub mod client;
pub mod controller;
pub mod records;
pub mod state;

pub use client::{ApiError, EditorApi, HttpEditorApi};
pub use controller::{EditorController, ListenerId, RowKey};
pub use records::{EditorRecord, FieldSpec};
pub use state::{EditorEvent, EditorState, FormMethod};

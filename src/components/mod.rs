//! UI Components
//!
//! Leptos components rendered by the app.

mod new_todo_form;
mod todo_row;

pub use new_todo_form::NewTodoForm;
pub use todo_row::TodoRow;

//! Observable View State
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::Todo;

/// View state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Tasks in store order
    pub todos: Vec<Todo>,
    /// Text of the new-task input
    pub new_todo: String,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

// ========================
// Store Helper Functions
// ========================

/// Replace the whole task list
pub fn store_set_todos(store: &AppStore, todos: Vec<Todo>) {
    store.todos().set(todos);
}

/// Append a task to the list
pub fn store_add_todo(store: &AppStore, todo: Todo) {
    store.todos().write().push(todo);
}

/// Update a task in the store by ID
pub fn store_update_todo(store: &AppStore, updated: Todo) {
    if let Some(todo) = store.todos().write().iter_mut().find(|todo| todo.id == updated.id) {
        *todo = updated;
    }
}

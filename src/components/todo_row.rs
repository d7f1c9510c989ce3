//! Todo Row Component
//!
//! One task: a hidden checkbox with a styled label.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::models::Todo;

/// A single task row
#[component]
pub fn TodoRow(todo: Todo) -> impl IntoView {
    let ctx = use_app_context();

    let Todo { id, title, completed, .. } = todo;
    let input_id = id.clone();
    let label_for = id.clone();
    let row_class = if completed { "todo-row completed" } else { "todo-row" };

    // Flips the value held in state, not whatever the checkbox shows
    let on_change = move |_| {
        let id = id.clone();
        ctx.spawn(move |controller| async move { controller.toggle(&id).await });
    };

    view! {
        <div class=row_class>
            <input
                class="hidden"
                type="checkbox"
                id=input_id
                checked=completed
                on:change=on_change
            />
            <label class="todo-label" for=label_for>
                <span class="todo-check">"✓"</span>
                <span class="todo-title">{title}</span>
            </label>
        </div>
    }
}

//! Todo App
//!
//! Root component: task list, new-task form and remaining counter.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::components::{NewTodoForm, TodoRow};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::controller::TodoController;
use crate::db::open_database;
use crate::models::remaining_count;
use crate::store::{AppState, AppStateStoreFields};

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let state = Store::new(AppState::default());
    let ctx = AppContext::new(TodoController::new(open_database(&config), state));

    // Provide context to all children
    provide_context(ctx);

    // Load todos once on mount (no tracked dependencies, so it never reruns)
    Effect::new(move |_| {
        ctx.spawn(|controller| async move { controller.load().await });
    });

    on_cleanup(move || ctx.close());

    let remaining = Memo::new(move |_| state.todos().with(|todos| remaining_count(todos)));

    view! {
        <div class="app-layout">
            <div class="todo-card">
                <div class="todo-header">
                    <span class="todo-header-icon">"☰"</span>
                    <h4>"My ToDo List"</h4>
                </div>

                <For
                    each=move || state.todos().get()
                    // Keyed on the revision too, so a re-fetched task re-renders
                    key=|todo| (todo.id.clone(), todo.rev.clone())
                    children=move |todo| view! { <TodoRow todo=todo /> }
                />

                <NewTodoForm />

                <p class="todo-count">
                    {move || {
                        let total = state.todos().with(|todos| todos.len());
                        format!("{} of {} remaining", remaining.get(), total)
                    }}
                </p>
            </div>
        </div>
    }
}

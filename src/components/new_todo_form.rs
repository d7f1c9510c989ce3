//! New Todo Form Component
//!
//! Text input bound to the pending title; submit creates the task.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::context::use_app_context;
use crate::store::AppStateStoreFields;

/// Form for creating new tasks
#[component]
pub fn NewTodoForm() -> impl IntoView {
    let ctx = use_app_context();

    let add_todo = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        ctx.spawn(|controller| async move { controller.add().await });
    };

    view! {
        <form class="new-todo-form" on:submit=add_todo>
            <span class="new-todo-icon">"+"</span>
            <input
                type="text"
                placeholder="add a new task"
                prop:value=move || ctx.state.new_todo().get()
                on:input=move |ev| {
                    let Some(input) = ev
                        .target()
                        .and_then(|target| target.dyn_into::<web_sys::HtmlInputElement>().ok())
                    else {
                        return;
                    };
                    ctx.controller().set_new_todo(input.value());
                }
            />
        </form>
    }
}

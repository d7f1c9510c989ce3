//! Application Context
//!
//! Shared state provided via Leptos Context API.

use std::future::Future;

use doc_store::StoreResult;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::controller::TodoController;
use crate::store::AppStore;

/// Controller handle and view state provided to all components
#[derive(Clone, Copy)]
pub struct AppContext {
    /// The controller holds JS-bound handles, so it lives in local storage
    controller: StoredValue<TodoController, LocalStorage>,
    /// Observable view state
    pub state: AppStore,
}

impl AppContext {
    pub fn new(controller: TodoController) -> Self {
        let state = controller.state();
        Self {
            controller: StoredValue::new_local(controller),
            state,
        }
    }

    pub fn controller(&self) -> TodoController {
        self.controller.get_value()
    }

    /// Run a controller action on the UI task queue
    ///
    /// Errors were already logged by the controller and are dropped here.
    pub fn spawn<F, Fut>(&self, action: F)
    where
        F: FnOnce(TodoController) -> Fut + 'static,
        Fut: Future<Output = StoreResult<()>> + 'static,
    {
        let controller = self.controller();
        spawn_local(async move {
            let _ = action(controller).await;
        });
    }

    /// Release the store connection
    pub fn close(&self) {
        self.controller.with_value(|controller| controller.close());
    }
}

/// Get the app context
pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}

//! Todo Controller
//!
//! Drives document store calls from user intent and patches the observable
//! state with what the store returns. Every action is independent: a failed
//! call is logged, the action stops, and state is left as it was.

use std::rc::Rc;

use doc_store::{AllDocsOptions, DocumentStore, StoreError, StoreResult};
use leptos::prelude::*;
use serde_json::Value;

use crate::models::{Todo, TodoIdGenerator};
use crate::store::{
    store_add_todo, store_set_todos, store_update_todo, AppStateStoreFields, AppStore,
};

#[derive(Clone)]
pub struct TodoController {
    db: Rc<dyn DocumentStore>,
    state: AppStore,
    ids: Rc<TodoIdGenerator>,
}

impl TodoController {
    pub fn new(db: Rc<dyn DocumentStore>, state: AppStore) -> Self {
        Self {
            db,
            state,
            ids: Rc::new(TodoIdGenerator::new()),
        }
    }

    pub fn state(&self) -> AppStore {
        self.state
    }

    /// Replace the task list with every document in the store
    pub async fn load(&self) -> StoreResult<()> {
        let todos = self
            .fetch_todos()
            .await
            .inspect_err(|e| log::error!("[Todos] Error fetching todos: {}", e))?;
        log::info!("[Todos] Loaded {} todos from {}", todos.len(), self.db.name());
        for todo in &todos {
            self.ids.observe(&todo.id);
        }
        store_set_todos(&self.state, todos);
        Ok(())
    }

    /// Create a task from the pending input, then clear the input
    ///
    /// On failure the input keeps its text so the user can resubmit.
    pub async fn add(&self) -> StoreResult<()> {
        let title = self.state.new_todo().get_untracked();
        let todo = self
            .create_todo(title)
            .await
            .inspect_err(|e| log::error!("[Todos] Error adding todo: {}", e))?;
        store_add_todo(&self.state, todo);
        self.state.new_todo().set(String::new());
        Ok(())
    }

    /// Write a task's completion flag and show the re-fetched document
    pub async fn set_completed(&self, id: &str, completed: bool) -> StoreResult<()> {
        let todo = self.write_completed(id, completed).await.inspect_err(|e| {
            if e.is_conflict() {
                log::warn!("[Todos] {} changed while updating its status: {}", id, e);
            } else {
                log::error!("[Todos] Error updating todo status {}: {}", id, e);
            }
        })?;
        store_update_todo(&self.state, todo);
        Ok(())
    }

    /// Flip a task's completion relative to what is shown
    pub async fn toggle(&self, id: &str) -> StoreResult<()> {
        let shown = self.state.todos().with_untracked(|todos| {
            todos.iter().find(|todo| todo.id == id).map(|todo| todo.completed)
        });
        match shown {
            Some(completed) => self.set_completed(id, !completed).await,
            None => {
                let e = StoreError::NotFound(id.to_string());
                log::error!("[Todos] Error toggling todo: {}", e);
                Err(e)
            }
        }
    }

    pub fn set_new_todo(&self, text: String) {
        self.state.new_todo().set(text);
    }

    pub fn close(&self) {
        self.db.close();
    }

    async fn fetch_todos(&self) -> StoreResult<Vec<Todo>> {
        let options = AllDocsOptions {
            include_docs: true,
            descending: false,
        };
        let rows = self.db.all_docs(options).await?;
        let todos: Vec<Todo> = rows
            .into_iter()
            .filter_map(|row| {
                let doc = row.doc?;
                serde_json::from_value::<Todo>(doc)
                    .inspect_err(|e| log::warn!("[Todos] Skipping {}: {}", row.id, e))
                    .ok()
            })
            .collect();
        Ok(todos)
    }

    async fn create_todo(&self, title: String) -> StoreResult<Todo> {
        let todo = Todo::new(self.ids.next_id(), title);
        let res = self.db.post(serde_json::to_value(&todo)?).await?;
        log::debug!("[Todos] Created {} at {}", res.id, res.rev);
        // Read back for the store-assigned revision
        let doc = self.db.get(&res.id).await?;
        Ok(serde_json::from_value(doc)?)
    }

    async fn write_completed(&self, id: &str, completed: bool) -> StoreResult<Todo> {
        // Mutate the raw document so fields this UI doesn't know survive
        let mut doc = self.db.get(id).await?;
        match doc.as_object_mut() {
            Some(fields) => {
                fields.insert("completed".to_string(), Value::Bool(completed));
            }
            None => return Err(StoreError::InvalidDocument(format!("{} is not an object", id))),
        }
        let res = self.db.put(doc).await?;
        log::debug!("[Todos] Updated {} to {}", res.id, res.rev);
        Ok(serde_json::from_value(self.db.get(id).await?)?)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use async_trait::async_trait;
    use doc_store::{KvBackend, KvStore, MemoryBackend, PutResponse, Row};
    use reactive_stores::Store;

    use super::*;
    use crate::models::remaining_count;
    use crate::store::AppState;

    /// In-memory store whose calls can be made to fail
    ///
    /// `get` yields once before reading so concurrent actions interleave.
    struct FaultyStore {
        inner: KvStore<Rc<MemoryBackend>>,
        backend: Rc<MemoryBackend>,
        fail_all_docs: Cell<bool>,
        fail_post: Cell<bool>,
        fail_get: Cell<bool>,
        fail_put: Cell<bool>,
    }

    impl FaultyStore {
        fn new() -> Self {
            let backend = Rc::new(MemoryBackend::new());
            Self {
                inner: KvStore::new("todos", Rc::clone(&backend)),
                backend,
                fail_all_docs: Cell::new(false),
                fail_post: Cell::new(false),
                fail_get: Cell::new(false),
                fail_put: Cell::new(false),
            }
        }

        fn check(flag: &Cell<bool>, op: &str) -> StoreResult<()> {
            if flag.get() {
                return Err(StoreError::Backend(format!("injected {} failure", op)));
            }
            Ok(())
        }
    }

    #[async_trait(?Send)]
    impl DocumentStore for FaultyStore {
        fn name(&self) -> &str {
            self.inner.name()
        }

        async fn all_docs(&self, options: AllDocsOptions) -> StoreResult<Vec<Row>> {
            Self::check(&self.fail_all_docs, "all_docs")?;
            self.inner.all_docs(options).await
        }

        async fn post(&self, doc: Value) -> StoreResult<PutResponse> {
            Self::check(&self.fail_post, "post")?;
            self.inner.post(doc).await
        }

        async fn get(&self, id: &str) -> StoreResult<Value> {
            tokio::task::yield_now().await;
            Self::check(&self.fail_get, "get")?;
            self.inner.get(id).await
        }

        async fn put(&self, doc: Value) -> StoreResult<PutResponse> {
            Self::check(&self.fail_put, "put")?;
            self.inner.put(doc).await
        }

        fn close(&self) {
            self.inner.close();
        }
    }

    fn setup() -> (Owner, Rc<FaultyStore>, TodoController) {
        let owner = Owner::new();
        owner.set();
        let db = Rc::new(FaultyStore::new());
        let controller = TodoController::new(db.clone(), Store::new(AppState::default()));
        (owner, db, controller)
    }

    fn todos(controller: &TodoController) -> Vec<Todo> {
        controller.state().todos().get_untracked()
    }

    fn pending_input(controller: &TodoController) -> String {
        controller.state().new_todo().get_untracked()
    }

    async fn add_titled(controller: &TodoController, title: &str) -> Todo {
        controller.set_new_todo(title.to_string());
        controller.add().await.expect("add failed");
        todos(controller).last().cloned().expect("no todo added")
    }

    #[tokio::test]
    async fn test_load_empty_store() {
        let (_owner, _db, controller) = setup();
        controller.load().await.expect("load failed");
        assert!(todos(&controller).is_empty());
    }

    #[tokio::test]
    async fn test_add_buy_milk() {
        let (_owner, _db, controller) = setup();

        controller.set_new_todo("Buy milk".to_string());
        controller.add().await.expect("add failed");

        let list = todos(&controller);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, "Buy milk");
        assert!(!list[0].completed);
        assert!(!list[0].id.is_empty());
        assert!(list[0].rev.as_deref().is_some_and(|rev| rev.starts_with("1-")));
        assert_eq!(pending_input(&controller), "");
    }

    #[tokio::test]
    async fn test_adds_accumulate_in_store_order() {
        let (_owner, db, controller) = setup();
        for title in ["one", "two", "three", "four", "five"] {
            add_titled(&controller, title).await;
        }

        let list = todos(&controller);
        assert_eq!(list.len(), 5);
        let mut ids: Vec<_> = list.iter().map(|t| t.id.clone()).collect();
        let in_order = ids.clone();
        ids.sort();
        ids.dedup();
        assert_eq!(ids, in_order);

        // A fresh mount sees the same list
        let remount = TodoController::new(db, Store::new(AppState::default()));
        remount.load().await.expect("load failed");
        assert_eq!(todos(&remount), list);
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_value() {
        let (_owner, _db, controller) = setup();
        let added = add_titled(&controller, "Buy milk").await;

        controller.set_completed(&added.id, true).await.expect("toggle failed");
        let toggled = todos(&controller)[0].clone();
        assert!(toggled.completed);
        assert_eq!(toggled.id, added.id);
        assert_eq!(toggled.title, added.title);
        assert_ne!(toggled.rev, added.rev);

        controller.set_completed(&added.id, false).await.expect("toggle failed");
        let restored = todos(&controller)[0].clone();
        assert!(!restored.completed);
        assert_eq!(restored.id, added.id);
        assert!(restored.rev.as_deref().is_some_and(|rev| rev.starts_with("3-")));
    }

    #[tokio::test]
    async fn test_toggle_only_touches_target() {
        let (_owner, _db, controller) = setup();
        let first = add_titled(&controller, "first").await;
        let second = add_titled(&controller, "second").await;

        controller.set_completed(&second.id, true).await.unwrap();

        let list = todos(&controller);
        assert_eq!(list[0], first);
        assert!(list[1].completed);
    }

    #[tokio::test]
    async fn test_failed_create_keeps_state_and_input() {
        let (_owner, db, controller) = setup();
        add_titled(&controller, "existing").await;

        db.fail_post.set(true);
        controller.set_new_todo("Buy milk".to_string());
        assert!(controller.add().await.is_err());
        assert_eq!(todos(&controller).len(), 1);
        assert_eq!(pending_input(&controller), "Buy milk");

        // The user resubmits once the store recovers
        db.fail_post.set(false);
        controller.add().await.expect("retry failed");
        assert_eq!(todos(&controller).len(), 2);
        assert_eq!(pending_input(&controller), "");
    }

    #[tokio::test]
    async fn test_failed_readback_after_create() {
        let (_owner, db, controller) = setup();

        db.fail_get.set(true);
        controller.set_new_todo("Buy milk".to_string());
        assert!(controller.add().await.is_err());
        assert!(todos(&controller).is_empty());
        assert_eq!(pending_input(&controller), "Buy milk");

        // The write itself landed, so the next load shows it
        db.fail_get.set(false);
        controller.load().await.unwrap();
        assert_eq!(todos(&controller).len(), 1);
    }

    #[tokio::test]
    async fn test_failed_toggle_keeps_state() {
        let (_owner, db, controller) = setup();
        let added = add_titled(&controller, "Buy milk").await;

        db.fail_put.set(true);
        assert!(controller.set_completed(&added.id, true).await.is_err());
        assert_eq!(todos(&controller), vec![added]);
    }

    #[tokio::test]
    async fn test_toggle_unknown_id() {
        let (_owner, _db, controller) = setup();
        add_titled(&controller, "Buy milk").await;
        let before = todos(&controller);

        let err = controller.set_completed("missing", true).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(todos(&controller), before);
    }

    #[tokio::test]
    async fn test_toggle_flips_shown_value() {
        let (_owner, db, controller) = setup();
        let added = add_titled(&controller, "Buy milk").await;

        // A failed write leaves the shown value, so the retry asks for the same flip
        db.fail_put.set(true);
        assert!(controller.toggle(&added.id).await.is_err());
        assert!(!todos(&controller)[0].completed);

        db.fail_put.set(false);
        controller.toggle(&added.id).await.expect("toggle failed");
        assert!(todos(&controller)[0].completed);
        controller.toggle(&added.id).await.expect("toggle failed");
        assert!(!todos(&controller)[0].completed);

        assert!(controller.toggle("missing").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_load_skips_unreadable_documents() {
        let (_owner, db, controller) = setup();
        let first = add_titled(&controller, "first").await;
        let second = add_titled(&controller, "second").await;

        // A foreign document in the same database and a corrupt entry
        db.post(serde_json::json!({ "_id": "zzz-note", "note": "x" })).await.unwrap();
        db.backend.set("todos/corrupt", "{not json").unwrap();

        let remount = TodoController::new(db, Store::new(AppState::default()));
        remount.load().await.expect("load failed");
        assert_eq!(todos(&remount), vec![first, second]);
    }

    #[tokio::test]
    async fn test_loaded_ids_seed_new_ids() {
        let (_owner, db, controller) = setup();
        let late = "2999-01-01T00:00:00.000Z";
        db.post(serde_json::json!({ "_id": late, "title": "later", "completed": false }))
            .await
            .unwrap();

        controller.load().await.expect("load failed");
        let added = add_titled(&controller, "now").await;
        assert_eq!(added.id, "2999-01-01T00:00:00.001Z");
        assert_eq!(todos(&controller).len(), 2);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_list() {
        let (_owner, db, controller) = setup();
        add_titled(&controller, "Buy milk").await;

        db.fail_all_docs.set(true);
        assert!(controller.load().await.is_err());
        assert_eq!(todos(&controller).len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_toggles_on_different_tasks() {
        let (_owner, _db, controller) = setup();
        let a = add_titled(&controller, "a").await;
        let b = add_titled(&controller, "b").await;

        let (ra, rb) = tokio::join!(
            controller.set_completed(&a.id, true),
            controller.set_completed(&b.id, true)
        );
        assert!(ra.is_ok() && rb.is_ok());
        assert!(todos(&controller).iter().all(|t| t.completed));
    }

    #[tokio::test]
    async fn test_concurrent_toggles_on_same_task_settle_on_store() {
        let (_owner, db, controller) = setup();
        let a = add_titled(&controller, "a").await;

        let (first, second) = tokio::join!(
            controller.set_completed(&a.id, true),
            controller.set_completed(&a.id, false)
        );
        assert!(first.is_ok() || second.is_ok());

        let stored: Todo = serde_json::from_value(db.get(&a.id).await.unwrap()).unwrap();
        let list = todos(&controller);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, a.id);
        assert_eq!(list[0], stored);
    }

    #[tokio::test]
    async fn test_derived_state_recomputes() {
        let (_owner, _db, controller) = setup();
        let state = controller.state();
        let remaining = Memo::new(move |_| state.todos().with(|todos| remaining_count(todos)));
        assert_eq!(remaining.get_untracked(), 0);

        let added = add_titled(&controller, "Buy milk").await;
        add_titled(&controller, "Walk dog").await;
        assert_eq!(remaining.get_untracked(), 2);

        controller.set_completed(&added.id, true).await.unwrap();
        assert_eq!(remaining.get_untracked(), 1);
    }

    #[tokio::test]
    async fn test_close_releases_store() {
        let (_owner, _db, controller) = setup();
        controller.close();
        assert!(matches!(controller.load().await, Err(StoreError::Closed(_))));
    }
}

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::editor::client::{ApiError, EditorApi};
use crate::editor::records::EditorRecord;
use crate::editor::state::{EditorEvent, EditorState, FormMethod, empty_form, form_for};

/// Keys a list row reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKey {
    Space,
    Enter,
    Other(char),
}

impl RowKey {
    /// Parse a key name as typed at a terminal
    pub fn parse(raw: &str) -> Self {
        match raw {
            "space" | " " => RowKey::Space,
            "enter" | "return" => RowKey::Enter,
            other => RowKey::Other(other.chars().next().unwrap_or('\0')),
        }
    }
}

pub type Listener<R> = Box<dyn FnMut(EditorEvent, &EditorState<R>) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// State machine behind one entity editor: list, select, create, edit, delete.
///
/// Every transition clears the error panel unless it is itself reporting an error.
/// Listeners are told about each change after it is applied.
pub struct EditorController<R: EditorRecord> {
    api: Arc<dyn EditorApi>,
    state: EditorState<R>,
    listeners: Vec<(ListenerId, Listener<R>)>,
    next_listener: u64,
}

impl<R: EditorRecord> EditorController<R> {
    pub fn new(api: Arc<dyn EditorApi>) -> Self {
        Self {
            api,
            state: EditorState::default(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn state(&self) -> &EditorState<R> {
        &self.state
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(EditorEvent, &EditorState<R>) + Send + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: EditorEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event, &self.state);
        }
    }

    fn set_error(&mut self, error: Option<String>) {
        if self.state.error == error {
            return;
        }
        self.state.error = error;
        self.emit(EditorEvent::ErrorChanged);
    }

    fn set_loading(&mut self, loading: bool) {
        self.state.is_loading = loading;
        self.emit(EditorEvent::IsLoadingChanged);
    }

    fn set_form_method(&mut self, method: FormMethod) {
        self.state.form_method = method;
        self.emit(EditorEvent::FormMethodChanged);
    }

    fn fail(&mut self, err: ApiError) -> ApiError {
        warn!(route = R::ROUTE, error = %err, "Editor request failed");
        self.set_error(Some(err.to_string()));
        err
    }

    /// Fetch all records and replace the list
    pub async fn refresh_list(&mut self) -> Result<(), ApiError> {
        self.set_loading(true);
        let result = self.api.list(R::ROUTE).await.and_then(|rows| {
            rows.into_iter()
                .map(|row| {
                    serde_json::from_value::<R>(row).map_err(|e| ApiError::Decode(e.to_string()))
                })
                .collect::<Result<Vec<R>, ApiError>>()
        });
        self.set_loading(false);

        match result {
            Ok(items) => {
                debug!(route = R::ROUTE, count = items.len(), "List refreshed");
                self.state.items = items;
                self.emit(EditorEvent::ItemsChanged);
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Select the row at `index`; false when there is no such row
    pub fn select(&mut self, index: usize) -> bool {
        let Some(item) = self.state.items.get(index).cloned() else {
            return false;
        };

        self.set_error(None);
        self.state.form = form_for(&item);
        self.state.form_visible = true;
        self.state.selected_item = Some(item);
        self.emit(EditorEvent::SelectedItemChanged);
        self.set_form_method(FormMethod::Update);
        true
    }

    pub fn select_by_id(&mut self, id: i64) -> bool {
        match self.state.items.iter().position(|item| item.id() == id) {
            Some(index) => self.select(index),
            None => false,
        }
    }

    /// Space and Enter on a row act exactly like clicking it; other keys are ignored
    pub fn handle_key(&mut self, index: usize, key: RowKey) -> bool {
        match key {
            RowKey::Space | RowKey::Enter => self.select(index),
            RowKey::Other(_) => false,
        }
    }

    /// Open an empty form for a new record
    pub fn begin_create(&mut self) {
        self.set_error(None);
        self.state.selected_item = None;
        self.state.form = empty_form::<R>();
        self.state.form_visible = true;
        self.emit(EditorEvent::SelectedItemChanged);
        self.set_form_method(FormMethod::Create);
    }

    /// Clear and hide the form
    pub fn close(&mut self) {
        self.set_error(None);
        self.state.selected_item = None;
        self.state.form = empty_form::<R>();
        self.state.form_visible = false;
        self.emit(EditorEvent::SelectedItemChanged);
        self.set_form_method(FormMethod::Create);
    }

    /// Edit one form field. Unknown fields and fields disabled in the current mode are refused.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        let Some(spec) = R::field(name) else {
            return false;
        };
        if !self.state.form_visible || self.state.is_field_disabled(spec) {
            return false;
        }

        self.set_error(None);
        if let Some((_, current)) = self.state.form.iter_mut().find(|(f, _)| *f == spec.name) {
            *current = value.into();
        }
        self.emit(EditorEvent::FormChanged);
        true
    }

    /// Request body for the current form; immutable fields are left out of updates
    pub fn form_body(&self) -> Map<String, Value> {
        R::FIELDS
            .iter()
            .filter(|f| !self.state.is_field_disabled(f))
            .map(|f| {
                let value = self.state.form_value(f.name).unwrap_or_default();
                (f.name.to_string(), Value::String(value.to_string()))
            })
            .collect()
    }

    /// POST or PUT the form. On success the form closes and the list reloads.
    pub async fn submit(&mut self) -> Result<(), ApiError> {
        if !self.state.form_visible {
            return Ok(());
        }
        self.set_error(None);

        let body = self.form_body();
        let result = match (&self.state.form_method, &self.state.selected_item) {
            (FormMethod::Update, Some(item)) => self.api.update(R::ROUTE, item.id(), body).await,
            _ => self.api.create(R::ROUTE, body).await,
        };

        match result {
            Ok(_) => {
                self.close();
                self.refresh_list().await
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// DELETE the selected record. On success the form closes and the list reloads.
    pub async fn delete_selected(&mut self) -> Result<(), ApiError> {
        let Some(id) = self.state.selected_item.as_ref().map(|item| item.id()) else {
            return Ok(());
        };
        self.set_error(None);

        match self.api.delete(R::ROUTE, id).await {
            Ok(_) => {
                self.close();
                self.refresh_list().await
            }
            Err(err) => Err(self.fail(err)),
        }
    }
}

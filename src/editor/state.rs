use crate::editor::records::{EditorRecord, FieldSpec};

/// What submitting the form will do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMethod {
    #[default]
    Create,
    Update,
}

/// Notifications sent to listeners after each change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    ItemsChanged,
    SelectedItemChanged,
    FormMethodChanged,
    FormChanged,
    ErrorChanged,
    IsLoadingChanged,
}

/// Observable state of one entity editor
#[derive(Debug, Clone)]
pub struct EditorState<R> {
    pub items: Vec<R>,
    pub selected_item: Option<R>,
    pub error: Option<String>,
    pub form_method: FormMethod,
    pub is_loading: bool,
    pub form_visible: bool,
    /// Current form text, one entry per field in declaration order
    pub form: Vec<(&'static str, String)>,
}

impl<R: EditorRecord> Default for EditorState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected_item: None,
            error: None,
            form_method: FormMethod::Create,
            is_loading: false,
            form_visible: false,
            form: empty_form::<R>(),
        }
    }
}

pub(crate) fn empty_form<R: EditorRecord>() -> Vec<(&'static str, String)> {
    R::FIELDS.iter().map(|f| (f.name, String::new())).collect()
}

pub(crate) fn form_for<R: EditorRecord>(record: &R) -> Vec<(&'static str, String)> {
    R::FIELDS
        .iter()
        .map(|f| (f.name, record.field_value(f.name).unwrap_or_default()))
        .collect()
}

impl<R: EditorRecord> EditorState<R> {
    /// The delete control only applies to an existing record
    pub fn delete_visible(&self) -> bool {
        self.form_visible && self.form_method == FormMethod::Update
    }

    pub fn is_field_disabled(&self, field: &FieldSpec) -> bool {
        field.immutable && self.form_method == FormMethod::Update
    }

    pub fn form_value(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value.as_str())
    }
}

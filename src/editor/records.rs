use serde::de::DeserializeOwned;

use crate::datalayer::CRUD::types::{Person, Pet};

/// One editable form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    /// Fixed once the record exists; disabled and left out of update bodies
    pub immutable: bool,
}

impl FieldSpec {
    const fn editable(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            immutable: false,
        }
    }

    const fn immutable(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            immutable: true,
        }
    }
}

/// A record type the editor can list, show and edit
pub trait EditorRecord: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection route, e.g. `/people`
    const ROUTE: &'static str;
    const TITLE: &'static str;
    const FIELDS: &'static [FieldSpec];

    fn id(&self) -> i64;

    /// Display value of a form field
    fn field_value(&self, name: &str) -> Option<String>;

    fn field(name: &str) -> Option<&'static FieldSpec> {
        Self::FIELDS.iter().find(|f| f.name == name)
    }
}

impl EditorRecord for Person {
    const ROUTE: &'static str = "/people";
    const TITLE: &'static str = "People";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::editable("name", "Name"),
        FieldSpec::editable("email", "Email"),
        FieldSpec::editable("age", "Age"),
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn field_value(&self, name: &str) -> Option<String> {
        match name {
            "name" => Some(self.name.clone()),
            "email" => Some(self.email.clone()),
            "age" => Some(self.age.to_string()),
            _ => None,
        }
    }
}

impl EditorRecord for Pet {
    const ROUTE: &'static str = "/pets";
    const TITLE: &'static str = "Pets";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::editable("name", "Name"),
        FieldSpec::editable("species", "Species"),
        FieldSpec::editable("age", "Age"),
        FieldSpec::immutable("person_id", "Owner id"),
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn field_value(&self, name: &str) -> Option<String> {
        match name {
            "name" => Some(self.name.clone()),
            "species" => Some(self.species.clone()),
            "age" => Some(self.age.to_string()),
            "person_id" => Some(self.person_id.to_string()),
            _ => None,
        }
    }
}

//! Request bodies turned into typed records.
//!
//! Creation requires every field. Updates are patches: the fields present in the body
//! are laid over the existing record, and the merged record is validated as a whole.

use axum::{Json, extract::rejection::JsonRejection};
use serde_json::{Map, Value};
use validator::Validate;

use crate::controllayer::validators::{any_nullish, integerish, not_integerish};
use crate::datalayer::CRUD::types::{NewPerson, NewPet, Person, Pet, PetChanges};
use crate::errors::errors::{ServiceError, ServiceResult};

pub type JsonBody = Result<Json<Value>, JsonRejection>;

/// Unwraps an extracted body, requiring a JSON object.
///
/// A request that does not declare a JSON content type carries no fields and reads as `{}`.
pub fn json_object(payload: JsonBody) -> ServiceResult<Map<String, Value>> {
    match payload {
        Ok(Json(Value::Object(map))) => Ok(map),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(Map::new()),
        Ok(Json(other)) => Err(ServiceError::InvalidBody(format!(
            "expected an object, got {}",
            json_kind(&other)
        ))),
        Err(rejection) => Err(ServiceError::InvalidBody(rejection.body_text())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Present, non-null value for `field`
fn present<'a>(body: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    body.get(field).filter(|v| !v.is_null())
}

fn require_present(body: &Map<String, Value>, fields: &[&'static str]) -> ServiceResult<()> {
    let values: Vec<Option<&Value>> = fields.iter().map(|f| body.get(*f)).collect();
    if !any_nullish(&values) {
        return Ok(());
    }

    let missing = fields
        .iter()
        .zip(values)
        .filter(|(_, v)| any_nullish(&[*v]))
        .map(|(f, _)| *f)
        .collect();
    Err(ServiceError::MissingRequiredFields(missing))
}

/// Coerces every present integer field, reporting all offenders together
fn integers<const N: usize>(
    body: &Map<String, Value>,
    fields: [&'static str; N],
) -> ServiceResult<[Option<i64>; N]> {
    let offenders: Vec<&'static str> = fields
        .iter()
        .filter(|f| present(body, f).is_some_and(|v| not_integerish(&[v])))
        .copied()
        .collect();
    if !offenders.is_empty() {
        return Err(ServiceError::NotAnInteger(offenders));
    }

    Ok(fields.map(|f| present(body, f).and_then(integerish)))
}

fn string(body: &Map<String, Value>, field: &'static str) -> ServiceResult<Option<String>> {
    match present(body, field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ServiceError::NotAString(field)),
    }
}

fn required<T>(value: Option<T>, field: &'static str) -> ServiceResult<T> {
    value.ok_or_else(|| ServiceError::MissingRequiredFields(vec![field]))
}

/// Person fields present in a request body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
}

impl PersonPatch {
    pub const FIELDS: [&'static str; 3] = ["name", "email", "age"];

    /// Type-checks the fields that are present; absent and null fields stay `None`
    pub fn from_body(body: &Map<String, Value>) -> ServiceResult<Self> {
        let [age] = integers(body, ["age"])?;
        Ok(Self {
            name: string(body, "name")?,
            email: string(body, "email")?,
            age,
        })
    }

    /// Builds a complete new person; every field must be present
    pub fn create_from_body(body: &Map<String, Value>) -> ServiceResult<NewPerson> {
        require_present(body, &Self::FIELDS)?;
        let patch = Self::from_body(body)?;
        let person = NewPerson {
            name: required(patch.name, "name")?,
            email: required(patch.email, "email")?,
            age: required(patch.age, "age")?,
        };
        person.validate()?;
        Ok(person)
    }

    /// Lays the patch over `existing` and validates the merged record
    pub fn apply_to(self, existing: &Person) -> ServiceResult<NewPerson> {
        let merged = NewPerson {
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            email: self.email.unwrap_or_else(|| existing.email.clone()),
            age: self.age.unwrap_or(existing.age),
        };
        merged.validate()?;
        Ok(merged)
    }
}

/// Pet fields a request may change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetPatch {
    pub name: Option<String>,
    pub species: Option<String>,
    pub age: Option<i64>,
}

impl PetPatch {
    pub const CREATE_FIELDS: [&'static str; 4] = ["person_id", "name", "species", "age"];
    pub const IMMUTABLE_FIELD: &'static str = "person_id";

    pub fn from_body(body: &Map<String, Value>) -> ServiceResult<Self> {
        let [age] = integers(body, ["age"])?;
        Ok(Self {
            name: string(body, "name")?,
            species: string(body, "species")?,
            age,
        })
    }

    /// True when the body names the owner at all, whatever its value
    pub fn touches_owner(body: &Map<String, Value>) -> bool {
        body.contains_key(Self::IMMUTABLE_FIELD)
    }

    pub fn create_from_body(body: &Map<String, Value>) -> ServiceResult<NewPet> {
        require_present(body, &Self::CREATE_FIELDS)?;
        let [person_id, age] = integers(body, ["person_id", "age"])?;
        let patch = Self::from_body(body)?;
        Ok(NewPet {
            person_id: required(person_id, "person_id")?,
            name: required(patch.name, "name")?,
            species: required(patch.species, "species")?,
            age: required(age, "age")?,
        })
    }

    pub fn apply_to(self, existing: &Pet) -> PetChanges {
        PetChanges {
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            species: self.species.unwrap_or_else(|| existing.species.clone()),
            age: self.age.unwrap_or(existing.age),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test body must be an object"),
        }
    }

    fn ada() -> Person {
        Person {
            id: 5,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            age: 30,
        }
    }

    #[test]
    fn test_json_object_rejects_arrays() {
        let err = json_object(Ok(Json(json!([1, 2])))).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidBody(_)));
    }

    #[test]
    fn test_create_person_accepts_integral_float_age() {
        let person = PersonPatch::create_from_body(&body(
            json!({ "name": "Ada", "email": "ada@example.com", "age": 30.0 }),
        ))
        .unwrap();
        assert_eq!(person.age, 30);
    }

    #[test]
    fn test_create_person_reports_missing_fields() {
        let err = PersonPatch::create_from_body(&body(json!({ "name": "Ada", "email": null })))
            .unwrap_err();
        match err {
            ServiceError::MissingRequiredFields(fields) => assert_eq!(fields, vec!["email", "age"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_create_person_coerces_string_age() {
        let person = PersonPatch::create_from_body(&body(
            json!({ "name": "Ada", "email": "ada@example.com", "age": "30" }),
        ))
        .unwrap();
        assert_eq!(person.age, 30);
    }

    #[test]
    fn test_create_person_rejects_bad_email() {
        let err = PersonPatch::create_from_body(&body(
            json!({ "name": "Ada", "email": "ada@example", "age": 30 }),
        ))
        .unwrap_err();
        assert_eq!(err.to_string(), "Parameter 'email' was invalid.");
    }

    #[test]
    fn test_partial_update_keeps_unspecified_fields() {
        let patch = PersonPatch::from_body(&body(json!({ "age": 31 }))).unwrap();
        let merged = patch.apply_to(&ada()).unwrap();
        assert_eq!(merged.name, "Ada");
        assert_eq!(merged.email, "ada@example.com");
        assert_eq!(merged.age, 31);
    }

    #[test]
    fn test_null_fields_fall_back_to_existing() {
        let patch = PersonPatch::from_body(&body(json!({ "name": null }))).unwrap();
        assert_eq!(patch.apply_to(&ada()).unwrap().name, "Ada");
    }

    #[test]
    fn test_merged_email_is_revalidated() {
        let patch = PersonPatch::from_body(&body(json!({ "email": "nope" }))).unwrap();
        assert!(matches!(
            patch.apply_to(&ada()),
            Err(ServiceError::ValidationError(_))
        ));
    }

    #[test]
    fn test_decimal_age_is_rejected_before_merge() {
        let err = PersonPatch::from_body(&body(json!({ "age": "31.5" }))).unwrap_err();
        assert!(matches!(err, ServiceError::NotAnInteger(ref f) if f == &vec!["age"]));
    }

    #[test]
    fn test_create_pet_reports_every_non_integer() {
        let err = PetPatch::create_from_body(&body(
            json!({ "person_id": "x", "name": "Rex", "species": "dog", "age": 2.5 }),
        ))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parameters 'person_id' and 'age' must be integers."
        );
    }

    #[test]
    fn test_touches_owner_even_when_null() {
        assert!(PetPatch::touches_owner(&body(json!({ "person_id": null }))));
        assert!(!PetPatch::touches_owner(&body(json!({ "name": "Rex" }))));
    }

    #[test]
    fn test_pet_patch_merges() {
        let existing = Pet {
            id: 1,
            name: "Rex".to_string(),
            species: "dog".to_string(),
            age: 3,
            person_id: 5,
        };
        let changes = PetPatch::from_body(&body(json!({ "species": "wolf" })))
            .unwrap()
            .apply_to(&existing);
        assert_eq!(
            changes,
            PetChanges {
                name: "Rex".to_string(),
                species: "wolf".to_string(),
                age: 3,
            }
        );
    }
}

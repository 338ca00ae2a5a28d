pub mod payloads;

pub use payloads::{JsonBody, PersonPatch, PetPatch, json_object};

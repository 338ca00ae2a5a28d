pub mod types;

pub use types::{NewPerson, NewPet, Person, Pet, PetChanges};

pub mod people;
pub mod pets;
pub mod store;
pub mod types;

pub use people::PeopleDB;
pub use pets::PetsDB;
pub use store::{EntityStore, PgStore};
pub use types::{NewPerson, NewPet, Person, Pet, PetChanges};

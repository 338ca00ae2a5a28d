pub mod health;
pub mod payloads;
pub mod people;
pub mod pets;
pub mod validators;

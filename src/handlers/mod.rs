pub mod health;
pub mod people;
pub mod pets;

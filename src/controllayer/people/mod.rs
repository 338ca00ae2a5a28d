pub mod people_handler;

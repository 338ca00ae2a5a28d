pub mod pets_handler;

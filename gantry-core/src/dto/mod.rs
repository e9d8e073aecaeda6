//! Data Transfer Objects
//!
//! Request and response shapes exchanged between the engine and whatever
//! front-end drives it (CLI, HTTP layer). DTOs carry exactly what one
//! operation needs and nothing else.

pub mod pipeline;

// Core modules: schema model, typed document, binder, encoder, and errors.
pub mod bind;
pub mod encode;
pub mod error;
pub mod model;
pub mod schema;

pub mod app;
mod deserializers;
pub mod error;
mod extract;
mod routes;

pub use app::{create_router, run_server};

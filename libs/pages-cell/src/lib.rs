//! Server-rendered pages: home, doctor and patient listings, and the booking form.

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod views;

pub use router::page_routes;

//! API Module
//!
//! HTTP control surface for the bridge. Each chat command has a route, so
//! the bridge can be driven without a chat connection.
//!
//! # Endpoints
//! - `GET|POST /toots` - List cached statuses, or toot
//! - `GET|DELETE /toots/:key` - Show or delete a status
//! - `POST /toots/:key/favourite` - Toggle the favourite flag
//! - `POST /search`, `POST /mute`, `POST /cancel`
//! - `POST /notifications/poll` - Poll for mentions now
//! - `GET /stats`, `GET /health`

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

//! Data models for the bridge
//!
//! Remote status payloads plus the DTOs used for serializing and
//! deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;
pub mod status;

// Re-export commonly used types
pub use requests::{MuteRequest, SearchRequest, TootRequest};
pub use responses::{
    CancelResponse, DeleteResponse, ErrorResponse, FavouriteResponse, HealthResponse,
    ListResponse, MuteResponse, PollResponse, SearchResponse, StatsResponse, StatusResponse,
    TootResponse,
};
pub use status::{
    Account, MediaAttachment, MuteResult, NewStatus, Notification, NotificationKind,
    SearchResults, StatusRecord, Visibility,
};

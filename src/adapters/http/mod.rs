//! HTTP transport for the allocator.

pub mod initials_http;

pub use initials_http::{AllocateRequest, AllocateResponse, ErrorResponse, InitialsHttpServer};

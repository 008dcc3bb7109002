//! HTTP server.

mod http;

pub use http::{
    ApiError, AppState, HealthResponse, InputJson, ParseRequest, ParseResponse, TaskResponse,
    create_router,
};

//! HTTP 中间件

pub mod logging;
pub mod security;

pub use logging::logging_middleware;
pub use security::{
    host_policy_middleware, origin_check_middleware, security_header_layers,
};

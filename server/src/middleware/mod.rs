pub mod auth;
pub mod cors;
pub mod request_log;

pub use auth::auth_middleware;
pub use cors::create_cors;
pub use request_log::request_logger;

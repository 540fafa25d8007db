//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod oauth_callback;
pub mod profile_guard;
pub mod register_profile;
pub mod route_guard;
pub mod session_manager;

// Re-exports
pub use config::AuthConfig;
pub use oauth_callback::{CallbackOutcome, GoogleCallbackUseCase};
pub use profile_guard::ProfileGuard;
pub use register_profile::RegisterProfileUseCase;
pub use route_guard::RouteGuard;
pub use session_manager::{AuthSessionManager, AuthStatus, LoginOutcome, RoleOutcome, SessionState};

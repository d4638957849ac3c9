// Formbridge server glue - remote validation over axum
// Mounts POST <route_prefix>/{rule} and serves the embedded client
// runtime adapter. Engine state stays per-request; only configuration
// and the authoritative validator are shared.

pub mod assets;
pub mod endpoint;

pub use assets::{serve_runtime_js, script_tag, RUNTIME_JS};
pub use endpoint::{router, RemoteState};

// Re-export the core crate so hosts need only one dependency
pub use formbridge;

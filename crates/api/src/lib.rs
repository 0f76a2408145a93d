pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::{edge_routes, worker_routes};
pub use state::{EdgeState, WorkerState};

pub mod http;
pub mod run;
pub mod state;
pub mod ws;

pub use run::{build_router, run_server};
pub use state::{broadcast_state, current_state_public, dispatch, handle_client_msg, AppState};

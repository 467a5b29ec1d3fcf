// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Sits above the repository; the view talks only to this layer
// - Holds observable view state and schedules background writes
// - Translates repository failures into notices the view can show

pub mod error_handling;
pub mod observable;
pub mod state;
pub mod view_state;


pub use error_handling::{ErrorResponse, ErrorType};
pub use observable::{Observable, SharedState, Subscription};
pub use state::AppState;
pub use view_state::{SubmitOutcome, WishListViewState};

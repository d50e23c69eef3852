pub mod align;
pub mod directory;
pub mod display;
pub mod orchestrator;
pub mod session;
pub mod users;

pub use align::*;
pub use directory::*;
pub use display::*;
pub use orchestrator::*;
pub use session::*;
pub use users::*;

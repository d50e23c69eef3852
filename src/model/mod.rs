pub mod auth;
pub mod credential;
pub mod dataset;
pub mod metrics;
pub mod timestamp;
pub mod user;

pub use auth::*;
pub use credential::*;
pub use dataset::*;
pub use metrics::*;
pub use user::*;

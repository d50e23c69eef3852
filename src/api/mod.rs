pub mod error;
pub mod gateway;
pub mod routes;

pub use error::*;
pub use gateway::*;
pub use routes::*;

pub mod auth;
pub mod releases;
pub mod smartlinks;
pub mod studio;
pub mod tickets;

pub use auth::*;
pub use releases::*;
pub use smartlinks::*;
pub use studio::*;
pub use tickets::*;

pub mod catalog;
pub mod display;
pub mod error;
pub mod profile;
pub mod recommender;
pub mod types;

pub use catalog::*;
pub use display::*;
pub use error::ProfileError;
pub use profile::*;
pub use recommender::*;
pub use types::*;

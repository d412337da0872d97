pub mod todo;
pub mod user;
pub mod write_summary;

pub use todo::*;
pub use user::*;
pub use write_summary::*;

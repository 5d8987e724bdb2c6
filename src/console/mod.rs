pub mod catalog;
pub mod controller;
pub mod prompt;
pub mod session;
pub mod updates;

pub use controller::ConsoleController;
pub use session::ConsoleSession;
pub use updates::ConsoleUpdate;

pub mod history;
pub mod rewrite;
pub mod selection;
pub mod status;
pub mod todo;

pub use history::*;
pub use rewrite::*;
pub use selection::*;
pub use status::*;
pub use todo::*;

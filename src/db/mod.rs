pub use applications::*;
pub use db::*;
pub use leads::*;
pub use posts::*;
pub use stats::*;
pub use taxonomy::*;

mod applications;
mod db;
mod leads;
mod posts;
mod stats;
mod taxonomy;

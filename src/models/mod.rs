pub mod common;
pub mod generation;
pub mod storage;
pub mod vertex;

pub use common::*;
pub use generation::*;
pub use storage::*;

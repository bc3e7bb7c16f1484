pub mod compress;
pub mod inspect;

pub use compress::*;
pub use inspect::*;

pub mod case;

pub use case::{read_case, write_case};

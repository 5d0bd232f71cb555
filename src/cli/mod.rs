pub mod inspect;
pub mod stats;

pub mod distribution;
pub mod histogram;

pub use distribution::Distribution;
pub use histogram::Histogram;

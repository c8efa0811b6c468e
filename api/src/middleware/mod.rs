pub mod merchant_gate;

pub use merchant_gate::*;

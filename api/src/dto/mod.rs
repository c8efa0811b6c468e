pub mod merchant;
pub mod token;

pub use merchant::*;
pub use token::*;

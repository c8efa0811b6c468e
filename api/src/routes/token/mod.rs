//! Token lifecycle endpoints
//!
//! - `POST /token/generate` - issue an access token or a full pair
//! - `POST /token/refresh` - rotate a refresh token into a new pair
//! - `POST /token/validate` - check a bearer token
//! - `POST /token/logout` - blacklist a bearer token

pub mod generate;
pub mod logout;
pub mod refresh;
pub mod validate;

pub use generate::generate;
pub use logout::logout;
pub use refresh::refresh;
pub use validate::validate;

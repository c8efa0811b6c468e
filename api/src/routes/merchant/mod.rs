//! Active merchant set administration

pub mod add;
pub mod list;
pub mod remove;
pub mod sync;

pub use add::add_merchant_code;
pub use list::list_merchant_codes;
pub use remove::remove_merchant_code;
pub use sync::sync_merchant_codes;

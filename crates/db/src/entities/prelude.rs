//! Entity re-exports.

pub use super::accounts::Entity as Accounts;
pub use super::entries::Entity as Entries;
pub use super::notices::Entity as Notices;
pub use super::otps::Entity as Otps;

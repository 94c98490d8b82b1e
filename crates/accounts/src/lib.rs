//! Account store, credential verification and token issuance.
//!
//! [`Accounts`] owns the `users` table: it registers users, checks passwords
//! and updates roles. [`TokenIssuer`] is independent of the database and
//! signs/verifies the bearer tokens handed out after a successful login.

pub use error::AccountsError;
pub use ops::{Accounts, AccountsBuilder, NewUser};
pub use role::Role;
pub use tokens::{Claims, IssuedToken, TokenConfig, TokenIssuer};
pub use users::User;

mod error;
mod ops;
pub mod password;
mod role;
mod tokens;
mod users;

type ResultAccounts<T> = Result<T, AccountsError>;

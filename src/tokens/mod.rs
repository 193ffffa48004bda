pub mod bearer;

pub use bearer::{Claims, IssuedToken, TokenError, TokenService};

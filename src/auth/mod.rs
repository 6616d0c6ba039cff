//! Credential collaborators used by the fetch wrapper

pub mod jwt;
pub mod redirect;
pub mod store;

#[allow(unused_imports)]
pub use jwt::{JwtDecoder, TokenClaims, TokenDecoder, bearer_token, decode_access_token};
pub use redirect::LoginRedirect;
#[allow(unused_imports)]
pub use store::{FileTokenStore, TokenKey, TokenStore};
#[cfg(test)]
pub use store::MemoryTokenStore;

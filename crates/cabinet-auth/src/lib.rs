//! # cabinet-auth
//!
//! JWT issuance and the token-to-identity resolver consumed by the storage
//! services. Login and password flows live outside Cabinet.

pub mod jwt;
pub mod resolver;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use resolver::JwtIdentityResolver;

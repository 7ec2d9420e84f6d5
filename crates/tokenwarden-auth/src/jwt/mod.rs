//! Access-token signing and refresh-token encoding.

pub mod claims;
pub mod codec;

pub use claims::{AccessClaims, RefreshEnvelope};
pub use codec::TokenCodec;

//! One-way digests of refresh secrets.

pub mod hasher;

pub use hasher::CredentialHasher;

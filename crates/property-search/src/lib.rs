//! Accommodation listings for landlords and renters.
//!
//! Landlords publish and maintain accommodation offers; renters browse them. Every mutation is
//! gated by the [`accommodations::UserValidator`] role and ownership checks before it reaches
//! storage, and accounts are managed through [`identity::IdentityService`].

pub mod accommodations;
pub mod config;
pub mod error;
pub mod identity;
pub mod telemetry;

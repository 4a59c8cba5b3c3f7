//! # tokengate-service
//!
//! Application layer containing the authentication flows, the credential
//! resolution pipeline, and DTOs.

pub mod dto;
#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod services;

pub use services::{
    AuthService, AuthSession, CredentialPipeline, LogoutOutcome, PresentedCredentials,
    ResolvedCaller, ServiceContext, ServiceContextBuilder,
};

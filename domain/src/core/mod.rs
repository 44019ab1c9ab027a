//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: a panel member or chairman identity (e.g. `openai/gpt-5.1`)
//! - [`question::Question`]: a validated question to pose to the council
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
pub mod question;
pub mod string;

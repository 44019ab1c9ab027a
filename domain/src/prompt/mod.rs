//! Prompt domain
//!
//! System directives and prompt builders for each stage of the council.

mod template;

pub use template::PromptTemplate;

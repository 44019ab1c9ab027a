//! Council deliberation logic
//!
//! Pure functions behind the three-stage council:
//!
//! ```text
//! Stage 1 answers ──> anonymize() ──> LabelMap ──┬──> ranking prompt (Stage 2)
//!                                                │
//! Stage 2 replies ──> parse_ranking() ──> PeerRanking
//!                                                │
//!                      aggregate_rankings() <────┘──> AggregateEntry list (Stage 3)
//! ```
//!
//! None of these functions can fail. Malformed model output degrades to
//! fewer labels and therefore fewer votes.

pub mod aggregate;
pub mod label;
pub mod ranking;

pub use aggregate::aggregate_rankings;
pub use label::{Label, LabelMap, anonymize};
pub use ranking::{FINAL_RANKING_MARKER, parse_ranking};

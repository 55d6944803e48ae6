//! CBQL query validation.
//!
//! CBQL looks enough like SQL that callers (especially LLM-driven agents) try
//! SQL constructs in it. Every query is checked here before any network call:
//!
//! - must not be empty
//! - must not contain `SELECT`, `UPDATE`, `DELETE`, `INSERT` or `JOIN`
//! - must carry a tracker or project scope clause
//! - must be a single statement
//!
//! Evaluation itself happens on the remote service; nothing here parses CBQL.

mod error;
pub mod guidance;
mod validator;

pub use error::{InvalidQueryReason, QueryError};
pub use guidance::{AGENT_GUIDANCE, CBQL_GUIDANCE};
pub use validator::{FORBIDDEN_KEYWORDS, ValidatedQuery, validate};

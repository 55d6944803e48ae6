//! Static guidance handed to calling agents alongside the exposed operations.
//!
//! The text is descriptive only. [`validate`](super::validate) enforces the
//! subset of these rules that can be checked locally.

/// CBQL rules an agent must follow when writing queries.
pub const CBQL_GUIDANCE: &str = "\
CBQL (Codebeamer Query Language) is a read-only query language for tracker items.

MANDATORY RULES:
1. Every query MUST include a scope:
   - tracker = 'Tracker Name'
   - tracker IN ('A','B')
   - OR project = 'Project Name'

2. CBQL is ITEM-ONLY and READ-ONLY.
   - Cannot query projects or trackers
   - Cannot update or delete data

3. Valid operators:
   - AND, OR, NOT
   - =, !=, IN, ~ (text contains)

4. Relations MUST use functions:
   - hasLinkTo(...)
   - hasParent(...)
   - hasChild(...)

5. Joins, SELECT, UPDATE, DELETE are INVALID.

PREFERRED PATTERNS:
- Prefer IN (...) over many ORs
- Prefer ONE broad query over many small ones
- Prefer tracker scope over item ID filters

INVALID EXAMPLES:
- status = 'Open'
- SELECT * FROM items
- JOIN tracker
";

/// Global rules for an agent driving the gateway.
pub const AGENT_GUIDANCE: &str = "\
You are interacting with a Codebeamer gateway.

GLOBAL RULES:
- Prefer ONE tool call over many.
- Prefer bulk operations over item-by-item calls.
- Never guess IDs; always discover them using tools.
- Never retry automatically.

CBQL RULES:
- CBQL is READ-ONLY and ITEM-ONLY.
- Every CBQL query MUST include tracker or project scope.
- Relations MUST use hasLinkTo(...), hasParent(...), or hasChild(...).
- SQL syntax (SELECT, JOIN, UPDATE) is INVALID.

ERROR HANDLING:
- If a tool returns RATE_LIMITED:<seconds>, inform the user and stop.
- If a tool returns INVALID_CBQL, correct the query before retrying.

FINAL RULE:
- Do not fabricate data not returned by tools.
";

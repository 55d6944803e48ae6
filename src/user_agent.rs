//! User-Agent string for outbound gateway traffic.

/// Product token sent with every remote request.
const PRODUCT: &str = "cbql-gateway";

/// Default User-Agent for remote requests (identifies the tool and version).
#[must_use]
pub(crate) fn default_gateway_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("{PRODUCT}/{version}")
}

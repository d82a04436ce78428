// Upstream fetches
pub const UPSTREAM_FETCH_TOTAL: &str = "programs_upstream_fetch_total";
pub const UPSTREAM_FETCH_DURATION: &str = "programs_upstream_fetch_duration_seconds";

// Connector outcomes
pub const CONNECTOR_RESULTS_TOTAL: &str = "programs_connector_results_total";
pub const PROGRAMS_RETURNED_TOTAL: &str = "programs_returned_total";

// Inbound requests
pub const UNAUTHORIZED_REQUESTS_TOTAL: &str = "programs_unauthorized_requests_total";

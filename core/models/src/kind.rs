//! Resource kinds referenced by role rules.
pub const KIND_AUTH_SERVER: &str = "auth_server";
pub const KIND_CERT_AUTHORITY: &str = "cert_authority";
pub const KIND_CLUSTER_AUTH_PREFERENCE: &str = "cluster_auth_preference";
pub const KIND_CLUSTER_NAME: &str = "cluster_name";
pub const KIND_EVENT: &str = "event";
pub const KIND_NAMESPACE: &str = "namespace";
pub const KIND_NODE: &str = "node";
pub const KIND_OIDC: &str = "oidc";
pub const KIND_OIDC_REQUEST: &str = "oidc_request";
pub const KIND_PROXY: &str = "proxy";
pub const KIND_REVERSE_TUNNEL: &str = "tunnel";
pub const KIND_ROLE: &str = "role";
pub const KIND_SAML: &str = "saml";
pub const KIND_SAML_REQUEST: &str = "saml_request";
pub const KIND_SESSION: &str = "session";
pub const KIND_STATIC_TOKENS: &str = "static_tokens";
pub const KIND_TRUSTED_CLUSTER: &str = "trusted_cluster";
pub const KIND_USER: &str = "user";
pub const KIND_WEB_SESSION: &str = "web_session";

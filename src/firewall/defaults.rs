//! Built-in allowed domains.
//!
//! These form the Defaults layer: the lowest-precedence layer, allow-only and
//! not user-editable. Any higher layer may still deny one of them.

/// Package registries, source hosts and the Anthropic API.
pub const DEFAULT_ALLOWED_DOMAINS: &[&str] = &[
    "api.anthropic.com",
    "github.com",
    "api.github.com",
    "raw.githubusercontent.com",
    "objects.githubusercontent.com",
    "registry.npmjs.org",
    "pypi.org",
    "files.pythonhosted.org",
    "proxy.golang.org",
    "sum.golang.org",
    "registry-1.docker.io",
    "auth.docker.io",
    "production.cloudflare.docker.com",
    "cdn.jsdelivr.net",
    "unpkg.com",
];

/// The Defaults layer as owned strings.
pub fn default_allowed() -> Vec<String> {
    DEFAULT_ALLOWED_DOMAINS.iter().map(|d| d.to_string()).collect()
}

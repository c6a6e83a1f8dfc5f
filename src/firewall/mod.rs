//! Outbound network firewall policy.
//!
//! Decides whether a container may reach a domain by walking four rule
//! layers in precedence order:
//!
//! ```text
//!   project ──► global ──► extension ──► defaults ──► none
//!   deny/allow  deny/allow  deny/allow    allow
//! ```
//!
//! The first layer that mentions a domain decides it; inside a layer a deny
//! beats an allow. A domain no layer mentions gets the `none` outcome, which
//! the [`FirewallMode`] turns into a deny (`strict`) or an allow
//! (`permissive`). In `off` mode every domain is allowed.
//!
//! # Example
//!
//! ```
//! use addt::firewall::{MatchedLayer, PolicySnapshot, RuleLayer};
//!
//! let global = RuleLayer::new(vec![], vec!["registry.npmjs.org".to_string()]);
//! let snapshot = PolicySnapshot::default().with_global(&global);
//!
//! let outcome = snapshot.evaluate("registry.npmjs.org");
//! assert!(!outcome.allowed);
//! assert_eq!(outcome.layer, MatchedLayer::Global);
//! ```

pub mod defaults;
pub mod domain;
pub mod error;
pub mod evaluator;
pub mod extensions;
pub mod mode;
pub mod snapshot;
pub mod store;

pub use defaults::DEFAULT_ALLOWED_DOMAINS;
pub use domain::normalize_domain;
pub use error::FirewallError;
pub use evaluator::{CheckOutcome, MatchedLayer, decide, evaluate};
pub use extensions::{ExtensionRules, builtin_rules};
pub use mode::FirewallMode;
pub use snapshot::{PolicySnapshot, RuleChange, RuleLayer};
pub use store::{ChangeOutcome, RuleStore, Scope};

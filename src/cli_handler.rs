//! Command handling for addt.
//!
//! Turns parsed CLI commands into calls on the firewall store and the
//! telemetry resolver, prints results to stdout and records audit events.

use anyhow::{Context, Result};
use std::process::ExitCode;
use tracing::{debug, info, warn};

use crate::cli::{Cli, Commands, FirewallCommand, OtelCommand, RuleAction};
use crate::config::{ConfigLoader, env};
use crate::firewall::{
    CheckOutcome, DEFAULT_ALLOWED_DOMAINS, FirewallMode, MatchedLayer, RuleChange, RuleLayer,
    RuleStore, Scope, builtin_rules, normalize_domain,
};
use crate::telemetry::{self, AuditEvent, OtelConfig, ResourceAttrs, compose_env};

/// Handle a parsed command line.
pub fn handle_command(cli: Cli) -> Result<ExitCode> {
    let loader = config_loader(&cli)?;
    match cli.command {
        Commands::Firewall { command } => handle_firewall(loader, command),
        Commands::Otel { command } => handle_otel(&loader, command),
    }
}

/// Config loader honoring `--global-config` and `--project-config`.
pub fn config_loader(cli: &Cli) -> Result<ConfigLoader> {
    let loader =
        ConfigLoader::from_overrides(cli.global_config.clone(), cli.project_config.clone())
            .context("Failed to locate the global config file")?;
    debug!(
        "Using global config {:?}, project config {:?}",
        loader.global_path(),
        loader.project_path()
    );
    Ok(loader)
}

fn handle_firewall(loader: ConfigLoader, command: FirewallCommand) -> Result<ExitCode> {
    match command {
        FirewallCommand::Global { action } => run_rule_action(loader, Scope::Global, action),
        FirewallCommand::Project { action } => run_rule_action(loader, Scope::Project, action),
        FirewallCommand::Extension { name, action } => {
            let scope = Scope::extension(&name)?;
            run_rule_action(loader, scope, action)
        }
        FirewallCommand::Check {
            domain,
            extension,
            mode,
        } => check_domain(loader, &domain, extension.as_deref(), mode),
        FirewallCommand::Defaults => {
            for domain in DEFAULT_ALLOWED_DOMAINS {
                println!("{domain}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_rule_action(loader: ConfigLoader, scope: Scope, action: RuleAction) -> Result<ExitCode> {
    let extension = match &scope {
        Scope::Extension(name) => Some(name.as_str()),
        _ => None,
    };
    let mut store =
        RuleStore::open(loader, extension).context("Failed to load firewall rules")?;

    let change = match action {
        RuleAction::Allow { domain } => RuleChange::allow(&domain)?,
        RuleAction::Deny { domain } => RuleChange::deny(&domain)?,
        RuleAction::Remove { domain } => RuleChange::remove(&domain)?,
        RuleAction::Reset => RuleChange::Reset,
        RuleAction::List => {
            print_rules(&store, &scope)?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    let outcome = store
        .apply(&scope, &change)
        .with_context(|| format!("Failed to update {scope} firewall rules"))?;

    if let Some(event) = change_event(&scope, &change, outcome.changed) {
        telemetry::audit().log(event);
    }

    match (&change, outcome.changed) {
        (RuleChange::Allow(domain), _) => println!("Allowed {domain} in {scope} rules"),
        (RuleChange::Deny(domain), _) => println!("Denied {domain} in {scope} rules"),
        (RuleChange::Remove(domain), true) => println!("Removed {domain} from {scope} rules"),
        (RuleChange::Remove(domain), false) => println!("{domain} was not in {scope} rules"),
        (RuleChange::Reset, _) if scope == Scope::Global => {
            println!("Reset global rules to defaults")
        }
        (RuleChange::Reset, _) => println!("Cleared {scope} rules"),
    }

    if let RuleChange::Allow(domain) | RuleChange::Deny(domain) = &change
        && let Some(note) = shadow_note(domain, &scope, &outcome.snapshot.evaluate(domain))
    {
        println!("{note}");
    }

    Ok(ExitCode::SUCCESS)
}

/// Audit event for a rule edit, `None` when the rules did not change.
fn change_event(scope: &Scope, change: &RuleChange, changed: bool) -> Option<AuditEvent> {
    if !changed {
        return None;
    }
    let event = match change.domain() {
        Some(domain) => AuditEvent::RuleChange {
            scope: scope.to_string(),
            action: change.action().to_string(),
            domain: domain.to_string(),
        },
        None => AuditEvent::RuleReset {
            scope: scope.to_string(),
        },
    };
    Some(event)
}

/// Note for an edit that a higher-precedence layer overrides.
fn shadow_note(domain: &str, scope: &Scope, outcome: &CheckOutcome) -> Option<String> {
    let edited = match scope {
        Scope::Global => MatchedLayer::Global,
        Scope::Project => MatchedLayer::Project,
        Scope::Extension(_) => MatchedLayer::Extension,
    };
    if outcome.layer == edited {
        return None;
    }
    let verdict = if outcome.allowed { "allowed" } else { "denied" };
    Some(format!(
        "Note: {domain} is still {verdict} by {} rules, which take precedence",
        outcome.layer
    ))
}

fn print_rules(store: &RuleStore, scope: &Scope) -> Result<()> {
    if let Scope::Extension(name) = scope {
        let builtin = builtin_rules(name)?;
        print_list("Built-in allowed", &builtin.allowed);
    }

    let rules: RuleLayer = store.user_rules(scope)?;
    print_list("Allowed", &rules.allowed);
    print_list("Denied", &rules.denied);
    Ok(())
}

fn print_list(title: &str, domains: &[String]) {
    println!("{title}:");
    if domains.is_empty() {
        println!("  (none)");
    }
    for domain in domains {
        println!("  {domain}");
    }
}

fn check_domain(
    loader: ConfigLoader,
    raw_domain: &str,
    extension: Option<&str>,
    mode: Option<FirewallMode>,
) -> Result<ExitCode> {
    let domain = normalize_domain(raw_domain)?;
    let mut store = RuleStore::open(loader, extension).context("Failed to load firewall rules")?;

    let snapshot = match mode.or_else(env::process_firewall_mode_override) {
        Some(mode) => store.override_mode(mode),
        None => store.snapshot(),
    };
    let outcome = snapshot.decide(&domain);

    telemetry::audit().log(AuditEvent::FirewallCheck {
        domain: domain.clone(),
        allowed: outcome.allowed,
        layer: outcome.layer,
        mode: snapshot.mode(),
    });

    println!("{}", describe_outcome(&domain, &outcome, snapshot.mode()));

    if outcome.allowed {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// One-line verdict for `firewall check`.
pub fn describe_outcome(domain: &str, outcome: &CheckOutcome, mode: FirewallMode) -> String {
    let verdict = if outcome.allowed { "allowed" } else { "denied" };
    if outcome.is_rule_match() {
        return format!("{domain}: {verdict} ({})", outcome.layer);
    }
    match outcome.layer {
        MatchedLayer::Off => format!("{domain}: {verdict} (off) - firewall is disabled"),
        _ => format!("{domain}: {verdict} (none) - no rule matched, {mode} mode {verdict} it"),
    }
}

fn handle_otel(loader: &ConfigLoader, command: OtelCommand) -> Result<ExitCode> {
    let config = resolve_otel(loader)?;

    match command {
        OtelCommand::Show { extension } => {
            let extension = extension.unwrap_or_default();
            println!("enabled: {}", config.enabled);
            println!("endpoint: {}", config.endpoint);
            println!("protocol: {}", config.protocol);
            println!("service_name: {}", config.service_name_for(&extension));
            println!(
                "headers: {}",
                if config.headers.is_empty() { "(none)" } else { "(set)" }
            );
        }
        OtelCommand::Env {
            extension,
            provider,
            project,
        } => {
            let attrs = ResourceAttrs {
                extension: extension.unwrap_or_default(),
                provider,
                version: env!("CARGO_PKG_VERSION").to_string(),
                project: project.unwrap_or_else(current_dir_name),
            };
            let vars = compose_env(&config, &attrs);
            if vars.is_empty() {
                info!("Telemetry is disabled; no variables to export");
            }
            for (key, value) in vars {
                println!("{key}={value}");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Defaults, then global and project files, then `ADDT_OTEL_*`.
fn resolve_otel(loader: &ConfigLoader) -> Result<OtelConfig> {
    let layers = loader.load().context("Failed to load configuration")?;
    let config = OtelConfig::resolve(OtelConfig::default(), layers.otel_layers());
    let config = env::apply_process_env(config);

    if !config.protocol_is_supported() {
        warn!(
            "OTLP protocol {:?} is not one of {:?}",
            config.protocol,
            crate::telemetry::otel::SUPPORTED_PROTOCOLS
        );
    }
    debug!("Resolved telemetry config: {:?}", config);
    Ok(config)
}

fn current_dir_name() -> String {
    std::env::current_dir()
        .ok()
        .and_then(|dir| dir.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(allowed: bool, layer: MatchedLayer) -> CheckOutcome {
        CheckOutcome { allowed, layer }
    }

    #[test]
    fn test_describe_rule_match() {
        let msg = describe_outcome(
            "registry.npmjs.org",
            &outcome(false, MatchedLayer::Global),
            FirewallMode::Strict,
        );
        assert_eq!(msg, "registry.npmjs.org: denied (global)");
    }

    #[test]
    fn test_describe_unmatched_names_mode() {
        let msg = describe_outcome(
            "unknown.example.com",
            &outcome(false, MatchedLayer::None),
            FirewallMode::Strict,
        );
        assert!(msg.starts_with("unknown.example.com: denied (none)"));
        assert!(msg.contains("no rule matched"));
        assert!(msg.contains("strict mode"));

        let msg = describe_outcome(
            "unknown.example.com",
            &outcome(true, MatchedLayer::None),
            FirewallMode::Permissive,
        );
        assert!(msg.contains("allowed (none)"));
        assert!(msg.contains("permissive mode"));
    }

    #[test]
    fn test_describe_off() {
        let msg = describe_outcome(
            "x.com",
            &outcome(true, MatchedLayer::Off),
            FirewallMode::Off,
        );
        assert_eq!(msg, "x.com: allowed (off) - firewall is disabled");
    }

    #[test]
    fn test_shadow_note_only_for_overridden_edits() {
        assert!(
            shadow_note("a.com", &Scope::Global, &outcome(true, MatchedLayer::Global)).is_none()
        );

        let note = shadow_note("a.com", &Scope::Global, &outcome(false, MatchedLayer::Project))
            .unwrap();
        assert_eq!(
            note,
            "Note: a.com is still denied by project rules, which take precedence"
        );

        let note = shadow_note(
            "api.openai.com",
            &Scope::extension("codex").unwrap(),
            &outcome(true, MatchedLayer::Global),
        )
        .unwrap();
        assert!(note.contains("allowed by global rules"));
    }

    #[test]
    fn test_unchanged_edit_is_not_audited() {
        let remove = RuleChange::remove("never.example.com").unwrap();
        assert!(change_event(&Scope::Global, &remove, false).is_none());
        assert!(change_event(&Scope::Project, &RuleChange::Reset, false).is_none());
    }

    #[test]
    fn test_changed_edit_is_audited() {
        let deny = RuleChange::deny("evil.com").unwrap();
        let event = change_event(&Scope::extension("codex").unwrap(), &deny, true).unwrap();
        assert!(matches!(
            event,
            AuditEvent::RuleChange { ref scope, ref domain, .. }
                if scope == "extension:codex" && domain == "evil.com"
        ));

        let event = change_event(&Scope::Global, &RuleChange::Reset, true).unwrap();
        assert!(matches!(event, AuditEvent::RuleReset { .. }));
    }
}

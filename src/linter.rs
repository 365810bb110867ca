//! # Route Table Linter Module
//!
//! Structural checks of a [`RouteTable`] that construction alone cannot
//! reject: the table builds, but some paths will behave surprisingly.
//!
//! ## Checks Performed
//!
//! 1. **fallback_not_last** - The catch-all subtree should be declared last
//! 2. **missing_fallback** - Without a catch-all, unknown paths fail to resolve
//! 3. **dangling_redirect** - Redirect targets must match a real route
//! 4. **redirect_cycle** - Redirect chains must terminate
//! 5. **missing_view** - Leaves need a view or a redirect; parents need a view for their children
//! 6. **redirect_shadows_view** - A redirecting record only shows its view as an ancestor
//! 7. **shadowed_pattern** - Two records with the same pattern shape; the later one is reachable by name only
//! 8. **child_outside_parent** - A child path not nested under its parent's path
//! 9. **cross_domain_view** - A view from another resource domain's folder
//! 10. **create_has_name** / **read_edit_missing_name** - `operator-*` verb grammar
//!
//! ## Usage
//!
//! ```rust
//! use banyandb_ui_router::console::console_table;
//! use banyandb_ui_router::linter::{lint_table, LintSeverity};
//!
//! let issues = lint_table(&console_table());
//! assert!(issues.iter().all(|i| i.severity != LintSeverity::Error));
//! ```

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::{self, Write};

use crate::route::{ResourceKind, RouteId, RouteNode, RouteTable, Segment};
use crate::router::{Location, RadixRouter};


/// Severity level for lint issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    /// Error - A path will resolve wrongly or not at all
    Error,
    /// Warning - Legal but probably not what was meant
    Warning,
    /// Info - Worth knowing when reading the table
    Info,
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LintSeverity::Error => "error",
            LintSeverity::Warning => "warning",
            LintSeverity::Info => "info",
        })
    }
}

/// A lint issue found in a route table
#[derive(Debug, Clone, Serialize)]
pub struct LintIssue {
    /// Where the issue occurred (e.g., "route:edit-measure")
    pub location: String,
    pub severity: LintSeverity,
    /// Type of lint issue (e.g., "shadowed_pattern")
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl LintIssue {
    pub fn new(
        location: impl Into<String>,
        severity: LintSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LintIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Add a suggestion for fixing the issue
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

fn location(node: &RouteNode) -> String {
    format!("route:{}", node.label())
}

/// Run every check against `table`. Issues follow declaration order per check.
#[must_use]
pub fn lint_table(table: &RouteTable) -> Vec<LintIssue> {
    let radix = RadixRouter::new(table, false);
    let mut issues = Vec::new();

    lint_fallback(table, &mut issues);
    lint_redirects(table, &radix, &mut issues);
    for node in table.iter() {
        lint_view(node, &mut issues);
        lint_nesting(table, node, &mut issues);
        lint_domain(table, node, &mut issues);
        lint_verbs(node, &mut issues);
    }
    lint_shadowing(table, &mut issues);

    issues
}

fn lint_fallback(table: &RouteTable, issues: &mut Vec<LintIssue>) {
    let Some(fallback) = table.fallback() else {
        issues.push(
            LintIssue::new(
                "table",
                LintSeverity::Warning,
                "missing_fallback",
                "no catch-all route; unknown paths fail to resolve",
            )
            .with_suggestion("declare `/:pathMatch(.*)` with a not-found view last"),
        );
        return;
    };

    let root = table.chain(fallback)[0];
    if table.roots().last() != Some(&root) {
        issues.push(
            LintIssue::new(
                location(table.node(root)),
                LintSeverity::Warning,
                "fallback_not_last",
                "the catch-all subtree is not the last top-level route",
            )
            .with_suggestion("move it after every other top-level route"),
        );
    }
}

fn redirect_hop(table: &RouteTable, radix: &RadixRouter, target: &str) -> Option<RouteId> {
    let location = Location::parse(target).ok()?;
    let (id, _) = radix.route(&location.path)?;
    (table.fallback() != Some(id)).then_some(id)
}

fn lint_redirects(table: &RouteTable, radix: &RadixRouter, issues: &mut Vec<LintIssue>) {
    let mut in_cycle: HashSet<RouteId> = HashSet::new();

    for node in table.iter() {
        let Some(target) = &node.redirect else {
            continue;
        };

        if redirect_hop(table, radix, target).is_none() {
            issues.push(LintIssue::new(
                location(node),
                LintSeverity::Error,
                "dangling_redirect",
                format!("redirect target `{target}` matches no route except the fallback"),
            ));
            continue;
        }

        if in_cycle.contains(&node.id) {
            continue;
        }

        let mut seen = vec![node.id];
        let mut cursor = node.id;
        while let Some(next_target) = &table.node(cursor).redirect {
            let Some(next) = redirect_hop(table, radix, next_target) else {
                break;
            };
            if let Some(pos) = seen.iter().position(|id| *id == next) {
                let cycle: Vec<&str> = seen[pos..]
                    .iter()
                    .chain(std::iter::once(&next))
                    .map(|id| table.node(*id).label())
                    .collect();
                in_cycle.extend(seen[pos..].iter().copied());
                issues.push(LintIssue::new(
                    location(table.node(next)),
                    LintSeverity::Error,
                    "redirect_cycle",
                    format!("redirects loop: {}", cycle.join(" -> ")),
                ));
                break;
            }
            seen.push(next);
            cursor = next;
        }
    }
}

fn lint_view(node: &RouteNode, issues: &mut Vec<LintIssue>) {
    match (&node.view, &node.redirect) {
        (None, None) if node.is_leaf() => issues.push(LintIssue::new(
            location(node),
            LintSeverity::Error,
            "missing_view",
            "leaf route has neither a view nor a redirect",
        )),
        (None, _) if !node.is_leaf() => issues.push(
            LintIssue::new(
                location(node),
                LintSeverity::Warning,
                "missing_view",
                "route has children but no view to render them in",
            )
            .with_suggestion("give the parent a layout view"),
        ),
        (Some(view), Some(target)) => issues.push(LintIssue::new(
            location(node),
            LintSeverity::Info,
            "redirect_shadows_view",
            format!(
                "`{}` is only rendered around child routes; the route itself redirects to `{target}`",
                view.module
            ),
        )),
        _ => {}
    }
}

fn lint_nesting(table: &RouteTable, node: &RouteNode, issues: &mut Vec<LintIssue>) {
    let Some(parent) = node.parent.map(|id| table.node(id)) else {
        return;
    };
    if parent.pattern.is_catch_all_only() {
        return;
    }

    let outer = parent.pattern.segments();
    let inner = node.pattern.segments();
    if inner.len() < outer.len() {
        issues.push(LintIssue::new(
            location(node),
            LintSeverity::Warning,
            "child_outside_parent",
            format!("path `{}` is shorter than its parent `{}`", node.pattern, parent.pattern),
        ));
        return;
    }

    for (parent_seg, child_seg) in outer.iter().zip(inner) {
        match (parent_seg, child_seg) {
            (Segment::Static(a), Segment::Static(b)) if a.eq_ignore_ascii_case(b) => {}
            (Segment::Static(a), Segment::Param { constraint, .. })
                if constraint.as_ref().map_or(true, |c| c.matches(a, false)) =>
            {
                issues.push(LintIssue::new(
                    location(node),
                    LintSeverity::Info,
                    "child_outside_parent",
                    format!(
                        "path `{}` leaves its parent `{}` unless `{child_seg}` is `{a}`",
                        node.pattern, parent.pattern
                    ),
                ));
                return;
            }
            (a, b) if a == b => {}
            _ => {
                issues.push(
                    LintIssue::new(
                        location(node),
                        LintSeverity::Warning,
                        "child_outside_parent",
                        format!("path `{}` is not nested under its parent `{}`", node.pattern, parent.pattern),
                    )
                    .with_suggestion("move the route next to the parent it actually belongs under"),
                );
                return;
            }
        }
    }
}

/// Resource domain a record belongs to, from its own path or the nearest
/// ancestor's.
fn domain_of(table: &RouteTable, node: &RouteNode) -> Option<ResourceKind> {
    table.chain(node.id).iter().rev().find_map(|id| {
        table.node(*id).pattern.segments().iter().find_map(|seg| match seg {
            Segment::Static(s) => ResourceKind::ALL
                .into_iter()
                .find(|k| k.as_str().eq_ignore_ascii_case(s)),
            _ => None,
        })
    })
}

fn lint_domain(table: &RouteTable, node: &RouteNode, issues: &mut Vec<LintIssue>) {
    let Some(view) = &node.view else {
        return;
    };
    let Some(domain) = domain_of(table, node) else {
        return;
    };
    let foreign = view.module.folder().split('/').find_map(|part| {
        ResourceKind::ALL
            .into_iter()
            .find(|k| *k != domain && k.as_str().eq_ignore_ascii_case(part))
    });
    if let Some(foreign) = foreign {
        issues.push(
            LintIssue::new(
                location(node),
                LintSeverity::Warning,
                "cross_domain_view",
                format!(
                    "{domain} route renders `{}` from the {foreign} folder",
                    view.module
                ),
            )
            .with_suggestion(format!(
                "use a view from the {domain} folder or a shared component"
            )),
        );
    }
}

fn lint_verbs(node: &RouteNode, issues: &mut Vec<LintIssue>) {
    let verb = node.pattern.segments().iter().find_map(|seg| match seg {
        Segment::Static(s) => s.strip_prefix("operator-"),
        _ => None,
    });
    let has_name = node.pattern.has_param("name");
    match verb {
        Some("create") if has_name => issues.push(LintIssue::new(
            location(node),
            LintSeverity::Warning,
            "create_has_name",
            "create routes address a group, not an existing resource; drop `:name`",
        )),
        Some(verb @ ("read" | "edit")) if !has_name => issues.push(LintIssue::new(
            location(node),
            LintSeverity::Warning,
            "read_edit_missing_name",
            format!("{verb} routes need `:name` to address an existing resource"),
        )),
        _ => {}
    }
}

fn lint_shadowing(table: &RouteTable, issues: &mut Vec<LintIssue>) {
    let mut owners: HashMap<String, RouteId> = HashMap::new();
    for id in table.registration_order() {
        let node = table.node(*id);
        let shape = node.pattern.shape(false);
        match owners.get(&shape) {
            None => {
                owners.insert(shape, *id);
            }
            Some(owner) if table.chain(*owner).contains(id) => {}
            Some(owner) => {
                let owner = table.node(*owner);
                issues.push(
                    LintIssue::new(
                        location(node),
                        LintSeverity::Warning,
                        "shadowed_pattern",
                        format!(
                            "`{}` has the same shape as `{}` ({}); paths resolve to `{}`, this route is reachable by name only",
                            node.pattern,
                            owner.label(),
                            owner.pattern,
                            owner.label()
                        ),
                    )
                    .with_suggestion("constrain the shared parameter, e.g. `:schema(measure)`"),
                );
            }
        }
    }
}

#[must_use]
pub fn has_errors(issues: &[LintIssue]) -> bool {
    issues.iter().any(|i| i.severity == LintSeverity::Error)
}

/// Write lint issues grouped by severity.
pub fn write_lint_issues<W: Write>(out: &mut W, issues: &[LintIssue]) -> io::Result<()> {
    if issues.is_empty() {
        writeln!(out, "✅ No lint issues found!")?;
        return Ok(());
    }

    let count = |severity| issues.iter().filter(|i| i.severity == severity).count();

    writeln!(out, "\n📋 Lint Results:")?;
    writeln!(
        out,
        "   {} error(s), {} warning(s), {} info(s)\n",
        count(LintSeverity::Error),
        count(LintSeverity::Warning),
        count(LintSeverity::Info)
    )?;

    for (severity, heading) in [
        (LintSeverity::Error, "❌ Errors (must fix):"),
        (LintSeverity::Warning, "⚠️  Warnings:"),
        (LintSeverity::Info, "ℹ️  Info:"),
    ] {
        if count(severity) == 0 {
            continue;
        }
        writeln!(out, "{heading}")?;
        for issue in issues.iter().filter(|i| i.severity == severity) {
            writeln!(out, "   [{}] {}", issue.kind, issue.location)?;
            writeln!(out, "      {}", issue.message)?;
            if let Some(suggestion) = &issue.suggestion {
                writeln!(out, "      💡 Suggestion: {suggestion}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Fail with an error summary if any issue is an error.
pub fn fail_if_errors(issues: &[LintIssue]) -> anyhow::Result<()> {
    let errors = issues
        .iter()
        .filter(|i| i.severity == LintSeverity::Error)
        .count();
    if errors > 0 {
        anyhow::bail!("route table has {errors} lint error(s)");
    }
    Ok(())
}

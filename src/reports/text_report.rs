use crate::analysis::AnalysisResult;
use core::fmt::Display;
use owo_colors::{OwoColorize, Style};
use std::io::Write;

const TOP_CONTRIBUTORS: usize = 5;

struct Painter {
    colors: bool,
}

impl Painter {
    fn paint(&self, text: impl Display, style: Style) -> String {
        if self.colors {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        self.paint(text, Style::new().bold().underline())
    }
}

/// Renders `result` as a terminal report.
pub fn generate(result: &AnalysisResult, colors: bool, mut writer: impl Write) -> std::io::Result<()> {
    let p = Painter { colors };
    let accent = Style::new().cyan().bold();
    let dim = Style::new().dimmed();

    writeln!(
        writer,
        "{} {}",
        p.paint(format!("{}/{}", result.repository.owner, result.repository.repo), accent),
        p.paint(format!("({}, default branch {})", result.time_range, result.repository.default_branch), dim)
    )?;
    writeln!(writer)?;
    writeln!(writer, "{}", result.summary)?;
    if let Some(executive) = &result.executive_summary {
        writeln!(writer)?;
        writeln!(writer, "{}", p.heading("Executive summary"))?;
        writeln!(writer, "{executive}")?;
    }

    writeln!(writer)?;
    writeln!(writer, "{}", p.heading("Branching"))?;
    writeln!(writer, "  Workflow: {}", p.paint(result.branching.workflow, accent))?;
    writeln!(writer, "    {}", result.branching.workflow_explanation)?;
    writeln!(writer, "  Strategy: {}", p.paint(result.branching.strategy, accent))?;
    writeln!(writer, "    {}", result.branching.strategy_explanation)?;
    for criterion in &result.branching.detection_criteria {
        writeln!(writer, "  {}", p.paint(format!("- {criterion}"), dim))?;
    }
    writeln!(
        writer,
        "  {} branch(es), {} active, {} stale",
        result.stats.branches_analyzed,
        result.active_branches.len(),
        result.stale_branches.len()
    )?;

    writeln!(writer)?;
    writeln!(writer, "{}", p.heading("Commits"))?;
    writeln!(writer, "  {} in window, {} fetched", result.stats.window_commits, result.stats.total_commits)?;
    let c = &result.commit_categories;
    let categories = [
        ("features", c.feature),
        ("bug fixes", c.bug_fix),
        ("performance", c.performance),
        ("security", c.security),
        ("tests", c.test),
        ("docs", c.documentation),
        ("refactors", c.refactor),
        ("breaking", c.breaking),
        ("deprecations", c.deprecation),
    ];
    let listed: Vec<String> = categories
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(name, count)| format!("{name} {count}"))
        .collect();
    if !listed.is_empty() {
        writeln!(writer, "  {}", listed.join(", "))?;
    }

    if !result.contributors.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "{}", p.heading("Top contributors"))?;
        for contributor in result.contributors.iter().take(TOP_CONTRIBUTORS) {
            let lines = match (contributor.additions, contributor.deletions) {
                (Some(added), Some(deleted)) => format!(" (+{added}/-{deleted})"),
                _ => String::new(),
            };
            writeln!(writer, "  {:>4}  {}{}", contributor.commits, contributor.name, p.paint(lines, dim))?;
        }
    }

    if !result.work_areas.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "{}", p.heading("Work areas"))?;
        for area in &result.work_areas {
            writeln!(writer, "  {:>4}  {}", area.count, area.area)?;
        }
    }

    if let Some(tools) = result.ci_cd_tools.as_ref().filter(|t| !t.is_empty()) {
        writeln!(writer)?;
        writeln!(writer, "{}", p.heading("CI/CD"))?;
        writeln!(writer, "  {}", tools.join(", "))?;
    }

    if !result.warnings.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "{}", p.paint("Warnings", Style::new().yellow().bold()))?;
        for warning in &result.warnings {
            writeln!(writer, "  {}", p.paint(warning, Style::new().yellow()))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::build_result;
    use crate::facts::{Branch, FetchWarning, RepoSpec, RepositorySnapshot, TimeRange};
    use chrono::{TimeZone, Utc};
    use std::collections::{BTreeMap, HashMap};

    fn result() -> AnalysisResult {
        let now = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
        let snapshot = RepositorySnapshot {
            repo: RepoSpec::new("acme", "widgets"),
            default_branch: "main".into(),
            time_range: TimeRange::Month,
            since: TimeRange::Month.since(now),
            fetched_at: now,
            commits: Vec::new(),
            branches: vec![Branch::new("main", true)],
            pull_requests: Vec::new(),
            commit_details: HashMap::new(),
            ci_cd_tools: Some(vec!["Docker".into()]),
            warnings: vec![FetchWarning::new("pulls", "403 Forbidden")],
            api_requests: BTreeMap::new(),
        };
        build_result(snapshot, None, now)
    }

    #[test]
    fn test_plain_report_sections() {
        let mut out = Vec::new();
        generate(&result(), false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("acme/widgets (month, default branch main)\n"));
        assert!(text.contains("Strategy: Trunk-Based Development"));
        assert!(text.contains("CI/CD\n  Docker"));
        assert!(text.contains("pulls: 403 Forbidden"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_colored_report_has_escapes() {
        let mut out = Vec::new();
        generate(&result(), true, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains('\u{1b}'));
    }
}

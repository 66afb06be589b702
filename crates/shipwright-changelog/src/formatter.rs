//! Changelog formatting
//!
//! Commits are bucketed by type and emitted in the order of the configured
//! type list. Each commit line is a `${path}` template rendered against the
//! serialized commit plus a few derived link fields.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::types::CommitValue;
use shipwright_core::config::{ChangelogConfig, TypeConfig, DEFAULT_COMMIT_TEMPLATE};
use shipwright_core::error::ChangelogError;
use shipwright_core::template;

/// Wrap `text` in parentheses, as a markdown link when `url` is given
pub fn link(text: &str, url: Option<&str>) -> String {
    match url {
        Some(url) => format!("([{}]({}))", text, url),
        None => format!("({})", text),
    }
}

/// Join formatted lines into changelog text
pub fn render(lines: &[String]) -> String {
    lines.join("\n")
}

/// Renders parsed commits into changelog lines
#[derive(Debug, Clone)]
pub struct ChangelogFormatter {
    repo_url: Option<String>,
    template: String,
    include_body: bool,
}

impl ChangelogFormatter {
    /// Formatter with the default commit template and no links
    pub fn new() -> Self {
        Self {
            repo_url: None,
            template: DEFAULT_COMMIT_TEMPLATE.to_string(),
            include_body: false,
        }
    }

    /// Formatter configured from the changelog section
    pub fn from_config(config: &ChangelogConfig) -> Self {
        Self {
            repo_url: config.repo_url.clone(),
            template: config.commit_template.clone(),
            include_body: config.include_body,
        }
    }

    /// Set repository URL for links
    pub fn with_repo_url(mut self, url: impl Into<String>) -> Self {
        self.repo_url = Some(url.into());
        self
    }

    /// Set the commit line template
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Append commit bodies below their lines
    pub fn with_body(mut self, include_body: bool) -> Self {
        self.include_body = include_body;
        self
    }

    /// Group `commits` by type and render them in `types` order.
    ///
    /// Hidden entries and types missing from `types` produce no output.
    #[instrument(skip_all, fields(commit_count = commits.len()))]
    pub fn format(
        &self,
        commits: &[CommitValue],
        types: &[TypeConfig],
    ) -> Result<Vec<String>, ChangelogError> {
        let mut buckets: HashMap<&str, Vec<&CommitValue>> = HashMap::new();
        for commit in commits {
            buckets
                .entry(commit.commitlint.group_key())
                .or_default()
                .push(commit);
        }

        let mut lines = Vec::new();
        for entry in types.iter().filter(|t| !t.hidden) {
            let Some(bucket) = buckets.get(entry.commit_type.as_str()) else {
                continue;
            };

            lines.push(entry.section.clone().unwrap_or_default());
            for commit in bucket {
                lines.push(self.format_commit(commit, &self.template)?);

                if self.include_body {
                    if let Some(body) = &commit.commitlint.body {
                        lines.extend(body.lines().map(str::to_string));
                    }
                }
            }
        }

        debug!(line_count = lines.len(), "formatted changelog");
        Ok(lines)
    }

    /// Format and join into changelog text
    pub fn changelog(
        &self,
        commits: &[CommitValue],
        types: &[TypeConfig],
    ) -> Result<String, ChangelogError> {
        Ok(render(&self.format(commits, types)?))
    }

    /// Render one commit through `template`
    pub fn format_commit(
        &self,
        commit: &CommitValue,
        template: &str,
    ) -> Result<String, ChangelogError> {
        let mut context = match serde_json::to_value(commit) {
            Ok(Value::Object(map)) => map,
            Ok(_) => serde_json::Map::new(),
            Err(e) => {
                return Err(ChangelogError::Context {
                    hash: commit.base.hash.clone(),
                    reason: e.to_string(),
                })
            }
        };

        context.insert("scopeHeader".to_string(), self.scope_header(commit).into());
        context.insert("commitLink".to_string(), self.commit_link(commit).into());
        context.insert("prLink".to_string(), self.pr_link(commit).into());

        Ok(template::render(template, &Value::Object(context)))
    }

    fn scope_header(&self, commit: &CommitValue) -> String {
        match &commit.commitlint.scope {
            Some(scope) if !scope.is_empty() => format!("**{}:**", scope),
            _ => String::new(),
        }
    }

    fn commit_link(&self, commit: &CommitValue) -> String {
        let hash = &commit.base.hash;
        if hash.is_empty() {
            return String::new();
        }

        let short: String = hash.chars().take(7).collect();
        let url = self.url(&format!("commit/{}", hash));
        link(&short, url.as_deref())
    }

    fn pr_link(&self, commit: &CommitValue) -> String {
        match &commit.pr_number {
            Some(number) => {
                let url = self.url(&format!("pull/{}", number));
                link(&format!("#{}", number), url.as_deref())
            }
            None => String::new(),
        }
    }

    fn url(&self, suffix: &str) -> Option<String> {
        self.repo_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .map(|u| format!("{}/{}", u.trim_end_matches('/'), suffix))
    }
}

impl Default for ChangelogFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CommitParser;
    use shipwright_git::RawCommit;

    fn value(hash: &str, subject: &str) -> CommitValue {
        CommitParser::new().parse_raw(RawCommit::new(hash, subject, subject))
    }

    fn types() -> Vec<TypeConfig> {
        vec![
            TypeConfig::new("feat").with_section("### Features"),
            TypeConfig::new("fix").with_section("### Bug Fixes"),
        ]
    }

    #[test]
    fn test_link() {
        assert_eq!(link("x", None), "(x)");
        assert_eq!(link("x", Some("u")), "([x](u))");
    }

    #[test]
    fn test_end_to_end_four_lines() {
        let commits = vec![
            value("abc123", "feat(ui): add button"),
            value("def456", "fix(api): resolve error"),
        ];

        let lines = ChangelogFormatter::new().format(&commits, &types()).unwrap();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "### Features");
        assert!(lines[1].contains("**ui:**"));
        assert!(lines[1].contains("add button"));
        assert_eq!(lines[2], "### Bug Fixes");
        assert!(lines[3].contains("**api:**"));
        assert!(lines[3].contains("resolve error"));
    }

    #[test]
    fn test_default_line_shape() {
        let commit = value("0123456789", "feat(ui): add button (#12)");
        let line = ChangelogFormatter::new()
            .format_commit(&commit, DEFAULT_COMMIT_TEMPLATE)
            .unwrap();
        assert_eq!(line, "\n- **ui:** add button (0123456) (#12)");
    }

    #[test]
    fn test_links_with_repo_url() {
        let commit = value("0123456789", "fix: x (#3)");
        let line = ChangelogFormatter::new()
            .with_repo_url("https://github.com/acme/app/")
            .format_commit(&commit, "${commitLink} ${prLink}")
            .unwrap();
        assert_eq!(
            line,
            "([0123456](https://github.com/acme/app/commit/0123456789)) \
             ([#3](https://github.com/acme/app/pull/3))"
        );
    }

    #[test]
    fn test_missing_values_render_empty() {
        let commit = value("", "tidy");
        let line = ChangelogFormatter::new()
            .format_commit(&commit, "[${scopeHeader}|${commitLink}|${prLink}|${nope.deep}]")
            .unwrap();
        assert_eq!(line, "[|||]");
    }

    #[test]
    fn test_unlisted_and_hidden_types_omitted() {
        let commits = vec![
            value("a", "chore: deps"),
            value("b", "docs: readme"),
            value("c", "feat: x"),
        ];
        let types = vec![
            TypeConfig::new("docs").with_section("### Docs").hidden(),
            TypeConfig::new("feat"),
        ];

        let lines = ChangelogFormatter::new().format(&commits, &types).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "");
        assert!(lines[1].contains("x"));
        assert!(!lines.iter().any(|l| l.contains("Docs") || l.contains("deps")));
    }

    #[test]
    fn test_caller_order_and_commit_order() {
        let commits = vec![
            value("a", "feat: one"),
            value("b", "fix: two"),
            value("c", "feat: three"),
        ];
        let types = vec![
            TypeConfig::new("fix").with_section("F"),
            TypeConfig::new("feat").with_section("A"),
        ];

        let lines = ChangelogFormatter::new()
            .with_template("${commitlint.message}")
            .format(&commits, &types)
            .unwrap();

        assert_eq!(lines, vec!["F", "two", "A", "one", "three"]);
    }

    #[test]
    fn test_typeless_commits_bucket_by_message() {
        let commits = vec![value("a", "Release"), value("b", "Release"), value("c", "Other")];
        let types = vec![TypeConfig::new("Release").with_section("R")];

        let lines = ChangelogFormatter::new()
            .with_template("${base.hash}")
            .format(&commits, &types)
            .unwrap();

        assert_eq!(lines, vec!["R", "a", "b"]);
    }

    #[test]
    fn test_body_lines_included() {
        let commit = CommitParser::new().parse_raw(RawCommit::new(
            "a",
            "feat: x",
            "feat: x\n\nline one\nline two",
        ));
        let formatter = ChangelogFormatter::new().with_template("${commitlint.message}");

        let without = formatter.format(&[commit.clone()], &types()).unwrap();
        assert_eq!(without, vec!["### Features", "x"]);

        let with = formatter.with_body(true).format(&[commit], &types()).unwrap();
        assert_eq!(with, vec!["### Features", "x", "  line one", "  line two"]);
    }

    #[test]
    fn test_render_joins_lines() {
        let lines = vec!["### Features".to_string(), "\n- x".to_string()];
        assert_eq!(render(&lines), "### Features\n\n- x");
    }
}

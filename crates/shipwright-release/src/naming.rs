//! Release naming
//!
//! Tags, branches and pull request text for a release. A set with one package
//! is a single release; anything larger is a batch and uses the batch
//! templates.

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use shipwright_core::config::NamingConfig;
use shipwright_core::error::ReleaseError;
use shipwright_core::template::render_value;
use shipwright_core::{PackageRelease, PullRequestDraft, ReleaseBranchParams, Result, TemplateContext};

/// Source of batch timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clock {
    System,
    Fixed(i64),
}

/// Computes release identifiers from [`NamingConfig`] templates
#[derive(Debug, Clone)]
pub struct ReleaseNaming {
    config: NamingConfig,
    clock: Clock,
}

impl ReleaseNaming {
    /// Naming engine using the current time for batch timestamps
    pub fn new(config: NamingConfig) -> Self {
        Self {
            config,
            clock: Clock::System,
        }
    }

    /// Use a fixed batch timestamp (epoch milliseconds)
    pub fn with_timestamp(mut self, millis: i64) -> Self {
        self.clock = Clock::Fixed(millis);
        self
    }

    /// The naming configuration
    pub fn config(&self) -> &NamingConfig {
        &self.config
    }

    fn timestamp(&self) -> i64 {
        match self.clock {
            Clock::System => chrono::Utc::now().timestamp_millis(),
            Clock::Fixed(millis) => millis,
        }
    }

    /// Name of the release: the package name, or the first `max_workspace`
    /// packages as `name@version` joined for a batch
    pub fn release_name(&self, set: &[PackageRelease]) -> Result<String> {
        match set {
            [] => Err(ReleaseError::NoPackages.into()),
            [single] => Ok(single.name.clone()),
            batch => Ok(batch
                .iter()
                .take(self.config.max_workspace)
                .map(|p| format!("{}{}{}", p.name, self.config.version_separator, p.version))
                .collect::<Vec<_>>()
                .join(&self.config.workspace_separator)),
        }
    }

    /// Tag of the release: the version for a single package, the batch tag
    /// template otherwise
    pub fn release_tag_name(&self, set: &[PackageRelease]) -> Result<String> {
        self.release_tag_name_at(set, self.timestamp())
    }

    fn release_tag_name_at(&self, set: &[PackageRelease], timestamp: i64) -> Result<String> {
        match set {
            [] => Err(ReleaseError::NoPackages.into()),
            [single] => Ok(single.version.clone()),
            batch => {
                let context = TemplateContext::new()
                    .with("length", batch.len())
                    .with("timestamp", timestamp)
                    .into_value();
                Ok(render_value("batch_tag", &self.config.batch_tag, &context)?)
            }
        }
    }

    /// Release branch name
    pub fn branch_name(&self, set: &[PackageRelease], shared: &Map<String, Value>) -> Result<String> {
        let timestamp = self.timestamp();
        let tag_name = self.release_tag_name_at(set, timestamp)?;
        self.branch_name_at(set, &tag_name, shared, timestamp)
    }

    fn branch_name_at(
        &self,
        set: &[PackageRelease],
        tag_name: &str,
        shared: &Map<String, Value>,
        timestamp: i64,
    ) -> Result<String> {
        let release_name = self.release_name(set)?;

        match set {
            [single] => {
                let context = TemplateContext::new()
                    .with("pkgName", single.name.as_str())
                    .with("releaseName", release_name)
                    .with("tagName", tag_name)
                    .extend(shared)
                    .into_value();
                Ok(render_value("branch", &self.config.branch, &context)?)
            }
            batch => {
                let context = TemplateContext::new()
                    .with("pkgName", release_name.as_str())
                    .with("releaseName", release_name.as_str())
                    .with("tagName", tag_name)
                    .extend(shared)
                    .with("length", batch.len())
                    .with("timestamp", timestamp)
                    .into_value();
                Ok(render_value("batch_branch", &self.config.batch_branch, &context)?)
            }
        }
    }

    /// Tag and branch for the set, sharing one timestamp
    #[instrument(skip_all, fields(packages = set.len()))]
    pub fn branch_params(
        &self,
        set: &[PackageRelease],
        shared: &Map<String, Value>,
    ) -> Result<ReleaseBranchParams> {
        let timestamp = self.timestamp();
        let tag_name = self.release_tag_name_at(set, timestamp)?;
        let release_branch = self.branch_name_at(set, &tag_name, shared, timestamp)?;

        debug!(%tag_name, %release_branch, "computed release branch");
        Ok(ReleaseBranchParams {
            tag_name,
            release_branch,
        })
    }

    /// Pull request title. `pkgName` is bound to the release branch.
    pub fn pr_title(&self, params: &ReleaseBranchParams, context: &Map<String, Value>) -> Result<String> {
        let context = TemplateContext::new()
            .extend(context)
            .with("tagName", params.tag_name.as_str())
            .with("pkgName", params.release_branch.as_str())
            .into_value();
        Ok(render_value("pr_title", &self.config.pr_title, &context)?)
    }

    /// Pull request body
    pub fn pr_body(
        &self,
        set: &[PackageRelease],
        params: &ReleaseBranchParams,
        context: &Map<String, Value>,
    ) -> Result<String> {
        let (tag_name, changelog) = match set {
            [] => return Err(ReleaseError::NoPackages.into()),
            [single] => (
                params.tag_name.clone(),
                single.changelog.clone().unwrap_or_default(),
            ),
            batch => {
                let sections = batch
                    .iter()
                    .map(|p| {
                        render_value("pr_body_package", &self.config.pr_body_package, &package_context(p))
                    })
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                let tags = batch
                    .iter()
                    .map(PackageRelease::versioned_name)
                    .collect::<Vec<_>>()
                    .join(" ");
                (tags, sections.join("\n"))
            }
        };

        let context = TemplateContext::new()
            .extend(context)
            .with("tagName", tag_name)
            .with("changelog", changelog)
            .into_value();
        Ok(render_value("pr_body", &self.config.pr_body, &context)?)
    }

    /// Tag for one package's release
    pub fn package_tag_name(&self, pkg: &PackageRelease) -> Result<String> {
        Ok(render_value("tag", &self.config.tag, &package_context(pkg))?)
    }

    /// Glob matching every release tag of a package
    pub fn tag_match_pattern(&self, pkg: &PackageRelease) -> Result<String> {
        Ok(render_value("tag_match", &self.config.tag_match, &package_context(pkg))?)
    }

    /// Branch, tag, title and body for the pull request of a release run
    #[instrument(skip_all, fields(packages = set.len()))]
    pub fn draft(&self, set: &[PackageRelease], context: &Map<String, Value>) -> Result<PullRequestDraft> {
        let params = self.branch_params(set, context)?;
        let title = self.pr_title(&params, context)?;
        let body = self.pr_body(set, &params, context)?;

        Ok(PullRequestDraft {
            branch: params.release_branch,
            tag_name: params.tag_name,
            title,
            body,
        })
    }
}

fn package_context(pkg: &PackageRelease) -> Value {
    TemplateContext::new()
        .with("name", pkg.name.as_str())
        .with("version", pkg.version.as_str())
        .with("path", pkg.path.to_string_lossy().into_owned())
        .with("changelog", pkg.changelog.clone().unwrap_or_default())
        .into_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shipwright_core::error::{ShipwrightError, TemplateError};

    const TS: i64 = 1_700_000_000_000;

    fn naming() -> ReleaseNaming {
        ReleaseNaming::new(NamingConfig::default()).with_timestamp(TS)
    }

    fn pkg(name: &str, version: &str) -> PackageRelease {
        PackageRelease::new(name, version, format!("packages/{}", name))
    }

    fn batch(n: usize) -> Vec<PackageRelease> {
        (0..n).map(|i| pkg(&format!("p{}", i), &format!("1.{}.0", i))).collect()
    }

    #[test]
    fn test_release_name_single() {
        assert_eq!(naming().release_name(&[pkg("ui", "1.0.0")]).unwrap(), "ui");
    }

    #[test]
    fn test_release_name_batch_truncates_in_order() {
        let name = naming().release_name(&batch(5)).unwrap();
        assert_eq!(name, "p0@1.0.0_p1@1.1.0_p2@1.2.0");
    }

    #[test]
    fn test_release_name_custom_separators() {
        let config = NamingConfig {
            max_workspace: 2,
            version_separator: "-v".to_string(),
            workspace_separator: "+".to_string(),
            ..NamingConfig::default()
        };
        let name = ReleaseNaming::new(config).release_name(&batch(3)).unwrap();
        assert_eq!(name, "p0-v1.0.0+p1-v1.1.0");
    }

    #[test]
    fn test_empty_set_is_error() {
        let err = naming().release_name(&[]).unwrap_err();
        assert!(matches!(err, ShipwrightError::Release(ReleaseError::NoPackages)));
    }

    #[test]
    fn test_release_tag_name() {
        assert_eq!(naming().release_tag_name(&[pkg("ui", "2.0.0-rc.1")]).unwrap(), "2.0.0-rc.1");
        assert_eq!(
            naming().release_tag_name(&batch(2)).unwrap(),
            format!("batch-2-packages-{}", TS)
        );
    }

    #[test]
    fn test_branch_name_single_with_shared() {
        let config = NamingConfig {
            branch: json!("${prefix}/${pkgName}/${releaseName}-${tagName}"),
            ..NamingConfig::default()
        };
        let mut shared = Map::new();
        shared.insert("prefix".to_string(), json!("rel"));

        let branch = ReleaseNaming::new(config)
            .branch_name(&[pkg("ui", "1.2.0")], &shared)
            .unwrap();
        assert_eq!(branch, "rel/ui/ui-1.2.0");
        assert_eq!(naming().branch_name(&[pkg("ui", "1.2.0")], &Map::new()).unwrap(), "release-1.2.0");
    }

    #[test]
    fn test_branch_params_batch() {
        let params = naming().branch_params(&batch(2), &Map::new()).unwrap();
        assert_eq!(params.tag_name, format!("batch-2-packages-{}", TS));
        assert_eq!(
            params.release_branch,
            format!("batch-p0@1.0.0_p1@1.1.0-2-packages-{}", TS)
        );
    }

    #[test]
    fn test_non_string_template_is_fatal() {
        let config = NamingConfig {
            branch: json!(42),
            ..NamingConfig::default()
        };
        let err = ReleaseNaming::new(config)
            .branch_name(&[pkg("ui", "1.0.0")], &Map::new())
            .unwrap_err();
        assert!(matches!(
            err,
            ShipwrightError::Template(TemplateError::NotAString { ref name, .. }) if name == "branch"
        ));
    }

    #[test]
    fn test_pr_title() {
        let params = ReleaseBranchParams {
            tag_name: "1.2.0".to_string(),
            release_branch: "release-1.2.0".to_string(),
        };
        let title = naming().pr_title(&params, &Map::new()).unwrap();
        assert_eq!(title, "[release-1.2.0] Release 1.2.0");
    }

    #[test]
    fn test_pr_body_single() {
        let set = vec![pkg("ui", "1.2.0").with_changelog("### Features\n- x")];
        let params = naming().branch_params(&set, &Map::new()).unwrap();
        let body = naming().pr_body(&set, &params, &Map::new()).unwrap();
        assert_eq!(body, "## 1.2.0\n\n### Features\n- x");
    }

    #[test]
    fn test_pr_body_batch() {
        let set = vec![
            pkg("ui", "1.2.0").with_changelog("a"),
            pkg("api", "0.3.0"),
        ];
        let params = naming().branch_params(&set, &Map::new()).unwrap();
        let body = naming().pr_body(&set, &params, &Map::new()).unwrap();
        assert_eq!(
            body,
            "## ui@1.2.0 api@0.3.0\n\n## ui@1.2.0\n\na\n\n## api@0.3.0\n\n\n"
        );
    }

    #[test]
    fn test_package_tags() {
        let ui = pkg("@acme/ui", "1.0.0");
        assert_eq!(naming().package_tag_name(&ui).unwrap(), "@acme/ui@1.0.0");
        assert_eq!(naming().tag_match_pattern(&ui).unwrap(), "@acme/ui@*");
    }

    #[test]
    fn test_draft() {
        let set = vec![pkg("ui", "1.2.0").with_changelog("notes")];
        let draft = naming().draft(&set, &Map::new()).unwrap();
        assert_eq!(draft.branch, "release-1.2.0");
        assert_eq!(draft.tag_name, "1.2.0");
        assert_eq!(draft.title, "[release-1.2.0] Release 1.2.0");
        assert_eq!(draft.body, "## 1.2.0\n\nnotes");
    }
}

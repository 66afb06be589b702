//! Output formatting utilities

use console::{style, Style};

use shipwright_core::{PackageRelease, PullRequestDraft};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    eprintln!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

/// Create a styled key-value line
pub fn key_value(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

fn tag_style() -> Style {
    Style::new().yellow()
}

pub fn path_style() -> Style {
    Style::new().cyan()
}

/// One line per package: name, version and tag
pub fn print_packages(packages: &[PackageRelease], verbose: bool) {
    println!("{}", style("Packages").bold());
    for pkg in packages {
        let tag = pkg.tag_name.as_deref().unwrap_or("-");
        let value = format!(
            "{} {}",
            style(&pkg.version).green().bold(),
            tag_style().apply_to(tag)
        );
        println!("{}", key_value(&pkg.name, &value));

        if verbose {
            if let Some(last) = &pkg.last_tag {
                println!("    since {}", tag_style().apply_to(last));
            }
            println!("    in {}", path_style().apply_to(pkg.path.display()));
        }
    }
}

/// Branch, tag and title of a draft, optionally followed by its body
pub fn print_draft(draft: &PullRequestDraft, with_body: bool) {
    println!("{}", style("Pull request").bold());
    println!("{}", key_value("branch", &draft.branch));
    println!("{}", key_value("tag", &tag_style().apply_to(&draft.tag_name).to_string()));
    println!("{}", key_value("title", &draft.title));

    if with_body {
        println!();
        println!("{}", style(&draft.body).dim());
    }
}

//! On-disk layout of a plan directory.
//!
//! ```text
//! <plan-dir>/
//!   STATUS.md              status document
//!   plan/NN-<slug>.md      one file per step, NN = current step number
//!   feedback/<id>.json     one file per feedback record
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{IoResultExt, Result};
use crate::render::step_label;

/// Status document file name.
pub const STATUS_FILE: &str = "STATUS.md";
/// Directory holding step files.
pub const STEPS_DIR: &str = "plan";
/// Directory holding feedback records.
pub const FEEDBACK_DIR: &str = "feedback";

const MAX_SLUG_LEN: usize = 50;

/// Whether `code` matches `^[a-z0-9]+(-[a-z0-9]+)*$`.
///
/// # Examples
///
/// ```rust
/// use riotplan_core::store::is_valid_code;
///
/// assert!(is_valid_code("big-feature"));
/// assert!(is_valid_code("v2"));
/// assert!(!is_valid_code("Big Feature"));
/// assert!(!is_valid_code("trailing-"));
/// assert!(!is_valid_code("double--hyphen"));
/// ```
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code.split('-').all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}

/// Turns a title into a lowercase, hyphen-separated file name fragment.
pub fn slugify(title: &str) -> String {
    let mut slug = String::new();
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.truncate(MAX_SLUG_LEN);
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "step".to_string()
    } else {
        slug.to_string()
    }
}

/// Path of the status document inside a plan directory.
pub fn status_path(plan_dir: &Path) -> PathBuf {
    plan_dir.join(STATUS_FILE)
}

/// Whether `plan_dir` holds a plan structure.
pub fn has_plan(plan_dir: &Path) -> bool {
    status_path(plan_dir).is_file()
}

/// File name for a new step file, e.g. `03-write-tests.md`.
pub fn step_file_name(number: u32, title: &str) -> String {
    format!("{}-{}.md", step_label(number), slugify(title))
}

/// Splits `NN-rest.md` into its number and the `-rest.md` tail.
pub fn split_step_file_name(name: &str) -> Option<(u32, &str)> {
    if !name.ends_with(".md") {
        return None;
    }
    let digits = name.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let (number, rest) = name.split_at(digits);
    if !rest.starts_with('-') && rest != ".md" {
        return None;
    }
    Some((number.parse().ok()?, rest))
}

/// Name a step file takes when its step is renumbered; the slug part a person
/// may have chosen is kept.
pub fn renumbered_file_name(name: &str, number: u32) -> Option<String> {
    let (_, rest) = split_step_file_name(name)?;
    Some(format!("{}{rest}", step_label(number)))
}

/// A step file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFile {
    pub number: u32,
    pub path: PathBuf,
}

impl StepFile {
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

/// Lists step files ordered by number, then name. A missing steps directory
/// yields an empty list.
pub fn scan_step_files(plan_dir: &Path) -> Result<Vec<StepFile>> {
    let dir = plan_dir.join(STEPS_DIR);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(&dir).fs_context(&dir)? {
        let entry = entry.fs_context(&dir)?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if let Some((number, _)) = split_step_file_name(name) {
            files.push(StepFile {
                number,
                path: entry.path(),
            });
        }
    }
    files.sort_by(|a, b| a.number.cmp(&b.number).then_with(|| a.path.cmp(&b.path)));
    Ok(files)
}

/// Heading line of a step file.
fn step_heading(number: u32, title: &str) -> String {
    format!("# Step {}: {}", step_label(number), title.replace(['\r', '\n'], " "))
}

/// Initial content of a step file.
pub fn step_file_content(number: u32, title: &str, description: Option<&str>) -> String {
    let mut content = step_heading(number, title);
    content.push('\n');
    if let Some(description) = description {
        content.push('\n');
        content.push_str(description.trim_end());
        content.push('\n');
    }
    content
}

/// Description of a step: the file body below the heading.
pub fn step_description(content: &str) -> Option<String> {
    let body = match content.split_once('\n') {
        Some((first, rest)) if first.starts_with("# ") => rest,
        Some(_) => content,
        None if content.starts_with("# ") => "",
        None => content,
    };
    let body = body.trim();
    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

/// Replaces (or adds) the heading line, leaving the body untouched.
pub fn rewrite_step_heading(content: &str, number: u32, title: &str) -> String {
    let heading = step_heading(number, title);
    match content.split_once('\n') {
        Some((first, rest)) if first.starts_with("# ") => format!("{heading}\n{rest}"),
        None if content.starts_with("# ") => format!("{heading}\n"),
        _ => format!("{heading}\n\n{content}"),
    }
}

/// Writes `content` to a sibling temp file and renames it over `path`.
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file");
    let tmp = path.with_file_name(format!(".{name}.tmp"));

    fs::write(&tmp, content).fs_context(&tmp)?;
    fs::rename(&tmp, path).fs_context(path)?;
    debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Write the Tests!"), "write-the-tests");
        assert_eq!(slugify("  --Setup--  "), "setup");
        assert_eq!(slugify("ünïcode only"), "n-code-only");
        assert_eq!(slugify("???"), "step");
        assert!(slugify(&"long ".repeat(40)).len() <= MAX_SLUG_LEN);
    }

    #[test]
    fn test_step_file_names() {
        assert_eq!(step_file_name(3, "Write tests"), "03-write-tests.md");
        assert_eq!(step_file_name(120, "X"), "120-x.md");

        assert_eq!(split_step_file_name("07-deploy.md"), Some((7, "-deploy.md")));
        assert_eq!(split_step_file_name("07.md"), Some((7, ".md")));
        assert_eq!(split_step_file_name("notes.md"), None);
        assert_eq!(split_step_file_name("07-deploy.txt"), None);
        assert_eq!(split_step_file_name("07deploy.md"), None);

        assert_eq!(
            renumbered_file_name("09-my-own-name.md", 10).as_deref(),
            Some("10-my-own-name.md")
        );
    }

    #[test]
    fn test_step_file_content_round_trip() {
        let content = step_file_content(2, "Implementation", Some("Core work\n\nDetails."));
        assert!(content.starts_with("# Step 02: Implementation\n"));
        assert_eq!(step_description(&content).as_deref(), Some("Core work\n\nDetails."));

        let bare = step_file_content(1, "Setup", None);
        assert_eq!(step_description(&bare), None);
    }

    #[test]
    fn test_rewrite_step_heading_keeps_body() {
        let content = "# Step 02: Implementation\n\nHand-written body.\n";
        assert_eq!(
            rewrite_step_heading(content, 3, "Implementation"),
            "# Step 03: Implementation\n\nHand-written body.\n"
        );
        assert_eq!(
            rewrite_step_heading("no heading\n", 1, "Setup"),
            "# Step 01: Setup\n\nno heading\n"
        );
    }
}

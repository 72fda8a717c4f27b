//! Source locator value object
//!
//! Versions record the editable scene they were published from. The path is
//! usually stored relative to the project root as `{root}/...` and may carry
//! Windows separators. A resolved locator is absolute-or-as-given with `/`
//! separators only, so two versions built from one file compare equal.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while resolving a templated source path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorError {
    #[error("unknown template key '{{{key}}}' in '{template}'")]
    UnknownKey { key: String, template: String },

    #[error("unterminated template key in '{template}'")]
    Unterminated { template: String },
}

/// A normalized, fully substituted source scene path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceLocator(String);

impl SourceLocator {
    /// Substitute `{root}` and normalize separators.
    ///
    /// `{{` and `}}` stand for literal braces.
    pub fn resolve(template: &str, root: &Path) -> Result<Self, LocatorError> {
        let root = root.to_string_lossy();
        let mut out = String::with_capacity(template.len() + root.len());
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    out.push('}');
                }
                '{' => {
                    let mut key = String::new();
                    let mut closed = false;
                    for k in chars.by_ref() {
                        if k == '}' {
                            closed = true;
                            break;
                        }
                        key.push(k);
                    }
                    if !closed {
                        return Err(LocatorError::Unterminated {
                            template: template.to_string(),
                        });
                    }
                    if key != "root" {
                        return Err(LocatorError::UnknownKey {
                            key,
                            template: template.to_string(),
                        });
                    }
                    out.push_str(&root);
                }
                _ => out.push(c),
            }
        }

        Ok(Self::normalized(&out))
    }

    /// Wrap an already substituted path, normalizing separators.
    pub fn normalized(path: &str) -> Self {
        Self(path.replace('\\', "/"))
    }

    /// Turn an absolute path back into a `{root}` template when it lives
    /// under the project root.
    pub fn templated(path: &Path, root: &Path) -> String {
        let path = Self::normalized(&path.to_string_lossy());
        let root = Self::normalized(&root.to_string_lossy());
        let root = root.as_str().trim_end_matches('/');

        if root.is_empty() {
            return path.0;
        }
        match path.as_str().strip_prefix(root) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => format!("{{root}}{}", rest),
            _ => path.0,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(&self.0)
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_root_and_normalizes_separators() {
        let locator =
            SourceLocator::resolve("{root}\\show\\char\\rig\\rigA.ma", Path::new("P:/projects"))
                .unwrap();
        assert_eq!(locator.as_str(), "P:/projects/show/char/rig/rigA.ma");
    }

    #[test]
    fn windows_root_is_normalized_too() {
        let locator =
            SourceLocator::resolve("{root}/rig.ma", Path::new("P:\\projects")).unwrap();
        assert_eq!(locator.as_str(), "P:/projects/rig.ma");
    }

    #[test]
    fn plain_paths_pass_through() {
        let locator = SourceLocator::resolve("/abs/rig.ma", Path::new("/proj")).unwrap();
        assert_eq!(locator.as_str(), "/abs/rig.ma");
    }

    #[test]
    fn escaped_braces_are_literal() {
        let locator = SourceLocator::resolve("{root}/{{v}}.ma", Path::new("/p")).unwrap();
        assert_eq!(locator.as_str(), "/p/{v}.ma");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = SourceLocator::resolve("{work}/rig.ma", Path::new("/p")).unwrap_err();
        assert_eq!(
            err,
            LocatorError::UnknownKey {
                key: "work".to_string(),
                template: "{work}/rig.ma".to_string()
            }
        );
        assert_eq!(err.to_string(), "unknown template key '{work}' in '{work}/rig.ma'");
    }

    #[test]
    fn unterminated_key_is_rejected() {
        let err = SourceLocator::resolve("{root/rig.ma", Path::new("/p")).unwrap_err();
        assert!(matches!(err, LocatorError::Unterminated { .. }));
    }

    #[test]
    fn templated_strips_project_root() {
        let template = SourceLocator::templated(
            Path::new("/proj/char/rig/_auto_update/rigA.auto_model_update.001.ma"),
            Path::new("/proj/"),
        );
        assert_eq!(template, "{root}/char/rig/_auto_update/rigA.auto_model_update.001.ma");
    }

    #[test]
    fn templated_leaves_foreign_paths_alone() {
        let template = SourceLocator::templated(Path::new("/projector/a.ma"), Path::new("/proj"));
        assert_eq!(template, "/projector/a.ma");
    }
}

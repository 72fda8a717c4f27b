//! Auto-update revision naming
//!
//! Every automated update of a dependent scene is saved as a new sibling file
//! so the human-authored source is never overwritten:
//!
//! ```text
//! rig/rigA.ma                                   (authored)
//! rig/_auto_update/rigA.auto_model_update.001.ma (first auto update)
//! rig/_auto_update/rigA.auto_model_update.002.ma (update of the update)
//! ```

use std::path::{Path, PathBuf};

/// Marker embedded in every auto-update revision filename
pub const REVISION_MARKER: &str = ".auto_model_update.";

/// Default directory (next to the source) that receives revisions
pub const DEFAULT_REVISION_DIR: &str = "_auto_update";

const PUBLISHED_SEGMENT: &str = ".published";
const MIN_COUNTER_WIDTH: usize = 3;

/// Compute the revision path for the next automated save of `source`.
pub fn next_revision_path(source: &Path, revision_dir: &str) -> PathBuf {
    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    revision_directory(source, revision_dir).join(next_file_name(&file_name))
}

/// Like [`next_revision_path`], but keeps counting up while `exists` reports
/// the candidate as taken.
pub fn next_free_revision_path(
    source: &Path,
    revision_dir: &str,
    exists: impl Fn(&Path) -> bool,
) -> PathBuf {
    let mut candidate = next_revision_path(source, revision_dir);
    while exists(&candidate) {
        candidate = next_revision_path(&candidate, revision_dir);
    }
    candidate
}

/// Counter embedded in a revision filename, if any.
pub fn revision_counter(path: &Path) -> Option<u32> {
    let file_name = path.file_name()?.to_string_lossy();
    let (_, digits, _) = split_marker(&file_name)?;
    digits.parse().ok()
}

fn revision_directory(source: &Path, revision_dir: &str) -> PathBuf {
    let parent = source.parent().unwrap_or_else(|| Path::new(""));
    let already_inside = parent
        .file_name()
        .map(|name| name == revision_dir)
        .unwrap_or(false);

    if already_inside || revision_dir.is_empty() {
        parent.to_path_buf()
    } else {
        parent.join(revision_dir)
    }
}

fn next_file_name(file_name: &str) -> String {
    match split_marker(file_name) {
        Some((prefix, digits, remainder)) => {
            let remainder = strip_published(remainder);
            format!(
                "{}{}{}{}",
                prefix,
                REVISION_MARKER,
                increment_counter(digits),
                remainder
            )
        }
        None => {
            let (stem, ext) = split_extension(file_name);
            format!("{}{}001{}", stem, REVISION_MARKER, ext)
        }
    }
}

/// Add one to a decimal counter of any length, keeping its zero padding.
fn increment_counter(digits: &str) -> String {
    let mut counter: Vec<u8> =
        format!("{:0>width$}", digits, width = MIN_COUNTER_WIDTH).into_bytes();
    let mut carry = true;
    for digit in counter.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            carry = false;
            break;
        }
    }
    if carry {
        counter.insert(0, b'1');
    }
    counter.into_iter().map(char::from).collect()
}

/// Split `name` into (text before marker, counter digits, text after digits).
fn split_marker(name: &str) -> Option<(&str, &str, &str)> {
    let start = name.rfind(REVISION_MARKER)?;
    let prefix = &name[..start];
    let rest = &name[start + REVISION_MARKER.len()..];
    let digit_len = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digit_len == 0 {
        return None;
    }
    Some((prefix, &rest[..digit_len], &rest[digit_len..]))
}

fn strip_published(remainder: &str) -> &str {
    match remainder.strip_prefix(PUBLISHED_SEGMENT) {
        Some(rest) if rest.is_empty() || rest.starts_with('.') => rest,
        _ => remainder,
    }
}

fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(0) | None => (file_name, ""),
        Some(dot) => (&file_name[..dot], &file_name[dot..]),
    }
}

#![forbid(unsafe_code)]

use std::path::{Component, Path, PathBuf};

use crate::psp::error::{PspError, PspResult};

/// Container path of `file_path` relative to `input_root`, with `/` separators.
pub fn normalize_rel_path(input_root: &Path, file_path: &Path) -> PspResult<String> {
    let rel = file_path
        .strip_prefix(input_root)
        .map_err(|_| PspError::Outside(file_path.to_string_lossy().into_owned()))?;

    let mut out = String::new();
    for (i, comp) in rel.components().enumerate() {
        if i != 0 {
            out.push('/');
        }
        let part = comp.as_os_str().to_str().ok_or_else(|| {
            PspError::Invalid(format!("path is not valid utf-8: {}", file_path.display()))
        })?;
        out.push_str(part);
    }
    out = out.replace('\\', "/");

    if out.is_empty() {
        return Err(PspError::Invalid("empty relative path".into()));
    }

    Ok(out)
}

/// Normalize an entry name taken from an archive. Names that climb out of the
/// archive root or are absolute are rejected.
pub fn normalize_archive_name(name: &str) -> PspResult<String> {
    let unified = name.replace('\\', "/");
    if unified.starts_with('/') {
        return Err(PspError::Outside(name.to_string()));
    }

    let mut parts: Vec<&str> = Vec::new();
    for part in unified.split('/') {
        match part {
            "" | "." => continue,
            ".." => return Err(PspError::Outside(name.to_string())),
            p if p.contains(':') => return Err(PspError::Outside(name.to_string())),
            p => parts.push(p),
        }
    }

    if parts.is_empty() {
        return Err(PspError::Invalid(format!("empty entry name: {name:?}")));
    }
    Ok(parts.join("/"))
}

pub fn prefixed(prefix: &str, rel: &str) -> String {
    if prefix.is_empty() {
        return rel.to_string();
    }
    let mut p = prefix.replace('\\', "/");
    if !p.ends_with('/') {
        p.push('/');
    }
    let r = rel.trim_start_matches('/');
    format!("{p}{r}")
}

pub fn should_exclude(norm_path: &str, excludes: &[String]) -> bool {
    excludes.iter().any(|e| !e.is_empty() && norm_path.contains(e))
}

/// Join a container path onto `root`, refusing anything that would land outside it.
pub fn safe_join(root: &Path, logical: &str) -> PspResult<PathBuf> {
    let rel = Path::new(logical);
    let mut out = root.to_path_buf();
    for comp in rel.components() {
        match comp {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            _ => return Err(PspError::Outside(logical.to_string())),
        }
    }
    if out == root {
        return Err(PspError::Invalid(format!("empty entry path: {logical:?}")));
    }
    Ok(out)
}

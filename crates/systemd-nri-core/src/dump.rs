//! Diagnostic dumping of request objects as YAML log lines.

use serde::Serialize;

/// Renders `obj` as YAML lines, indented under a `prefix: tag:` header.
///
/// # Errors
///
/// Returns the serializer error if `obj` cannot be represented as YAML.
pub fn render<T: Serialize + ?Sized>(
    prefix: &str,
    tag: &str,
    obj: &T,
) -> Result<Vec<String>, serde_yaml::Error> {
    let yaml = serde_yaml::to_string(obj)?;
    let mut lines = Vec::new();
    lines.push(format!("{prefix}: {tag}:"));
    lines.extend(
        yaml.trim()
            .lines()
            .map(|line| format!("{prefix}:    {line}")),
    );
    Ok(lines)
}

/// Logs `obj` at info level, one line per YAML line.
///
/// A value that fails to serialize is reported and skipped; dumping never
/// fails the caller.
pub fn dump<T: Serialize + ?Sized>(prefix: &str, tag: &str, obj: &T) {
    match render(prefix, tag, obj) {
        Ok(lines) => {
            for line in lines {
                tracing::info!("{line}");
            }
        }
        Err(e) => tracing::info!("{prefix}: {tag}: failed to dump object: {e}"),
    }
}

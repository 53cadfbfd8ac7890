//! Classification of stderr produced by elevated commands.
//!
//! sudo reads the password from stdin and always writes its prompt to
//! stderr, so stderr is never empty for a privileged command. The prompt has
//! no trailing newline: real error text from the command lands on the same
//! line, right after it.

use crate::error::{DaemonError, ExecutionErrorKind};

/// Marker of the sudo password prompt.
const PROMPT_MARKER: &str = "password for";

/// Markers of a rejected elevation password.
const RETRY_MARKERS: &[&str] = &["try again", "incorrect password"];

/// Marker of a missing binary on the managed host.
const MISSING_COMMAND_MARKER: &str = "command not found";

/// Informational lines tolerated when listing units.
pub const LISTING_BENIGN: &[&str] = &["could not be found", "not-found", "no such file or directory"];

/// Notices systemctl prints while changing unit enablement.
pub const ENABLEMENT_BENIGN: &[&str] = &[
    "created symlink",
    "removed",
    "synchronizing state of",
    "executing: /lib/systemd/systemd-sysv-install",
    "is not a native service, redirecting to systemd-sysv-install",
];

/// Lines tolerated when removing a unit file that is already gone.
pub const ABSENT_FILE_BENIGN: &[&str] = &["no such file or directory"];

/// Remove sudo prompt text from `stderr`, keeping whatever follows it.
pub fn strip_elevation_prompt(stderr: &str) -> String {
    let mut residual = Vec::new();
    for line in stderr.lines() {
        let mut rest = line;
        // A retry writes several prompts onto one line.
        while let Some(pos) = rest.to_ascii_lowercase().find(PROMPT_MARKER) {
            let after = &rest[pos + PROMPT_MARKER.len()..];
            rest = match after.find(':') {
                Some(colon) => &after[colon + 1..],
                None => "",
            };
        }
        let rest = rest.trim();
        if !rest.is_empty() {
            residual.push(rest);
        }
    }
    residual.join("\n")
}

/// Classify stderr of a privileged command.
///
/// Returns `Ok(())` when stderr is empty, only the sudo prompt, or only lines
/// matching one of `benign` (case-insensitive).
pub fn classify_stderr(stderr: &str, benign: &[&str]) -> Result<(), DaemonError> {
    let lowered = stderr.to_lowercase();

    if RETRY_MARKERS.iter().any(|m| lowered.contains(m)) {
        return Err(DaemonError::Execution {
            kind: ExecutionErrorKind::InvalidElevationCredential,
        });
    }

    let residual = strip_elevation_prompt(stderr);

    if lowered.contains(MISSING_COMMAND_MARKER) {
        return Err(DaemonError::Execution {
            kind: ExecutionErrorKind::CommandUnavailable { detail: residual },
        });
    }

    let significant = residual.lines().any(|line| {
        let line = line.to_lowercase();
        !benign.iter().any(|b| line.contains(b))
    });
    if significant {
        return Err(DaemonError::remote(stderr.trim()));
    }

    Ok(())
}

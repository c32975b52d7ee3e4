use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// How generated file names are built. The original extension is always
/// appended to the stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingScheme {
    /// Milliseconds since the Unix epoch.
    #[default]
    Timestamp,
    Uuid,
}

impl NamingScheme {
    pub fn stem(&self, clock: &StampClock) -> String {
        match self {
            NamingScheme::Timestamp => clock.next().to_string(),
            NamingScheme::Uuid => Uuid::new_v4().to_string(),
        }
    }
}

impl FromStr for NamingScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timestamp" => Ok(NamingScheme::Timestamp),
            "uuid" => Ok(NamingScheme::Uuid),
            other => Err(format!("unknown naming scheme `{other}`")),
        }
    }
}

/// Millisecond stamps that never repeat within one process: each stamp is the
/// current time or one past the previous stamp, whichever is later.
#[derive(Debug, Default)]
pub struct StampClock {
    last: AtomicU64,
}

impl StampClock {
    #[cfg(test)]
    pub fn starting_after(last: u64) -> Self {
        Self {
            last: AtomicU64::new(last),
        }
    }

    pub fn next(&self) -> u64 {
        let now = now_millis();
        let advance = |last: u64| now.max(last + 1);
        match self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(advance(last)))
        {
            Ok(previous) | Err(previous) => advance(previous),
        }
    }
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Extension of a client-supplied file name, dot included.
///
/// Only the last path component is considered. A leading dot does not start
/// an extension (`.bashrc` has none), a name made only of dots has none, and
/// a trailing dot yields `"."`.
pub fn extension_of(original: &str) -> &str {
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
    if base.chars().all(|c| c == '.') {
        return "";
    }
    match base.rfind('.') {
        None | Some(0) => "",
        Some(idx) => &base[idx..],
    }
}

pub fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

use std::cmp::Ordering;
use std::fmt;

/// Dotted numeric schema version (e.g. "2.0.0").
#[derive(Debug, Clone, Eq)]
pub struct SchemaVersion {
    parts: Vec<u32>,
}

/// Schema generation a configuration belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generation {
    /// Flat legacy shape.
    V1,
    /// Nested block shape.
    V2,
}

impl SchemaVersion {
    /// Version stamped on every configuration this crate produces.
    pub const CURRENT: &'static str = "2.0.0";

    /// Parse a version string, tolerating a leading `v` and pre-release suffixes.
    ///
    /// Returns `None` if any remaining segment is non-numeric.
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim().trim_start_matches('v');
        let core = trimmed.split('-').next().unwrap_or(trimmed);
        if core.is_empty() {
            return None;
        }
        let parts = core
            .split('.')
            .map(|segment| segment.parse::<u32>().ok())
            .collect::<Option<Vec<_>>>()?;
        Some(Self { parts })
    }

    /// Parsed form of [`SchemaVersion::CURRENT`].
    pub fn current() -> Self {
        Self { parts: vec![2, 0, 0] }
    }

    pub fn major(&self) -> u32 {
        self.parts.first().copied().unwrap_or(0)
    }

    pub fn generation(&self) -> Generation {
        if self.major() >= 2 { Generation::V2 } else { Generation::V1 }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: Vec<String> = self.parts.iter().map(u32::to_string).collect();
        write!(f, "{}", text.join("."))
    }
}

impl PartialEq for SchemaVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for SchemaVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SchemaVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let max_len = self.parts.len().max(other.parts.len());
        for idx in 0..max_len {
            let left_value = *self.parts.get(idx).unwrap_or(&0);
            let right_value = *other.parts.get(idx).unwrap_or(&0);
            match left_value.cmp(&right_value) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

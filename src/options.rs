#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Knobs for [`crate::parse`]. The defaults accept what real-world exporters produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParseOptions {
    /// Match keywords (`HIERARCHY`, `JOINT`, `End Site`, ...) and channel names exactly.
    pub case_sensitive_keywords: bool,
    /// Ignore (with a warning) lines after the last declared frame instead of failing.
    pub allow_trailing_data: bool,
    /// Deepest joint nesting accepted (the root is depth 0). Deeper files fail with a grammar error.
    pub max_joint_depth: usize,
}

pub const DEFAULT_MAX_JOINT_DEPTH: usize = 256;

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            case_sensitive_keywords: false,
            allow_trailing_data: false,
            max_joint_depth: DEFAULT_MAX_JOINT_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn case_sensitive_keywords(mut self, value: bool) -> Self {
        self.case_sensitive_keywords = value;
        self
    }

    pub fn allow_trailing_data(mut self, value: bool) -> Self {
        self.allow_trailing_data = value;
        self
    }

    pub fn max_joint_depth(mut self, value: usize) -> Self {
        self.max_joint_depth = value;
        self
    }

    pub(crate) fn keyword_matches(&self, field: &str, keyword: &str) -> bool {
        if self.case_sensitive_keywords {
            field == keyword
        } else {
            field.eq_ignore_ascii_case(keyword)
        }
    }
}

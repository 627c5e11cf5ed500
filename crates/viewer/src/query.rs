//! Normalization of pagination and search parameters.
//!
//! Out-of-range parameters are never errors. They are clamped or reset to
//! defaults, and [`Normalized::corrected`] tells the request layer to send the
//! client to the canonical values so shared links normalize.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default number of context lines around a search match.
pub const DEFAULT_CONTEXT_LINES: usize = 5;

/// Smallest accepted context size.
pub const MIN_CONTEXT_LINES: usize = 1;

/// Largest accepted context size.
pub const MAX_CONTEXT_LINES: usize = 300;

/// Which side of a match the context window covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextDirection {
    /// Lines leading up to the match.
    Before,
    /// Lines following the match.
    After,
    /// Lines on both sides.
    #[default]
    Both,
}

impl ContextDirection {
    pub fn includes_before(self) -> bool {
        matches!(self, ContextDirection::Before | ContextDirection::Both)
    }

    pub fn includes_after(self) -> bool {
        matches!(self, ContextDirection::After | ContextDirection::Both)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContextDirection::Before => "before",
            ContextDirection::After => "after",
            ContextDirection::Both => "both",
        }
    }
}

impl fmt::Display for ContextDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized context direction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown context direction: {0}")]
pub struct UnknownDirection(pub String);

impl FromStr for ContextDirection {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before" => Ok(ContextDirection::Before),
            "after" => Ok(ContextDirection::After),
            "both" => Ok(ContextDirection::Both),
            other => Err(UnknownDirection(other.to_string())),
        }
    }
}

/// A normalized value and whether normalization changed anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized<T> {
    pub value: T,
    pub corrected: bool,
}

/// Clamp a requested page number to at least 1.
pub fn normalize_page(page: i64) -> u64 {
    page.max(1) as u64
}

/// Clamp a requested context size into the accepted range.
pub fn clamp_context(context: i64) -> usize {
    context.clamp(MIN_CONTEXT_LINES as i64, MAX_CONTEXT_LINES as i64) as usize
}

/// Treat an empty search string the same as no search.
pub fn normalize_search(search: Option<&str>) -> Option<String> {
    search.filter(|s| !s.is_empty()).map(str::to_string)
}

/// File view parameters as received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawViewQuery {
    pub page: i64,
    pub search: Option<String>,
    pub context: i64,
    pub direction: String,
}

impl Default for RawViewQuery {
    fn default() -> Self {
        Self {
            page: 1,
            search: None,
            context: DEFAULT_CONTEXT_LINES as i64,
            direction: ContextDirection::Both.as_str().to_string(),
        }
    }
}

/// Validated file view parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewQuery {
    pub page: u64,
    pub search: Option<String>,
    pub context: usize,
    pub direction: ContextDirection,
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self {
            page: 1,
            search: None,
            context: DEFAULT_CONTEXT_LINES,
            direction: ContextDirection::Both,
        }
    }
}

impl RawViewQuery {
    pub fn normalize(&self) -> Normalized<ViewQuery> {
        let page = normalize_page(self.page);
        let context = clamp_context(self.context);
        let direction = self
            .direction
            .parse::<ContextDirection>()
            .unwrap_or_default();
        let search = normalize_search(self.search.as_deref());

        let corrected = page as i64 != self.page
            || context as i64 != self.context
            || direction.as_str() != self.direction
            || search != self.search;

        Normalized {
            value: ViewQuery {
                page,
                search,
                context,
                direction,
            },
            corrected,
        }
    }
}

/// Directory listing parameters as received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawListQuery {
    pub page: i64,
    pub search: Option<String>,
}

impl Default for RawListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            search: None,
        }
    }
}

/// Validated directory listing parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: u64,
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            search: None,
        }
    }
}

impl RawListQuery {
    pub fn normalize(&self) -> Normalized<ListQuery> {
        let page = normalize_page(self.page);
        let search = normalize_search(self.search.as_deref());
        let corrected = page as i64 != self.page || search != self.search;

        Normalized {
            value: ListQuery { page, search },
            corrected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse() {
        assert_eq!("before".parse::<ContextDirection>(), Ok(ContextDirection::Before));
        assert_eq!("after".parse::<ContextDirection>(), Ok(ContextDirection::After));
        assert_eq!("both".parse::<ContextDirection>(), Ok(ContextDirection::Both));
        assert!("sideways".parse::<ContextDirection>().is_err());
        assert!("BOTH".parse::<ContextDirection>().is_err());
    }

    #[test]
    fn test_direction_sides() {
        assert!(ContextDirection::Before.includes_before());
        assert!(!ContextDirection::Before.includes_after());
        assert!(!ContextDirection::After.includes_before());
        assert!(ContextDirection::After.includes_after());
        assert!(ContextDirection::Both.includes_before());
        assert!(ContextDirection::Both.includes_after());
    }

    #[test]
    fn test_direction_serialization() {
        let json = serde_json::to_string(&ContextDirection::After).unwrap();
        assert_eq!(json, "\"after\"");
        let restored: ContextDirection = serde_json::from_str("\"before\"").unwrap();
        assert_eq!(restored, ContextDirection::Before);
    }

    #[test]
    fn test_clamp_context() {
        assert_eq!(clamp_context(-4), 1);
        assert_eq!(clamp_context(0), 1);
        assert_eq!(clamp_context(5), 5);
        assert_eq!(clamp_context(300), 300);
        assert_eq!(clamp_context(301), 300);
    }

    #[test]
    fn test_view_query_defaults_are_canonical() {
        let normalized = RawViewQuery::default().normalize();
        assert!(!normalized.corrected);
        assert_eq!(normalized.value, ViewQuery::default());
    }

    #[test]
    fn test_view_query_normalization() {
        let raw = RawViewQuery {
            page: -3,
            search: Some(String::new()),
            context: 1000,
            direction: "sideways".to_string(),
        };
        let normalized = raw.normalize();

        assert!(normalized.corrected);
        assert_eq!(normalized.value.page, 1);
        assert_eq!(normalized.value.search, None);
        assert_eq!(normalized.value.context, MAX_CONTEXT_LINES);
        assert_eq!(normalized.value.direction, ContextDirection::Both);
    }

    #[test]
    fn test_view_query_single_correction() {
        let raw = RawViewQuery {
            page: 4,
            search: Some("timeout".to_string()),
            context: 0,
            direction: "after".to_string(),
        };
        let normalized = raw.normalize();

        assert!(normalized.corrected);
        assert_eq!(normalized.value.page, 4);
        assert_eq!(normalized.value.search.as_deref(), Some("timeout"));
        assert_eq!(normalized.value.context, 1);
        assert_eq!(normalized.value.direction, ContextDirection::After);
    }

    #[test]
    fn test_list_query_normalization() {
        let normalized = RawListQuery {
            page: 0,
            search: Some("cron".to_string()),
        }
        .normalize();
        assert!(normalized.corrected);
        assert_eq!(normalized.value.page, 1);
        assert_eq!(normalized.value.search.as_deref(), Some("cron"));

        let normalized = RawListQuery {
            page: 2,
            search: None,
        }
        .normalize();
        assert!(!normalized.corrected);
    }
}

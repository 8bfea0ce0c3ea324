//! Inline styles applied by hosts that render indicators as HTML.

use serde::Serialize;

use crate::document::{INDICATOR_CLASS, IndicatorMark};
use crate::render::{Badge, IndicatorView, Tone};

/// Shared by every badge.
pub const BADGE_BASE_CSS: &str = "padding: 3px 8px; border-radius: 4px; display: inline-block; font-weight: 600; box-shadow: 0 1px 2px rgba(0,0,0,0.08);";

/// Container of the three metric badges.
pub const INDICATOR_CSS: &str =
    "font-size: 13px; font-weight: 500; padding: 4px 0; display: flex; gap: 8px; flex-wrap: wrap; margin: 5px 0; line-height: 1.2;";

/// Container of the "unavailable" sentinel.
pub const SENTINEL_CSS: &str = "background-color: #999; color: white; padding: 2px 6px; border-radius: 3px;";

const GREEN: &str = "background-color: #e6f7e6; color: #006400; border: 1px solid #c3e6c3;";
const RED: &str = "background-color: #ffebeb; color: #cc0000; border: 1px solid #ffcccc;";
const AMBER: &str = "background-color: #fff8e1; color: #cc0000; border: 1px solid #ffcccc;";
const BLUE: &str = "background-color: #e8f0fe; color: #1a56db; border: 1px solid #b6d1fc;";
const TEAL: &str = "background-color: #e0f7fa; color: #006064; border: 1px solid #b2ebf2;";
const GREY: &str = "background-color: #f3f3f3; color: #555555; border: 1px solid #dddddd;";

impl Tone {
    /// Tone-specific colors, without [`BADGE_BASE_CSS`].
    pub fn palette(&self) -> &'static str {
        match self {
            Tone::BelowThreshold | Tone::Fresh => GREEN,
            Tone::AboveThreshold | Tone::Stale => RED,
            Tone::Recent => AMBER,
            Tone::Views | Tone::Unknown => BLUE,
            Tone::New => TEAL,
            Tone::Pending => GREY,
            Tone::Muted => "",
        }
    }

    /// Complete inline style of a badge in this tone.
    pub fn css(&self) -> String {
        match self {
            Tone::Muted => String::new(),
            _ => format!("{BADGE_BASE_CSS} {}", self.palette()),
        }
    }
}

/// A badge as a host element: class, text and inline style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledBadge {
    pub class: &'static str,
    pub text: String,
    pub tone: Tone,
    pub style: String,
}

/// An indicator as a host element, ready to be materialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledIndicator {
    pub class: &'static str,
    pub mark: IndicatorMark,
    pub style: &'static str,
    pub badges: Vec<StyledBadge>,
}

impl Badge {
    pub fn styled(&self) -> StyledBadge {
        StyledBadge {
            class: self.role.class_name(),
            text: self.text.clone(),
            tone: self.tone,
            style: self.tone.css(),
        }
    }
}

impl IndicatorView {
    /// Element description of this view. The failure sentinel uses the
    /// muted container style.
    pub fn styled(&self) -> StyledIndicator {
        let style = match self.mark() {
            IndicatorMark::Failed => SENTINEL_CSS,
            IndicatorMark::Pending | IndicatorMark::Enriched => INDICATOR_CSS,
        };
        StyledIndicator {
            class: INDICATOR_CLASS,
            mark: self.mark(),
            style,
            badges: self.badges().iter().map(Badge::styled).collect(),
        }
    }
}

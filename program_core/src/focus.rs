//! Focus labels and their normalization to a base focus.
//!
//! Day labels such as `"Push-Strength"` or `"Full Body-HIIT"` carry a base
//! focus (which muscle groups are trained) and an optional suffix (which
//! block-count profile is used). Only the base focus is ever looked up in the
//! muscle-group table.

use crate::types::Vocabulary;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BaseFocus {
    Push,
    Pull,
    Legs,
    Upper,
    Lower,
    #[serde(rename = "Full Body")]
    FullBody,
    Mobility,
}

impl BaseFocus {
    fn aliases(self) -> &'static [&'static str] {
        match self {
            BaseFocus::Push => &["push"],
            BaseFocus::Pull => &["pull"],
            BaseFocus::Legs => &["legs", "leg"],
            BaseFocus::Upper => &["upper body", "upper"],
            BaseFocus::Lower => &["lower body", "lower"],
            BaseFocus::FullBody => &["full body", "full-body", "full_body", "fullbody"],
            BaseFocus::Mobility => &["mobility"],
        }
    }
}

impl Vocabulary for BaseFocus {
    fn all() -> &'static [Self] {
        &[
            BaseFocus::Push,
            BaseFocus::Pull,
            BaseFocus::Legs,
            BaseFocus::Upper,
            BaseFocus::Lower,
            BaseFocus::FullBody,
            BaseFocus::Mobility,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            BaseFocus::Push => "Push",
            BaseFocus::Pull => "Pull",
            BaseFocus::Legs => "Legs",
            BaseFocus::Upper => "Upper",
            BaseFocus::Lower => "Lower",
            BaseFocus::FullBody => "Full Body",
            BaseFocus::Mobility => "Mobility",
        }
    }
}

impl fmt::Display for BaseFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A normalized day focus: base focus plus optional profile suffix
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusLabel {
    pub base: BaseFocus,
    pub suffix: Option<String>,
}

impl FocusLabel {
    pub fn new(base: BaseFocus, suffix: Option<&str>) -> Self {
        Self {
            base,
            suffix: suffix.map(str::to_string),
        }
    }

    /// Same base with the suffix replaced
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self::new(self.base, Some(suffix))
    }
}

impl fmt::Display for FocusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.suffix {
            Some(suffix) => write!(f, "{}-{}", self.base, suffix),
            None => write!(f, "{}", self.base),
        }
    }
}

/// Resolve a focus label to its base focus and suffix
///
/// The longest matching base alias wins, so `"Upper Body-Volume"` resolves to
/// `Upper` with suffix `"Volume"`. Anything after the base (separated by `-`,
/// `_` or a space) is the suffix; it never changes the base.
pub fn normalize_focus(label: &str) -> Result<FocusLabel> {
    let trimmed = label.trim();
    let lowered = trimmed.to_ascii_lowercase();

    let mut best: Option<(BaseFocus, usize)> = None;
    for base in BaseFocus::all() {
        for alias in base.aliases() {
            if !lowered.starts_with(alias) {
                continue;
            }
            let rest = &lowered[alias.len()..];
            let at_boundary = rest.is_empty() || rest.starts_with(['-', '_', ' ']);
            if at_boundary && best.map_or(true, |(_, len)| alias.len() > len) {
                best = Some((*base, alias.len()));
            }
        }
    }

    let (base, matched) = best.ok_or_else(|| {
        Error::Config(format!("Focus label '{}' does not name a known focus", label))
    })?;

    let suffix = trimmed[matched..]
        .trim_start_matches(['-', '_', ' '])
        .trim();

    Ok(FocusLabel {
        base,
        suffix: (!suffix.is_empty()).then(|| suffix.to_string()),
    })
}

//! Sidebar pages.

use super::ViewError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Every page the dashboard can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Page {
    #[default]
    Home,
    GlobalTrend,
    DecadalAndSeasonal,
    WarmingStart,
    GlobalMap,
    CityCompare,
    Credits,
}

impl Page {
    /// Sidebar order.
    pub const ALL: [Page; 7] = [
        Page::Home,
        Page::GlobalTrend,
        Page::DecadalAndSeasonal,
        Page::WarmingStart,
        Page::GlobalMap,
        Page::CityCompare,
        Page::Credits,
    ];

    /// Label shown in the sidebar.
    pub fn label(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::GlobalTrend => "Global Land Avg Temp",
            Page::DecadalAndSeasonal => "Decadal and Seasonal Trends",
            Page::WarmingStart => "When Did Warming Start",
            Page::GlobalMap => "Global Temp Map",
            Page::CityCompare => "Major City Comparison",
            Page::Credits => "Thanks and Credits",
        }
    }

    fn variant_name(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::GlobalTrend => "GlobalTrend",
            Page::DecadalAndSeasonal => "DecadalAndSeasonal",
            Page::WarmingStart => "WarmingStart",
            Page::GlobalMap => "GlobalMap",
            Page::CityCompare => "CityCompare",
            Page::Credits => "Credits",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Page {
    type Err = ViewError;

    /// Accepts the sidebar label or the variant name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Page::ALL
            .into_iter()
            .find(|page| {
                page.label().eq_ignore_ascii_case(wanted)
                    || page.variant_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ViewError::InvalidPage(s.to_string()))
    }
}

impl Page {
    /// Page for a configured name. Unknown names fall back to Home.
    pub fn from_name_or_home(name: &str) -> Page {
        name.parse().unwrap_or_else(|e| {
            warn!("{}, showing Home", e);
            Page::Home
        })
    }
}

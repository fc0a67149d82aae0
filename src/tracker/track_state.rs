use crate::tracker::region::Region;

/// Tracker session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerState {
    /// No region has been accepted yet
    #[default]
    Uninitialized,
    /// Target located; holds the region last reported by the capability
    Tracking(Region),
    /// Target not found in the latest frame; holds the last-known region, for display only
    Lost(Region),
}

impl TrackerState {
    /// Current or last-known region, if the session was ever initialized.
    pub fn region(&self) -> Option<Region> {
        match *self {
            Self::Uninitialized => None,
            Self::Tracking(region) | Self::Lost(region) => Some(region),
        }
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self, Self::Tracking(_))
    }

    pub fn is_lost(&self) -> bool {
        matches!(self, Self::Lost(_))
    }

    /// Short overlay label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Uninitialized => "Uninitialized",
            Self::Tracking(_) => "Tracking",
            Self::Lost(_) => "Lost!",
        }
    }
}

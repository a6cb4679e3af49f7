use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a native view, assigned by the view manager
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ViewTag(pub u32);

impl ViewTag {
    /// Tag value the view manager never hands out
    pub const UNSET: ViewTag = ViewTag(0);

    pub fn is_set(self) -> bool {
        self.0 != 0
    }
}

impl From<u32> for ViewTag {
    fn from(value: u32) -> Self {
        ViewTag(value)
    }
}

impl fmt::Display for ViewTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Tri-state attendance mark.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Attendance of one collaborator in one session.
///
/// `Unset` means nobody recorded anything yet; it is never the same as
/// `Marked(false)`. On the wire this is `null | true | false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Attendance {
    #[default]
    Unset,
    Marked(bool),
}

impl Attendance {
    pub const PRESENT: Attendance = Attendance::Marked(true);
    pub const ABSENT: Attendance = Attendance::Marked(false);

    pub fn is_marked(&self) -> bool {
        matches!(self, Attendance::Marked(_))
    }

    /// Strictly `Marked(true)`.
    pub fn is_attendee(&self) -> bool {
        matches!(self, Attendance::Marked(true))
    }

    pub fn is_absentee(&self) -> bool {
        matches!(self, Attendance::Marked(false))
    }

    pub fn as_option(&self) -> Option<bool> {
        match self {
            Attendance::Unset => None,
            Attendance::Marked(value) => Some(*value),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Attendance::Unset => "Not marked",
            Attendance::Marked(true) => "Present",
            Attendance::Marked(false) => "Absent",
        }
    }
}

impl From<Option<bool>> for Attendance {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(v) => Attendance::Marked(v),
            None => Attendance::Unset,
        }
    }
}

impl From<bool> for Attendance {
    fn from(value: bool) -> Self {
        Attendance::Marked(value)
    }
}

impl Serialize for Attendance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Attendance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<bool>::deserialize(deserializer).map(Attendance::from)
    }
}

//! Status transitions

use crate::formats::ts::{Message, Status};

impl Status {
    /// Statuses this one may move to.
    #[must_use]
    pub fn successors(self) -> &'static [Status] {
        match self {
            Self::Unfinished => &[Self::Finished, Self::Vanished],
            Self::Finished => &[Self::Unfinished, Self::Obsolete],
            Self::Obsolete => &[Self::Vanished],
            Self::Vanished => &[],
        }
    }

    /// Whether moving to `next` is allowed. Staying put always is.
    #[must_use]
    pub fn can_transition_to(self, next: Status) -> bool {
        self == next || self.successors().contains(&next)
    }
}

impl Message {
    /// Set the status and the matching `type` attribute.
    ///
    /// Callers check [`Status::can_transition_to`] first.
    pub(crate) fn apply_status(&mut self, next: Status) {
        self.status = next;
        self.translation.type_attribute = match next {
            Status::Finished => None,
            other => Some(other.as_str().to_string()),
        };
    }
}

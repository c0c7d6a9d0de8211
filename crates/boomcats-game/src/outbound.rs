//! Collects the notifications one game action produces.

use boomcats_protocol::{Notification, Recipient, SessionId};

/// Notifications in the order they must be delivered.
#[derive(Debug, Default)]
pub(crate) struct Outbound {
    notices: Vec<(Recipient, Notification)>,
}

impl Outbound {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn all(&mut self, notification: Notification) {
        self.notices.push((Recipient::All, notification));
    }

    pub(crate) fn to(&mut self, session: SessionId, notification: Notification) {
        self.notices.push((Recipient::Session(session), notification));
    }

    pub(crate) fn all_except(
        &mut self,
        excluded: &[SessionId],
        notification: Notification,
    ) {
        self.notices
            .push((Recipient::AllExcept(excluded.to_vec()), notification));
    }

    pub(crate) fn into_vec(self) -> Vec<(Recipient, Notification)> {
        self.notices
    }
}

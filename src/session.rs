//! State kept by a client of this API between requests.
//!
//! The value is owned by whoever drives the client and is only changed by
//! [`reduce`], so every view sees the state it was handed and nothing else.

use crate::models::{Notification, UserView};

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub user: Option<UserView>,
    pub notifications: Vec<Notification>,
    pub loading: bool,
}

#[derive(Debug, Clone)]
pub enum SessionAction {
    SetUser(Option<UserView>),
    SetNotifications(Vec<Notification>),
    SetLoading(bool),
    SignOut,
}

impl SessionState {
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

pub fn reduce(state: SessionState, action: SessionAction) -> SessionState {
    match action {
        SessionAction::SetUser(user) => SessionState { user, ..state },
        SessionAction::SetNotifications(notifications) => SessionState {
            notifications,
            ..state
        },
        SessionAction::SetLoading(loading) => SessionState { loading, ..state },
        SessionAction::SignOut => SessionState::default(),
    }
}

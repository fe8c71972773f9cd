use std::collections::HashMap;
use std::sync::Mutex;

use tracing::warn;

use crate::cache::VoteCache;
use crate::errors::ClientError;
use crate::identity::ClientIdentity;
use crate::transport::VoteTransport;

/// Displayed state for one project's vote button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub count: u64,
    pub voted: bool,
    pub in_flight: bool,
}

/// What a toggle attempt did to the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleEvent {
    /// Server truth applied: the button's new voted state and count.
    Applied { voted: bool, count: u64 },
    /// A toggle for this project is already in flight; nothing was sent.
    InFlight,
    /// The request failed; displayed state is unchanged. The message is a
    /// dismissible notice, never a panic.
    Failed(String),
}

/// A set of vote buttons, one per project.
///
/// Button state sits behind a mutex so the per-button in-flight guard holds
/// under concurrent toggles. Buttons are independent: no ordering is
/// guaranteed across projects and there is no cross-button coordination.
pub struct VotePanel {
    identity: ClientIdentity,
    buttons: Mutex<HashMap<String, ButtonState>>,
    cache: Mutex<VoteCache>,
}

impl VotePanel {
    /// Create a panel for a set of projects, all buttons starting at
    /// count 0, not voted, idle.
    pub fn new(
        identity: ClientIdentity,
        cache: VoteCache,
        projects: impl IntoIterator<Item = String>,
    ) -> Self {
        let buttons = projects
            .into_iter()
            .map(|project| (project, ButtonState::default()))
            .collect();

        Self {
            identity,
            buttons: Mutex::new(buttons),
            cache: Mutex::new(cache),
        }
    }

    /// Seed displayed counts from the server and merge cached voted flags.
    ///
    /// The cached flag is shown without waiting for server confirmation; it
    /// is advisory and the next toggle response overwrites it with server
    /// truth. A project whose seed request fails keeps count 0 and gets a
    /// warning, not an error.
    pub async fn init(&self, transport: &dyn VoteTransport) {
        let projects: Vec<String> = {
            let buttons = self.buttons.lock().expect("button map lock poisoned");
            buttons.keys().cloned().collect()
        };

        for project in projects {
            match transport.tally(&project).await {
                Ok(reply) => {
                    let mut buttons = self.buttons.lock().expect("button map lock poisoned");
                    if let Some(state) = buttons.get_mut(&project) {
                        state.count = reply.count;
                    }
                }
                Err(e) => warn!(project = %project, "tally seed failed: {e}"),
            }
        }

        let cache = self.cache.lock().expect("cache lock poisoned");
        let mut buttons = self.buttons.lock().expect("button map lock poisoned");
        for (project, state) in buttons.iter_mut() {
            state.voted = cache.voted_for(project);
        }
    }

    /// Current state of one button, if the project is registered.
    pub fn button(&self, project: &str) -> Option<ButtonState> {
        let buttons = self.buttons.lock().expect("button map lock poisoned");
        buttons.get(project).copied()
    }

    /// Toggle the vote for one project.
    ///
    /// At most one toggle per button is in flight at a time; a second click
    /// while the first is pending is refused without sending anything. On
    /// success the button takes its voted state and count strictly from the
    /// response and the local cache is updated to match. On failure the
    /// prior displayed state is left unchanged.
    pub async fn toggle(&self, transport: &dyn VoteTransport, project: &str) -> ToggleEvent {
        {
            let mut buttons = self.buttons.lock().expect("button map lock poisoned");
            let Some(state) = buttons.get_mut(project) else {
                return ToggleEvent::Failed(format!("unknown project: {project}"));
            };
            if state.in_flight {
                return ToggleEvent::InFlight;
            }
            state.in_flight = true;
        }

        // No cancellation: the request runs to completion and the button
        // stays in flight until the transport resolves or errors.
        let result = transport.toggle(project, self.identity.as_str()).await;

        let mut buttons = self.buttons.lock().expect("button map lock poisoned");
        let Some(state) = buttons.get_mut(project) else {
            return ToggleEvent::Failed(format!("unknown project: {project}"));
        };
        state.in_flight = false;

        match result {
            Ok(reply) => {
                state.voted = reply.voted;
                state.count = reply.count;
                drop(buttons);
                self.remember(project, reply.voted);
                ToggleEvent::Applied {
                    voted: reply.voted,
                    count: reply.count,
                }
            }
            Err(e) => ToggleEvent::Failed(notice_for(&e)),
        }
    }

    fn remember(&self, project: &str, voted: bool) {
        let mut cache = self.cache.lock().expect("cache lock poisoned");
        if let Err(e) = cache.set(project, voted) {
            warn!(project = %project, "vote cache write failed: {e}");
        }
    }
}

fn notice_for(err: &ClientError) -> String {
    match err {
        ClientError::Api { status, .. } if *status >= 500 => {
            "Vote failed, please try again".to_string()
        }
        ClientError::Http(_) => "Vote failed, please check your connection".to_string(),
        other => format!("Vote failed: {other}"),
    }
}

// src/client/mod.rs

//! Executable model of the footer injected into the Turbo bundle.
//!
//! The footer runs in the browser against the host's per-module hot data.
//! Here that scratch space is an explicit [`HotData`] store and the footer's
//! behaviour is replayed by [`HotContext`], so the guard-flag logic can be
//! exercised without a JavaScript engine.
//!
//! Lifecycle: a [`HotContext`] is one browser session. Re-evaluating the
//! patched bundle after a hot update calls [`HotContext::evaluate_footer`]
//! again; [`HotContext::full_page_load`] starts a fresh session.

use std::collections::HashMap;

use crate::host::TURBO_REFRESH_EVENT;
use crate::patch::snippet::{
    BEFORE_FULL_RELOAD_EVENT, NO_RELOAD_SENTINEL, REFRESHED_FLAG, REFRESH_STREAM,
    REGISTERED_FLAG,
};
use crate::patch::PatchMode;

/// Per-module hot-update scratch data, keyed by guard-flag name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotData {
    flags: HashMap<String, bool>,
}

impl HotData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unset flags read as `false`.
    pub fn get(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: &str, value: bool) {
        self.flags.insert(key.to_string(), value);
    }

    pub fn clear(&mut self) {
        self.flags.clear();
    }
}

/// The Turbo global's stream-rendering entry point.
pub trait StreamRenderer {
    fn render_stream_message(&mut self, html: &str);
}

/// Payload of the host's before-full-reload event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FullReloadPayload {
    /// Page the host is about to reload; `None` means "whatever is open".
    pub path: Option<String>,
}

impl FullReloadPayload {
    /// Whether the host will actually reload after listeners ran.
    pub fn will_reload(&self) -> bool {
        self.path.as_deref() != Some(NO_RELOAD_SENTINEL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Listener {
    Refresh { mark_refreshed: bool },
    BeforeFullReload,
}

impl Listener {
    fn event(&self) -> &'static str {
        match self {
            Listener::Refresh { .. } => TURBO_REFRESH_EVENT,
            Listener::BeforeFullReload => BEFORE_FULL_RELOAD_EVENT,
        }
    }
}

#[derive(Debug, Default)]
pub struct HotContext {
    data: HotData,
    listeners: Vec<Listener>,
}

impl HotContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &HotData {
        &self.data
    }

    /// Number of listeners registered for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.iter().filter(|l| l.event() == event).count()
    }

    /// Run the footer once, as happens on every evaluation of the bundle.
    ///
    /// Returns `true` if listeners were registered by this evaluation.
    pub fn evaluate_footer(&mut self, mode: PatchMode) -> bool {
        if self.data.get(REGISTERED_FLAG) {
            return false;
        }
        self.data.set(REGISTERED_FLAG, true);

        let suppress = mode == PatchMode::SuppressFullReload;
        self.listeners.push(Listener::Refresh {
            mark_refreshed: suppress,
        });
        if suppress {
            self.listeners.push(Listener::BeforeFullReload);
        }
        true
    }

    /// Deliver a `turbo-refresh` live update. Returns how many listeners ran.
    pub fn dispatch_refresh(&mut self, renderer: &mut dyn StreamRenderer) -> usize {
        let mut ran = 0;
        for listener in &self.listeners {
            if let Listener::Refresh { mark_refreshed } = *listener {
                if mark_refreshed {
                    self.data.set(REFRESHED_FLAG, true);
                }
                renderer.render_stream_message(REFRESH_STREAM);
                ran += 1;
            }
        }
        ran
    }

    /// Deliver the host's before-full-reload event, letting listeners
    /// rewrite the payload.
    pub fn dispatch_before_full_reload(&mut self, payload: &mut FullReloadPayload) {
        let listening = self.listener_count(BEFORE_FULL_RELOAD_EVENT);
        for _ in 0..listening {
            if self.data.get(REFRESHED_FLAG) {
                payload.path = Some(NO_RELOAD_SENTINEL.to_string());
                self.data.set(REFRESHED_FLAG, false);
            }
        }
    }

    /// A real page load: hot data and listeners are gone.
    pub fn full_page_load(&mut self) {
        self.data.clear();
        self.listeners.clear();
    }
}

//! Mutable session state: the waveform collection plus display settings.
//!
//! There is exactly one `Session` per process, constructed by the top-level
//! controller and passed by reference into every core call; nothing in here
//! is a module-level global. All mutation funnels through `&mut self`
//! methods, so a concurrent embedding only needs to put the session behind
//! a single owner to serialize compound operations like rename or the
//! envelope policy below.

pub mod collection;
pub mod display;

use tracing::debug;

pub use collection::{
    CollectionError, SpecDefaults, WaveformCollection, WaveformId, WaveformSpec,
};
pub use display::DisplaySettings;

use crate::io::config::ConfigRecord;
use crate::state::collection::{AMPLITUDE, DUTY_CYCLE, FREQUENCY, OFFSET};

/// The single owner of mutable core state.
///
/// Policy enforced here, spanning both halves:
/// - showing any envelope hides the source waveforms and locks structural
///   mutation of the collection (add/remove);
/// - when fewer than two members remain enabled, every envelope is forced
///   off, which in turn lifts the lock.
#[derive(Debug, Clone, Default)]
pub struct Session {
    collection: WaveformCollection,
    display: DisplaySettings,
}

impl Session {
    /// Build a session from the persisted defaults record.
    pub fn new(config: &ConfigRecord) -> Self {
        let defaults = SpecDefaults {
            kind: config.waveform_type,
            frequency: FREQUENCY.clamp(config.frequency),
            amplitude: AMPLITUDE.clamp(config.amplitude),
            offset: OFFSET.clamp(config.offset),
            duty_cycle: DUTY_CYCLE.clamp(config.duty_cycle),
        };
        Self {
            collection: WaveformCollection::new(defaults),
            display: DisplaySettings::from_config(config),
        }
    }

    pub fn collection(&self) -> &WaveformCollection {
        &self.collection
    }

    /// Mutable access for policy-neutral edits (rename, selection, kind and
    /// numeric setters, add). Enabling/disabling members and removal go
    /// through [`Session::set_enabled`] and [`Session::remove`] so the
    /// envelope policy is re-checked.
    pub fn collection_mut(&mut self) -> &mut WaveformCollection {
        &mut self.collection
    }

    pub fn display(&self) -> &DisplaySettings {
        &self.display
    }

    /// Mutable access for time span, grid, and display bounds. Envelope
    /// flags are only reachable through the `set_show_*` methods.
    pub fn display_mut(&mut self) -> &mut DisplaySettings {
        &mut self.display
    }

    pub fn can_show_envelopes(&self) -> bool {
        self.collection.can_show_envelopes()
    }

    /// Enable or disable a member, then re-check the envelope policy: with
    /// fewer than two enabled members, all envelopes are forced off.
    pub fn set_enabled(&mut self, id: WaveformId, enabled: bool) -> bool {
        let changed = self.collection.set_enabled(id, enabled);
        if changed {
            self.enforce_envelope_policy();
        }
        changed
    }

    /// Remove a member, then re-check the envelope policy.
    pub fn remove(&mut self, id: WaveformId) -> bool {
        let removed = self.collection.remove(id);
        if removed {
            self.enforce_envelope_policy();
        }
        removed
    }

    /// Show or hide the max envelope. Turning an envelope on requires
    /// [`Session::can_show_envelopes`]; the request is refused otherwise.
    pub fn set_show_max_envelope(&mut self, show: bool) -> bool {
        self.set_envelope(show, |display, value| display.show_max_envelope = value)
    }

    pub fn set_show_min_envelope(&mut self, show: bool) -> bool {
        self.set_envelope(show, |display, value| display.show_min_envelope = value)
    }

    pub fn set_show_rms_envelope(&mut self, show: bool) -> bool {
        self.set_envelope(show, |display, value| display.show_rms_envelope = value)
    }

    fn set_envelope(&mut self, show: bool, apply: fn(&mut DisplaySettings, bool)) -> bool {
        if show && !self.can_show_envelopes() {
            return false;
        }
        apply(&mut self.display, show);
        self.sync_source_hidden();
        true
    }

    fn enforce_envelope_policy(&mut self) {
        if !self.collection.can_show_envelopes() && self.display.any_envelope_shown() {
            debug!("fewer than two enabled waveforms, dropping envelopes");
            self.display.show_max_envelope = false;
            self.display.show_min_envelope = false;
            self.display.show_rms_envelope = false;
        }
        self.sync_source_hidden();
    }

    fn sync_source_hidden(&mut self) {
        self.collection
            .set_source_hidden(self.display.any_envelope_shown());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_two_members() -> Session {
        let mut session = Session::default();
        session.collection_mut().add();
        session
    }

    #[test]
    fn showing_an_envelope_locks_structural_mutation() {
        let mut session = session_with_two_members();
        assert!(session.set_show_max_envelope(true));
        assert!(session.collection().source_hidden());

        let before = session.collection().len();
        assert_eq!(session.collection_mut().add(), None);
        let id = session.collection().active_id();
        assert!(!session.remove(id));
        assert_eq!(session.collection().len(), before);

        assert!(session.set_show_max_envelope(false));
        assert!(!session.collection().source_hidden());
        assert!(session.collection_mut().add().is_some());
    }

    #[test]
    fn envelopes_need_two_enabled_members() {
        let mut session = Session::default();
        assert!(!session.can_show_envelopes());
        assert!(!session.set_show_max_envelope(true));
        assert!(!session.display().show_max_envelope());

        session.collection_mut().add();
        assert!(session.can_show_envelopes());
        assert!(session.set_show_rms_envelope(true));
    }

    #[test]
    fn disabling_below_two_forces_envelopes_off() {
        let mut session = session_with_two_members();
        session.set_show_max_envelope(true);
        session.set_show_min_envelope(true);

        let second = session.collection().active_id();
        assert!(session.set_enabled(second, false));

        assert!(!session.display().any_envelope_shown());
        assert!(!session.collection().source_hidden());
        assert!(session.collection_mut().add().is_some());
    }

    #[test]
    fn turning_an_envelope_off_is_always_allowed() {
        let mut session = session_with_two_members();
        session.set_show_max_envelope(true);
        session.set_show_min_envelope(true);
        assert!(session.set_show_min_envelope(false));
        // One envelope still shown, lock stays.
        assert!(session.collection().source_hidden());
        assert!(session.set_show_max_envelope(false));
        assert!(!session.collection().source_hidden());
    }

    #[test]
    fn removal_recovers_the_envelope_policy() {
        let mut session = session_with_two_members();
        session.set_show_max_envelope(true);

        // Locked: removal refused while the envelope is up.
        let member = session.collection().active_id();
        assert!(!session.remove(member));

        session.set_show_max_envelope(false);
        assert!(session.remove(member));
        assert!(!session.can_show_envelopes());
        assert!(!session.set_show_max_envelope(true));
    }

    #[test]
    fn defaults_are_clamped_from_the_config_record() {
        let record = ConfigRecord {
            frequency: 1_000.0,
            amplitude: -4.0,
            ..ConfigRecord::default()
        };
        let session = Session::new(&record);
        let spec = session.collection().active();
        assert_eq!(spec.frequency(), FREQUENCY.max);
        assert_eq!(spec.amplitude(), AMPLITUDE.min);
    }
}

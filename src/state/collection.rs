//! The bounded, ordered collection of waveform definitions a user edits.
//!
//! Insertion order is significant: it drives list rendering and export
//! column order. Ids are assigned once, monotonically, and never reused for
//! the life of the process, which pins each spec's default name and palette
//! color even across removals.

use thiserror::Error;

use crate::dsp::oscillator::WaveKind;

/// The collection is never empty.
pub const MIN_WAVEFORMS: usize = 1;
/// Upper bound on user-defined waveforms.
pub const MAX_WAVEFORMS: usize = 5;

pub type WaveformId = u32;

/// Inclusive numeric bounds plus the step the presentation layer nudges by.
#[derive(Debug, Clone, Copy)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParamRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn at_min(&self, value: f64) -> bool {
        value <= self.min
    }

    pub fn at_max(&self, value: f64) -> bool {
        value >= self.max
    }
}

pub const FREQUENCY: ParamRange = ParamRange::new(0.0, 100.0, 1.0);
pub const AMPLITUDE: ParamRange = ParamRange::new(0.1, 10.0, 0.5);
pub const OFFSET: ParamRange = ParamRange::new(-10.0, 10.0, 0.5);
pub const DUTY_CYCLE: ParamRange = ParamRange::new(0.0, 100.0, 5.0);

/// Parameter values used to seed newly created specs. Loaded from the
/// persisted config record at startup; edits to the record only reach here
/// on the next process start.
#[derive(Debug, Clone, Copy)]
pub struct SpecDefaults {
    pub kind: WaveKind,
    pub frequency: f64,
    pub amplitude: f64,
    pub offset: f64,
    pub duty_cycle: f64,
}

impl Default for SpecDefaults {
    fn default() -> Self {
        Self {
            kind: WaveKind::Sine,
            frequency: 1.0,
            amplitude: 5.0,
            offset: 0.0,
            duty_cycle: 50.0,
        }
    }
}

/// Stable per-spec colors, cycled by id.
pub const PALETTE: [(u8, u8, u8); 5] = [
    (31, 119, 180),
    (255, 127, 14),
    (44, 160, 44),
    (214, 39, 40),
    (148, 103, 189),
];

pub fn palette_color(id: WaveformId) -> (u8, u8, u8) {
    PALETTE[id as usize % PALETTE.len()]
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollectionError {
    #[error("no waveform with id {0}")]
    UnknownId(WaveformId),
    #[error("a waveform named \"{0}\" already exists")]
    DuplicateName(String),
}

/// One user-defined signal. Mutation goes through the collection so bounds
/// and uniqueness stay enforced.
#[derive(Debug, Clone)]
pub struct WaveformSpec {
    id: WaveformId,
    kind: WaveKind,
    frequency: f64,
    amplitude: f64,
    offset: f64,
    duty_cycle: f64,
    enabled: bool,
    name: String,
}

impl WaveformSpec {
    fn new(id: WaveformId, name: String, defaults: &SpecDefaults) -> Self {
        Self {
            id,
            kind: defaults.kind,
            frequency: FREQUENCY.clamp(defaults.frequency),
            amplitude: AMPLITUDE.clamp(defaults.amplitude),
            offset: OFFSET.clamp(defaults.offset),
            duty_cycle: DUTY_CYCLE.clamp(defaults.duty_cycle),
            enabled: true,
            name,
        }
    }

    /// The default display name for a given id, independent of position.
    pub fn default_name(id: WaveformId) -> String {
        format!("Waveform {}", id + 1)
    }

    pub fn id(&self) -> WaveformId {
        self.id
    }

    pub fn kind(&self) -> WaveKind {
        self.kind
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn duty_cycle(&self) -> f64 {
        self.duty_cycle
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> (u8, u8, u8) {
        palette_color(self.id)
    }
}

/// Ordered sequence of specs with an always-valid active selection.
#[derive(Debug, Clone)]
pub struct WaveformCollection {
    specs: Vec<WaveformSpec>,
    active_id: WaveformId,
    next_id: WaveformId,
    defaults: SpecDefaults,
    source_hidden: bool,
}

impl WaveformCollection {
    /// Create a collection seeded with one spec built from `defaults`.
    pub fn new(defaults: SpecDefaults) -> Self {
        let mut collection = Self {
            specs: Vec::with_capacity(MAX_WAVEFORMS),
            active_id: 0,
            next_id: 0,
            defaults,
            source_hidden: false,
        };
        let first = collection
            .add()
            .unwrap_or_else(|| unreachable!("empty collection always has room"));
        collection.active_id = first;
        collection
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WaveformSpec> {
        self.specs.iter()
    }

    pub fn get(&self, id: WaveformId) -> Option<&WaveformSpec> {
        self.specs.iter().find(|spec| spec.id == id)
    }

    /// Members currently included in synthesis, in collection order.
    pub fn enabled_members(&self) -> impl Iterator<Item = &WaveformSpec> {
        self.specs.iter().filter(|spec| spec.enabled)
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled_members().count()
    }

    /// Envelopes need at least two enabled members to aggregate across.
    pub fn can_show_envelopes(&self) -> bool {
        self.enabled_count() >= 2
    }

    /// True while any envelope is shown; structural mutation is locked.
    pub fn source_hidden(&self) -> bool {
        self.source_hidden
    }

    pub(crate) fn set_source_hidden(&mut self, hidden: bool) {
        self.source_hidden = hidden;
    }

    pub fn active_id(&self) -> WaveformId {
        self.active_id
    }

    /// The active spec. The selection invariant guarantees it exists.
    pub fn active(&self) -> &WaveformSpec {
        self.specs
            .iter()
            .find(|spec| spec.id == self.active_id)
            .unwrap_or_else(|| unreachable!("active id always refers to a member"))
    }

    /// Select a member for editing. Unknown ids are rejected unchanged.
    pub fn set_active(&mut self, id: WaveformId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.active_id = id;
        true
    }

    pub fn can_add(&self) -> bool {
        self.specs.len() < MAX_WAVEFORMS && !self.source_hidden
    }

    pub fn can_remove(&self) -> bool {
        self.specs.len() > MIN_WAVEFORMS && !self.source_hidden
    }

    /// Append a spec built from the stored defaults. Returns the new id, or
    /// `None` when the collection is full or structurally locked.
    pub fn add(&mut self) -> Option<WaveformId> {
        if self.specs.len() >= MAX_WAVEFORMS || self.source_hidden {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;

        // A member may have been renamed to a future default name; suffix
        // until unique so the name invariant holds at creation too.
        let mut name = WaveformSpec::default_name(id);
        let mut attempt = 2;
        while self.name_taken(&name, id) {
            name = format!("{} ({attempt})", WaveformSpec::default_name(id));
            attempt += 1;
        }

        self.specs.push(WaveformSpec::new(id, name, &self.defaults));
        Some(id)
    }

    /// Delete a member. Fails at the size floor, under the structural lock,
    /// or for unknown ids. Removing the active member moves the selection to
    /// the preceding member, or the first if none precedes.
    pub fn remove(&mut self, id: WaveformId) -> bool {
        if self.specs.len() <= MIN_WAVEFORMS || self.source_hidden {
            return false;
        }
        let Some(position) = self.position(id) else {
            return false;
        };
        self.specs.remove(position);
        if self.active_id == id {
            let fallback = position.saturating_sub(1);
            self.active_id = self.specs[fallback].id;
        }
        true
    }

    /// Set a member's display name. Leading/trailing whitespace is trimmed;
    /// an empty result reverts to the default name for that id. A name
    /// already used by a different member is rejected with the collection
    /// unchanged, so the caller can re-prompt.
    pub fn rename(&mut self, id: WaveformId, new_name: &str) -> Result<(), CollectionError> {
        let position = self.position(id).ok_or(CollectionError::UnknownId(id))?;
        let trimmed = new_name.trim();
        let name = if trimmed.is_empty() {
            WaveformSpec::default_name(id)
        } else {
            trimmed.to_string()
        };
        if self.name_taken(&name, id) {
            return Err(CollectionError::DuplicateName(name));
        }
        self.specs[position].name = name;
        Ok(())
    }

    pub fn set_kind(&mut self, id: WaveformId, kind: WaveKind) -> bool {
        self.update(id, |spec| spec.kind = kind)
    }

    pub fn set_frequency(&mut self, id: WaveformId, frequency: f64) -> bool {
        self.update(id, |spec| spec.frequency = FREQUENCY.clamp(frequency))
    }

    pub fn set_amplitude(&mut self, id: WaveformId, amplitude: f64) -> bool {
        self.update(id, |spec| spec.amplitude = AMPLITUDE.clamp(amplitude))
    }

    pub fn set_offset(&mut self, id: WaveformId, offset: f64) -> bool {
        self.update(id, |spec| spec.offset = OFFSET.clamp(offset))
    }

    pub fn set_duty_cycle(&mut self, id: WaveformId, duty_cycle: f64) -> bool {
        self.update(id, |spec| spec.duty_cycle = DUTY_CYCLE.clamp(duty_cycle))
    }

    /// Include or exclude a member from synthesis, envelopes, and export.
    ///
    /// Callers with envelopes on screen should go through
    /// [`Session::set_enabled`](crate::state::Session::set_enabled) so the
    /// envelope policy is re-checked afterwards.
    pub fn set_enabled(&mut self, id: WaveformId, enabled: bool) -> bool {
        self.update(id, |spec| spec.enabled = enabled)
    }

    fn update(&mut self, id: WaveformId, apply: impl FnOnce(&mut WaveformSpec)) -> bool {
        match self.specs.iter_mut().find(|spec| spec.id == id) {
            Some(spec) => {
                apply(spec);
                true
            }
            None => false,
        }
    }

    fn position(&self, id: WaveformId) -> Option<usize> {
        self.specs.iter().position(|spec| spec.id == id)
    }

    fn name_taken(&self, name: &str, exclude: WaveformId) -> bool {
        self.specs
            .iter()
            .any(|spec| spec.id != exclude && spec.name == name)
    }
}

impl Default for WaveformCollection {
    fn default() -> Self {
        Self::new(SpecDefaults::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_collection() -> WaveformCollection {
        let mut collection = WaveformCollection::default();
        while collection.add().is_some() {}
        collection
    }

    #[test]
    fn starts_with_one_default_member() {
        let collection = WaveformCollection::default();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.active().name(), "Waveform 1");
        assert!(collection.active().enabled());
        assert_eq!(collection.active().frequency(), 1.0);
    }

    #[test]
    fn add_stops_at_the_size_ceiling() {
        let mut collection = full_collection();
        assert_eq!(collection.len(), MAX_WAVEFORMS);
        assert_eq!(collection.add(), None);
        assert_eq!(collection.len(), MAX_WAVEFORMS);
    }

    #[test]
    fn remove_stops_at_the_size_floor() {
        let mut collection = WaveformCollection::default();
        let only = collection.active_id();
        assert!(!collection.remove(only));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn removing_the_active_member_selects_the_preceding_one() {
        let mut collection = WaveformCollection::default();
        let first = collection.active_id();
        let second = collection.add().unwrap();
        let third = collection.add().unwrap();

        collection.set_active(third);
        assert!(collection.remove(third));
        assert_eq!(collection.active_id(), second);

        // Removing the first member while it is active falls to the new first.
        collection.set_active(first);
        assert!(collection.remove(first));
        assert_eq!(collection.active_id(), second);
    }

    #[test]
    fn removing_an_inactive_member_keeps_the_selection() {
        let mut collection = WaveformCollection::default();
        let first = collection.active_id();
        let second = collection.add().unwrap();
        assert!(collection.remove(second));
        assert_eq!(collection.active_id(), first);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut collection = WaveformCollection::default();
        let second = collection.add().unwrap();
        assert!(collection.remove(second));
        let third = collection.add().unwrap();
        assert_ne!(third, second);
        assert!(third > second);
    }

    #[test]
    fn set_active_rejects_unknown_ids() {
        let mut collection = WaveformCollection::default();
        let active = collection.active_id();
        assert!(!collection.set_active(999));
        assert_eq!(collection.active_id(), active);
    }

    #[test]
    fn rename_trims_and_rejects_duplicates() {
        let mut collection = WaveformCollection::default();
        let first = collection.active_id();
        let second = collection.add().unwrap();

        assert_eq!(collection.rename(first, "  bass line  "), Ok(()));
        assert_eq!(collection.get(first).unwrap().name(), "bass line");

        let err = collection.rename(second, "bass line");
        assert_eq!(
            err,
            Err(CollectionError::DuplicateName("bass line".into()))
        );
        assert_eq!(collection.get(second).unwrap().name(), "Waveform 2");
    }

    #[test]
    fn rename_to_empty_reverts_to_the_default_name() {
        let mut collection = WaveformCollection::default();
        let first = collection.active_id();
        collection.rename(first, "something else").unwrap();
        collection.rename(first, "   ").unwrap();
        assert_eq!(collection.get(first).unwrap().name(), "Waveform 1");
    }

    #[test]
    fn add_sidesteps_a_stolen_default_name() {
        let mut collection = WaveformCollection::default();
        let first = collection.active_id();
        collection.rename(first, "Waveform 2").unwrap();
        let second = collection.add().unwrap();
        assert_eq!(collection.get(second).unwrap().name(), "Waveform 2 (2)");
    }

    #[test]
    fn numeric_setters_clamp_to_their_bounds() {
        let mut collection = WaveformCollection::default();
        let id = collection.active_id();

        collection.set_frequency(id, 500.0);
        assert_eq!(collection.active().frequency(), FREQUENCY.max);
        collection.set_frequency(id, -3.0);
        assert_eq!(collection.active().frequency(), FREQUENCY.min);

        collection.set_amplitude(id, 0.0);
        assert_eq!(collection.active().amplitude(), AMPLITUDE.min);

        collection.set_offset(id, -100.0);
        assert_eq!(collection.active().offset(), OFFSET.min);

        collection.set_duty_cycle(id, 120.0);
        assert_eq!(collection.active().duty_cycle(), DUTY_CYCLE.max);
    }

    #[test]
    fn setters_report_unknown_ids() {
        let mut collection = WaveformCollection::default();
        assert!(!collection.set_frequency(999, 2.0));
        assert!(!collection.set_enabled(999, false));
        assert_eq!(
            collection.rename(999, "x"),
            Err(CollectionError::UnknownId(999))
        );
    }

    #[test]
    fn enabled_members_preserve_collection_order() {
        let mut collection = WaveformCollection::default();
        let first = collection.active_id();
        let second = collection.add().unwrap();
        let third = collection.add().unwrap();
        collection.set_enabled(second, false);

        let ids: Vec<_> = collection.enabled_members().map(|s| s.id()).collect();
        assert_eq!(ids, vec![first, third]);
        assert_eq!(collection.enabled_count(), 2);
        assert!(collection.can_show_envelopes());

        collection.set_enabled(third, false);
        assert!(!collection.can_show_envelopes());
    }

    #[test]
    fn structural_lock_blocks_add_and_remove() {
        let mut collection = WaveformCollection::default();
        let second = collection.add().unwrap();
        collection.set_source_hidden(true);

        assert_eq!(collection.add(), None);
        assert!(!collection.remove(second));
        assert!(!collection.can_add());
        assert!(!collection.can_remove());

        // Non-structural edits stay allowed.
        assert!(collection.set_frequency(second, 3.0));
        collection.set_source_hidden(false);
        assert!(collection.remove(second));
    }

    #[test]
    fn colors_cycle_through_the_palette() {
        assert_eq!(palette_color(0), PALETTE[0]);
        assert_eq!(palette_color(4), PALETTE[4]);
        assert_eq!(palette_color(5), PALETTE[0]);
        assert_eq!(palette_color(7), PALETTE[2]);
    }
}

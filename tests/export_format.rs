//! End-to-end check of the synthesis → envelope → export pipeline through
//! the public API: the written table must share the synthesized time grid
//! exactly, row for row.

use wavescope::dsp::envelope::compute_max;
use wavescope::dsp::oscillator::{generate, SampledSignal, WaveKind};
use wavescope::io::config::ConfigRecord;
use wavescope::io::export::{self, EnvelopeRecord, MAX_ENVELOPE_LABEL};
use wavescope::state::Session;
use wavescope::SAMPLE_RATE;

#[test]
fn exported_table_matches_the_synthesized_grid() {
    let mut session = Session::new(&ConfigRecord::default());
    let second = session.collection_mut().add().expect("room for a second");
    session.collection_mut().set_kind(second, WaveKind::Square);
    session.collection_mut().set_frequency(second, 4.0);
    assert!(session.set_show_max_envelope(true));

    let duration = session.display().time_span();
    let mut records = Vec::new();
    let mut signals: Vec<SampledSignal> = Vec::new();
    for spec in session.collection().enabled_members() {
        let signal = generate(
            spec.kind(),
            spec.frequency(),
            spec.amplitude(),
            spec.offset(),
            spec.duty_cycle(),
            duration,
            SAMPLE_RATE,
        );
        records.push(export::prepare(
            spec.name(),
            &signal,
            spec.kind(),
            spec.frequency(),
            spec.amplitude(),
            spec.offset(),
            spec.duty_cycle(),
        ));
        signals.push(signal);
    }
    let envelopes = vec![EnvelopeRecord::new(
        MAX_ENVELOPE_LABEL,
        &compute_max(&signals),
    )];

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("waveforms.csv");
    let message = export::export(&path, &records, Some(&envelopes), SAMPLE_RATE, duration)
        .expect("export should succeed");
    assert!(message.contains("2 waveform(s)"));

    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines = text.lines().filter(|line| !line.starts_with('#'));

    let header = lines.next().unwrap();
    assert_eq!(header, "Time,Waveform_1_Sine,Waveform_2_Square,Max_Envelope");

    let expected_rows = (duration * SAMPLE_RATE).round() as usize + 1;
    let data: Vec<&str> = lines.collect();
    assert_eq!(data.len(), expected_rows);
    assert_eq!(data.len(), signals[0].len());

    for (row, (&t, &a)) in data
        .iter()
        .zip(signals[0].time.iter().zip(&signals[0].amplitude))
    {
        let mut fields = row.split(',');
        let time: f64 = fields.next().unwrap().parse().unwrap();
        let first: f64 = fields.next().unwrap().parse().unwrap();
        assert_eq!(time, t, "time column must round-trip to full precision");
        assert_eq!(first, a, "amplitude column must round-trip to full precision");
    }
}

#[test]
fn export_with_nothing_enabled_fails_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    let result = export::export(&path, &[], None, SAMPLE_RATE, 1.0);
    assert!(result.is_err());
    assert!(!path.exists());
}

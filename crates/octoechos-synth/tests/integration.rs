//! Integration tests for octoechos-synth.
//!
//! Drives the engine the way the keyboard does: ids from keyboard positions,
//! pitches from the scale engine, clicks interleaved with melody notes.

use octoechos_core::{generate_keyboard, to_frequency};
use octoechos_synth::{
    EngineSettings, EnvelopeShape, Lifecycle, ToneCommand, ToneEngine, ToneSink, VoiceId, Waveform,
};
use proptest::prelude::*;

const SR: f32 = 48000.0;

fn render(engine: &mut ToneEngine<16>, samples: usize) -> Vec<f32> {
    let mut out = vec![0.0; samples];
    engine.render(&mut out);
    out
}

fn peak(signal: &[f32]) -> f32 {
    signal.iter().fold(0.0f32, |m, s| m.max(s.abs()))
}

#[test]
fn test_keyboard_chord_through_engine() {
    let kb = generate_keyboard(1);
    let mut engine: ToneEngine<16> = ToneEngine::new(SR);
    for position in [0, 2, 4] {
        let note = kb.get(position).unwrap();
        let hz = to_frequency(note, 293.66, 0) as f32;
        engine.start(VoiceId::Key(position as u32), hz, Waveform::Triangle);
    }
    assert_eq!(engine.live_voice_count(), 3);

    let out = render(&mut engine, 4800);
    assert!(peak(&out) > 0.5, "chord should be audible");

    engine.all_notes_off();
    assert_eq!(engine.live_voice_count(), 0);
    render(&mut engine, 48000);
    assert_eq!(engine.sounding_voice_count(), 0);
}

#[test]
fn test_clicks_do_not_disturb_melody() {
    let mut engine: ToneEngine<16> = ToneEngine::new(SR);
    let melody = VoiceId::Key(0);
    engine.start(melody, 440.0, Waveform::Triangle);
    render(&mut engine, 2400);

    for _ in 0..4 {
        engine.start(VoiceId::CLICK, 880.0, Waveform::Square);
        render(&mut engine, 1200);
    }
    assert_eq!(engine.lifecycle(melody), Some(Lifecycle::Sustaining));
    assert_eq!(engine.live_voice_count(), 1);
    assert!(engine.sounding_voice_count() >= 2);
}

#[test]
fn test_release_tail_silences_completely() {
    let mut engine: ToneEngine<16> = ToneEngine::new(SR);
    engine.start(VoiceId::Key(1), 300.0, Waveform::Saw);
    render(&mut engine, 4800);
    engine.stop(VoiceId::Key(1));

    // 100 ms release plus 50 ms tail
    let tail = render(&mut engine, 7200 + 10);
    assert!(peak(&tail[..100]) > 0.5, "release starts near full level");
    assert!(peak(&tail[4700..4800]) < 0.01, "release reaches the floor");
    assert_eq!(peak(&tail[7201..]), 0.0);
}

#[test]
fn test_custom_settings_apply_to_new_voices() {
    let settings = EngineSettings {
        note: EnvelopeShape {
            attack_ms: 10.0,
            ..EnvelopeShape::NOTE
        },
        ..EngineSettings::default()
    };
    let mut engine: ToneEngine<16> = ToneEngine::with_settings(SR, settings);
    engine.start(VoiceId::Key(0), 440.0, Waveform::Sine);
    render(&mut engine, 480);
    assert_eq!(engine.lifecycle(VoiceId::Key(0)), Some(Lifecycle::Sustaining));
}

#[test]
fn test_tone_sink_commands() {
    let mut engine: ToneEngine<16> = ToneEngine::new(SR);
    {
        let sink: &mut dyn ToneSink = &mut engine;
        sink.start(VoiceId::Tag("drone"), 146.83, Waveform::Sine);
        sink.set_master_volume(0.5);
    }
    assert!(engine.is_live(VoiceId::Tag("drone")));
    assert_eq!(engine.master_volume(), 0.5);
    engine.send(ToneCommand::Stop {
        id: VoiceId::Tag("drone"),
    });
    assert!(!engine.is_live(VoiceId::Tag("drone")));
}

#[derive(Clone, Copy, Debug)]
enum Op {
    Start(u32, f32),
    Stop(u32),
    Click,
    Render(u16),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u32..6, 100.0f32..1000.0).prop_map(|(k, f)| Op::Start(k, f)),
        (0u32..6).prop_map(Op::Stop),
        Just(Op::Click),
        (1u16..2000).prop_map(Op::Render),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Whatever the sequence of operations, each id maps to at most one live
    /// voice and the output stays finite and bounded.
    #[test]
    fn ids_stay_unique(ops in prop::collection::vec(op(), 1..60)) {
        let mut engine: ToneEngine<16> = ToneEngine::new(SR);
        let mut block = vec![0.0f32; 2000];
        for op in ops {
            match op {
                Op::Start(k, f) => engine.start(VoiceId::Key(k), f, Waveform::Triangle),
                Op::Stop(k) => engine.stop(VoiceId::Key(k)),
                Op::Click => engine.start(VoiceId::CLICK, 880.0, Waveform::Square),
                Op::Render(n) => engine.render(&mut block[..n as usize]),
            }
            for k in 0..6 {
                let count = engine
                    .voices()
                    .iter()
                    .filter(|v| v.id() == Some(VoiceId::Key(k)))
                    .count();
                prop_assert!(count <= 1, "id {} live {} times", k, count);
            }
            prop_assert!(engine.live_voice_count() <= 6);
            prop_assert!(block.iter().all(|s| s.is_finite() && s.abs() <= 17.0));
        }
    }
}

//! Allocation-free render path tests.
//!
//! These tests verify that `RenderEngine::render()` does not allocate. They
//! render for several seconds with the oscillator running and every pad
//! retriggering, so voice activation, sample end and note changes all happen
//! inside the guarded region.
//!
//! Just run `cargo test`; no feature flags needed.

use assert_no_alloc::{assert_no_alloc, AllocDisabler};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

use pt_engine::{build_engine, EngineConfig, EngineParts, PAD_COUNT};
use pt_ir::{AudioBuffer, ParamId, Sample};

const SR: u32 = 44100;

fn pad_samples() -> Vec<Option<Sample>> {
    (0..PAD_COUNT)
        .map(|pad| {
            let len = 500 + pad * 97;
            let data: Vec<f32> = (0..len).map(|i| ((i + pad) as f32 * 0.01).sin() * 0.3).collect();
            if pad % 2 == 0 {
                Some(Sample::from_mono("mono", data, SR))
            } else {
                Some(Sample::from_stereo("stereo", data.clone(), data, SR))
            }
        })
        .collect()
}

fn engine() -> EngineParts {
    let config = EngineConfig {
        sample_rate: SR,
        ..Default::default()
    };
    build_engine(&config, pad_samples()).unwrap()
}

#[test]
fn oscillator_alloc_free() {
    let mut parts = engine();
    parts.controls.play();
    parts.controls.set_param(ParamId::Volume, 0.8);

    let mut out = AudioBuffer::new(2, 256);
    assert_no_alloc(|| {
        for _ in 0..(SR as usize * 5) / 256 {
            parts.renderer.render(&mut out);
        }
    });
    assert!(out.peak() > 0.0);
}

#[test]
fn pads_and_notes_alloc_free() {
    let mut parts = engine();
    let mut out = AudioBuffer::new(2, 128);

    // Requests are posted outside the guard; the render side only drains
    // and plays them.
    for block in 0..(SR as usize * 5) / 128 {
        if block % 7 == 0 {
            parts.controls.request_trigger(block % PAD_COUNT).unwrap();
        }
        if block % 50 == 0 {
            parts.router.handle_raw(&[0x90, 48 + (block % 24) as u8, 100]);
        }
        parts.controls.set_param(ParamId::Detune, (block % 48) as f32 - 24.0);
        assert_no_alloc(|| parts.renderer.render(&mut out));
    }
    let _ = parts.notifications.drain().count();
}

#[test]
fn interleaved_alloc_free() {
    let mut parts = engine();
    parts.controls.play();
    for pad in 0..PAD_COUNT {
        parts.controls.request_trigger(pad).unwrap();
    }

    let mut device = vec![0.0f32; 512 * 2];
    assert_no_alloc(|| {
        for _ in 0..(SR as usize * 3) / 512 {
            parts.renderer.render_interleaved(&mut device, 2);
        }
    });
}

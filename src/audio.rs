//! Audio system using Web Audio API
//!
//! Feedback cues are short procedurally generated tones.

use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

use crate::assets::{AudioSink, Cue};
use crate::settings::Settings;

/// Web Audio implementation of [`AudioSink`]
pub struct WebAudio {
    ctx: Option<AudioContext>,
    /// Master x sfx, 0 when muted
    volume: f32,
}

impl WebAudio {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_volume(),
        }
    }

    /// Create an oscillator routed through a gain node
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Single decaying tone starting `delay` seconds from now
    fn beep(ctx: &AudioContext, freq: f32, length: f64, osc_type: OscillatorType, gain: f32, delay: f64) {
        let Some((osc, g)) = Self::create_osc(ctx, freq, osc_type) else {
            return;
        };
        let t = ctx.current_time() + delay;
        g.gain().set_value_at_time(gain, t).ok();
        g.gain()
            .exponential_ramp_to_value_at_time(0.001, t + length)
            .ok();
        osc.start_with_when(t).ok();
        osc.stop_with_when(t + length).ok();
    }

    /// Shot - quick upward chirp
    fn play_fire(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = Self::create_osc(ctx, 600.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.15, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(600.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(1400.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Explosion - sawtooth rumble with a crack on top
    fn play_explosion(ctx: &AudioContext, vol: f32) {
        Self::beep(ctx, 180.0, 0.4, OscillatorType::Sawtooth, vol * 0.2, 0.0);
        Self::beep(ctx, 1500.0, 0.1, OscillatorType::Square, vol * 0.05, 0.0);
    }

    /// Life lost - low falling thud
    fn play_life_lost(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = Self::create_osc(ctx, 140.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.5)
            .ok();
        osc.frequency().set_value_at_time(140.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(40.0, t + 0.45)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.55).ok();
    }

    fn play_wave_complete(ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 500.0, 600.0, 800.0].iter().enumerate() {
            Self::beep(ctx, *freq, 0.4, OscillatorType::Triangle, vol * 0.3, i as f64 * 0.1);
        }
    }

    /// Game over - sad descending
    fn play_game_over(ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            Self::beep(ctx, *freq, 0.3, OscillatorType::Sine, vol * 0.3, i as f64 * 0.2);
        }
    }
}

impl AudioSink for WebAudio {
    fn play(&mut self, cue: Cue) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        match cue {
            Cue::Fire => Self::play_fire(ctx, vol),
            Cue::Explosion => Self::play_explosion(ctx, vol),
            Cue::WrongAnswer => Self::beep(ctx, 120.0, 0.18, OscillatorType::Sine, vol * 0.14, 0.0),
            Cue::LifeLost => Self::play_life_lost(ctx, vol),
            Cue::WaveComplete => Self::play_wave_complete(ctx, vol),
            Cue::GameOver => Self::play_game_over(ctx, vol),
        }
    }

    fn suspend(&mut self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.suspend();
        }
    }

    /// Also needed after the first user gesture
    fn resume(&mut self) {
        if let Some(ctx) = &self.ctx {
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }

    fn close(&mut self) {
        if let Some(ctx) = self.ctx.take() {
            let _ = ctx.close();
        }
    }
}

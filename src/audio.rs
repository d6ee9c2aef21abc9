//! Sound cues and the Web Audio synthesiser that plays them
//!
//! Procedurally generated sound effects - no external files needed!
//! Each cue maps to a single oscillator voice; the voice table is plain data
//! so it can be checked without a browser.

use crate::sim::{GameEvent, PowerupKind};

/// Fire-and-forget sound triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Jump,
    Dash,
    /// Unshielded crash or shield break
    Crash,
    /// Currency collected
    Pickup,
    /// Shield, warp or magnet collected
    Powerup,
    /// Theme purchased
    Buy,
    /// Purchase refused
    Denied,
    /// Countdown tick (3, 2, 1, GO)
    Countdown,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Jump => "jump",
            SoundCue::Dash => "dash",
            SoundCue::Crash => "crash",
            SoundCue::Pickup => "pickup",
            SoundCue::Powerup => "powerup",
            SoundCue::Buy => "buy",
            SoundCue::Denied => "denied",
            SoundCue::Countdown => "countdown",
        }
    }

    /// Cue for a simulation event
    pub fn from_event(event: GameEvent) -> Self {
        match event {
            GameEvent::Jumped | GameEvent::DoubleJumped => SoundCue::Jump,
            GameEvent::DashStarted => SoundCue::Dash,
            GameEvent::PowerupCollected(PowerupKind::Currency) => SoundCue::Pickup,
            GameEvent::PowerupCollected(_) => SoundCue::Powerup,
            GameEvent::ShieldAbsorbed | GameEvent::Crashed => SoundCue::Crash,
        }
    }

    /// Gameplay cues only sound while a run is active; menu cues always do
    pub fn is_gameplay(&self) -> bool {
        !matches!(self, SoundCue::Buy | SoundCue::Denied | SoundCue::Countdown)
    }

    pub fn voice(&self) -> Voice {
        match self {
            SoundCue::Jump => Voice {
                wave: Wave::Square,
                from_hz: 150.0,
                to_hz: 400.0,
                glide: Glide::Exponential,
                gain: 0.05,
                fade: Fade::Linear,
                duration: 0.1,
            },
            SoundCue::Dash => Voice {
                wave: Wave::Sawtooth,
                from_hz: 800.0,
                to_hz: 1200.0,
                glide: Glide::Linear,
                gain: 0.05,
                fade: Fade::Linear,
                duration: 0.2,
            },
            SoundCue::Crash => Voice {
                wave: Wave::Sawtooth,
                from_hz: 100.0,
                to_hz: 10.0,
                glide: Glide::Exponential,
                gain: 0.2,
                fade: Fade::Exponential,
                duration: 0.3,
            },
            SoundCue::Pickup => Voice {
                wave: Wave::Sine,
                from_hz: 1200.0,
                to_hz: 2000.0,
                glide: Glide::Linear,
                gain: 0.05,
                fade: Fade::Linear,
                duration: 0.1,
            },
            SoundCue::Powerup => Voice {
                wave: Wave::Triangle,
                from_hz: 400.0,
                to_hz: 800.0,
                glide: Glide::Linear,
                gain: 0.1,
                fade: Fade::Linear,
                duration: 0.3,
            },
            SoundCue::Buy => Voice {
                wave: Wave::Sine,
                from_hz: 600.0,
                to_hz: 900.0,
                glide: Glide::Step,
                gain: 0.1,
                fade: Fade::Linear,
                duration: 0.2,
            },
            SoundCue::Denied => Voice {
                wave: Wave::Square,
                from_hz: 200.0,
                to_hz: 120.0,
                glide: Glide::Step,
                gain: 0.05,
                fade: Fade::Linear,
                duration: 0.2,
            },
            SoundCue::Countdown => Voice {
                wave: Wave::Sine,
                from_hz: 660.0,
                to_hz: 660.0,
                glide: Glide::Step,
                gain: 0.08,
                fade: Fade::Exponential,
                duration: 0.15,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// How the pitch moves from `from_hz` to `to_hz`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glide {
    Linear,
    Exponential,
    /// Jump to `to_hz` halfway through
    Step,
}

/// Gain envelope shape down to silence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fade {
    Linear,
    Exponential,
}

/// One oscillator with a pitch glide and a decaying gain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub wave: Wave,
    pub from_hz: f32,
    pub to_hz: f32,
    pub glide: Glide,
    pub gain: f32,
    pub fade: Fade,
    /// Seconds
    pub duration: f64,
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{Fade, Glide, SoundCue, Voice, Wave};

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Play a cue. Gating (mute, run state) is the caller's job.
        pub fn play(&self, cue: SoundCue) {
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            self.play_voice(ctx, &cue.voice());
        }

        /// Create an oscillator with gain envelope
        fn create_osc(&self, ctx: &AudioContext, wave: Wave) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(match wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Square => OscillatorType::Square,
                Wave::Sawtooth => OscillatorType::Sawtooth,
                Wave::Triangle => OscillatorType::Triangle,
            });
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn play_voice(&self, ctx: &AudioContext, voice: &Voice) {
            let Some((osc, gain)) = self.create_osc(ctx, voice.wave) else {
                return;
            };
            let t = ctx.current_time();
            let end = t + voice.duration;

            let freq = osc.frequency();
            freq.set_value_at_time(voice.from_hz, t).ok();
            match voice.glide {
                Glide::Linear => {
                    freq.linear_ramp_to_value_at_time(voice.to_hz, end).ok();
                }
                Glide::Exponential => {
                    freq.exponential_ramp_to_value_at_time(voice.to_hz, end).ok();
                }
                Glide::Step => {
                    freq.set_value_at_time(voice.to_hz, t + voice.duration / 2.0).ok();
                }
            }

            gain.gain().set_value_at_time(voice.gain, t).ok();
            match voice.fade {
                Fade::Linear => {
                    gain.gain().linear_ramp_to_value_at_time(0.0, end).ok();
                }
                Fade::Exponential => {
                    gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();
                }
            }

            osc.start().ok();
            osc.stop_with_when(end).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_cues() {
        assert_eq!(SoundCue::from_event(GameEvent::DoubleJumped), SoundCue::Jump);
        assert_eq!(
            SoundCue::from_event(GameEvent::PowerupCollected(PowerupKind::Currency)),
            SoundCue::Pickup
        );
        assert_eq!(
            SoundCue::from_event(GameEvent::PowerupCollected(PowerupKind::Magnet)),
            SoundCue::Powerup
        );
        assert_eq!(SoundCue::from_event(GameEvent::ShieldAbsorbed), SoundCue::Crash);
    }

    #[test]
    fn test_menu_cues_are_not_gameplay() {
        assert!(SoundCue::Jump.is_gameplay());
        assert!(SoundCue::Crash.is_gameplay());
        assert!(!SoundCue::Buy.is_gameplay());
        assert!(!SoundCue::Denied.is_gameplay());
        assert!(!SoundCue::Countdown.is_gameplay());
    }

    #[test]
    fn test_exponential_ramps_stay_positive() {
        for cue in [
            SoundCue::Jump,
            SoundCue::Dash,
            SoundCue::Crash,
            SoundCue::Pickup,
            SoundCue::Powerup,
            SoundCue::Buy,
            SoundCue::Denied,
            SoundCue::Countdown,
        ] {
            let v = cue.voice();
            assert!(v.from_hz > 0.0 && v.to_hz > 0.0, "{}", cue.as_str());
            assert!(v.gain > 0.0 && v.duration > 0.0);
        }
    }
}

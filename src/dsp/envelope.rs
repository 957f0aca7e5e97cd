use crate::MIN_TIME;

/*
ADSR Envelope
=============

The amplitude envelope of a streaming voice. It also feeds the pitch and
filter modulation amounts, and in eg-sync mode its idle state decides when the
voice stops.

Vocabulary
----------

  level       The envelope's current output value (0.0 to 1.0).

  stage       Idle, Attack, Decay, Sustain or Release.

  gate        Edge-triggered. A rising edge restarts the attack from the
              floor, a falling edge enters release from the current level.

  curve       Linear ramps (constant increment per sample) or exponential
              segments (constant ratio per sample).


Linear vs Exponential
---------------------

  Level
    1.0 ┐     ╱╲                          1.0 ┐    ╭╮
        │    ╱  ╲___________                  │   ╱  ╲_________
    S   │   ╱               ╲             S   │  │             ╲
        │  ╱                 ╲                │  │              ╲_
    0.0 └─╱───────────────────╲──→        0.0 └──╯────────────────‾─→
            linear                                exponential

Exponential segments multiply the level by a per-sample ratio chosen so the
segment covers 80 dB (the FLOOR below) in the configured time:

    attack:   ratio = 1 + 9.21 / (time * sample_rate)     (grows from FLOOR)
    decay:    ratio = 1 - 9.21 / (time * sample_rate)     (falls to sustain)
    release:  ratio = 1 - 9.21 / (time * sample_rate)     (falls to FLOOR)

where 9.21 = -ln(0.0001). Exponential envelopes sound more natural on sampled
material, so the voice uses them by default.


Implementation Notes
--------------------

Increments and ratios are computed fresh each sample from the stored times.
The host may change every time parameter every block, and there is nothing to
invalidate.

Linear release snapshots its starting level and total length at gate-off and
interpolates, so it lands exactly on 0.0.
*/

/// -ln(0.0001): 80 dB expressed as a natural-log span.
const LN_FLOOR: f32 = 9.210_340_4;
/// Level at which exponential segments start and end.
const FLOOR: f32 = 0.0001;

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,    // Gate low, envelope inactive, level = 0
    Attack,  // Gate just went high, ramping up to 1.0
    Decay,   // Reached peak, ramping down to sustain level
    Sustain, // Holding at sustain level while gate is high
    Release, // Gate went low, ramping down to 0
}

/// Segment shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvelopeCurve {
    Linear,
    #[default]
    Exponential,
}

pub struct Envelope {
    sample_rate: f32,
    curve: EnvelopeCurve,

    // ADSR parameters
    attack_time: f32,   // seconds to ramp 0 → 1
    decay_time: f32,    // seconds to ramp 1 → sustain
    sustain_level: f32, // level to hold (0.0 - 1.0)
    release_time: f32,  // seconds to ramp current → 0

    // Runtime state
    stage: EnvelopeState,
    level: f32,
    gate: bool, // last gate value seen, for edge detection

    decay_start_level: f32,

    release_start_level: f32,
    release_total_samples: u32,
    release_elapsed_samples: u32,
}

impl Envelope {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            curve: EnvelopeCurve::default(),

            attack_time: 0.01,
            decay_time: 0.1,
            sustain_level: 0.7,
            release_time: 0.3,

            stage: EnvelopeState::Idle,
            level: 0.0,
            gate: false,
            decay_start_level: 0.0,
            release_start_level: 0.0,
            release_total_samples: 1,
            release_elapsed_samples: 0,
        }
    }

    pub fn adsr(sample_rate: f32, attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        let mut env = Self::new(sample_rate);
        env.set_adsr(attack, decay, sustain, release);
        env
    }

    pub fn with_curve(mut self, curve: EnvelopeCurve) -> Self {
        self.curve = curve;
        self
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Update all four stage parameters at once. Safe to call every block.
    pub fn set_adsr(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.attack_time = attack.max(MIN_TIME);
        self.decay_time = decay.max(MIN_TIME);
        self.sustain_level = sustain.clamp(0.0, 1.0);
        self.release_time = release.max(MIN_TIME);
    }

    /// Feed the current gate value. Only edges change the stage.
    pub fn gate(&mut self, gate: bool) {
        if gate == self.gate {
            return;
        }
        self.gate = gate;
        if gate {
            self.note_on();
        } else {
            self.note_off();
        }
    }

    /// Gate high: start the attack phase from the floor.
    pub fn note_on(&mut self) {
        self.level = match self.curve {
            EnvelopeCurve::Linear => 0.0,
            EnvelopeCurve::Exponential => FLOOR,
        };
        self.stage = EnvelopeState::Attack;
        self.release_elapsed_samples = 0;
    }

    /// Gate low: start the release phase from current level.
    pub fn note_off(&mut self) {
        if matches!(self.stage, EnvelopeState::Idle) {
            return;
        }

        self.release_start_level = self.level;
        self.release_total_samples = (self.release_time * self.sample_rate).round().max(1.0) as u32;
        self.release_elapsed_samples = 0;
        self.stage = EnvelopeState::Release;
    }

    /// Advance the envelope by one sample and return the new level.
    pub fn next_sample(&mut self) -> f32 {
        match self.curve {
            EnvelopeCurve::Linear => self.advance_linear(),
            EnvelopeCurve::Exponential => self.advance_exponential(),
        }

        self.level = self.level.clamp(0.0, 1.0);
        self.level
    }

    fn advance_linear(&mut self) {
        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }

            EnvelopeState::Attack => {
                self.level += 1.0 / (self.attack_time * self.sample_rate);

                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.decay_start_level = 1.0;
                    self.stage = EnvelopeState::Decay;
                }
            }

            EnvelopeState::Decay => {
                let target = self.sustain_level;
                let total_drop = self.decay_start_level - target;
                self.level -= total_drop / (self.decay_time * self.sample_rate);

                if self.level <= target {
                    self.level = target;
                    self.stage = EnvelopeState::Sustain;
                }
            }

            EnvelopeState::Sustain => {
                self.level = self.sustain_level;
            }

            EnvelopeState::Release => {
                // level = start * (1 - elapsed/total)
                let progress =
                    self.release_elapsed_samples as f32 / self.release_total_samples as f32;
                self.level = (self.release_start_level * (1.0 - progress)).max(0.0);

                self.release_elapsed_samples = self.release_elapsed_samples.saturating_add(1);

                if self.release_elapsed_samples >= self.release_total_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                }
            }
        }
    }

    fn advance_exponential(&mut self) {
        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }

            EnvelopeState::Attack => {
                self.level *= 1.0 + LN_FLOOR / (self.attack_time * self.sample_rate);

                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeState::Decay;
                }
            }

            EnvelopeState::Decay => {
                let next = self.level * (1.0 - LN_FLOOR / (self.decay_time * self.sample_rate));

                // a zero sustain would never be reached by a ratio, stop at the floor
                if next <= self.sustain_level.max(FLOOR) {
                    self.level = self.sustain_level;
                    self.stage = EnvelopeState::Sustain;
                } else {
                    self.level = next;
                }
            }

            EnvelopeState::Sustain => {
                self.level = self.sustain_level;
            }

            EnvelopeState::Release => {
                let next = self.level * (1.0 - LN_FLOOR / (self.release_time * self.sample_rate));

                if next <= FLOOR {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                } else {
                    self.level = next;
                }
            }
        }
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.stage, EnvelopeState::Idle)
    }

    /// Reset to idle state and forget the last gate value.
    pub fn reset(&mut self) {
        self.stage = EnvelopeState::Idle;
        self.level = 0.0;
        self.gate = false;
        self.decay_start_level = 0.0;
        self.release_elapsed_samples = 0;
        self.release_start_level = 0.0;
    }

    /// Get the current envelope level (0.0 to 1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Get the current envelope stage
    pub fn state(&self) -> EnvelopeState {
        self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    fn render_samples(env: &mut Envelope, samples: usize) {
        for _ in 0..samples {
            env.next_sample();
        }
    }

    #[test]
    fn attack_reaches_full_level() {
        let mut env =
            Envelope::adsr(SAMPLE_RATE, 0.01, 0.1, 0.7, 0.2).with_curve(EnvelopeCurve::Linear);

        env.gate(true);
        render_samples(&mut env, (0.01 * SAMPLE_RATE) as usize + 1);

        assert!(env.level() > 0.99, "expected attack to reach full level");
        assert_ne!(env.state(), EnvelopeState::Attack);
    }

    #[test]
    fn sustain_holds_target_level() {
        let sustain = 0.6;
        let mut env =
            Envelope::adsr(SAMPLE_RATE, 0.01, 0.05, sustain, 0.2).with_curve(EnvelopeCurve::Linear);

        env.gate(true);
        let attack_decay_samples = ((0.01 + 0.05) * SAMPLE_RATE) as usize + 5;
        render_samples(&mut env, attack_decay_samples);

        assert_eq!(env.state(), EnvelopeState::Sustain);
        assert!((env.level() - sustain).abs() < 0.05, "sustain level should be held");
    }

    #[test]
    fn release_falls_back_to_idle() {
        let release = 0.03;
        let mut env =
            Envelope::adsr(SAMPLE_RATE, 0.01, 0.05, 0.5, release).with_curve(EnvelopeCurve::Linear);

        env.gate(true);
        render_samples(&mut env, (0.02 * SAMPLE_RATE) as usize);

        env.gate(false);
        render_samples(&mut env, (release * SAMPLE_RATE) as usize + 2);

        assert!(env.level() <= 0.001, "release should fall back to zero");
        assert!(env.is_idle());
    }

    #[test]
    fn exponential_envelope_runs_full_cycle() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.02, 0.05, 0.5, 0.05);

        env.gate(true);
        render_samples(&mut env, 25);
        assert!(matches!(
            env.state(),
            EnvelopeState::Decay | EnvelopeState::Sustain
        ));

        render_samples(&mut env, 200);
        assert_eq!(env.state(), EnvelopeState::Sustain);
        assert!((env.level() - 0.5).abs() < 1e-6);

        env.gate(false);
        render_samples(&mut env, 100);
        assert!(env.is_idle());
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn exponential_decay_to_zero_sustain_terminates() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.001, 0.02, 0.0, 0.05);

        env.gate(true);
        render_samples(&mut env, 200);

        assert_eq!(env.state(), EnvelopeState::Sustain);
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn repeated_gate_value_is_not_an_edge() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.01, 0.05, 0.5, 0.05);

        env.gate(true);
        render_samples(&mut env, 100);
        assert_eq!(env.state(), EnvelopeState::Sustain);

        // holding the gate high must not restart the attack
        env.gate(true);
        assert_eq!(env.state(), EnvelopeState::Sustain);

        env.reset();
        env.gate(true);
        assert_eq!(env.state(), EnvelopeState::Attack);
    }
}

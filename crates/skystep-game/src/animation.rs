//! Animation cue driver
//!
//! Clip blending belongs to the rendering engine. The driver only decides
//! which clip should be active and emits crossfade cues the renderer drains
//! once per frame. One-shot clips (the jump emote) overlay the locomotion
//! clip and restore it when finished.

/// Crossfade duration between locomotion clips
pub const LOCOMOTION_FADE: f32 = 0.2;
/// Crossfade duration into and out of the death clip
pub const DEATH_FADE: f32 = 0.5;

/// Clips the controller selects between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationClip {
    Idle,
    Walking,
    Running,
    Death,
    Jump,
}

impl AnimationClip {
    /// Clip name as the model's animation set spells it
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Walking => "Walking",
            Self::Running => "Running",
            Self::Death => "Death",
            Self::Jump => "Jump",
        }
    }

    /// One-shot clips play once, clamped, then restore locomotion
    pub fn is_one_shot(&self) -> bool {
        matches!(self, Self::Jump)
    }
}

/// A crossfade request for the rendering engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossFade {
    pub clip: AnimationClip,
    pub duration: f32,
}

/// Tracks the active clip and queues crossfade cues
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    locomotion: AnimationClip,
    one_shot: Option<AnimationClip>,
    cues: Vec<CrossFade>,
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationDriver {
    /// Create a driver starting on the idle clip
    pub fn new() -> Self {
        Self {
            locomotion: AnimationClip::Idle,
            one_shot: None,
            cues: vec![CrossFade {
                clip: AnimationClip::Idle,
                duration: 0.0,
            }],
        }
    }

    /// The clip that should currently be playing
    pub fn current(&self) -> AnimationClip {
        self.one_shot.unwrap_or(self.locomotion)
    }

    /// Change the locomotion clip. No cue is emitted while a one-shot is
    /// playing; the new clip becomes the restore target instead.
    pub fn set_locomotion(&mut self, clip: AnimationClip) {
        if self.locomotion == clip {
            return;
        }
        let duration = if clip == AnimationClip::Death || self.locomotion == AnimationClip::Death {
            DEATH_FADE
        } else {
            LOCOMOTION_FADE
        };
        self.locomotion = clip;
        if self.one_shot.is_none() {
            self.cues.push(CrossFade { clip, duration });
        }
    }

    /// Play a one-shot clip on top of the locomotion state
    pub fn play_one_shot(&mut self, clip: AnimationClip) {
        self.one_shot = Some(clip);
        self.cues.push(CrossFade {
            clip,
            duration: LOCOMOTION_FADE,
        });
    }

    /// Finish the active one-shot and fade back to locomotion
    pub fn finish_one_shot(&mut self) {
        if self.one_shot.take().is_some() {
            self.cues.push(CrossFade {
                clip: self.locomotion,
                duration: LOCOMOTION_FADE,
            });
        }
    }

    /// Drain the queued crossfade cues (renderer, once per frame)
    pub fn drain_cues(&mut self) -> Vec<CrossFade> {
        std::mem::take(&mut self.cues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let mut driver = AnimationDriver::new();
        assert_eq!(driver.current(), AnimationClip::Idle);

        let cues = driver.drain_cues();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].clip, AnimationClip::Idle);
    }

    #[test]
    fn test_locomotion_change_emits_cue() {
        let mut driver = AnimationDriver::new();
        driver.drain_cues();

        driver.set_locomotion(AnimationClip::Walking);
        let cues = driver.drain_cues();
        assert_eq!(
            cues,
            vec![CrossFade {
                clip: AnimationClip::Walking,
                duration: LOCOMOTION_FADE
            }]
        );

        // Same clip again emits nothing
        driver.set_locomotion(AnimationClip::Walking);
        assert!(driver.drain_cues().is_empty());
    }

    #[test]
    fn test_death_uses_slow_fade() {
        let mut driver = AnimationDriver::new();
        driver.drain_cues();

        driver.set_locomotion(AnimationClip::Death);
        assert_eq!(driver.drain_cues()[0].duration, DEATH_FADE);

        driver.set_locomotion(AnimationClip::Idle);
        assert_eq!(driver.drain_cues()[0].duration, DEATH_FADE);
    }

    #[test]
    fn test_one_shot_overlays_and_restores() {
        let mut driver = AnimationDriver::new();
        driver.set_locomotion(AnimationClip::Walking);
        driver.drain_cues();

        driver.play_one_shot(AnimationClip::Jump);
        assert_eq!(driver.current(), AnimationClip::Jump);

        // Locomotion changes while the emote plays emit no cue
        driver.set_locomotion(AnimationClip::Running);
        let cues = driver.drain_cues();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].clip, AnimationClip::Jump);

        driver.finish_one_shot();
        assert_eq!(driver.current(), AnimationClip::Running);
        let cues = driver.drain_cues();
        assert_eq!(cues[0].clip, AnimationClip::Running);
    }

    #[test]
    fn test_finish_without_one_shot_is_silent() {
        let mut driver = AnimationDriver::new();
        driver.drain_cues();
        driver.finish_one_shot();
        assert!(driver.drain_cues().is_empty());
    }
}

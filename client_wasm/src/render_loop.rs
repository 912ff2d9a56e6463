//! Per-display-frame driver
//!
//! Scheduling belongs to the host (`requestAnimationFrame` in the browser);
//! this type only does the work of one tick.

use game_core::{fit_surface, Effects, FieldPositions, SurfaceSize};
use glam::Vec2;
use proto::{GameSpecs, GameState, C2S};

use crate::input::InputSampler;
use crate::scene::Scene;

/// Output of one tick, ready for the renderer
#[derive(Debug, Clone)]
pub struct Frame {
    pub surface: SurfaceSize,
    /// Surface size changed since the previous frame
    pub resized: bool,
    pub scene: Scene,
}

pub struct RenderLoop {
    specs: GameSpecs,
    effects: Box<dyn Effects>,
    container: SurfaceSize,
    surface: SurfaceSize,
    last_drawn: Option<SurfaceSize>,
    running: bool,
    ticks: u64,
}

impl RenderLoop {
    pub fn new(specs: GameSpecs, effects: Box<dyn Effects>, container: SurfaceSize) -> Self {
        let surface = fit_surface(container, specs.aspect_ratio());
        Self {
            specs,
            effects,
            container,
            surface,
            last_drawn: None,
            running: true,
            ticks: 0,
        }
    }

    pub fn specs(&self) -> &GameSpecs {
        &self.specs
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn effects(&self) -> &dyn Effects {
        self.effects.as_ref()
    }

    /// Container changed size (window resize or container observer)
    pub fn resize(&mut self, container: SurfaceSize) -> SurfaceSize {
        self.container = container;
        self.surface = fit_surface(container, self.specs.aspect_ratio());
        tracing::debug!(
            width = self.surface.width,
            height = self.surface.height,
            "surface resized"
        );
        self.surface
    }

    /// Burst of particles at a point in surface pixels
    pub fn spawn_effect(&mut self, at: Vec2) {
        if self.running {
            self.effects.spawn(at);
        }
    }

    /// Stop producing frames. Particles are dropped.
    pub fn stop(&mut self) {
        self.running = false;
        self.effects.clear();
    }

    /// One tick. Returns `None` once stopped.
    pub fn tick(
        &mut self,
        input: &InputSampler,
        snapshot: Option<GameState>,
        mut send: impl FnMut(C2S),
    ) -> Option<Frame> {
        if !self.running {
            return None;
        }
        self.ticks += 1;

        if let Some(cmd) = input.sample() {
            send(cmd);
        }

        let positions = FieldPositions::resolve(snapshot.as_ref(), &self.specs);

        self.surface = fit_surface(self.container, self.specs.aspect_ratio());
        let resized = self.last_drawn != Some(self.surface);
        self.last_drawn = Some(self.surface);

        self.effects.step(self.surface.as_vec2());
        let sprites = self.effects.sprites();

        let scene = Scene::build(
            &self.specs,
            self.surface,
            &positions,
            snapshot.map(|s| s.score),
            &sprites,
        );
        tracing::trace!(
            tick = self.ticks,
            instances = scene.instance_count(),
            "frame"
        );

        Some(Frame {
            surface: self.surface,
            resized,
            scene,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{effects_for, Config, NoEffects};
    use proto::Score;

    fn new_loop() -> RenderLoop {
        RenderLoop::new(
            GameSpecs::default(),
            Box::new(NoEffects),
            SurfaceSize::new(600.0, 400.0),
        )
    }

    #[test]
    fn test_tick_sends_held_key() {
        let mut rl = new_loop();
        let mut input = InputSampler::new();
        input.press("ArrowUp");

        let mut sent = Vec::new();
        rl.tick(&input, None, |c| sent.push(c));
        rl.tick(&input, None, |c| sent.push(c));

        assert_eq!(sent, vec![C2S::PaddleUp, C2S::PaddleUp]);
    }

    #[test]
    fn test_first_frame_and_resize_flagged() {
        let mut rl = new_loop();
        let input = InputSampler::new();

        let frame = rl.tick(&input, None, |_| {}).unwrap();
        assert!(frame.resized);
        assert_eq!(frame.surface, SurfaceSize::new(400.0, 400.0));

        let frame = rl.tick(&input, None, |_| {}).unwrap();
        assert!(!frame.resized);

        rl.resize(SurfaceSize::new(300.0, 900.0));
        let frame = rl.tick(&input, None, |_| {}).unwrap();
        assert!(frame.resized);
        assert_eq!(frame.surface, SurfaceSize::new(300.0, 300.0));
    }

    #[test]
    fn test_scoreboard_only_after_snapshot() {
        let mut rl = new_loop();
        let input = InputSampler::new();

        let before = rl.tick(&input, None, |_| {}).unwrap();
        let mut state = GameState::default();
        state.score = Score { left: 1, right: 1 };
        let after = rl.tick(&input, Some(state), |_| {}).unwrap();

        assert_eq!(after.scene.rects.len(), before.scene.rects.len() + 4);
    }

    #[test]
    fn test_effects_advance_each_tick() {
        let mut rl = RenderLoop::new(
            GameSpecs::default(),
            effects_for(Config::new(), 3),
            SurfaceSize::new(400.0, 400.0),
        );
        let input = InputSampler::new();
        rl.spawn_effect(Vec2::new(200.0, 200.0));
        let spawned = rl.effects().len();
        assert!(spawned > 0);

        let frame = rl.tick(&input, None, |_| {}).unwrap();
        assert_eq!(frame.scene.circles.len(), 1 + spawned);
    }

    #[test]
    fn test_stopped_loop_is_inert() {
        let mut rl = new_loop();
        let mut input = InputSampler::new();
        input.press("s");
        rl.stop();

        let mut sent = 0;
        assert!(rl.tick(&input, None, |_| sent += 1).is_none());
        assert_eq!(sent, 0);
        assert!(!rl.is_running());
    }
}

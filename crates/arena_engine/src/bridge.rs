use std::cell::Cell;

use arena_core::{Camera, FrameUniforms, MAX_LIGHTS, MAX_SPHERES, uniforms::MaterialParams};
use bytemuck::Zeroable;

use crate::config::{ExecutionMode, PhysicsConfig, RenderSettings};
use crate::error::Result;
use crate::physics::{PlayerInput, Simulator};
use crate::scene::{Scene, SceneCommand, Sphere};
use crate::snapshot::{BodySnapshot, SceneSnapshot, StateMessage, WorkerMessage};
use crate::worker::{Drain, SimulationWorker};

enum Backend
{
    Synchronous(Simulator),
    Concurrent(SimulationWorker),
}

/// Owns the authoritative scene, keeps it in step with the simulator and turns it into
/// kernel uniforms once per frame.
pub struct Bridge
{
    scene: Scene,
    backend: Backend,
    epoch: u64,
    last_sequence: u64,
    worker_lost: bool,
    truncation_logged: Cell<bool>,
}

impl Bridge
{
    pub fn new(scene: Scene, physics: PhysicsConfig, mode: ExecutionMode) -> Result<Self>
    {
        scene.validate()?;

        let backend = match mode
        {
            ExecutionMode::Synchronous => Backend::Synchronous(Simulator::from_scene(&scene, physics)),
            ExecutionMode::Concurrent =>
            {
                let worker = SimulationWorker::spawn(physics)?;
                worker.send(WorkerMessage::Init(SceneSnapshot::new(&scene.spheres, &scene.arena)));
                Backend::Concurrent(worker)
            }
        };

        Ok(Self
        {
            scene,
            backend,
            epoch: 0,
            last_sequence: 0,
            worker_lost: false,
            truncation_logged: Cell::new(false),
        })
    }

    pub fn mode(&self) -> ExecutionMode
    {
        match self.backend
        {
            Backend::Synchronous(_) => ExecutionMode::Synchronous,
            Backend::Concurrent(_) => ExecutionMode::Concurrent,
        }
    }

    pub fn scene(&self) -> &Scene { &self.scene }
    pub fn epoch(&self) -> u64 { self.epoch }

    /// Steps the simulation. In concurrent mode the result shows up on a later [`Bridge::poll`].
    pub fn advance(&mut self, dt: f32, input: &PlayerInput)
    {
        let sent = match &mut self.backend
        {
            Backend::Synchronous(simulator) =>
            {
                if simulator.advance(dt, input)
                {
                    for (sphere, body) in self.scene.spheres.iter_mut().zip(simulator.spheres())
                    {
                        sphere.position = body.position;
                        sphere.velocity = body.velocity;
                    }
                }
                true
            }
            Backend::Concurrent(worker) => worker.send(WorkerMessage::Step { dt, input: *input }),
        };
        self.note_send(sent);
    }

    /// Adopts the newest state published by the worker. Never blocks; returns whether the
    /// scene changed.
    pub fn poll(&mut self) -> bool
    {
        let Backend::Concurrent(worker) = &self.backend else { return false };

        let latest = match worker.drain()
        {
            Drain::Latest(latest) => latest,
            Drain::Disconnected(latest) =>
            {
                if !self.worker_lost
                {
                    log::warn!("Simulation worker disconnected, keeping last known state");
                    self.worker_lost = true;
                }
                latest
            }
        };

        match latest
        {
            Some(message) => self.accept(message),
            None => false,
        }
    }

    /// Blocks until a state message of the current epoch has been adopted. Returns `false`
    /// when there is no worker to wait on.
    pub fn wait_for_state(&mut self) -> bool
    {
        loop
        {
            let message = match &self.backend
            {
                Backend::Synchronous(_) => return false,
                Backend::Concurrent(worker) => worker.recv(),
            };

            match message
            {
                Some(message) =>
                {
                    if self.accept(message)
                    {
                        return true;
                    }
                }
                None =>
                {
                    self.worker_lost = true;
                    return false;
                }
            }
        }
    }

    /// Replaces the whole scene and restarts the simulator on it.
    pub fn reset(&mut self, scene: Scene) -> Result<()>
    {
        scene.validate()?;

        self.epoch += 1;
        self.last_sequence = 0;

        let sent = match &mut self.backend
        {
            Backend::Synchronous(simulator) =>
            {
                simulator.load(scene.spheres.clone(), scene.arena);
                true
            }
            Backend::Concurrent(worker) => worker.send(WorkerMessage::Reset(SceneSnapshot::new(&scene.spheres, &scene.arena))),
        };
        self.note_send(sent);

        log::info!("Scene reset (epoch {})", self.epoch);
        self.scene = scene;
        Ok(())
    }

    pub fn apply_command(&mut self, command: SceneCommand) -> bool
    {
        self.scene.apply_command(command)
    }

    pub fn frame_uniforms(&self, camera: &Camera, settings: &RenderSettings, resolution: [u32; 2], time: f32) -> FrameUniforms
    {
        let scene = &self.scene;
        if (scene.spheres.len() > MAX_SPHERES || scene.lights.len() > MAX_LIGHTS) && !self.truncation_logged.get()
        {
            log::debug!("Uploading {} of {} spheres and {} of {} lights",
                scene.spheres.len().min(MAX_SPHERES), scene.spheres.len(),
                scene.lights.len().min(MAX_LIGHTS), scene.lights.len());
            self.truncation_logged.set(true);
        }

        let transparent = scene.transparent_index().filter(|&i| i < MAX_SPHERES);

        let mut uniforms = FrameUniforms::zeroed();
        uniforms.resolution = resolution;
        uniforms.time = time;
        uniforms.camera = camera.basis().to_slot();
        uniforms.material = MaterialParams
        {
            ior: transparent.map_or(1.5, |i| scene.spheres[i].refractive_index),
            transparency: settings.transparency,
            soft_samples: settings.soft_samples,
            pixelation: settings.pixelation,
            light_radius: settings.light_radius,
            ambient: settings.ambient,
            ..Default::default()
        };
        uniforms.box_min = scene.arena.min.to_array();
        uniforms.box_max = scene.arena.max.to_array();
        uniforms.set_spheres(scene.spheres.iter().map(Sphere::to_slot));
        uniforms.set_lights(scene.lights.iter().map(|l| l.to_slot()));
        uniforms.transparent_index = transparent.map_or(-1, |i| i as i32);
        uniforms
    }

    fn note_send(&mut self, sent: bool)
    {
        if !sent && !self.worker_lost
        {
            log::warn!("Simulation worker is gone, keeping last known state");
            self.worker_lost = true;
        }
    }

    fn accept(&mut self, message: StateMessage) -> bool
    {
        if message.epoch != self.epoch || !message.is_newer_than(self.epoch, self.last_sequence)
        {
            log::debug!("Discarding stale state {}:{} (at {}:{})", message.epoch, message.sequence, self.epoch, self.last_sequence);
            return false;
        }

        if message.bodies.len() != self.scene.spheres.len()
        {
            log::warn!("State has {} bodies, scene has {}", message.bodies.len(), self.scene.spheres.len());
        }

        for (sphere, body) in self.scene.spheres.iter_mut().zip(message.bodies.iter())
        {
            body.apply_to(sphere);
        }

        self.last_sequence = message.sequence;
        true
    }
}

/// Body states of the current scene, as the worker would publish them.
pub fn body_snapshots(scene: &Scene) -> Vec<BodySnapshot>
{
    scene.spheres.iter().map(BodySnapshot::from).collect()
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::config::SceneConfig;
    use crate::scene::Light;
    use glam::{vec3, Vec3};

    fn scene(seed: u64) -> Scene
    {
        Scene::from_config(&SceneConfig { seed: Some(seed), ..Default::default() })
    }

    fn camera() -> Camera
    {
        Camera::new(vec3(0.0, 4.0, 12.0), vec3(0.0, 1.0, 0.0), 90.0)
    }

    fn moved(scene: &Scene, offset: f32) -> Vec<BodySnapshot>
    {
        let mut bodies = body_snapshots(scene);
        for body in bodies.iter_mut()
        {
            body.position[0] += offset;
        }
        bodies
    }

    #[test]
    fn synchronous_advance_updates_scene_immediately()
    {
        let mut bridge = Bridge::new(scene(1), PhysicsConfig::default(), ExecutionMode::Synchronous).unwrap();
        let before = bridge.scene().spheres[1].position;
        bridge.advance(0.016, &PlayerInput::default());

        assert_ne!(bridge.scene().spheres[1].position, before);
        assert!(!bridge.poll());
    }

    #[test]
    fn stale_and_out_of_order_states_are_discarded()
    {
        let mut bridge = Bridge::new(scene(2), PhysicsConfig::default(), ExecutionMode::Synchronous).unwrap();
        let original = bridge.scene().clone();

        assert!(bridge.accept(StateMessage { epoch: 0, sequence: 5, bodies: moved(&original, 1.0) }));
        assert!(!bridge.accept(StateMessage { epoch: 0, sequence: 4, bodies: moved(&original, 2.0) }));
        assert!(!bridge.accept(StateMessage { epoch: 0, sequence: 5, bodies: moved(&original, 3.0) }));
        assert_eq!(bridge.scene().spheres[0].position.x, original.spheres[0].position.x + 1.0);

        bridge.reset(scene(3)).unwrap();
        let fresh = bridge.scene().clone();
        assert!(!bridge.accept(StateMessage { epoch: 0, sequence: 9, bodies: moved(&original, 1.0) }));
        assert_eq!(bridge.scene(), &fresh);
        assert!(bridge.accept(StateMessage { epoch: 1, sequence: 1, bodies: moved(&fresh, 0.5) }));
    }

    #[test]
    fn adopted_state_keeps_materials()
    {
        let mut bridge = Bridge::new(scene(4), PhysicsConfig::default(), ExecutionMode::Synchronous).unwrap();
        let original = bridge.scene().clone();
        bridge.accept(StateMessage { epoch: 0, sequence: 1, bodies: moved(&original, 0.25) });

        let player = bridge.scene().player().unwrap();
        assert!(player.is_transparent);
        assert_eq!(player.refractive_index, original.spheres[0].refractive_index);
    }

    #[test]
    fn concurrent_bridge_catches_up()
    {
        let mut bridge = Bridge::new(scene(5), PhysicsConfig::default(), ExecutionMode::Concurrent).unwrap();
        assert!(bridge.wait_for_state());

        let start = bridge.scene().spheres[1].position;
        for _ in 0..10
        {
            bridge.advance(0.016, &PlayerInput::default());
        }
        while bridge.wait_for_state() && bridge.last_sequence < 11 {}

        assert_eq!(bridge.last_sequence, 11);
        assert_ne!(bridge.scene().spheres[1].position, start);
        assert!(!bridge.poll());
    }

    #[test]
    fn concurrent_reset_ignores_old_epoch()
    {
        let mut bridge = Bridge::new(scene(6), PhysicsConfig::default(), ExecutionMode::Concurrent).unwrap();
        for _ in 0..5
        {
            bridge.advance(0.016, &PlayerInput::default());
        }

        let fresh = scene(7);
        bridge.reset(fresh.clone()).unwrap();
        assert!(bridge.wait_for_state());

        assert_eq!(bridge.epoch(), 1);
        assert_eq!(bridge.scene().spheres, fresh.spheres);
    }

    #[test]
    fn stopped_worker_keeps_last_known_state()
    {
        let mut bridge = Bridge::new(scene(10), PhysicsConfig::default(), ExecutionMode::Concurrent).unwrap();
        assert!(bridge.wait_for_state());
        if let Backend::Concurrent(worker) = &mut bridge.backend
        {
            worker.stop();
        }

        let known = bridge.scene().clone();
        bridge.advance(0.016, &PlayerInput::default());
        assert!(bridge.worker_lost);
        assert!(!bridge.poll());
        assert!(!bridge.wait_for_state());
        assert_eq!(bridge.scene(), &known);

        bridge.worker_lost = false;
        bridge.reset(scene(11)).unwrap();
        assert!(bridge.worker_lost);
        assert_eq!(bridge.scene(), &scene(11));
        assert!(!bridge.poll());
    }

    #[test]
    fn uniforms_truncate_and_mark_transparent_sphere()
    {
        let mut scene = scene(8);
        scene.spheres.extend((0..10).map(|i| Sphere::new(vec3(i as f32 - 5.0, 3.0, 4.0), 0.3, Vec3::ONE)));
        scene.lights.extend((0..10).map(|i| Light::new(vec3(i as f32 - 5.0, 5.0, 0.0), Vec3::ONE)));
        scene.spheres[0].refractive_index = 1.33;
        let bridge = Bridge::new(scene, PhysicsConfig::default(), ExecutionMode::Synchronous).unwrap();

        let settings = RenderSettings::default();
        let uniforms = bridge.frame_uniforms(&camera(), &settings, [64, 48], 1.5);

        assert_eq!(uniforms.sphere_count as usize, MAX_SPHERES);
        assert_eq!(uniforms.light_count as usize, MAX_LIGHTS);
        assert_eq!(uniforms.transparent_index, 0);
        assert_eq!(uniforms.material.ior, 1.33);
        assert_eq!(uniforms.material.soft_samples, settings.soft_samples);
        assert_eq!(uniforms.resolution, [64, 48]);
        assert_eq!(uniforms.box_max, [6.0, 6.0, 6.0]);
    }

    #[test]
    fn invalid_scene_is_rejected()
    {
        let mut broken = scene(9);
        broken.spheres[0].is_player = false;
        assert!(Bridge::new(broken.clone(), PhysicsConfig::default(), ExecutionMode::Synchronous).is_err());

        let mut bridge = Bridge::new(scene(9), PhysicsConfig::default(), ExecutionMode::Synchronous).unwrap();
        assert!(bridge.reset(broken).is_err());
        assert_eq!(bridge.epoch(), 0);
    }
}

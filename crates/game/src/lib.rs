use std::fs;

use arena_engine::app::{self, App};
use arena_engine::app::input::{FrameState, KeyCode};
use arena_engine::prelude::*;
use arena_engine::snapshot::SceneSnapshot;

mod world;

pub use world::{demo_script, GameWorld};

const APP_NAME: &str = "Sphere Arena";

pub struct GameApp
{
    config: ArenaConfig,
    bridge: Bridge,
    renderer: Renderer,
    framebuffer: Framebuffer,
    world: GameWorld,
    resets: u64,
}

impl GameApp
{
    pub fn bridge(&self) -> &Bridge { &self.bridge }
    pub fn framebuffer(&self) -> &Framebuffer { &self.framebuffer }

    fn reset_scene(&mut self) -> Result<()>
    {
        self.resets += 1;
        let config = SceneConfig
        {
            seed: self.config.scene.seed.map(|seed| seed.wrapping_add(self.resets)),
            ..self.config.scene.clone()
        };

        self.bridge.reset(Scene::from_config(&config))
    }
}

impl App for GameApp
{
    fn new(config: &ArenaConfig) -> Result<Self>
    {
        let scene = Scene::from_config(&config.scene);
        let bridge = Bridge::new(scene, config.physics, config.mode)?;
        let renderer = Renderer::new(&config.render)?;
        let framebuffer = Framebuffer::new(config.render.width, config.render.height);

        Ok(Self
        {
            config: config.clone(),
            bridge,
            renderer,
            framebuffer,
            world: GameWorld::new(),
            resets: 0,
        })
    }

    fn on_update(&mut self, frame: &FrameState) -> Result<()>
    {
        if frame.is_key_pressed(KeyCode::R)
        {
            self.reset_scene()?;
        }

        if let Some(command) = self.world.light_command(frame)
        {
            self.bridge.apply_command(command);
        }

        let input = self.world.on_update(frame);
        self.bridge.advance(frame.delta_time(), &input);
        self.bridge.poll();
        Ok(())
    }

    fn on_render(&mut self, frame: &FrameState) -> Result<()>
    {
        let settings = &self.config.render;
        let focus = self.bridge.scene().player().map(|p| p.position).unwrap_or_default();
        let camera = self.world.camera.camera(focus, settings.fov);
        let uniforms = self.bridge.frame_uniforms(&camera, settings, [settings.width, settings.height], frame.time());

        self.renderer.render(&uniforms, &mut self.framebuffer);
        Ok(())
    }

    fn on_exit(&mut self) -> Result<()>
    {
        self.framebuffer.save_png(&self.config.output)?;

        let scene = self.bridge.scene();
        let snapshot_path = self.config.output.with_extension("json");
        fs::write(&snapshot_path, SceneSnapshot::new(&scene.spheres, &scene.arena).to_json()?)?;
        log::info!("Wrote scene snapshot to {}", snapshot_path.display());
        Ok(())
    }
}

pub fn run(config: ArenaConfig) -> Result<()>
{
    log::info!("Running: {} ({:?}, {} frames)", APP_NAME, config.mode, config.frames);
    app::run::<GameApp, _>(&config, demo_script)?;
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn short_run_writes_frame_and_snapshot()
    {
        let output = std::env::temp_dir().join("sphere_arena_short_run.png");
        let mut config = ArenaConfig { frames: 3, output: output.clone(), ..Default::default() };
        config.render.width = 16;
        config.render.height = 9;
        config.scene.seed = Some(5);

        let app: GameApp = app::run(&config, demo_script).unwrap();
        assert_eq!(app.framebuffer().width(), 16);
        assert!(output.exists());

        let json = fs::read_to_string(output.with_extension("json")).unwrap();
        let snapshot = SceneSnapshot::from_json(&json).unwrap();
        assert_eq!(snapshot.spheres.len(), app.bridge().scene().spheres.len());
    }
}

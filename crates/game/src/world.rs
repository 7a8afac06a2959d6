use arena_engine::app::input::{FrameState, InputEvent, KeyCode};
use arena_engine::glam::{vec2, vec3};
use arena_engine::physics::PlayerInput;
use arena_engine::rendering::CameraControl;
use arena_engine::scene::SceneCommand;

const LIGHT_ORBIT_RADIUS: f32 = 4.0;
const LIGHT_ORBIT_SPEED: f32 = 0.5;

pub struct GameWorld
{
    pub camera: CameraControl,
    pub orbit_light: bool,
}

impl GameWorld
{
    pub fn new() -> Self
    {
        Self
        {
            camera: CameraControl::default(),
            orbit_light: true,
        }
    }

    /// Applies mouse look and returns the player input for this frame.
    pub fn on_update(&mut self, frame_state: &FrameState) -> PlayerInput
    {
        let drag = frame_state.mouse_delta();
        self.camera.drag(drag.x, drag.y);
        self.camera.zoom(frame_state.scroll_delta());

        PlayerInput::new(frame_state.move_vector(), self.camera.yaw_degrees())
    }

    /// Moves the first light around the arena centre.
    pub fn light_command(&self, frame_state: &FrameState) -> Option<SceneCommand>
    {
        if !self.orbit_light
        {
            return None;
        }

        let angle = frame_state.time() * LIGHT_ORBIT_SPEED;
        let position = vec3(angle.cos() * LIGHT_ORBIT_RADIUS, 5.5, angle.sin() * LIGHT_ORBIT_RADIUS);
        Some(SceneCommand::MoveLight { index: 0, position })
    }
}

impl Default for GameWorld
{
    fn default() -> Self
    {
        Self::new()
    }
}

/// Input for the headless demo: walk forward, strafe, look around and zoom in.
pub fn demo_script(frame: u32) -> Vec<InputEvent>
{
    let mut events = Vec::new();
    match frame
    {
        0 => events.push(InputEvent::KeyPressed(KeyCode::W)),
        45 => events.push(InputEvent::KeyPressed(KeyCode::D)),
        60 => events.push(InputEvent::KeyReleased(KeyCode::W)),
        90 => events.push(InputEvent::KeyReleased(KeyCode::D)),
        100 => events.push(InputEvent::Scroll(-300.0)),
        _ => {}
    }

    if (20..50).contains(&frame)
    {
        events.push(InputEvent::MouseMotion(vec2(3.0, 0.5)));
    }

    events
}

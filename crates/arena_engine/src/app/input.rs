use glam::{Vec2, vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode
{
    W,
    A,
    S,
    D,
    R,
}

/// Raw input delivered to the builder between two frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent
{
    KeyPressed(KeyCode),
    KeyReleased(KeyCode),
    MouseMotion(Vec2),
    Scroll(f32),
}

/// Input and timing for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameState
{
    keys_pressed: Vec<KeyCode>,
    keys_released: Vec<KeyCode>,
    keys_down: Vec<KeyCode>,

    mouse_delta: Vec2,
    scroll_delta: f32,

    frame: u32,
    time: f32,
    delta_time: f32,
}

impl FrameState
{
    pub fn is_key_down(&self, keycode: KeyCode) -> bool { self.keys_down.contains(&keycode) }
    pub fn is_key_pressed(&self, keycode: KeyCode) -> bool { self.keys_pressed.contains(&keycode) }
    pub fn is_key_released(&self, keycode: KeyCode) -> bool { self.keys_released.contains(&keycode) }

    pub fn mouse_delta(&self) -> Vec2 { self.mouse_delta }
    pub fn scroll_delta(&self) -> f32 { self.scroll_delta }

    pub fn frame(&self) -> u32 { self.frame }
    pub fn time(&self) -> f32 { self.time }
    pub fn delta_time(&self) -> f32 { self.delta_time }

    /// WASD as (right, forward), each component in [-1, 1].
    pub fn move_vector(&self) -> Vec2
    {
        let axis = |positive: KeyCode, negative: KeyCode| {
            (self.is_key_down(positive) as i32 - self.is_key_down(negative) as i32) as f32
        };

        vec2(axis(KeyCode::D, KeyCode::A), axis(KeyCode::W, KeyCode::S))
    }
}

/// Accumulates events until the next frame is built. Held keys carry over between frames.
#[derive(Debug, Clone, Default)]
pub struct FrameStateBuilder
{
    keys_pressed: Vec<KeyCode>,
    keys_released: Vec<KeyCode>,
    keys_down: Vec<KeyCode>,

    mouse_delta: Vec2,
    scroll_delta: f32,

    frame: u32,
    time: f32,
}

impl FrameStateBuilder
{
    pub fn new(previous_frame: &FrameState) -> Self
    {
        Self
        {
            keys_down: previous_frame.keys_down.clone(),
            frame: previous_frame.frame + 1,
            time: previous_frame.time,
            ..Default::default()
        }
    }

    pub fn on_event(&mut self, event: InputEvent)
    {
        match event
        {
            InputEvent::KeyPressed(keycode) =>
            {
                self.keys_pressed.push(keycode);
                if !self.keys_down.contains(&keycode)
                {
                    self.keys_down.push(keycode);
                }
            }
            InputEvent::KeyReleased(keycode) =>
            {
                self.keys_down.retain(|&k| k != keycode);
                self.keys_released.push(keycode);
            }
            InputEvent::MouseMotion(delta) => self.mouse_delta += delta,
            InputEvent::Scroll(delta) => self.scroll_delta += delta,
        }
    }

    pub fn build(self, delta_time: f32) -> FrameState
    {
        FrameState
        {
            keys_pressed: self.keys_pressed,
            keys_released: self.keys_released,
            keys_down: self.keys_down,
            mouse_delta: self.mouse_delta,
            scroll_delta: self.scroll_delta,
            frame: self.frame,
            time: self.time + delta_time,
            delta_time,
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn held_keys_carry_over_and_form_move_vector()
    {
        let mut builder = FrameStateBuilder::default();
        builder.on_event(InputEvent::KeyPressed(KeyCode::W));
        builder.on_event(InputEvent::KeyPressed(KeyCode::A));
        let first = builder.build(0.5);

        assert!(first.is_key_pressed(KeyCode::W));
        assert_eq!(first.move_vector(), vec2(-1.0, 1.0));

        let mut builder = FrameStateBuilder::new(&first);
        builder.on_event(InputEvent::KeyReleased(KeyCode::A));
        builder.on_event(InputEvent::MouseMotion(vec2(3.0, -1.0)));
        builder.on_event(InputEvent::MouseMotion(vec2(1.0, 0.0)));
        let second = builder.build(0.25);

        assert!(!second.is_key_pressed(KeyCode::W));
        assert!(second.is_key_down(KeyCode::W));
        assert!(second.is_key_released(KeyCode::A));
        assert_eq!(second.move_vector(), vec2(0.0, 1.0));
        assert_eq!(second.mouse_delta(), vec2(4.0, -1.0));
        assert_eq!(second.frame(), 1);
        assert_eq!(second.time(), 0.75);
    }
}

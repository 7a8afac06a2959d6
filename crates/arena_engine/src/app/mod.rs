use crate::config::ArenaConfig;
use crate::error::Result;

pub mod input;

use input::{FrameState, FrameStateBuilder, InputEvent};

/// Step used by the headless loop.
pub const FIXED_DELTA_TIME: f32 = 1.0 / 60.0;

pub trait App : Sized
{
    fn new(config: &ArenaConfig) -> Result<Self>;
    fn on_update(&mut self, frame: &FrameState) -> Result<()>;
    fn on_render(&mut self, frame: &FrameState) -> Result<()>;
    fn on_exit(&mut self) -> Result<()> { Ok(()) }
}

/// Drives `T` for `config.frames` frames at a fixed step. `script` feeds the input events
/// of each frame, given the frame index.
pub fn run<T, S>(config: &ArenaConfig, mut script: S) -> Result<T>
    where T : App, S : FnMut(u32) -> Vec<InputEvent>
{
    let mut app = T::new(config)?;
    let mut builder = FrameStateBuilder::default();

    for index in 0..config.frames
    {
        for event in script(index)
        {
            builder.on_event(event);
        }

        let frame = builder.build(FIXED_DELTA_TIME);
        app.on_update(&frame)?;
        app.on_render(&frame)?;
        builder = FrameStateBuilder::new(&frame);
    }

    app.on_exit()?;
    Ok(app)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use super::input::KeyCode;

    struct Recorder
    {
        frames: Vec<(u32, bool)>,
        exited: bool,
    }

    impl App for Recorder
    {
        fn new(_config: &ArenaConfig) -> Result<Self>
        {
            Ok(Self { frames: Vec::new(), exited: false })
        }

        fn on_update(&mut self, frame: &FrameState) -> Result<()>
        {
            self.frames.push((frame.frame(), frame.is_key_down(KeyCode::W)));
            Ok(())
        }

        fn on_render(&mut self, _frame: &FrameState) -> Result<()> { Ok(()) }

        fn on_exit(&mut self) -> Result<()>
        {
            self.exited = true;
            Ok(())
        }
    }

    #[test]
    fn runs_configured_frames_with_scripted_input()
    {
        let config = ArenaConfig { frames: 4, ..Default::default() };
        let app: Recorder = run(&config, |i| match i
        {
            1 => vec![InputEvent::KeyPressed(KeyCode::W)],
            3 => vec![InputEvent::KeyReleased(KeyCode::W)],
            _ => vec![],
        }).unwrap();

        assert_eq!(app.frames, vec![(0, false), (1, true), (2, true), (3, false)]);
        assert!(app.exited);
    }
}

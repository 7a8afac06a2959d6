use std::env;
use std::process;

use arena_engine::config::ArenaConfig;

fn main()
{
    env_logger::init();

    let config = match env::args().nth(1)
    {
        Some(path) => ArenaConfig::load(&path),
        None => Ok(ArenaConfig::default()),
    };

    let result = config.and_then(game::run);
    if let Err(err) = result
    {
        log::error!("{}", err);
        process::exit(1);
    }
}

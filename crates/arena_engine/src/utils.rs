use std::time::Instant;

/// Runs `f` and logs how long it took at debug level.
pub fn time_call<F, R>(f: F, name: &str) -> R
    where F : FnOnce() -> R
{
    let start = Instant::now();
    let r = f();
    let time = start.elapsed().as_secs_f32() * 1000.0;
    log::debug!("'{}' took {:.3}ms", name, time);
    r
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArenaError
{
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
    #[error("Failed to (de)serialize snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("Unsupported snapshot version {found}, expected {expected}")]
    SnapshotVersion { found: u32, expected: u32 },
    #[error("Invalid scene: {0}")]
    InvalidScene(String),
    #[error("Failed to build render thread pool: {0}")]
    Pipeline(#[from] rayon::ThreadPoolBuildError),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Failed to spawn simulation worker: {0}")]
    WorkerSpawn(String),
}

pub type Result<T> = std::result::Result<T, ArenaError>;

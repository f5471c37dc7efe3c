pub mod modrinth;

pub use modrinth::{ModrinthClient, ProgressCallback, SearchQuery};

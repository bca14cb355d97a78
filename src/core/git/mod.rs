pub mod context;
pub mod repository;

pub use context::{collect_context, GitContext};
pub use repository::{GitCli, RepositoryReader};

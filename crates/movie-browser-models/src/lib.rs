pub mod detail;
pub mod envelope;
pub mod movie;
pub mod paged;

mod de;

pub use detail::{Episode, EpisodeServer, MovieDetail, Taxon};
pub use envelope::{ApiData, ApiEnvelope, ApiParams};
pub use movie::{MovieSummary, WatchlistEntry};
pub use paged::{PagedResult, Pagination};

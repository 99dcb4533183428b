pub mod categories;
pub mod error;
pub mod images;
pub mod ophim;
pub mod traits;

pub use categories::{category_display_name, KNOWN_CATEGORIES};
pub use error::CatalogError;
pub use images::ImageResolver;
pub use ophim::OphimClient;
pub use traits::CatalogApi;

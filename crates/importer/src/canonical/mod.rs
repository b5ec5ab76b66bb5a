pub mod models;
pub mod transformer;
pub mod validator;

pub use models::CanonicalSeason;
pub use transformer::CanonicalTransformer;
pub use validator::{CanonicalValidator, ValidationReport};

//! Prelude module for convenient imports.
//!
//! ```
//! use loadstate::prelude::*;
//! ```

pub use crate::config::ResourceOptions;
pub use crate::error::ResourceError;
pub use crate::mutation::{Mutate, Mutation};
pub use crate::producer::{Mutator, Producer};
pub use crate::resource::{Fetch, Resource};
pub use crate::state::{Phase, ResourceState};

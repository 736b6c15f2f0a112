//! # loadstate - observable async resources
//!
//! `loadstate` wraps asynchronous operations in small state holders that a
//! rendering layer can observe. Each holder exposes the same three fields:
//!
//! - **data**: the last successfully produced value
//! - **loading**: whether an invocation is in flight
//! - **error**: the failure of the most recent invocation
//!
//! ## Core Components
//!
//! - [`Resource`](resource::Resource): read mode. Runs a zero-argument
//!   [`Producer`](producer::Producer) at creation and on `refetch`, and again
//!   when its dependencies change.
//! - [`Mutation`](mutation::Mutation): mutate mode. Runs a one-argument
//!   [`Mutator`](producer::Mutator) only on demand and returns its result to
//!   the caller as well as recording it.
//! - [`ResourceState`](state::ResourceState): the observable snapshot.
//! - [`ResourceError`](error::ResourceError): the single failure kind.
//!
//! State changes are published through a [`tokio::sync::watch`] channel, so
//! any number of observers can follow a resource with `subscribe()` or
//! `watch()`.
//!
//! ## Example
//!
//! ```rust
//! use loadstate::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let requests = Resource::new(
//!     Producer::new(|| async { Err::<u64, _>("gateway unavailable") }),
//!     ResourceOptions::default().with_initial_data(7),
//! );
//!
//! let state = requests.settled().await;
//! assert_eq!(state.data, Some(7));
//! assert_eq!(state.error, Some(ResourceError::new("gateway unavailable")));
//! # }
//! ```

mod cell;
pub mod config;
pub mod error;
pub mod mutation;
pub mod prelude;
pub mod producer;
pub mod resource;
pub mod state;

//! Client side of the ANS operator browser: backend access, the view state
//! store and the navigation table.

pub mod api;
pub mod error;
pub mod router;
pub mod store;

pub use api::{AnsApi, HttpAnsApi, DEFAULT_API_BASE_URL};
pub use error::ClientError;
pub use router::{resolve, DetailProps, Route, RouteError, View, ROUTES};
pub use store::{AnsStore, DetailState, StoreEvent, StoreState, PAGE_LIMIT};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

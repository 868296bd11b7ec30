//! REST endpoints
//!
//! - `resources`: the generic list/view/related/create/update/delete
//!   handlers, instantiated once per entity in the router
//! - `auth`: token issuing and refresh

pub mod auth;
pub mod resources;

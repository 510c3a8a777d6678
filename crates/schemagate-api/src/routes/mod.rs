//! # Route Modules
//!
//! | Prefix | Module |
//! |---|---|
//! | `/resource-types` | [`resource_types`] |
//! | `/resource-data` | [`resource_data`] |

pub mod resource_data;
pub mod resource_types;

//! Repair desk backend library.
//!
//! Hexagonal layout: [`domain`] holds entities, services and ports,
//! [`inbound`] adapts HTTP onto the driving ports and [`outbound`] implements
//! the driven ports against PostgreSQL, Redis, the file system and the SMS,
//! push and PDF integrations.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;

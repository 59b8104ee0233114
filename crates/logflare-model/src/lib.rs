//! Logflare resource records and the mappers between them and the
//! management API's wire schemas.
//!
//! Each managed kind implements [`ResourceModel`]:
//!
//! - `to_wire` builds a request body from the record. Only user-supplied and
//!   hybrid fields are sent, and unset fields are omitted rather than sent as
//!   `null` so the server keeps applying its own defaults.
//! - `from_wire` merges a response into the last known record. Server-computed
//!   and hybrid fields are overwritten; user-supplied fields are kept.
//!
//! Free-form fields (`metrics`, `source_mapping`) are held as canonical JSON
//! text and pass through the conversion engine at the wire boundary.

pub mod canonical;
mod convert;
pub mod endpoint;
pub mod error;
pub mod fields;
pub mod model;
pub mod notifications;
pub mod query;
pub mod sensitive;
pub mod source;

pub use canonical::JsonText;
pub use endpoint::{EndpointRecord, EndpointWire, ENDPOINT_FIELDS};
pub use error::MappingError;
pub use fields::{find_field, FieldRole, FieldSpec, ResourceKind};
pub use model::{changed_server_fields, sensitive_values, ResourceModel};
pub use notifications::NotificationSettings;
pub use query::{decode_rows, EndpointQueryRecord, QueryEnvelope, ENDPOINT_QUERY_FIELDS};
pub use sensitive::Sensitive;
pub use source::{SourceRecord, SourceWire, SOURCE_FIELDS};

//! Field tables: the life-cycle role and sensitivity of every record field.

use std::fmt;

/// Remote resource kinds managed through the CRUD lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Source,
    Endpoint,
}

impl ResourceKind {
    /// API collection path segment, e.g. `/api/sources`.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Source => "sources",
            Self::Endpoint => "endpoints",
        }
    }

    /// Singular name used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Endpoint => "endpoint",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Source => "Source",
            Self::Endpoint => "Endpoint",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Who owns a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Set only by the caller's configuration
    UserSupplied,
    /// Set only from responses; never sent
    ServerComputed,
    /// Caller may supply it; the server may default or override it
    Hybrid,
}

impl FieldRole {
    /// Whether the field is written into request bodies.
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::UserSupplied | Self::Hybrid)
    }

    /// Whether a response overwrites the field.
    pub fn is_server_owned(&self) -> bool {
        matches!(self, Self::ServerComputed | Self::Hybrid)
    }
}

/// Declaration of a single record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub role: FieldRole,
    pub sensitive: bool,
}

impl FieldSpec {
    pub const fn user(name: &'static str) -> Self {
        Self {
            name,
            role: FieldRole::UserSupplied,
            sensitive: false,
        }
    }

    pub const fn computed(name: &'static str) -> Self {
        Self {
            name,
            role: FieldRole::ServerComputed,
            sensitive: false,
        }
    }

    pub const fn hybrid(name: &'static str) -> Self {
        Self {
            name,
            role: FieldRole::Hybrid,
            sensitive: false,
        }
    }

    /// Mark the field as sensitive.
    pub const fn sensitive(self) -> Self {
        Self {
            sensitive: true,
            ..self
        }
    }
}

/// Look up a field declaration by name.
pub fn find_field(fields: &[FieldSpec], name: &str) -> Option<FieldSpec> {
    fields.iter().copied().find(|f| f.name == name)
}

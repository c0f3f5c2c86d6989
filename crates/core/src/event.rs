// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource events reported by the provisioning engine

/// A per-resource notification from the engine.
///
/// For a single resource a `Pre` always arrives before its `Outputs`. No
/// ordering holds across different resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceEvent {
    /// The engine started working on a resource
    Pre { urn: String, resource_type: String },
    /// The engine finished a resource and recorded its outputs
    Outputs { urn: String, resource_type: String },
}

impl ResourceEvent {
    pub fn pre(urn: impl Into<String>, resource_type: impl Into<String>) -> Self {
        ResourceEvent::Pre {
            urn: urn.into(),
            resource_type: resource_type.into(),
        }
    }

    pub fn outputs(urn: impl Into<String>, resource_type: impl Into<String>) -> Self {
        ResourceEvent::Outputs {
            urn: urn.into(),
            resource_type: resource_type.into(),
        }
    }

    /// Unique identifier of the resource within the run
    pub fn urn(&self) -> &str {
        match self {
            ResourceEvent::Pre { urn, .. } | ResourceEvent::Outputs { urn, .. } => urn,
        }
    }

    pub fn resource_type(&self) -> &str {
        match self {
            ResourceEvent::Pre { resource_type, .. }
            | ResourceEvent::Outputs { resource_type, .. } => resource_type,
        }
    }
}

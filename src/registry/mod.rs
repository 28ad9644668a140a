//! Route registry
//!
//! Holds everything controllers declare before bootstrap:
//!
//! ```text
//! class name   -> ClassRouteDescriptor { path_prefix, middleware }
//! path segment -> [RouteEntry { method, middleware, handler_name, owner }, ...]
//! ```
//!
//! The registry is written only through [`RouteRegistry::declare_class`] and
//! [`RouteRegistry::declare_route`], and read once by
//! [`init_router`](crate::router::init_router).

use crate::controller::OwnerType;
use crate::method::HttpMethod;
use crate::middleware::SharedMiddleware;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

mod declaration;

/// Lifecycle of a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryPhase {
    /// Declarations are being collected
    Collecting,
    /// `init_router` has run at least once
    Initialized,
}

/// Path prefix and middleware declared on a controller type
pub struct ClassRouteDescriptor {
    path_prefix: String,
    middleware: Vec<SharedMiddleware>,
}

impl ClassRouteDescriptor {
    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    pub fn middleware(&self) -> &[SharedMiddleware] {
        &self.middleware
    }
}

impl std::fmt::Debug for ClassRouteDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassRouteDescriptor")
            .field("path_prefix", &self.path_prefix)
            .field("middleware", &self.middleware.len())
            .finish()
    }
}

/// One method-level route declaration
pub struct RouteEntry {
    method: HttpMethod,
    middleware: Vec<SharedMiddleware>,
    handler_name: String,
    owner: OwnerType,
}

impl RouteEntry {
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn middleware(&self) -> &[SharedMiddleware] {
        &self.middleware
    }

    pub fn handler_name(&self) -> &str {
        &self.handler_name
    }

    pub fn owner(&self) -> OwnerType {
        self.owner
    }

    /// Class name used to find the owner's [`ClassRouteDescriptor`]
    pub fn owner_name(&self) -> &'static str {
        self.owner.name()
    }
}

impl std::fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEntry")
            .field("method", &self.method)
            .field("middleware", &self.middleware.len())
            .field("handler_name", &self.handler_name)
            .field("owner", &self.owner.name())
            .finish()
    }
}

/// All entries declared for one path segment, in declaration order
#[derive(Debug)]
pub struct SegmentRoutes {
    segment: String,
    entries: Vec<RouteEntry>,
}

impl SegmentRoutes {
    pub fn segment(&self) -> &str {
        &self.segment
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }
}

#[derive(Debug, Clone, Copy)]
struct Anchor {
    id: TypeId,
    name: &'static str,
}

/// Declarations collected for one route table
///
/// Create one per application, pass it to every controller declaration and
/// then to [`init_router`](crate::router::init_router).
///
/// # Example
/// ```
/// use route_mapping::{RouteRegistry, RegistryPhase};
///
/// let registry = RouteRegistry::new();
/// assert_eq!(registry.phase(), RegistryPhase::Collecting);
/// assert!(registry.class_descriptors().is_none());
/// ```
#[derive(Debug, Default)]
pub struct RouteRegistry {
    anchor: Option<Anchor>,
    class_descriptors: Option<HashMap<String, ClassRouteDescriptor>>,
    route_entries: Option<Vec<SegmentRoutes>>,
    initialized: AtomicBool,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the first controller type seen by either declaration handler
    pub fn anchor(&self) -> Option<&'static str> {
        self.anchor.map(|anchor| anchor.name)
    }

    pub fn anchor_type(&self) -> Option<TypeId> {
        self.anchor.map(|anchor| anchor.id)
    }

    pub fn phase(&self) -> RegistryPhase {
        if self.initialized.load(Ordering::Acquire) {
            RegistryPhase::Initialized
        } else {
            RegistryPhase::Collecting
        }
    }

    /// Class descriptors, or `None` if no class route was ever declared
    pub fn class_descriptors(&self) -> Option<&HashMap<String, ClassRouteDescriptor>> {
        self.class_descriptors.as_ref()
    }

    pub fn class_descriptor(&self, class_name: &str) -> Option<&ClassRouteDescriptor> {
        self.class_descriptors.as_ref()?.get(class_name)
    }

    /// Route entries grouped by segment, or `None` if no method route was ever declared
    pub fn route_entries(&self) -> Option<&[SegmentRoutes]> {
        self.route_entries.as_deref()
    }

    pub fn routes(&self, segment: &str) -> Option<&[RouteEntry]> {
        self.route_entries
            .as_ref()?
            .iter()
            .find(|group| group.segment == segment)
            .map(|group| group.entries.as_slice())
    }

    pub(crate) fn mark_initialized(&self) {
        self.initialized.store(true, Ordering::Release);
    }

    fn anchor_on<C: 'static>(&mut self, name: &'static str) {
        if self.anchor.is_none() {
            tracing::debug!("Route registry anchored at {}", name);
            self.anchor = Some(Anchor {
                id: TypeId::of::<C>(),
                name,
            });
        }
    }

    fn warn_if_initialized(&self, what: &str) {
        if self.phase() == RegistryPhase::Initialized {
            tracing::warn!(
                "{} declared after route table initialization; registered routes are unaffected",
                what
            );
        }
    }
}

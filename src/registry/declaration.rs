use super::{ClassRouteDescriptor, RouteEntry, RouteRegistry, SegmentRoutes};
use crate::controller::{class_name, ClassRoute, OwnerType, RouteHandlers};
use crate::error::{Result, RouteError};
use crate::method::HttpMethod;
use crate::middleware::SharedMiddleware;
use std::collections::HashMap;

impl RouteRegistry {
    /// Record the class-level path prefix and middleware of controller `C`
    ///
    /// # Errors
    /// - [`RouteError::InvalidPath`] if `path_prefix` is empty
    /// - [`RouteError::DuplicatePath`] if `C`'s class name already has a class route
    pub fn declare_class<C: 'static>(
        &mut self,
        path_prefix: impl Into<String>,
        middleware: Vec<SharedMiddleware>,
    ) -> Result<()> {
        let path_prefix = path_prefix.into();
        let name = class_name::<C>();
        if path_prefix.is_empty() {
            return Err(RouteError::InvalidPath {
                class_name: name.to_string(),
            });
        }

        self.anchor_on::<C>(name);
        self.warn_if_initialized(name);

        let descriptors = self.class_descriptors.get_or_insert_with(HashMap::new);
        if let Some(existing) = descriptors.get(name) {
            return Err(RouteError::DuplicatePath {
                class_name: name.to_string(),
                path: existing.path_prefix.clone(),
            });
        }

        tracing::debug!("Class route {} -> {}", name, path_prefix);
        descriptors.insert(
            name.to_string(),
            ClassRouteDescriptor {
                path_prefix,
                middleware,
            },
        );
        Ok(())
    }

    /// Append a method-level route of controller `C` under `segment`
    ///
    /// An empty segment is a valid literal path component. Entries for the same
    /// segment are kept in declaration order, duplicates included.
    pub fn declare_route<C: RouteHandlers>(
        &mut self,
        segment: impl Into<String>,
        method: HttpMethod,
        middleware: Vec<SharedMiddleware>,
        handler_name: impl Into<String>,
    ) {
        let owner = OwnerType::of::<C>();
        let segment = segment.into();
        let handler_name = handler_name.into();

        self.anchor_on::<C>(owner.name());
        self.warn_if_initialized(owner.name());

        tracing::debug!(
            "Method route {} [{}] -> {}.{}",
            method,
            segment,
            owner.name(),
            handler_name
        );

        let entry = RouteEntry {
            method,
            middleware,
            handler_name,
            owner,
        };

        let groups = self.route_entries.get_or_insert_with(Vec::new);
        match groups.iter_mut().find(|group| group.segment == segment) {
            Some(group) => group.entries.push(entry),
            None => groups.push(SegmentRoutes {
                segment,
                entries: vec![entry],
            }),
        }
    }

    /// Declare the class route of controller `C`, then every route it handles
    ///
    /// Nothing of `C`'s routes is recorded when its class route is refused.
    pub fn mount<C: ClassRoute + RouteHandlers>(&mut self) -> Result<&mut Self> {
        C::declare_class(self)?;
        C::declare_routes(self);
        Ok(self)
    }
}

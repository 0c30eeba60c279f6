// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! A minimal object-lifecycle container.
//!
//! Components are registered by name with a factory closure. After the
//! factory runs, every post-processor sees the component and may replace
//! it; the final result is what [`Container::get`] hands out.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::aop::{Component, PostProcessor};
use crate::error::ContainerError;

#[derive(Default)]
pub struct Container {
    components: HashMap<String, Component>,
    order: Vec<String>,
    post_processors: Vec<Arc<dyn PostProcessor>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_post_processor(&mut self, processor: Arc<dyn PostProcessor>) {
        self.post_processors.push(processor);
    }

    pub fn with_post_processor(mut self, processor: Arc<dyn PostProcessor>) -> Self {
        self.add_post_processor(processor);
        self
    }

    /// Construct `name` with `factory`, run the post-processors, publish.
    ///
    /// The factory can resolve components registered before it.
    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<(), ContainerError>
    where
        F: FnOnce(&Container) -> Result<Component, ContainerError>,
    {
        if self.components.contains_key(name) {
            return Err(ContainerError::Duplicate(name.to_string()));
        }

        let mut component = factory(self)?;
        for processor in &self.post_processors {
            component = processor
                .after_construction(component, name)
                .map_err(|source| ContainerError::PostProcess {
                    name: name.to_string(),
                    source,
                })?;
        }

        debug!(name, target_type = %component.target_type(), proxy = component.is_proxy(), "Registered component");
        self.components.insert(name.to_string(), component);
        self.order.push(name.to_string());
        Ok(())
    }

    /// Resolve `name` as `Arc<X>`.
    pub fn get<X: ?Sized + 'static>(&self, name: &str) -> Result<Arc<X>, ContainerError> {
        let component = self
            .components
            .get(name)
            .ok_or_else(|| ContainerError::NotFound(name.to_string()))?;
        component.get::<X>().ok_or_else(|| ContainerError::WrongType {
            name: name.to_string(),
            requested: std::any::type_name::<X>(),
        })
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    /// Names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("components", &self.order)
            .field("post_processors", &self.post_processors.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProxyError;

    struct Settings {
        retries: u32,
    }

    struct Rename;

    impl PostProcessor for Rename {
        fn after_construction(&self, component: Component, name: &str) -> Result<Component, ProxyError> {
            if name == "reject" {
                return Err(ProxyError::Unproxyable(component.target_type().to_string()));
            }
            Ok(component)
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut container = Container::new();
        container
            .register("settings", |_| Ok(Component::sealed(Arc::new(Settings { retries: 3 }))))
            .unwrap();

        let settings = container.get::<Settings>("settings").unwrap();
        assert_eq!(settings.retries, 3);
        assert_eq!(container.names().collect::<Vec<_>>(), vec!["settings"]);
        assert_eq!(container.len(), 1);
    }

    #[test]
    fn test_factory_resolves_earlier_components() {
        let mut container = Container::new();
        container
            .register("settings", |_| Ok(Component::sealed(Arc::new(Settings { retries: 2 }))))
            .unwrap();
        container
            .register("doubled", |c| {
                let settings = c.get::<Settings>("settings")?;
                Ok(Component::sealed(Arc::new(settings.retries * 2)))
            })
            .unwrap();
        assert_eq!(*container.get::<u32>("doubled").unwrap(), 4);
    }

    #[test]
    fn test_errors() {
        let mut container = Container::new().with_post_processor(Arc::new(Rename));
        container
            .register("settings", |_| Ok(Component::sealed(Arc::new(Settings { retries: 1 }))))
            .unwrap();

        assert!(matches!(
            container.register("settings", |_| Ok(Component::sealed(Arc::new(0u8)))),
            Err(ContainerError::Duplicate(_))
        ));
        assert!(matches!(
            container.get::<Settings>("missing"),
            Err(ContainerError::NotFound(_))
        ));
        assert!(matches!(
            container.get::<u8>("settings"),
            Err(ContainerError::WrongType { .. })
        ));
        assert!(matches!(
            container.register("reject", |_| Ok(Component::sealed(Arc::new(0u8)))),
            Err(ContainerError::PostProcess { .. })
        ));
        assert!(container.component("reject").is_none());
    }
}

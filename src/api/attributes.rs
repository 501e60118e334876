//! Attribute store and attribute registry operations

use crate::attributes::{AttributeRegistry, AttributeStore, AttributeType, AttributeValue};
use crate::context::Context;
use crate::error::Status;
use crate::handle::{Handle, Object};

impl Context {
    pub fn attributes_store_create(&mut self, res: &mut Handle) -> Status {
        self.run("attributes_store_create", |ctx| {
            *res = ctx.register(Object::AttributeStore(AttributeStore::new()))?;
            Ok(())
        })
    }

    pub fn attributes_store_put(&mut self, store: Handle, element: u64, key: &str, value: AttributeValue) -> Status {
        self.run("attributes_store_put", |ctx| {
            ctx.registry_mut().attribute_store_mut(store)?.put(element, key, value);
            Ok(())
        })
    }

    /// `value` is written only when `found` is set
    pub fn attributes_store_get(
        &mut self,
        store: Handle,
        element: u64,
        key: &str,
        found: &mut bool,
        value: &mut Option<AttributeValue>,
    ) -> Status {
        self.run("attributes_store_get", |ctx| {
            match ctx.registry().attribute_store(store)?.get(element, key) {
                Some(v) => {
                    *value = Some(v.clone());
                    *found = true;
                }
                None => *found = false,
            }
            Ok(())
        })
    }

    pub fn attributes_store_remove(&mut self, store: Handle, element: u64, key: &str, found: &mut bool) -> Status {
        self.run("attributes_store_remove", |ctx| {
            *found = ctx
                .registry_mut()
                .attribute_store_mut(store)?
                .remove(element, key)
                .is_some();
            Ok(())
        })
    }

    pub fn attributes_registry_create(&mut self, res: &mut Handle) -> Status {
        self.run("attributes_registry_create", |ctx| {
            *res = ctx.register(Object::AttributeRegistry(AttributeRegistry::new()))?;
            Ok(())
        })
    }

    /// `attribute_type` is a type name such as "double"; `default` must parse as that type
    pub fn attributes_registry_register(
        &mut self,
        registry: Handle,
        name: &str,
        category: &str,
        attribute_type: &str,
        default: Option<&str>,
    ) -> Status {
        self.run("attributes_registry_register", |ctx| {
            let attribute_type: AttributeType = attribute_type.parse()?;
            ctx.registry_mut()
                .attribute_registry_mut(registry)?
                .register(name, category, attribute_type, default)
        })
    }

    pub fn attributes_registry_unregister(
        &mut self,
        registry: Handle,
        name: &str,
        category: &str,
        found: &mut bool,
    ) -> Status {
        self.run("attributes_registry_unregister", |ctx| {
            *found = ctx
                .registry_mut()
                .attribute_registry_mut(registry)?
                .unregister(name, category)
                .is_some();
            Ok(())
        })
    }

    /// Declared type and default of an attribute; `found` is false when undeclared
    pub fn attributes_registry_get(
        &mut self,
        registry: Handle,
        name: &str,
        category: &str,
        found: &mut bool,
        attribute_type: &mut Option<AttributeType>,
        default: &mut Option<AttributeValue>,
    ) -> Status {
        self.run("attributes_registry_get", |ctx| {
            match ctx.registry().attribute_registry(registry)?.get(name, category) {
                Some(decl) => {
                    *attribute_type = Some(decl.attribute_type);
                    *default = decl.default.clone();
                    *found = true;
                }
                None => *found = false,
            }
            Ok(())
        })
    }
}

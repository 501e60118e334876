//! List, set and map operations
//!
//! Absent map keys are not errors: `map_get` and `map_remove` report them through a
//! `found` flag. Only reading a value as the wrong type fails.

use crate::containers::{Element, ElementList, ElementMap, ElementSet};
use crate::context::Context;
use crate::error::Status;
use crate::handle::{Handle, Object};
use crate::iter::HandleIter;

impl Context {
    pub fn list_create(&mut self, res: &mut Handle) -> Status {
        self.run("list_create", |ctx| {
            *res = ctx.register(Object::List(ElementList::new()))?;
            Ok(())
        })
    }

    pub fn list_size(&mut self, list: Handle, res: &mut usize) -> Status {
        self.run("list_size", |ctx| {
            *res = ctx.registry().list(list)?.len();
            Ok(())
        })
    }

    pub fn list_add(&mut self, list: Handle, value: Element) -> Status {
        self.run("list_add", |ctx| {
            ctx.registry_mut().list_mut(list)?.push(value);
            Ok(())
        })
    }

    /// Removes the first occurrence; `res` is false when absent
    pub fn list_remove(&mut self, list: Handle, value: &Element, res: &mut bool) -> Status {
        self.run("list_remove", |ctx| {
            *res = ctx.registry_mut().list_mut(list)?.remove(value);
            Ok(())
        })
    }

    pub fn list_contains(&mut self, list: Handle, value: &Element, res: &mut bool) -> Status {
        self.run("list_contains", |ctx| {
            *res = ctx.registry().list(list)?.contains(value);
            Ok(())
        })
    }

    pub fn list_clear(&mut self, list: Handle) -> Status {
        self.run("list_clear", |ctx| {
            ctx.registry_mut().list_mut(list)?.clear();
            Ok(())
        })
    }

    /// Iterator over a copy of the current contents
    pub fn list_it_create(&mut self, list: Handle, res: &mut Handle) -> Status {
        self.run("list_it_create", |ctx| {
            let items: Vec<Element> = ctx.registry().list(list)?.iter().cloned().collect();
            *res = ctx.register_iter(HandleIter::values(items))?;
            Ok(())
        })
    }

    pub fn set_create(&mut self, res: &mut Handle) -> Status {
        self.run("set_create", |ctx| {
            *res = ctx.register(Object::Set(ElementSet::new()))?;
            Ok(())
        })
    }

    /// Set iterating in insertion order
    pub fn set_linked_create(&mut self, res: &mut Handle) -> Status {
        self.run("set_linked_create", |ctx| {
            *res = ctx.register(Object::Set(ElementSet::linked()))?;
            Ok(())
        })
    }

    pub fn set_size(&mut self, set: Handle, res: &mut usize) -> Status {
        self.run("set_size", |ctx| {
            *res = ctx.registry().set(set)?.len();
            Ok(())
        })
    }

    /// `res` is false when the value was already present
    pub fn set_add(&mut self, set: Handle, value: Element, res: &mut bool) -> Status {
        self.run("set_add", |ctx| {
            *res = ctx.registry_mut().set_mut(set)?.insert(value);
            Ok(())
        })
    }

    pub fn set_remove(&mut self, set: Handle, value: &Element, res: &mut bool) -> Status {
        self.run("set_remove", |ctx| {
            *res = ctx.registry_mut().set_mut(set)?.remove(value);
            Ok(())
        })
    }

    pub fn set_contains(&mut self, set: Handle, value: &Element, res: &mut bool) -> Status {
        self.run("set_contains", |ctx| {
            *res = ctx.registry().set(set)?.contains(value);
            Ok(())
        })
    }

    pub fn set_clear(&mut self, set: Handle) -> Status {
        self.run("set_clear", |ctx| {
            ctx.registry_mut().set_mut(set)?.clear();
            Ok(())
        })
    }

    pub fn set_it_create(&mut self, set: Handle, res: &mut Handle) -> Status {
        self.run("set_it_create", |ctx| {
            let items: Vec<Element> = ctx.registry().set(set)?.iter().cloned().collect();
            *res = ctx.register_iter(HandleIter::values(items))?;
            Ok(())
        })
    }

    pub fn map_create(&mut self, res: &mut Handle) -> Status {
        self.run("map_create", |ctx| {
            *res = ctx.register(Object::Map(ElementMap::new()))?;
            Ok(())
        })
    }

    /// Map iterating in insertion order
    pub fn map_linked_create(&mut self, res: &mut Handle) -> Status {
        self.run("map_linked_create", |ctx| {
            *res = ctx.register(Object::Map(ElementMap::linked()))?;
            Ok(())
        })
    }

    pub fn map_size(&mut self, map: Handle, res: &mut usize) -> Status {
        self.run("map_size", |ctx| {
            *res = ctx.registry().map(map)?.len();
            Ok(())
        })
    }

    /// Insert or replace
    pub fn map_put(&mut self, map: Handle, key: Element, value: Element) -> Status {
        self.run("map_put", |ctx| {
            ctx.registry_mut().map_mut(map)?.insert(key, value);
            Ok(())
        })
    }

    /// `value` is written only when `found` is set
    pub fn map_get(&mut self, map: Handle, key: &Element, found: &mut bool, value: &mut Element) -> Status {
        self.run("map_get", |ctx| {
            match ctx.registry().map(map)?.get(key) {
                Some(v) => {
                    *value = v.clone();
                    *found = true;
                }
                None => *found = false,
            }
            Ok(())
        })
    }

    /// Like `map_get`, failing with `IllegalArgument` when the value is not an int
    pub fn map_get_int(&mut self, map: Handle, key: &Element, found: &mut bool, value: &mut i64) -> Status {
        self.run("map_get_int", |ctx| {
            let read = ctx.registry().map(map)?.get(key).map(Element::as_int).transpose()?;
            *found = read.is_some();
            if let Some(v) = read {
                *value = v;
            }
            Ok(())
        })
    }

    /// Like `map_get`, failing with `IllegalArgument` when the value is not a double
    pub fn map_get_double(&mut self, map: Handle, key: &Element, found: &mut bool, value: &mut f64) -> Status {
        self.run("map_get_double", |ctx| {
            let read = ctx.registry().map(map)?.get(key).map(Element::as_double).transpose()?;
            *found = read.is_some();
            if let Some(v) = read {
                *value = v;
            }
            Ok(())
        })
    }

    /// `value` receives the removed value when `found` is set
    pub fn map_remove(&mut self, map: Handle, key: &Element, found: &mut bool, value: &mut Element) -> Status {
        self.run("map_remove", |ctx| {
            match ctx.registry_mut().map_mut(map)?.remove(key) {
                Some(v) => {
                    *value = v;
                    *found = true;
                }
                None => *found = false,
            }
            Ok(())
        })
    }

    pub fn map_contains_key(&mut self, map: Handle, key: &Element, res: &mut bool) -> Status {
        self.run("map_contains_key", |ctx| {
            *res = ctx.registry().map(map)?.contains_key(key);
            Ok(())
        })
    }

    pub fn map_clear(&mut self, map: Handle) -> Status {
        self.run("map_clear", |ctx| {
            ctx.registry_mut().map_mut(map)?.clear();
            Ok(())
        })
    }

    pub fn map_keys_it(&mut self, map: Handle, res: &mut Handle) -> Status {
        self.run("map_keys_it", |ctx| {
            let keys: Vec<Element> = ctx.registry().map(map)?.keys().cloned().collect();
            *res = ctx.register_iter(HandleIter::values(keys))?;
            Ok(())
        })
    }

    pub fn map_values_it(&mut self, map: Handle, res: &mut Handle) -> Status {
        self.run("map_values_it", |ctx| {
            let values: Vec<Element> = ctx.registry().map(map)?.values().cloned().collect();
            *res = ctx.register_iter(HandleIter::values(values))?;
            Ok(())
        })
    }
}

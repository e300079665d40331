use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::native_function::NativeFn;
use super::object::Value;

pub type ModuleTable = HashMap<String, NativeFn>;

/// A scope in the environment chain. Cheap to clone; closures capturing the
/// same environment share one set of bindings.
#[derive(Clone)]
pub struct Environment {
    env_ptr: Rc<RefCell<EnvironmentData>>,
}

struct EnvironmentData {
    values: HashMap<String, Value>,
    enclosing: Option<Environment>,
    modules: HashMap<String, ModuleTable>,
}

impl Environment {
    pub fn new() -> Self {
        let data = EnvironmentData {
            values: HashMap::new(),
            enclosing: None,
            modules: HashMap::new(),
        };
        Environment {
            env_ptr: Rc::new(RefCell::new(data)),
        }
    }

    /// A fresh scope whose lookups fall through to `env`.
    pub fn with_enclosing(env: &Environment) -> Self {
        let data = EnvironmentData {
            values: HashMap::new(),
            enclosing: Some(env.clone()),
            modules: HashMap::new(),
        };
        Environment {
            env_ptr: Rc::new(RefCell::new(data)),
        }
    }

    /// Binds a name in this scope, shadowing any outer binding.
    pub fn define(&self, name: String, value: Value) {
        self.env_ptr.borrow_mut().values.insert(name, value);
    }

    /// Walks the chain outward until the name resolves.
    pub fn get(&self, name: &str) -> Option<Value> {
        let data = self.env_ptr.borrow();
        match data.values.get(name) {
            Some(value) => Some(value.clone()),
            None => data.enclosing.as_ref().and_then(|outer| outer.get(name)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        let data = self.env_ptr.borrow();
        data.values.contains_key(name)
            || data
                .enclosing
                .as_ref()
                .map_or(false, |outer| outer.contains(name))
    }

    pub fn set_module(&self, name: String, table: ModuleTable) {
        self.env_ptr.borrow_mut().modules.insert(name, table);
    }

    pub fn get_module(&self, name: &str) -> Option<ModuleTable> {
        let data = self.env_ptr.borrow();
        match data.modules.get(name) {
            Some(table) => Some(table.clone()),
            None => data
                .enclosing
                .as_ref()
                .and_then(|outer| outer.get_module(name)),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

pub mod arrays;
pub mod file;
pub mod io;
pub mod math;
pub mod os;
pub mod rand;
pub mod strings;
pub mod time;

use super::environment::Environment;

/// Installs every module table into the environment's registry. Called by
/// the host once, before evaluation; the evaluator only reads the registry.
pub fn register(env: &Environment) {
    env.set_module("arrays".to_owned(), arrays::builtins());
    env.set_module("strings".to_owned(), strings::builtins());
    env.set_module("math".to_owned(), math::builtins());
    env.set_module("io".to_owned(), io::builtins());
    env.set_module("file".to_owned(), file::builtins());
    env.set_module("os".to_owned(), os::builtins());
    env.set_module("rand".to_owned(), rand::builtins());
    env.set_module("time".to_owned(), time::builtins());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_contents() {
        let env = Environment::new();
        register(&env);

        for module in ["arrays", "strings", "math", "io", "file", "os", "rand", "time"] {
            assert!(env.get_module(module).is_some(), "missing module {}", module);
        }
        assert!(env.get_module("nope").is_none());

        let strings = env.get_module("strings").unwrap();
        assert!(strings.contains_key("upper"));
        assert!(strings.contains_key("split"));
    }
}

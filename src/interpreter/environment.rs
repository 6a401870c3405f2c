use std::collections::HashMap;

use log::debug;

use super::builtins::Builtin;
use super::value::{FunctionObject, Variable};

/// Maximum number of nested function frames.
pub const RECURSION_LIMIT: usize = 100;

/// Lexical scopes, the global function table, and the call stack.
///
/// Scopes are a stack of symbol tables; index 0 is the global scope. A
/// function scope hangs directly off the global scope: on call, the caller's
/// local scopes are parked on the call stack and restored on return, so a
/// function body never sees its caller's locals. Function definitions are
/// kept apart from variables, in a table on the global scope; builtins are
/// inserted there on construction.
pub struct Environment {
    scopes: Vec<HashMap<String, Variable>>,
    fun_table: HashMap<String, FunctionObject>,
    call_stack: Vec<Vec<HashMap<String, Variable>>>,
    fun_call_nesting: usize,
}

impl Environment {
    pub fn new() -> Self {
        let mut env = Self {
            scopes: vec![HashMap::new()],
            fun_table: HashMap::new(),
            call_stack: vec![],
            fun_call_nesting: 0,
        };

        for builtin in Builtin::all() {
            env.fun_table
                .insert(builtin.name().to_string(), FunctionObject::Builtin(builtin));
        }

        env
    }

    /// Reassigns the first binding found walking outward from the current
    /// scope, or inserts into the current scope when the name is new.
    pub fn set_variable(&mut self, name: &str, variable: Variable) {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(existing) = scope.get_mut(name) {
                *existing = variable;
                return;
            }
        }

        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), variable);
        }
    }

    /// Declarations always bind in the current scope, shadowing any outer
    /// binding of the same name.
    pub fn declare_variable(&mut self, name: &str, variable: Variable) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), variable);
        }
    }

    /// First match walking outward from the current scope.
    pub fn get_variable(&self, name: &str) -> Option<&Variable> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn create_local_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn destroy_local_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Parks the caller's local scopes on the call stack and opens a fresh
    /// scope holding the parameter bindings, directly below the global scope.
    pub fn create_function_scope(
        &mut self,
        parameters: impl IntoIterator<Item = (String, Variable)>,
    ) {
        let locals = self.scopes.split_off(1);
        self.call_stack.push(locals);

        let mut scope = HashMap::new();
        for (name, variable) in parameters {
            scope.insert(name, variable);
        }
        self.scopes.push(scope);

        self.fun_call_nesting += 1;
        debug!("entered function scope, nesting {}", self.fun_call_nesting);
    }

    /// Drops the function scope and restores the scopes parked before the
    /// call; with an empty call stack only the global scope remains.
    pub fn destroy_function_scope(&mut self) {
        self.scopes.truncate(1);
        let locals = self.call_stack.pop().unwrap_or_default();
        self.scopes.extend(locals);

        self.fun_call_nesting = self.fun_call_nesting.saturating_sub(1);
    }

    pub fn fun_call_nesting(&self) -> usize {
        self.fun_call_nesting
    }

    /// Registers a function definition, overwriting any previous definition
    /// of the same name, builtins included.
    pub fn add_fun_def(&mut self, object: FunctionObject) {
        self.fun_table.insert(object.name().to_string(), object);
    }

    pub fn get_fun_def(&self, name: &str) -> Option<&FunctionObject> {
        self.fun_table.get(name)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::value::Value;
    use crate::parser::types::Type;

    fn variable(value: Value) -> Variable {
        Variable {
            typ: value.type_of(),
            nullable: false,
            mutable: true,
            value,
        }
    }

    #[test]
    fn test_declare_and_get() {
        let mut env = Environment::new();
        env.declare_variable("foo", variable(Value::Int(42)));

        assert_eq!(env.get_variable("foo").map(|v| &v.value), Some(&Value::Int(42)));
        assert!(env.get_variable("bar").is_none());
    }

    #[test]
    fn test_local_scope_shadows_and_unwinds() {
        let mut env = Environment::new();
        env.declare_variable("foo", variable(Value::Int(1)));

        env.create_local_scope();
        env.declare_variable("foo", variable(Value::Int(2)));
        assert_eq!(env.get_variable("foo").map(|v| &v.value), Some(&Value::Int(2)));

        env.destroy_local_scope();
        assert_eq!(env.get_variable("foo").map(|v| &v.value), Some(&Value::Int(1)));
    }

    #[test]
    fn test_names_declared_in_local_scope_do_not_leak() {
        let mut env = Environment::new();

        env.create_local_scope();
        env.declare_variable("inner", variable(Value::Int(1)));
        env.destroy_local_scope();

        assert!(env.get_variable("inner").is_none());
    }

    #[test]
    fn test_set_variable_updates_owning_scope() {
        let mut env = Environment::new();
        env.declare_variable("foo", variable(Value::Int(1)));

        env.create_local_scope();
        env.set_variable("foo", variable(Value::Int(5)));
        env.destroy_local_scope();

        assert_eq!(env.get_variable("foo").map(|v| &v.value), Some(&Value::Int(5)));
    }

    #[test]
    fn test_set_variable_inserts_when_missing() {
        let mut env = Environment::new();
        env.set_variable("fresh", variable(Value::Bool(true)));

        assert_eq!(
            env.get_variable("fresh").map(|v| &v.value),
            Some(&Value::Bool(true))
        );
    }

    #[test]
    fn test_function_scope_hides_caller_locals() {
        let mut env = Environment::new();
        env.declare_variable("global", variable(Value::Int(1)));

        env.create_local_scope();
        env.declare_variable("local", variable(Value::Int(2)));

        env.create_function_scope(vec![("param".to_string(), variable(Value::Int(3)))]);

        // globals and parameters are visible, the caller's locals are not
        assert!(env.get_variable("global").is_some());
        assert!(env.get_variable("param").is_some());
        assert!(env.get_variable("local").is_none());

        env.destroy_function_scope();

        assert!(env.get_variable("local").is_some());
        assert!(env.get_variable("param").is_none());

        env.destroy_local_scope();
    }

    #[test]
    fn test_function_scope_nesting_counter() {
        let mut env = Environment::new();
        assert_eq!(env.fun_call_nesting(), 0);

        env.create_function_scope(vec![]);
        env.create_function_scope(vec![]);
        assert_eq!(env.fun_call_nesting(), 2);

        env.destroy_function_scope();
        env.destroy_function_scope();
        assert_eq!(env.fun_call_nesting(), 0);
    }

    #[test]
    fn test_builtins_are_registered() {
        let env = Environment::new();

        for name in ["print", "String", "Integer", "Float", "Boolean"] {
            assert!(env.get_fun_def(name).is_some(), "missing builtin {name}");
        }
    }

    #[test]
    fn test_fun_def_overwrites() {
        let mut env = Environment::new();
        let before = env.get_fun_def("print").cloned();

        env.add_fun_def(FunctionObject::Builtin(Builtin::Print));
        assert_eq!(env.get_fun_def("print").cloned(), before);
    }

    #[test]
    fn test_global_scope_visible_inside_function_scope() {
        let mut env = Environment::new();
        env.declare_variable("answer", variable(Value::Int(42)));

        env.create_function_scope(vec![]);
        assert_eq!(
            env.get_variable("answer").map(|v| v.typ.clone()),
            Some(Type::Integer)
        );
        env.destroy_function_scope();
    }
}

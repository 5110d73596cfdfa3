use rustc_hash::{FxHashMap, FxHashSet};

use super::errors::{EnvResult, RuntimeErrorKind};
use super::value::RuntimeVal;

/// Index of a scope inside an [`Environment`].
///
/// An id is only valid until the scope it names is popped. The slot may be
/// reused by a later [`Environment::push_scope`].
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct ScopeId(usize);

#[derive(Debug, Default)]
struct Scope {
    values: FxHashMap<String, RuntimeVal>,
    constants: FxHashSet<String>,
    parent: Option<ScopeId>,
}

/// Chain of lexical scopes stored in an arena.
///
/// Children only ever point at scopes created before them, so the parent
/// chain is acyclic and always ends at the root. Scopes are released in
/// LIFO order with [`Environment::pop_scope`]; the root lives as long as
/// the environment.
///
/// # Panics
///
/// Every method taking a [`ScopeId`] panics if that scope has already been
/// popped and its slot not reused.
#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Environment {
    /// Creates an environment holding a single empty root scope.
    pub fn new() -> Self {
        Environment {
            scopes: vec![Scope::default()],
        }
    }

    /// Creates an environment whose root holds the constants `true`, `false` and `null`.
    pub fn with_globals() -> Self {
        let mut env = Environment::new();
        let root = env.root();
        env.bind(root, "true", RuntimeVal::Boolean(true), true);
        env.bind(root, "false", RuntimeVal::Boolean(false), true);
        env.bind(root, "null", RuntimeVal::Null, true);
        env
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scope(scope).parent
    }

    /// Opens a child scope of `parent`.
    pub fn push_scope(&mut self, parent: ScopeId) -> ScopeId {
        self.scopes.push(Scope {
            parent: Some(parent),
            ..Scope::default()
        });
        ScopeId(self.scopes.len() - 1)
    }

    /// Drops the most recently opened scope and returns its parent.
    /// The root is never dropped.
    pub fn pop_scope(&mut self) -> Option<ScopeId> {
        if self.scopes.len() == 1 {
            return None;
        }
        self.scopes.pop().and_then(|scope| scope.parent)
    }

    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        value: RuntimeVal,
        constant: bool,
    ) -> EnvResult<RuntimeVal> {
        if self.scope(scope).values.contains_key(name) {
            return Err(RuntimeErrorKind::DuplicateDeclaration(name.to_owned()));
        }

        self.bind(scope, name, value, constant);
        Ok(value)
    }

    pub fn assign(
        &mut self,
        scope: ScopeId,
        name: &str,
        value: RuntimeVal,
    ) -> EnvResult<RuntimeVal> {
        let owner = self.resolve(scope, name)?;
        let owner = &mut self.scopes[owner.0];

        if owner.constants.contains(name) {
            return Err(RuntimeErrorKind::ConstantReassignment(name.to_owned()));
        }

        owner.values.insert(name.to_owned(), value);
        Ok(value)
    }

    pub fn lookup(&self, scope: ScopeId, name: &str) -> EnvResult<RuntimeVal> {
        let owner = self.resolve(scope, name)?;
        self.scope(owner)
            .values
            .get(name)
            .copied()
            .ok_or_else(|| RuntimeErrorKind::UnresolvedIdentifier(name.to_owned()))
    }

    /// Finds the nearest scope, walking from `scope` towards the root, that owns `name`.
    pub fn resolve(&self, scope: ScopeId, name: &str) -> EnvResult<ScopeId> {
        let mut current = scope;

        loop {
            let data = self.scope(current);
            if data.values.contains_key(name) {
                return Ok(current);
            }

            match data.parent {
                Some(parent) => current = parent,
                None => return Err(RuntimeErrorKind::UnresolvedIdentifier(name.to_owned())),
            }
        }
    }

    pub fn is_constant(&self, scope: ScopeId, name: &str) -> bool {
        match self.resolve(scope, name) {
            Ok(owner) => self.scope(owner).constants.contains(name),
            Err(_) => false,
        }
    }

    fn bind(&mut self, scope: ScopeId, name: &str, value: RuntimeVal, constant: bool) {
        let data = &mut self.scopes[scope.0];
        data.values.insert(name.to_owned(), value);
        if constant {
            data.constants.insert(name.to_owned());
        }
    }

    fn scope(&self, scope: ScopeId) -> &Scope {
        &self.scopes[scope.0]
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_globals() {
        let env = Environment::with_globals();
        let root = env.root();

        assert_eq!(env.lookup(root, "true"), Ok(RuntimeVal::Boolean(true)));
        assert_eq!(env.lookup(root, "false"), Ok(RuntimeVal::Boolean(false)));
        assert_eq!(env.lookup(root, "null"), Ok(RuntimeVal::Null));
        assert!(env.is_constant(root, "null"));
        assert_eq!(env.parent(root), None);
    }

    #[test]
    fn test_declare_and_assign() {
        let mut env = Environment::new();
        let root = env.root();

        assert_eq!(
            env.declare(root, "x", RuntimeVal::Number(1.0), false),
            Ok(RuntimeVal::Number(1.0))
        );
        assert_eq!(
            env.assign(root, "x", RuntimeVal::Number(2.0)),
            Ok(RuntimeVal::Number(2.0))
        );
        assert_eq!(env.lookup(root, "x"), Ok(RuntimeVal::Number(2.0)));
    }

    #[test]
    fn test_duplicate_declaration() {
        let mut env = Environment::new();
        let root = env.root();

        env.declare(root, "x", RuntimeVal::Null, false).unwrap();
        assert_eq!(
            env.declare(root, "x", RuntimeVal::Number(3.0), true),
            Err(RuntimeErrorKind::DuplicateDeclaration("x".to_owned()))
        );
        assert_eq!(env.lookup(root, "x"), Ok(RuntimeVal::Null));
        assert!(!env.is_constant(root, "x"));
    }

    #[test]
    fn test_constant_reassignment() {
        let mut env = Environment::with_globals();
        let root = env.root();

        assert_eq!(
            env.assign(root, "true", RuntimeVal::Boolean(false)),
            Err(RuntimeErrorKind::ConstantReassignment("true".to_owned()))
        );
        assert_eq!(env.lookup(root, "true"), Ok(RuntimeVal::Boolean(true)));
    }

    #[test]
    fn test_unresolved() {
        let mut env = Environment::new();
        let root = env.root();
        let unresolved = Err(RuntimeErrorKind::UnresolvedIdentifier("y".to_owned()));

        assert_eq!(env.lookup(root, "y"), unresolved);
        assert_eq!(env.assign(root, "y", RuntimeVal::Null), unresolved);
        assert!(env.resolve(root, "y").is_err());
    }

    #[test]
    fn test_nested_scopes() {
        let mut env = Environment::with_globals();
        let root = env.root();
        env.declare(root, "x", RuntimeVal::Number(1.0), false).unwrap();
        env.declare(root, "k", RuntimeVal::Number(9.0), true).unwrap();

        let child = env.push_scope(root);
        assert_eq!(env.parent(child), Some(root));

        // Reads and writes reach the owning ancestor.
        assert_eq!(env.resolve(child, "x"), Ok(root));
        env.assign(child, "x", RuntimeVal::Number(5.0)).unwrap();
        assert_eq!(env.lookup(root, "x"), Ok(RuntimeVal::Number(5.0)));

        // Constants stay constant through any scope.
        assert_eq!(
            env.assign(child, "k", RuntimeVal::Null),
            Err(RuntimeErrorKind::ConstantReassignment("k".to_owned()))
        );

        // Shadowing an ancestor is allowed and does not touch it.
        env.declare(child, "x", RuntimeVal::Boolean(true), false).unwrap();
        assert_eq!(env.resolve(child, "x"), Ok(child));
        assert_eq!(env.lookup(child, "x"), Ok(RuntimeVal::Boolean(true)));
        assert_eq!(env.lookup(root, "x"), Ok(RuntimeVal::Number(5.0)));

        let grandchild = env.push_scope(child);
        assert_eq!(env.lookup(grandchild, "x"), Ok(RuntimeVal::Boolean(true)));
        assert_eq!(env.lookup(grandchild, "null"), Ok(RuntimeVal::Null));

        assert_eq!(env.pop_scope(), Some(child));
        assert_eq!(env.pop_scope(), Some(root));
        assert_eq!(env.pop_scope(), None);
        assert_eq!(env.lookup(root, "x"), Ok(RuntimeVal::Number(5.0)));
    }

    #[test]
    #[should_panic]
    fn test_popped_scope_id_is_invalid() {
        let mut env = Environment::new();
        let child = env.push_scope(env.root());
        assert_eq!(env.pop_scope(), Some(env.root()));

        let _ = env.lookup(child, "x");
    }
}

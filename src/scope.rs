//! Scope boundaries and the tracker that follows them during traversal.

use syn::Ident;

/// Limits where an operation may match.
///
/// `Unrestricted` matches everywhere in the file. `Function` matches only
/// inside the body of a fn or method with the given name. The name is compared
/// against the immediate declaration identifier, never a qualified path, so
/// `Scope::function("run")` covers both `fn run` and `impl Server { fn run }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    Unrestricted,
    Function(String),
}

impl Scope {
    pub fn function(name: impl Into<String>) -> Self {
        Self::Function(name.into())
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }
}

/// Tracks whether the current traversal position lies inside a target scope.
///
/// Every named fn-like declaration pushes a frame on entry and pops it on
/// exit, so a nested, differently-named fn suspends matching until the walk
/// leaves it again. Closures push nothing: they are anonymous and belong to
/// the scope of whatever declaration encloses them.
#[derive(Debug)]
pub(crate) struct ScopeTracker<'a> {
    scope: &'a Scope,
    frames: Vec<bool>,
}

impl<'a> ScopeTracker<'a> {
    pub(crate) fn new(scope: &'a Scope) -> Self {
        Self {
            scope,
            frames: Vec::new(),
        }
    }

    pub(crate) fn enter_function(&mut self, ident: &Ident) {
        let matched = match self.scope {
            Scope::Unrestricted => true,
            Scope::Function(name) => ident == name.as_str(),
        };
        self.frames.push(matched);
    }

    pub(crate) fn exit_function(&mut self) {
        self.frames.pop();
    }

    /// True iff the current position counts as inside the target scope.
    /// The nearest enclosing named frame decides; with no frame at all only
    /// an unrestricted scope matches.
    pub(crate) fn is_inside(&self) -> bool {
        match self.scope {
            Scope::Unrestricted => true,
            Scope::Function(_) => self.frames.last().copied().unwrap_or(false),
        }
    }
}

//! Module registry mapping source names to parsed module declarations.
//!
//! The registry scans every module of the parsed design once, detects
//! duplicate definitions (`E310`, first definition wins), and provides O(1)
//! lookup by interned name for instance resolution.

use std::collections::HashMap;

use plexus_common::{Ident, Interner};
use plexus_diagnostics::DiagnosticSink;
use plexus_ir::Module;
use plexus_source::Span;

use crate::errors;

/// Registry of all source module declarations.
pub struct ModuleRegistry<'a> {
    modules: HashMap<Ident, &'a Module>,
    first_span: HashMap<Ident, Span>,
}

impl<'a> ModuleRegistry<'a> {
    /// Builds a registry from the parsed modules, emitting `E310` for every
    /// duplicate name. The first definition wins.
    pub fn from_modules(modules: &'a [Module], interner: &Interner, sink: &DiagnosticSink) -> Self {
        let mut reg = Self {
            modules: HashMap::new(),
            first_span: HashMap::new(),
        };
        for module in modules {
            if let Some(&prev_span) = reg.first_span.get(&module.name) {
                sink.emit(errors::error_duplicate_module(
                    interner.resolve(module.name),
                    module.span,
                    prev_span,
                ));
            } else {
                reg.modules.insert(module.name, module);
                reg.first_span.insert(module.name, module.span);
            }
        }
        reg
    }

    /// Looks up a module declaration by source name.
    pub fn lookup(&self, name: Ident) -> Option<&'a Module> {
        self.modules.get(&name).copied()
    }

    /// Returns the declaration span of a module, if registered.
    pub fn span_of(&self, name: Ident) -> Option<Span> {
        self.first_span.get(&name).copied()
    }

    /// The number of distinct registered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` if no modules are registered.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

//! Mutable elaboration state: the design under construction, the FIFO
//! specialization worklist, and the specialization map.
//!
//! [`ElabContext`] replaces any notion of a global environment: everything
//! a pass needs is threaded through it explicitly. The worklist drain is
//! breadth-first and bounded by `max_specializations`.

use std::collections::{HashMap, VecDeque};

use plexus_common::{ContentHash, Ident, Interner};
use plexus_config::ElaborationConfig;
use plexus_diagnostics::DiagnosticSink;
use plexus_ir::{Design, Expression, Module, ModuleId, Number, Specialization};
use plexus_source::Span;

use crate::errors;
use crate::registry::ModuleRegistry;

/// Specialization map key: source module plus the hash of its ordered,
/// resolved parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SpecKey {
    source: Ident,
    param_hash: ContentHash,
}

/// Mutable state carried through elaboration.
pub struct ElabContext<'a> {
    /// The design being built.
    pub design: Design,
    /// The registry providing name-to-declaration lookup.
    pub registry: &'a ModuleRegistry<'a>,
    /// The string interner shared with the parser.
    pub interner: &'a Interner,
    /// The diagnostic sink for error reporting.
    pub sink: &'a DiagnosticSink,
    /// The configured resource bounds.
    pub limits: ElaborationConfig,
    worklist: VecDeque<ModuleId>,
    spec_map: HashMap<SpecKey, ModuleId>,
    spec_counts: HashMap<Ident, usize>,
}

impl<'a> ElabContext<'a> {
    /// Creates a new elaboration context.
    pub fn new(
        registry: &'a ModuleRegistry<'a>,
        interner: &'a Interner,
        sink: &'a DiagnosticSink,
        limits: ElaborationConfig,
    ) -> Self {
        Self {
            design: Design::new(),
            registry,
            interner,
            sink,
            limits,
            worklist: VecDeque::new(),
            spec_map: HashMap::new(),
            spec_counts: HashMap::new(),
        }
    }

    /// Pops the next module to elaborate, in FIFO order.
    pub fn pop_worklist(&mut self) -> Option<ModuleId> {
        self.worklist.pop_front()
    }

    /// Resolves a `(source module, parameter tuple)` pair to a specialized
    /// module, creating one on a map miss.
    ///
    /// `params` must hold every declared parameter in declaration order
    /// with its resolved constant value. On a hit the existing `ModuleId`
    /// is reused and `params` is discarded. On a miss the source module is
    /// cloned, its parameter table overwritten with the resolved constants,
    /// renamed (`_1`, `_2`, ... after the first), registered, and pushed
    /// onto the worklist.
    ///
    /// Returns `None` when the specialization cap is exhausted (`R301`).
    pub fn specialize(
        &mut self,
        source: &Module,
        params: Vec<(Ident, Number)>,
        span: Span,
    ) -> Option<ModuleId> {
        let key = SpecKey {
            source: source.name,
            param_hash: hash_params(self.interner, &params),
        };
        if let Some(&existing) = self.spec_map.get(&key) {
            return Some(existing);
        }

        if self.design.modules.len() >= self.limits.max_specializations {
            self.sink.emit(errors::error_specialization_cap(
                self.limits.max_specializations,
                span,
            ));
            return None;
        }

        let mut module = source.clone();
        module.source_name = source.name;
        for (name, value) in &params {
            if let Some(param) = module.params.get_mut(*name) {
                param.value = Expression::Number(value.clone());
            }
        }

        let count = self.spec_counts.entry(source.name).or_insert(0);
        if *count > 0 {
            let renamed = format!("{}_{count}", self.interner.resolve(source.name));
            module.name = self.interner.get_or_intern(&renamed);
        }
        *count += 1;

        let id = self.design.modules.alloc(module);
        self.design.specializations.push(Specialization {
            source: source.name,
            param_hash: key.param_hash,
            module: id,
        });
        self.spec_map.insert(key, id);
        self.worklist.push_back(id);
        Some(id)
    }
}

/// Hashes an ordered parameter tuple into a [`ContentHash`].
///
/// The digest covers the resolved name string and the full 4-state bit
/// pattern of each value, so two tuples collide only when they would
/// elaborate identically.
fn hash_params(interner: &Interner, params: &[(Ident, Number)]) -> ContentHash {
    let mut bytes = Vec::new();
    for (name, value) in params {
        bytes.extend_from_slice(interner.resolve(*name).as_bytes());
        bytes.push(0);
        bytes.extend_from_slice(&value.width().to_le_bytes());
        bytes.push(value.is_signed() as u8);
        for bit in value.bits() {
            let (v, u) = bit.planes();
            bytes.push((v as u8) | ((u as u8) << 1));
        }
        bytes.push(0xff);
    }
    ContentHash::from_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(interner: &Interner) -> (ModuleRegistry<'_>, DiagnosticSink) {
        let sink = DiagnosticSink::new();
        let reg = ModuleRegistry::from_modules(&[], interner, &sink);
        (reg, sink)
    }

    fn params(interner: &Interner, values: &[(&str, u64)]) -> Vec<(Ident, Number)> {
        values
            .iter()
            .map(|(name, v)| (interner.get_or_intern(name), Number::from_u64(*v, 32)))
            .collect()
    }

    #[test]
    fn same_tuple_reuses_module() {
        let interner = Interner::new();
        let (reg, sink) = setup(&interner);
        let mut ctx = ElabContext::new(&reg, &interner, &sink, ElaborationConfig::default());
        let source = Module::new(interner.get_or_intern("ram"), Span::DUMMY);

        let a = ctx
            .specialize(&source, params(&interner, &[("WIDTH", 8)]), Span::DUMMY)
            .unwrap();
        let b = ctx
            .specialize(&source, params(&interner, &[("WIDTH", 8)]), Span::DUMMY)
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(ctx.design.modules.len(), 1);
    }

    #[test]
    fn distinct_tuples_get_distinct_names() {
        let interner = Interner::new();
        let (reg, sink) = setup(&interner);
        let mut ctx = ElabContext::new(&reg, &interner, &sink, ElaborationConfig::default());
        let source = Module::new(interner.get_or_intern("ram"), Span::DUMMY);

        let a = ctx
            .specialize(&source, params(&interner, &[("WIDTH", 8)]), Span::DUMMY)
            .unwrap();
        let b = ctx
            .specialize(&source, params(&interner, &[("WIDTH", 16)]), Span::DUMMY)
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(interner.resolve(ctx.design.modules[a].name), "ram");
        assert_eq!(interner.resolve(ctx.design.modules[b].name), "ram_1");
        assert_eq!(ctx.design.modules[b].source_name, source.name);
    }

    #[test]
    fn worklist_is_fifo() {
        let interner = Interner::new();
        let (reg, sink) = setup(&interner);
        let mut ctx = ElabContext::new(&reg, &interner, &sink, ElaborationConfig::default());
        let first = Module::new(interner.get_or_intern("a"), Span::DUMMY);
        let second = Module::new(interner.get_or_intern("b"), Span::DUMMY);

        let a = ctx.specialize(&first, Vec::new(), Span::DUMMY).unwrap();
        let b = ctx.specialize(&second, Vec::new(), Span::DUMMY).unwrap();
        assert_eq!(ctx.pop_worklist(), Some(a));
        assert_eq!(ctx.pop_worklist(), Some(b));
        assert_eq!(ctx.pop_worklist(), None);
    }

    #[test]
    fn cap_stops_specialization_with_r301() {
        let interner = Interner::new();
        let (reg, sink) = setup(&interner);
        let limits = ElaborationConfig {
            max_unroll_iterations: 4096,
            max_specializations: 2,
        };
        let mut ctx = ElabContext::new(&reg, &interner, &sink, limits);
        let source = Module::new(interner.get_or_intern("gen"), Span::DUMMY);

        assert!(ctx
            .specialize(&source, params(&interner, &[("N", 0)]), Span::DUMMY)
            .is_some());
        assert!(ctx
            .specialize(&source, params(&interner, &[("N", 1)]), Span::DUMMY)
            .is_some());
        assert!(ctx
            .specialize(&source, params(&interner, &[("N", 2)]), Span::DUMMY)
            .is_none());
        assert!(sink.has_errors());
        assert_eq!(ctx.design.modules.len(), 2);
    }

    #[test]
    fn x_bits_distinguish_tuples() {
        let interner = Interner::new();
        let (reg, sink) = setup(&interner);
        let mut ctx = ElabContext::new(&reg, &interner, &sink, ElaborationConfig::default());
        let source = Module::new(interner.get_or_intern("m"), Span::DUMMY);
        let name = interner.get_or_intern("P");

        let zero = vec![(name, Number::from_u64(0, 4))];
        let xxxx = vec![(name, Number::parse("4'bxxxx").unwrap())];
        let a = ctx.specialize(&source, zero, Span::DUMMY).unwrap();
        let b = ctx.specialize(&source, xxxx, Span::DUMMY).unwrap();
        assert_ne!(a, b);
    }
}

//! Design elaboration engine.
//!
//! Transforms a parsed module list into a fully elaborated [`Design`]:
//! scopes are classified, parameters substituted, constant control flow
//! collapsed, for loops unrolled, and instantiations resolved to parameter
//! specializations. Elaboration starts at the configured top module and
//! drains a FIFO worklist until every reachable specialization is done.
//!
//! # Usage
//!
//! ```ignore
//! let design = elaborate(&parsed, &config, &interner, &sink)?;
//! ```

#![warn(missing_docs)]

pub mod context;
pub mod drive;
pub mod errors;
pub mod fold;
pub mod instance;
pub mod registry;
pub mod scope;
pub mod usage;

use plexus_common::{Interner, PlexusResult};
use plexus_config::ProjectConfig;
use plexus_diagnostics::DiagnosticSink;
use plexus_ir::{Design, Module, ModuleId};

pub use context::ElabContext;
pub use drive::driving_expression;
pub use registry::ModuleRegistry;
pub use usage::{UsageIndex, UsageSite};

/// The parsed design handed to the elaborator: every module declaration of
/// the project, in parse order.
pub struct ParsedDesign {
    /// Parsed module declarations.
    pub modules: Vec<Module>,
}

/// Elaborates a parsed design into a [`Design`].
///
/// Builds a module registry, looks up the top module from
/// `config.project.top`, and drains the specialization worklist. User-facing
/// errors are emitted to `sink` and recovered from where possible; only
/// internal invariant violations return `Err`.
pub fn elaborate(
    parsed: &ParsedDesign,
    config: &ProjectConfig,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> PlexusResult<Design> {
    let registry = ModuleRegistry::from_modules(&parsed.modules, interner, sink);

    let top_name = interner.get_or_intern(&config.project.top);
    let Some(source) = registry.lookup(top_name) else {
        sink.emit(errors::error_missing_top(&config.project.top));
        // Return a valid but empty design.
        return Ok(Design::new());
    };

    let mut ctx = ElabContext::new(&registry, interner, sink, config.elaboration);
    let params = instance::default_params(source, interner, sink);
    ctx.design.top = ctx.specialize(source, params, source.span);

    while let Some(mid) = ctx.pop_worklist() {
        process_module(mid, &mut ctx);
    }

    Ok(ctx.design)
}

/// Runs the per-module pass pipeline on one specialization.
fn process_module(mid: ModuleId, ctx: &mut ElabContext) {
    let interner = ctx.interner;
    let sink = ctx.sink;
    let limits = ctx.limits;
    {
        let module = ctx.design.modules.get_mut(mid);
        scope::classify_module(module, interner, sink);
        scope::substitute_parameters(module);
        fold::fold_module(module, &limits, interner, sink);
        scope::declare_implicit_nets(module, interner, sink);
        scope::check_reg_initializers(module, interner, sink);
    }
    instance::elaborate_instances(mid, ctx);
}

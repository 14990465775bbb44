//! Class lowering for lowerjs.
//!
//! - [`ClassTransformer`] rewrites class declarations and expressions into
//!   calls to the runtime `createClass` helper.
//! - [`SuperTransformer`] rewrites `super` calls and accesses inside one class
//!   member into runtime dispatch calls.
//! - [`TempVarAllocator`] hands out `$__N` temporaries and declares them at the
//!   top of the enclosing function or program.

pub mod runtime;
pub use runtime::{Runtime, RuntimeHelper};

pub mod temp_vars;
pub use temp_vars::TempVarAllocator;

pub mod super_transformer;
pub use super_transformer::{MemberKind, SuperTransformer};

pub mod class_transformer;
pub use class_transformer::{ClassContext, ClassLowering, ClassTransformer};

use lowerjs_ast::{NodeArena, NodeIndex};
use lowerjs_common::{ErrorReporter, InternalError, LoweringOptions};

/// One stage of the lowering pipeline.
///
/// A pass consumes a program tree and returns the (possibly new) program
/// root. User-facing problems go to `reporter`; an `Err` aborts the compile.
pub trait LoweringPass {
    fn name(&self) -> &'static str;

    fn run(
        &mut self,
        arena: &mut NodeArena,
        program: NodeIndex,
        options: &LoweringOptions,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<NodeIndex, InternalError>;
}

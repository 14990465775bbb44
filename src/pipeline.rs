//! The compile pipeline: class lowering, any registered passes, then the
//! free-variable check.
//!
//! When the config's log settings carry a filter, every compile runs under a
//! subscriber built from them (stderr unless [`Pipeline::with_log_writer`]
//! says otherwise).

use crate::config::CompilerConfig;
use crate::tracing_config::build_dispatch;
use anyhow::{Context, Result};
use lowerjs_ast::{NodeArena, NodeIndex, print_node};
use lowerjs_checker::{DEFAULT_GLOBALS, FreeVariableChecker};
use lowerjs_common::DiagnosticBag;
use lowerjs_lowering::{ClassLowering, LoweringPass};
use tracing::{Dispatch, debug, info};
use tracing_subscriber::fmt::MakeWriter;

/// Result of one compile.
#[derive(Debug)]
pub struct CompileOutput {
    /// Root of the lowered program
    pub program: NodeIndex,
    /// The lowered program printed as JavaScript
    pub text: String,
    pub diagnostics: DiagnosticBag,
}

impl CompileOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

pub struct Pipeline {
    config: CompilerConfig,
    passes: Vec<Box<dyn LoweringPass>>,
    log: Option<Dispatch>,
}

impl Pipeline {
    /// `LOWERJS_LOG` / `LOWERJS_LOG_FORMAT` override the configured log
    /// settings.
    pub fn new(mut config: CompilerConfig) -> Self {
        config.log = config.log.with_env_overrides();
        let log = build_dispatch(&config.log, std::io::stderr);
        Pipeline {
            config,
            passes: Vec::new(),
            log,
        }
    }

    /// Send compile logs to `writer` instead of stderr.
    #[must_use]
    pub fn with_log_writer<W>(mut self, writer: W) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        self.log = build_dispatch(&self.config.log, writer);
        self
    }

    /// Register a pass to run after class lowering, in registration order.
    #[must_use]
    pub fn with_pass(mut self, pass: Box<dyn LoweringPass>) -> Self {
        self.passes.push(pass);
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Names seeded into the checker's root scope: the ES5 globals, the
    /// runtime namespace and the configured globals.
    pub fn ambient_names(&self) -> Vec<String> {
        let mut names: Vec<String> = DEFAULT_GLOBALS.iter().map(|s| s.to_string()).collect();
        names.push(self.config.lowering.runtime_name.clone());
        names.extend(self.config.globals.iter().cloned());
        names
    }

    /// Lower and check `program`.
    ///
    /// User-facing problems end up in [`CompileOutput::diagnostics`]; an
    /// internal error in any pass is returned as `Err`.
    pub fn compile(&mut self, arena: &mut NodeArena, program: NodeIndex) -> Result<CompileOutput> {
        match self.log.clone() {
            Some(dispatch) => {
                tracing::dispatcher::with_default(&dispatch, || self.run_passes(arena, program))
            }
            None => self.run_passes(arena, program),
        }
    }

    #[tracing::instrument(level = "info", skip_all, fields(file = %self.config.file_name))]
    fn run_passes(&mut self, arena: &mut NodeArena, program: NodeIndex) -> Result<CompileOutput> {
        let options = &self.config.lowering;
        let mut diagnostics = DiagnosticBag::with_file(self.config.file_name.as_str());

        let mut class_lowering = ClassLowering;
        let mut program = class_lowering
            .run(arena, program, options, &mut diagnostics)
            .with_context(|| format!("{} pass failed", class_lowering.name()))?;

        for pass in &mut self.passes {
            debug!(pass = pass.name(), "running pass");
            program = pass
                .run(arena, program, options, &mut diagnostics)
                .with_context(|| format!("{} pass failed", pass.name()))?;
        }

        FreeVariableChecker::new(self.ambient_names())
            .check_program(arena, program, &mut diagnostics)
            .context("free-variable check failed")?;

        info!(
            diagnostics = diagnostics.len(),
            errors = diagnostics.error_count(),
            "compile finished"
        );
        Ok(CompileOutput {
            program,
            text: print_node(arena, program),
            diagnostics,
        })
    }
}

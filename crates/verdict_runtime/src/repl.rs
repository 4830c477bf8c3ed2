//! The authoring REPL: type a condition, see how it reads.

use std::io::{self, Write};

use verdict_foundation::{Error, Result};
use verdict_language::{Diagnostic, ParseResult, Severity, project};

use crate::editor::{LineEditor, ReadResult, RustylineEditor, default_keywords, open_parens};
use crate::service::DslService;
use crate::world::World;

/// Everything the REPL shows for one condition.
#[derive(Debug)]
pub struct Report {
    /// The condition after canonicalization.
    pub canonical: String,
    /// Parse result including validator warnings.
    pub result: ParseResult,
    /// JSON projection of the AST, when it parsed.
    pub projection: Option<serde_json::Value>,
    /// Evaluation against the loaded world, when there is one.
    pub verdict: Option<bool>,
}

impl Report {
    /// Error and warning diagnostics, in source order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.result.diagnostics.iter()
    }
}

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// The condition pipeline.
    service: DslService,

    /// World conditions are evaluated against, if loaded.
    world: Option<World>,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Primary prompt.
    prompt: String,

    /// Continuation prompt (for multi-line input).
    continuation_prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a new REPL with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(service: DslService) -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Ok(Self::with_editor(editor, service))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a new REPL with the given editor.
    pub fn with_editor(editor: E, service: DslService) -> Self {
        Self {
            editor,
            service,
            world: None,
            show_banner: true,
            prompt: "?> ".to_string(),
            continuation_prompt: ".. ".to_string(),
        }
    }

    /// Evaluates conditions against `world` and offers its ids for completion.
    #[must_use]
    pub fn with_world(mut self, world: World) -> Self {
        let mut keywords = default_keywords();
        keywords.extend(world.elements.iter().map(|element| element.id.clone()));
        self.editor.set_keywords(keywords);
        self.world = Some(world);
        self
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the primary prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Returns the service.
    #[must_use]
    pub const fn service(&self) -> &DslService {
        &self.service
    }

    /// Returns the loaded world.
    #[must_use]
    pub const fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    /// Runs the REPL loop.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails fatally.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }

        loop {
            match self.read_eval_print() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    self.print_error(&e);
                }
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Executes one read-eval-print iteration.
    ///
    /// Returns `Ok(true)` to continue, `Ok(false)` to exit.
    fn read_eval_print(&mut self) -> Result<bool> {
        let Some(input) = self.read_input()? else {
            return Ok(false);
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(true);
        }

        self.editor.add_history(&input);

        match trimmed {
            ":quit" | ":q" => return Ok(false),
            ":clear" => {
                let cleared = self.service.cache_size();
                self.service.clear_cache();
                println!("cleared {cleared} cached condition(s)");
            }
            command if command.starts_with(':') => {
                return Err(Error::usage(format!("unknown command: {command}")));
            }
            condition => {
                let report = self.eval(condition);
                self.print_report(&report);
            }
        }

        Ok(true)
    }

    /// Reads a potentially multi-line input.
    fn read_input(&mut self) -> Result<Option<String>> {
        let mut input = String::new();
        let mut first_line = true;

        loop {
            let prompt = if first_line {
                &self.prompt
            } else {
                &self.continuation_prompt
            };

            match self.editor.read_line(prompt)? {
                ReadResult::Line(line) => {
                    if !first_line {
                        input.push('\n');
                    }
                    input.push_str(&line);

                    if open_parens(&input) <= 0 {
                        return Ok(Some(input));
                    }

                    first_line = false;
                }
                ReadResult::Interrupted => {
                    if !first_line {
                        println!("\nInput cancelled.");
                    }
                    return Ok(Some(String::new()));
                }
                ReadResult::Eof => {
                    if first_line {
                        return Ok(None);
                    }
                    return Err(Error::usage("unexpected EOF in multi-line input"));
                }
            }
        }
    }

    /// Canonicalizes, checks, projects and (with a world) evaluates a condition.
    #[must_use]
    pub fn eval(&self, input: &str) -> Report {
        let canonical = self.service.canonicalize(input);
        let result = self.service.check(input);
        let projection = result.ast.as_ref().map(project);
        let verdict = match &self.world {
            Some(world) if result.success() => Some(self.service.evaluate(input, world)),
            _ => None,
        };

        Report {
            canonical,
            result,
            projection,
            verdict,
        }
    }

    #[allow(clippy::unused_self)]
    fn print_report(&self, report: &Report) {
        println!("\x1b[2m{}\x1b[0m", report.canonical);

        for diagnostic in report.diagnostics() {
            match diagnostic.severity {
                Severity::Error => eprintln!("\x1b[31m{diagnostic}\x1b[0m"),
                Severity::Warning => eprintln!("\x1b[33m{diagnostic}\x1b[0m"),
            }
        }

        if let Some(projection) = &report.projection {
            match serde_json::to_string_pretty(projection) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("\x1b[31mError: {e}\x1b[0m"),
            }
        }

        if let Some(verdict) = report.verdict {
            println!("\x1b[1m=> {verdict}\x1b[0m");
        }
    }

    /// Prints an error to stderr.
    #[allow(clippy::unused_self)]
    fn print_error(&self, error: &Error) {
        eprintln!("\x1b[31mError: {error}\x1b[0m");
    }

    /// Prints the welcome banner.
    fn print_banner(&self) {
        println!("\x1b[1;36mverdict\x1b[0m condition REPL v{}", env!("CARGO_PKG_VERSION"));
        match &self.world {
            Some(world) => println!("Evaluating against {} element(s).", world.elements.len()),
            None => println!("No world loaded; conditions are parsed but not evaluated."),
        }
        println!("Type a condition. :clear clears the cache, :quit or Ctrl+D exits.\n");

        let _ = io::stdout().flush();
    }
}

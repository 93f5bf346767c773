use anyhow::{bail, Context, Result};
use filter_compiler::{CompilerConfig, FilterCompiler};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const CONFIG_FILE: &str = "filter_compiler.json";

const HELP: &str = "\
Enter a delimited filter expression to compile it. Commands:
  :mode kv|value       key-value leaves (a>=1) or bare values broadcast across fields
  :fields f1,f2,...    fields used in value mode
  :delim <text>        token delimiter
  :flatten on|off      merge nested and/or chains
  :config              show current settings
  :help                this text
  :quit                exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    KeyValue,
    ValueOnly,
}

struct Session {
    mode: Mode,
    config: CompilerConfig,
    compiler: FilterCompiler,
}

impl Session {
    fn new(config: CompilerConfig) -> Self {
        Self {
            mode: Mode::KeyValue,
            compiler: FilterCompiler::from_config(config.clone()),
            config,
        }
    }

    fn rebuild(&mut self) {
        self.compiler = FilterCompiler::from_config(self.config.clone());
    }

    /// Apply a `:command`. Returns false when the session should end.
    fn command(&mut self, line: &str) -> Result<bool> {
        let (name, arg) = match line.split_once(' ') {
            Some((name, arg)) => (name, arg),
            None => (line, ""),
        };

        match name {
            ":quit" | ":q" => return Ok(false),
            ":help" => println!("{}", HELP),
            ":config" => {
                println!("mode: {:?}", self.mode);
                println!("{}", serde_json::to_string_pretty(&self.config)?);
            }
            ":mode" => {
                self.mode = match arg.trim() {
                    "kv" => Mode::KeyValue,
                    "value" => Mode::ValueOnly,
                    other => bail!("unknown mode '{}', expected kv or value", other),
                };
                println!("mode: {:?}", self.mode);
            }
            ":fields" => {
                self.config.default_fields = arg
                    .split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(str::to_string)
                    .collect();
                self.rebuild();
                println!("fields: {:?}", self.config.default_fields);
            }
            ":delim" => {
                // The argument is taken verbatim so a single space works
                let candidate = CompilerConfig {
                    delimiter: arg.to_string(),
                    ..self.config.clone()
                };
                candidate.validate()?;
                self.config = candidate;
                self.rebuild();
                println!("delimiter: {:?}", self.config.delimiter);
            }
            ":flatten" => {
                self.config.flatten_nested = match arg.trim() {
                    "on" => true,
                    "off" => false,
                    other => bail!("expected on or off, got '{}'", other),
                };
                self.rebuild();
                println!("flatten: {}", self.config.flatten_nested);
            }
            other => bail!("unknown command '{}', try :help", other),
        }
        Ok(true)
    }

    fn compile(&self, line: &str) -> Result<String> {
        let tree = match self.mode {
            Mode::KeyValue => self.compiler.compile_key_value_str(line),
            Mode::ValueOnly => self.compiler.compile_value_only_default(line),
        }?;
        serde_json::to_string_pretty(&tree).context("failed to render query")
    }
}

/// Load the configuration, falling back to defaults when the file is unusable.
fn load_config(path: &str) -> CompilerConfig {
    match CompilerConfig::from_json_file(path) {
        Ok(config) => {
            tracing::info!("loaded configuration from {}", path);
            config
        }
        Err(e) => {
            tracing::warn!("{}; using default configuration", e);
            CompilerConfig::default()
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::Level::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_FILE.to_string());
    let mut session = Session::new(load_config(&path));

    println!("--- filter compiler ---");
    println!("delimiter: {:?} (:help for commands)", session.config.delimiter);

    let mut rl = DefaultEditor::new().context("failed to start line editor")?;
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let line = line.trim_end_matches(['\r', '\n']);
                if line.trim().is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                if line.starts_with(':') {
                    match session.command(line) {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(e) => println!("✗ {}", e),
                    }
                    continue;
                }

                match session.compile(line) {
                    Ok(json) => println!("{}", json),
                    Err(e) => println!("✗ {}", e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("failed to read input"),
        }
    }

    Ok(())
}

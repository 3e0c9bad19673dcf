//! Render command

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use serde_json::{json, Value};
use stack_common::Stack;
use stack_service::{CompiledStack, CompilerConfig, IngressFlavor, OsEnv, StackCompiler};
use tracing::{info, warn};

use crate::{Error, Result};

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Stack file (YAML)
    pub file: PathBuf,

    /// Override the stack name declared in the file
    #[arg(long)]
    pub name: Option<String>,

    /// Ingress API version: v1 or v1beta1 (default: $STACK_INGRESS_FLAVOR, then v1)
    #[arg(long)]
    pub ingress_flavor: Option<IngressFlavor>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub output: OutputFormat,
}

/// Output format
#[derive(Clone, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON (default)
    #[default]
    Json,
    /// YAML
    Yaml,
}

/// Run the render command
///
/// Objects that compiled are printed even when others failed; the failures are then
/// returned as a single error so the process exits non-zero.
pub fn run(args: RenderArgs) -> Result<()> {
    let raw = std::fs::read(&args.file).map_err(|e| Error::stack_file(&args.file, e))?;
    let stack = load_stack(raw, args.name.as_deref())?;

    let mut config = CompilerConfig::from_env(&OsEnv)?;
    if let Some(flavor) = args.ingress_flavor {
        config = config.with_ingress_flavor(flavor);
    }

    let compiled = StackCompiler::new(config).compile(&stack);
    let list = resource_list(&compiled)?;
    info!(
        stack = %stack.name,
        file = %args.file.display(),
        objects = list["items"].as_array().map_or(0, Vec::len),
        "stack rendered"
    );

    write_list(&list, &args.output, std::io::stdout().lock())?;
    check(&compiled)
}

/// Parse a stack document, keeping its raw bytes as the manifest
pub fn load_stack(raw: Vec<u8>, name: Option<&str>) -> Result<Stack> {
    let mut stack: Stack = serde_yaml::from_slice(&raw)?;
    if let Some(name) = name {
        stack.name = name.to_string();
    }
    if stack.name.is_empty() {
        return Err(stack_common::Error::validation("stack has no name, pass --name").into());
    }
    Ok(stack.with_manifest(raw))
}

/// Wrap every compiled object in a v1 List
pub fn resource_list(compiled: &CompiledStack) -> Result<Value> {
    Ok(json!({
        "apiVersion": "v1",
        "kind": "List",
        "items": compiled.resources()?,
    }))
}

fn write_list(list: &Value, format: &OutputFormat, mut out: impl Write) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, list)?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => serde_yaml::to_writer(&mut out, list)?,
    }
    out.flush()?;
    Ok(())
}

fn check(compiled: &CompiledStack) -> Result<()> {
    let failures: Vec<String> = compiled
        .errors()
        .into_iter()
        .map(|(name, err)| {
            warn!(name, error = %err, "compilation failed");
            format!("{name}: {err}")
        })
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(Error::Compile { failures })
    }
}

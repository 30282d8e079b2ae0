use anyhow::{Context, Result, bail};
use kanban_markdown_config::Config;
use kanban_markdown_engine::{DialectOptions, collect_includes, parse, serialize};
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::{env, fs, process};

const USAGE: &str = "Usage: kanban-markdown <roundtrip|tree|check|includes> <file>";

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn roundtrip(text: &str, options: &DialectOptions) -> String {
    serialize(&parse(text, options), options)
}

fn tree_json(text: &str, options: &DialectOptions) -> Result<String> {
    Ok(parse(text, options).to_json_pretty()?)
}

/// Fails unless the text survives a round trip and a second pass changes
/// nothing.
fn check(text: &str, options: &DialectOptions) -> Result<()> {
    let once = parse(text, options);
    let written = serialize(&once, options);
    let twice = parse(&written, options);
    if twice != once {
        bail!("document tree changes after a round trip");
    }
    if serialize(&twice, options) != written {
        bail!("serialized text changes after a second round trip");
    }
    if written != text.trim_matches('\n') {
        info!("round trip normalizes formatting; content is preserved");
    }
    Ok(())
}

/// One include found while walking.
#[derive(Debug, PartialEq)]
struct IncludeEntry {
    depth: usize,
    path: PathBuf,
    missing: bool,
    cycle: bool,
}

/// Walks includes depth first, resolving each path against the directory of
/// the file that includes it. Files already on the current chain are
/// reported as cycles and not entered again.
fn walk_includes(root: &Path, options: &DialectOptions) -> Result<Vec<IncludeEntry>> {
    let mut out = vec![];
    let mut chain = BTreeSet::new();
    chain.insert(root.canonicalize().unwrap_or_else(|_| root.to_path_buf()));
    visit(root, 1, options, &mut chain, &mut out)?;
    Ok(out)
}

fn visit(
    file: &Path,
    depth: usize,
    options: &DialectOptions,
    chain: &mut BTreeSet<PathBuf>,
    out: &mut Vec<IncludeEntry>,
) -> Result<()> {
    let text = read(file)?;
    let base = file.parent().unwrap_or(Path::new("."));
    for include in collect_includes(&parse(&text, options)) {
        let path = include.to_path(base);
        if !path.is_file() {
            warn!("missing include {} in {}", include, file.display());
            out.push(IncludeEntry {
                depth,
                path,
                missing: true,
                cycle: false,
            });
            continue;
        }
        let key = path.canonicalize().unwrap_or_else(|_| path.clone());
        let cycle = chain.contains(&key);
        out.push(IncludeEntry {
            depth,
            path: path.clone(),
            missing: false,
            cycle,
        });
        if cycle {
            debug!("include cycle at {}", path.display());
            continue;
        }
        chain.insert(key.clone());
        visit(&path, depth + 1, options, chain, out)?;
        chain.remove(&key);
    }
    Ok(())
}

fn dialect_options() -> DialectOptions {
    match Config::load() {
        Ok(Some(config)) => config.dialect_options(),
        Ok(None) => DialectOptions::default(),
        Err(e) => {
            warn!("Ignoring config file: {e}");
            DialectOptions::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let (command, file) = match args.as_slice() {
        [_, command, file] => (command.as_str(), PathBuf::from(file)),
        _ => {
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };
    let options = dialect_options();

    match command {
        "roundtrip" => println!("{}", roundtrip(&read(&file)?, &options)),
        "tree" => println!("{}", tree_json(&read(&file)?, &options)?),
        "check" => {
            if let Err(e) = check(&read(&file)?, &options) {
                eprintln!("{}: {e}", file.display());
                process::exit(1);
            }
            println!("{}: ok", file.display());
        }
        "includes" => {
            let entries = walk_includes(&file, &options)?;
            for entry in &entries {
                let note = match (entry.missing, entry.cycle) {
                    (true, _) => " (missing)",
                    (_, true) => " (cycle)",
                    _ => "",
                };
                println!("{}{}{note}", "  ".repeat(entry.depth - 1), entry.path.display());
            }
            if entries.iter().any(|e| e.missing) {
                process::exit(1);
            }
        }
        other => {
            eprintln!("Unknown command '{other}'\n{USAGE}");
            process::exit(2);
        }
    }
    Ok(())
}

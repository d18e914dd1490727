//! ZDraw 无界面驱动程序
//!
//! 读取输入事件脚本，逐条送入编辑器，最后以 JSON 输出文档内容。
//!
//! 用法：`zdraw [--settings <path>] [--aliases <path>] [--verbose] <script | ->`

mod script;

use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use script::Step;
use zdraw_editor::{CommandState, Editor, InputEvent, Settings};

struct Options {
    script: String,
    settings: Option<PathBuf>,
    aliases: Option<PathBuf>,
    verbose: bool,
}

fn parse_args() -> Result<Options> {
    let mut script = None;
    let mut settings = None;
    let mut aliases = None;
    let mut verbose = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" | "-s" => {
                let path = args.next().context("--settings requires a path")?;
                settings = Some(PathBuf::from(path));
            }
            "--aliases" | "-a" => {
                let path = args.next().context("--aliases requires a path")?;
                aliases = Some(PathBuf::from(path));
            }
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => {
                println!("Usage: zdraw [--settings <path>] [--aliases <path>] [--verbose] <script | ->");
                std::process::exit(0);
            }
            _ if script.is_none() => script = Some(arg),
            _ => bail!("unexpected argument: {}", arg),
        }
    }

    Ok(Options {
        script: script.context("missing script path (use - for stdin)")?,
        settings,
        aliases,
        verbose,
    })
}

fn read_script(path: &str) -> Result<String> {
    if path == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read script from stdin")?;
        return Ok(source);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read script {}", path))
}

fn replay(editor: &mut Editor, steps: Vec<Step>) {
    for step in steps {
        let state = match step {
            Step::Command(name) => match editor.run_command(&name) {
                Ok(state) => state,
                Err(err) => {
                    warn!("{}", err);
                    continue;
                }
            },
            Step::PickAt(point) => {
                let ids = editor.pick_at(point);
                info!("Picked {} entities at ({}, {})", ids.len(), point.x, point.y);
                editor.handle_event(InputEvent::Pick(ids))
            }
            Step::Event(event) => editor.handle_event(event),
        };
        if state == CommandState::Gathering {
            info!("{}", editor.prompt());
        }
    }

    if let Some(name) = editor.active_command() {
        warn!("Script ended while {} was still running, cancelling", name);
        editor.cancel();
    }
}

fn main() -> Result<()> {
    let options = parse_args()?;

    // 初始化日志
    let level = if options.verbose { Level::DEBUG } else { Level::INFO };
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .finish(),
    )?;

    let settings = match &options.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings {}", path.display()))?,
        None => Settings::default(),
    };

    let source = read_script(&options.script)?;
    let steps = script::parse(&source)?;
    info!("Replaying {} steps from {}", steps.len(), options.script);

    let mut editor = Editor::new(settings);
    if let Some(path) = &options.aliases {
        let loaded = editor
            .registry_mut()
            .load_aliases(path)
            .with_context(|| format!("failed to load aliases {}", path.display()))?;
        info!("Loaded {} aliases from {}", loaded, path.display());
    }
    replay(&mut editor, steps);

    let document = editor.document();
    let output = serde_json::json!({
        "entities": document.entities().collect::<Vec<_>>(),
        "selection": editor.selection().ids(),
        "viewport": editor.viewport().view(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

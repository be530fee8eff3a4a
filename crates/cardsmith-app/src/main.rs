//! Main application entry point.

use cardsmith_app::{App, AppConfig, AppError, ShortcutRegistry};
use std::path::PathBuf;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    template: Option<PathBuf>,
    background: Option<PathBuf>,
    output: Option<PathBuf>,
    save: Option<PathBuf>,
    commands: Vec<String>,
    shortcuts: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        let mut value = || iter.next().ok_or_else(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--config" => args.config = Some(value()?.into()),
            "--template" => args.template = Some(value()?.into()),
            "--background" => args.background = Some(value()?.into()),
            "--out" => args.output = Some(value()?.into()),
            "--save" => args.save = Some(value()?.into()),
            "--run" => args.commands.push(value()?),
            "--shortcuts" => args.shortcuts = true,
            other => return Err(format!("unknown argument {other}")),
        }
    }
    Ok(args)
}

fn run(args: Args) -> Result<(), AppError> {
    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    log::info!("Starting {}", config.title);
    let mut app = App::with_config(config);

    if let Some(path) = &args.template {
        app.open_template(path)?;
    }
    if let Some(path) = &args.background {
        app.load_background(path)?;
    }
    for command in &args.commands {
        app.run_command(command)?;
    }
    if let Some(path) = &args.save {
        app.save_document(path)?;
    }
    app.export_preview(args.output.unwrap_or_else(|| PathBuf::from("preview.png")))?;
    Ok(())
}

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            eprintln!(
                "usage: cardsmith [--config FILE] [--template FILE] [--background IMAGE] \
                 [--run COMMAND]... [--save FILE] [--out PNG] [--shortcuts]"
            );
            std::process::exit(2);
        }
    };
    if args.shortcuts {
        ShortcutRegistry::print_all();
        return;
    }
    if let Err(e) = run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#![allow(missing_docs)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "scenex", about = "Scene extraction container inspection tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	Info(cmd::info::Args),
	Types(cmd::types::Args),
	Objects(cmd::objects::Args),
	Deps {
		path: PathBuf,
	},
	Guid {
		name: String,
	},
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> scenex::asset::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Types(args) => cmd::types::run(args),
		Commands::Objects(args) => cmd::objects::run(args),
		Commands::Deps { path } => cmd::deps::run(path),
		Commands::Guid { name } => cmd::guid::run(&name),
	}
}

use std::io::Read;

use clap::Parser;

use calc_script::{
    execute_script, stderr_log_fn, ExecuteOptions, Globals, JsonScriptParser, StatementBlock,
};

#[derive(Parser)]
#[command(name = "calc-script")]
#[command(about = "Run a CalcScript JSON script model")]
#[command(version)]
struct Cli {
    /// Output the result as JSON (`{"result": ...}`) instead of plain text
    #[arg(long = "json")]
    json: bool,

    /// Maximum statement count before the script is aborted (0 disables the quota)
    #[arg(long = "max-statements")]
    max_statements: Option<i64>,

    /// Script file to execute (JSON script model); reads stdin if omitted
    #[arg()]
    script_file: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let source = if let Some(ref file) = cli.script_file {
        match std::fs::read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error: Cannot read script file: {}: {}", file, e);
                std::process::exit(1);
            }
        }
    } else {
        use std::io::IsTerminal;
        if std::io::stdin().is_terminal() {
            eprintln!("Error: No script provided. Provide a script file or pipe JSON via stdin.");
            std::process::exit(1);
        }
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).unwrap_or_default();
        buf
    };

    let block: StatementBlock = match serde_json::from_str(&source) {
        Ok(block) => block,
        Err(e) => {
            eprintln!("Error: Cannot parse script model: {}", e);
            std::process::exit(1);
        }
    };

    let globals = Globals::new();
    let mut options = ExecuteOptions::new();
    options.log_fn = Some(stderr_log_fn());
    options.parser = Some(std::sync::Arc::new(JsonScriptParser));
    if let Some(max_statements) = cli.max_statements {
        options.max_statements = max_statements;
    }

    match execute_script(&block, &globals, &options) {
        Ok(value) => {
            if cli.json {
                println!("{}", serde_json::json!({ "result": value.to_string() }));
            } else {
                println!("{}", value);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

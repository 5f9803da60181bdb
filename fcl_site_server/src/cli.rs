use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty argument handling. Returns true if the process
/// should exit instead of starting the server.
pub fn handle_command_line_args() -> bool {
    let Some(arg) = env::args().nth(1) else {
        return false;
    };
    match arg.as_str() {
        "-v" | "--version" => println!("fcl_site_server v{}", env!("CARGO_PKG_VERSION")),
        "--envs" => display_envs(),
        _ => {
            // Anything else, including --help, gets the full help text
            display_readme();
            display_envs();
        },
    }
    true
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 13] = [
        "RUST_LOG",
        "FCL_HOST",
        "FCL_PORT",
        "FCL_DATABASE_URL",
        "FCL_USE_X_FORWARDED_FOR",
        "FCL_USE_FORWARDED",
        "FCL_STRIPE_API_URL",
        "FCL_COINBASE_API_URL",
        "FCL_SMTP_HOST",
        "FCL_SMTP_PORT",
        "FCL_SMTP_USERNAME",
        "FCL_EMAIL_FROM",
        "FCL_ADMIN_EMAIL",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<30} {val:<15}");
    })
}

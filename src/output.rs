use owo_colors::OwoColorize;

/// Consistent, colored user-facing messages on stdout/stderr.
/// Colors are applied only when the stream is a TTY, so scripted output
/// stays clean.
fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

pub fn print_info(msg: &str) {
    if is_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

pub fn print_success(msg: &str) {
    if is_tty() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {}", msg);
    }
}

/// Plain line with no prefix, for primary output users may script against
/// (moved-file reports, dry-run previews).
pub fn print_user(msg: &str) {
    println!("{}", msg);
}

/// Ask a y/n question on stdout and read one line from stdin.
/// Anything other than an explicit `y`/`yes` counts as a refusal.
pub fn confirm(question: &str) -> bool {
    use std::io::Write;

    print!("{} [y/N] ", question);
    let _ = std::io::stdout().flush();

    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

use std::io::IsTerminal;

use console::{Term, style};

/// Ask the user to pick one of `options` by number or name.
///
/// With no options, any non-empty answer is accepted.
pub fn select(title: &str, options: &[String]) -> anyhow::Result<String> {
    if !std::io::stdin().is_terminal() {
        anyhow::bail!("{title} (stdin is not a terminal, pass the value as a flag instead)");
    }

    let term = Term::stderr();
    term.write_line(title)?;
    for (idx, option) in options.iter().enumerate() {
        term.write_line(&format!("  {} {option}", style(format!("{}.", idx + 1)).dim()))?;
    }

    loop {
        term.write_str("> ")?;
        let answer = term.read_line()?;
        let answer = answer.trim();
        if answer.is_empty() {
            continue;
        }

        if let Ok(n) = answer.parse::<usize>()
            && (1..=options.len()).contains(&n)
        {
            return Ok(options[n - 1].clone());
        }
        if options.is_empty() || options.iter().any(|o| o == answer) {
            return Ok(answer.to_string());
        }

        term.write_line(&format!(
            "  {} unknown choice: {answer}",
            style("!").yellow().bold()
        ))?;
    }
}

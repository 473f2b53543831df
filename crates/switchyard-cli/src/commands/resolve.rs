use anyhow::Result;
use colored::Colorize;
use std::path::Path;

/// Resolves each path and prints the winner; returns false if any path
/// had no match
pub fn execute(config: Option<&Path>, paths: &[String]) -> Result<bool> {
    let router = super::load_router(config)?;
    let mut all_matched = true;

    for path in paths {
        let result = router.match_path(path);
        let Some(route) = result.route() else {
            println!("{} {}", path.yellow(), "no match".red());
            all_matched = false;
            continue;
        };

        println!(
            "{} {} {} {}",
            path.cyan(),
            "→".dimmed(),
            route.handler().green().bold(),
            format!("({})", route.template()).dimmed()
        );

        let mut params: Vec<_> = result.params().iter().collect();
        params.sort();
        for (name, value) in params {
            println!("    {} = {}", name, value);
        }
    }

    Ok(all_matched)
}

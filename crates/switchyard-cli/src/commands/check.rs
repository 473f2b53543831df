use anyhow::Result;
use colored::Colorize;
use std::path::Path;

/// Prints every registered route; fails on the first rejected entry
pub fn execute(config: Option<&Path>) -> Result<bool> {
    println!("{}", "Checking route table...".green().bold());
    println!();
    println!("Table: {}", super::table_path(config).display().to_string().cyan());
    println!();

    let router = match super::load_router(config) {
        Ok(router) => router,
        Err(err) => {
            println!("{} {:#}", "✗".red().bold(), err);
            return Ok(false);
        }
    };

    if router.is_empty() {
        println!("{}", "⚠ No routes defined".yellow());
        return Ok(true);
    }

    for route in router.routes() {
        println!(
            "  {} {} {} {}",
            route.id().to_string().dimmed(),
            route.template().cyan(),
            "→".dimmed(),
            route.handler()
        );
        println!(
            "      priority {}, specificity {}",
            route.priority(),
            route.specificity()
        );
    }

    for controller in router.controllers() {
        println!("  {} {} {}/index", "controller".dimmed(), controller.cyan(), "→".dimmed());
    }

    println!();
    println!(
        "{}",
        format!("{} routes OK", router.len()).green().bold()
    );

    Ok(true)
}

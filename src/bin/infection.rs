use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use infection::{
    logging,
    random::SeededSource,
    render::GridView,
    CLIArgs, INVALID_ARGUMENT_EXIT_CODE,
};
use tracing::info;

fn main() -> Result<()> {
    let args = CLIArgs::parse();
    logging::init(args.verbose);
    let params = match args.sim_params() {
        Ok(params) => params,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(INVALID_ARGUMENT_EXIT_CODE);
        }
    };

    let rng = SeededSource::new(args.rng_seed.unwrap_or_else(rand::random));
    info!(rng_seed = rng.seed(), "Using random number generator seed.");

    let mut stdout = io::stdout().lock();
    let mut show_result = Ok(());
    let outcome = infection::simulate_with(&params, rng, |generation, state| {
        if args.show_generations && show_result.is_ok() {
            show_result = GridView::new(state, generation)
                .colored(!args.no_color)
                .render(&mut stdout);
        }
    });
    show_result.context("Failed to show infection of some generation.")?;

    if outcome.seed_report.is_capped() {
        eprintln!(
            "Only {} cell(s) could be seeded instead of {}, effective seed fraction is {:.3}.",
            outcome.seed_report.seeded,
            outcome.seed_report.requested,
            outcome.seed_report.effective_fraction()
        );
    }

    let mut view = GridView::new(&outcome.infection, params.iterations()).colored(!args.no_color);
    if let Some(route) = &outcome.route {
        for pos in route.positions(params.grid()) {
            writeln!(stdout, "{}", pos).context("Failed to print route.")?;
        }
        view = view.with_route(route);
    } else {
        writeln!(stdout, "No path could be found.").context("Failed to print result.")?;
    }
    view.render(&mut stdout)
        .context("Failed to show final infection.")?;

    Ok(())
}

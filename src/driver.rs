// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Picks the configured strategy, runs it to completion, and hands
//! the buffer to the image sink.

use std::time::Instant;

use num_cpus;

use config::Config;
use error::RenderError;
use output::write_image;
use strategy::Rendered;

/// Renders the configured grid and returns the filled buffer.  Blocks
/// until the strategy's completion barrier releases.
pub fn render(config: &Config) -> Result<Rendered, RenderError> {
    let cell = config.escape_time();
    info!(
        "rendering {} with the {} strategy ({} workers, {} cpus)",
        config.dimensions,
        config.strategy,
        config.workers,
        num_cpus::get()
    );
    let started = Instant::now();
    let rendered = config
        .strategy
        .run(config.dimensions, config.workers, &cell)?;
    let elapsed = started.elapsed();
    info!(
        "{} finished in {}.{:03}s: {} task units across {} workers, {} idle",
        config.strategy,
        elapsed.as_secs(),
        elapsed.subsec_millis(),
        rendered.tally.units,
        rendered.tally.workers,
        rendered.tally.idle
    );
    Ok(rendered)
}

/// Renders, then writes the image to `config.output`.  Nothing is
/// written unless every cell was computed.
pub fn run(config: &Config) -> Result<Rendered, RenderError> {
    let rendered = render(config)?;
    write_image(&config.output, &rendered.buffer)?;
    info!("wrote {}", config.output.display());
    Ok(rendered)
}

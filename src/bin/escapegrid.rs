// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate escapegrid;

use clap::{App, Arg, ArgMatches};
use escapegrid::{output, Config, GridDimensions, RenderError, Strategy};
use std::fmt;
use std::str::FromStr;

/// A clap validator accepting numbers in `low..=high`.
fn within<T>(what: &'static str, low: T, high: T) -> impl Fn(String) -> Result<(), String>
where
    T: FromStr + PartialOrd + fmt::Display + 'static,
{
    move |s| match s.parse::<T>() {
        Ok(n) if n >= low && n <= high => Ok(()),
        Ok(_) => Err(format!("{} must be between {} and {}", what, low, high)),
        Err(_) => Err(format!("could not parse {} from {:?}", what, s)),
    }
}

fn grid_size(s: String) -> Result<(), String> {
    GridDimensions::from_str(&s)
        .and_then(output::encoded_size)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const STRATEGY: &str = "strategy";
const WORKERS: &str = "workers";
const COMPLEXITY: &str = "complexity";
const ITERATIONS: &str = "iterations";

fn args<'a>() -> ArgMatches<'a> {
    let strategies: Vec<&'static str> = Strategy::all().iter().map(|s| s.name()).collect();

    App::new("escapegrid")
        .version("0.1.0")
        .about("Renders an escape-time fractal using one of five scheduling strategies")
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value(Config::OUTPUT)
                .help("Output file; .pnm or .pgm for a graymap, PNG otherwise"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("2048x2048")
                .validator(grid_size)
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(STRATEGY)
                .long(STRATEGY)
                .short("m")
                .takes_value(true)
                .default_value("row-pool")
                .possible_values(&strategies)
                .help("How work is distributed to threads"),
        )
        .arg(
            Arg::with_name(WORKERS)
                .long(WORKERS)
                .short("w")
                .takes_value(true)
                .default_value("8")
                .validator(within("worker count", 1usize, 1024))
                .help("Number of workers in the pooled strategies"),
        )
        .arg(
            Arg::with_name(COMPLEXITY)
                .long(COMPLEXITY)
                .short("c")
                .takes_value(true)
                .default_value("1024")
                .validator(within("complexity", 0.0f64, 1.0e12))
                .help("Escape bound on the squared magnitude"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("1000")
                .validator(within("iteration count", 1usize, 200_000))
                .help("Maximum iterations per cell"),
        )
        .get_matches()
}

fn parsed<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, RenderError> {
    let value = matches.value_of(name).unwrap_or_default();
    T::from_str(value).map_err(|_| RenderError::BadArgument(name.to_string(), value.to_string()))
}

fn config(matches: &ArgMatches) -> Result<Config, RenderError> {
    Ok(Config {
        dimensions: parsed(matches, SIZE)?,
        strategy: parsed(matches, STRATEGY)?,
        workers: parsed(matches, WORKERS)?,
        complexity: parsed(matches, COMPLEXITY)?,
        max_iterations: parsed(matches, ITERATIONS)?,
        output: parsed(matches, OUTPUT)?,
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = args();

    let result = config(&matches).and_then(|config| escapegrid::driver::run(&config));
    if let Err(e) = result {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}

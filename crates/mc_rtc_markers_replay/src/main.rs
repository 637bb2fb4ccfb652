/*
 * Copyright (C) 2025 Open Source Robotics Foundation
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 *
*/

use anyhow::{Context, Result};
use clap::Parser;
use mc_rtc_markers::MarkerSettings;
use mc_rtc_markers_replay::{Replay, load_script};
use std::{
    io::{Write, stdout},
    path::PathBuf,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about)]
pub struct CommandLineArgs {
    /// JSON file listing the commands and drags to replay.
    pub script: PathBuf,
    /// Marker settings (.yaml, .yml or .json). Defaults are used when omitted.
    #[arg(short, long)]
    pub settings: Option<PathBuf>,
    /// Run the reconciliation loop this many extra times after every step.
    #[arg(long, default_value_t = 0)]
    pub ticks_per_step: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CommandLineArgs::parse();
    let settings = match &args.settings {
        Some(path) => MarkerSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => MarkerSettings::default(),
    };
    let steps = load_script(&args.script)
        .with_context(|| format!("loading script {}", args.script.display()))?;

    let mut replay = Replay::new(settings).with_ticks_per_step(args.ticks_per_step);
    let reported = replay.run(&steps)?;

    let mut out = stdout().lock();
    for moved in reported {
        writeln!(out, "{}", serde_json::to_string(moved)?)?;
    }
    Ok(())
}

// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Tracing setup shared by the server and the command line tools.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

fn filter(debug_fallback: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if debug_fallback { "debug" } else { "info" };
        EnvFilter::new(level)
    })
}

/// Install the global subscriber. `RUST_LOG` wins when set; otherwise `debug_fallback` picks
/// between DEBUG and INFO.
pub fn init_tracing(debug_fallback: bool) -> Result<(), eyre::Report> {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_ansi(true)
                .with_file(true)
                .with_target(false)
                .with_line_number(true)
                .with_thread_names(true)
                .with_span_events(fmt::format::FmtSpan::NONE),
        )
        .with(filter(debug_fallback))
        .try_init()
        .map_err(|e| eyre::eyre!("unable to install tracing subscriber: {e}"))
}

/// Like [`init_tracing`] but without file, line or thread decoration, for terse tool output.
pub fn init_tracing_simple(debug_fallback: bool) -> Result<(), eyre::Report> {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_ansi(true)
                .with_file(false)
                .with_target(false)
                .with_line_number(false)
                .with_thread_names(false)
                .without_time(),
        )
        .with(filter(debug_fallback))
        .try_init()
        .map_err(|e| eyre::eyre!("unable to install tracing subscriber: {e}"))
}

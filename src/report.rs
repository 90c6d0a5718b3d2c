//! Text output for sweep and trend results: CSV, a console summary, and a
//! Markdown page of trend equations.
//!
//! Times are reported in milliseconds; trend coefficients are in seconds.

use std::io::{self, Write};

use crate::fit::Trend;
use crate::sweep::{SweepResult, TimingSample};

/// One row per sample: `order,n,time_ms,gflops`.
///
/// Order labels contain commas, so they are quoted.
pub fn write_csv<W: Write>(out: &mut W, samples: &[TimingSample]) -> io::Result<()> {
    writeln!(out, "order,n,time_ms,gflops")?;
    for s in samples {
        writeln!(
            out,
            "\"{}\",{},{:.3},{:.2}",
            s.order,
            s.size,
            s.millis(),
            s.gflops()
        )?;
    }
    Ok(())
}

/// Fixed-width table grouped by size, with the fastest order marked.
pub fn write_summary<W: Write>(out: &mut W, result: &SweepResult) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(56))?;
    writeln!(out, "SUMMARY")?;
    writeln!(out, "{}", "=".repeat(56))?;
    writeln!(
        out,
        "{:<8} {:>6} {:>12} {:>10} {:>12}",
        "Order", "n", "Time (ms)", "GFLOPS", "vs best"
    )?;
    writeln!(out, "{}", "-".repeat(56))?;

    for best in &result.best {
        for s in result.samples.iter().filter(|s| s.size == best.size) {
            let marker = if s.order == best.order { " *" } else { "" };
            writeln!(
                out,
                "{:<8} {:>6} {:>12.3} {:>10.2} {:>11.1}×{}",
                s.order,
                s.size,
                s.millis(),
                s.gflops(),
                s.seconds / best.seconds,
                marker
            )?;
        }
        writeln!(out, "{}", "-".repeat(56))?;
    }

    writeln!(out, "\n* fastest order at that size. GFLOPS = 2·n³ / time.")?;
    Ok(())
}

/// Markdown page with one section per trend.
pub fn write_trends_markdown<W: Write>(out: &mut W, trends: &[Trend]) -> io::Result<()> {
    writeln!(out, "# Loop-order timing trends\n")?;
    writeln!(out, "Time in seconds as a cubic in matrix size n.\n")?;

    for t in trends {
        writeln!(out, "**{}**:\n", t.series)?;
        if t.fit.singular {
            writeln!(
                out,
                "- no fit: {} point(s), need at least 4 distinct sizes\n",
                t.points.len()
            )?;
            continue;
        }
        writeln!(out, "- {}", t.fit.poly)?;
        writeln!(out, "- R² = {:.6}\n", t.fit.r_squared)?;
    }
    Ok(())
}

//! CSV rendering of batch results.
//!
//! Normal mode writes one `domain,url` row per input domain, with an empty
//! url when nothing was found. Debug mode writes the full ranked table under
//! a header row.

use csv::{Writer, WriterBuilder};
use logo_finder::PipelineOutcome;
use std::io::Write;

use crate::batch::DomainResult;

const DEBUG_HEADER: [&str; 7] = ["domain", "website", "ref", "url", "source", "score", "score2"];

pub fn write_results<W: Write>(writer: W, results: &[DomainResult], debug: bool) -> csv::Result<()> {
    let mut wtr = WriterBuilder::new().flexible(true).from_writer(writer);

    if debug {
        write_debug(&mut wtr, results)?;
    } else {
        for result in results {
            let url = result.outcome.best_url().unwrap_or_default();
            wtr.write_record([result.domain.as_str(), url])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

fn write_debug<W: Write>(wtr: &mut Writer<W>, results: &[DomainResult]) -> csv::Result<()> {
    wtr.write_record(DEBUG_HEADER)?;

    for result in results {
        match &result.outcome {
            PipelineOutcome::Table(rows) => {
                for row in rows {
                    wtr.write_record([
                        result.domain.as_str(),
                        row.website.as_str(),
                        row.label.as_str(),
                        row.url.as_str(),
                        row.source.as_str(),
                        row.score.to_string().as_str(),
                        row.score2.to_string().as_str(),
                    ])?;
                }
            }
            // a non-debug pipeline fed into debug output
            PipelineOutcome::Selected(url) => {
                wtr.write_record([result.domain.as_str(), "", "", url.as_str(), "", "", ""])?;
            }
            PipelineOutcome::Empty { .. } => {
                wtr.write_record([result.domain.as_str(), "", "", "", "", "", ""])?;
            }
        }
    }

    Ok(())
}

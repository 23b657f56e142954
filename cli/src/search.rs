use std::{fs::File, io::BufWriter};

use anyhow::{Context, Result};
use human_repr::HumanDuration;
use pincrack_core::{
    Classifier, CpuClassifier, CudaRuntime, Event, GpuClassifier, MatchSink, Runtime, Search,
    SearchCtx, SearchCtxBuilder, WgpuRuntime,
};
use tracing::info;

use crate::{AvailableBackend, Search as SearchArgs};

pub fn search(args: SearchArgs) -> Result<()> {
    let ctx = SearchCtxBuilder::new()
        .day_bound(args.days)
        .month_bound(args.months)
        .year_bound(args.years)
        .batch_range(args.batch_start, args.batch_end)
        .group_size(args.group_size)
        .build()?;

    let sink = MatchSink::create(&args.output)
        .context("Unable to create the output file for the matches")?;

    match args.backend {
        AvailableBackend::Cuda => accelerated::<CudaRuntime>(ctx, sink),
        AvailableBackend::Wgpu => accelerated::<WgpuRuntime>(ctx, sink),
        AvailableBackend::Cpu => {
            let classifier = CpuClassifier::new(ctx.clone());
            drive(Search::new(ctx, classifier), sink)
        }
    }
}

fn accelerated<Backend: Runtime>(ctx: SearchCtx, sink: MatchSink<BufWriter<File>>) -> Result<()> {
    let classifier = GpuClassifier::<Backend>::new(ctx.clone());

    drive(Search::new(ctx, classifier), sink)
}

fn drive<C>(search: Search<C>, sink: MatchSink<BufWriter<File>>) -> Result<()>
where
    C: Classifier + Send + 'static,
{
    let mut handle = search.run_with_events(sink);

    while let Some(event) = handle.recv() {
        if let Event::Batch {
            batch_number,
            batch_count,
            matches,
        } = event
        {
            if matches > 0 || batch_number % 1000 == 0 || batch_number == batch_count {
                info!("batch {batch_number}/{batch_count}: {matches} match(es)");
            }
        }
    }

    let report = handle.join()?;
    println!(
        "{} matches across {} batches in {}",
        report.matches,
        report.batches,
        report.elapsed.as_secs().human_duration()
    );

    Ok(())
}

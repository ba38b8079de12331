//! Row scheduling: one cursor walking down, or row partitions on rayon.

use enough::StopReason;

use super::strategy::Strategy;
use crate::context::{Completion, OperationContext, Parallelism};
use crate::data::{BitmapDataInfo, ClippedBitmapData, ReadableBitmapData, WritableBitmapData};
use crate::error::BitmapError;
use crate::geometry::Point;

/// Narrower areas are always copied on the calling thread.
pub const PARALLEL_WIDTH_THRESHOLD: usize = 100;

/// Partitions per worker thread, so uneven rows balance out.
const PARTITIONS_PER_THREAD: usize = 4;

enum Abort {
    Cancelled(StopReason),
    Failed(BitmapError),
}

pub(super) fn run(
    source: &ClippedBitmapData<'_>,
    target: &mut dyn WritableBitmapData,
    at: Point,
    strategy: &Strategy<'_>,
    parallelism: Parallelism,
    ctx: &OperationContext<'_>,
) -> Result<Completion, BitmapError> {
    let width = source.width();
    let height = source.height();
    let sequential = parallelism == Parallelism::Sequential
        || width < PARALLEL_WIDTH_THRESHOLD
        || height == 1
        || strategy.is_sequential();
    log::debug!(
        "copy {}x{} to ({}, {}): {}, {}",
        width,
        height,
        at.x,
        at.y,
        strategy.name(),
        if sequential { "sequential" } else { "parallel" }
    );

    ctx.new_phase(height);
    if sequential {
        run_sequential(source, target, at, strategy, ctx)
    } else {
        run_parallel(source, target, at, strategy, ctx)
    }
}

fn run_sequential(
    source: &ClippedBitmapData<'_>,
    target: &mut dyn WritableBitmapData,
    at: Point,
    strategy: &Strategy<'_>,
    ctx: &OperationContext<'_>,
) -> Result<Completion, BitmapError> {
    let mut src = source.first_row()?;
    let mut dst = target.row_mut(at.y)?;
    for y in 0..source.height() {
        if let Err(reason) = ctx.check() {
            log::trace!("copy cancelled before row {y}: {reason:?}");
            return Ok(Completion::Cancelled(reason));
        }
        strategy.process_row(&src, &mut dst, at.x, y)?;
        ctx.advance(1);
        src.move_next_row();
        dst.move_next_row();
    }
    Ok(Completion::Finished)
}

fn run_parallel(
    source: &ClippedBitmapData<'_>,
    target: &mut dyn WritableBitmapData,
    at: Point,
    strategy: &Strategy<'_>,
    ctx: &OperationContext<'_>,
) -> Result<Completion, BitmapError> {
    use rayon::prelude::*;

    let height = source.height();
    let mut rows = target.rows_mut()?;
    let rows = rows
        .get_mut(at.y..at.y + height)
        .ok_or_else(|| BitmapError::out_of_range("y", at.y + height, at.y))?;
    let partitions = rayon::current_num_threads() * PARTITIONS_PER_THREAD;
    let chunk = height.div_ceil(partitions).max(1);

    let result = rows
        .par_chunks_mut(chunk)
        .enumerate()
        .try_for_each(|(i, partition)| {
            ctx.check().map_err(Abort::Cancelled)?;
            let first = i * chunk;
            for (j, dst) in partition.iter_mut().enumerate() {
                let y = first + j;
                let src = source.row(y).map_err(Abort::Failed)?;
                strategy
                    .process_row(&src, dst, at.x, y)
                    .map_err(Abort::Failed)?;
            }
            ctx.advance(partition.len());
            Ok(())
        });

    match result {
        Ok(()) => Ok(Completion::Finished),
        Err(Abort::Cancelled(reason)) => {
            log::trace!("parallel copy cancelled: {reason:?}");
            Ok(Completion::Cancelled(reason))
        }
        Err(Abort::Failed(e)) => Err(e),
    }
}
